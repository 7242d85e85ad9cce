use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::Error;
use serde::de::Unexpected::Str;

/// Owned e-mail address. Compared and stored case-sensitively,
/// exactly as the client presented it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EmailString(String);

impl FromStr for EmailString {
    type Err = EmailParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailParseError);
        }
        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                => Ok(EmailString(s.to_string())),
            _ => Err(EmailParseError),
        }
    }
}

impl Deref for EmailString {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0[..]
    }
}

impl Display for EmailString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub struct EmailParseError;

impl Display for EmailParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("not a valid email address")
    }
}

impl std::error::Error for EmailParseError {}

impl Serialize for EmailString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmailString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = EmailString;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("string containing a valid email address")
            }

            fn visit_str<E>(self, v: &str) -> Result<EmailString, E>
            where
                E: Error
            {
                EmailString::from_str(v)
                    .map_err(|_| Error::invalid_value(Str(v), &self))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
