use serde::{Deserialize, Serialize};
use crate::data::User;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct UsersData {
    #[serde(rename = "user", default)]
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub(super) struct UsersDataRef<'a> {
    #[serde(rename = "user")]
    pub users: &'a [User],
}
