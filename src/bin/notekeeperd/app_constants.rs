use std::time::Duration;

pub const ACCESS_TOKEN_VALIDITY_TIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on a single note-store call so a stuck backend cannot
/// pin request-handling capacity.
pub const STORAGE_CALL_TIMEOUT: Duration = Duration::from_secs(5);

pub const MIN_PASSWORD_LEN: usize = 6;
