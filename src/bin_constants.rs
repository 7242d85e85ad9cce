pub const DEFAULT_CONFIG_FILE: &str = "/etc/notekeeper/notekeeper.toml";
pub const APP_CONFIG_ENV_PREFIX: &str = "NOTEKEEPER_";

pub const DEFAULT_USER_DB: &str = "/etc/notekeeper/users.toml";
pub const DEFAULT_DATA_DIR: &str = "/var/notekeeper";
pub const DEFAULT_UPLOADS_DIR: &str = "/var/notekeeper/uploads";
pub const DEFAULT_JWT_SECRET_FILE: &str = "/etc/notekeeper/jwt_secret.jwk";

pub const DEFAULT_MAX_NOTE_LEN: u64 = 128 * 1024;
