use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::bin_constants::{
    DEFAULT_DATA_DIR,
    DEFAULT_JWT_SECRET_FILE,
    DEFAULT_MAX_NOTE_LEN,
    DEFAULT_UPLOADS_DIR,
    DEFAULT_USER_DB,
};
use crate::config::hasher_config::ProductionHasherConfigData;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfig {
    #[serde(default = "app_config_default_data_directory")]
    pub data_directory: PathBuf,

    #[serde(default = "app_config_default_user_db")]
    pub user_db: PathBuf,

    #[serde(default = "app_config_default_uploads_directory")]
    pub uploads_directory: PathBuf,

    /// Path to the JWK holding the token-signing secret. The file is
    /// required at startup; there is no built-in fallback secret.
    #[serde(default = "app_config_default_jwt_secret_file")]
    pub jwt_secret_file: PathBuf,

    #[serde(default = "app_config_default_max_note_size")]
    pub max_note_size: u64,

    #[serde(default)]
    pub hasher_config: ProductionHasherConfigData,
}

fn app_config_default_data_directory() -> PathBuf {
    DEFAULT_DATA_DIR.into()
}

fn app_config_default_user_db() -> PathBuf {
    DEFAULT_USER_DB.into()
}

fn app_config_default_uploads_directory() -> PathBuf {
    DEFAULT_UPLOADS_DIR.into()
}

fn app_config_default_jwt_secret_file() -> PathBuf {
    DEFAULT_JWT_SECRET_FILE.into()
}

fn app_config_default_max_note_size() -> u64 {
    DEFAULT_MAX_NOTE_LEN
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_directory: app_config_default_data_directory(),
            user_db: app_config_default_user_db(),
            uploads_directory: app_config_default_uploads_directory(),
            jwt_secret_file: app_config_default_jwt_secret_file(),
            max_note_size: app_config_default_max_note_size(),
            hasher_config: ProductionHasherConfigData::default(),
        }
    }
}
