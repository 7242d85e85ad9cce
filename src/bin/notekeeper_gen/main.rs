mod cli;

use clap::Parser;
use figment::Figment;
use log::{error, info};
use rand::rngs::OsRng;
use std::process::exit;
use notekeeper::config::AppConfig;
use notekeeper::config::figment::FigmentExt;
use notekeeper::error_exit;
use notekeeper::hmac_key_generator::make_hmac_key;
use crate::cli::CliConfig;

fn main() {
    env_logger::init();

    let cli_config = CliConfig::parse();

    if !cli_config.config_file.exists() {
        error_exit!(
            "configuration file at {} does not exist",
            cli_config.config_file.display()
        )
    }

    let app_config: AppConfig = Figment::new()
        .setup_app_config(&cli_config.config_file)
        .extract()
        .unwrap_or_else(|e| {
            for e in e {
                error!("{e}");
            }
            info!("finishing due to a configuration error");
            exit(1)
        });

    if app_config.jwt_secret_file.exists() && !cli_config.force {
        error_exit!(
            "refusing to overwrite the existing secret at {}; \
                pass --force to replace it",
            app_config.jwt_secret_file.display()
        )
    }

    make_hmac_key(&app_config.jwt_secret_file, &mut OsRng)
        .unwrap_or_else(|e| error_exit!("could not generate a token secret: {e}"));
    info!(
        "wrote a new token secret to {}",
        app_config.jwt_secret_file.display(),
    );
}
