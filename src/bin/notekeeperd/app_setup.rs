use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use async_trait::async_trait;
use josekit::jwk::Jwk;
use log::{error, info};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Build, Rocket};
use tokio::fs;
use notekeeper::access_token::{AccessTokenDecoder, AccessTokenGenerator};
use notekeeper::config::AppConfig;
use notekeeper::hasher::{ProductionHasher, ProductionHasherConfig};
use notekeeper::storage::ProductionNoteStorage;
use notekeeper::user_db::ProductionUserDb;
use crate::access_granter::AccessGranter;
use crate::note_access::NoteAccess;
use crate::routes::ApiRocketBuildExt;

pub struct AppSetupFairing;

impl AppSetupFairing {
    pub fn new() -> Self {
        AppSetupFairing
    }
}

macro_rules! ok_or_bail {
    ($rocket:ident, $expr:expr, |$e:ident| $error_logger:expr) => ({
        match $expr {
            std::result::Result::Ok(ok) => ok,
            std::result::Result::Err(e) => {
                let $e = e;
                $error_logger;
                return std::result::Result::Err($rocket);
            },
        }
    });
}

#[async_trait]
impl Fairing for AppSetupFairing {
    fn info(&self) -> Info {
        Info {
            name: "app setup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(
        &self,
        rocket: Rocket<Build>,
    ) -> rocket::fairing::Result {
        let config: AppConfig = ok_or_bail!(
            rocket,
            rocket.figment().extract(),
            |e| {
                for e in e {
                    error!("{e}");
                }
                info!("finishing due to a config parse error");
            }
        );

        let argon2_params: argon2::Params = ok_or_bail!(
            rocket,
            config.hasher_config.clone().try_into(),
            |e| error!("hasher config is invalid: {e}")
        );
        let hasher = Arc::new(
            ProductionHasher::new(ProductionHasherConfig::new(argon2_params))
        );

        let user_db = ok_or_bail!(
            rocket,
            ProductionUserDb::new(&config, hasher).await,
            |e| error!("user db initialization failed: {e}")
        );

        let storage = ok_or_bail!(
            rocket,
            ProductionNoteStorage::new(&config).await,
            |e| error!("note storage initialization failed: {e}")
        );

        ok_or_bail!(
            rocket,
            fs::create_dir_all(&config.uploads_directory).await,
            |e| error!("failed to create the uploads directory: {e}")
        );

        // the signing secret is required external state; a missing or
        // unreadable file stops ignition, there is no baked-in default
        let jwt_secret = ok_or_bail!(
            rocket,
            read_jwt_key(&config.jwt_secret_file),
            |e| error!(
                "failed reading the token secret at {}: {e}",
                config.jwt_secret_file.display(),
            )
        );
        let access_token_generator = ok_or_bail!(
            rocket,
            AccessTokenGenerator::from_jwk(&jwt_secret),
            |e| error!("could not initialize access token generator: {e}")
        );
        let access_token_decoder = ok_or_bail!(
            rocket,
            AccessTokenDecoder::from_jwk(&jwt_secret),
            |e| error!("could not initialize access token decoder: {e}")
        );

        let access_granter = AccessGranter::new(
            Box::new(user_db),
            access_token_generator,
            access_token_decoder,
        );
        let note_access = NoteAccess::new(Box::new(storage));
        let uploads_directory = config.uploads_directory.clone();

        Ok(
            rocket
                .manage(config)
                .manage(access_granter)
                .manage(note_access)
                .install_notekeeper_api(&uploads_directory)
        )
    }
}

fn read_jwt_key(path: &Path) -> Result<Jwk, Box<dyn Error>> {
    Ok(Jwk::from_bytes(std::fs::read(path)?)?)
}
