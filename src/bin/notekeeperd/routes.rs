pub mod api;

use std::path::Path;
use rocket::{routes, Build, Rocket};
use rocket::fs::FileServer;

pub trait ApiRocketBuildExt {
    fn install_notekeeper_api(self, uploads_directory: &Path) -> Self;
}

impl ApiRocketBuildExt for Rocket<Build> {
    fn install_notekeeper_api(self, uploads_directory: &Path) -> Self {
        self.mount("/api", api::api_routes())
            .mount("/uploads", FileServer::from(uploads_directory))
            .mount("/", routes![api::health])
            .register("/", api::api_catchers())
    }
}
