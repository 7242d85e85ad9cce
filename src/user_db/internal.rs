mod data;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use log::error;
use time::OffsetDateTime;
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;
use data::{UsersData, UsersDataRef};
use crate::config::AppConfig;
use crate::data::User;
use crate::email_string::EmailString;
use crate::hasher::Hasher;
use crate::rng::make_uuid;
use crate::user_db::{UserDb, UserDbError};

pub struct ProductionUserDb {
    hasher: Arc<dyn Hasher>,
    path: PathBuf,
    users: RwLock<Vec<User>>,
}

impl ProductionUserDb {
    pub async fn new(
        app_config: &AppConfig,
        hasher: Arc<dyn Hasher>,
    ) -> Result<ProductionUserDb, UserDbError> {
        let path = app_config.user_db.clone();
        let users = match fs::read_to_string(&path).await {
            Ok(contents) => toml::from_str::<UsersData>(&contents)?.users,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                Vec::new()
            },
            Err(e) => return Err(e.into()),
        };
        Ok(
            ProductionUserDb {
                hasher,
                path,
                users: RwLock::new(users),
            }
        )
    }

    async fn hash_password(&self, password: String) -> Result<String, UserDbError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.generate_hash(&password))
            .await
            .map_err(|_| UserDbError::HasherTask)?
            .map_err(UserDbError::from)
    }

    async fn persist(&self, users: &[User]) -> Result<(), UserDbError> {
        let contents = toml::to_string_pretty(&UsersDataRef { users })?;
        let tmp_path = self.path.with_file_name(Uuid::new_v4().to_string());
        fs::write(&tmp_path, contents).await?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                error!(
                    "failed to clean up stray user db file {}: {e}",
                    tmp_path.display(),
                );
            }
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl UserDb for ProductionUserDb {
    async fn find_user_by_email(
        &self,
        email: &EmailString,
    ) -> Result<Option<User>, UserDbError> {
        Ok(
            self.users.read().await
                .iter()
                .find(|u| !u.deleted && u.email == *email)
                .cloned()
        )
    }

    async fn create_user(
        &self,
        name: String,
        email: EmailString,
        password: String,
    ) -> Result<User, UserDbError> {
        // cheap pre-check so duplicate registrations do not pay for a
        // hash; the authoritative check happens under the write lock
        if self.users.read().await.iter().any(|u| u.email == email) {
            return Err(UserDbError::EmailTaken);
        }
        let hash = self.hash_password(password).await?;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: make_uuid(&mut rand::thread_rng()),
            name,
            email,
            hash,
            created_at: now,
            updated_at: now,
            deleted: false,
        };
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserDbError::EmailTaken);
        }
        users.push(user.clone());
        if let Err(e) = self.persist(&users).await {
            users.pop();
            return Err(e);
        }
        Ok(user)
    }

    async fn check_user_credentials(
        &self,
        email: &EmailString,
        password: String,
    ) -> Result<Option<User>, UserDbError> {
        let user = self.users.read().await
            .iter()
            .find(|u| !u.deleted && u.email == *email)
            .cloned();
        let Some(user) = user else {
            return Ok(None);
        };
        let hasher = self.hasher.clone();
        let hash = user.hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || hasher.check_hash(&hash, &password))
                .await
                .map_err(|_| UserDbError::HasherTask)?;
        Ok(matches.then_some(user))
    }
}
