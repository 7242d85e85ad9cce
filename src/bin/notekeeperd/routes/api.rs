mod authentication_guard;
pub mod errors;
pub mod model;
#[cfg(test)] mod tests;

use std::ffi::OsStr;
use std::path::Path;
use std::str::FromStr;
use log::{debug, error};
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{self, Json};
use rocket::{catch, catchers, delete, get, post, put, routes, Catcher, Route, State};
use time::OffsetDateTime;
use uuid::Uuid;
use notekeeper::config::AppConfig;
use notekeeper::email_string::EmailString;
use authentication_guard::Authenticated;
use errors::ApiError;
use model::*;
use crate::access_granter::AccessGranter;
use crate::app_constants::MIN_PASSWORD_LEN;
use crate::note_access::NoteAccess;

pub fn api_routes() -> Vec<Route> {
    routes![
        register,
        login,
        list_notes,
        create_note,
        get_note,
        update_note,
        delete_note,
        upload_image,
    ]
}

pub fn api_catchers() -> Vec<Catcher> {
    catchers![
        unauthorized,
        not_found,
        internal_error,
    ]
}

#[post("/auth/register", data = "<request>")]
async fn register(
    request: Result<Json<RegisterRequest>, json::Error<'_>>,
    access_granter: &State<AccessGranter>,
) -> Result<Custom<Json<RegisterResponse>>, ApiError> {
    let Json(request) = request.map_err(|e| {
        debug!("unparseable registration request: {e}");
        ApiError::Validation("invalid request body")
    })?;
    if request.name.is_empty()
        || request.email.is_empty()
        || request.password.is_empty()
    {
        return Err(ApiError::Validation("name, email, and password are required"));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation("password must be at least 6 characters"));
    }
    let email = EmailString::from_str(&request.email)
        .map_err(|_| ApiError::Validation("invalid email address"))?;

    let user = access_granter
        .register_user(request.name, email, request.password)
        .await?;
    Ok(
        Custom(
            Status::Created,
            Json(
                RegisterResponse {
                    message: "user registered successfully",
                    user: user.into(),
                }
            ),
        )
    )
}

#[post("/auth/login", data = "<request>")]
async fn login(
    request: Result<Json<LoginRequest>, json::Error<'_>>,
    access_granter: &State<AccessGranter>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = request.map_err(|e| {
        debug!("unparseable login request: {e}");
        ApiError::Validation("invalid request body")
    })?;
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("email and password are required"));
    }
    // an address that cannot parse cannot name a stored credential
    // either, so it gets the same answer as an unknown one
    let email = EmailString::from_str(&request.email)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let result = access_granter.login_user(&email, request.password).await?;
    Ok(
        Json(
            LoginResponse {
                message: "login successful",
                token: result.token,
                user: result.user.into(),
            }
        )
    )
}

#[get("/notes")]
async fn list_notes(
    auth: Authenticated,
    note_access: &State<NoteAccess>,
) -> Result<Json<NoteListResponse>, ApiError> {
    let notes = note_access.list_notes(&auth.0).await?;
    Ok(
        Json(
            NoteListResponse {
                notes: notes.into_iter().map(Into::into).collect(),
            }
        )
    )
}

#[post("/notes", data = "<request>")]
async fn create_note(
    auth: Authenticated,
    request: Result<Json<CreateNoteRequest>, json::Error<'_>>,
    note_access: &State<NoteAccess>,
    config: &State<AppConfig>,
) -> Result<Custom<Json<NoteResponse>>, ApiError> {
    let Json(request) = request.map_err(|e| {
        debug!("unparseable note creation request: {e}");
        ApiError::Validation("invalid request body")
    })?;
    if request.title.is_empty() || request.content.is_empty() {
        return Err(ApiError::Validation("title and content are required"));
    }
    check_note_size(&request.title, &request.content, config.inner())?;

    let note = note_access
        .create_note(&auth.0, request.title, request.content)
        .await?;
    Ok(Custom(Status::Created, Json(note.into())))
}

#[get("/notes/<note_id>")]
async fn get_note(
    auth: Authenticated,
    note_id: Uuid,
    note_access: &State<NoteAccess>,
) -> Result<Json<NoteResponse>, ApiError> {
    Ok(Json(note_access.get_note(&auth.0, note_id).await?.into()))
}

#[put("/notes/<note_id>", data = "<request>")]
async fn update_note(
    auth: Authenticated,
    note_id: Uuid,
    request: Result<Json<UpdateNoteRequest>, json::Error<'_>>,
    note_access: &State<NoteAccess>,
    config: &State<AppConfig>,
) -> Result<Json<NoteResponse>, ApiError> {
    let Json(request) = request.map_err(|e| {
        debug!("unparseable note update request: {e}");
        ApiError::Validation("invalid request body")
    })?;
    check_note_size(&request.title, &request.content, config.inner())?;
    let title = Some(request.title).filter(|t| !t.is_empty());
    let content = Some(request.content).filter(|c| !c.is_empty());

    let note = note_access
        .update_note(&auth.0, note_id, title, content)
        .await?;
    Ok(Json(note.into()))
}

#[delete("/notes/<note_id>")]
async fn delete_note(
    auth: Authenticated,
    note_id: Uuid,
    note_access: &State<NoteAccess>,
) -> Result<Json<MessageResponse>, ApiError> {
    note_access.delete_note(&auth.0, note_id).await?;
    Ok(
        Json(
            MessageResponse {
                message: "note deleted successfully",
            }
        )
    )
}

#[post("/notes/<note_id>/upload", data = "<form>")]
async fn upload_image(
    auth: Authenticated,
    note_id: Uuid,
    form: Result<Form<ImageUpload<'_>>, rocket::form::Errors<'_>>,
    note_access: &State<NoteAccess>,
    config: &State<AppConfig>,
) -> Result<Json<NoteResponse>, ApiError> {
    // ownership gate before any side effect touches the disk
    note_access.get_note(&auth.0, note_id).await?;

    let mut upload = form
        .map_err(|e| {
            debug!("unparseable upload request: {e}");
            ApiError::Validation("no image file provided")
        })?
        .into_inner();
    let raw_name = upload.image.raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str())
        .unwrap_or("");
    let extension = match Path::new(raw_name).extension().and_then(OsStr::to_str) {
        Some(e @ ("jpg" | "jpeg" | "png" | "gif")) => e,
        _ => return Err(
            ApiError::Validation(
                "invalid file type: only jpg, jpeg, png, and gif are allowed",
            )
        ),
    };

    let filename = format!(
        "{}_{note_id}.{extension}",
        OffsetDateTime::now_utc().unix_timestamp(),
    );
    upload.image.copy_to(config.uploads_directory.join(&filename))
        .await
        .map_err(|e| {
            error!("failed to save uploaded image: {e}");
            ApiError::Internal
        })?;

    let note = note_access
        .attach_image(&auth.0, note_id, format!("/uploads/{filename}"))
        .await?;
    Ok(Json(note.into()))
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(
        HealthResponse {
            status: "ok",
            message: "notes API is running",
        }
    )
}

fn check_note_size(
    title: &str,
    content: &str,
    config: &AppConfig,
) -> Result<(), ApiError> {
    if (title.len() + content.len()) as u64 > config.max_note_size {
        return Err(ApiError::Validation("note is too large"));
    }
    Ok(())
}

#[catch(401)]
fn unauthorized() -> Json<ErrorResponse> {
    Json(
        ErrorResponse {
            error: "invalid or expired token".to_string(),
        }
    )
}

#[catch(404)]
fn not_found() -> Json<ErrorResponse> {
    Json(
        ErrorResponse {
            error: "not found".to_string(),
        }
    )
}

#[catch(500)]
fn internal_error() -> Json<ErrorResponse> {
    Json(
        ErrorResponse {
            error: "internal server error".to_string(),
        }
    )
}
