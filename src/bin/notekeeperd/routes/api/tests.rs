use std::time::{Duration, SystemTime};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use figment::Figment;
use figment::providers::Serialized;
use josekit::jwk::Jwk;
use josekit::jws::alg::hmac::HmacJwsAlgorithm;
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::Value;
use uuid::Uuid;
use notekeeper::access_token::AccessTokenGenerator;
use notekeeper::config::AppConfig;
use notekeeper::email_string::EmailString;
use notekeeper::hmac_key_generator::make_hmac_key;
use crate::app_setup::AppSetupFairing;

async fn make_client(dir: &TempDir) -> Client {
    let secret_file = dir.child("jwt_secret.jwk");
    make_hmac_key(secret_file.path(), &mut rand::rngs::OsRng)
        .expect("key generation failed");
    let figment = Figment::from(rocket::Config::default())
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(("data_directory", dir.child("data").path().to_str().unwrap()))
        .merge(("user_db", dir.child("users.toml").path().to_str().unwrap()))
        .merge(("uploads_directory", dir.child("uploads").path().to_str().unwrap()))
        .merge(("jwt_secret_file", secret_file.path().to_str().unwrap()))
        // minimal hashing costs, the flows only care about correctness
        .merge(("hasher_config.argon2_m_cost", 64u32))
        .merge(("hasher_config.argon2_t_cost", 1u32));
    Client::tracked(
        rocket::custom(figment).attach(AppSetupFairing::new())
    )
        .await
        .expect("rocket failed to ignite")
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

async fn json_body(response: LocalResponse<'_>) -> Value {
    response.into_json().await.expect("response is not json")
}

async fn register<'c>(
    client: &'c Client,
    name: &str,
    email: &str,
    password: &str,
) -> LocalResponse<'c> {
    client.post("/api/auth/register")
        .header(ContentType::JSON)
        .body(
            serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }).to_string()
        )
        .dispatch()
        .await
}

async fn login_token(client: &Client, email: &str, password: &str) -> String {
    let response = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(
            serde_json::json!({
                "email": email,
                "password": password,
            }).to_string()
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = json_body(response).await;
    assert_eq!(body["message"], "login successful");
    body["token"].as_str().expect("no token in login response").to_string()
}

async fn create_note(
    client: &Client,
    token: &str,
    title: &str,
    content: &str,
) -> Value {
    let response = client.post("/api/notes")
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(
            serde_json::json!({
                "title": title,
                "content": content,
            }).to_string()
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    json_body(response).await
}

fn multipart_image(filename: &str, contents: &[u8]) -> (ContentType, Vec<u8>) {
    const BOUNDARY: &str = "notekeeper-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
                Content-Disposition: form-data; name=\"image\"; \
                filename=\"{filename}\"\r\n\
                Content-Type: application/octet-stream\r\n\r\n"
        ).as_bytes()
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    let content_type = ContentType::parse_flexible(
        &format!("multipart/form-data; boundary={BOUNDARY}"),
    ).unwrap();
    (content_type, body)
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn register_login_and_note_flow() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    let response = register(&client, "Ann", "ann@x.com", "secret1").await;
    assert_eq!(response.status(), Status::Created);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert_eq!(body["user"]["name"], "Ann");
    let ann_id = body["user"]["id"].as_str().unwrap().to_string();

    let token = login_token(&client, "ann@x.com", "secret1").await;

    let response = client.get("/api/notes").header(bearer(&token)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response).await["notes"], serde_json::json!([]));

    let note = create_note(&client, &token, "T1", "C1").await;
    assert_eq!(note["title"], "T1");
    assert_eq!(note["content"], "C1");
    assert_eq!(note["user_id"].as_str().unwrap(), ann_id);
    let note_id = note["id"].as_str().unwrap().to_string();

    let response = client.get(format!("/api/notes/{note_id}"))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    // a second user gets a 404 for the same note id
    assert_eq!(
        register(&client, "Bob", "bob@x.com", "secret2").await.status(),
        Status::Created,
    );
    let bob_token = login_token(&client, "bob@x.com", "secret2").await;
    let response = client.get(format!("/api/notes/{note_id}"))
        .header(bearer(&bob_token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn registration_validation() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    for (body, case) in [
        (r#"{"email":"ann@x.com","password":"secret1"}"#, "missing name"),
        (r#"{"name":"Ann","password":"secret1"}"#, "missing email"),
        (r#"{"name":"Ann","email":"ann@x.com"}"#, "missing password"),
        (r#"{"name":"Ann","email":"ann@x.com","password":"short"}"#, "short password"),
        (r#"{"name":"Ann","email":"not-an-email","password":"secret1"}"#, "bad email"),
        (r#"{"name":"#, "malformed body"),
    ] {
        let response = client.post("/api/auth/register")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "case: {case}");
    }
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_keeps_the_first_user() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    assert_eq!(
        register(&client, "Ann", "ann@x.com", "secret1").await.status(),
        Status::Created,
    );
    let response = register(&client, "Impostor", "ann@x.com", "secret2").await;
    assert_eq!(response.status(), Status::Conflict);

    // the original credentials still work, the impostor's never do
    login_token(&client, "ann@x.com", "secret1").await;
    let response = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"email":"ann@x.com","password":"secret2"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;

    let wrong_password = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"email":"ann@x.com","password":"hunter2"}"#)
        .dispatch()
        .await;
    assert_eq!(wrong_password.status(), Status::Unauthorized);
    let wrong_password = json_body(wrong_password).await;

    let unknown_email = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"email":"nobody@x.com","password":"secret1"}"#)
        .dispatch()
        .await;
    assert_eq!(unknown_email.status(), Status::Unauthorized);
    assert_eq!(json_body(unknown_email).await, wrong_password);

    let missing_fields = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"email":"ann@x.com"}"#)
        .dispatch()
        .await;
    assert_eq!(missing_fields.status(), Status::BadRequest);
}

#[tokio::test]
async fn protected_routes_reject_bad_authorization_uniformly() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    let missing = client.get("/api/notes").dispatch().await;
    assert_eq!(missing.status(), Status::Unauthorized);
    let missing = json_body(missing).await;

    let malformed = client.get("/api/notes")
        .header(Header::new("Authorization", "Token abc"))
        .dispatch()
        .await;
    assert_eq!(malformed.status(), Status::Unauthorized);
    assert_eq!(json_body(malformed).await, missing);

    let garbage = client.get("/api/notes")
        .header(bearer("not-a-token"))
        .dispatch()
        .await;
    assert_eq!(garbage.status(), Status::Unauthorized);
    assert_eq!(json_body(garbage).await, missing);
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_rejected() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;

    let email: EmailString = "ann@x.com".parse().unwrap();
    let user_id = Uuid::new_v4();

    // signed with the server's own secret, but long expired
    let server_jwk = Jwk::from_bytes(
        std::fs::read(dir.child("jwt_secret.jwk").path()).unwrap(),
    ).unwrap();
    let issued_at = SystemTime::now() - Duration::from_secs(25 * 60 * 60);
    let expired = AccessTokenGenerator::from_jwk(&server_jwk).unwrap()
        .generate_token(
            user_id,
            &email,
            &issued_at,
            &(issued_at + Duration::from_secs(24 * 60 * 60)),
        )
        .unwrap();
    let response = client.get("/api/notes")
        .header(bearer(&expired))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    // fresh, but signed with somebody else's secret
    let foreign = AccessTokenGenerator::from_jwk(
        &HmacJwsAlgorithm::Hs256.to_jwk(b"0123456789abcdef0123456789abcdef"),
    ).unwrap();
    let now = SystemTime::now();
    let forged = foreign
        .generate_token(user_id, &email, &now, &(now + Duration::from_secs(60)))
        .unwrap();
    let response = client.get("/api/notes")
        .header(bearer(&forged))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn note_crud_roundtrip() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;
    let token = login_token(&client, "ann@x.com", "secret1").await;

    let first = create_note(&client, &token, "first", "C1").await;
    let second = create_note(&client, &token, "second", "C2").await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    // newest first
    let response = client.get("/api/notes").header(bearer(&token)).dispatch().await;
    let listed = json_body(response).await;
    let titles: Vec<&str> = listed["notes"].as_array().unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert_eq!(titles.last(), Some(&"first"));

    // partial update keeps the unset field
    let response = client.put(format!("/api/notes/{first_id}"))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(r#"{"content":"C1 updated"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated = json_body(response).await;
    assert_eq!(updated["title"], "first");
    assert_eq!(updated["content"], "C1 updated");

    // create requires both fields
    let response = client.post("/api/notes")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(r#"{"title":"only a title"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client.delete(format!("/api/notes/{second_id}"))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get(format!("/api/notes/{second_id}"))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let response = client.delete(format!("/api/notes/{second_id}"))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client.get("/api/notes").header(bearer(&token)).dispatch().await;
    assert_eq!(
        json_body(response).await["notes"].as_array().unwrap().len(),
        1,
    );
}

#[tokio::test]
async fn foreign_notes_are_indistinguishable_from_absent_ones() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;
    register(&client, "Bob", "bob@x.com", "secret2").await;
    let ann_token = login_token(&client, "ann@x.com", "secret1").await;
    let bob_token = login_token(&client, "bob@x.com", "secret2").await;

    let anns_note = create_note(&client, &ann_token, "T1", "C1").await;
    let note_id = anns_note["id"].as_str().unwrap();

    let foreign = client.get(format!("/api/notes/{note_id}"))
        .header(bearer(&bob_token))
        .dispatch()
        .await;
    assert_eq!(foreign.status(), Status::NotFound);
    let foreign_body = json_body(foreign).await;

    let absent = client.get(format!("/api/notes/{}", Uuid::new_v4()))
        .header(bearer(&bob_token))
        .dispatch()
        .await;
    assert_eq!(absent.status(), Status::NotFound);
    assert_eq!(json_body(absent).await, foreign_body);

    let update = client.put(format!("/api/notes/{note_id}"))
        .header(ContentType::JSON)
        .header(bearer(&bob_token))
        .body(r#"{"title":"stolen"}"#)
        .dispatch()
        .await;
    assert_eq!(update.status(), Status::NotFound);

    let delete = client.delete(format!("/api/notes/{note_id}"))
        .header(bearer(&bob_token))
        .dispatch()
        .await;
    assert_eq!(delete.status(), Status::NotFound);

    let (content_type, body) = multipart_image("cat.png", b"png bytes");
    let upload = client.post(format!("/api/notes/{note_id}/upload"))
        .header(content_type)
        .header(bearer(&bob_token))
        .body(body)
        .dispatch()
        .await;
    assert_eq!(upload.status(), Status::NotFound);

    // bob's listing stays empty, ann's note is untouched
    let response = client.get("/api/notes").header(bearer(&bob_token)).dispatch().await;
    assert_eq!(json_body(response).await["notes"], serde_json::json!([]));
    let response = client.get(format!("/api/notes/{note_id}"))
        .header(bearer(&ann_token))
        .dispatch()
        .await;
    let note = json_body(response).await;
    assert_eq!(note["title"], "T1");
    assert!(note.get("image_url").is_none());
}

#[tokio::test]
async fn image_upload_flow() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;
    let token = login_token(&client, "ann@x.com", "secret1").await;
    let note = create_note(&client, &token, "T1", "C1").await;
    let note_id = note["id"].as_str().unwrap();

    // extension matching is case-sensitive
    for bad in ["cat.txt", "cat", "cat.PNG", "cat.Jpg"] {
        let (content_type, body) = multipart_image(bad, b"bytes");
        let response = client.post(format!("/api/notes/{note_id}/upload"))
            .header(content_type)
            .header(bearer(&token))
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "filename: {bad}");
    }

    // a form without the image field is a validation error too
    let response = client.post(format!("/api/notes/{note_id}/upload"))
        .header(ContentType::parse_flexible(
            "multipart/form-data; boundary=empty-boundary",
        ).unwrap())
        .header(bearer(&token))
        .body("--empty-boundary--\r\n")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let (content_type, body) = multipart_image("cat.png", b"png bytes");
    let response = client.post(format!("/api/notes/{note_id}/upload"))
        .header(content_type)
        .header(bearer(&token))
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated = json_body(response).await;
    let image_url = updated["image_url"].as_str().expect("no image reference");
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(&format!("_{note_id}.png")));

    // the stored file is served back
    let response = client.get(image_url).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.into_bytes().await.expect("no file body"),
        b"png bytes",
    );
}

#[tokio::test]
async fn credential_material_never_leaves_the_server() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;

    let response = register(&client, "Ann", "ann@x.com", "secret1").await;
    let registered = json_body(response).await;
    assert!(registered["user"].get("hash").is_none());
    assert!(registered["user"].get("password").is_none());

    let response = client.post("/api/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"email":"ann@x.com","password":"secret1"}"#)
        .dispatch()
        .await;
    let logged_in = json_body(response).await;
    assert!(logged_in["user"].get("hash").is_none());
    assert!(logged_in["user"].get("password").is_none());
}

#[tokio::test]
async fn unparseable_note_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let client = make_client(&dir).await;
    register(&client, "Ann", "ann@x.com", "secret1").await;
    let token = login_token(&client, "ann@x.com", "secret1").await;

    let response = client.get("/api/notes/not-a-uuid")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}
