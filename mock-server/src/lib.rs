//! In-memory fake of the Forms v2, SCIM and Documents APIs.
//!
//! Only the resources the client's integration tests touch are modelled:
//! forms, folders, form submissions (echoed back), SCIM users and
//! documents with merges. Forms and SCIM routes require the bearer token
//! `FORMS_TOKEN`; document routes require Basic `DOCS_KEY:DOCS_SECRET`.
//! Error bodies are always JSON.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const FORMS_TOKEN: &str = "test-token";
pub const DOCS_KEY: &str = "test-key";
pub const DOCS_SECRET: &str = "test-secret";
pub const CREATED_AT: &str = "2024-01-01 00:00:00";

#[derive(Default)]
pub struct Store {
    next_id: u64,
    forms: BTreeMap<u64, Value>,
    folders: BTreeMap<u64, Value>,
    documents: BTreeMap<u64, Value>,
}

impl Store {
    fn insert(map: &mut BTreeMap<u64, Value>, next_id: &mut u64, fields: Value) -> Value {
        *next_id += 1;
        let id = *next_id;
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        record.insert("id".to_string(), json!(id));
        record.insert("created".to_string(), json!(CREATED_AT));
        let record = Value::Object(record);
        map.insert(id, record.clone());
        record
    }
}

pub type Db = Arc<RwLock<Store>>;

type Response = (StatusCode, Json<Value>);
type Reply = Result<Response, Response>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/v2/form.json", get(list_forms).post(create_form))
        .route(
            "/api/v2/form/{id}",
            get(get_form).put(update_form).delete(delete_form),
        )
        .route("/api/v2/form/{id}/{file}", get(get_form_resource))
        .route("/api/v2/folder.json", get(list_folders).post(create_folder))
        .route("/api/v2/folder/{id}", get(get_folder).delete(delete_folder))
        .route("/api/v2/broken.json", get(broken))
        .route("/scim/Users", get(list_users))
        .route("/api/documents", get(list_documents).post(create_document))
        .route("/api/documents/{id}", get(get_document))
        .route("/merge/{id}/{key}", post(merge_document))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "error": message })))
}

fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "The resource requested could not be found")
}

fn require_bearer(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {FORMS_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "Invalid or missing OAuth2 token")),
    }
}

fn require_basic(headers: &HeaderMap) -> Result<(), Response> {
    let encoded = general_purpose::STANDARD.encode(format!("{DOCS_KEY}:{DOCS_SECRET}"));
    let expected = format!("Basic {encoded}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "Invalid API key or secret")),
    }
}

/// `"42.json"` -> `42`. Anything else is treated as an unknown resource.
fn json_id(file: &str) -> Result<u64, Response> {
    file.strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or_else(not_found)
}

// --- forms ---

async fn list_forms(State(db): State<Db>, headers: HeaderMap) -> Reply {
    require_bearer(&headers)?;
    let store = db.read().await;
    let forms: Vec<Value> = store.forms.values().cloned().collect();
    Ok((StatusCode::OK, Json(json!({ "forms": forms, "total": forms.len() }))))
}

async fn create_form(State(db): State<Db>, headers: HeaderMap, Json(input): Json<Value>) -> Reply {
    require_bearer(&headers)?;
    if input.get("name").and_then(Value::as_str).is_none() {
        return Err(failure(StatusCode::BAD_REQUEST, "name is required"));
    }
    let mut store = db.write().await;
    let Store { next_id, forms, .. } = &mut *store;
    let form = Store::insert(forms, next_id, input);
    info!(id = %form["id"], "form created");
    Ok((StatusCode::CREATED, Json(form)))
}

async fn get_form(State(db): State<Db>, headers: HeaderMap, Path(file): Path<String>) -> Reply {
    require_bearer(&headers)?;
    let id = json_id(&file)?;
    let store = db.read().await;
    let form = store.forms.get(&id).cloned().ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(form)))
}

async fn update_form(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(file): Path<String>,
    Json(input): Json<Value>,
) -> Reply {
    require_bearer(&headers)?;
    let id = json_id(&file)?;
    let mut store = db.write().await;
    let form = store.forms.get_mut(&id).ok_or_else(not_found)?;
    if let (Value::Object(form), Value::Object(input)) = (&mut *form, input) {
        for (key, value) in input {
            if key != "id" {
                form.insert(key, value);
            }
        }
    }
    Ok((StatusCode::OK, Json(json!({ "id": id, "success": 1 }))))
}

async fn delete_form(State(db): State<Db>, headers: HeaderMap, Path(file): Path<String>) -> Reply {
    require_bearer(&headers)?;
    let id = json_id(&file)?;
    let mut store = db.write().await;
    store.forms.remove(&id).ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(json!({ "id": id, "success": 1 }))))
}

/// `form/{id}/{detail}.json`: `basic.json` returns the form, `submission.json`
/// echoes the query string and encryption password it was called with.
async fn get_form_resource(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((id, file)): Path<(u64, String)>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Reply {
    require_bearer(&headers)?;
    let store = db.read().await;
    let form = store.forms.get(&id).cloned().ok_or_else(not_found)?;
    match file.as_str() {
        "basic.json" => Ok((StatusCode::OK, Json(form))),
        "submission.json" => {
            let password = headers
                .get("x-fs-encryption-password")
                .and_then(|v| v.to_str().ok());
            Ok((
                StatusCode::OK,
                Json(json!({
                    "submissions": [],
                    "total": 0,
                    "query": query,
                    "encryption_password": password,
                })),
            ))
        }
        _ => Err(not_found()),
    }
}

// --- folders ---

async fn list_folders(State(db): State<Db>, headers: HeaderMap) -> Reply {
    require_bearer(&headers)?;
    let store = db.read().await;
    let folders: Vec<Value> = store.folders.values().cloned().collect();
    Ok((StatusCode::OK, Json(json!({ "folders": folders }))))
}

async fn create_folder(State(db): State<Db>, headers: HeaderMap, Json(input): Json<Value>) -> Reply {
    require_bearer(&headers)?;
    let mut store = db.write().await;
    let Store { next_id, folders, .. } = &mut *store;
    let folder = Store::insert(folders, next_id, input);
    Ok((StatusCode::CREATED, Json(folder)))
}

async fn get_folder(State(db): State<Db>, headers: HeaderMap, Path(file): Path<String>) -> Reply {
    require_bearer(&headers)?;
    let id = json_id(&file)?;
    let store = db.read().await;
    let folder = store.folders.get(&id).cloned().ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(folder)))
}

async fn delete_folder(State(db): State<Db>, headers: HeaderMap, Path(file): Path<String>) -> Reply {
    require_bearer(&headers)?;
    let id = json_id(&file)?;
    let mut store = db.write().await;
    store.folders.remove(&id).ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(json!({ "id": id, "success": 1 }))))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::OK, "not json{")
}

// --- scim ---

async fn list_users(headers: HeaderMap) -> Reply {
    require_bearer(&headers)?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
            "totalResults": 0,
            "Resources": [],
        })),
    ))
}

// --- documents ---

async fn list_documents(State(db): State<Db>, headers: HeaderMap) -> Reply {
    require_basic(&headers)?;
    let store = db.read().await;
    let documents: Vec<Value> = store.documents.values().cloned().collect();
    Ok((StatusCode::OK, Json(Value::Array(documents))))
}

async fn create_document(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Reply {
    require_basic(&headers)?;
    let mut store = db.write().await;
    let Store {
        next_id, documents, ..
    } = &mut *store;
    let mut document = Store::insert(documents, next_id, input);
    let key = format!("k{}", document["id"]);
    document["key"] = json!(key);
    if let Some(id) = document["id"].as_u64() {
        documents.insert(id, document.clone());
    }
    Ok((StatusCode::CREATED, Json(document)))
}

async fn get_document(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Reply {
    require_basic(&headers)?;
    let store = db.read().await;
    let document = store.documents.get(&id).cloned().ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(document)))
}

/// Merge endpoints are authenticated by the document key in the path.
async fn merge_document(
    State(db): State<Db>,
    Path((id, key)): Path<(u64, String)>,
    Json(_fields): Json<Value>,
) -> Reply {
    let store = db.read().await;
    let document = store.documents.get(&id).ok_or_else(not_found)?;
    if document["key"].as_str() != Some(key.as_str()) {
        return Err(failure(StatusCode::FORBIDDEN, "Invalid document key"));
    }
    Ok((StatusCode::CREATED, Json(json!({ "success": 1 }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_id_parses_numeric_stem() {
        assert_eq!(json_id("42.json").unwrap(), 42);
    }

    #[test]
    fn json_id_rejects_other_files() {
        assert_eq!(json_id("42").unwrap_err().0, StatusCode::NOT_FOUND);
        assert_eq!(json_id("abc.json").unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut map = BTreeMap::new();
        let mut next_id = 0;
        let first = Store::insert(&mut map, &mut next_id, json!({"name": "a"}));
        let second = Store::insert(&mut map, &mut next_id, json!({"name": "b"}));
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(second["created"], CREATED_AT);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn bearer_check_requires_exact_token() {
        let mut headers = HeaderMap::new();
        assert!(require_bearer(&headers).is_err());
        headers.insert(AUTHORIZATION, format!("Bearer {FORMS_TOKEN}").parse().unwrap());
        assert!(require_bearer(&headers).is_ok());
        assert!(require_basic(&headers).is_err());
    }
}
