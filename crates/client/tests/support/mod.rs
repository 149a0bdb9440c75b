//! In-process stand-ins for the two backend services, served over real
//! sockets so the HTTP clients are exercised end to end.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use api_types::{
    expense::{ExpenseFields, ExpensePatch, ExpenseQuery, ExpenseRecord},
    user::{Credentials, FederatedSignIn},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use uuid::Uuid;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[derive(Default)]
pub struct IdentityStub {
    /// email -> (user id, password)
    pub users: Mutex<HashMap<String, (String, String)>>,
    pub sign_outs: Mutex<u32>,
}

pub async fn spawn_identity(state: Arc<IdentityStub>) -> SocketAddr {
    let app = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/signin", post(sign_in))
        .route("/auth/federated", post(federated))
        .route("/auth/signout", post(sign_out))
        .with_state(state);
    spawn(app).await
}

fn auth_success(id: &str, email: &str, display_name: Option<&str>) -> Response {
    Json(json!({
        "user": { "id": id, "email": email, "display_name": display_name },
        "token": format!("token-{id}"),
    }))
    .into_response()
}

async fn register(
    State(state): State<Arc<IdentityStub>>,
    Json(body): Json<Credentials>,
) -> Response {
    let mut users = state.users.lock().unwrap();
    if users.contains_key(&body.email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "EMAIL_EXISTS", "code": "email-already-in-use" })),
        )
            .into_response();
    }
    let id = Uuid::new_v4().to_string();
    users.insert(body.email.clone(), (id.clone(), body.password));
    auth_success(&id, &body.email, None)
}

async fn sign_in(
    State(state): State<Arc<IdentityStub>>,
    Json(body): Json<Credentials>,
) -> Response {
    let users = state.users.lock().unwrap();
    match users.get(&body.email) {
        Some((id, password)) if *password == body.password => auth_success(id, &body.email, None),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "INVALID_LOGIN_CREDENTIALS" })),
        )
            .into_response(),
    }
}

async fn federated(
    State(state): State<Arc<IdentityStub>>,
    Json(body): Json<FederatedSignIn>,
) -> Response {
    let email = format!("user@{}.example.com", body.provider);
    let id = {
        let mut users = state.users.lock().unwrap();
        users
            .entry(email.clone())
            .or_insert_with(|| (Uuid::new_v4().to_string(), String::new()))
            .0
            .clone()
    };
    auth_success(&id, &email, Some("Federated User"))
}

async fn sign_out(State(state): State<Arc<IdentityStub>>) -> StatusCode {
    *state.sign_outs.lock().unwrap() += 1;
    StatusCode::NO_CONTENT
}

#[derive(Default)]
pub struct StoreStub {
    /// Documents in insertion order; the stub's "store order".
    pub documents: Mutex<Vec<ExpenseRecord>>,
    next_id: Mutex<u32>,
}

pub async fn spawn_store(state: Arc<StoreStub>) -> SocketAddr {
    let app = Router::new()
        .route("/documents/expenses", post(create_document))
        .route("/documents/expenses/query", post(query_documents))
        .route(
            "/documents/expenses/{id}",
            axum::routing::patch(update_document).delete(delete_document),
        )
        .with_state(state);
    spawn(app).await
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing bearer token" })),
    )
        .into_response()
}

fn bearer_missing(headers: &HeaderMap) -> bool {
    !headers.contains_key(header::AUTHORIZATION)
}

async fn create_document(
    State(state): State<Arc<StoreStub>>,
    headers: HeaderMap,
    Json(fields): Json<ExpenseFields>,
) -> Response {
    if bearer_missing(&headers) {
        return unauthorized();
    }
    let id = {
        let mut next_id = state.next_id.lock().unwrap();
        *next_id += 1;
        format!("doc-{next_id}")
    };
    state.documents.lock().unwrap().push(ExpenseRecord {
        id: id.clone(),
        fields,
    });
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn query_documents(
    State(state): State<Arc<StoreStub>>,
    headers: HeaderMap,
    Json(query): Json<ExpenseQuery>,
) -> Response {
    if bearer_missing(&headers) {
        return unauthorized();
    }
    let expenses: Vec<ExpenseRecord> = state
        .documents
        .lock()
        .unwrap()
        .iter()
        .filter(|record| record.fields.owner == query.owner)
        .cloned()
        .collect();
    Json(json!({ "expenses": expenses })).into_response()
}

async fn update_document(
    State(state): State<Arc<StoreStub>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ExpensePatch>,
) -> Response {
    if bearer_missing(&headers) {
        return unauthorized();
    }
    let mut documents = state.documents.lock().unwrap();
    match documents.iter_mut().find(|record| record.id == id) {
        Some(record) => {
            record.fields.amount_cents = patch.amount_cents;
            record.fields.category = patch.category;
            record.fields.description = patch.description;
            StatusCode::NO_CONTENT.into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no such document" })),
        )
            .into_response(),
    }
}

async fn delete_document(
    State(state): State<Arc<StoreStub>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if bearer_missing(&headers) {
        return unauthorized();
    }
    let mut documents = state.documents.lock().unwrap();
    let before = documents.len();
    documents.retain(|record| record.id != id);
    if documents.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no such document" })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
