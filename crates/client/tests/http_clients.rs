mod support;

use std::sync::Arc;

use api_types::{Category, expense::ExpenseFields, expense::ExpensePatch};
use chrono::Utc;
use client::{IdentityClient, StoreClient};
use engine::{IdentityGateway, RecordStore, StoreError};
use support::{IdentityStub, StoreStub, spawn_identity, spawn_store};

async fn identity_client() -> (IdentityClient, Arc<IdentityStub>) {
    let state = Arc::new(IdentityStub::default());
    let addr = spawn_identity(state.clone()).await;
    let client = IdentityClient::new(&format!("http://{addr}"), "test-key").unwrap();
    (client, state)
}

fn fields(owner: &str, amount_cents: i64) -> ExpenseFields {
    ExpenseFields {
        owner: owner.to_string(),
        amount_cents,
        category: Category::Food,
        description: String::new(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn register_signs_the_user_in() {
    let (client, _state) = identity_client().await;
    let session = client.session();

    let user = client
        .register("user@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(user.email, "user@example.com");
    assert_eq!(session.current_user().map(|u| u.id), Some(user.id));
    assert!(session.token().is_some());
}

#[tokio::test]
async fn duplicate_registration_carries_the_known_code() {
    let (client, _state) = identity_client().await;
    client
        .register("user@example.com", "secret1")
        .await
        .unwrap();

    let err = client
        .register("user@example.com", "secret1")
        .await
        .unwrap_err();

    assert!(err.is_email_already_in_use());
    // The raw gateway wording is preserved for display.
    assert_eq!(err.to_string(), "EMAIL_EXISTS");
}

#[tokio::test]
async fn wrong_password_surfaces_the_raw_gateway_message() {
    let (client, _state) = identity_client().await;
    client
        .register("user@example.com", "secret1")
        .await
        .unwrap();
    client.sign_out().await.unwrap();

    let err = client
        .sign_in("user@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(!err.is_email_already_in_use());
    assert_eq!(err.to_string(), "INVALID_LOGIN_CREDENTIALS");
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn federated_sign_in_publishes_a_display_name() {
    let (client, _state) = identity_client().await;

    let user = client.sign_in_federated("google").await.unwrap();

    assert_eq!(user.display_name.as_deref(), Some("Federated User"));
    assert!(client.session().is_signed_in());
}

#[tokio::test]
async fn sign_out_clears_the_session_and_notifies_the_gateway() {
    let (client, state) = identity_client().await;
    client
        .register("user@example.com", "secret1")
        .await
        .unwrap();

    client.sign_out().await.unwrap();

    assert!(!client.session().is_signed_in());
    assert_eq!(*state.sign_outs.lock().unwrap(), 1);
}

#[tokio::test]
async fn store_calls_without_a_session_never_reach_the_network() {
    let (client, _identity_state) = identity_client().await;
    let store_state = Arc::new(StoreStub::default());
    let store_addr = spawn_store(store_state.clone()).await;
    let store = StoreClient::new(&format!("http://{store_addr}"), "test-key", client.session())
        .unwrap();

    let err = store.create(fields("u1", 100)).await.unwrap_err();

    assert!(matches!(err, StoreError::Unauthorized));
    assert!(store_state.documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn expense_documents_round_trip() {
    let (identity, _identity_state) = identity_client().await;
    let store_state = Arc::new(StoreStub::default());
    let store_addr = spawn_store(store_state.clone()).await;
    let store = StoreClient::new(
        &format!("http://{store_addr}"),
        "test-key",
        identity.session(),
    )
    .unwrap();

    let user = identity
        .register("user@example.com", "secret1")
        .await
        .unwrap();

    let id = store.create(fields(&user.id, 1250)).await.unwrap();
    let listed = store.list_for_owner(&user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].fields.amount_cents, 1250);

    store
        .update(
            &id,
            ExpensePatch {
                amount_cents: 2000,
                category: Category::Bills,
                description: "utilities".to_string(),
            },
        )
        .await
        .unwrap();
    let listed = store.list_for_owner(&user.id).await.unwrap();
    assert_eq!(listed[0].fields.amount_cents, 2000);
    assert_eq!(listed[0].fields.category, Category::Bills);

    store.delete(&id).await.unwrap();
    assert!(store.list_for_owner(&user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn queries_only_return_the_owners_documents() {
    let (identity, _identity_state) = identity_client().await;
    let store_state = Arc::new(StoreStub::default());
    let store_addr = spawn_store(store_state.clone()).await;
    let store = StoreClient::new(
        &format!("http://{store_addr}"),
        "test-key",
        identity.session(),
    )
    .unwrap();

    let user = identity
        .register("user@example.com", "secret1")
        .await
        .unwrap();
    store.create(fields(&user.id, 100)).await.unwrap();
    store.create(fields("somebody-else", 999)).await.unwrap();

    let listed = store.list_for_owner(&user.id).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fields.owner, user.id);
}

#[tokio::test]
async fn update_of_a_missing_document_maps_to_not_found() {
    let (identity, _identity_state) = identity_client().await;
    let store_state = Arc::new(StoreStub::default());
    let store_addr = spawn_store(store_state).await;
    let store = StoreClient::new(
        &format!("http://{store_addr}"),
        "test-key",
        identity.session(),
    )
    .unwrap();
    identity
        .register("user@example.com", "secret1")
        .await
        .unwrap();

    let err = store
        .update(
            "doc-does-not-exist",
            ExpensePatch {
                amount_cents: 100,
                category: Category::Food,
                description: String::new(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
}
