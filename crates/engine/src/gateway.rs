//! Contracts for the two external collaborators: the identity gateway
//! and the record store. The application is a client of both; concrete
//! implementations live in the `client` crate, and tests drive the
//! components with in-memory fakes.

use api_types::{
    expense::{ExpenseFields, ExpensePatch, ExpenseRecord},
    user::UserView,
};
use async_trait::async_trait;
use thiserror::Error;

/// The failure code the gateway reports when registering an email that
/// already has an account.
pub const CODE_EMAIL_ALREADY_IN_USE: &str = "email-already-in-use";

/// Failure of an identity-gateway operation.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The gateway rejected the operation. `message` is the gateway's
    /// own wording and is shown to the user verbatim unless `code`
    /// matches a known case.
    #[error("{message}")]
    Rejected {
        code: Option<String>,
        message: String,
    },
    #[error("identity gateway unreachable: {0}")]
    Transport(String),
}

impl IdentityError {
    /// Returns `true` for the one rejection the auth form maps to a
    /// friendly message.
    #[must_use]
    pub fn is_email_already_in_use(&self) -> bool {
        matches!(
            self,
            Self::Rejected { code: Some(code), .. } if code == CODE_EMAIL_ALREADY_IN_USE
        )
    }
}

/// Failure of a record-store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Rejected(String),
    #[error("record store unreachable: {0}")]
    Transport(String),
}

/// Identity gateway operations consumed by the auth form.
///
/// Implementations own the session write half and must publish every
/// auth-state transition there: a successful `register` (the gateway
/// signs the newly created user in as a side effect), `sign_in` and
/// `sign_in_federated` publish the user; `sign_out` publishes `None`.
#[async_trait]
pub trait IdentityGateway {
    async fn register(&self, email: &str, password: &str) -> Result<UserView, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserView, IdentityError>;

    /// Federated sign-in. The gateway owns the whole provider
    /// interaction; the caller only names the provider.
    async fn sign_in_federated(&self, provider: &str) -> Result<UserView, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Record store operations consumed by the expense manager.
///
/// The store addresses documents by opaque ids it assigns on creation.
/// Update and delete trust the id alone; ownership is only enforced by
/// the caller always operating within the owner's session.
#[async_trait]
pub trait RecordStore {
    /// Creates a document and returns its store-assigned id.
    async fn create(&self, fields: ExpenseFields) -> Result<String, StoreError>;

    /// All documents whose `owner` equals the given id, in store order.
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<ExpenseRecord>, StoreError>;

    async fn update(&self, id: &str, patch: ExpensePatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
