use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense category.
///
/// The wire representation is the variant name as-is ("Food", "Bills",
/// ...), which is also what the record store persists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Food,
    Transport,
    Entertainment,
    Bills,
    Shopping,
    Others,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Bills,
        Self::Shopping,
        Self::Others,
    ];

    /// Returns the canonical category string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Others => "Others",
        }
    }
}

pub mod user {
    use super::*;

    /// The identity the gateway reports for a signed-in user.
    ///
    /// Issued exclusively by the gateway; the application only reads it.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub email: String,
        pub display_name: Option<String>,
    }

    /// Request body for registration and credential sign-in.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    /// Request body for the federated sign-in flow.
    ///
    /// The gateway owns the provider interaction (consent screen,
    /// redirect); the client only names the provider.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FederatedSignIn {
        pub provider: String,
    }

    /// Response body for every successful auth operation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthSuccess {
        pub user: UserView,
        /// Bearer token scoping subsequent record-store calls.
        pub token: String,
    }
}

pub mod expense {
    use super::*;

    /// The fields of an expense document.
    ///
    /// `owner` and `created_at` are set once at creation; the store
    /// assigns the document id.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseFields {
        pub owner: String,
        pub amount_cents: i64,
        pub category: Category,
        pub description: String,
        /// RFC3339 creation timestamp (UTC).
        pub created_at: DateTime<Utc>,
    }

    /// An expense document as returned by the store: the opaque
    /// store-assigned id plus the fields, flattened on the wire.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        pub id: String,
        #[serde(flatten)]
        pub fields: ExpenseFields,
    }

    /// Partial update for an existing document. Never touches `owner`,
    /// `created_at` or the id.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpensePatch {
        pub amount_cents: i64,
        pub category: Category,
        pub description: String,
    }

    /// Equality filter for the owner-scoped query.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseQuery {
        pub owner: String,
    }

    /// Response body for a create.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: String,
    }

    /// Response body for the owner query. Order is whatever the store
    /// returned; no sort key is guaranteed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseRecord>,
    }
}
