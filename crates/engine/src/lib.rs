pub use auth_form::{AuthForm, AuthFormState, AuthMode, AuthView};
pub use error::EngineError;
pub use expenses::{CategoryFilter, ExpenseDraft, ExpenseManager, ExpenseState};
pub use gateway::{
    CODE_EMAIL_ALREADY_IN_USE, IdentityError, IdentityGateway, RecordStore, StoreError,
};
pub use money::{MoneyCents, MoneyParseError};
pub use session::{AuthedUser, Session, SessionWriter};

mod auth_form;
mod error;
mod expenses;
mod gateway;
mod money;
pub mod session;
pub mod validate;
