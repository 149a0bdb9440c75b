pub mod add_expense;
pub mod auth;
pub mod dashboard;
