//! The module contains the errors the engine can throw.
use thiserror::Error;

use crate::{
    gateway::{IdentityError, StoreError},
    money::MoneyParseError,
};

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyParseError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
