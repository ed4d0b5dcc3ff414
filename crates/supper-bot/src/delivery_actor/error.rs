//! Error types for the Delivery actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    #[error("Delivery session not found: {0}")]
    NotFound(String),

    #[error("Delivery validation error: {0}")]
    ValidationError(String),

    #[error("Delivery database error: {0}")]
    DatabaseError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for DeliveryError {
    fn from(msg: String) -> Self {
        DeliveryError::ActorCommunicationError(msg)
    }
}
