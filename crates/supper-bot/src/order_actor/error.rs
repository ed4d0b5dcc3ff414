//! Error types for the Order actor.

use crate::model::PaymentStatus;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order already exists: {0}")]
    AlreadyExists(String),

    #[error("Order validation error: {0}")]
    ValidationError(String),

    #[error("Order {order_id}: payment is {from:?}, cannot verify")]
    InvalidTransition {
        order_id: String,
        from: PaymentStatus,
    },

    #[error("Order database error: {0}")]
    DatabaseError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
