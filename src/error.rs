//! Error types for session and acknowledgment coordination
//!
//! This module defines a custom error type for bridge operations, providing
//! better type safety and more informative error messages than using
//! `Box<dyn std::error::Error>`. The variants mirror the failure domains of
//! the coordinator: connection/session setup, message translation,
//! acknowledgment resolution, and listener dispatch.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during bridge operations
#[derive(Error, Debug)]
pub enum JmsError {
    /// Session, producer, or consumer could not be created on the
    /// underlying provider connection
    #[error("connection error: {0}")]
    Connection(String),

    /// Raw provider message could not be converted to the internal
    /// representation, or vice versa
    #[error("translation error: {0}")]
    Translation(String),

    /// Commit, rollback, or acknowledge call on the provider session failed
    #[error("acknowledgment error: {0}")]
    Acknowledgment(String),

    /// The registered listener violated its dispatch contract
    #[error("listener error: {0}")]
    Listener(String),

    /// Operation attempted on a handle whose resources have been released
    #[error("session is closed")]
    SessionClosed,

    /// No correlated reply arrived within the caller-supplied timeout
    #[error("no reply received within {0:?}")]
    ReplyTimeout(Duration),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal coordination error
    #[error("internal error: {0}")]
    Internal(String),

    /// IO error occurred while spawning or joining worker threads
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl JmsError {
    /// Shorthand constructor for [`JmsError::Connection`]
    pub fn connection(msg: impl Into<String>) -> Self {
        JmsError::Connection(msg.into())
    }

    /// Shorthand constructor for [`JmsError::Translation`]
    pub fn translation(msg: impl Into<String>) -> Self {
        JmsError::Translation(msg.into())
    }

    /// Shorthand constructor for [`JmsError::Acknowledgment`]
    pub fn acknowledgment(msg: impl Into<String>) -> Self {
        JmsError::Acknowledgment(msg.into())
    }

    /// Shorthand constructor for [`JmsError::Listener`]
    pub fn listener(msg: impl Into<String>) -> Self {
        JmsError::Listener(msg.into())
    }

    /// Whether this error is severe enough to stop a delivery thread.
    ///
    /// Only connection failures and translation failures on a transacted
    /// session abort the delivery loop. Everything else is recovered
    /// locally: the message is left for provider redelivery and the loop
    /// continues with the next message.
    pub fn is_fatal_for_delivery(&self, transacted: bool) -> bool {
        match self {
            JmsError::Connection(_) => true,
            JmsError::Translation(_) => transacted,
            JmsError::Acknowledgment(_)
            | JmsError::Listener(_)
            | JmsError::SessionClosed
            | JmsError::ReplyTimeout(_)
            | JmsError::InvalidConfig(_)
            | JmsError::Internal(_)
            | JmsError::Io(_) => false,
        }
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, JmsError>;
