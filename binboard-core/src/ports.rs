//! Trait describing the REST backend and the errors it can produce.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::{Error as JsonError, Value};

use crate::config::ConfigError;
use crate::query::{Query, Resource};

/// Untyped row as returned by the backend.
pub type Row = Value;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the backend.
pub enum PortError {
    /// Credentials are missing; no request was sent.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Backend answered with a non-2xx status.
    #[error("Error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text, shown to the user as-is.
        body: String,
    },
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Rows did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(#[from] JsonError),
}

#[async_trait]
/// Authenticated access to the table-as-resource REST surface.
pub trait RestPort: Send + Sync {
    /// Read the rows selected by `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when unconfigured, on transport failure, or on
    /// a non-2xx response.
    async fn get(&self, query: &Query) -> Result<Vec<Row>, PortError>;

    /// Insert `payload` into `resource` and return the created rows.
    ///
    /// # Errors
    ///
    /// Same contract as [`RestPort::get`].
    async fn post(&self, resource: Resource, payload: Row) -> Result<Vec<Row>, PortError>;
}
