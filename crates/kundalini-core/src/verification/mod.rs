//! Three-stage remote verification protocol.
//!
//! 1. `authenticate` trades credentials for a session token.
//! 2. `enumerate_data_handles` lists the data items visible to the session.
//! 3. `fetch_detail` asks whether one data item has any past requests.
//!
//! Every stage reports failure as a value (`None`, empty, `false`). Transport
//! and parse errors are logged and never reach the caller.

mod client;
pub mod envelopes;


pub use client::{HttpVerificationClient, DATA_BLOB_PATH, GET_INFORMATION_PATH, SIGNIN_PATH};

use async_trait::async_trait;
use kundalini_types::{DataHandle, Environment};

#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Session token on success, `None` on any failure.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        environment: Environment,
    ) -> Option<String>;

    /// Data handles visible to the session; empty on any failure.
    async fn enumerate_data_handles(&self, session: &str, environment: Environment)
        -> Vec<DataHandle>;

    /// Whether the handle has past requests in the lookback window.
    async fn fetch_detail(
        &self,
        session: &str,
        handle: &DataHandle,
        environment: Environment,
    ) -> bool;
}
