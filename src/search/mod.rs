mod controller;
mod http;

pub use controller::*;
pub use http::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Message surfaced to the caller for any non-cancellation failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

// ============================================================================
// Search Types
// ============================================================================

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Why a fetch did not produce results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request was superseded or the controller was torn down.
    #[error("request cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Derived status of a controller snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Error,
}

/// Everything the caller can observe about a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<SearchItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SearchSnapshot {
    pub fn status(&self) -> SearchStatus {
        if self.is_loading {
            SearchStatus::Loading
        } else if self.error.is_some() {
            SearchStatus::Error
        } else {
            SearchStatus::Idle
        }
    }
}

// ============================================================================
// Fetcher Trait
// ============================================================================

/// The remote collaborator a controller issues queries against.
///
/// Implementations should stop work when `cancel` fires and report
/// `FetchError::Cancelled`, but the controller never relies on it: a
/// superseded result is discarded regardless.
///
/// Return `FetchError::Cancelled` only after `cancel` has fired. The
/// controller treats it as a silent no-op and leaves the loading flag set,
/// so a spurious cancellation strands the current query in `Loading`.
#[async_trait]
pub trait SearchFetcher: Send + Sync + 'static {
    async fn fetch(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchItem>, FetchError>;
}
