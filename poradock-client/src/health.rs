//! Service health probe.

use crate::client::{Endpoint, LogClient};
use crate::error::Result;
use crate::types::ApiResponse;

impl LogClient {
    /// Probe the service health endpoint (`GET {base}/health`).
    ///
    /// Follows the same silent-error policy as every other call. The body is
    /// whatever the server sends; use [`ApiResponse::json`] to inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`](crate::ClientError::Transport) if
    /// the request fails and silent errors are disabled.
    pub async fn health(&self) -> Result<Option<ApiResponse>> {
        self.get(Endpoint::Health).await
    }
}
