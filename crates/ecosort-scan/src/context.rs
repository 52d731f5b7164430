// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request context passed explicitly through the pipeline.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Cancellation and correlation for one scan.
///
/// The gateway cancels `cancel` when the client disconnects; the CLI ties it
/// to Ctrl-C.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub cancel: CancellationToken,
    pub request_id: String,
}

impl ScanContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

/// Cancels the wrapped token when dropped.
///
/// Held by a request handler so that an abandoned request future (client went
/// away) cancels the scan it started.
pub struct CancelOnDrop(pub CancellationToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
