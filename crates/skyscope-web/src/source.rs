//! HTTP data source: one POST per sync request.

use gloo_net::http::Request;
use skyscope_engine::{decode_response, error_message, DataSource, SyncError, SyncRequest, SyncResponse};
use wasm_bindgen_futures::spawn_local;

/// Posts sync requests to `endpoint` and hands the result back to the
/// runner once the fetch settles.
pub struct HttpSource {
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

impl DataSource for HttpSource {
    fn send(&mut self, seq: u64, request: SyncRequest) {
        let endpoint = self.endpoint.clone();
        spawn_local(async move {
            let result = post_sync(&endpoint, &request).await;
            if crate::with_runner(|r| r.complete_sync(seq, result)).is_none() {
                log::warn!("sync #{seq} finished after the view was torn down");
            }
        });
    }
}

async fn post_sync(endpoint: &str, request: &SyncRequest) -> Result<SyncResponse, SyncError> {
    let body = request.to_json()?;
    let resp = Request::post(endpoint)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(|e| SyncError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| SyncError::Transport(e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| SyncError::Transport(e.to_string()))?;

    if !resp.ok() {
        let status = resp.status();
        return Err(match error_message(&text) {
            Some(msg) => {
                log::warn!("HTTP {status}: {msg}");
                SyncError::Server(msg)
            }
            None => SyncError::Status(status),
        });
    }
    decode_response(&text)
}
