//! Fake published-sheet server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /sheet.csv` — the configured CSV body with the configured status
//!
//! # Example
//!
//! ```rust,no_run
//! let sheet = FakeSheetServer::start().await.unwrap();
//! sheet.publish("id,name\n1,Desk\n").await;
//! let url = sheet.csv_url();
//! ```

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

struct SheetState {
    status: StatusCode,
    body: Vec<u8>,
    hits: usize,
}

/// Handle to the running fake sheet server.
pub struct FakeSheetServer {
    addr: SocketAddr,
    state: Arc<Mutex<SheetState>>,
}

impl FakeSheetServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(SheetState {
            status: StatusCode::OK,
            body: Vec::new(),
            hits: 0,
        }));

        let app = Router::new()
            .route("/sheet.csv", get(serve_sheet))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// URL of the CSV export.
    pub fn csv_url(&self) -> String {
        format!("http://{}/sheet.csv", self.addr)
    }

    /// Serve `csv` with status 200.
    pub async fn publish(&self, csv: &str) {
        let mut state = self.state.lock().await;
        state.status = StatusCode::OK;
        state.body = csv.as_bytes().to_vec();
    }

    /// Serve an empty body with `status`.
    pub async fn fail_with(&self, status: StatusCode) {
        let mut state = self.state.lock().await;
        state.status = status;
        state.body.clear();
    }

    /// Serve raw bytes with status 200.
    pub async fn publish_bytes(&self, bytes: &[u8]) {
        let mut state = self.state.lock().await;
        state.status = StatusCode::OK;
        state.body = bytes.to_vec();
    }

    /// Number of requests served so far.
    pub async fn hits(&self) -> usize {
        self.state.lock().await.hits
    }
}

async fn serve_sheet(State(state): State<Arc<Mutex<SheetState>>>) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.hits += 1;
    (state.status, state.body.clone())
}
