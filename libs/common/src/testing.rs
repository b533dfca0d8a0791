//! Stub API server for tests
//!
//! Wraps an axum router on an ephemeral local port and counts every request
//! that reaches it, so tests can assert that a flow issued no HTTP call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// A running stub of the remote API
pub struct StubServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Serve `router` on 127.0.0.1 with an OS-assigned port
    pub async fn start(router: Router) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = router.layer(middleware::from_fn_with_state(hits.clone(), count_hits));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener
            .local_addr()
            .expect("Failed to read stub server address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            task,
        }
    }

    /// Base URL to configure the client with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn count_hits(State(hits): State<Arc<AtomicUsize>>, req: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

/// A base URL nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read throwaway address");
    drop(listener);
    format!("http://{}", addr)
}
