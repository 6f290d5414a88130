//! Test server harness.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use grader::gateway::{HandlerState, create_router_with_state};
use grader::ocr::MockOcr;
use grader::scoring::SimilarityScorer;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const DEFAULT_OCR_TEXT: &str = "The mitochondria is the powerhouse of the cell";

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub data_dir: Option<std::path::PathBuf>,
    pub ocr_text: String,
    pub max_upload_bytes: Option<usize>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            ocr_text: DEFAULT_OCR_TEXT.to_string(),
            max_upload_bytes: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub data_dir: std::path::PathBuf,
    pub ocr: MockOcr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server with the stub embedder and a canned-text OCR backend on an
/// ephemeral port.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let (data_dir, temp_dir) = match config.data_dir {
        Some(path) => (path, None),
        None => {
            let temp_dir =
                TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
            (temp_dir.path().to_path_buf(), Some(temp_dir))
        }
    };

    let scorer =
        SimilarityScorer::stub().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let ocr = MockOcr::new(config.ocr_text);

    let mut state = HandlerState::new(data_dir.clone(), Arc::new(scorer), Arc::new(ocr.clone()));
    if let Some(limit) = config.max_upload_bytes {
        state = state.with_upload_limit(limit);
    }
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        data_dir,
        ocr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir: temp_dir,
    })
}
