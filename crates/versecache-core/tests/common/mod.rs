#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use versecache_core::{PoemSource, RemoteError, RemoteRecord, SyncOptions};

/// In-memory stand-in for the remote table.
pub struct ScriptedSource {
    records: Vec<RemoteRecord>,
    delay: Option<Duration>,
    failures: Mutex<VecDeque<RemoteError>>,
    always_fail: Option<fn() -> RemoteError>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn with_records(records: Vec<RemoteRecord>) -> Self {
        Self {
            records,
            delay: None,
            failures: Mutex::new(VecDeque::new()),
            always_fail: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_failing(error: fn() -> RemoteError) -> Self {
        Self {
            always_fail: Some(error),
            ..Self::with_records(Vec::new())
        }
    }

    /// Delay every fetch, to hold a sync in flight.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next fetches with these errors before returning records.
    pub fn failing_first(self, errors: Vec<RemoteError>) -> Self {
        *self.failures.lock().unwrap() = errors.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoemSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_all_poems(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.always_fail {
            return Err(error());
        }
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self.records.clone())
    }
}

pub fn fast_options() -> SyncOptions {
    SyncOptions {
        fetch_timeout: Duration::from_secs(5),
        max_retries: 2,
        initial_backoff: Duration::from_millis(1),
    }
}

/// The two-poem catalog used across tests.
pub fn dawn_and_dusk() -> Vec<RemoteRecord> {
    vec![
        RemoteRecord::new(1, "Dawn", "The sky turns grey, then gold.", Some("A")),
        RemoteRecord::new(2, "Dusk", "The light folds into the hills.", None),
    ]
}

pub fn catalog(k: i64) -> Vec<RemoteRecord> {
    (1..=k)
        .map(|id| {
            RemoteRecord::new(
                id,
                &format!("Poem {}", id),
                &format!("Body of poem {}", id),
                (id % 2 == 0).then_some("Even Author"),
            )
        })
        .collect()
}

/// Bind a local listener for an HTTP stand-in of the remote table.
async fn local_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    (listener, url)
}

/// Answer one request with a canned JSON response. The task resolves to the
/// raw request head it received.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let (listener, url) = local_listener().await;
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request_head(&mut socket).await;
        socket.write_all(response.as_bytes()).await.expect("write response");
        let _ = socket.shutdown().await;
        request
    });
    (url, task)
}

/// Accept connections and never answer. Counts accepted connections.
pub async fn serve_silence() -> (String, Arc<AtomicUsize>, JoinHandle<()>) {
    let (listener, url) = local_listener().await;
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    let task = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });
    (url, accepted, task)
}

async fn read_request_head(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.expect("read request");
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}
