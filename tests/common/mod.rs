use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use log::{LevelFilter, Log, Metadata, Record};
use logclean::sink::Sink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A response the mock cluster sends back.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn new(status: u16, body: &str) -> Self {
        Reply { status, body: body.to_string(), delay: Duration::ZERO }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Route = dyn Fn(&str, &str) -> Reply + Send + Sync;

struct ClusterState {
    route: Box<Route>,
    requests: Mutex<Vec<String>>,
    deletes_in_flight: AtomicUsize,
    max_deletes_in_flight: AtomicUsize,
}

/// Stands in for an elasticsearch node.
///
/// Every request is recorded as `METHOD /path?query` and answered with the
/// reply picked by the routing closure.
pub struct MockCluster {
    pub url: String,
    state: Arc<ClusterState>,
}

impl MockCluster {
    pub async fn start<F>(route: F) -> MockCluster
    where
        F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
    {
        let state = Arc::new(ClusterState {
            route: Box::new(route),
            requests: Mutex::new(Vec::new()),
            deletes_in_flight: AtomicUsize::new(0),
            max_deletes_in_flight: AtomicUsize::new(0),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockCluster { url: format!("http://{}", addr), state }
    }

    /// Always answer with the same reply.
    pub async fn fixed(status: u16, body: &str) -> MockCluster {
        let reply = Reply::new(status, body);
        MockCluster::start(move |_, _| reply.clone()).await
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Highest number of DELETE requests that were being served at once.
    pub fn max_deletes_in_flight(&self) -> usize {
        self.state.max_deletes_in_flight.load(Ordering::SeqCst)
    }
}

async fn handle(
    State(state): State<Arc<ClusterState>>, method: Method, uri: Uri,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", method, path));
    let reply = (state.route)(method.as_str(), &path);

    let delete = method == Method::DELETE;
    if delete {
        let now = state.deletes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_deletes_in_flight.fetch_max(now, Ordering::SeqCst);
    }
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    if delete {
        state.deletes_in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    let status = StatusCode::from_u16(reply.status).unwrap();
    (
        status,
        [
            ("content-type", "text/plain"),
            ("x-elastic-product", "Elasticsearch"),
        ],
        reply.body,
    )
        .into_response()
}

/// Sink keeping every record in memory as `LEVEL message`.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<String>>>);

impl Capture {
    pub fn sink(&self) -> Arc<Sink> {
        Arc::new(Sink::new(Box::new(self.clone()), LevelFilter::Info))
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}
