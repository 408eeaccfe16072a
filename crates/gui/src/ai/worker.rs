//! Background runtime that runs API calls off the UI thread.
//!
//! The UI hands jobs to [`Dispatch::dispatch`] and drains finished
//! [`ApiEvent`]s once per frame with [`ApiWorker::poll`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use shared::{ChatCompletionRequest, KeyCheck};

use super::{ApiClient, ApiError};

/// Work item for the network worker
pub enum ApiJob {
    CheckKey {
        base_url: String,
        api_key: String,
    },
    Complete {
        id: u64,
        base_url: String,
        api_key: String,
        request: ChatCompletionRequest,
    },
}

impl ApiJob {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiJob::CheckKey { .. } => "check_key",
            ApiJob::Complete { .. } => "complete",
        }
    }
}

/// Finished work item
#[derive(Debug)]
pub enum ApiEvent {
    KeyChecked(Result<KeyCheck, ApiError>),
    Completed {
        id: u64,
        result: Result<String, ApiError>,
    },
}

/// Something that accepts API jobs.
///
/// An `Err` means the job was dropped and no [`ApiEvent`] will follow.
pub trait Dispatch {
    fn dispatch(&mut self, job: ApiJob) -> Result<(), ApiError>;
}

impl<D: Dispatch> Dispatch for Option<D> {
    fn dispatch(&mut self, job: ApiJob) -> Result<(), ApiError> {
        match self {
            Some(inner) => inner.dispatch(job),
            None => {
                tracing::error!("No network worker, dropping {} job", job.kind());
                Err(ApiError::NoWorker)
            }
        }
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Owns a tokio runtime and a reusable HTTP client
pub struct ApiWorker {
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
    tx: Sender<ApiEvent>,
    rx: Receiver<ApiEvent>,
    waker: Option<Waker>,
}

impl ApiWorker {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("api-worker")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            runtime,
            http: reqwest::Client::new(),
            tx,
            rx,
            waker: None,
        })
    }

    /// Called after each finished job, e.g. to request a UI repaint
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Drain all events finished since the last call
    pub fn poll(&self) -> Vec<ApiEvent> {
        self.rx.try_iter().collect()
    }
}

impl Dispatch for ApiWorker {
    fn dispatch(&mut self, job: ApiJob) -> Result<(), ApiError> {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        tracing::debug!("Dispatching {} job", job.kind());

        self.runtime.spawn(async move {
            let event = run_job(http, job).await;
            if tx.send(event).is_err() {
                tracing::warn!("API event dropped: receiver is gone");
            }
            if let Some(wake) = waker {
                wake();
            }
        });
        Ok(())
    }
}

async fn run_job(http: reqwest::Client, job: ApiJob) -> ApiEvent {
    match job {
        ApiJob::CheckKey { base_url, api_key } => {
            let client = ApiClient::with_client(http, base_url);
            ApiEvent::KeyChecked(client.check_key(&api_key).await)
        }
        ApiJob::Complete {
            id,
            base_url,
            api_key,
            request,
        } => {
            let client = ApiClient::with_client(http, base_url);
            ApiEvent::Completed {
                id,
                result: client.complete(&api_key, &request).await,
            }
        }
    }
}
