use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use crate::models::{FormData, SubmissionReceipt};

/// Errors that can occur when handing a form to a transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),

    #[error("Submission cancelled")]
    Cancelled,

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Delivers a validated form somewhere
///
/// Called at most once per submit attempt. Implementations should resolve
/// promptly; the submitter enforces its own timeout on top.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, data: &FormData) -> Result<SubmissionReceipt, TransportError>;
}

/// Local stand-in for a real delivery endpoint
///
/// Waits a fixed delay, then fails with probability `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedTransport {
    /// `failure_rate` is clamped to `0.0..=1.0`; NaN never fails
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };

        Self { delay, failure_rate }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), 0.1)
    }
}

#[async_trait]
impl SubmissionTransport for SimulatedTransport {
    async fn submit(&self, data: &FormData) -> Result<SubmissionReceipt, TransportError> {
        tokio::time::sleep(self.delay).await;

        tracing::debug!("Form submitted: {:?}", data);

        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            return Err(TransportError::Unavailable("Simulated error".to_string()));
        }

        Ok(SubmissionReceipt::new())
    }
}
