use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use crate::core::{form_data, FormValidator};
use crate::models::{FormField, FormReport, SubmissionReceipt};
use crate::services::transport::{SubmissionTransport, TransportError};

pub const SUCCESS_MESSAGE: &str =
    "Thank you for contacting us! We'll get back to you within 24 hours.";
pub const FAILURE_MESSAGE: &str =
    "Sorry, there was an error submitting your form. Please try again or call us directly.";

/// Observable state of a form's submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    /// Success message is showing; reverts to `Idle` after the display timeout
    Succeeded,
}

/// Result of one submit attempt
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Another attempt is still running; nothing was started
    InFlight,
    /// At least one field has a blocking error
    Blocked(FormReport),
    Succeeded {
        receipt: SubmissionReceipt,
        report: FormReport,
        message: &'static str,
    },
    Failed {
        error: TransportError,
        message: &'static str,
    },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Validating,
    Submitting,
    Succeeded(Instant),
}

/// Drives one form through validate -> submit
///
/// At most one attempt is in flight at a time; a second `submit` while one is
/// running returns [`SubmitOutcome::InFlight`]. Transport failures, timeouts
/// and cancellations come back as [`SubmitOutcome::Failed`] and leave the
/// form idle for a manual retry.
pub struct FormSubmitter {
    validator: FormValidator,
    transport: Arc<dyn SubmissionTransport>,
    timeout: Duration,
    success_display: Duration,
    in_flight: AtomicBool,
    phase: Mutex<Phase>,
    cancel: Notify,
}

impl FormSubmitter {
    pub fn new(validator: FormValidator, transport: Arc<dyn SubmissionTransport>) -> Self {
        Self {
            validator,
            transport,
            timeout: Duration::from_secs(10),
            success_display: Duration::from_secs(10),
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(Phase::Idle),
            cancel: Notify::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_success_display(mut self, success_display: Duration) -> Self {
        self.success_display = success_display;
        self
    }

    pub fn state(&self) -> SubmissionState {
        match *self.lock_phase() {
            Phase::Idle => SubmissionState::Idle,
            Phase::Validating => SubmissionState::Validating,
            Phase::Submitting => SubmissionState::Submitting,
            Phase::Succeeded(at) if at.elapsed() >= self.success_display => SubmissionState::Idle,
            Phase::Succeeded(_) => SubmissionState::Succeeded,
        }
    }

    /// Mirrors the disabled state of the submit control
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Abort the attempt currently waiting on the transport, if any
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    pub async fn submit(&self, fields: &[FormField]) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(self) else {
            tracing::debug!("Submit ignored: an attempt is already in flight");
            return SubmitOutcome::InFlight;
        };

        self.set_phase(Phase::Validating);
        let report = self.validator.validate_form(fields);
        if !report.is_submittable() {
            self.set_phase(Phase::Idle);
            return SubmitOutcome::Blocked(report);
        }

        let data = form_data(fields);

        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        self.set_phase(Phase::Submitting);

        let result = tokio::select! {
            res = tokio::time::timeout(self.timeout, self.transport.submit(&data)) => {
                res.unwrap_or(Err(TransportError::Timeout(self.timeout)))
            }
            _ = &mut cancelled => Err(TransportError::Cancelled),
        };

        match result {
            Ok(receipt) => {
                tracing::info!("Form submission {} accepted", receipt.submission_id);
                self.set_phase(Phase::Succeeded(Instant::now()));
                SubmitOutcome::Succeeded {
                    receipt,
                    report,
                    message: SUCCESS_MESSAGE,
                }
            }
            Err(error) => {
                tracing::error!("Form submission error: {}", error);
                self.set_phase(Phase::Idle);
                SubmitOutcome::Failed {
                    error,
                    message: FAILURE_MESSAGE,
                }
            }
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: Phase) {
        *self.lock_phase() = phase;
    }
}

/// Holds the single-flight flag; released even if the submit future is dropped
struct InFlightGuard<'a> {
    submitter: &'a FormSubmitter,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(submitter: &'a FormSubmitter) -> Option<Self> {
        submitter
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { submitter })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut phase = self.submitter.lock_phase();
            if matches!(*phase, Phase::Validating | Phase::Submitting) {
                *phase = Phase::Idle;
            }
        }
        self.submitter.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ServiceAreaDirectory;
    use crate::models::FormData;
    use crate::services::transport::SimulatedTransport;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Counts calls and delegates to a simulated transport
    struct CountingTransport {
        inner: SimulatedTransport,
        calls: AtomicUsize,
    }

    impl CountingTransport {
        fn new(delay: Duration, failure_rate: f64) -> Arc<Self> {
            Arc::new(Self {
                inner: SimulatedTransport::new(delay, failure_rate),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubmissionTransport for CountingTransport {
        async fn submit(&self, data: &FormData) -> Result<SubmissionReceipt, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.submit(data).await
        }
    }

    fn submitter(transport: Arc<CountingTransport>) -> FormSubmitter {
        let validator = FormValidator::new(Arc::new(ServiceAreaDirectory::central_oregon()));
        FormSubmitter::new(validator, transport)
    }

    fn valid_fields() -> Vec<FormField> {
        vec![
            FormField::new("name", "text", "Jane Doe").required(),
            FormField::new("email", "email", "jane@example.com").required(),
            FormField::new("phone", "tel", "(541) 555-1234"),
            FormField::new("zip", "text", "97701"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submission() {
        let transport = CountingTransport::new(Duration::from_millis(1500), 0.0);
        let submitter = submitter(transport.clone()).with_success_display(Duration::from_secs(10));

        let outcome = submitter.submit(&valid_fields()).await;

        assert!(outcome.is_success());
        assert_eq!(transport.calls(), 1);
        assert_eq!(submitter.state(), SubmissionState::Succeeded);
        assert!(!submitter.is_in_flight());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(submitter.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_submission_never_reaches_transport() {
        let transport = CountingTransport::new(Duration::from_millis(1500), 0.0);
        let submitter = submitter(transport.clone());

        let fields = vec![FormField::new("email", "email", "not-an-email").required()];
        let outcome = submitter.submit(&fields).await;

        match outcome {
            SubmitOutcome::Blocked(report) => assert_eq!(report.errors().count(), 1),
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(transport.calls(), 0);
        assert_eq!(submitter.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_does_not_block() {
        let transport = CountingTransport::new(Duration::from_millis(10), 0.0);
        let submitter = submitter(transport.clone());

        let fields = vec![FormField::new("zip", "text", "99999").required()];
        match submitter.submit(&fields).await {
            SubmitOutcome::Succeeded { report, .. } => assert_eq!(report.warnings().count(), 1),
            other => panic!("expected Succeeded, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_in_flight() {
        let transport = CountingTransport::new(Duration::from_millis(1500), 0.0);
        let submitter = submitter(transport.clone());
        let fields = valid_fields();

        let (first, second) = tokio::join!(submitter.submit(&fields), submitter.submit(&fields));

        assert!(first.is_success());
        assert!(matches!(second, SubmitOutcome::InFlight));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_returns_to_idle() {
        let transport = CountingTransport::new(Duration::from_millis(1500), 1.0);
        let submitter = submitter(transport.clone());

        match submitter.submit(&valid_fields()).await {
            SubmitOutcome::Failed { message, .. } => assert_eq!(message, FAILURE_MESSAGE),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(submitter.state(), SubmissionState::Idle);
        assert!(!submitter.is_in_flight());

        // Manual resubmission is allowed
        let outcome = submitter.submit(&valid_fields()).await;
        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let transport = CountingTransport::new(Duration::from_secs(60), 0.0);
        let submitter = submitter(transport).with_timeout(Duration::from_secs(5));

        match submitter.submit(&valid_fields()).await {
            SubmitOutcome::Failed { error, .. } => {
                assert_eq!(error, TransportError::Timeout(Duration::from_secs(5)))
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(submitter.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight() {
        let transport = CountingTransport::new(Duration::from_secs(5), 0.0);
        let submitter = submitter(transport);
        let fields = valid_fields();

        let (outcome, _) = tokio::join!(submitter.submit(&fields), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(submitter.state(), SubmissionState::Submitting);
            submitter.cancel();
        });

        match outcome {
            SubmitOutcome::Failed { error, .. } => assert_eq!(error, TransportError::Cancelled),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(!submitter.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_attempt_releases_guard() {
        let transport = CountingTransport::new(Duration::from_secs(60), 0.0);
        let submitter = submitter(transport).with_timeout(Duration::from_secs(120));

        let fields = valid_fields();
        let dropped = tokio::time::timeout(Duration::from_secs(1), submitter.submit(&fields)).await;

        assert!(dropped.is_err());
        assert!(!submitter.is_in_flight());
        assert_eq!(submitter.state(), SubmissionState::Idle);
    }
}
