use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use crate::config::SubmissionSettings;
use crate::core::FormValidator;
use crate::models::FormField;
use crate::services::submission::{FormSubmitter, SubmitOutcome};
use crate::services::transport::SubmissionTransport;

/// Upper bound on how long an idle session is kept
const MAX_SESSION_IDLE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// One [`FormSubmitter`] per browser form session
///
/// Idle submitters live in an in-memory cache and may be evicted. A session
/// with a request in progress is pinned outside the cache, so eviction can
/// never hand a second concurrent request a fresh submitter.
pub struct SubmitterRegistry {
    submitters: moka::future::Cache<String, Arc<FormSubmitter>>,
    // session id -> (submitter, requests currently using it)
    pinned: Mutex<HashMap<String, (Arc<FormSubmitter>, usize)>>,
    validator: FormValidator,
    transport: Arc<dyn SubmissionTransport>,
    timeout: Duration,
    success_display: Duration,
}

impl SubmitterRegistry {
    pub fn new(
        validator: FormValidator,
        transport: Arc<dyn SubmissionTransport>,
        settings: &SubmissionSettings,
    ) -> Self {
        let idle = settings
            .session_idle()
            .max(settings.timeout().saturating_mul(2))
            .min(MAX_SESSION_IDLE);

        let submitters = moka::future::CacheBuilder::new(settings.max_sessions)
            .time_to_idle(idle)
            .build();

        Self {
            submitters,
            pinned: Mutex::new(HashMap::new()),
            validator,
            transport,
            timeout: settings.timeout(),
            success_display: settings.success_display(),
        }
    }

    fn build_submitter(&self) -> FormSubmitter {
        FormSubmitter::new(self.validator.clone(), self.transport.clone())
            .with_timeout(self.timeout)
            .with_success_display(self.success_display)
    }

    fn lock_pinned(&self) -> MutexGuard<'_, HashMap<String, (Arc<FormSubmitter>, usize)>> {
        self.pinned.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submitter for `session_id`, created on first use
    pub async fn get(&self, session_id: &str) -> Arc<FormSubmitter> {
        if let Some((submitter, _)) = self.lock_pinned().get(session_id) {
            return submitter.clone();
        }

        self.submitters
            .get_with(session_id.to_string(), async {
                tracing::trace!("New form session: {}", session_id);
                Arc::new(self.build_submitter())
            })
            .await
    }

    /// Submit `fields` for a session
    ///
    /// Without a session id the attempt runs on a one-off submitter that is
    /// never stored.
    pub async fn submit(&self, session_id: Option<&str>, fields: &[FormField]) -> SubmitOutcome {
        let Some(session_id) = session_id else {
            return self.build_submitter().submit(fields).await;
        };

        let candidate = self.get(session_id).await;
        let pin = self.pin(session_id, candidate);
        pin.submitter.submit(fields).await
    }

    // The pinned submitter wins over `candidate` so every concurrent request
    // for a session shares one single-flight guard.
    fn pin(&self, session_id: &str, candidate: Arc<FormSubmitter>) -> SessionPin<'_> {
        let mut pinned = self.lock_pinned();
        let entry = pinned
            .entry(session_id.to_string())
            .or_insert((candidate, 0));
        entry.1 += 1;

        SessionPin {
            registry: self,
            session_id: session_id.to_string(),
            submitter: entry.0.clone(),
        }
    }

    /// Number of cached sessions after pending evictions are applied
    pub async fn session_count(&self) -> u64 {
        self.submitters.run_pending_tasks().await;
        self.submitters.entry_count()
    }

    pub fn pinned_count(&self) -> usize {
        self.lock_pinned().len()
    }
}

/// Keeps a session pinned for the lifetime of one request
struct SessionPin<'a> {
    registry: &'a SubmitterRegistry,
    session_id: String,
    submitter: Arc<FormSubmitter>,
}

impl Drop for SessionPin<'_> {
    fn drop(&mut self) {
        let mut pinned = self.registry.lock_pinned();
        if let Some(entry) = pinned.get_mut(&self.session_id) {
            entry.1 -= 1;
            if entry.1 == 0 {
                pinned.remove(&self.session_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ServiceAreaDirectory;
    use crate::services::SimulatedTransport;

    fn registry_with(settings: &SubmissionSettings, delay: Duration) -> SubmitterRegistry {
        let validator = FormValidator::new(Arc::new(ServiceAreaDirectory::central_oregon()));
        let transport = Arc::new(SimulatedTransport::new(delay, 0.0));
        SubmitterRegistry::new(validator, transport, settings)
    }

    fn registry() -> SubmitterRegistry {
        registry_with(&SubmissionSettings::default(), Duration::from_millis(10))
    }

    fn fields() -> Vec<FormField> {
        vec![FormField::new("email", "email", "jane@example.com").required()]
    }

    #[tokio::test]
    async fn test_same_session_shares_submitter() {
        let registry = registry();

        let a = registry.get("session-a").await;
        let again = registry.get("session-a").await;
        let b = registry.get("session-b").await;

        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_in_flight_session_survives_eviction() {
        let settings = SubmissionSettings {
            max_sessions: 1,
            ..SubmissionSettings::default()
        };
        let registry = registry_with(&settings, Duration::from_millis(800));
        let fields = fields();

        let (first, second) = tokio::join!(registry.submit(Some("a"), &fields), async {
            tokio::time::sleep(Duration::from_millis(50)).await;

            // Crowd "a" out of the cache while its attempt is still running
            for i in 0..200 {
                registry.get(&format!("other-{}", i)).await;
            }
            registry.submitters.run_pending_tasks().await;

            assert!(registry.get("a").await.is_in_flight());
            registry.submit(Some("a"), &fields).await
        });

        assert!(first.is_success());
        assert!(matches!(second, SubmitOutcome::InFlight));
        assert_eq!(registry.pinned_count(), 0);
    }

    #[tokio::test]
    async fn test_sessionless_submit_is_not_stored() {
        let registry = registry();

        for _ in 0..3 {
            assert!(registry.submit(None, &fields()).await.is_success());
        }

        assert_eq!(registry.session_count().await, 0);
        assert_eq!(registry.pinned_count(), 0);
    }

    #[test]
    fn test_huge_timeout_does_not_panic() {
        let settings = SubmissionSettings {
            timeout_secs: u64::MAX,
            session_idle_secs: u64::MAX,
            ..SubmissionSettings::default()
        };

        let registry = registry_with(&settings, Duration::from_millis(1));
        assert_eq!(registry.pinned_count(), 0);
    }
}
