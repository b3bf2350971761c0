use crate::config::CleanupConfig;
use crate::error::AppError;
use crate::storage::MessageStore;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::Instrument;

/// Purges messages that have been expired for longer than the audit
/// retention window. Expired-but-retained records stay invisible to viewers
/// (expiry is checked on every read) while the owner can still pull stats.
#[derive(Debug)]
pub struct MessageCleanupWorker {
    store: Arc<dyn MessageStore>,
    config: CleanupConfig,
}

impl MessageCleanupWorker {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, config: CleanupConfig) -> Self {
        Self { store, config }
    }

    pub async fn run(self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.perform_cleanup()
                        .instrument(tracing::info_span!("message_cleanup_iteration"))
                        .await
                    {
                        tracing::error!(error = ?e, "Message cleanup iteration failed");
                    }
                }
                _ = shutdown.changed() => {}
            }
        }
        tracing::info!("Message cleanup loop shutting down...");
    }

    /// Removes messages whose expiry predates the retention cutoff.
    ///
    /// # Errors
    /// Returns an error if the store cannot be reached.
    #[tracing::instrument(skip(self), err, fields(purged = tracing::field::Empty))]
    pub async fn perform_cleanup(&self) -> Result<(), AppError> {
        let cutoff = OffsetDateTime::now_utc() - time::Duration::days(self.config.audit_retention_days);
        tracing::debug!(cutoff = %cutoff, "Running expired-message purge...");

        let count = self.store.purge_expired_before(cutoff).await?;
        if count > 0 {
            tracing::info!(count = %count, "Purged expired messages");
            tracing::Span::current().record("purged", count);
        }

        Ok(())
    }
}
