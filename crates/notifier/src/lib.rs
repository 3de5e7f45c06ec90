// Notification forwarding for contact submissions (Discord today)

pub mod discord;
pub mod error;

use async_trait::async_trait;
use site_kit_core::ContactSubmission;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub use discord::DiscordNotifier;
pub use error::{Error, Result};

/// What happened to a forwarded submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Nothing was sent; the reason is meant for logs
    Skipped(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> Result<Delivery>;
}

/// Run one notification, giving up after `timeout`
pub async fn forward_with_timeout(
    notifier: &dyn Notifier,
    submission: &ContactSubmission,
    timeout: Duration,
) -> Result<Delivery> {
    match tokio::time::timeout(timeout, notifier.notify(submission)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(timeout)),
    }
}

/// Forward a submission in the background.
///
/// The caller does not wait for delivery. Outcomes only show up in the logs;
/// an acknowledged submission is not a guarantee the notification arrived.
pub fn forward_detached(
    notifier: Arc<dyn Notifier>,
    submission: ContactSubmission,
    timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match forward_with_timeout(notifier.as_ref(), &submission, timeout).await {
            Ok(Delivery::Sent) => tracing::info!("contact notification delivered"),
            Ok(Delivery::Skipped(reason)) => {
                tracing::warn!(%reason, "contact notification skipped")
            }
            Err(Error::Timeout(after)) => {
                tracing::error!(?after, "contact notification timed out")
            }
            Err(e) => tracing::error!(error = %e, "contact notification failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _submission: &ContactSubmission) -> Result<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Delivery::Sent)
        }
    }

    struct SlowNotifier;

    #[async_trait]
    impl Notifier for SlowNotifier {
        async fn notify(&self, _submission: &ContactSubmission) -> Result<Delivery> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Delivery::Sent)
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _submission: &ContactSubmission) -> Result<Delivery> {
            Err(Error::Api {
                status: 401,
                message: "401: Unauthorized".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_forward_with_timeout_passes_result_through() {
        let notifier = CountingNotifier::default();
        let delivery = forward_with_timeout(
            &notifier,
            &ContactSubmission::default(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_forward_with_timeout_gives_up() {
        let result = forward_with_timeout(
            &SlowNotifier,
            &ContactSubmission::default(),
            Duration::from_millis(50),
        )
        .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_forward_detached_runs_once_per_submission() {
        let notifier = Arc::new(CountingNotifier::default());
        let submission = ContactSubmission {
            name: Some("Alice".to_string()),
            ..Default::default()
        };

        let first = forward_detached(notifier.clone(), submission.clone(), Duration::from_secs(1));
        let second = forward_detached(notifier.clone(), submission, Duration::from_secs(1));
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forward_detached_swallows_failures() {
        let handle = forward_detached(
            Arc::new(FailingNotifier),
            ContactSubmission::default(),
            Duration::from_secs(1),
        );
        assert!(handle.await.is_ok());
    }
}
