//! Confirmation polling for submitted transactions
//!
//! A submitted transaction moves through these states on the ledger:
//! - PENDING: not yet applied (or not yet visible to the RPC node)
//! - SUCCESS: applied; carries the decoded return value
//! - FAILED: applied with a failing result code
//!
//! The poller queries until a terminal state or until its attempt and
//! wall-clock budget is spent. It never retries a submission.

use super::sender::SubmissionHandle;
use crate::chain::{NetworkClient, TransactionStatus};
use crate::config::PollerConfig;
use crate::error::{TxError, TxResult};
use crate::metrics;
use crate::types::{ScValue, TxHash};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Bounds on the confirmation loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    /// Delay between status queries
    pub interval: Duration,
    /// Overall wall-clock limit, measured from the first query
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
            deadline: None,
        }
    }
}

impl From<&PollerConfig> for PollPolicy {
    fn from(config: &PollerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            interval: Duration::from_millis(config.interval_ms),
            deadline: config.deadline_secs.map(Duration::from_secs),
        }
    }
}

/// Successful, confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: TxHash,
    pub ledger: Option<u32>,
    pub return_value: ScValue,
    /// Status queries issued before confirmation
    pub attempts: u32,
    pub confirmed_at: DateTime<Utc>,
}

impl TransactionOutcome {
    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::Success
    }
}

/// Polls transaction status until a terminal state
pub struct ConfirmationPoller {
    client: Arc<dyn NetworkClient>,
    policy: PollPolicy,
}

impl ConfirmationPoller {
    pub fn new(client: Arc<dyn NetworkClient>, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Wait for a submitted transaction to reach a terminal state
    pub async fn wait_for(&self, handle: &SubmissionHandle) -> TxResult<TransactionOutcome> {
        let result = self.poll(&handle.hash).await;

        match &result {
            Ok(outcome) => {
                let latency = (outcome.confirmed_at - handle.submitted_at)
                    .to_std()
                    .unwrap_or_default();
                metrics::record_tx_confirmed(latency);
            }
            Err(e) => metrics::record_tx_failed(e.kind()),
        }

        result
    }

    async fn poll(&self, hash: &TxHash) -> TxResult<TransactionOutcome> {
        // A deadline past the clock's range is no deadline at all
        let deadline = self
            .policy
            .deadline
            .and_then(|d| Instant::now().checked_add(d));
        let mut attempts = 0;

        while attempts < self.policy.max_attempts {
            attempts += 1;
            metrics::record_poll_attempt();

            let query = self.client.get_transaction(hash);
            let response = match deadline {
                Some(at) => match timeout_at(at, query).await {
                    Ok(response) => response,
                    Err(_) => break,
                },
                None => query.await,
            }
            .map_err(|source| TxError::Polling {
                hash: hash.clone(),
                source,
            })?;

            match response.status {
                TransactionStatus::Pending => {
                    debug!(%hash, attempt = attempts, "Transaction pending");
                }
                TransactionStatus::Success => {
                    let return_value = response.return_value.ok_or_else(|| {
                        TxError::MissingReturnValue { hash: hash.clone() }
                    })?;
                    info!(%hash, ledger = ?response.ledger, attempts, "Transaction confirmed");
                    return Ok(TransactionOutcome {
                        hash: hash.clone(),
                        ledger: response.ledger,
                        return_value,
                        attempts,
                        confirmed_at: Utc::now(),
                    });
                }
                TransactionStatus::Failed => {
                    let result = response.result.unwrap_or_else(|| "unknown".to_string());
                    warn!(%hash, %result, "Transaction failed");
                    return Err(TxError::TransactionFailed {
                        hash: hash.clone(),
                        result,
                    });
                }
                TransactionStatus::Unknown(status) => {
                    return Err(TxError::UnknownStatus {
                        hash: hash.clone(),
                        status,
                    });
                }
            }

            if attempts < self.policy.max_attempts {
                if let Some(at) = deadline {
                    match Instant::now().checked_add(self.policy.interval) {
                        Some(next) if next < at => {}
                        _ => break,
                    }
                }
                sleep(self.policy.interval).await;
            }
        }

        warn!(%hash, attempts, "Gave up waiting for confirmation");
        Err(TxError::ConfirmationTimeout {
            hash: hash.clone(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fake::FakeNetwork;
    use crate::chain::{ClientError, GetTransactionResponse};

    fn handle(hash: &str) -> SubmissionHandle {
        SubmissionHandle {
            hash: TxHash::from(hash),
            submitted_at: Utc::now(),
            duplicate: false,
        }
    }

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            interval: Duration::from_millis(1),
            deadline: None,
        }
    }

    #[tokio::test]
    async fn test_success_after_pending() {
        let network = Arc::new(FakeNetwork::new());
        network.script_statuses(vec![
            Ok(GetTransactionResponse::pending()),
            Ok(GetTransactionResponse::pending()),
            Ok(GetTransactionResponse::success(12, Some(ScValue::U32(42)))),
        ]);

        let poller = ConfirmationPoller::new(network.clone(), fast_policy(10));
        let outcome = poller.wait_for(&handle("abc")).await.unwrap();

        assert_eq!(outcome.return_value, ScValue::U32(42));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.ledger, Some(12));
        assert_eq!(outcome.status(), TransactionStatus::Success);
        assert_eq!(network.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_success_without_value_is_an_error() {
        let network = Arc::new(FakeNetwork::new());
        network.script_statuses(vec![Ok(GetTransactionResponse::success(3, None))]);

        let poller = ConfirmationPoller::new(network, fast_policy(5));
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();
        assert!(matches!(err, TxError::MissingReturnValue { ref hash } if hash.as_str() == "abc"));
    }

    #[tokio::test]
    async fn test_failed_status() {
        let network = Arc::new(FakeNetwork::new());
        network.script_statuses(vec![Ok(GetTransactionResponse::failed(3, "txFAILED"))]);

        let poller = ConfirmationPoller::new(network, fast_policy(5));
        match poller.wait_for(&handle("abc")).await {
            Err(TxError::TransactionFailed { hash, result }) => {
                assert_eq!(hash.as_str(), "abc");
                assert_eq!(result, "txFAILED");
            }
            other => panic!("expected TransactionFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_status() {
        let network = Arc::new(FakeNetwork::new());
        let mut response = GetTransactionResponse::pending();
        response.status = TransactionStatus::from("EXPIRED");
        network.script_statuses(vec![Ok(response)]);

        let poller = ConfirmationPoller::new(network, fast_policy(5));
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();
        assert!(matches!(err, TxError::UnknownStatus { ref status, .. } if status == "EXPIRED"));
    }

    #[tokio::test]
    async fn test_client_error_is_polling_error() {
        let network = Arc::new(FakeNetwork::new());
        network.script_statuses(vec![
            Ok(GetTransactionResponse::pending()),
            Err(ClientError::Malformed("missing status".to_string())),
        ]);

        let poller = ConfirmationPoller::new(network, fast_policy(5));
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();
        match err {
            TxError::Polling { hash, source } => {
                assert_eq!(hash.as_str(), "abc");
                assert_eq!(source, ClientError::Malformed("missing status".to_string()));
            }
            other => panic!("expected Polling, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_always_pending_stops_at_attempt_budget() {
        let network = Arc::new(FakeNetwork::new());

        let poller = ConfirmationPoller::new(network.clone(), fast_policy(4));
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();

        assert!(matches!(err, TxError::ConfirmationTimeout { attempts: 4, .. }));
        assert_eq!(network.poll_count(), 4);
    }

    #[tokio::test]
    async fn test_always_pending_stops_at_deadline() {
        let network = Arc::new(FakeNetwork::new());
        let policy = PollPolicy {
            max_attempts: u32::MAX,
            interval: Duration::from_millis(20),
            deadline: Some(Duration::from_millis(100)),
        };

        let poller = ConfirmationPoller::new(network.clone(), policy);
        let started = std::time::Instant::now();
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();

        assert!(matches!(err, TxError::ConfirmationTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(network.poll_count() >= 1);
    }

    #[tokio::test]
    async fn test_out_of_range_deadline_does_not_panic() {
        let network = Arc::new(FakeNetwork::new());
        let policy = PollPolicy {
            max_attempts: 3,
            interval: Duration::from_millis(1),
            deadline: Some(Duration::from_secs(i64::MAX as u64)),
        };

        let poller = ConfirmationPoller::new(network.clone(), policy);
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();

        assert!(matches!(err, TxError::ConfirmationTimeout { attempts: 3, .. }));
        assert_eq!(network.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_interval_past_deadline_stops_early() {
        let network = Arc::new(FakeNetwork::new());
        let policy = PollPolicy {
            max_attempts: 10,
            interval: Duration::MAX,
            deadline: Some(Duration::from_secs(60)),
        };

        let poller = ConfirmationPoller::new(network.clone(), policy);
        let err = poller.wait_for(&handle("abc")).await.unwrap_err();

        assert!(matches!(err, TxError::ConfirmationTimeout { attempts: 1, .. }));
        assert_eq!(network.poll_count(), 1);
    }

    #[test]
    fn test_policy_from_config() {
        let config = PollerConfig {
            max_attempts: 5,
            interval_ms: 250,
            deadline_secs: Some(10),
        };
        let policy = PollPolicy::from(&config);
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.deadline, Some(Duration::from_secs(10)));
    }
}
