//! Bounded retry loop over a [`FetchDashboard`].

use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::fetch::{DashboardSnapshot, FetchDashboard};

/// Where the poller is. Attempts are counted from 1.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Idle,
    Fetching { attempt: u32 },
    Success(DashboardSnapshot),
    Failed { attempts: u32, error: String },
}

impl PollState {
    /// `Success` and `Failed` end a run; nothing further is scheduled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Success(_) | PollState::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per run, including the first
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

pub struct Poller<F> {
    fetcher: F,
    policy: RetryPolicy,
    state: watch::Sender<PollState>,
}

impl<F: FetchDashboard> Poller<F> {
    pub fn new(fetcher: F, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(PollState::Idle);
        Self { fetcher, policy, state }
    }

    /// Receiver that sees every published state, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    fn publish(&self, state: PollState) {
        self.state.send_replace(state);
    }

    /// Run one bounded sequence of attempts and return the state it ended in.
    ///
    /// Calling this again after `Failed` is the manual retry: it starts over at attempt 1.
    /// Cancelling `cancel` stops the run at the next await point and leaves the poller `Idle`.
    pub async fn run(&self, cancel: &CancellationToken) -> PollState {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            self.publish(PollState::Fetching { attempt });

            let result = tokio::select! {
                _ = cancel.cancelled() => return self.stop(),
                result = self.fetcher.fetch() => result,
            };

            match result {
                Ok(snapshot) => {
                    info!(attempt, users = snapshot.users.len(), "Dashboard data loaded");
                    let state = PollState::Success(snapshot);
                    self.publish(state.clone());
                    return state;
                }
                Err(e) => {
                    last_error = format!("{e:#}");
                    warn!(attempt, max_attempts, error = %last_error, "Dashboard fetch failed");
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = cancel.cancelled() => return self.stop(),
                    _ = tokio::time::sleep(self.policy.delay) => {}
                }
            }
        }

        let state = PollState::Failed {
            attempts: max_attempts,
            error: last_error,
        };
        self.publish(state.clone());
        state
    }

    fn stop(&self) -> PollState {
        info!("Dashboard polling cancelled");
        self.publish(PollState::Idle);
        PollState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::health::DbCheckResponse;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyFetcher {
        calls: AtomicU32,
        failures: u32,
    }

    impl FlakyFetcher {
        fn new(failures: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FetchDashboard for FlakyFetcher {
        async fn fetch(&self) -> anyhow::Result<DashboardSnapshot> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            // Give observers a chance to see each Fetching state
            tokio::time::sleep(Duration::from_millis(10)).await;
            if call <= self.failures {
                return Err(anyhow!("connection refused (call {call})"));
            }
            Ok(DashboardSnapshot {
                connection: DbCheckResponse {
                    message: "Database connection successful!".to_string(),
                    timestamp: Utc::now(),
                },
                users: Vec::new(),
            })
        }
    }

    /// Collect every state published until the poller reaches a terminal state.
    async fn observe(mut rx: watch::Receiver<PollState>) -> Vec<PollState> {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            let done = state.is_terminal();
            seen.push(state);
            if done {
                break;
            }
        }
        seen
    }

    fn attempts(states: &[PollState]) -> Vec<u32> {
        states
            .iter()
            .filter_map(|s| match s {
                PollState::Fetching { attempt } => Some(*attempt),
                _ => None,
            })
            .collect()
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_success_on_first_attempt() {
        let poller = Poller::new(FlakyFetcher::new(0), RetryPolicy::default());
        assert_eq!(poller.state(), PollState::Idle);

        let cancel = CancellationToken::new();
        let (state, seen) = tokio::join!(poller.run(&cancel), observe(poller.subscribe()));

        assert!(matches!(state, PollState::Success(_)));
        assert_eq!(attempts(&seen), vec![1]);
        assert_eq!(poller.fetcher.calls(), 1);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_recovers_before_budget_runs_out() {
        let poller = Poller::new(FlakyFetcher::new(2), RetryPolicy::default());

        let cancel = CancellationToken::new();
        let (state, seen) = tokio::join!(poller.run(&cancel), observe(poller.subscribe()));

        assert!(matches!(state, PollState::Success(_)));
        assert_eq!(attempts(&seen), vec![1, 2, 3]);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_five_failures_then_manual_retry() {
        let poller = Poller::new(FlakyFetcher::new(5), RetryPolicy::default());
        let cancel = CancellationToken::new();
        let started = Instant::now();

        let (state, seen) = tokio::join!(poller.run(&cancel), observe(poller.subscribe()));

        match &state {
            PollState::Failed { attempts, error } => {
                assert_eq!(*attempts, 5);
                assert!(error.contains("connection refused"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(attempts(&seen), vec![1, 2, 3, 4, 5]);
        assert_eq!(poller.state(), state);
        assert_eq!(poller.fetcher.calls(), 5);

        // Four 2s gaps between five attempts, nothing after the last
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(8), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(9), "elapsed {elapsed:?}");

        // Manual retry starts over at attempt 1
        let (state, seen) = tokio::join!(poller.run(&cancel), observe(poller.subscribe()));

        assert!(matches!(state, PollState::Success(_)));
        assert_eq!(attempts(&seen), vec![1]);
        assert!(matches!(seen.last(), Some(PollState::Success(_))));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_cancellation_stops_scheduling() {
        let poller = Poller::new(FlakyFetcher::new(u32::MAX), RetryPolicy::default());
        let cancel = CancellationToken::new();

        let canceller = async {
            // Lands in the wait after the second attempt
            tokio::time::sleep(Duration::from_secs(3)).await;
            cancel.cancel();
        };
        let (state, ()) = tokio::join!(poller.run(&cancel), canceller);

        assert_eq!(state, PollState::Idle);
        assert_eq!(poller.state(), PollState::Idle);
        assert_eq!(poller.fetcher.calls(), 2);

        // Nothing else fires once cancelled
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(poller.fetcher.calls(), 2);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_secs(2),
        };
        let poller = Poller::new(FlakyFetcher::new(1), policy);

        let state = poller.run(&CancellationToken::new()).await;

        assert!(matches!(state, PollState::Failed { attempts: 1, .. }));
    }
}
