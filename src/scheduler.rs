use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::sheets;
use crate::store::CredentialProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    /// A transport failure was absorbed; retry immediately, no sleep.
    BackoffRetry,
    TerminatedDeadline,
    TerminatedError,
}

/// `DeadlineReached` is the clean exit; the caller turns `RetriesExhausted`
/// into a non-zero process status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    DeadlineReached,
    RetriesExhausted,
}

/// Drives update cycles on a fixed interval until the cutoff. The
/// consecutive-error counter is the only state carried across cycles and
/// resets exclusively on a fully successful cycle.
pub struct Scheduler<P: CredentialProvider> {
    config: AppConfig,
    provider: P,
    consecutive_errors: u32,
}

impl<P: CredentialProvider> Scheduler<P> {
    pub fn new(config: AppConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            consecutive_errors: 0,
        }
    }

    /// Non-transport errors (including failures to acquire credentials)
    /// propagate as fatal.
    pub async fn run(&mut self) -> anyhow::Result<Shutdown> {
        let mut store = self.provider.acquire().await?;
        let mut state = State::Running;

        loop {
            match state {
                State::Running | State::BackoffRetry => {
                    if Utc::now() >= self.config.cutoff {
                        state = State::TerminatedDeadline;
                        continue;
                    }

                    let started = Instant::now();
                    info!("updating the signup sheets");
                    match sheets::run_cycle(&store, &self.config).await {
                        Ok(summary) => {
                            self.consecutive_errors = 0;
                            info!(
                                records = summary.records,
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                "done updating signup sheets"
                            );
                            tokio::time::sleep(self.config.poll_interval).await;
                            state = State::Running;
                        }
                        Err(err) if err.is_transient() => {
                            warn!(error = %err, "transport failure during update cycle");
                            self.consecutive_errors += 1;
                            store = self.provider.acquire().await?;
                            state = if self.consecutive_errors >= self.config.max_consecutive_errors
                            {
                                State::TerminatedError
                            } else {
                                State::BackoffRetry
                            };
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                State::TerminatedDeadline => {
                    info!("signup window closed, shutting down");
                    return Ok(Shutdown::DeadlineReached);
                }
                State::TerminatedError => {
                    error!(
                        retries = self.consecutive_errors,
                        "exceeded the maximum number of retries, terminating"
                    );
                    return Ok(Shutdown::RetriesExhausted);
                }
            }
        }
    }
}
