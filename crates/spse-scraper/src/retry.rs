//! Bounded-attempt, fixed-delay retry for network operations.

use std::future::Future;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::types::ScrapeResult;

/// Result of a fetch-and-parse step that degrades instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The step produced data.
    Found(T),
    /// The step gave up; callers substitute their empty value.
    Fallback { reason: String },
}

impl<T> Outcome<T> {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Outcome::Fallback {
            reason: reason.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Fallback { .. } => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Fallback { .. } => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Fallback { reason } => Outcome::Fallback { reason },
        }
    }
}

/// Up to `max_attempts` tries with a fixed pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.max_attempts, config.retry_delay())
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// Any error triggers another attempt. The last error is turned into
    /// [`Outcome::Fallback`]; nothing is propagated.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Outcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ScrapeResult<T>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Outcome::Found(value),
                Err(e) => {
                    tracing::warn!(
                        "attempt {attempt}/{} failed for {label}: {e}",
                        self.max_attempts
                    );
                    if attempt >= self.max_attempts {
                        tracing::error!("all {} attempts failed for {label}", self.max_attempts);
                        return Outcome::fallback(e.to_string());
                    }
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
