//! Request execution engine.
//!
//! Drives one logical request to completion: send, classify, and either
//! return the body, fail fast, or wait and try again. Session token
//! challenges are satisfied by caching the token and resending the same
//! request with `rid` attached.
//!
//! Retries use a fixed delay with no jitter or backoff.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::classify::{ClassifiedResponse, classify};
use super::error::{RzdError, TransportError};
use super::request::RequestDescriptor;
use super::session::TokenCache;
use super::transport::Transport;

/// Longest body excerpt kept in a status error.
const STATUS_BODY_LIMIT: usize = 200;

/// What happens to the cached token once a request succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenLifecycle {
    /// Drop the token; the next call starts a fresh challenge.
    #[default]
    ExpireOnSuccess,
    /// Keep reusing the token until its TTL runs out.
    KeepUntilTtl,
}

impl TokenLifecycle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expire-on-success" => Some(TokenLifecycle::ExpireOnSuccess),
            "keep-until-ttl" => Some(TokenLifecycle::KeepUntilTtl),
            _ => None,
        }
    }
}

/// How hard to try before giving up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_retries: u32,
    /// Wait between attempts.
    pub delay: Duration,
    /// Lifetime of a freshly issued session token.
    pub token_ttl: Duration,
    pub token_lifecycle: TokenLifecycle,
    /// Bound on the whole call, measured from when it starts.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            delay: Duration::from_secs(2),
            token_ttl: Duration::from_secs(300),
            token_lifecycle: TokenLifecycle::default(),
            deadline: None,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Sends requests through a [`Transport`] and handles challenges and retries.
///
/// The engine owns its token cache, so clients built separately never share
/// a session.
#[derive(Debug)]
pub struct Engine<T> {
    transport: T,
    tokens: TokenCache,
}

impl<T: Transport> Engine<T> {
    pub fn new(transport: T, tokens: TokenCache) -> Self {
        Self { transport, tokens }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Run `request` until it yields a usable body or the policy gives up.
    ///
    /// `request` is the canonical form of the request; each attempt sends a
    /// copy with the currently cached token (if any) attached.
    ///
    /// Cancelling `cancel`, or reaching the policy deadline, abandons the
    /// in-flight attempt and any further retries and returns
    /// [`RzdError::Cancelled`].
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        policy: &RetryPolicy,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, RzdError> {
        let deadline = policy.deadline.map(|d| Instant::now() + d);
        let attempts = policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            if cancel.is_cancelled() || deadline.is_some_and(|at| Instant::now() >= at) {
                return Err(cancelled(attempt));
            }

            let attached = self.tokens.get();
            let outgoing = match &attached {
                Some(token) => request.with_token(token),
                None => request.clone(),
            };

            debug!(
                attempt,
                attempts,
                method = ?outgoing.method(),
                url = %outgoing.url(),
                "sending request"
            );

            let sent = tokio::select! {
                biased;
                () = interrupted(cancel, deadline) => return Err(cancelled(attempt)),
                sent = self.transport.send(&outgoing) => sent,
            };

            let error = match sent {
                Err(e) => RzdError::Transport(e),
                Ok(response) if !response.is_success() => RzdError::Transport(TransportError::Status {
                    status: response.status,
                    body: excerpt(&response.body),
                }),
                Ok(response) => match classify(response.body) {
                    ClassifiedResponse::Success(body) => {
                        if policy.token_lifecycle == TokenLifecycle::ExpireOnSuccess {
                            if let Some(token) = &attached {
                                self.tokens.expire_if(token);
                            }
                        }
                        debug!(attempt, bytes = body.len(), "request succeeded");
                        return Ok(body);
                    }
                    ClassifiedResponse::Listing(body) => {
                        debug!(attempt, bytes = body.len(), "listing received");
                        return Ok(body);
                    }
                    ClassifiedResponse::BusinessError(message) => {
                        debug!(attempt, %message, "service rejected the query");
                        return Err(RzdError::Business(message));
                    }
                    ClassifiedResponse::Challenge(token) => {
                        debug!(attempt, "received session token challenge");
                        self.tokens.set(token, policy.token_ttl);
                        RzdError::Challenge("session token issued, resending".to_string())
                    }
                    ClassifiedResponse::MalformedChallenge(result) => {
                        RzdError::Challenge(format!("{result} response carried no token"))
                    }
                    ClassifiedResponse::Unrecognized(Some(result)) => {
                        RzdError::UnexpectedResult(format!("{result:?}"))
                    }
                    ClassifiedResponse::Unrecognized(None) => {
                        RzdError::UnexpectedResult("missing or unparseable result field".to_string())
                    }
                },
            };

            if attempt >= attempts {
                warn!(attempts = attempt, error = %error, "retry budget exhausted");
                return Err(RzdError::RetryBudgetExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            match &error {
                RzdError::Challenge(_) => debug!(attempt, "retrying with session token"),
                _ => warn!(attempt, attempts, error = %error, "attempt failed, retrying"),
            }

            tokio::select! {
                biased;
                () = interrupted(cancel, deadline) => return Err(cancelled(attempt)),
                () = tokio::time::sleep(policy.delay) => {}
            }
        }
    }
}

/// Resolves once the caller cancels or the deadline passes.
async fn interrupted(cancel: &CancellationToken, deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::select! {
            () = cancel.cancelled() => {}
            () = tokio::time::sleep_until(at) => {}
        },
        None => cancel.cancelled().await,
    }
}

fn cancelled(attempt: u32) -> RzdError {
    debug!(attempt, "request cancelled");
    RzdError::Cancelled
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(STATUS_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_at_least_one() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
        assert_eq!(RetryPolicy::default().attempts(), 10);
    }

    #[test]
    fn parse_lifecycle() {
        assert_eq!(
            TokenLifecycle::parse("Keep-Until-TTL"),
            Some(TokenLifecycle::KeepUntilTtl)
        );
        assert_eq!(
            TokenLifecycle::parse("expire-on-success"),
            Some(TokenLifecycle::ExpireOnSuccess)
        );
        assert_eq!(TokenLifecycle::parse("never"), None);
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let long = "ж".repeat(STATUS_BODY_LIMIT + 10);
        let cut = excerpt(long.as_bytes());
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), STATUS_BODY_LIMIT + 3);

        assert_eq!(excerpt(b"Service Unavailable"), "Service Unavailable");
    }
}
