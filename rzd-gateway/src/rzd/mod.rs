//! Client for the RZD passenger timetable service.
//!
//! Key characteristics of the service:
//! - A fresh query is often answered with a challenge (`"result": "RID"`)
//!   carrying a session token; the identical query must be resent with the
//!   token as the `rid` query parameter, after a short wait
//! - A successful envelope (`"result": "OK"`) may still carry a message
//!   explaining why nothing was found; that is a business error, not a
//!   retryable one
//! - Numbers (tariffs, station codes, tokens) arrive as JSON numbers or
//!   strings, depending on the endpoint
//! - Times are `DD.MM.YYYY` / `HH:MM` in Moscow time (UTC+03:00)
//!
//! [`RzdClient`] is the entry point. It owns an [`Engine`] that performs the
//! challenge/retry loop over a [`Transport`], and maps successful bodies to
//! [`crate::domain`] records.

mod classify;
mod client;
mod config;
mod convert;
mod endpoints;
mod engine;
mod error;
mod mock;
mod request;
mod session;
mod transport;
mod types;

#[cfg(test)]
mod engine_tests;

pub use classify::{ClassifiedResponse, classify};
pub use client::RzdClient;
pub use config::{ConfigError, DEFAULT_BASE_PATH, DEFAULT_LANGUAGE, DEFAULT_USER_AGENT, RzdConfig};
pub use convert::MappingError;
pub use endpoints::{CARRIAGES_LAYER, EndpointError, Endpoints, ROUTES_LAYER};
pub use engine::{Engine, RetryPolicy, TokenLifecycle};
pub use error::{RzdError, TransportError};
pub use mock::MockTransport;
pub use request::{Method, RequestDescriptor, TOKEN_PARAM};
pub use session::{Clock, ManualClock, SessionToken, SystemClock, TokenCache};
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use types::LooseNumber;
