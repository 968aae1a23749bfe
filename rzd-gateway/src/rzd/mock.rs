//! Scripted transport for tests and offline development.
//!
//! Responses are served in the order they were queued, and every request
//! the engine sends is recorded so tests can inspect what went on the wire.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use super::error::TransportError;
use super::request::RequestDescriptor;
use super::transport::{HttpResponse, Transport};

#[derive(Debug)]
enum Step {
    Reply(Result<HttpResponse, TransportError>),
    /// Never completes; for exercising cancellation of an in-flight request.
    Hang,
}

/// Transport that replays queued responses.
///
/// When the script runs out, further sends fail with a connection error.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Step>>,
    sent: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with a JSON body.
    pub fn push_json(&self, body: &str) -> &Self {
        self.push(Step::Reply(Ok(HttpResponse::ok(body))))
    }

    /// Queue a response with an arbitrary status.
    pub fn push_status(&self, status: u16, body: &str) -> &Self {
        self.push(Step::Reply(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        })))
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) -> &Self {
        self.push(Step::Reply(Err(error)))
    }

    /// Queue a request that never gets an answer.
    pub fn push_hang(&self) -> &Self {
        self.push(Step::Hang)
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, step: Step) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
        self
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let request = request.clone();

        // Nothing is recorded or consumed until the future is first polled.
        async move {
            self.sent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);

            let step = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            match step {
                Some(Step::Reply(reply)) => reply,
                Some(Step::Hang) => std::future::pending().await,
                None => Err(TransportError::Connection(
                    "mock transport script exhausted".to_string(),
                )),
            }
        }
    }
}
