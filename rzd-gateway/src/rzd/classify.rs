//! Response classification.
//!
//! Every 2xx body is sorted into one of a handful of outcomes before any
//! schema mapping happens. Bare JSON arrays (station suggestions) carry no
//! envelope and count as success outright; everything else is read through a
//! typed envelope whose `result` field decides what happened.
//!
//! The message chain under `tp` is read leniently: a level with an
//! unexpected shape counts as absent rather than failing the envelope.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::LooseNumber;

/// What a 2xx response body means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedResponse {
    /// `result` was `OK`; hand the body to the mapper.
    Success(Vec<u8>),
    /// A bare JSON array. Usable as is and says nothing about the session.
    Listing(Vec<u8>),
    /// The service issued a session token; resend with it attached.
    Challenge(String),
    /// `result` was `OK` but the service attached a message explaining why
    /// there is nothing to return.
    BusinessError(String),
    /// A challenge without a usable token. Carries the `result` value.
    MalformedChallenge(String),
    /// `result` absent, unparseable, or not a value we know.
    Unrecognized(Option<String>),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, alias = "Result")]
    result: Option<String>,
    #[serde(default)]
    rid: Option<LooseNumber>,
    #[serde(default, rename = "RID")]
    rid_upper: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    tp: Option<Vec<MessageBlock>>,
}

#[derive(Debug, Deserialize)]
struct MessageBlock {
    #[serde(default, rename = "msgList", deserialize_with = "lenient")]
    msg_list: Option<Vec<Message>>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default, deserialize_with = "lenient")]
    message: Option<String>,
}

/// Reads any JSON value and keeps it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl Envelope {
    /// `tp[0].msgList[0].message`, if every step exists and is non-empty.
    fn business_message(&self) -> Option<String> {
        let message = self
            .tp
            .as_ref()?
            .first()?
            .msg_list
            .as_ref()?
            .first()?
            .message
            .as_deref()?
            .trim();

        (!message.is_empty()).then(|| message.to_string())
    }

    fn token(&self) -> Option<String> {
        self.rid
            .as_ref()
            .and_then(LooseNumber::to_text)
            .or_else(|| self.rid_upper.as_ref().and_then(LooseNumber::to_text))
    }
}

/// Classify a 2xx response body.
pub fn classify(body: Vec<u8>) -> ClassifiedResponse {
    if is_bare_array(&body) {
        return ClassifiedResponse::Listing(body);
    }

    let Ok(envelope) = serde_json::from_slice::<Envelope>(&body) else {
        return ClassifiedResponse::Unrecognized(None);
    };

    match envelope.result.as_deref().map(str::trim) {
        Some("OK") => match envelope.business_message() {
            Some(message) => ClassifiedResponse::BusinessError(message),
            None => ClassifiedResponse::Success(body),
        },
        Some(result @ ("RID" | "REQUEST_ID")) => match envelope.token() {
            Some(token) => ClassifiedResponse::Challenge(token),
            None => ClassifiedResponse::MalformedChallenge(result.to_string()),
        },
        other => ClassifiedResponse::Unrecognized(other.map(str::to_string)),
    }
}

fn is_bare_array(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[')
}
