//! Scenario tests for the request execution engine.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio_util::sync::CancellationToken;

use super::engine::{Engine, RetryPolicy, TokenLifecycle};
use super::error::{RzdError, TransportError};
use super::mock::MockTransport;
use super::request::{RequestDescriptor, TOKEN_PARAM};
use super::session::{ManualClock, TokenCache};

const CHALLENGE: &str = r#"{"result":"RID","RID":"777"}"#;
const OK_EMPTY: &str = r#"{"result":"OK","tp":[{"list":[]}]}"#;

fn engine() -> (Arc<ManualClock>, Engine<MockTransport>) {
    let clock = Arc::new(ManualClock::new());
    let engine = Engine::new(MockTransport::new(), TokenCache::new(clock.clone()));
    (clock, engine)
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 5,
        delay: Duration::from_millis(10),
        token_ttl: Duration::from_secs(300),
        token_lifecycle: TokenLifecycle::ExpireOnSuccess,
        deadline: None,
    }
}

fn request() -> RequestDescriptor {
    let url = Url::parse("https://pass.rzd.ru/timetable/public/ru?layer_id=5827").unwrap();
    RequestDescriptor::post(url)
        .param("code0", "2000000")
        .param("code1", "2004000")
}

fn rid_count(request: &RequestDescriptor) -> usize {
    request
        .url()
        .query_pairs()
        .filter(|(k, _)| k == TOKEN_PARAM)
        .count()
}

#[tokio::test(start_paused = true)]
async fn challenge_then_resend_with_token() {
    let (clock, engine) = engine();
    engine.transport().push_json(CHALLENGE).push_json(OK_EMPTY);

    let policy = RetryPolicy {
        token_lifecycle: TokenLifecycle::KeepUntilTtl,
        ..policy()
    };
    let body = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(body, OK_EMPTY.as_bytes());

    let sent = engine.transport().requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].token(), None);
    assert_eq!(sent[1].token().as_deref(), Some("777"));
    assert_eq!(sent[1].params(), request().params());

    // Token stays cached until its TTL runs out
    assert_eq!(engine.tokens().get().as_deref(), Some("777"));
    clock.advance(Duration::from_secs(299));
    assert_eq!(engine.tokens().get().as_deref(), Some("777"));
    clock.advance(Duration::from_secs(1));
    assert_eq!(engine.tokens().get(), None);
}

#[tokio::test(start_paused = true)]
async fn success_expires_token_by_default() {
    let (_, engine) = engine();
    engine.transport().push_json(CHALLENGE).push_json(OK_EMPTY);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(engine.tokens().get(), None);
}

#[tokio::test]
async fn bare_array_leaves_token_cached() {
    let (_, engine) = engine();
    engine.tokens().set("pending", Duration::from_secs(60));
    engine
        .transport()
        .push_json(r#"[{"n":"MOSCOW","c":"2000000"}]"#);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(engine.tokens().get().as_deref(), Some("pending"));
}

#[tokio::test]
async fn ok_with_odd_message_chain_succeeds() {
    let (_, engine) = engine();
    let body = r#"{"result":"OK","tp":[{"msgList":[{"message":42}]}]}"#;
    engine.transport().push_json(body);

    let policy = RetryPolicy {
        max_retries: 1,
        ..policy()
    };
    let got = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(got, body.as_bytes());
}

#[tokio::test]
async fn cached_token_attached_on_first_attempt() {
    let (_, engine) = engine();
    engine.tokens().set("cached", Duration::from_secs(60));
    engine.transport().push_json(OK_EMPTY);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    let sent = engine.transport().requests();
    assert_eq!(sent[0].token().as_deref(), Some("cached"));
}

#[tokio::test]
async fn expired_token_never_attached() {
    let (clock, engine) = engine();
    engine.tokens().set("stale", Duration::from_secs(1));
    clock.advance(Duration::from_secs(2));
    engine.transport().push_json(OK_EMPTY);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    let sent = engine.transport().requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token(), None);
}

#[tokio::test(start_paused = true)]
async fn repeated_challenges_attach_token_once() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_json(r#"{"result":"RID","rid":"first"}"#)
        .push_json(r#"{"result":"REQUEST_ID","rid":2}"#)
        .push_json(OK_EMPTY);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    let sent = engine.transport().requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].token().as_deref(), Some("first"));
    assert_eq!(sent[2].token().as_deref(), Some("2"));
    assert!(sent.iter().all(|r| rid_count(r) <= 1));
}

#[tokio::test]
async fn business_error_is_not_retried() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_json(r#"{"result":"OK","tp":[{"msgList":[{"message":"No seats"}]}]}"#)
        .push_json(OK_EMPTY);

    let err = engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RzdError::Business(ref m) if m == "No seats"));
    assert_eq!(engine.transport().request_count(), 1);
    assert_eq!(engine.transport().remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn exhaustion_reports_attempts_and_last_error() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_error(TransportError::Timeout)
        .push_error(TransportError::Timeout)
        .push_error(TransportError::Connection("reset".into()));

    let policy = RetryPolicy {
        max_retries: 3,
        ..policy()
    };
    let err = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        RzdError::RetryBudgetExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                *last,
                RzdError::Transport(TransportError::Connection(ref m)) if m == "reset"
            ));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(engine.transport().request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn non_success_status_is_retried() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_status(503, "Service Unavailable")
        .push_json(OK_EMPTY);

    let body = engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(body, OK_EMPTY.as_bytes());
    assert_eq!(engine.transport().request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn status_error_keeps_body_excerpt() {
    let (_, engine) = engine();
    engine.transport().push_status(502, "Bad Gateway");

    let policy = RetryPolicy {
        max_retries: 1,
        ..policy()
    };
    let err = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    let RzdError::RetryBudgetExhausted { last, .. } = err else {
        panic!("expected exhaustion");
    };
    assert!(matches!(
        *last,
        RzdError::Transport(TransportError::Status { status: 502, ref body }) if body == "Bad Gateway"
    ));
}

#[tokio::test(start_paused = true)]
async fn unknown_result_and_tokenless_challenge_are_retried() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_json(r#"{"result":"FAIL"}"#)
        .push_json(r#"{"result":"RID"}"#)
        .push_json("<html>maintenance</html>")
        .push_json(OK_EMPTY);

    engine
        .execute(&request(), &policy(), &CancellationToken::new())
        .await
        .unwrap();

    let sent = engine.transport().requests();
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().all(|r| r.token().is_none()));
}

#[tokio::test(start_paused = true)]
async fn zero_retries_still_makes_one_attempt() {
    let (_, engine) = engine();
    engine.transport().push_error(TransportError::Timeout);

    let policy = RetryPolicy {
        max_retries: 0,
        ..policy()
    };
    let err = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RzdError::RetryBudgetExhausted { attempts: 1, .. }));
    assert_eq!(engine.transport().request_count(), 1);
}

#[tokio::test]
async fn already_cancelled_sends_nothing() {
    let (_, engine) = engine();
    engine.transport().push_json(OK_EMPTY);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine.execute(&request(), &policy(), &cancel).await.unwrap_err();

    assert!(matches!(err, RzdError::Cancelled));
    assert_eq!(engine.transport().request_count(), 0);
    assert_eq!(engine.transport().remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn elapsed_deadline_sends_nothing() {
    let (_, engine) = engine();
    engine.transport().push_json(OK_EMPTY);

    let policy = RetryPolicy {
        deadline: Some(Duration::ZERO),
        ..policy()
    };
    let err = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RzdError::Cancelled));
    assert_eq!(engine.transport().request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_delay_returns_cancelled() {
    let (_, engine) = engine();
    engine
        .transport()
        .push_error(TransportError::Timeout)
        .push_json(OK_EMPTY);

    let policy = RetryPolicy {
        delay: Duration::from_secs(10),
        ..policy()
    };
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let err = engine.execute(&request(), &policy, &cancel).await.unwrap_err();

    assert!(matches!(err, RzdError::Cancelled));
    assert_eq!(engine.transport().request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_abandons_in_flight_request() {
    let (_, engine) = engine();
    engine.transport().push_hang();

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let err = engine.execute(&request(), &policy(), &cancel).await.unwrap_err();

    assert!(matches!(err, RzdError::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn deadline_outranks_retry_budget() {
    let (_, engine) = engine();
    for _ in 0..10 {
        engine.transport().push_error(TransportError::Timeout);
    }

    let policy = RetryPolicy {
        max_retries: 10,
        delay: Duration::from_secs(2),
        deadline: Some(Duration::from_secs(5)),
        ..policy()
    };
    let err = engine
        .execute(&request(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RzdError::Cancelled));
    // Attempts at t=0, 2 and 4; the deadline lands during the next delay
    assert_eq!(engine.transport().request_count(), 3);
}
