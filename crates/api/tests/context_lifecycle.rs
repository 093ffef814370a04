//! Session lifecycle tests for the application context

mod support;

use calpilot_domain::{CalPilotError, Session};
use support::{signed_in_context, MockTokenLedger, StubParser};

#[tokio::test]
async fn current_session_reflects_sign_in_and_sign_out() {
    let harness = signed_in_context(StubParser::new(), MockTokenLedger::default());
    let ctx = &harness.ctx;

    let session = ctx.current_session().expect("signed in");
    assert_eq!(session.owner_id, "user-1");

    ctx.set_session(None);
    let err = ctx.current_session().expect_err("signed out");
    assert!(matches!(err, CalPilotError::Auth(_)));
}

#[tokio::test]
async fn session_changes_notify_subscribers() {
    let harness = signed_in_context(StubParser::new(), MockTokenLedger::default());
    let ctx = &harness.ctx;

    let mut watcher = ctx.watch_session();
    assert_eq!(
        watcher.borrow().as_ref().map(|session| session.owner_id.clone()),
        Some("user-1".to_string())
    );

    ctx.set_session(Some(Session::new("user-2")));
    watcher.changed().await.expect("change observed");
    assert_eq!(
        watcher.borrow().as_ref().map(|session| session.owner_id.clone()),
        Some("user-2".to_string())
    );

    ctx.set_session(None);
    watcher.changed().await.expect("change observed");
    assert!(watcher.borrow().is_none());
}
