//! End-to-end dictation scenarios against the session controller.
//!
//! Each test builds its own controller around a `MockRecognizer` and a
//! `ManualClock`, then replays a sequence of user commands and engine callbacks.

use std::sync::Arc;

use scribe_core::types::ErrorKind;
use scribe_dictation::testing::MockRecognizer;
use scribe_dictation::{
    DeviceProfile, Fragment, ManualClock, RecognizerEvent, SessionController, SessionState,
};

// =============================================================================
// Helpers
// =============================================================================

fn make(profile: DeviceProfile) -> (SessionController, MockRecognizer, ManualClock) {
    let recognizer = MockRecognizer::new();
    let clock = ManualClock::new();
    let controller = SessionController::new(profile, Box::new(recognizer.clone()))
        .with_clock(Arc::new(clock.clone()));
    (controller, recognizer, clock)
}

fn begin(controller: &mut SessionController) {
    controller.start().unwrap();
    controller.handle_event(RecognizerEvent::SessionStarted);
}

fn finals(texts: &[&str]) -> RecognizerEvent {
    RecognizerEvent::Result {
        fragments: texts.iter().map(|t| Fragment::final_text(*t)).collect(),
    }
}

fn error(code: &str) -> RecognizerEvent {
    RecognizerEvent::Error {
        code: code.to_string(),
    }
}

// =============================================================================
// Transcript accumulation
// =============================================================================

#[test]
fn test_desktop_final_text_is_exact_concatenation() {
    let (mut c, _, clock) = make(DeviceProfile::desktop());
    begin(&mut c);

    let batches: Vec<Vec<&str>> = vec![
        vec!["The quick", " brown fox"],
        vec![" jumps"],
        vec![" over", " the", " lazy dog."],
        vec![" The quick"],
    ];
    let mut expected = String::new();
    for batch in &batches {
        clock.advance(100);
        c.handle_event(finals(batch));
        expected.extend(batch.iter().copied());
    }

    assert_eq!(c.final_text(), expected);
    assert_eq!(c.final_text(), "The quick brown fox jumps over the lazy dog. The quick");
}

#[test]
fn test_mobile_duplicate_within_window_appended_once() {
    let profile = DeviceProfile {
        supports_continuous: false,
        supports_interim_results: false,
        duplicate_prone: true,
    };
    let (mut c, _, clock) = make(profile);
    begin(&mut c);

    clock.set(0);
    c.handle_event(finals(&["hello world"]));
    clock.set(500);
    c.handle_event(finals(&["hello world"]));

    assert_eq!(c.final_text(), "hello world ");
}

#[test]
fn test_mobile_duplicate_after_window_appended_again() {
    let (mut c, _, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    c.handle_event(finals(&["hello world"]));
    clock.advance(2_000);
    c.handle_event(finals(&["hello world"]));

    assert_eq!(c.final_text(), "hello world hello world ");
}

#[test]
fn test_interim_text_never_reaches_final_text() {
    let (mut c, _, _) = make(DeviceProfile::desktop());
    begin(&mut c);

    c.handle_event(RecognizerEvent::Result {
        fragments: vec![Fragment::interim("draft one")],
    });
    c.handle_event(RecognizerEvent::Result {
        fragments: vec![Fragment::interim("draft two")],
    });

    assert_eq!(c.final_text(), "");
    assert_eq!(c.interim_text(), "draft two");
}

#[test]
fn test_clear_resets_buffers_and_window_but_not_state() {
    let (mut c, _, clock) = make(DeviceProfile::mobile());
    begin(&mut c);
    c.handle_event(finals(&["hello"]));

    c.clear();
    assert_eq!(c.final_text(), "");
    assert_eq!(c.interim_text(), "");
    assert_eq!(c.state(), SessionState::Listening);

    clock.advance(10);
    c.handle_event(finals(&["hello"]));
    assert_eq!(c.final_text(), "hello ");
}

// =============================================================================
// Stop intent and auto-restart
// =============================================================================

#[test]
fn test_stop_then_unsolicited_end_never_restarts() {
    let (mut c, r, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    c.stop().unwrap();
    c.handle_event(RecognizerEvent::SessionEnded);
    clock.advance(10_000);
    c.fire_due_restart();

    assert_eq!(r.start_count(), 1);
    assert!(!c.is_listening());
}

#[test]
fn test_unsolicited_end_fires_exactly_one_restart() {
    let (mut c, r, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    c.handle_event(RecognizerEvent::SessionEnded);
    assert_eq!(r.start_count(), 1);

    clock.advance(100);
    assert!(c.fire_due_restart());
    clock.advance(1_000);
    assert!(!c.fire_due_restart());
    assert_eq!(r.start_count(), 2);
}

#[test]
fn test_unsolicited_end_then_stop_before_delay_never_fires() {
    let (mut c, r, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    c.handle_event(RecognizerEvent::SessionEnded);
    clock.advance(50);
    c.stop().unwrap();
    clock.advance(50);
    assert!(!c.fire_due_restart());
    assert_eq!(r.start_count(), 1);
}

#[test]
fn test_unsolicited_end_after_permission_error_still_restarts() {
    let (mut c, r, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    c.handle_event(error("not-allowed"));
    c.handle_event(RecognizerEvent::SessionEnded);
    assert!(!c.user_requested_stop());
    assert!(c.restart_pending());

    clock.advance(100);
    assert!(c.fire_due_restart());
    assert_eq!(r.start_count(), 2);
}

#[test]
fn test_mobile_session_keeps_listening_across_utterances() {
    let (mut c, r, clock) = make(DeviceProfile::mobile());
    begin(&mut c);

    for phrase in ["first sentence", "second sentence", "third sentence"] {
        c.handle_event(finals(&[phrase]));
        c.handle_event(RecognizerEvent::SessionEnded);
        clock.advance(100);
        assert!(c.fire_due_restart());
        c.handle_event(RecognizerEvent::SessionStarted);
        clock.advance(2_500);
    }

    assert_eq!(r.start_count(), 4);
    assert_eq!(c.final_text(), "first sentence second sentence third sentence ");
    assert_eq!(c.state(), SessionState::Listening);
}

// =============================================================================
// Errors and retries
// =============================================================================

#[test]
fn test_permission_denied_scenario() {
    let (mut c, _, _) = make(DeviceProfile::desktop());
    begin(&mut c);

    c.handle_event(error("not-allowed"));

    let classification = c.error().unwrap();
    assert_eq!(classification.kind, ErrorKind::PermissionDenied);
    assert!(classification.retryable);
    assert!(classification
        .steps
        .iter()
        .any(|s| s.contains("Allow") && s.contains("microphone")));
    assert!(!c.is_listening());
    assert_eq!(c.state(), SessionState::Ended);
}

#[test]
fn test_transport_failure_retry_budget_is_advisory() {
    let (mut c, r, _) = make(DeviceProfile::desktop());
    begin(&mut c);

    for attempt in 1..=3 {
        c.handle_event(error("network"));
        c.handle_event(RecognizerEvent::SessionEnded);
        assert_eq!(c.error().unwrap().kind, ErrorKind::TransportFailure);
        c.retry().unwrap();
        assert_eq!(c.retry_budget().attempts(), attempt);
        assert!(c.retry_budget().within_budget());
        c.handle_event(RecognizerEvent::SessionStarted);
    }

    c.handle_event(error("network"));
    c.handle_event(RecognizerEvent::SessionEnded);
    c.retry().unwrap();
    assert_eq!(c.retry_budget().attempts(), 4);
    assert!(!c.retry_budget().within_budget());
    assert!(!c.retry_budget().describe().contains("within budget"));
    assert_eq!(r.start_count(), 5);
}

#[test]
fn test_retry_does_not_bypass_state_checks() {
    let (mut c, r, _) = make(DeviceProfile::desktop());
    begin(&mut c);

    assert!(c.retry().is_err());
    assert_eq!(c.retry_budget().attempts(), 1);
    assert_eq!(r.start_count(), 1);
    assert_eq!(c.state(), SessionState::Listening);
}

#[test]
fn test_every_error_lands_in_ended() {
    for code in [
        "not-allowed",
        "no-speech",
        "network",
        "service-not-allowed",
        "aborted",
        "something-else",
    ] {
        let (mut c, _, _) = make(DeviceProfile::desktop());
        begin(&mut c);
        c.handle_event(error(code));
        assert_eq!(c.state(), SessionState::Ended, "code {}", code);
        assert!(c.error().is_some(), "code {}", code);
    }
}

// =============================================================================
// Insertion
// =============================================================================

#[test]
fn test_insert_concatenates_final_and_interim_once() {
    let (mut c, _, _) = make(DeviceProfile::desktop());
    begin(&mut c);
    c.handle_event(finals(&["Meeting notes:"]));
    c.handle_event(RecognizerEvent::Result {
        fragments: vec![Fragment::interim(" budget review")],
    });

    let mut document = String::new();
    let mut inserts = 0;
    let mut sink = |text: &str| {
        inserts += 1;
        document.push_str(text);
    };
    assert!(c.insert_text(&mut sink));
    assert!(!c.insert_text(&mut sink));

    assert_eq!(inserts, 1);
    assert_eq!(document, "Meeting notes: budget review");
    assert!(!c.is_open());
}

#[test]
fn test_insert_whitespace_only_is_refused() {
    let (mut c, _, _) = make(DeviceProfile::desktop());
    begin(&mut c);
    c.handle_event(finals(&["  "]));

    let mut inserts = 0;
    let mut sink = |_: &str| inserts += 1;
    assert!(!c.insert_text(&mut sink));
    assert_eq!(inserts, 0);
}
