pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use mock::ScriptedGenerator;
use patient_sim::config::templates;
use patient_sim::{
    Session, SessionError, SessionOptions, SessionPhase, Speaker, FALLBACK_REPLY, HISTORY_WINDOW,
};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[tokio::test]
async fn test_start_appends_patient_opening() {
    let generator = Arc::new(ScriptedGenerator::new().with_reply("*sits down slowly* Hi."));
    let mut session = Session::new(Box::new(generator.clone()));
    session.load(templates::emma_bpd()).unwrap();

    let outcome = session.start().await.unwrap();
    assert_eq!(outcome.reply, "*sits down slowly* Hi.");
    assert!(!outcome.fallback);
    assert_eq!(session.phase(), SessionPhase::Active);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].speaker, Speaker::Patient);
    assert!(snapshot.started_at.is_some());
    assert_eq!(snapshot.patient_name, Some("Emma"));

    // The opening turn is generated against an empty history.
    let directive = generator.last_directive().unwrap();
    assert!(directive.history.is_empty());
    assert!(directive.instructions.contains("Emma"));
}

#[tokio::test]
async fn test_submit_outside_active_is_rejected() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    session.load(templates::emma_bpd()).unwrap();

    let result = session.submit_therapist_turn("Hello Emma").await;
    assert!(matches!(
        result,
        Err(SessionError::InvalidState {
            operation: "submit_therapist_turn",
            phase: SessionPhase::Idle,
        })
    ));
    assert!(session.snapshot().history.is_empty());

    session.start().await.unwrap();
    session.end().unwrap();

    let result = session.submit_therapist_turn("Hello again").await;
    assert!(matches!(
        result,
        Err(SessionError::InvalidState {
            phase: SessionPhase::Ended,
            ..
        })
    ));
}

#[tokio::test]
async fn test_start_requires_a_loaded_patient() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    assert!(matches!(
        session.start().await,
        Err(SessionError::NoPatientLoaded)
    ));
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_load_rejects_invalid_profile() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    let mut config = templates::emma_bpd();
    config.core_traits.trust_level = 42.0;

    assert!(matches!(
        session.load(config),
        Err(SessionError::Config(_))
    ));
    assert!(session.patient().is_none());
}

#[tokio::test]
async fn test_load_is_rejected_mid_session() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    session.load(templates::emma_bpd()).unwrap();
    session.start().await.unwrap();

    assert!(matches!(
        session.load(templates::david_mdd()),
        Err(SessionError::InvalidState {
            operation: "load",
            ..
        })
    ));
}

#[tokio::test]
async fn test_full_turn_pipeline() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_reply("*avoids eye contact* Whatever.")
            .with_reply("*voice cracks* He just... left."),
    );
    let mut session = Session::new(Box::new(generator.clone()));
    session.load(templates::emma_bpd()).unwrap();
    session.start().await.unwrap();

    let outcome = session
        .submit_therapist_turn("I understand, that must be really difficult for you")
        .await
        .unwrap();

    // Emma: defensiveness 8, trust 3 -> 0.18*2 * 0.2 * 0.3 = 0.0216.
    assert!(approx(outcome.rapport_delta, 0.0216));
    assert!(approx(outcome.openness_delta, 0.0108));
    assert!(approx(outcome.state.rapport, 5.0216));
    assert_eq!(outcome.reply, "*voice cracks* He just... left.");
    assert!(!outcome.fallback);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.history.len(), 3);
    assert_eq!(snapshot.history[1].speaker, Speaker::Therapist);
    assert_eq!(snapshot.history[2].speaker, Speaker::Patient);
    // Markup is stored intact.
    assert!(snapshot.history[2].text.contains("*voice cracks*"));
    assert!(approx(snapshot.state.rapport, 5.0216));
}

#[tokio::test]
async fn test_generator_failure_substitutes_fallback() {
    let generator = Arc::new(ScriptedGenerator::new().with_reply("Hi.").with_failure());
    let mut session = Session::new(Box::new(generator.clone()));
    session.load(templates::emma_bpd()).unwrap();
    session.start().await.unwrap();

    let outcome = session
        .submit_therapist_turn("I understand, that must be really difficult for you")
        .await
        .unwrap();

    assert!(outcome.fallback);
    assert_eq!(outcome.reply, FALLBACK_REPLY);
    // The classifier/engine stage still applied.
    assert!(outcome.rapport_delta > 0.0);
    assert!(approx(outcome.state.rapport, 5.0216));

    // The fallback is ordinary conversation state.
    let snapshot = session.snapshot();
    assert_eq!(snapshot.history.len(), 3);
    assert_eq!(snapshot.history[2].text, FALLBACK_REPLY);
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[tokio::test]
async fn test_generator_timeout_substitutes_fallback() {
    let generator =
        Arc::new(ScriptedGenerator::new().with_delay(Duration::from_millis(100)));
    let mut session = Session::new(Box::new(generator.clone())).with_options(SessionOptions {
        response_timeout: Duration::from_millis(5),
    });
    session.load(templates::sarah_gad()).unwrap();

    let outcome = session.start().await.unwrap();
    assert!(outcome.fallback);
    assert_eq!(outcome.reply, FALLBACK_REPLY);
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[tokio::test]
async fn test_blank_turn_leaves_state_unchanged() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    session.load(templates::david_mdd()).unwrap();
    session.start().await.unwrap();

    let before = session.state();
    let outcome = session.submit_therapist_turn("   ").await.unwrap();
    assert_eq!(outcome.rapport_delta, 0.0);
    assert_eq!(session.state(), before);
}

#[tokio::test]
async fn test_directive_history_is_trimmed() {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut session = Session::new(Box::new(generator.clone()));
    session.load(templates::sarah_gad()).unwrap();
    session.start().await.unwrap();

    for i in 0..5 {
        session
            .submit_therapist_turn(&format!("Tell me more, round {}", i))
            .await
            .unwrap();
    }

    // 1 opening + 5 turn pairs in the transcript, but the generator only ever
    // sees the trailing window.
    assert_eq!(session.snapshot().history.len(), 11);
    assert_eq!(generator.calls(), 6);
    let directive = generator.last_directive().unwrap();
    assert_eq!(directive.history.len(), HISTORY_WINDOW);
}

#[tokio::test]
async fn test_opening_falls_back_when_generator_is_down() {
    let mut session = Session::new(Box::new(ScriptedGenerator::failing()));
    session.load(templates::david_mdd()).unwrap();

    let outcome = session.start().await.unwrap();
    assert!(outcome.fallback);
    assert_eq!(outcome.reply, FALLBACK_REPLY);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].speaker, Speaker::Patient);
}

#[tokio::test]
async fn test_end_and_reset_transitions() {
    let mut session = Session::new(Box::new(ScriptedGenerator::new()));
    session.load(templates::emma_bpd()).unwrap();

    // end() is only valid while active.
    assert!(matches!(
        session.end(),
        Err(SessionError::InvalidState { operation: "end", .. })
    ));

    session.start().await.unwrap();
    session.submit_therapist_turn("Hello").await.unwrap();
    session.end().unwrap();
    assert_eq!(session.phase(), SessionPhase::Ended);

    // A new persona can be loaded once the session has ended.
    session.load(templates::david_mdd()).unwrap();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.snapshot().history.is_empty());

    session.start().await.unwrap();
    session.reset();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.snapshot().history.is_empty());
    assert_eq!(session.state(), Default::default());
    // The profile survives a reset.
    assert_eq!(session.patient().map(|p| p.name.as_str()), Some("David"));
    session.start().await.unwrap();
}

#[tokio::test]
async fn test_sessions_have_distinct_ids() {
    let first = Session::new(Box::new(ScriptedGenerator::new()));
    let second = Session::new(Box::new(ScriptedGenerator::new()));
    assert_ne!(first.id(), second.id());
}
