//! Integration tests for the quiz session (presentation adapter).
//!
//! Sessions render into a `Vec<Event>` and read from a `MemorySource`, and
//! the tokio clock is paused so timer-driven tests run instantly.

use std::time::Duration;

use bioskills_core::session::{LOAD_FAILED_MESSAGE, NO_QUESTION_MESSAGE};
use bioskills_core::{
    Catalog, CoreError, Event, MemorySource, Question, QuestionTimer, QuizConfig, QuizSession,
    QuizState, SetEntry, Technique, UserInput,
};
use tokio::sync::mpsc;

const DEFAULT_SET: &str = "Set-1-questions.json";

fn set_one() -> Vec<Question> {
    vec![
        Question::new("Q1", ["A", "B"], "A", "E1"),
        Question::new("Q2", ["C", "D"], "D", "E2"),
    ]
}

fn source() -> MemorySource {
    MemorySource::new()
        .with_set(DEFAULT_SET, set_one())
        .with_set(
            "Set-5-questions.json",
            vec![Question::new("How many mL?", ["5", "50"], "50", "C1V1 = C2V2")],
        )
        .with_set(
            "broken.json",
            vec![Question::new("Q", ["A", "B"], "Z", "answer missing from options")],
        )
        .with_set("empty.json", Vec::new())
}

fn settings() -> QuizConfig {
    QuizConfig {
        time_per_question: 3,
        ..QuizConfig::default()
    }
}

fn session(settings: QuizConfig) -> QuizSession<MemorySource, Vec<Event>> {
    QuizSession::new(source(), Vec::new(), settings, DEFAULT_SET)
}

fn kinds(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::kind).collect()
}

#[tokio::test(start_paused = true)]
async fn test_load_shows_first_question() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    assert_eq!(kinds(s.renderer()), ["set_loaded", "question_started"]);
    match &s.renderer()[1] {
        Event::QuestionStarted {
            number,
            total,
            prompt,
            options,
            time_budget,
            ..
        } => {
            assert_eq!((*number, *total), (1, 2));
            assert_eq!(prompt, "Q1");
            assert_eq!(options, &["A", "B"]);
            assert_eq!(*time_budget, 3);
        }
        other => panic!("Expected QuestionStarted, got {other:?}"),
    }
    assert!(s.timer_running());
    assert_eq!(s.resource(), Some(DEFAULT_SET));
}

#[tokio::test(start_paused = true)]
async fn test_catalog_id_resolves_and_calculation_budget_applies() {
    let mut s = session(settings());
    s.switch_set("set-5").await.unwrap();
    assert_eq!(s.resource(), Some("Set-5-questions.json"));
    assert!(matches!(
        s.renderer()[0],
        Event::SetLoaded { time_budget: 60, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_answer_then_next_then_finish() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    s.select("A");
    assert!(!s.timer_running());
    s.next();
    assert!(s.timer_running());
    s.choose(1);
    s.next();

    assert_eq!(
        kinds(s.renderer()),
        [
            "set_loaded",
            "question_started",
            "answer_submitted",
            "question_started",
            "answer_submitted",
            "quiz_finished"
        ]
    );
    match s.renderer().last().unwrap() {
        Event::QuizFinished { score, total, .. } => assert_eq!((*score, *total), (1, 2)),
        other => panic!("Expected QuizFinished, got {other:?}"),
    }
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_second_answer_is_not_rendered() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();
    s.select("B");
    s.select("A");
    s.choose(1);

    let answers: Vec<_> = s
        .renderer()
        .iter()
        .filter(|e| matches!(e, Event::AnswerSubmitted { .. }))
        .collect();
    assert_eq!(answers.len(), 1);
    assert_eq!(s.engine().score(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_choice_is_ignored() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();
    s.choose(0);
    s.choose(9);
    assert_eq!(s.engine().state(), QuizState::TimerRunning);
    assert_eq!(s.renderer().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_waits_for_next_by_default() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    s.on_tick();
    s.on_tick();
    s.on_tick();
    s.on_tick();
    s.select("A");

    assert_eq!(
        kinds(s.renderer()),
        [
            "set_loaded",
            "question_started",
            "timer_ticked",
            "timer_ticked",
            "timer_ticked",
            "timed_out"
        ]
    );
    assert!(matches!(
        s.renderer()[2],
        Event::TimerTicked {
            remaining: 2,
            warning: true,
            ..
        }
    ));
    assert_eq!(s.engine().state(), QuizState::TimedOut);
    assert_eq!(s.engine().score(), 0);
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_warning_flag_follows_threshold() {
    let mut s = session(QuizConfig {
        time_per_question: 20,
        warning_threshold: 10,
        ..QuizConfig::default()
    });
    s.switch_set(DEFAULT_SET).await.unwrap();
    for _ in 0..10 {
        s.on_tick();
    }
    let warnings: Vec<bool> = s
        .renderer()
        .iter()
        .filter_map(|e| match e {
            Event::TimerTicked { warning, .. } => Some(*warning),
            _ => None,
        })
        .collect();
    // Remaining 19..=11 are calm, 10 is the first warning.
    assert_eq!(warnings, [false, false, false, false, false, false, false, false, false, true]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_auto_advances_when_enabled() {
    let mut s = session(QuizConfig {
        auto_advance: true,
        ..settings()
    });
    s.switch_set(DEFAULT_SET).await.unwrap();
    for _ in 0..3 {
        s.on_tick();
    }

    let events = kinds(s.renderer());
    assert_eq!(&events[events.len() - 2..], ["timed_out", "question_started"]);
    assert_eq!(s.engine().index(), 1);
    assert!(s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_failed_switch_keeps_running_quiz() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();
    s.on_tick();

    let err = s.switch_set("missing.json").await.unwrap_err();
    assert!(matches!(err, CoreError::Load(_)));

    match s.renderer().last().unwrap() {
        Event::LoadFailed {
            resource, message, ..
        } => {
            assert_eq!(resource, "missing.json");
            assert_eq!(message, LOAD_FAILED_MESSAGE);
        }
        other => panic!("Expected LoadFailed, got {other:?}"),
    }
    assert_eq!(s.resource(), Some(DEFAULT_SET));
    assert_eq!(s.engine().state(), QuizState::TimerRunning);
    assert_eq!(s.engine().time_remaining(), 2);
    assert!(s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_set_is_reported_as_load_failure() {
    let mut s = session(settings());
    let err = s.switch_set("broken.json").await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidData(_)));
    let err = s.switch_set("empty.json").await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidData(_)));

    assert_eq!(kinds(s.renderer()), ["load_failed", "load_failed"]);
    assert_eq!(s.engine().total(), 0);
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_show_question_without_set_renders_error() {
    let mut s = session(settings());
    s.show_question();
    match s.renderer().as_slice() {
        [Event::Error { message, .. }] => assert_eq!(message, NO_QUESTION_MESSAGE),
        other => panic!("Expected a single Error, got {other:?}"),
    }
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_restart_reloads_default_set() {
    let mut s = session(settings());
    s.switch_set("Set-5-questions.json").await.unwrap();
    s.select("50");
    s.next();
    assert_eq!(s.engine().state(), QuizState::Finished);

    s.restart().await.unwrap();
    assert_eq!(s.resource(), Some(DEFAULT_SET));
    assert_eq!(s.engine().score(), 0);
    assert_eq!(s.engine().index(), 0);
    assert_eq!(s.engine().time_budget(), 3);
    assert_eq!(s.engine().state(), QuizState::TimerRunning);
}

#[tokio::test(start_paused = true)]
async fn test_run_processes_inputs_until_channel_closes() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserInput::Select("A".into())).unwrap();
    tx.send(UserInput::Next).unwrap();
    tx.send(UserInput::Choose(2)).unwrap();
    tx.send(UserInput::Next).unwrap();
    drop(tx);

    s.run(&mut rx).await;

    match s.renderer().last().unwrap() {
        Event::QuizFinished { score, total, .. } => assert_eq!((*score, *total), (2, 2)),
        other => panic!("Expected QuizFinished, got {other:?}"),
    }
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_quit() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserInput::Quit).unwrap();
    tx.send(UserInput::Select("A".into())).unwrap();

    s.run(&mut rx).await;
    assert_eq!(s.engine().score(), 0);
    assert!(!s.timer_running());
}

#[tokio::test(start_paused = true)]
async fn test_run_drives_timeouts_from_real_timer() {
    let mut s = session(QuizConfig {
        time_per_question: 2,
        auto_advance: true,
        ..QuizConfig::default()
    });
    s.switch_set(DEFAULT_SET).await.unwrap();

    let (_tx, mut rx) = mpsc::unbounded_channel();
    let _ = tokio::time::timeout(Duration::from_secs(30), s.run(&mut rx)).await;

    let timeouts = s
        .renderer()
        .iter()
        .filter(|e| matches!(e, Event::TimedOut { .. }))
        .count();
    assert_eq!(timeouts, 2);
    match s.renderer().last().unwrap() {
        Event::QuizFinished { score, total, .. } => assert_eq!((*score, *total), (0, 2)),
        other => panic!("Expected QuizFinished, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_switch_set_input_changes_sets() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserInput::SwitchSet("missing.json".into())).unwrap();
    tx.send(UserInput::SwitchSet("set-5".into())).unwrap();
    tx.send(UserInput::Select("50".into())).unwrap();
    drop(tx);

    s.run(&mut rx).await;
    assert_eq!(s.resource(), Some("Set-5-questions.json"));
    assert_eq!(s.engine().score(), 1);
    assert!(kinds(s.renderer()).contains(&"load_failed"));
}

#[tokio::test(start_paused = true)]
async fn test_custom_catalog_and_fast_timer() {
    let catalog = Catalog {
        techniques: vec![Technique {
            id: "pcr".into(),
            title: "PCR".into(),
            icon: "x".into(),
            coming_soon: false,
            sets: vec![SetEntry {
                id: "pcr-1".into(),
                title: "PCR basics".into(),
                resource: DEFAULT_SET.into(),
                calculation: true,
            }],
        }],
        ..Catalog::default()
    };
    let mut s = session(settings())
        .with_catalog(catalog)
        .with_timer(QuestionTimer::new(Duration::from_millis(100)));
    s.switch_set("pcr-1").await.unwrap();
    assert_eq!(s.engine().time_budget(), 60);
    s.renderer_mut().clear();

    let (_tx, mut rx) = mpsc::unbounded_channel();
    let started = tokio::time::Instant::now();
    let _ = tokio::time::timeout(Duration::from_millis(350), s.run(&mut rx)).await;
    assert!(started.elapsed() < Duration::from_secs(1));

    let ticks: Vec<u32> = s
        .renderer()
        .iter()
        .filter_map(|e| match e {
            Event::TimerTicked { remaining, .. } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, [59, 58, 57]);
}

#[tokio::test(start_paused = true)]
async fn test_text_outside_options_is_ignored() {
    let mut s = session(settings());
    s.switch_set(DEFAULT_SET).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserInput::Select("help".into())).unwrap();
    tx.send(UserInput::Select("a".into())).unwrap();
    drop(tx);
    s.run(&mut rx).await;

    assert_eq!(kinds(s.renderer()), ["set_loaded", "question_started"]);
    assert_eq!(s.engine().state(), QuizState::TimerRunning);
    assert!(!s.engine().is_locked());
}

#[tokio::test(start_paused = true)]
async fn test_numeric_option_text_can_be_chosen() {
    let mut s = session(settings());
    s.switch_set("set-5").await.unwrap();

    // Not a valid position, but the text of an option.
    s.choose(50);
    assert_eq!(s.engine().state(), QuizState::Answered);
    assert_eq!(s.engine().score(), 1);
    match s.renderer().last().unwrap() {
        Event::AnswerSubmitted { selected, .. } => assert_eq!(selected, "50"),
        other => panic!("Expected AnswerSubmitted, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_position_wins_over_numeric_text() {
    let mut s = session(settings());
    s.switch_set("set-5").await.unwrap();

    // Options are ["5", "50"]; 1 is a position, not the text "5".
    s.choose(1);
    match s.renderer().last().unwrap() {
        Event::AnswerSubmitted { selected, correct, .. } => {
            assert_eq!(selected, "5");
            assert!(!correct);
        }
        other => panic!("Expected AnswerSubmitted, got {other:?}"),
    }
}
