//! Integration tests for the cycle completion protocol.
//!
//! Drives the timer through whole cycles against a real SQLite store and
//! checks what ends up persisted.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use focusos_core::recorder::completed_work_cycles_today;
use focusos_core::{
    Clock, Completion, CycleType, Database, DurationPolicy, DurationProfile, EffectRunner, FocusTimer,
    ManualClock, RunState, SessionStore, TaskStore, TracingNotifier, UserContext,
};

fn runner(db: &Arc<Database>) -> EffectRunner {
    EffectRunner::new(db.clone(), db.clone(), Arc::new(TracingNotifier))
}

fn finish_cycle(timer: &mut FocusTimer) -> Completion {
    timer.start();
    loop {
        if let Some(done) = timer.tick() {
            return done;
        }
    }
}

#[test]
fn completed_work_cycle_is_recorded() {
    let db = Arc::new(Database::open_memory().unwrap());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 0).unwrap(),
    ));
    let user = UserContext::new("u1");
    let policy = DurationPolicy::resolve(&DurationProfile {
        work_minutes: Some(25),
        short_break_minutes: Some(5),
        long_break_minutes: Some(15),
    });
    let mut timer = FocusTimer::new(policy, user.clone(), clock.clone());

    timer.start();
    let mut completion = None;
    for _ in 0..1500 {
        if let Some(done) = timer.tick() {
            assert!(completion.is_none(), "completion fired twice");
            completion = Some(done);
        }
    }
    let done = completion.expect("work cycle should expire after 1500 ticks");

    let report = runner(&db).run(&done.intents);
    assert!(report.is_clean());

    let sessions = db.list_by_user("u1").unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].cycle_type, CycleType::Work);
    assert_eq!(sessions[0].duration_minutes, 25);
    assert_eq!(sessions[0].created_at, clock.now());
    assert_eq!(timer.completed_work_cycles(), 1);
    assert_eq!(timer.cycle_type(), CycleType::ShortBreak);
    assert_eq!(timer.run_state(), RunState::Idle);
}

#[test]
fn selected_task_accrues_work_minutes() {
    let db = Arc::new(Database::open_memory().unwrap());
    let user = UserContext::new("u1");
    let task = db.create_task(&user, "Write chapter", 60, None).unwrap();
    db.increment_actual_minutes(&task.id, 10).unwrap();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut timer = FocusTimer::new(DurationPolicy::default(), user, clock);
    timer.select_task(Some(task.id.clone()));

    let done = finish_cycle(&mut timer);
    runner(&db).run(&done.intents);

    let task = db.get_task(&task.id).unwrap().unwrap();
    assert_eq!(task.actual_minutes, 35);
    let sessions = db.list_by_user("u1").unwrap();
    assert_eq!(sessions[0].task_id.as_deref(), Some(task.id.as_str()));
}

#[test]
fn break_cycles_never_touch_tasks() {
    let db = Arc::new(Database::open_memory().unwrap());
    let user = UserContext::new("u1");
    let task = db.create_task(&user, "Read", 30, None).unwrap();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut timer = FocusTimer::new(DurationPolicy::default(), user, clock);
    timer.select_task(Some(task.id.clone()));
    timer.select_cycle_type(CycleType::ShortBreak);

    let done = finish_cycle(&mut timer);
    runner(&db).run(&done.intents);

    assert_eq!(db.get_task(&task.id).unwrap().unwrap().actual_minutes, 0);
    let sessions = db.list_by_user("u1").unwrap();
    assert_eq!(sessions[0].cycle_type, CycleType::ShortBreak);
    assert_eq!(sessions[0].duration_minutes, 5);
    assert!(sessions[0].task_id.is_none());
    assert_eq!(timer.cycle_type(), CycleType::Work);
}

#[test]
fn missing_task_does_not_block_the_timer_or_the_session() {
    let db = Arc::new(Database::open_memory().unwrap());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut timer = FocusTimer::new(DurationPolicy::default(), UserContext::new("u1"), clock);
    timer.select_task(Some("deleted-task".into()));

    let done = finish_cycle(&mut timer);
    let report = runner(&db).run(&done.intents);

    assert!(!report.is_clean());
    assert!(report.session_id.is_some());
    assert_eq!(db.list_by_user("u1").unwrap().len(), 1);
    assert_eq!(timer.cycle_type(), CycleType::ShortBreak);
    assert_eq!(timer.run_state(), RunState::Idle);
}

#[test]
fn reset_records_nothing() {
    let db = Arc::new(Database::open_memory().unwrap());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut timer = FocusTimer::new(DurationPolicy::default(), UserContext::new("u1"), clock);

    timer.start();
    for _ in 0..1499 {
        assert!(timer.tick().is_none());
    }
    timer.reset();
    assert_eq!(timer.remaining_seconds(), 1500);
    assert_eq!(timer.completed_work_cycles(), 0);
    assert!(db.list_by_user("u1").unwrap().is_empty());
}

#[test]
fn full_rotation_from_persisted_history() {
    let db = Arc::new(Database::open_memory().unwrap());
    let user = UserContext::new("u1");
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let effects = runner(&db);

    let mut timer = FocusTimer::new(DurationPolicy::default(), user.clone(), clock.clone());
    let mut sequence = Vec::new();
    for _ in 0..8 {
        clock.advance(Duration::minutes(25));
        let done = finish_cycle(&mut timer);
        effects.run(&done.intents);
        sequence.push(done.next);
    }

    assert_eq!(
        sequence,
        vec![
            CycleType::ShortBreak,
            CycleType::Work,
            CycleType::ShortBreak,
            CycleType::Work,
            CycleType::ShortBreak,
            CycleType::Work,
            CycleType::LongBreak,
            CycleType::Work,
        ]
    );

    // A fresh timer later the same day picks up the count.
    let seeded = completed_work_cycles_today(db.as_ref(), &user, clock.now(), &Utc);
    assert_eq!(seeded, 4);

    let mut timer = FocusTimer::new(DurationPolicy::default(), user, clock.clone())
        .with_completed_work_cycles(seeded);
    let done = finish_cycle(&mut timer);
    assert_eq!(done.completed_work_cycles, 5);
    assert_eq!(done.next, CycleType::ShortBreak);
}
