use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use cubetime::clock::ManualClock;
use cubetime::display::ScreenModel;
use cubetime::input::{Action, KeyBindings};
use cubetime::runtime::{FixedTicker, Runner, TestEventSource, TimerEvent};
use cubetime::storage::MemoryKvStore;
use cubetime::store::SolveStore;
use cubetime::{SessionController, SessionOptions, TimerState};

type Controller = SessionController<MemoryKvStore, ManualClock, ScreenModel>;

fn key(code: KeyCode, kind: KeyEventKind) -> TimerEvent {
    TimerEvent::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    })
}

fn controller(clock: &ManualClock) -> Controller {
    SessionController::with_rng(
        SolveStore::load(MemoryKvStore::new()),
        clock.clone(),
        ScreenModel::default(),
        SessionOptions::default(),
        StdRng::seed_from_u64(7),
    )
}

/// Drain queued events through the same dispatch the binary uses
fn pump(
    runner: &Runner<TestEventSource, FixedTicker>,
    bindings: KeyBindings,
    c: &mut Controller,
    events: usize,
) {
    let mut handled = 0;
    for _ in 0..100u32 {
        match runner.step(c.timer().is_running()) {
            TimerEvent::Tick => {
                c.tick();
            }
            TimerEvent::Resize => {}
            TimerEvent::Key(k) => {
                handled += 1;
                match bindings.map(k, false) {
                    Some(Action::Primary) => c.primary_action(),
                    Some(Action::Press) => c.press(),
                    Some(Action::Release) => c.release(),
                    Some(Action::Save) => {
                        c.save();
                    }
                    Some(Action::Reset) => c.reset(),
                    _ => {}
                }
                if handled == events {
                    return;
                }
            }
        }
    }
}

fn send(tx: &Sender<TimerEvent>, ev: TimerEvent) {
    tx.send(ev).unwrap();
}

#[test]
fn headless_hold_gesture_records_solve() {
    let clock = ManualClock::new(1_700_000_000_000);
    let mut c = controller(&clock);
    let bindings = KeyBindings::new(true);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    send(&tx, key(KeyCode::Char(' '), KeyEventKind::Press));
    pump(&runner, bindings, &mut c, 1);
    assert_eq!(c.timer().state(), TimerState::Ready);

    send(&tx, key(KeyCode::Char(' '), KeyEventKind::Release));
    pump(&runner, bindings, &mut c, 1);
    assert_eq!(c.timer().state(), TimerState::Running);

    clock.advance(12_345);
    assert!(matches!(runner.step(true), TimerEvent::Tick));
    assert_eq!(c.tick(), Some(12_345));
    assert_eq!(c.sink().time, "00:12.345");

    send(&tx, key(KeyCode::Char(' '), KeyEventKind::Press));
    send(&tx, key(KeyCode::Char(' '), KeyEventKind::Release));
    send(&tx, key(KeyCode::Char('s'), KeyEventKind::Press));
    pump(&runner, bindings, &mut c, 3);

    assert_eq!(c.store().len(), 1);
    assert_eq!(c.store().all()[0].duration_ms, 12_345);
    assert_eq!(c.sink().stats.personal_best, "00:12.345");
    assert_eq!(c.timer().state(), TimerState::Idle);
}

#[test]
fn headless_primary_key_flow_without_hold() {
    let clock = ManualClock::new(1_700_000_000_000);
    let mut c = controller(&clock);
    let bindings = KeyBindings::new(false);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    send(&tx, key(KeyCode::Char(' '), KeyEventKind::Press));
    pump(&runner, bindings, &mut c, 1);
    assert!(c.timer().is_running());

    clock.advance(800);
    send(&tx, key(KeyCode::Enter, KeyEventKind::Press));
    pump(&runner, bindings, &mut c, 1);
    assert_eq!(c.timer().state(), TimerState::Stopped);
    assert_eq!(c.timer().elapsed_ms(), 800);

    // reset discards the run instead of saving it
    send(&tx, key(KeyCode::Char('r'), KeyEventKind::Press));
    send(&tx, key(KeyCode::Char('s'), KeyEventKind::Press));
    pump(&runner, bindings, &mut c, 2);
    assert!(c.store().is_empty());
    assert_eq!(c.sink().time, "00:00.000");
}

#[test]
fn headless_ticks_stop_after_stop() {
    let clock = ManualClock::new(0);
    let mut c = controller(&clock);

    c.primary_action();
    clock.advance(50);
    assert_eq!(c.tick(), Some(50));

    c.primary_action();
    let updates = c.sink().time_updates;
    clock.advance(50);
    assert_eq!(c.tick(), None);
    assert_eq!(c.sink().time_updates, updates);
    assert_eq!(c.timer().elapsed_ms(), 50);
}
