use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use pose_arcade::entities::GameStatus;
use pose_arcade::input::{Controls, PoseClassifier, PoseLabel, Prediction, PredictionStabilizer};
use pose_arcade::session::*;
use pose_arcade::sound::{AudioSink, Tone, ToneScheduler, Waveform};
use pose_arcade::weapons::WeaponKey;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Tone>>>);

impl AudioSink for Recorder {
    fn play_tone(&mut self, tone: Tone) {
        self.0.borrow_mut().push(tone);
    }
}

impl Recorder {
    fn last(&self) -> Option<Tone> {
        self.0.borrow().last().copied()
    }

    fn played(&self, frequency: f32) -> bool {
        self.0.borrow().iter().any(|t| t.frequency == frequency)
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn shooter() -> (ShooterSession<StdRng>, Recorder) {
    let rec = Recorder::default();
    let session = ShooterSession::new(seeded_rng(), ToneScheduler::new(Box::new(rec.clone())));
    (session, rec)
}

fn catcher(time_limit: u32) -> (CatcherSession<StdRng>, Recorder) {
    let rec = Recorder::default();
    let session = CatcherSession::new(
        seeded_rng(),
        ToneScheduler::new(Box::new(rec.clone())),
        time_limit,
    );
    (session, rec)
}

/// Counts calls and remembers the last `(score, level)`.
fn counter() -> (Rc<Cell<u32>>, Rc<Cell<(u32, u32)>>, ScoreObserver) {
    let calls = Rc::new(Cell::new(0));
    let last = Rc::new(Cell::new((0, 0)));
    let (c, l) = (Rc::clone(&calls), Rc::clone(&last));
    let cb: ScoreObserver = Box::new(move |score: u32, level: u32| {
        c.set(c.get() + 1);
        l.set((score, level));
    });
    (calls, last, cb)
}

// ── Shooter session ───────────────────────────────────────────────────────────

#[test]
fn shooter_is_idle_until_started() {
    let (mut game, rec) = shooter();
    assert!(!game.is_running());
    assert!(game.render().is_empty());
    game.update(Controls { fire: true, ..Controls::default() });
    assert_eq!(game.state().frame, 0);
    assert!(rec.0.borrow().is_empty());
}

#[test]
fn shooter_start_resets_and_plays_start_tone() {
    let (mut game, rec) = shooter();
    game.start(StartOptions::default());
    assert!(game.is_running());
    assert_eq!(game.state().status, GameStatus::Playing);
    assert!(game.state().weapon.is_some());
    assert_eq!(game.score(), (0, 1));
    assert!(!game.render().is_empty());
    assert_eq!(rec.last(), Some(Tone::new(600.0, 0.5, Waveform::Sine)));
}

#[test]
fn forced_ak47_fires_once_then_cools_down() {
    let (mut game, rec) = shooter();
    game.start(StartOptions::default());
    game.equip(WeaponKey::Pistol);
    game.equip(WeaponKey::Ak47);

    let fire = Controls { fire: true, ..Controls::default() };
    game.update(fire);
    let state = game.state();
    assert_eq!(state.weapon.as_ref().unwrap().ammo, 99);
    assert_eq!(state.projectiles.len(), 1);
    assert_eq!(state.projectiles[0].damage, 10);
    assert_eq!(state.fire_timer, 8);
    assert_eq!(rec.last(), Some(WeaponKey::Ak47.shot_tone()));

    for _ in 0..7 {
        game.update(fire);
    }
    assert_eq!(game.state().weapon.as_ref().unwrap().ammo, 99);
}

#[test]
fn stop_is_idempotent_and_reports_once() {
    let (mut game, rec) = shooter();
    let (calls, last, cb) = counter();
    game.on_game_end(cb);
    game.start(StartOptions::default());
    game.stop();
    game.stop();
    assert_eq!(calls.get(), 1);
    assert_eq!(last.get(), (0, 1));
    assert!(!game.is_running());
    assert!(game.render().is_empty());
    assert_eq!(rec.last(), Some(Tone::new(100.0, 1.0, Waveform::Sawtooth)));

    let frame = game.state().frame;
    game.update(Controls::default());
    assert_eq!(game.state().frame, frame);
}

#[test]
fn stop_before_start_does_nothing() {
    let (mut game, rec) = shooter();
    let (calls, _, cb) = counter();
    game.on_game_end(cb);
    game.stop();
    assert_eq!(calls.get(), 0);
    assert!(rec.0.borrow().is_empty());
}

#[test]
fn death_ends_the_session_exactly_once() {
    let (mut game, _) = shooter();
    let (ends, last_end, cb) = counter();
    game.on_game_end(cb);
    game.start(StartOptions::default());

    let mut frames = 0;
    while game.is_running() && frames < 50_000 {
        game.update(Controls::default());
        frames += 1;
    }
    assert!(!game.is_running(), "player survived {} frames", frames);
    assert_eq!(game.state().player.hp, 0);
    assert_eq!(game.state().status, GameStatus::GameOver);
    assert_eq!(ends.get(), 1);
    assert_eq!(last_end.get(), game.score());

    game.stop();
    game.update(Controls::default());
    assert_eq!(ends.get(), 1);
}

#[test]
fn kills_notify_score_observer() {
    let (mut game, _) = shooter();
    let (changes, last_change, cb) = counter();
    game.on_score_change(cb);
    game.start(StartOptions::default());

    let fire = Controls { fire: true, ..Controls::default() };
    let mut frames = 0;
    while changes.get() == 0 && frames < 50_000 {
        if !game.is_running() {
            game.start(StartOptions::default());
        }
        if frames % 100 == 0 {
            game.equip(WeaponKey::Gatling);
        }
        game.update(fire);
        frames += 1;
    }
    assert!(changes.get() >= 1);
    assert_eq!(last_change.get(), game.score());
    assert_eq!(game.score().0 % 10, 0);
}

#[test]
fn restart_starts_from_scratch() {
    let (mut game, _) = shooter();
    game.start(StartOptions::default());
    for _ in 0..100 {
        game.update(Controls { right: true, ..Controls::default() });
    }
    game.stop();
    game.start(StartOptions::default());
    assert!(game.is_running());
    assert_eq!(game.state().frame, 0);
    assert_eq!(game.state().player.x, 100.0);
    assert!(game.state().enemies.is_empty());
}

// ── Catcher session ───────────────────────────────────────────────────────────

struct Scripted(Vec<Prediction>);

impl PoseClassifier for Scripted {
    fn predict(&mut self) -> Vec<Prediction> {
        self.0.clone()
    }
}

#[test]
fn catcher_uses_default_time_limit() {
    let (mut game, rec) = catcher(45);
    game.start(StartOptions::default());
    assert_eq!(game.state().time_left, 45);
    assert_eq!(rec.last().map(|t| t.frequency), Some(523.25));
}

#[test]
fn catcher_time_limit_override() {
    let (mut game, _) = catcher(60);
    game.start(StartOptions { time_limit: Some(3) });
    assert_eq!(game.state().time_left, 3);
}

#[test]
fn catcher_times_out_once() {
    let (mut game, rec) = catcher(60);
    let (ends, last, cb) = counter();
    game.on_game_end(cb);
    game.start(StartOptions { time_limit: Some(3) });

    for _ in 0..3 {
        assert!(game.is_running());
        game.advance_clock(Duration::from_secs(1));
    }
    assert!(!game.is_running());
    assert_eq!(game.state().time_left, 0);
    assert_eq!(ends.get(), 1);
    assert_eq!(last.get(), (0, 1));
    assert_eq!(rec.last(), Some(Tone::new(783.99, 0.1, Waveform::Triangle)));

    game.advance_clock(Duration::from_secs(5));
    game.stop();
    assert_eq!(ends.get(), 1);
    assert!(game.render().is_empty());
}

#[test]
fn classifier_frames_steer_the_basket() {
    let (mut game, _) = catcher(60);
    game.start(StartOptions::default());
    let stabilizer = PredictionStabilizer::default();

    let mut lean = Scripted(vec![Prediction::new("왼쪽", 0.9), Prediction::new("정면", 0.1)]);
    game.update_from_classifier(&mut lean, &stabilizer);
    assert_eq!(game.state().pose, PoseLabel::Left);
    assert_eq!(game.state().lane, 0);

    let mut unsure = Scripted(vec![Prediction::new("오른쪽", 0.4)]);
    game.update_from_classifier(&mut unsure, &stabilizer);
    assert_eq!(game.state().pose, PoseLabel::Center);
    assert_eq!(game.state().lane, 1);
}

#[test]
fn catches_play_a_sound_and_notify() {
    let (mut game, rec) = catcher(600);
    let (changes, last, cb) = counter();
    game.on_score_change(cb);
    game.start(StartOptions::default());

    let mut frames = 0;
    while changes.get() == 0 && frames < 10_000 {
        game.update(PoseLabel::Center);
        frames += 1;
    }
    assert!(changes.get() >= 1);
    assert_eq!(last.get(), game.score());
    assert!(rec.played(880.0) || rec.played(150.0));
}

#[test]
fn stop_silences_pending_tones() {
    let (mut game, _) = catcher(60);
    game.start(StartOptions::default());
    assert_eq!(game.sounds().pending(), 2);
    game.stop();
    // only the game-over arpeggio is left waiting
    assert_eq!(game.sounds().pending(), 2);
    game.advance_clock(Duration::from_secs(1));
    assert_eq!(game.sounds().pending(), 0);
}
