//! Game sessions — the control surface the host drives once per frame.
//!
//! A session owns one game's state, its RNG and its sound scheduler, runs the
//! pure simulation functions, and turns the events they report into sounds
//! and observer callbacks.  Sessions are plain values owned by the host;
//! nothing here is global.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::catcher::{self, CatcherEvent, CatcherState, FruitKind};
use crate::compute;
use crate::entities::{FrameEvent, GameStatus, ShooterState};
use crate::frame::{self, DrawCommand};
use crate::input::{Controls, PoseClassifier, PoseLabel, PredictionStabilizer};
use crate::sound::{SoundCue, ToneScheduler};
use crate::weapons::WeaponKey;

/// Callback receiving `(score, level)`.
pub type ScoreObserver = Box<dyn FnMut(u32, u32)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Seconds on the clock; only the fruit catcher has one.
    pub time_limit: Option<u32>,
}

/// What every game session offers its host.
pub trait Game {
    type Input;

    /// Reset everything and begin a new round.
    fn start(&mut self, options: StartOptions);
    /// End the round.  Calling it again does nothing.
    fn stop(&mut self);
    /// Advance one frame.  Ignored unless running.
    fn update(&mut self, input: Self::Input);
    /// Draw commands for the current frame; empty unless running.
    fn render(&self) -> Vec<DrawCommand>;
    /// Feed elapsed wall-clock time to timers and the sound scheduler.
    fn advance_clock(&mut self, dt: Duration);
    fn is_running(&self) -> bool;
    /// Current `(score, level)`.
    fn score(&self) -> (u32, u32);
    fn on_score_change(&mut self, observer: ScoreObserver);
    /// Fired exactly once per round, when it ends.
    fn on_game_end(&mut self, observer: ScoreObserver);
}

#[derive(Default)]
struct Observers {
    score_change: Option<ScoreObserver>,
    game_end: Option<ScoreObserver>,
}

impl Observers {
    fn score_changed(&mut self, score: u32, level: u32) {
        if let Some(cb) = self.score_change.as_mut() {
            cb(score, level);
        }
    }

    fn game_ended(&mut self, score: u32, level: u32) {
        if let Some(cb) = self.game_end.as_mut() {
            cb(score, level);
        }
    }
}

// ── Shooter ──────────────────────────────────────────────────────────────────

pub struct ShooterSession<R: Rng> {
    state: ShooterState,
    rng: R,
    sounds: ToneScheduler,
    observers: Observers,
    running: bool,
}

impl<R: Rng> ShooterSession<R> {
    pub fn new(rng: R, sounds: ToneScheduler) -> Self {
        Self {
            state: ShooterState::new(),
            rng,
            sounds,
            observers: Observers::default(),
            running: false,
        }
    }

    pub fn state(&self) -> &ShooterState {
        &self.state
    }

    pub fn sounds(&self) -> &ToneScheduler {
        &self.sounds
    }

    /// Hand the player a specific weapon (same stacking rule as a pickup).
    pub fn equip(&mut self, key: WeaponKey) {
        if self.running {
            self.state = compute::equip_weapon(&self.state, key);
        }
    }

    fn dispatch_events(&mut self) {
        let mut died = false;
        for event in std::mem::take(&mut self.state.events) {
            match event {
                FrameEvent::Shot(key) => self.sounds.play(SoundCue::Shot(key)),
                FrameEvent::EnemyKilled { .. } => self.sounds.play(SoundCue::EnemyDeath),
                FrameEvent::ItemPicked { .. } => self.sounds.play(SoundCue::Pickup),
                FrameEvent::PlayerHit { .. } => self.sounds.play(SoundCue::PlayerHit),
                FrameEvent::ScoreChanged { score, level } => {
                    self.observers.score_changed(score, level)
                }
                FrameEvent::PlayerDied => died = true,
                FrameEvent::ItemDropped(_) => {}
            }
        }
        if died {
            self.stop();
        }
    }
}

impl<R: Rng> Game for ShooterSession<R> {
    type Input = Controls;

    fn start(&mut self, _options: StartOptions) {
        self.state = compute::init_state(&mut self.rng);
        self.running = true;
        self.sounds.clear();
        self.sounds.play(SoundCue::ShooterStart);
        info!(
            weapon = ?self.state.weapon.as_ref().map(|w| w.key),
            "shooter started"
        );
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.state.status = GameStatus::GameOver;
        self.sounds.clear();
        self.sounds.play(SoundCue::ShooterOver);
        let (score, level) = self.score();
        info!(score, level, frames = self.state.frame, "shooter stopped");
        self.observers.game_ended(score, level);
    }

    fn update(&mut self, input: Controls) {
        if !self.running {
            return;
        }
        self.state = compute::tick(&self.state, &input, &mut self.rng);
        self.dispatch_events();
    }

    fn render(&self) -> Vec<DrawCommand> {
        if !self.running {
            return Vec::new();
        }
        frame::draw_shooter(&self.state)
    }

    fn advance_clock(&mut self, dt: Duration) {
        self.sounds.advance(dt);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn score(&self) -> (u32, u32) {
        (self.state.score.score, self.state.score.level)
    }

    fn on_score_change(&mut self, observer: ScoreObserver) {
        self.observers.score_change = Some(observer);
    }

    fn on_game_end(&mut self, observer: ScoreObserver) {
        self.observers.game_end = Some(observer);
    }
}

// ── Fruit catcher ────────────────────────────────────────────────────────────

pub struct CatcherSession<R: Rng> {
    state: CatcherState,
    rng: R,
    sounds: ToneScheduler,
    observers: Observers,
    running: bool,
    default_time_limit: u32,
}

impl<R: Rng> CatcherSession<R> {
    pub fn new(rng: R, sounds: ToneScheduler, default_time_limit: u32) -> Self {
        Self {
            state: CatcherState::new(default_time_limit),
            rng,
            sounds,
            observers: Observers::default(),
            running: false,
            default_time_limit,
        }
    }

    pub fn state(&self) -> &CatcherState {
        &self.state
    }

    pub fn sounds(&self) -> &ToneScheduler {
        &self.sounds
    }

    /// Run one frame from a classifier reading.  Low-confidence frames
    /// count as center.
    pub fn update_from_classifier(
        &mut self,
        classifier: &mut impl PoseClassifier,
        stabilizer: &PredictionStabilizer,
    ) {
        if !self.running {
            return;
        }
        let predictions = classifier.predict();
        self.update(stabilizer.pose(&predictions));
    }

    fn dispatch_events(&mut self) {
        let mut time_up = false;
        for event in std::mem::take(&mut self.state.events) {
            match event {
                CatcherEvent::Caught { kind, .. } => {
                    let cue = match kind {
                        FruitKind::Apple | FruitKind::Banana => SoundCue::Good,
                        FruitKind::Bomb => SoundCue::Bad,
                    };
                    self.sounds.play(cue);
                }
                CatcherEvent::ScoreChanged { score, level } => {
                    self.observers.score_changed(score, level)
                }
                CatcherEvent::TimeUp => time_up = true,
            }
        }
        if time_up {
            self.stop();
        }
    }
}

impl<R: Rng> Game for CatcherSession<R> {
    type Input = PoseLabel;

    fn start(&mut self, options: StartOptions) {
        let time_limit = options.time_limit.unwrap_or(self.default_time_limit);
        self.state = catcher::init_state(time_limit);
        self.running = true;
        self.sounds.clear();
        self.sounds.play(SoundCue::CatcherStart);
        info!(time_limit, "fruit catcher started");
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.state.status = GameStatus::GameOver;
        self.state.clock = Duration::ZERO;
        self.sounds.clear();
        self.sounds.play(SoundCue::CatcherOver);
        let (score, level) = self.score();
        info!(score, level, time_left = self.state.time_left, "fruit catcher stopped");
        self.observers.game_ended(score, level);
    }

    fn update(&mut self, input: PoseLabel) {
        if !self.running {
            return;
        }
        self.state = catcher::tick(&self.state, input, &mut self.rng);
        self.dispatch_events();
    }

    fn render(&self) -> Vec<DrawCommand> {
        if !self.running {
            return Vec::new();
        }
        frame::draw_catcher(&self.state)
    }

    fn advance_clock(&mut self, dt: Duration) {
        self.sounds.advance(dt);
        if !self.running {
            return;
        }
        self.state = catcher::advance_clock(&self.state, dt);
        self.dispatch_events();
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn score(&self) -> (u32, u32) {
        (self.state.score.score, self.state.score.level)
    }

    fn on_score_change(&mut self, observer: ScoreObserver) {
        self.observers.score_change = Some(observer);
    }

    fn on_game_end(&mut self, observer: ScoreObserver) {
        self.observers.game_end = Some(observer);
    }
}
