//! Fruit catcher — a three-lane basket steered by the player's pose.
//!
//! Same shape as the shooter logic: pure functions over a cloneable state,
//! randomness injected, notable happenings reported as events.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::entities::{GameStatus, PLAYFIELD};
use crate::input::PoseLabel;
use crate::scoring::{ScoreBoard, CATCHER_LEVEL_DIVISOR};

/// Lane centres on the 200-unit playfield.
pub const LANES: [f32; 3] = [33.0, 100.0, 167.0];
pub const CENTER_LANE: usize = 1;

pub const BASKET_WIDTH: f32 = 40.0;
pub const BASKET_HEIGHT: f32 = 20.0;
pub const BASKET_Y: f32 = 180.0;

pub const DEFAULT_TIME_LIMIT: u32 = 60;

const FRUIT_START_Y: f32 = -20.0;
const INITIAL_SPAWN_INTERVAL: f32 = 60.0;
pub const SPAWN_INTERVAL_FLOOR: f32 = 15.0;
const SPAWN_INTERVAL_DECAY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FruitKind {
    Apple,
    Banana,
    Bomb,
}

impl FruitKind {
    pub fn points(self) -> i32 {
        match self {
            FruitKind::Apple => 50,
            FruitKind::Banana => 100,
            FruitKind::Bomb => -100,
        }
    }

    /// Multiplier on the level's base fall speed.
    fn speed_factor(self) -> f32 {
        match self {
            FruitKind::Apple => 1.0,
            FruitKind::Banana => 1.3,
            FruitKind::Bomb => 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub x: f32,
    pub y: f32,
    pub lane: usize,
    pub kind: FruitKind,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatcherEvent {
    Caught { kind: FruitKind, points: i32 },
    ScoreChanged { score: u32, level: u32 },
    TimeUp,
}

#[derive(Clone, Debug)]
pub struct CatcherState {
    /// Index into `LANES`.
    pub lane: usize,
    /// Pose seen on the last tick, kept for the HUD.
    pub pose: PoseLabel,
    pub fruits: Vec<Fruit>,
    pub score: ScoreBoard,
    pub spawn_timer: u32,
    pub spawn_interval: f32,
    /// Whole seconds left on the countdown.
    pub time_left: u32,
    /// Time accumulated toward the next countdown second.
    pub clock: Duration,
    pub status: GameStatus,
    pub frame: u64,
    pub events: Vec<CatcherEvent>,
}

impl CatcherState {
    pub fn new(time_limit: u32) -> Self {
        Self {
            lane: CENTER_LANE,
            pose: PoseLabel::Center,
            fruits: Vec::new(),
            score: ScoreBoard::new(CATCHER_LEVEL_DIVISOR),
            spawn_timer: 0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            time_left: time_limit,
            clock: Duration::ZERO,
            status: GameStatus::Ready,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn basket_x(&self) -> f32 {
        LANES[self.lane]
    }
}

pub fn lane_for(pose: PoseLabel) -> usize {
    match pose {
        PoseLabel::Left => 0,
        PoseLabel::Center => CENTER_LANE,
        PoseLabel::Right => 2,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn init_state(time_limit: u32) -> CatcherState {
    let mut state = CatcherState::new(time_limit);
    state.status = GameStatus::Playing;
    state
}

pub fn spawn_fruit(state: &CatcherState, rng: &mut impl Rng) -> CatcherState {
    let mut next = state.clone();
    spawn_in_place(&mut next, rng);
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Snap the basket to the lane for `pose`, spawn, then move and catch fruit.
pub fn tick(state: &CatcherState, pose: PoseLabel, rng: &mut impl Rng) -> CatcherState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;

    // ── 1. Basket ────────────────────────────────────────────────────────────
    next.pose = pose;
    next.lane = lane_for(pose);

    // ── 2. Spawn ─────────────────────────────────────────────────────────────
    next.spawn_timer += 1;
    if next.spawn_timer as f32 > next.spawn_interval {
        spawn_in_place(&mut next, rng);
        next.spawn_timer = 0;
        next.spawn_interval = (next.spawn_interval - SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR);
    }

    // ── 3. Fruit movement and catching ───────────────────────────────────────
    let fruits = std::mem::take(&mut next.fruits);
    for mut fruit in fruits {
        fruit.y += fruit.speed;

        let in_basket_band = fruit.y > BASKET_Y && fruit.y < PLAYFIELD;
        if in_basket_band && fruit.lane == next.lane {
            let points = fruit.kind.points();
            let (score, level) = next.score.add(points);
            debug!(kind = ?fruit.kind, points, score, "fruit caught");
            next.events.push(CatcherEvent::Caught {
                kind: fruit.kind,
                points,
            });
            next.events.push(CatcherEvent::ScoreChanged { score, level });
            continue;
        }
        if fruit.y > PLAYFIELD {
            continue;
        }
        next.fruits.push(fruit);
    }

    next
}

/// Feed wall-clock time to the countdown.  Each whole second takes one off
/// `time_left`; reaching zero ends the game.
pub fn advance_clock(state: &CatcherState, dt: Duration) -> CatcherState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::Playing {
        return next;
    }
    next.clock += dt;
    while next.clock >= Duration::from_secs(1) {
        next.clock -= Duration::from_secs(1);
        next.time_left = next.time_left.saturating_sub(1);
        if next.time_left == 0 {
            next.status = GameStatus::GameOver;
            next.clock = Duration::ZERO;
            next.events.push(CatcherEvent::TimeUp);
            break;
        }
    }
    next
}

fn spawn_in_place(state: &mut CatcherState, rng: &mut impl Rng) {
    let roll: f32 = rng.gen();
    let kind = if roll < 0.2 {
        FruitKind::Bomb
    } else if roll < 0.4 {
        FruitKind::Banana
    } else {
        FruitKind::Apple
    };
    let base_speed = 15.0 + state.score.level as f32 * 1.5;
    let lane = rng.gen_range(0..LANES.len());
    state.fruits.push(Fruit {
        x: LANES[lane],
        y: FRUIT_START_Y,
        lane,
        kind,
        speed: base_speed * kind.speed_factor(),
    });
}
