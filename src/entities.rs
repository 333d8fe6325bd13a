//! Shooter entity types — pure data, no logic beyond geometry helpers.

use crossterm::style::Color;

use crate::scoring::{ScoreBoard, SHOOTER_LEVEL_DIVISOR};
use crate::weapons::{EquippedWeapon, WeaponKey};

/// Side length of the square logical playfield.
pub const PLAYFIELD: f32 = 200.0;

pub const PLAYER_START_X: f32 = 100.0;
pub const PLAYER_Y: f32 = 180.0;
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_MAX_HP: u32 = 2;

pub const ITEM_SIZE: f32 = 20.0;
pub const INITIAL_SPAWN_INTERVAL: f32 = 60.0;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned box, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Normal,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Constructed but never started.
    Ready,
    Playing,
    GameOver,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub hp: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_START_X,
            y: PLAYER_Y,
            hp: PLAYER_MAX_HP,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

// ── Projectiles, enemies, items ──────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Upward speed per tick.
    pub speed: f32,
    /// Horizontal drift per tick (spread shots).
    pub vx: f32,
    pub damage: u32,
    pub color: Color,
    pub piercing: bool,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Goes to zero or below only on the tick the enemy is removed.
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DroppedItem {
    pub x: f32,
    pub y: f32,
    pub weapon: WeaponKey,
}

impl DroppedItem {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, ITEM_SIZE, ITEM_SIZE)
    }
}

/// Cosmetic text that drifts upward and fades after `life` frames.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub life: u32,
    pub color: Color,
}

// ── Events ───────────────────────────────────────────────────────────────────

/// Things that happened during a single tick.  The session turns these into
/// sounds and observer notifications; the simulation never acts on them.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    Shot(WeaponKey),
    EnemyKilled { kind: EnemyKind, points: u32 },
    ItemDropped(WeaponKey),
    ItemPicked { weapon: WeaponKey, stacked: bool },
    PlayerHit { hp_left: u32 },
    ScoreChanged { score: u32, level: u32 },
    PlayerDied,
}

// ── Master game state ────────────────────────────────────────────────────────

/// Everything the shooter simulation owns.  Cloneable so the pure update
/// functions can return a new copy without touching the original.
#[derive(Clone, Debug)]
pub struct ShooterState {
    pub player: Player,
    /// `None` only before the first start.
    pub weapon: Option<EquippedWeapon>,
    /// Frames until the weapon may fire again.
    pub fire_timer: u32,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub items: Vec<DroppedItem>,
    pub floating_texts: Vec<FloatingText>,
    pub score: ScoreBoard,
    pub spawn_timer: u32,
    pub spawn_interval: f32,
    pub status: GameStatus,
    pub frame: u64,
    /// Events produced by the most recent tick.
    pub events: Vec<FrameEvent>,
}

impl ShooterState {
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            weapon: None,
            fire_timer: 0,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
            floating_texts: Vec::new(),
            score: ScoreBoard::new(SHOOTER_LEVEL_DIVISOR),
            spawn_timer: 0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            status: GameStatus::Ready,
            frame: 0,
            events: Vec::new(),
        }
    }
}

impl Default for ShooterState {
    fn default() -> Self {
        Self::new()
    }
}
