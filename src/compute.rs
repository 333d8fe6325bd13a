//! Shooter game logic.
//!
//! Every public function takes an immutable reference to the current
//! `ShooterState` (and, where needed, an RNG handle) and returns a brand-new
//! `ShooterState`.  Side effects are limited to the injected RNG; anything the
//! outside world should react to (sounds, score notifications, game over) is
//! reported through `ShooterState::events`.

use crossterm::style::Color;
use rand::Rng;
use tracing::debug;

use crate::entities::{
    DroppedItem, Enemy, EnemyKind, FloatingText, FrameEvent, GameStatus, Projectile,
    ShooterState, PLAYER_SPEED, PLAYER_WIDTH, PLAYFIELD,
};
use crate::input::Controls;
use crate::weapons::{EquippedWeapon, FirePattern, WeaponKey};

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Projectiles above this line are gone.
const PROJECTILE_EXIT_Y: f32 = -20.0;
/// Horizontal drift between neighbouring spread pellets.
pub const SPREAD_DRIFT: f32 = 1.5;

pub const MAGNET_RADIUS: f32 = 100.0;
/// Share of the remaining distance an item covers per tick inside the magnet.
pub const MAGNET_PULL: f32 = 0.05;
const ITEM_FALL_SPEED: f32 = 2.0;

const TEXT_RISE: f32 = 1.0;
pub const TEXT_LIFE: u32 = 60;
const TEXT_PICKUP: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const TEXT_DAMAGE: Color = Color::Rgb { r: 255, g: 0, b: 0 };

pub const SPAWN_INTERVAL_FLOOR: f32 = 30.0;
const SPAWN_INTERVAL_DECAY: f32 = 0.2;

const BOSS_CHANCE: f64 = 0.05;
const DROP_CHANCE: f64 = 0.2;

pub const NORMAL_HP: i32 = 100;
pub const NORMAL_SIZE: f32 = 30.0;
pub const BOSS_HP: i32 = 2000;
pub const BOSS_SIZE: f32 = 60.0;
pub const BOSS_SPEED: f32 = 0.3;

fn normal_speed(level: u32) -> f32 {
    1.5 + level as f32 * 0.05
}

/// Score awarded per enemy destroyed.
fn score_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Normal => 10,
        EnemyKind::Boss => 500,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A freshly started game: full health, empty field, random starting weapon.
pub fn init_state(rng: &mut impl Rng) -> ShooterState {
    let mut state = ShooterState::new();
    state.status = GameStatus::Playing;
    equip_in_place(&mut state, WeaponKey::random(rng));
    state
}

/// Build a single enemy of `kind` with stats for the current `level`.
pub fn make_enemy(kind: EnemyKind, x: f32, level: u32) -> Enemy {
    let (hp, size, speed) = match kind {
        EnemyKind::Boss => (BOSS_HP, BOSS_SIZE, BOSS_SPEED),
        EnemyKind::Normal => (NORMAL_HP, NORMAL_SIZE, normal_speed(level)),
    };
    Enemy {
        x,
        y: -size,
        size,
        hp,
        max_hp: hp,
        speed,
        kind,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player(state: &ShooterState, controls: &Controls) -> ShooterState {
    let mut next = state.clone();
    move_in_place(&mut next, controls);
    next
}

/// Pull the trigger once.  No-op while cooling down or out of ammo.
pub fn attempt_fire(state: &ShooterState) -> ShooterState {
    let mut next = state.clone();
    fire_in_place(&mut next);
    next
}

/// Equip `key`; picking the weapon already held stacks a full magazine.
pub fn equip_weapon(state: &ShooterState, key: WeaponKey) -> ShooterState {
    let mut next = state.clone();
    equip_in_place(&mut next, key);
    next
}

pub fn spawn_enemy(state: &ShooterState, rng: &mut impl Rng) -> ShooterState {
    let mut next = state.clone();
    spawn_in_place(&mut next, rng);
    next
}

pub fn add_score(state: &ShooterState, points: u32) -> ShooterState {
    let mut next = state.clone();
    score_in_place(&mut next, points);
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Does nothing unless the game is `Playing`.  When the player dies the rest
/// of the frame is skipped and the state comes back as `GameOver`.
pub fn tick(state: &ShooterState, controls: &Controls, rng: &mut impl Rng) -> ShooterState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::Playing {
        return next;
    }
    next.frame += 1;

    // ── 1. Player movement ───────────────────────────────────────────────────
    move_in_place(&mut next, controls);

    // ── 2. Fire-rate cooldown ────────────────────────────────────────────────
    next.fire_timer = next.fire_timer.saturating_sub(1);

    // ── 3. Shooting ──────────────────────────────────────────────────────────
    if controls.fire {
        fire_in_place(&mut next);
    }

    // ── 4. Projectiles ───────────────────────────────────────────────────────
    advance_projectiles(&mut next);

    // ── 5. Dropped items (magnet + pickup) ───────────────────────────────────
    advance_items(&mut next);

    // ── 6. Floating texts ────────────────────────────────────────────────────
    advance_floating_texts(&mut next);

    // ── 7. Enemy spawn ───────────────────────────────────────────────────────
    next.spawn_timer += 1;
    if next.spawn_timer as f32 > next.spawn_interval {
        spawn_in_place(&mut next, rng);
        next.spawn_timer = 0;
        next.spawn_interval = (next.spawn_interval - SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR);
    }

    // ── 8. Enemies: movement and collisions ──────────────────────────────────
    advance_enemies(&mut next, rng);

    next
}

// ── In-place steps ───────────────────────────────────────────────────────────

fn move_in_place(state: &mut ShooterState, controls: &Controls) {
    if controls.left {
        state.player.x -= PLAYER_SPEED;
    }
    if controls.right {
        state.player.x += PLAYER_SPEED;
    }
    state.player.x = state.player.x.clamp(0.0, PLAYFIELD - PLAYER_WIDTH);
}

fn fire_in_place(state: &mut ShooterState) {
    if state.fire_timer > 0 {
        return;
    }
    let Some(weapon) = state.weapon.as_mut() else {
        return;
    };
    if weapon.ammo == 0 {
        return;
    }
    weapon.ammo -= 1;
    let key = weapon.key;
    let template = weapon.template();
    state.fire_timer = template.cooldown;

    let origin_x = state.player.x + PLAYER_WIDTH / 2.0;
    let origin_y = state.player.y;
    let shot = |vx: f32| Projectile {
        x: origin_x,
        y: origin_y,
        size: template.projectile_size,
        speed: template.projectile_speed,
        vx,
        damage: template.damage,
        color: template.color,
        piercing: template.piercing,
    };

    match template.pattern {
        FirePattern::Spread { count } => {
            let mid = (count as f32 - 1.0) / 2.0;
            for i in 0..count {
                state.projectiles.push(shot((i as f32 - mid) * SPREAD_DRIFT));
            }
        }
        FirePattern::Auto | FirePattern::Semi | FirePattern::Laser => {
            state.projectiles.push(shot(0.0));
        }
    }
    state.events.push(FrameEvent::Shot(key));
}

/// Returns `true` when the pick stacked ammo onto the held weapon.
fn equip_in_place(state: &mut ShooterState, key: WeaponKey) -> bool {
    let template = key.template();
    let (stacked, text) = match state.weapon.as_mut() {
        Some(held) if held.key == key => {
            held.ammo = held.ammo.saturating_add(template.ammo);
            (true, format!("Ammo +{}", template.ammo))
        }
        _ => {
            state.weapon = Some(EquippedWeapon::new(key));
            (false, format!("{}!", template.name))
        }
    };
    state.floating_texts.push(FloatingText {
        x: state.player.x,
        y: state.player.y - 10.0,
        text,
        life: TEXT_LIFE,
        color: TEXT_PICKUP,
    });
    stacked
}

fn spawn_in_place(state: &mut ShooterState, rng: &mut impl Rng) {
    let kind = if rng.gen_bool(BOSS_CHANCE) {
        EnemyKind::Boss
    } else {
        EnemyKind::Normal
    };
    let size = match kind {
        EnemyKind::Boss => BOSS_SIZE,
        EnemyKind::Normal => NORMAL_SIZE,
    };
    let x = rng.gen::<f32>() * (PLAYFIELD - size);
    debug!(?kind, x, level = state.score.level, "enemy spawned");
    state.enemies.push(make_enemy(kind, x, state.score.level));
}

fn score_in_place(state: &mut ShooterState, points: u32) {
    let (score, level) = state.score.add(points as i32);
    state.events.push(FrameEvent::ScoreChanged { score, level });
}

fn advance_projectiles(state: &mut ShooterState) {
    for p in &mut state.projectiles {
        p.y -= p.speed;
        p.x += p.vx;
    }
    state.projectiles.retain(|p| p.y >= PROJECTILE_EXIT_Y);
}

fn advance_items(state: &mut ShooterState) {
    let player_box = state.player.bounds();
    let (px, py) = player_box.center();
    let items = std::mem::take(&mut state.items);

    for mut item in items {
        let (ix, iy) = item.bounds().center();
        let dx = px - ix;
        let dy = py - iy;
        if dx.hypot(dy) < MAGNET_RADIUS {
            item.x += dx * MAGNET_PULL;
            item.y += dy * MAGNET_PULL;
        } else {
            item.y += ITEM_FALL_SPEED;
        }

        if item.bounds().overlaps(&player_box) {
            let stacked = equip_in_place(state, item.weapon);
            debug!(weapon = ?item.weapon, stacked, "item picked up");
            state.events.push(FrameEvent::ItemPicked {
                weapon: item.weapon,
                stacked,
            });
            continue;
        }
        if item.y > PLAYFIELD {
            continue;
        }
        state.items.push(item);
    }
}

fn advance_floating_texts(state: &mut ShooterState) {
    for ft in &mut state.floating_texts {
        ft.y -= TEXT_RISE;
        ft.life = ft.life.saturating_sub(1);
    }
    state.floating_texts.retain(|ft| ft.life > 0);
}

fn kill_enemy(state: &mut ShooterState, enemy: &Enemy, rng: &mut impl Rng) {
    let points = score_for(enemy.kind);
    debug!(kind = ?enemy.kind, points, "enemy destroyed");
    state.events.push(FrameEvent::EnemyKilled {
        kind: enemy.kind,
        points,
    });
    score_in_place(state, points);

    if rng.gen_bool(DROP_CHANCE) {
        let weapon = WeaponKey::random(rng);
        state.items.push(DroppedItem {
            x: enemy.x,
            y: enemy.y,
            weapon,
        });
        state.events.push(FrameEvent::ItemDropped(weapon));
    }
}

fn advance_enemies(state: &mut ShooterState, rng: &mut impl Rng) {
    let player_box = state.player.bounds();
    let mut remaining = std::mem::take(&mut state.enemies).into_iter();
    let mut survivors: Vec<Enemy> = Vec::with_capacity(remaining.len());

    while let Some(mut enemy) = remaining.next() {
        enemy.y += enemy.speed;
        let enemy_box = enemy.bounds();

        // First overlapping projectile only.  Piercing shots stay alive and
        // keep testing against the enemies that follow.
        if let Some(pi) = state
            .projectiles
            .iter()
            .position(|p| p.bounds().overlaps(&enemy_box))
        {
            enemy.hp -= state.projectiles[pi].damage as i32;
            if !state.projectiles[pi].piercing {
                state.projectiles.remove(pi);
            }
            if enemy.hp <= 0 {
                kill_enemy(state, &enemy, rng);
                continue;
            }
        }

        if enemy_box.overlaps(&player_box) {
            state.player.hp = state.player.hp.saturating_sub(1);
            state.floating_texts.push(FloatingText {
                x: state.player.x,
                y: state.player.y - 20.0,
                text: "-1 HP".to_string(),
                life: TEXT_LIFE,
                color: TEXT_DAMAGE,
            });
            state.events.push(FrameEvent::PlayerHit {
                hp_left: state.player.hp,
            });
            if state.player.hp == 0 {
                state.status = GameStatus::GameOver;
                state.events.push(FrameEvent::PlayerDied);
                survivors.extend(remaining);
                break;
            }
            continue;
        }

        if enemy.y > PLAYFIELD {
            continue;
        }
        survivors.push(enemy);
    }

    state.enemies = survivors;
}
