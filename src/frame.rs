//! Scene description — turns game state into a flat list of draw commands
//! in playfield units.  Nothing here touches the terminal or mutates state;
//! `display` rasterises the commands.

use crossterm::style::Color;

use crate::catcher::{CatcherState, FruitKind, BASKET_HEIGHT, BASKET_WIDTH, BASKET_Y};
use crate::entities::{
    EnemyKind, GameStatus, ShooterState, ITEM_SIZE, PLAYER_HEIGHT, PLAYER_WIDTH,
};

// ── Colour palette ───────────────────────────────────────────────────────────

const C_ITEM: Color = Color::Rgb { r: 0x00, g: 0xce, b: 0xc9 };
const C_HP_BACK: Color = Color::Red;
const C_HP_FILL: Color = Color::Rgb { r: 0x00, g: 0xff, b: 0x00 };
const C_HUD: Color = Color::White;
const C_AMMO: Color = Color::Rgb { r: 0xff, g: 0xff, b: 0x00 };
const C_AMMO_EMPTY: Color = Color::Rgb { r: 0xff, g: 0x00, b: 0x00 };
const C_HEARTS: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_LANE: Color = Color::DarkGrey;
const C_POSE: Color = Color::Yellow;

const HP_BAR_OFFSET: f32 = 5.0;
const HP_BAR_HEIGHT: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Ship,
    Zombie,
    Boss,
    Basket,
    Apple,
    Banana,
    Bomb,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { x: f32, y: f32, r: f32, color: Color },
    VLine { x: f32, color: Color },
    Sprite { sprite: Sprite, x: f32, y: f32, w: f32, h: f32 },
    Text { x: f32, y: f32, text: String, color: Color, align: Align },
}

fn text(x: f32, y: f32, s: impl Into<String>, color: Color, align: Align) -> DrawCommand {
    DrawCommand::Text {
        x,
        y,
        text: s.into(),
        color,
        align,
    }
}

// ── Shooter ──────────────────────────────────────────────────────────────────

/// Everything visible in the shooter, back to front.  Empty unless playing.
pub fn draw_shooter(state: &ShooterState) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    if state.status != GameStatus::Playing {
        return cmds;
    }

    cmds.push(DrawCommand::Sprite {
        sprite: Sprite::Ship,
        x: state.player.x,
        y: state.player.y,
        w: PLAYER_WIDTH,
        h: PLAYER_HEIGHT,
    });

    for p in &state.projectiles {
        cmds.push(DrawCommand::Circle {
            x: p.x,
            y: p.y,
            r: p.size,
            color: p.color,
        });
    }

    for item in &state.items {
        cmds.push(DrawCommand::Rect {
            x: item.x,
            y: item.y,
            w: ITEM_SIZE,
            h: ITEM_SIZE,
            color: C_ITEM,
        });
        cmds.push(text(item.x + 5.0, item.y + 15.0, "?", Color::White, Align::Left));
    }

    for enemy in &state.enemies {
        let sprite = match enemy.kind {
            EnemyKind::Normal => Sprite::Zombie,
            EnemyKind::Boss => Sprite::Boss,
        };
        cmds.push(DrawCommand::Sprite {
            sprite,
            x: enemy.x,
            y: enemy.y,
            w: enemy.size,
            h: enemy.size,
        });
        let fraction = (enemy.hp.max(0) as f32 / enemy.max_hp.max(1) as f32).min(1.0);
        cmds.push(DrawCommand::Rect {
            x: enemy.x,
            y: enemy.y - HP_BAR_OFFSET,
            w: enemy.size,
            h: HP_BAR_HEIGHT,
            color: C_HP_BACK,
        });
        cmds.push(DrawCommand::Rect {
            x: enemy.x,
            y: enemy.y - HP_BAR_OFFSET,
            w: enemy.size * fraction,
            h: HP_BAR_HEIGHT,
            color: C_HP_FILL,
        });
    }

    for ft in &state.floating_texts {
        cmds.push(text(ft.x, ft.y, ft.text.clone(), ft.color, Align::Left));
    }

    // HUD: score left, weapon + ammo and hearts right.
    cmds.push(text(10.0, 20.0, format!("Score: {}", state.score.score), C_HUD, Align::Left));
    if let Some(weapon) = &state.weapon {
        let color = if weapon.ammo > 0 { C_AMMO } else { C_AMMO_EMPTY };
        cmds.push(text(
            190.0,
            20.0,
            format!("{} [{}]", weapon.template().name, weapon.ammo),
            color,
            Align::Right,
        ));
    }
    cmds.push(text(
        190.0,
        40.0,
        "♥".repeat(state.player.hp as usize),
        C_HEARTS,
        Align::Right,
    ));
    cmds.push(text(10.0, 190.0, "Move: ← → | Shoot: Space", C_HINT, Align::Left));

    cmds
}

// ── Fruit catcher ────────────────────────────────────────────────────────────

pub fn draw_catcher(state: &CatcherState) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    if state.status != GameStatus::Playing {
        return cmds;
    }

    cmds.push(DrawCommand::VLine { x: 66.0, color: C_LANE });
    cmds.push(DrawCommand::VLine { x: 133.0, color: C_LANE });

    cmds.push(DrawCommand::Sprite {
        sprite: Sprite::Basket,
        x: state.basket_x() - BASKET_WIDTH / 2.0,
        y: BASKET_Y,
        w: BASKET_WIDTH,
        h: BASKET_HEIGHT,
    });

    for fruit in &state.fruits {
        let sprite = match fruit.kind {
            FruitKind::Apple => Sprite::Apple,
            FruitKind::Banana => Sprite::Banana,
            FruitKind::Bomb => Sprite::Bomb,
        };
        cmds.push(DrawCommand::Sprite {
            sprite,
            x: fruit.x - 10.0,
            y: fruit.y,
            w: 20.0,
            h: 20.0,
        });
    }

    cmds.push(text(
        10.0,
        25.0,
        format!("Score: {}  Lv.{}", state.score.score, state.score.level),
        C_HUD,
        Align::Left,
    ));
    cmds.push(text(130.0, 25.0, format!("Time: {}", state.time_left), C_HUD, Align::Left));
    cmds.push(text(10.0, 190.0, state.pose.as_str(), C_POSE, Align::Left));

    cmds
}
