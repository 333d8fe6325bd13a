//! Weapon catalog — static templates, the equipped-weapon instance and the
//! uniform random pick used for the starting loadout and item drops.

use crossterm::style::Color;
use rand::Rng;

use crate::sound::{Tone, Waveform};

/// How a weapon turns one trigger pull into projectiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FirePattern {
    Auto,
    Semi,
    /// `count` projectiles fanned out by horizontal drift.
    Spread { count: u32 },
    Laser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKey {
    Ak47,
    Pistol,
    Sniper,
    Shotgun,
    Gatling,
    Laser,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponTemplate {
    pub name: &'static str,
    pub damage: u32,
    /// Frames between shots.
    pub cooldown: u32,
    pub ammo: u32,
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub color: Color,
    pub pattern: FirePattern,
    /// Piercing projectiles survive hits and keep going.
    pub piercing: bool,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: ((hex >> 16) & 0xff) as u8,
        g: ((hex >> 8) & 0xff) as u8,
        b: (hex & 0xff) as u8,
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

static AK47: WeaponTemplate = WeaponTemplate {
    name: "AK-47",
    damage: 10,
    cooldown: 8,
    ammo: 100,
    projectile_speed: 15.0,
    projectile_size: 4.0,
    color: rgb(0xff9f43),
    pattern: FirePattern::Auto,
    piercing: false,
};

static PISTOL: WeaponTemplate = WeaponTemplate {
    name: "Pistol",
    damage: 50,
    cooldown: 30,
    ammo: 20,
    projectile_speed: 12.0,
    projectile_size: 5.0,
    color: rgb(0xc8d6e5),
    pattern: FirePattern::Semi,
    piercing: false,
};

static SNIPER: WeaponTemplate = WeaponTemplate {
    name: "Sniper",
    damage: 100,
    cooldown: 60,
    ammo: 15,
    projectile_speed: 25.0,
    projectile_size: 3.0,
    color: rgb(0x1dd1a1),
    pattern: FirePattern::Semi,
    piercing: true,
};

static SHOTGUN: WeaponTemplate = WeaponTemplate {
    name: "Shotgun",
    damage: 20,
    cooldown: 40,
    ammo: 50,
    projectile_speed: 12.0,
    projectile_size: 4.0,
    color: rgb(0xff6b6b),
    pattern: FirePattern::Spread { count: 5 },
    piercing: false,
};

static GATLING: WeaponTemplate = WeaponTemplate {
    name: "Gatling",
    damage: 15,
    cooldown: 4,
    ammo: 150,
    projectile_speed: 18.0,
    projectile_size: 3.0,
    color: rgb(0x54a0ff),
    pattern: FirePattern::Auto,
    piercing: false,
};

static LASER: WeaponTemplate = WeaponTemplate {
    name: "Laser",
    damage: 25,
    cooldown: 5,
    ammo: 75,
    projectile_speed: 20.0,
    projectile_size: 2.0,
    color: rgb(0xff9ff3),
    pattern: FirePattern::Laser,
    piercing: false,
};

impl WeaponKey {
    pub const ALL: [WeaponKey; 6] = [
        WeaponKey::Ak47,
        WeaponKey::Pistol,
        WeaponKey::Sniper,
        WeaponKey::Shotgun,
        WeaponKey::Gatling,
        WeaponKey::Laser,
    ];

    pub fn template(self) -> &'static WeaponTemplate {
        match self {
            WeaponKey::Ak47 => &AK47,
            WeaponKey::Pistol => &PISTOL,
            WeaponKey::Sniper => &SNIPER,
            WeaponKey::Shotgun => &SHOTGUN,
            WeaponKey::Gatling => &GATLING,
            WeaponKey::Laser => &LASER,
        }
    }

    /// Every key has the same probability.
    pub fn random(rng: &mut impl Rng) -> WeaponKey {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Firing sound for this weapon.
    pub fn shot_tone(self) -> Tone {
        match self {
            WeaponKey::Ak47 => Tone::new(200.0, 0.08, Waveform::Triangle),
            WeaponKey::Pistol => Tone::new(400.0, 0.1, Waveform::Triangle),
            WeaponKey::Sniper => Tone::new(800.0, 0.2, Waveform::Sine),
            WeaponKey::Shotgun => Tone::new(150.0, 0.15, Waveform::Square),
            WeaponKey::Gatling => Tone::new(600.0, 0.04, Waveform::Sawtooth),
            WeaponKey::Laser => Tone::new(1200.0, 0.1, Waveform::Sine),
        }
    }
}

// ── Equipped instance ────────────────────────────────────────────────────────

/// The weapon the player is holding. Only the ammo counter is mutable;
/// everything else is read from the template.
#[derive(Clone, Debug, PartialEq)]
pub struct EquippedWeapon {
    pub key: WeaponKey,
    pub ammo: u32,
}

impl EquippedWeapon {
    pub fn new(key: WeaponKey) -> Self {
        Self {
            key,
            ammo: key.template().ammo,
        }
    }

    pub fn template(&self) -> &'static WeaponTemplate {
        self.key.template()
    }
}
