use serde::{Deserialize, Serialize};

use crate::personality::PersonalityPreset;
use crate::Roller;

pub const BASE_DAMAGE: (i32, i32) = (30, 100);
pub const BASE_SPEED: (i32, i32) = (20, 90);
pub const DAMAGE_BOUNDS: (i32, i32) = (20, 100);
pub const SPEED_BOUNDS: (i32, i32) = (10, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Map a uniform roll in `[0, 1)` to a tier.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.05 {
            Rarity::Legendary
        } else if roll < 0.2 {
            Rarity::Epic
        } else if roll < 0.5 {
            Rarity::Rare
        } else {
            Rarity::Common
        }
    }

    pub fn damage_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.3,
            Rarity::Legendary => 1.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub damage: i32,
    pub speed: i32,
    pub rarity: Rarity,
}

/// Apply modifiers to base rolls. Truncates toward zero, then clamps.
pub fn apply_modifiers(
    base_damage: i32,
    base_speed: i32,
    damage_modifier: f64,
    speed_modifier: f64,
    rarity: Rarity,
) -> StatLine {
    let damage = (base_damage as f64 * damage_modifier * rarity.damage_multiplier()) as i32;
    let speed = (base_speed as f64 * speed_modifier) as i32;
    StatLine {
        damage: damage.clamp(DAMAGE_BOUNDS.0, DAMAGE_BOUNDS.1),
        speed: speed.clamp(SPEED_BOUNDS.0, SPEED_BOUNDS.1),
        rarity,
    }
}

pub fn roll_stats(roller: &mut Roller, preset: &PersonalityPreset) -> StatLine {
    let base_damage = roller.range_inclusive(BASE_DAMAGE.0, BASE_DAMAGE.1);
    let base_speed = roller.range_inclusive(BASE_SPEED.0, BASE_SPEED.1);
    let rarity = Rarity::from_roll(roller.chance());
    apply_modifiers(
        base_damage,
        base_speed,
        preset.damage_modifier,
        preset.speed_modifier,
        rarity,
    )
}
