//! Catalog data and identifiers shared by every component.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Arena index of a unit instance. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct UnitId(pub u32);

/// Index of a tile in the board's tile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct TileId(pub u16);

/// Catalog identifier of a unit template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct TemplateId(pub u32);

/// Identifier of a synergy (trait/class tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct SynergyId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Player => "PLAYER",
            Team::Enemy => "ENEMY",
        }
    }
}

/// Rarity tier of a template. Drives shop odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum Quality {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Quality {
    /// Relative weight of this quality in a shop roll
    pub fn shop_weight(self) -> u32 {
        match self {
            Quality::Common => 45,
            Quality::Uncommon => 30,
            Quality::Rare => 15,
            Quality::Epic => 8,
            Quality::Legendary => 2,
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Common
    }
}

/// Integer grid coordinate of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

impl Coord {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance in tiles
    pub fn distance_sq(self, other: Coord) -> i32 {
        let dx = (self.x - other.x) as i32;
        let dy = (self.y - other.y) as i32;
        dx * dx + dy * dy
    }

    /// Centre of the tile in world space
    pub fn to_point(self) -> Point {
        Point {
            x: self.x as i32 * TILE_SIZE,
            y: self.y as i32 * TILE_SIZE,
        }
    }
}

/// Edge length of a tile in world units (milli-tiles)
pub const TILE_SIZE: i32 = 1000;

/// World-space position in milli-tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> i64 {
        isqrt(self.distance_sq(other))
    }

    /// Point `num/den` of the way from `self` to `to`
    pub fn lerp(self, to: Point, num: i64, den: i64) -> Point {
        if den <= 0 || num >= den {
            return to;
        }
        let num = num.max(0);
        Point {
            x: self.x + ((to.x - self.x) as i64 * num / den) as i32,
            y: self.y + ((to.y - self.y) as i64 * num / den) as i32,
        }
    }
}

/// Integer square root (floor)
pub fn isqrt(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }
    let mut x = value;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

/// Base combat stats of a template
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct TemplateStats {
    pub min_damage: i32,
    pub max_damage: i32,
    /// Time between attacks at 0% bonus attack speed
    pub base_attack_time_ms: u32,
    /// Windup before the hit lands or the projectile leaves
    pub attack_point_ms: u32,
    /// Reach in tiles along each axis
    pub attack_range: u8,
    /// Mana needed to fill the bar
    pub mana_cost: i32,
    pub mana_per_attack: i32,
    /// Milli-tiles per second
    pub move_speed: i32,
    pub health: i32,
    pub armor: i32,
}

impl Default for TemplateStats {
    fn default() -> Self {
        Self {
            min_damage: 1,
            max_damage: 1,
            base_attack_time_ms: 1000,
            attack_point_ms: 300,
            attack_range: 1,
            mana_cost: 100,
            mana_per_attack: 10,
            move_speed: 3000,
            health: 100,
            armor: 0,
        }
    }
}

/// Immutable catalog entry a unit is instantiated from
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct UnitTemplate {
    pub id: TemplateId,
    pub name: String,
    #[cfg_attr(feature = "std", serde(default))]
    pub quality: Quality,
    #[cfg_attr(feature = "std", serde(default = "default_star"))]
    pub star: u8,
    /// Shop price in gold
    pub cost: u32,
    /// Trait/class tags, each naming a synergy
    #[cfg_attr(feature = "std", serde(default))]
    pub traits: Vec<SynergyId>,
    #[cfg_attr(feature = "std", serde(default))]
    pub stats: TemplateStats,
    /// Attacks with a travelling projectile instead of an instant hit
    #[cfg_attr(feature = "std", serde(default))]
    pub projectile: bool,
    /// Template produced when enough copies are combined
    #[cfg_attr(feature = "std", serde(default))]
    pub upgraded: Option<TemplateId>,
}

#[cfg(feature = "std")]
fn default_star() -> u8 {
    1
}

impl UnitTemplate {
    pub fn new(id: u32, name: &str, cost: u32, stats: TemplateStats) -> Self {
        Self {
            id: TemplateId(id),
            name: String::from(name),
            quality: Quality::Common,
            star: 1,
            cost,
            traits: Vec::new(),
            stats,
            projectile: false,
            upgraded: None,
        }
    }

    pub fn with_traits(mut self, traits: &[u16]) -> Self {
        self.traits = traits.iter().map(|t| SynergyId(*t)).collect();
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_star(mut self, star: u8) -> Self {
        self.star = star;
        self
    }

    pub fn with_projectile(mut self) -> Self {
        self.projectile = true;
        self
    }

    pub fn upgrades_to(mut self, template: u32) -> Self {
        self.upgraded = Some(TemplateId(template));
        self
    }

    pub fn has_trait(&self, synergy: SynergyId) -> bool {
        self.traits.contains(&synergy)
    }
}

/// One unit of an enemy wave, placed by enemy-zone local coordinates
/// (`row` 0 is the row closest to the player).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct WaveUnit {
    pub template: TemplateId,
    pub column: u8,
    pub row: u8,
}

/// Enemy army fielded in one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct ArmyRoster {
    #[cfg_attr(feature = "std", serde(default))]
    pub name: String,
    pub units: Vec<WaveUnit>,
}
