//! Material table.
//!
//! Static per-material metadata: density, phase, solidity, flammability and
//! the decay chain. The table is total over [`MaterialKind`] and never changes
//! for the lifetime of the process.

use crate::cell::VisualTag;

/// Every material a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialKind {
    /// Nothing; the floor layer shows through.
    #[default]
    Empty,
    /// Solid wall
    Stone,
    /// Solid wall
    Dirt,
    /// Solid wall (grainy look only)
    Sand,
    /// Solid fuel, the only flammable material
    Wood,
    /// Thin liquid
    Water,
    /// Thick, heavy liquid
    Lava,
    /// Hot gas, decays into smoke
    Fire,
    /// Light gas, decays into nothing
    Smoke,
}

/// Broad behavioural class of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Empty space
    Empty,
    /// Immovable; blocks the player and fluids
    Solid,
    /// Flows while it has spread stamina
    Liquid,
    /// Burns or drifts while its decay countdown runs
    Gas,
}

/// Material properties lookup table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Density; heavier fluids sink through lighter ones
    pub density: i32,
    /// Behavioural class
    pub phase: Phase,
    /// Blocks movement of the player and of fluids
    pub solid: bool,
    /// Can be ignited by neighbouring fire
    pub flammable: bool,
    /// Default colour token
    pub base_tag: VisualTag,
}

/// Density of every solid material.
pub const SOLID_DENSITY: i32 = 1000;

impl MaterialKind {
    /// All materials, in palette order.
    pub const ALL: [MaterialKind; 9] = [
        MaterialKind::Empty,
        MaterialKind::Stone,
        MaterialKind::Dirt,
        MaterialKind::Sand,
        MaterialKind::Wood,
        MaterialKind::Water,
        MaterialKind::Lava,
        MaterialKind::Fire,
        MaterialKind::Smoke,
    ];

    /// Looks up the full property record.
    #[must_use]
    pub const fn properties(self) -> MaterialProperties {
        match self {
            Self::Empty => MaterialProperties {
                density: 0,
                phase: Phase::Empty,
                solid: false,
                flammable: false,
                base_tag: VisualTag::rgba(0, 0, 0, 0),
            },
            Self::Stone => solid(VisualTag::rgb(128, 128, 128), false),
            Self::Dirt => solid(VisualTag::rgb(101, 67, 33), false),
            Self::Sand => solid(VisualTag::rgb(219, 194, 132), false),
            Self::Wood => solid(VisualTag::rgb(133, 94, 66), true),
            Self::Water => MaterialProperties {
                density: 50,
                phase: Phase::Liquid,
                solid: false,
                flammable: false,
                base_tag: VisualTag::rgba(0, 121, 241, 200),
            },
            Self::Lava => MaterialProperties {
                density: 100,
                phase: Phase::Liquid,
                solid: false,
                flammable: false,
                base_tag: VisualTag::rgb(230, 41, 55),
            },
            Self::Fire => MaterialProperties {
                density: 1,
                phase: Phase::Gas,
                solid: false,
                flammable: false,
                base_tag: VisualTag::rgb(255, 161, 0),
            },
            Self::Smoke => MaterialProperties {
                density: 5,
                phase: Phase::Gas,
                solid: false,
                flammable: false,
                base_tag: VisualTag::rgba(80, 80, 80, 160),
            },
        }
    }

    /// Density of this material.
    #[must_use]
    pub const fn density(self) -> i32 {
        self.properties().density
    }

    /// Whether this material blocks movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.properties().solid
    }

    /// Behavioural class.
    #[must_use]
    pub const fn phase(self) -> Phase {
        self.properties().phase
    }

    /// Whether this material flows.
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self.phase(), Phase::Liquid)
    }

    /// Whether fire can spread into this material.
    #[must_use]
    pub const fn is_flammable(self) -> bool {
        self.properties().flammable
    }

    /// Default colour token.
    #[must_use]
    pub const fn base_tag(self) -> VisualTag {
        self.properties().base_tag
    }

    /// What this material turns into when its countdown runs out.
    #[must_use]
    pub const fn decay_into(self) -> Option<MaterialKind> {
        match self {
            Self::Fire => Some(Self::Smoke),
            Self::Smoke => Some(Self::Empty),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Stone => "Stone",
            Self::Dirt => "Dirt",
            Self::Sand => "Sand",
            Self::Wood => "Wood",
            Self::Water => "Water",
            Self::Lava => "Lava",
            Self::Fire => "Fire",
            Self::Smoke => "Smoke",
        }
    }
}

const fn solid(base_tag: VisualTag, flammable: bool) -> MaterialProperties {
    MaterialProperties {
        density: SOLID_DENSITY,
        phase: Phase::Solid,
        solid: true,
        flammable,
        base_tag,
    }
}

/// Initial `life` handed to freshly spawned cells.
///
/// For liquids this is spread stamina, for gases a decay countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeTable {
    /// Water spread stamina
    pub water: i32,
    /// Lava spread stamina
    pub lava: i32,
    /// Fire burn countdown
    pub fire: i32,
    /// Smoke dissipation countdown
    pub smoke: i32,
}

impl Default for LifeTable {
    fn default() -> Self {
        Self {
            water: 120,
            lava: 60,
            fire: 40,
            smoke: 60,
        }
    }
}

impl LifeTable {
    /// Initial life for a newly placed cell of `kind`.
    ///
    /// Solids and Empty always get zero.
    #[must_use]
    pub const fn initial_life(&self, kind: MaterialKind) -> i32 {
        match kind {
            MaterialKind::Water => self.water,
            MaterialKind::Lava => self.lava,
            MaterialKind::Fire => self.fire,
            MaterialKind::Smoke => self.smoke,
            _ => 0,
        }
    }

    /// Decay target and the fresh life it starts with.
    #[must_use]
    pub const fn decay_target(&self, kind: MaterialKind) -> Option<(MaterialKind, i32)> {
        match kind.decay_into() {
            Some(target) => Some((target, self.initial_life(target))),
            None => None,
        }
    }
}
