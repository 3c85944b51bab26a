//! Cell data structures.

use crate::material::{LifeTable, MaterialKind};

/// Opaque colour token carried by each cell.
///
/// The simulation only copies and compares tags; the rendering collaborator
/// interprets them as RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisualTag {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (0 = transparent)
    pub a: u8,
}

impl VisualTag {
    /// Creates an opaque tag.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a tag with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the tag brightened or darkened by `amount` on every colour channel.
    #[must_use]
    pub const fn shaded(self, amount: i16) -> Self {
        Self {
            r: shade_channel(self.r, amount),
            g: shade_channel(self.g, amount),
            b: shade_channel(self.b, amount),
            a: self.a,
        }
    }
}

const fn shade_channel(value: u8, amount: i16) -> u8 {
    let v = value as i16 + amount;
    if v < 0 {
        0
    } else if v > 255 {
        255
    } else {
        v as u8
    }
}

/// Flicker palette cycled through by burning cells.
pub const FIRE_FLICKER: [VisualTag; 3] = [
    VisualTag::rgb(255, 161, 0),
    VisualTag::rgb(230, 41, 55),
    VisualTag::rgb(253, 249, 0),
];

/// A single simulated grid cell.
///
/// `life` is overloaded per material: spread stamina for liquids, decay
/// countdown for fire and smoke, zero for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Material held by this cell
    pub material: MaterialKind,
    /// Spread stamina or decay countdown
    pub life: i32,
    /// Colour token
    pub tag: VisualTag,
    /// Reserved for sleeping-region optimisations; always true today
    pub active: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cell {
    /// Creates a cell with the given material, zero life and its base tag.
    #[must_use]
    pub const fn new(material: MaterialKind) -> Self {
        Self {
            material,
            life: 0,
            tag: material.base_tag(),
            active: true,
        }
    }

    /// Creates an empty cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(MaterialKind::Empty)
    }

    /// Creates a freshly placed cell with the initial life for its material.
    #[must_use]
    pub const fn spawn(material: MaterialKind, lives: &LifeTable) -> Self {
        Self::new(material).with_life(lives.initial_life(material))
    }

    /// Creates a cell painted by hand.
    ///
    /// Only liquids and Fire start with life; painted Smoke starts spent and
    /// clears on the next tick.
    #[must_use]
    pub const fn painted(material: MaterialKind, lives: &LifeTable) -> Self {
        match material {
            MaterialKind::Water | MaterialKind::Lava | MaterialKind::Fire => {
                Self::spawn(material, lives)
            },
            _ => Self::new(material),
        }
    }

    /// Returns the cell with life set.
    #[must_use]
    pub const fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self
    }

    /// Returns the cell with its visual tag replaced.
    #[must_use]
    pub const fn with_tag(mut self, tag: VisualTag) -> Self {
        self.tag = tag;
        self
    }

    /// Checks if this cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.material, MaterialKind::Empty)
    }

    /// Checks if this cell blocks movement.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.material.is_solid()
    }

    /// Checks if this cell is a liquid.
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        self.material.is_liquid()
    }

    /// Density of the held material.
    #[must_use]
    pub const fn density(&self) -> i32 {
        self.material.density()
    }
}
