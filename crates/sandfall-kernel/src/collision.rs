//! Collision queries against the grid.
//!
//! Player movement asks questions about cells through [`CollisionQuery`]
//! rather than touching the buffers directly.
//! Off-grid coordinates are never solid and never liquid.

use crate::buffer::Grid;
use crate::material::MaterialKind;

/// Read-only cell queries used by movement code.
pub trait CollisionQuery {
    /// Material at a grid coordinate, `None` off-grid.
    fn material_at(&self, x: i32, y: i32) -> Option<MaterialKind>;

    /// Checks if the cell at the given grid coordinate blocks movement.
    fn is_solid(&self, x: i32, y: i32) -> bool {
        self.material_at(x, y).is_some_and(MaterialKind::is_solid)
    }

    /// Checks if the cell at the given grid coordinate holds a liquid.
    fn is_liquid(&self, x: i32, y: i32) -> bool {
        self.material_at(x, y).is_some_and(MaterialKind::is_liquid)
    }
}

impl CollisionQuery for Grid {
    fn material_at(&self, x: i32, y: i32) -> Option<MaterialKind> {
        self.get(x, y).map(|cell| cell.material)
    }
}
