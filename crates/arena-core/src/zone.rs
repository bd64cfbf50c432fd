//! Zone shapes and containment tests.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Volume shape used for zone containment tests.
///
/// Every shape is parameterized by a center and a single radius. All bounds
/// are inclusive: a point exactly at `center + radius` on one axis is inside
/// a box, and a point at exactly `distance² == radius²` is inside a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneShape {
    /// Axis-aligned box; the radius is applied independently per axis
    Box,
    /// Euclidean sphere
    Sphere,
    /// Box test ignoring the vertical axis (a square column of infinite height)
    ColumnBox,
    /// Radial test ignoring the vertical axis (a circular column of infinite height)
    ColumnCircle,
}

impl ZoneShape {
    /// Test whether `point` lies within `radius` of `center` under this shape.
    ///
    /// Purely geometric; world membership is the caller's concern.
    pub fn contains(self, center: &Position, radius: f64, point: &Position) -> bool {
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        let dz = point.z - center.z;
        match self {
            ZoneShape::Box => dx.abs() <= radius && dy.abs() <= radius && dz.abs() <= radius,
            ZoneShape::Sphere => dx * dx + dy * dy + dz * dz <= radius * radius,
            ZoneShape::ColumnBox => dx.abs() <= radius && dz.abs() <= radius,
            ZoneShape::ColumnCircle => dx * dx + dz * dz <= radius * radius,
        }
    }
}

/// A session's spatial zone: shape, center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone center; also the lobby rally position actors are returned to
    pub center: Position,
    /// Radius (or half-extent, for box shapes)
    pub radius: f64,
    /// Containment shape
    pub shape: ZoneShape,
}

impl Zone {
    /// Create a new zone.
    pub fn new(center: Position, radius: f64, shape: ZoneShape) -> Self {
        Self {
            center,
            radius,
            shape,
        }
    }

    /// Whether `point` is inside this zone.
    ///
    /// A point in a different world is never inside, regardless of coordinates.
    pub fn contains(&self, point: &Position) -> bool {
        self.center.same_world(point) && self.shape.contains(&self.center, self.radius, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WorldId;

    fn center() -> Position {
        Position::new(WorldId::new(), 0.0, 100.0, 0.0)
    }

    #[test]
    fn test_box_boundary_inclusive() {
        let c = center();
        for shape in [ZoneShape::Box, ZoneShape::ColumnBox] {
            assert!(shape.contains(&c, 10.0, &c.offset(10.0, 0.0, 0.0)), "{shape:?}");
            assert!(shape.contains(&c, 10.0, &c.offset(-10.0, 0.0, 10.0)), "{shape:?}");
            assert!(!shape.contains(&c, 10.0, &c.offset(10.1, 0.0, 0.0)), "{shape:?}");
        }
    }

    #[test]
    fn test_sphere_boundary_inclusive() {
        let c = center();
        assert!(ZoneShape::Sphere.contains(&c, 10.0, &c.offset(0.0, 10.0, 0.0)));
        assert!(!ZoneShape::Sphere.contains(&c, 10.0, &c.offset(0.0, 10.001, 0.0)));
        assert!(ZoneShape::ColumnCircle.contains(&c, 10.0, &c.offset(10.0, 0.0, 0.0)));
        assert!(!ZoneShape::ColumnCircle.contains(&c, 10.0, &c.offset(8.0, 0.0, 8.0)));
    }

    #[test]
    fn test_sphere_rejects_box_corner() {
        // The box corner (r, r, r) is outside the inscribed sphere.
        let c = center();
        let corner = c.offset(9.0, 9.0, 9.0);
        assert!(ZoneShape::Box.contains(&c, 10.0, &corner));
        assert!(!ZoneShape::Sphere.contains(&c, 10.0, &corner));
    }

    #[test]
    fn test_columns_ignore_vertical_axis() {
        let c = center();
        let high = c.offset(3.0, 5000.0, -3.0);
        assert!(ZoneShape::ColumnBox.contains(&c, 10.0, &high));
        assert!(ZoneShape::ColumnCircle.contains(&c, 10.0, &high));
        assert!(!ZoneShape::Box.contains(&c, 10.0, &high));
        assert!(!ZoneShape::Sphere.contains(&c, 10.0, &high));
    }

    #[test]
    fn test_zone_checks_world() {
        let c = center();
        let zone = Zone::new(c, 10.0, ZoneShape::Box);
        let mut foreign = c.offset(1.0, 0.0, 0.0);
        foreign.world = WorldId::new();

        assert!(zone.contains(&c.offset(1.0, 0.0, 0.0)));
        assert!(!zone.contains(&foreign));
    }
}
