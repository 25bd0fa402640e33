//! Square axis-aligned bounding boxes
//!
//! Boxes are a center plus a single half-edge, so every box is a square in
//! XY (a cube if you count Z). Containment and overlap tests used by the
//! quadtree only look at X and Y; Z is carried for rendering.

use crate::foundation::math::Vec3;

/// Half-edge a fresh box starts with
pub const DEFAULT_HALF_EDGE: f32 = 1.0;

/// Center + half-edge bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Box center
    pub pos: Vec3,
    /// Distance from the center to each face
    pub half_edge: f32,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            pos: Vec3::zeros(),
            half_edge: DEFAULT_HALF_EDGE,
        }
    }
}

impl Aabb {
    /// Box centered at `pos`
    #[must_use]
    pub const fn new(pos: Vec3, half_edge: f32) -> Self {
        Self { pos, half_edge }
    }

    /// Box centered at `(x, y, 0)`
    #[must_use]
    pub fn from_xy(x: f32, y: f32, half_edge: f32) -> Self {
        Self::new(Vec3::new(x, y, 0.0), half_edge)
    }

    /// Smallest X covered
    #[must_use]
    pub fn min_x(&self) -> f32 {
        self.pos.x - self.half_edge
    }

    /// Largest X covered
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.pos.x + self.half_edge
    }

    /// Smallest Y covered
    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.pos.y - self.half_edge
    }

    /// Largest Y covered
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.pos.y + self.half_edge
    }

    /// The four XY corners, counter-clockwise from the lower left
    #[must_use]
    pub fn corners_xy(&self) -> [(f32, f32); 4] {
        [
            (self.min_x(), self.min_y()),
            (self.max_x(), self.min_y()),
            (self.max_x(), self.max_y()),
            (self.min_x(), self.max_y()),
        ]
    }

    /// Whether `other` lies entirely inside this box in XY (shared edges count)
    #[must_use]
    pub fn contains_xy(&self, other: &Self) -> bool {
        self.min_x() <= other.min_x()
            && self.max_x() >= other.max_x()
            && self.min_y() <= other.min_y()
            && self.max_y() >= other.max_y()
    }

    /// Whether the point lies inside this box in XY, edges included
    #[must_use]
    pub fn point_inside(&self, point: &Vec3) -> bool {
        (point.x - self.pos.x).abs() <= self.half_edge
            && (point.y - self.pos.y).abs() <= self.half_edge
    }

    /// Whether the two boxes overlap in XY, touching edges included
    #[must_use]
    pub fn intersects_xy(&self, other: &Self) -> bool {
        let reach = self.half_edge + other.half_edge;
        (self.pos.x - other.pos.x).abs() <= reach && (self.pos.y - other.pos.y).abs() <= reach
    }

    /// Whether the two boxes overlap as cubes
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersects_xy(other)
            && (self.pos.z - other.pos.z).abs() <= self.half_edge + other.half_edge
    }

    /// Grow the half-edge so a model-space vertex fits inside
    pub fn update_edge(&mut self, vertex: &Vec3) {
        self.half_edge = self.half_edge.max(vertex.amax());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contains_is_reflexive() {
        let a = Aabb::from_xy(3.0, -4.0, 2.5);
        assert!(a.contains_xy(&a));
    }

    #[test]
    fn test_contains_inner_and_edge_touching() {
        let outer = Aabb::from_xy(0.0, 0.0, 10.0);
        assert!(outer.contains_xy(&Aabb::from_xy(0.0, 0.0, 1.0)));
        assert!(outer.contains_xy(&Aabb::from_xy(9.0, 9.0, 1.0)));
        assert!(!outer.contains_xy(&Aabb::from_xy(9.5, 0.0, 1.0)));
        assert!(!Aabb::from_xy(0.0, 0.0, 1.0).contains_xy(&outer));
    }

    #[test]
    fn test_contains_ignores_z() {
        let outer = Aabb::from_xy(0.0, 0.0, 10.0);
        let inner = Aabb::new(Vec3::new(0.0, 0.0, 500.0), 1.0);
        assert!(outer.contains_xy(&inner));
        assert!(!outer.intersects(&inner));
    }

    #[test]
    fn test_point_inside() {
        let a = Aabb::from_xy(1.0, 1.0, 1.0);
        assert!(a.point_inside(&Vec3::new(2.0, 0.0, 0.0)));
        assert!(!a.point_inside(&Vec3::new(2.1, 1.0, 0.0)));
    }

    #[test]
    fn test_intersects_xy() {
        let a = Aabb::from_xy(0.0, 0.0, 1.0);
        assert!(a.intersects_xy(&Aabb::from_xy(2.0, 0.0, 1.0)));
        assert!(!a.intersects_xy(&Aabb::from_xy(2.0, 2.5, 1.0)));
    }

    #[test]
    fn test_update_edge_uses_largest_magnitude() {
        let mut a = Aabb::default();
        a.update_edge(&Vec3::new(0.5, -0.5, 0.0));
        assert_relative_eq!(a.half_edge, DEFAULT_HALF_EDGE);

        a.update_edge(&Vec3::new(0.5, -7.0, 3.0));
        assert_relative_eq!(a.half_edge, 7.0);
    }

    #[test]
    fn test_corners() {
        let corners = Aabb::from_xy(0.0, 0.0, 1.0).corners_xy();
        assert_eq!(corners[0], (-1.0, -1.0));
        assert_eq!(corners[2], (1.0, 1.0));
    }
}
