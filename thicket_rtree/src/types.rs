// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned boxes and the [`Bounded`] trait for tree items.

/// Axis-aligned bounding box in 2D.
///
/// Boxes are closed: a box whose edge touches another box's edge intersects it,
/// and a zero-area box (`min == max`) behaves like a point.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb2D {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl Aabb2D {
    /// The empty box: the identity for [`Aabb2D::union`].
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Create a new box from min and max corners.
    #[inline]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a zero-area box at a point.
    #[inline]
    pub const fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// Returns `true` if this box contains no points (`min > max` on some axis).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width, or zero for an empty box.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Height, or zero for an empty box.
    #[inline]
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    /// Area, or zero for an empty box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-perimeter ("margin") of the box.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.width() + self.height()
    }

    /// Smallest box containing both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow `self` in place to contain `other`.
    #[inline]
    pub fn extend(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// Intersection of two boxes; may be empty.
    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Area of the intersection of two boxes (zero when disjoint).
    #[inline]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        self.intersect(other).area()
    }

    /// Area `self` would have after growing to admit `other`.
    #[inline]
    pub fn enlarged_area(&self, other: &Self) -> f64 {
        self.union(other).area()
    }

    /// Returns `true` if the boxes share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        other.min_x <= self.max_x
            && other.min_y <= self.max_y
            && other.max_x >= self.min_x
            && other.max_y >= self.min_y
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Returns `true` if the point lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Items stored in an [`RTree`](crate::RTree) report their bounding box through this trait.
///
/// The box must not change while the item is in the tree; remove and re-insert
/// an item whose bounds move.
pub trait Bounded {
    /// The item's axis-aligned bounding box.
    fn aabb(&self) -> Aabb2D;
}

impl Bounded for Aabb2D {
    #[inline]
    fn aabb(&self) -> Aabb2D {
        *self
    }
}

impl<T> Bounded for (Aabb2D, T) {
    #[inline]
    fn aabb(&self) -> Aabb2D {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2D::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn empty_is_union_identity() {
        let a = Aabb2D::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Aabb2D::EMPTY.union(&a), a);
        assert!(Aabb2D::EMPTY.is_empty());
        assert_eq!(Aabb2D::EMPTY.area(), 0.0);
    }

    #[test]
    fn point_box_contains_itself() {
        let p = Aabb2D::from_point(5.0, 5.0);
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&p));
        assert!(a.intersects(&p));
        assert!(p.contains(&p));
        assert!(!p.contains(&a));
    }

    #[test]
    fn margin_and_enlargement() {
        let a = Aabb2D::new(0.0, 0.0, 2.0, 3.0);
        assert_eq!(a.margin(), 5.0);
        let b = Aabb2D::new(4.0, 0.0, 5.0, 1.0);
        assert_eq!(a.enlarged_area(&b), 15.0);
    }
}
