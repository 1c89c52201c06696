//! Pixel and rectangle selections.
//!
//! Coordinates follow the cube's `(row, col)` convention. In screen terms
//! `col` is x and `row` is y.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pixel position in a band plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelCoord {
    pub row: usize,
    pub col: usize,
}

impl PixelCoord {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Clamp into a `width` × `height` plane.
    ///
    /// Both dimensions must be at least 1.
    #[must_use]
    pub fn clamp_to(self, width: usize, height: usize) -> Self {
        Self {
            row: self.row.min(height.saturating_sub(1)),
            col: self.col.min(width.saturating_sub(1)),
        }
    }
}

/// Axis-aligned rectangle with inclusive corners.
///
/// Construction orders the corners, so `top_left.row <= bottom_right.row`
/// and `top_left.col <= bottom_right.col` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RectCorners"))]
pub struct Rect {
    top_left: PixelCoord,
    bottom_right: PixelCoord,
}

/// Serialized form of a [`Rect`]; corners may arrive in any order.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RectCorners {
    top_left: PixelCoord,
    bottom_right: PixelCoord,
}

#[cfg(feature = "serde")]
impl From<RectCorners> for Rect {
    fn from(corners: RectCorners) -> Self {
        Rect::from_corners(corners.top_left, corners.bottom_right)
    }
}

impl Rect {
    /// Build a rectangle from any two opposite corners.
    #[must_use]
    pub fn from_corners(a: PixelCoord, b: PixelCoord) -> Self {
        Self {
            top_left: PixelCoord::new(a.row.min(b.row), a.col.min(b.col)),
            bottom_right: PixelCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    #[must_use]
    pub fn top_left(&self) -> PixelCoord {
        self.top_left
    }

    #[must_use]
    pub fn bottom_right(&self) -> PixelCoord {
        self.bottom_right
    }

    /// Number of columns covered (inclusive).
    #[must_use]
    pub fn width(&self) -> usize {
        self.bottom_right.col - self.top_left.col + 1
    }

    /// Number of rows covered (inclusive).
    #[must_use]
    pub fn height(&self) -> usize {
        self.bottom_right.row - self.top_left.row + 1
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    #[must_use]
    pub fn contains(&self, p: PixelCoord) -> bool {
        (self.top_left.row..=self.bottom_right.row).contains(&p.row)
            && (self.top_left.col..=self.bottom_right.col).contains(&p.col)
    }

    /// Intersect with a `width` × `height` plane.
    ///
    /// Returns `None` when the rectangle lies entirely outside the plane.
    #[must_use]
    pub fn clip_to(&self, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 || self.top_left.row >= height || self.top_left.col >= width
        {
            return None;
        }
        Some(Self {
            top_left: self.top_left,
            bottom_right: self.bottom_right.clamp_to(width, height),
        })
    }
}

/// The operator's current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectionRegion {
    Point(PixelCoord),
    Region(Rect),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_ordering() {
        let r = Rect::from_corners(PixelCoord::new(5, 1), PixelCoord::new(2, 7));
        assert_eq!(r.top_left(), PixelCoord::new(2, 1));
        assert_eq!(r.bottom_right(), PixelCoord::new(5, 7));
        assert_eq!(r.width(), 7);
        assert_eq!(r.height(), 4);
        assert_eq!(r.pixel_count(), 28);
    }

    #[test]
    fn test_single_pixel_rect() {
        let p = PixelCoord::new(3, 3);
        let r = Rect::from_corners(p, p);
        assert_eq!(r.pixel_count(), 1);
        assert!(r.contains(p));
        assert!(!r.contains(PixelCoord::new(3, 4)));
    }

    #[test]
    fn test_clip() {
        let r = Rect::from_corners(PixelCoord::new(2, 2), PixelCoord::new(10, 10));
        let clipped = r.clip_to(4, 6).unwrap();
        assert_eq!(clipped.bottom_right(), PixelCoord::new(5, 3));
        assert_eq!(clipped.top_left(), PixelCoord::new(2, 2));

        let outside = Rect::from_corners(PixelCoord::new(0, 8), PixelCoord::new(1, 9));
        assert!(outside.clip_to(4, 4).is_none());
    }

    #[test]
    fn test_point_clamp() {
        let p = PixelCoord::new(100, 2).clamp_to(4, 8);
        assert_eq!(p, PixelCoord::new(7, 2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_rect_is_ordered() {
        let json = r#"{"top_left":{"row":3,"col":3},"bottom_right":{"row":0,"col":1}}"#;
        let r: Rect = serde_json::from_str(json).unwrap();
        assert_eq!(r.top_left(), PixelCoord::new(0, 1));
        assert_eq!(r.bottom_right(), PixelCoord::new(3, 3));
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 4);

        let back: Rect = serde_json::from_str(&serde_json::to_string(&r).unwrap()).unwrap();
        assert_eq!(back, r);
    }
}
