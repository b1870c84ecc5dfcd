//! Geographic bounding boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::degrees::{ftoa, Degrees, Epsilon};

/// The northernmost latitude.
pub const MAX_LAT: Degrees = Degrees(90.0);
/// The easternmost longitude.
pub const MAX_LON: Degrees = Degrees(180.0);
/// The southernmost latitude.
pub const MIN_LAT: Degrees = Degrees(-90.0);
/// The westernmost longitude.
pub const MIN_LON: Degrees = Degrees(-180.0);

/// A geographic bounding box.
///
/// After any expansion `bottom <= top` and `left <= right` hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The northern edge.
    pub top: Degrees,
    /// The western edge.
    pub left: Degrees,
    /// The southern edge.
    pub bottom: Degrees,
    /// The eastern edge.
    pub right: Degrees,
}

impl BoundingBox {
    /// Creates the deliberately inverted bounding box that any sequence of
    /// expansions monotonically widens into a real one.
    pub fn initial() -> BoundingBox {
        BoundingBox {
            top: MIN_LAT,
            left: MAX_LON,
            bottom: MAX_LAT,
            right: MIN_LON,
        }
    }

    /// Checks whether two bounding boxes are equal within the given epsilon.
    pub fn equal_within(&self, other: &BoundingBox, eps: Epsilon) -> bool {
        self.left.equal_within(other.left, eps)
            && self.right.equal_within(other.right, eps)
            && self.top.equal_within(other.top, eps)
            && self.bottom.equal_within(other.bottom, eps)
    }

    /// Checks whether the bounding box contains the point.
    pub fn contains(&self, lat: Degrees, lon: Degrees) -> bool {
        self.left <= lon && lon <= self.right && self.bottom <= lat && lat <= self.top
    }

    /// Widens the bounding box to include the point.
    pub fn expand_with_lat_lon(&mut self, lat: Degrees, lon: Degrees) {
        if self.top < lat {
            self.top = lat;
        }
        if self.bottom > lat {
            self.bottom = lat;
        }
        if self.left > lon {
            self.left = lon;
        }
        if self.right < lon {
            self.right = lon;
        }
    }

    /// Widens the bounding box to cover another bounding box.
    pub fn expand_with_bounding_box(&mut self, other: &BoundingBox) {
        if self.top < other.top {
            self.top = other.top;
        }
        if self.bottom > other.bottom {
            self.bottom = other.bottom;
        }
        if self.left > other.left {
            self.left = other.left;
        }
        if self.right < other.right {
            self.right = other.right;
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}) ({}, {})]",
            ftoa(self.top.0),
            ftoa(self.left.0),
            ftoa(self.bottom.0),
            ftoa(self.right.0)
        )
    }
}
