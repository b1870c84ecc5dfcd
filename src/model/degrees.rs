//! Decimal degree coordinates and their fixed-point representations.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MINUTES_PER_DEGREE: f64 = 60.0;
const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Degrees per raw nano-degree coordinate unit.
const DEGREES_PER_NANO: f64 = 1e-9;

/// The decimal degree representation of a longitude or latitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// A precision used when comparing [`Degrees`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Epsilon(pub f64);

/// A hundred-thousandth of a degree.
pub const E5: Epsilon = Epsilon(1e-5);
/// A millionth of a degree.
pub const E6: Epsilon = Epsilon(1e-6);
/// A ten-millionth of a degree.
pub const E7: Epsilon = Epsilon(1e-7);
/// A hundred-millionth of a degree.
pub const E8: Epsilon = Epsilon(1e-8);
/// A billionth of a degree.
pub const E9: Epsilon = Epsilon(1e-9);

impl Degrees {
    /// The raw floating point value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// The angle in hundred thousandths of degrees.
    pub fn e5(self) -> i32 {
        round(self.0 * 1e5)
    }

    /// The angle in millionths of degrees.
    pub fn e6(self) -> i32 {
        round(self.0 * 1e6)
    }

    /// The angle in ten millionths of degrees.
    pub fn e7(self) -> i32 {
        round(self.0 * 1e7)
    }

    /// Checks whether two degrees are equal within the given epsilon.
    pub fn equal_within(self, other: Degrees, eps: Epsilon) -> bool {
        round64(self.0 / eps.0) == round64(other.0 / eps.0)
    }

    /// The coordinate in raw nano-degree units (granularity 1, offset 0),
    /// the fixed-point form used by the file header's bounding box.
    pub fn coordinate(self) -> i64 {
        round64(self.0 / DEGREES_PER_NANO)
    }

    /// Reconstructs degrees from a raw coordinate with the block's offset
    /// and granularity. All integer arithmetic happens at 64 bits; the
    /// nano-degree scale is applied once at the end.
    pub fn from_coordinate(offset: i64, granularity: i32, raw: i64) -> Degrees {
        Degrees(DEGREES_PER_NANO * (offset + granularity as i64 * raw) as f64)
    }

    /// The inverse of [`from_coordinate`](Degrees::from_coordinate): the raw
    /// coordinate for this angle under the given offset and granularity.
    pub fn to_coordinate(self, offset: i64, granularity: i32) -> i64 {
        (self.coordinate() - offset) / granularity as i64
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0.0 { "-" } else { "" };

        let val = self.0.abs();
        let degrees = val.floor();
        let minutes = (MINUTES_PER_DEGREE * (val - degrees)).floor();
        let seconds = SECONDS_PER_DEGREE * (val - degrees - minutes / MINUTES_PER_DEGREE);

        write!(
            f,
            "{}{}\u{00B0} {}' {}\"",
            sign,
            degrees as i64,
            minutes as i64,
            ftoa(seconds)
        )
    }
}

impl FromStr for Degrees {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Degrees(f64::from_str(s)?))
    }
}

impl From<f64> for Degrees {
    fn from(value: f64) -> Self {
        Degrees(value)
    }
}

/// Formats a float with the shortest representation that survives a round
/// trip through single precision, which trims the noise accumulated by
/// double precision degree arithmetic.
pub(crate) fn ftoa(value: f64) -> String {
    format!("{}", value as f32)
}

/// Rounds to nearest as an i32, halves away from zero.
fn round(val: f64) -> i32 {
    val.round() as i32
}

/// Rounds to nearest as an i64, halves away from zero.
fn round64(val: f64) -> i64 {
    val.round() as i64
}
