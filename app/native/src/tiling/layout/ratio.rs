//! Center-column ratios.
//!
//! The ratio table is fixed and shared by all desktops; only the selected
//! index varies per desktop. Indices are cyclic: stepping past either end
//! wraps around instead of clamping, so a stored index can never be invalid.

use std::fmt;

/// Fraction of the screen width allotted to the center column.
///
/// Held as an exact rational so that `width * ratio` floors the same way on
/// every screen (e.g. `1920 * 3/9 == 640`, never `639`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    numerator: u32,
    denominator: u32,
}

impl Ratio {
    /// No center column: the screen is split into two columns.
    pub const ZERO: Self = Self::new(0, 1);

    /// Creates a new ratio.
    ///
    /// `denominator` must be non-zero and greater than `numerator`.
    #[must_use]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// Returns `true` when this ratio produces no center column.
    #[must_use]
    pub const fn is_zero(&self) -> bool { self.numerator == 0 }

    /// Returns the ratio as a floating point fraction in `[0, 1)`.
    #[must_use]
    pub fn as_f64(&self) -> f64 { f64::from(self.numerator) / f64::from(self.denominator) }

    /// Returns `floor(width * ratio)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn of(&self, width: i32) -> i32 {
        let scaled = (width as i64) * (self.numerator as i64);
        scaled.div_euclid(self.denominator as i64) as i32
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.as_f64() * 100.0)
    }
}

/// Supported center-column ratios, narrowest first.
const SUPPORTED_RATIOS: [Ratio; 8] = [
    Ratio::ZERO,        // only 2 columns
    Ratio::new(3, 9),   // 3 even columns
    Ratio::new(40, 100),
    Ratio::new(45, 100),
    Ratio::new(50, 100),
    Ratio::new(55, 100),
    Ratio::new(60, 100),
    Ratio::new(65, 100),
];

/// Ordered, cyclic table of supported center-column ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioTable {
    ratios: &'static [Ratio],
}

impl Default for RatioTable {
    fn default() -> Self { Self::standard() }
}

impl RatioTable {
    /// Returns the built-in ratio table.
    #[must_use]
    pub const fn standard() -> Self { Self { ratios: &SUPPORTED_RATIOS } }

    /// Returns the number of supported ratios.
    #[must_use]
    pub const fn len(&self) -> usize { self.ratios.len() }

    /// Returns `true` if the table holds no ratios.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.ratios.is_empty() }

    /// Wraps an arbitrary (possibly negative or stale) index into range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn wrap(&self, index: i64) -> usize { index.rem_euclid(self.ratios.len() as i64) as usize }

    /// Returns the ratio at `index`, wrapping out-of-range indices.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn ratio_at(&self, index: usize) -> Ratio { self.ratios[self.wrap(index as i64)] }

    /// Advances `index` by `step`, wrapping through the table.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn step(&self, index: usize, step: i32) -> usize {
        self.wrap(index as i64 + step as i64)
    }

    /// Iterates over all supported ratios in order.
    pub fn iter(&self) -> impl Iterator<Item = Ratio> + '_ { self.ratios.iter().copied() }
}

// ============================================================================
// Tests
// ============================================================================
