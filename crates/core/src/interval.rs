use thiserror::Error;

use crate::VoltageDomain;

/// Errors that can occur when creating a [`SearchInterval`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntervalError {
    /// One or both bounds are non-finite.
    #[error("non-finite bound(s)")]
    NonFinite,

    /// The left bound exceeds the right bound.
    #[error("left bound exceeds right bound")]
    Reversed,

    /// A bound lies outside `[0, MAX_VOLTAGE]`.
    #[error("bound outside the voltage domain")]
    OutOfDomain,
}

/// The voltage range `[left, right]` a local algorithm trusts to be unimodal.
///
/// Always satisfies `0 <= left <= right <= MAX_VOLTAGE`. Within one
/// convergence episode the interval only narrows: [`raise_left`] and
/// [`lower_right`] never move a bound outward.
///
/// [`raise_left`]: SearchInterval::raise_left
/// [`lower_right`]: SearchInterval::lower_right
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SearchInterval {
    left: f64,
    right: f64,
}

impl SearchInterval {
    /// Creates a validated interval inside `domain`.
    ///
    /// # Errors
    ///
    /// Returns an [`IntervalError`] if a bound is non-finite, the bounds are
    /// reversed, or a bound lies outside the domain.
    pub fn new(left: f64, right: f64, domain: &VoltageDomain) -> Result<Self, IntervalError> {
        if !left.is_finite() || !right.is_finite() {
            return Err(IntervalError::NonFinite);
        }
        if left > right {
            return Err(IntervalError::Reversed);
        }
        if !domain.contains(left) || !domain.contains(right) {
            return Err(IntervalError::OutOfDomain);
        }
        Ok(Self { left, right })
    }

    /// Returns the whole domain, `[0, MAX_VOLTAGE]`.
    #[must_use]
    pub fn full(domain: &VoltageDomain) -> Self {
        Self {
            left: 0.0,
            right: domain.max_voltage(),
        }
    }

    /// Creates an interval from arbitrary bounds by ordering and clamping them.
    ///
    /// Non-finite input yields the full domain.
    #[must_use]
    pub fn clamped(a: f64, b: f64, domain: &VoltageDomain) -> Self {
        if !a.is_finite() || !b.is_finite() {
            return Self::full(domain);
        }
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        Self {
            left: domain.clamp(left),
            right: domain.clamp(right),
        }
    }

    /// Returns the left bound.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Returns the right bound.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Returns the bounds as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }

    /// Returns the interval width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Returns the midpoint of the interval.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.left + self.right)
    }

    /// Returns true if `voltage` lies within the bounds.
    #[must_use]
    pub fn contains(&self, voltage: f64) -> bool {
        (self.left..=self.right).contains(&voltage)
    }

    /// Clamps `voltage` into the interval; NaN maps to the left bound.
    #[must_use]
    pub fn clamp(&self, voltage: f64) -> f64 {
        if voltage.is_nan() {
            self.left
        } else {
            voltage.clamp(self.left, self.right)
        }
    }

    /// Moves the left bound up to `voltage`, never past the right bound.
    ///
    /// Values below the current left bound (or NaN) leave it unchanged.
    pub fn raise_left(&mut self, voltage: f64) {
        if voltage > self.left {
            self.left = voltage.min(self.right);
        }
    }

    /// Moves the right bound down to `voltage`, never past the left bound.
    ///
    /// Values above the current right bound (or NaN) leave it unchanged.
    pub fn lower_right(&mut self, voltage: f64) {
        if voltage < self.right {
            self.right = voltage.max(self.left);
        }
    }
}
