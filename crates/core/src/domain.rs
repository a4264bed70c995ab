use thiserror::Error;

/// Upper voltage bound contributed by each series cell, in V.
pub const MAX_VOLTAGE_PER_CELL: f64 = 0.8;

/// Errors that can occur when creating a [`VoltageDomain`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// The array has no cells.
    #[error("cell count must be at least one")]
    NoCells,

    /// The maximum voltage is non-finite or not positive.
    #[error("max voltage must be finite and positive")]
    MaxVoltage,
}

/// The universal voltage range `[0, MAX_VOLTAGE]` of one tracking instance.
///
/// Fixed at construction and carried by each algorithm instance; every
/// reference voltage a tracker emits lies inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VoltageDomain {
    max_voltage: f64,
}

impl VoltageDomain {
    /// Creates a domain with an explicit upper bound.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MaxVoltage`] if `max_voltage` is non-finite or
    /// not positive.
    pub fn new(max_voltage: f64) -> Result<Self, DomainError> {
        if !max_voltage.is_finite() || max_voltage <= 0.0 {
            return Err(DomainError::MaxVoltage);
        }
        Ok(Self { max_voltage })
    }

    /// Creates the domain for `num_cells` series cells.
    ///
    /// The bound is `num_cells * MAX_VOLTAGE_PER_CELL`, rounded to the
    /// nearest centivolt.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NoCells`] if `num_cells` is zero.
    pub fn from_cells(num_cells: u32) -> Result<Self, DomainError> {
        if num_cells == 0 {
            return Err(DomainError::NoCells);
        }
        let raw = f64::from(num_cells) * MAX_VOLTAGE_PER_CELL;
        Self::new((raw * 100.0).round() / 100.0)
    }

    /// Returns `MAX_VOLTAGE`.
    #[must_use]
    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    /// Returns true if `voltage` lies in `[0, MAX_VOLTAGE]`.
    #[must_use]
    pub fn contains(&self, voltage: f64) -> bool {
        (0.0..=self.max_voltage).contains(&voltage)
    }

    /// Clamps `voltage` into `[0, MAX_VOLTAGE]`.
    ///
    /// NaN maps to `0 V` so a degenerate computation can never escape the
    /// domain.
    #[must_use]
    pub fn clamp(&self, voltage: f64) -> f64 {
        if voltage.is_nan() {
            0.0
        } else {
            voltage.clamp(0.0, self.max_voltage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn from_cells_rounds_to_centivolts() {
        let domain = VoltageDomain::from_cells(3).unwrap();
        assert_relative_eq!(domain.max_voltage(), 2.4);

        let domain = VoltageDomain::from_cells(125).unwrap();
        assert_relative_eq!(domain.max_voltage(), 100.0);
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert_eq!(VoltageDomain::from_cells(0), Err(DomainError::NoCells));
        assert_eq!(VoltageDomain::new(0.0), Err(DomainError::MaxVoltage));
        assert_eq!(VoltageDomain::new(f64::NAN), Err(DomainError::MaxVoltage));
        assert_eq!(
            VoltageDomain::new(f64::INFINITY),
            Err(DomainError::MaxVoltage)
        );
    }

    #[test]
    fn clamp_saturates_and_absorbs_nan() {
        let domain = VoltageDomain::new(10.0).unwrap();
        assert_relative_eq!(domain.clamp(-1.0), 0.0);
        assert_relative_eq!(domain.clamp(4.2), 4.2);
        assert_relative_eq!(domain.clamp(11.0), 10.0);
        assert_relative_eq!(domain.clamp(f64::INFINITY), 10.0);
        assert_relative_eq!(domain.clamp(f64::NAN), 0.0);
    }
}
