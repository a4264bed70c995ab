use pvtrack_core::SearchInterval;

/// The golden ratio: φ = (1 + √5) / 2
const PHI: f64 = 1.618_033_988_749_895;

/// The inverse golden ratio: 1/φ = φ - 1
pub(super) const INV_PHI: f64 = PHI - 1.0;

/// A search interval with two interior points at golden-ratio offsets.
///
/// Shrinking moves one outer bound onto the nearer interior point; the other
/// interior point survives and only the vacated one is recomputed.
#[derive(Debug, Clone, Copy)]
pub(super) struct GoldenBracket {
    interval: SearchInterval,

    /// At `left + (1 - φ⁻¹) * width`.
    inner_left: f64,

    /// At `left + φ⁻¹ * width`.
    inner_right: f64,
}

impl GoldenBracket {
    pub(super) fn new(interval: SearchInterval) -> Self {
        let left = interval.left();
        let width = interval.width();
        Self {
            interval,
            inner_left: left + (1.0 - INV_PHI) * width,
            inner_right: left + INV_PHI * width,
        }
    }

    pub(super) fn interval(&self) -> SearchInterval {
        self.interval
    }

    pub(super) fn inner_left(&self) -> f64 {
        self.inner_left
    }

    pub(super) fn inner_right(&self) -> f64 {
        self.inner_right
    }

    /// Narrows to `[left, inner_right]`; the old `inner_left` becomes the new
    /// `inner_right`.
    pub(super) fn shrink_right(&mut self) {
        self.interval.lower_right(self.inner_right);
        self.inner_right = self.inner_left;
        self.inner_left = self.interval.left() + (1.0 - INV_PHI) * self.interval.width();
    }

    /// Narrows to `[inner_left, right]`; the old `inner_right` becomes the new
    /// `inner_left`.
    pub(super) fn shrink_left(&mut self) {
        self.interval.raise_left(self.inner_left);
        self.inner_left = self.inner_right;
        self.inner_right = self.interval.left() + INV_PHI * self.interval.width();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use pvtrack_core::VoltageDomain;

    fn unit() -> GoldenBracket {
        let domain = VoltageDomain::new(1.0).unwrap();
        GoldenBracket::new(SearchInterval::full(&domain))
    }

    #[test]
    fn interior_points_divide_in_golden_ratio() {
        let bracket = unit();
        assert_relative_eq!(bracket.inner_left(), 1.0 - INV_PHI);
        assert_relative_eq!(bracket.inner_right(), INV_PHI);
        assert_relative_eq!(
            bracket.inner_left() / (1.0 - bracket.inner_left()),
            INV_PHI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn shrink_left_reuses_inner_right() {
        let mut bracket = unit();
        let old_inner_right = bracket.inner_right();

        bracket.shrink_left();

        assert_relative_eq!(bracket.interval().left(), 1.0 - INV_PHI);
        assert_relative_eq!(bracket.interval().right(), 1.0);
        assert_relative_eq!(bracket.inner_left(), old_inner_right);
        assert_relative_eq!(
            bracket.inner_right(),
            bracket.interval().left() + INV_PHI * bracket.interval().width()
        );
    }

    #[test]
    fn shrink_right_reuses_inner_left() {
        let mut bracket = unit();
        let old_inner_left = bracket.inner_left();

        bracket.shrink_right();

        assert_relative_eq!(bracket.interval().left(), 0.0);
        assert_relative_eq!(bracket.interval().right(), INV_PHI);
        assert_relative_eq!(bracket.inner_right(), old_inner_left);
        assert_relative_eq!(bracket.interval().width(), INV_PHI);
    }
}
