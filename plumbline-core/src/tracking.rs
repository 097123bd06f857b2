//! Dead-band deviation classification
//!
//! The tracking loop is a bang-bang controller: it never scales its
//! correction by the size of the error, it only asks which side of the
//! tolerance band the live roll angle is on.

use crate::position::JogDirection;

/// Default tolerance band half-width (degrees)
pub const DEFAULT_TOLERANCE_DEG: f32 = 2.0;

/// Deviation of the live angle from the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deviation {
    /// Within the tolerance band
    NoChange,
    /// Live angle above reference + tolerance
    LeanedPositive,
    /// Live angle below reference - tolerance
    LeanedNegative,
}

impl Deviation {
    /// Servo direction that compensates this deviation
    pub fn correction(self) -> Option<JogDirection> {
        match self {
            Deviation::NoChange => None,
            Deviation::LeanedPositive => Some(JogDirection::CounterClockwise),
            Deviation::LeanedNegative => Some(JogDirection::Clockwise),
        }
    }

    /// True when outside the tolerance band
    pub fn is_leaning(self) -> bool {
        !matches!(self, Deviation::NoChange)
    }
}

/// Classify `current` against `reference` with a dead band of `tolerance`
///
/// `|current - reference| <= tolerance` is always [`Deviation::NoChange`].
pub fn classify(current: f32, reference: f32, tolerance: f32) -> Deviation {
    let diff = current - reference;

    if libm::fabsf(diff) <= tolerance {
        Deviation::NoChange
    } else if diff > 0.0 {
        Deviation::LeanedPositive
    } else {
        Deviation::LeanedNegative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lean_positive() {
        assert_eq!(classify(15.0, 10.0, 2.0), Deviation::LeanedPositive);
        assert_eq!(
            Deviation::LeanedPositive.correction(),
            Some(JogDirection::CounterClockwise)
        );
    }

    #[test]
    fn test_lean_negative() {
        assert_eq!(classify(7.5, 10.0, 2.0), Deviation::LeanedNegative);
        assert_eq!(
            Deviation::LeanedNegative.correction(),
            Some(JogDirection::Clockwise)
        );
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(classify(12.0, 10.0, 2.0), Deviation::NoChange);
        assert_eq!(classify(8.0, 10.0, 2.0), Deviation::NoChange);
        assert_eq!(classify(12.01, 10.0, 2.0), Deviation::LeanedPositive);
        assert_eq!(Deviation::NoChange.correction(), None);
    }

    proptest! {
        #[test]
        fn inside_band_is_no_change(
            reference in -180.0f32..180.0,
            offset in -1.0f32..=1.0,
            tolerance in 0.5f32..10.0,
        ) {
            let current = reference + offset * tolerance * 0.99;
            prop_assert_eq!(classify(current, reference, tolerance), Deviation::NoChange);
        }

        #[test]
        fn outside_band_follows_sign(
            reference in -180.0f32..180.0,
            excess in 0.01f32..90.0,
            tolerance in 0.0f32..10.0,
        ) {
            let above = reference + tolerance + excess;
            let below = reference - tolerance - excess;
            prop_assert_eq!(classify(above, reference, tolerance), Deviation::LeanedPositive);
            prop_assert_eq!(classify(below, reference, tolerance), Deviation::LeanedNegative);
        }
    }
}
