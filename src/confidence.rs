//! Aggregate retrieval confidence classification.
//!
//! Maps the mean similarity of a result set onto a coarse HIGH/MEDIUM/LOW
//! label that downstream consumers use to hedge their answers. Recomputed
//! per query, never stored.

use std::fmt;

/// Thresholds are deliberate constants, not configuration: the labels are a
/// contract with the answer-generation layer.
const HIGH_THRESHOLD: f32 = 0.7;
const MEDIUM_THRESHOLD: f32 = 0.5;

/// Discrete confidence label over a set of similarity scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Classify the arithmetic mean of `scores`.
///
/// Empty input means nothing was retrieved: mean 0.0, label LOW. Both
/// thresholds are strict (`>`), so a mean of exactly 0.5 is LOW and exactly
/// 0.7 is MEDIUM.
pub fn classify_confidence(scores: &[f32]) -> Confidence {
    let mean = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f32>() / scores.len() as f32
    };

    if mean > HIGH_THRESHOLD {
        Confidence::High
    } else if mean > MEDIUM_THRESHOLD {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high() {
        assert_eq!(classify_confidence(&[0.9, 0.8]), Confidence::High);
    }

    #[test]
    fn test_medium() {
        assert_eq!(classify_confidence(&[0.6, 0.55]), Confidence::Medium);
    }

    #[test]
    fn test_empty_is_low() {
        assert_eq!(classify_confidence(&[]), Confidence::Low);
    }

    #[test]
    fn test_boundary_half_is_low() {
        // Exactly 0.5 is not > 0.5.
        assert_eq!(classify_confidence(&[0.5]), Confidence::Low);
    }

    #[test]
    fn test_boundary_point_seven_is_medium() {
        assert_eq!(classify_confidence(&[0.7]), Confidence::Medium);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Confidence::High.to_string(), "HIGH");
        assert_eq!(Confidence::Medium.to_string(), "MEDIUM");
        assert_eq!(Confidence::Low.to_string(), "LOW");
    }
}
