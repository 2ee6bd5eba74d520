/// Display tier of a rain-probability percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbabilityBand {
    Low,
    Medium,
    High,
}

pub const MEDIUM_THRESHOLD: f64 = 30.0;
pub const HIGH_THRESHOLD: f64 = 70.0;

impl ProbabilityBand {
    /// `p < 30` is low, `30 <= p < 70` medium, `p >= 70` high. NaN is low.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            ProbabilityBand::High
        } else if probability >= MEDIUM_THRESHOLD {
            ProbabilityBand::Medium
        } else {
            ProbabilityBand::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProbabilityBand::Low => "low-chance",
            ProbabilityBand::Medium => "medium-chance",
            ProbabilityBand::High => "high-chance",
        }
    }
}

/// Width of the probability bar, in percent of the full bar.
pub fn bar_width(probability: f64) -> f64 {
    if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 100.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_upper_band() {
        assert_eq!(ProbabilityBand::from_probability(29.999), ProbabilityBand::Low);
        assert_eq!(ProbabilityBand::from_probability(30.0), ProbabilityBand::Medium);
        assert_eq!(ProbabilityBand::from_probability(69.999), ProbabilityBand::Medium);
        assert_eq!(ProbabilityBand::from_probability(70.0), ProbabilityBand::High);
    }

    #[test]
    fn whole_range_is_monotonic() {
        let mut previous = ProbabilityBand::Low;
        for tenth in 0..=1000 {
            let p = f64::from(tenth) / 10.0;
            let band = ProbabilityBand::from_probability(p);
            let expected = if p < 30.0 {
                ProbabilityBand::Low
            } else if p < 70.0 {
                ProbabilityBand::Medium
            } else {
                ProbabilityBand::High
            };
            assert_eq!(band, expected, "p = {p}");
            assert!(rank(band) >= rank(previous));
            previous = band;
        }
    }

    #[test]
    fn extremes_and_nan() {
        assert_eq!(ProbabilityBand::from_probability(0.0), ProbabilityBand::Low);
        assert_eq!(ProbabilityBand::from_probability(100.0), ProbabilityBand::High);
        assert_eq!(ProbabilityBand::from_probability(f64::NAN), ProbabilityBand::Low);
    }

    #[test]
    fn css_classes() {
        assert_eq!(ProbabilityBand::High.css_class(), "high-chance");
        assert_eq!(ProbabilityBand::Medium.css_class(), "medium-chance");
        assert_eq!(ProbabilityBand::Low.css_class(), "low-chance");
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_width(72.0), 72.0);
        assert_eq!(bar_width(130.0), 100.0);
        assert_eq!(bar_width(-4.0), 0.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
    }

    fn rank(band: ProbabilityBand) -> u8 {
        match band {
            ProbabilityBand::Low => 0,
            ProbabilityBand::Medium => 1,
            ProbabilityBand::High => 2,
        }
    }
}
