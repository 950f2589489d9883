//! Pipeline stages

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Category tag a front-end maps to an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    Intake,
    Lookup,
    Verification,
    Imaging,
    Estimation,
    Assignment,
    Payout,
    Notification,
}

/// Nominal duration of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageDuration {
    /// Always takes exactly this many milliseconds
    Fixed { millis: u64 },
    /// Sampled uniformly from `[min_millis, max_millis)` each time the stage starts
    Range { min_millis: u64, max_millis: u64 },
}

impl StageDuration {
    pub fn fixed(millis: u64) -> Self {
        StageDuration::Fixed { millis }
    }

    pub fn range(min_millis: u64, max_millis: u64) -> Self {
        StageDuration::Range { min_millis, max_millis }
    }

    /// Draws a concrete duration in milliseconds
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match *self {
            StageDuration::Fixed { millis } => millis,
            StageDuration::Range { min_millis, max_millis } if max_millis > min_millis => {
                rng.random_range(min_millis..max_millis)
            }
            StageDuration::Range { min_millis, .. } => min_millis,
        }
    }
}

/// A single named step of a simulated processing pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: StageCategory,
    pub duration: StageDuration,
}

impl Stage {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: StageCategory,
        duration: StageDuration,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_duration_ignores_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(StageDuration::fixed(1500).sample(&mut rng), 1500);
    }

    #[test]
    fn test_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let duration = StageDuration::range(2000, 4000);
        for _ in 0..200 {
            let millis = duration.sample(&mut rng);
            assert!((2000..4000).contains(&millis));
        }
    }

    #[test]
    fn test_degenerate_range_uses_min() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(StageDuration::range(900, 900).sample(&mut rng), 900);
        assert_eq!(StageDuration::range(900, 100).sample(&mut rng), 900);
    }
}
