//! Star rating derived from Steam's vote score and vote volume.
//!
//! Steam exposes a continuous score in `[0, 1]` per Workshop item. A raw score
//! says little when only a handful of people voted, so the rating damps the
//! score by how many votes back it before quantising into 0–5 stars.
//!
//! Contract for every [`StarRatingPolicy`]:
//! - the result is within `0..=MAX_STARS`;
//! - for a fixed vote volume the result never decreases as the score grows;
//! - for a fixed score the result never decreases as the volume grows;
//! - a low-volume item cannot reach `MAX_STARS` from a favourable score alone.

/// Highest rating an item can receive.
pub const MAX_STARS: u8 = 5;

/// Pluggable star quantisation.
pub trait StarRatingPolicy: Send + Sync {
    /// Rate an item from its vote score and total vote volume (likes + dislikes).
    ///
    /// # Examples
    /// ```
    /// use workshop_stats::domain::{ConfidenceStarRating, StarRatingPolicy};
    ///
    /// let policy = ConfidenceStarRating::default();
    /// assert_eq!(policy.stars(0.9, 10), 5);
    /// assert_eq!(policy.stars(1.0, 1), 1);
    /// assert_eq!(policy.stars(0.7, 0), 0);
    /// ```
    fn stars(&self, score: f32, votes: u64) -> u8;
}

/// Default policy: linear confidence ramp followed by fixed bands.
///
/// `confidence = min(1, votes / full_confidence_votes)` and
/// `effective = clamp(score, 0, 1) * confidence`. The effective score maps to
/// stars through lower bounds `0.8 → 5`, `0.6 → 4`, `0.4 → 3`, `0.2 → 2`,
/// anything above zero → 1, zero → 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceStarRating {
    full_confidence_votes: u64,
}

/// Vote volume at which the score is trusted in full.
pub const DEFAULT_FULL_CONFIDENCE_VOTES: u64 = 10;

const STAR_BANDS: [(f64, u8); 4] = [(0.8, 5), (0.6, 4), (0.4, 3), (0.2, 2)];

impl ConfidenceStarRating {
    /// Build a policy that trusts scores fully at `full_confidence_votes`.
    ///
    /// A value of zero is treated as one.
    #[must_use]
    pub fn new(full_confidence_votes: u64) -> Self {
        Self {
            full_confidence_votes: full_confidence_votes.max(1),
        }
    }

    fn effective_score(&self, score: f32, votes: u64) -> f64 {
        let score = if score.is_nan() {
            0.0
        } else {
            f64::from(score).clamp(0.0, 1.0)
        };
        let trusted_votes = votes.min(self.full_confidence_votes);
        #[expect(
            clippy::cast_precision_loss,
            reason = "both operands are capped by full_confidence_votes"
        )]
        let confidence = trusted_votes as f64 / self.full_confidence_votes as f64;
        score * confidence
    }
}

impl Default for ConfidenceStarRating {
    fn default() -> Self {
        Self::new(DEFAULT_FULL_CONFIDENCE_VOTES)
    }
}

impl StarRatingPolicy for ConfidenceStarRating {
    fn stars(&self, score: f32, votes: u64) -> u8 {
        let effective = self.effective_score(score, votes);
        if effective <= 0.0 {
            return 0;
        }
        STAR_BANDS
            .iter()
            .find(|(lower_bound, _)| effective >= *lower_bound)
            .map_or(1, |(_, stars)| *stars)
    }
}
