//! Workshop addon entity, its display order, and per-user engagement totals.

use std::cmp::Ordering;

use super::StarRatingPolicy;
use super::ports::CatalogEntry;

/// One published Workshop item with derived engagement metrics.
///
/// Built once per aggregation from a [`CatalogEntry`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    /// Published file identifier.
    pub id: u64,
    /// Item title.
    pub title: String,
    /// Preview image URL.
    pub image_url: String,
    /// Unique visitors.
    pub views: u64,
    /// Current subscribers.
    pub subscribers: u64,
    /// Users who favourited the item.
    pub favorites: u64,
    /// Up-votes, zero when Steam omits them.
    pub likes: u64,
    /// Down-votes, zero when Steam omits them.
    pub dislikes: u64,
    /// Sum of all reaction tallies.
    pub awards: u64,
    /// Derived 0–5 star rating.
    pub stars: u8,
}

impl Addon {
    /// Transform a raw catalog entry, defaulting absent vote counts to zero.
    ///
    /// # Examples
    /// ```
    /// use workshop_stats::domain::ports::{CatalogEntry, ReactionTally, VoteRecord};
    /// use workshop_stats::domain::{Addon, ConfidenceStarRating};
    ///
    /// let entry = CatalogEntry {
    ///     id: 7,
    ///     title: "Prop Hunt".to_owned(),
    ///     preview_url: "https://images.example/7.png".to_owned(),
    ///     views: 100,
    ///     subscriptions: 40,
    ///     favorited: 3,
    ///     vote: VoteRecord { score: 0.9, votes_up: Some(10), votes_down: None },
    ///     reactions: Some(vec![ReactionTally { reaction_id: 1, count: 2 }]),
    /// };
    /// let addon = Addon::from_catalog_entry(entry, &ConfidenceStarRating::default());
    /// assert_eq!(addon.dislikes, 0);
    /// assert_eq!(addon.awards, 2);
    /// assert_eq!(addon.stars, 5);
    /// ```
    pub fn from_catalog_entry(entry: CatalogEntry, rating: &dyn StarRatingPolicy) -> Self {
        let likes = entry.vote.votes_up.unwrap_or(0);
        let dislikes = entry.vote.votes_down.unwrap_or(0);
        let awards = entry
            .reactions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .fold(0_u64, |total, reaction| total.saturating_add(reaction.count));
        let stars = rating.stars(entry.vote.score, likes.saturating_add(dislikes));

        Self {
            id: entry.id,
            title: entry.title,
            image_url: entry.preview_url,
            views: entry.views,
            subscribers: entry.subscriptions,
            favorites: entry.favorited,
            likes,
            dislikes,
            awards,
            stars,
        }
    }

    /// Total order used for result sets: newest first.
    ///
    /// Steam allocates published-file ids monotonically, so a descending id is
    /// the newest-first order. Equal ids fall back to the title and then every
    /// remaining field, which keeps the relation total.
    pub fn display_order(&self, other: &Self) -> Ordering {
        other
            .id
            .cmp(&self.id)
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.image_url.cmp(&other.image_url))
            .then_with(|| {
                let lhs = (
                    self.views,
                    self.subscribers,
                    self.favorites,
                    self.likes,
                    self.dislikes,
                    self.awards,
                    self.stars,
                );
                let rhs = (
                    other.views,
                    other.subscribers,
                    other.favorites,
                    other.likes,
                    other.dislikes,
                    other.awards,
                    other.stars,
                );
                lhs.cmp(&rhs)
            })
    }
}

/// Sort addons into display order.
pub fn sort_for_display(addons: &mut [Addon]) {
    addons.sort_by(Addon::display_order);
}

/// Engagement metrics summed over every addon of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementTotals {
    /// Total views.
    pub views: u64,
    /// Total subscribers.
    pub subscribers: u64,
    /// Total favourites.
    pub favorites: u64,
    /// Total up-votes.
    pub likes: u64,
    /// Total down-votes.
    pub dislikes: u64,
    /// Total reaction tallies.
    pub awards: u64,
}

impl EngagementTotals {
    /// Sum metrics across `addons`, saturating instead of overflowing.
    pub fn from_addons(addons: &[Addon]) -> Self {
        addons.iter().fold(Self::default(), |totals, addon| Self {
            views: totals.views.saturating_add(addon.views),
            subscribers: totals.subscribers.saturating_add(addon.subscribers),
            favorites: totals.favorites.saturating_add(addon.favorites),
            likes: totals.likes.saturating_add(addon.likes),
            dislikes: totals.dislikes.saturating_add(addon.dislikes),
            awards: totals.awards.saturating_add(addon.awards),
        })
    }
}
