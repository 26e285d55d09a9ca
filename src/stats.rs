//! # Statistics
//! Incremental rankings over the observed post stream.
//!
//! - Scores are last-write-wins per post id, so refreshed upvotes stay live.
//! - A contributor is credited once per distinct post id, at first sight only.
//!   Re-delivery of the same post in later (overlapping) batches never recounts.
//! - Rankings sort by value descending; ties keep first-sighting order.
//!
//! The aggregator is owned by the poll loop and needs no locking.

use std::collections::HashMap;

use crate::ingest::types::FeedItem;
use crate::report::RankedEntry;

#[derive(Debug, Clone)]
struct TrackedItem {
    title: String,
    score: i64,
}

#[derive(Debug, Clone)]
struct Contributor {
    name: String,
    items: u64,
}

/// Ranking state folded from every batch seen during the process lifetime.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    /// Posts in first-sighting order.
    items: Vec<TrackedItem>,
    /// Post id -> index into `items`. Doubles as the seen-set.
    seen: HashMap<String, usize>,
    /// Contributors in first-sighting order.
    contributors: Vec<Contributor>,
    /// Contributor name -> index into `contributors`.
    by_contributor: HashMap<String, usize>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch, in batch order. Returns how many posts were seen for the first time.
    pub fn update(&mut self, batch: &[FeedItem]) -> usize {
        let mut fresh = 0usize;
        for item in batch {
            if let Some(&idx) = self.seen.get(&item.id) {
                self.items[idx].score = item.score;
                continue;
            }

            self.seen.insert(item.id.clone(), self.items.len());
            self.items.push(TrackedItem {
                title: item.title.clone(),
                score: item.score,
            });
            self.credit(&item.contributor);
            fresh += 1;
        }
        fresh
    }

    fn credit(&mut self, name: &str) {
        match self.by_contributor.get(name) {
            Some(&idx) => self.contributors[idx].items += 1,
            None => {
                self.by_contributor
                    .insert(name.to_string(), self.contributors.len());
                self.contributors.push(Contributor {
                    name: name.to_string(),
                    items: 1,
                });
            }
        }
    }

    /// Up to `limit` posts as `(title, score)`, highest score first.
    pub fn top_items(&self, limit: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<&TrackedItem> = self.items.iter().collect();
        // stable: equal scores keep first-sighting order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
            .into_iter()
            .take(limit)
            .map(|it| RankedEntry::new(it.title.clone(), it.score))
            .collect()
    }

    /// Up to `limit` contributors as `(name, distinct posts)`, most active first.
    pub fn top_contributors(&self, limit: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<&Contributor> = self.contributors.iter().collect();
        ranked.sort_by(|a, b| b.items.cmp(&a.items));
        ranked
            .into_iter()
            .take(limit)
            .map(|c| RankedEntry::new(c.name.clone(), c.items as i64))
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current score of a post, if it has been seen.
    pub fn score_of(&self, id: &str) -> Option<i64> {
        self.seen.get(id).map(|&idx| self.items[idx].score)
    }

    /// Distinct posts credited to a contributor (0 if never seen).
    pub fn activity_of(&self, contributor: &str) -> u64 {
        self.by_contributor
            .get(contributor)
            .map(|&idx| self.contributors[idx].items)
            .unwrap_or(0)
    }
}
