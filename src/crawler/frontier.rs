//! URL frontier
//!
//! This module handles:
//! - Deduplication of discovered URLs against everything already visited
//! - Scoring pending URLs by the number of inbound links seen so far
//! - Selecting the highest-scoring pending URL and committing it as visited

use std::collections::{HashMap, HashSet};

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The URL was already selected once; nothing changed
    AlreadySeen,
    /// The URL was pending; its score went up by one
    Rescored,
    /// The URL is new and now pending with a score of one
    Added,
}

/// Pending and visited URL sets
///
/// A URL is in at most one of the two sets. Once selected it moves to
/// `visited` and is never pending again.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    /// Pending URLs in discovery order
    pending: Vec<String>,
    /// Inbound link count for each pending URL
    score: HashMap<String, u32>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier whose only pending URL is `seed`
    pub fn with_seed(seed: &str) -> Self {
        let mut frontier = Self::new();
        frontier.offer(seed);
        frontier
    }

    /// Offers a discovered URL
    ///
    /// # Returns
    ///
    /// * `AlreadySeen` - The URL was visited before; no change
    /// * `Rescored` - The URL was pending; its score was incremented
    /// * `Added` - The URL is now pending with score 1
    pub fn offer(&mut self, url: &str) -> OfferOutcome {
        if self.visited.contains(url) {
            return OfferOutcome::AlreadySeen;
        }

        if let Some(score) = self.score.get_mut(url) {
            *score += 1;
            return OfferOutcome::Rescored;
        }

        self.pending.push(url.to_string());
        self.score.insert(url.to_string(), 1);
        OfferOutcome::Added
    }

    /// Removes and returns the pending URL with the highest score
    ///
    /// Among equal scores the URL discovered first wins. The returned URL is
    /// recorded as visited before this returns. `None` means the frontier is
    /// exhausted.
    pub fn select_next(&mut self) -> Option<String> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, url) in self.pending.iter().enumerate() {
            let score = self.score.get(url).copied().unwrap_or(0);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }

        let (idx, _) = best?;
        let url = self.pending.remove(idx);
        self.score.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    /// Score of a pending URL
    pub fn score(&self, url: &str) -> Option<u32> {
        self.score.get(url).copied()
    }

    /// Returns true if the URL has been selected before
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if the URL is waiting to be selected
    pub fn is_pending(&self, url: &str) -> bool {
        self.score.contains_key(url)
    }

    /// Number of pending URLs
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of visited URLs
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending URLs with their scores, in discovery order
    pub fn pending(&self) -> impl Iterator<Item = (&str, u32)> {
        self.pending
            .iter()
            .map(|url| (url.as_str(), self.score.get(url).copied().unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_new_url() {
        let mut frontier = Frontier::new();
        assert_eq!(frontier.offer("https://a.test/"), OfferOutcome::Added);
        assert_eq!(frontier.score("https://a.test/"), Some(1));
        assert_eq!(frontier.pending_len(), 1);
    }

    #[test]
    fn test_offer_k_times_scores_k() {
        let mut frontier = Frontier::new();
        frontier.offer("u");
        for _ in 0..4 {
            assert_eq!(frontier.offer("u"), OfferOutcome::Rescored);
        }
        assert_eq!(frontier.score("u"), Some(5));
        assert_eq!(frontier.pending_len(), 1);
    }

    #[test]
    fn test_select_highest_score() {
        let mut frontier = Frontier::new();
        frontier.offer("low");
        frontier.offer("high");
        frontier.offer("high");
        frontier.offer("mid");
        frontier.offer("high");
        frontier.offer("mid");

        assert_eq!(frontier.select_next().as_deref(), Some("high"));
        assert_eq!(frontier.select_next().as_deref(), Some("mid"));
        assert_eq!(frontier.select_next().as_deref(), Some("low"));
        assert_eq!(frontier.select_next(), None);
    }

    #[test]
    fn test_ties_go_to_first_discovered() {
        let mut frontier = Frontier::new();
        frontier.offer("first");
        frontier.offer("second");
        frontier.offer("third");

        assert_eq!(frontier.select_next().as_deref(), Some("first"));
        assert_eq!(frontier.select_next().as_deref(), Some("second"));
    }

    #[test]
    fn test_selected_url_never_requeued() {
        let mut frontier = Frontier::with_seed("seed");
        assert_eq!(frontier.select_next().as_deref(), Some("seed"));
        assert!(frontier.is_visited("seed"));
        assert!(!frontier.is_pending("seed"));

        assert_eq!(frontier.offer("seed"), OfferOutcome::AlreadySeen);
        assert!(frontier.is_empty());
        assert_eq!(frontier.select_next(), None);
    }

    #[test]
    fn test_selected_score_is_maximum() {
        let mut frontier = Frontier::new();
        let offers = ["a", "b", "a", "c", "c", "c", "b", "d", "a", "c"];
        for url in offers {
            frontier.offer(url);
        }

        while !frontier.is_empty() {
            let max = frontier.pending().map(|(_, score)| score).max().unwrap();
            let best: Vec<&str> = frontier
                .pending()
                .filter(|(_, score)| *score == max)
                .map(|(url, _)| url)
                .collect();
            let expected = best[0].to_string();
            assert_eq!(frontier.select_next(), Some(expected));
        }
        assert_eq!(frontier.visited_len(), 4);
    }

    #[test]
    fn test_empty_frontier() {
        let mut frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.select_next(), None);
    }
}
