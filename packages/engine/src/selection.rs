//! Question Selection
//!
//! Picks a concrete item from a pool given a target difficulty and a
//! selection strategy. Items already in the session history are removed
//! first; when nothing is left the selector reports exhaustion instead of
//! resetting the history itself.
//!
//! - targeted: items within 0.5 of the target; the most discriminating one
//!   wins, falling back to a uniform pick over the pool
//! - challenge: items in `(t, t + 1]`, uniform; falls back to the hardest item
//! - review: items in `[t - 1, t)`, uniform; falls back to the easiest item
//! - random: items within 1.0 of the target, uniform; falls back to the pool

use std::collections::HashSet;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::SelectionParams;
use crate::types::{Item, SelectionStrategy};

/// Random source for one session's picks; time-seeded when `seed` is unset.
pub fn selection_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });
    ChaCha8Rng::seed_from_u64(seed)
}

/// Holds only its windows; randomness comes from the caller so one selector
/// can serve any number of sessions concurrently.
pub struct QuestionSelector {
    params: SelectionParams,
}

impl QuestionSelector {
    pub fn new(params: SelectionParams) -> Self {
        Self { params }
    }

    /// Returns the chosen item, or `None` when every pool item is already in `history`.
    pub fn select<'a, S: AsRef<str>, R: Rng>(
        &self,
        rng: &mut R,
        pool: &'a [Item],
        target_difficulty: f64,
        strategy: SelectionStrategy,
        history: &[S],
    ) -> Option<&'a Item> {
        let answered: HashSet<&str> = history.iter().map(|id| id.as_ref()).collect();
        let unanswered: Vec<&'a Item> = pool
            .iter()
            .filter(|item| !answered.contains(item.id.as_str()))
            .collect();

        if unanswered.is_empty() {
            tracing::warn!(
                pool_size = pool.len(),
                strategy = %strategy,
                "question pool exhausted"
            );
            return None;
        }

        let selected = match strategy {
            SelectionStrategy::Targeted => {
                self.select_targeted(rng, &unanswered, target_difficulty)
            }
            SelectionStrategy::Challenge => {
                self.select_challenge(rng, &unanswered, target_difficulty)
            }
            SelectionStrategy::Review => self.select_review(rng, &unanswered, target_difficulty),
            SelectionStrategy::Random => self.select_random(rng, &unanswered, target_difficulty),
        };

        tracing::debug!(
            item_id = %selected.id,
            difficulty = selected.difficulty,
            target_difficulty,
            strategy = %strategy,
            "question selected"
        );

        Some(selected)
    }

    fn select_targeted<'a, R: Rng>(
        &self,
        rng: &mut R,
        items: &[&'a Item],
        target: f64,
    ) -> &'a Item {
        let window = self.params.targeted_window;
        let candidates: Vec<&'a Item> = items
            .iter()
            .copied()
            .filter(|item| (item.difficulty - target).abs() <= window)
            .collect();

        if candidates.is_empty() {
            tracing::debug!(target, "no targeted candidates, falling back to whole pool");
            return pick(rng, items);
        }

        // first encountered wins ties
        candidates
            .iter()
            .copied()
            .fold(candidates[0], |best, item| {
                if item.discrimination_index > best.discrimination_index {
                    item
                } else {
                    best
                }
            })
    }

    fn select_challenge<'a, R: Rng>(
        &self,
        rng: &mut R,
        items: &[&'a Item],
        target: f64,
    ) -> &'a Item {
        let upper = target + self.params.band_width;
        let candidates: Vec<&'a Item> = items
            .iter()
            .copied()
            .filter(|item| item.difficulty > target && item.difficulty <= upper)
            .collect();

        if candidates.is_empty() {
            tracing::debug!(target, "no challenge candidates, falling back to hardest item");
            return extreme(items, |candidate, best| candidate > best);
        }

        pick(rng, &candidates)
    }

    fn select_review<'a, R: Rng>(
        &self,
        rng: &mut R,
        items: &[&'a Item],
        target: f64,
    ) -> &'a Item {
        let lower = target - self.params.band_width;
        let candidates: Vec<&'a Item> = items
            .iter()
            .copied()
            .filter(|item| item.difficulty < target && item.difficulty >= lower)
            .collect();

        if candidates.is_empty() {
            tracing::debug!(target, "no review candidates, falling back to easiest item");
            return extreme(items, |candidate, best| candidate < best);
        }

        pick(rng, &candidates)
    }

    fn select_random<'a, R: Rng>(
        &self,
        rng: &mut R,
        items: &[&'a Item],
        target: f64,
    ) -> &'a Item {
        let window = self.params.random_window;
        let candidates: Vec<&'a Item> = items
            .iter()
            .copied()
            .filter(|item| (item.difficulty - target).abs() <= window)
            .collect();

        if candidates.is_empty() {
            return pick(rng, items);
        }

        pick(rng, &candidates)
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new(SelectionParams::default())
    }
}

/// Uniform pick; callers guarantee `items` is non-empty.
fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a Item]) -> &'a Item {
    items[rng.gen_range(0..items.len())]
}

/// First item whose difficulty beats every earlier one under `better`.
fn extreme<'a>(items: &[&'a Item], better: impl Fn(f64, f64) -> bool) -> &'a Item {
    items[1..].iter().copied().fold(items[0], |best, item| {
        if better(item.difficulty, best.difficulty) {
            item
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(difficulties: &[f64]) -> Vec<Item> {
        difficulties
            .iter()
            .enumerate()
            .map(|(i, &d)| Item::new(format!("q{}", i), d))
            .collect()
    }

    const NO_HISTORY: &[&str] = &[];

    #[test]
    fn test_challenge_draws_from_band_only() {
        let items = pool(&[2.0, 3.0, 3.5, 4.2, 4.8]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(7));

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let item = selector
                .select(&mut rng, &items, 3.0, SelectionStrategy::Challenge, NO_HISTORY)
                .unwrap();
            seen.insert(item.id.clone());
        }

        // 4.2 lies outside (3, 4]
        let expected: HashSet<String> = ["q2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_challenge_covers_whole_band() {
        let items = pool(&[3.0, 3.2, 3.6, 4.0, 4.2]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(13));

        let mut seen = HashSet::new();
        for _ in 0..300 {
            let item = selector
                .select(&mut rng, &items, 3.0, SelectionStrategy::Challenge, NO_HISTORY)
                .unwrap();
            seen.insert(item.id.clone());
        }

        let expected: HashSet<String> = ["q1", "q2", "q3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_challenge_falls_back_to_hardest() {
        let items = pool(&[1.0, 2.0, 1.5]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(1));
        let item = selector
            .select(&mut rng, &items, 4.0, SelectionStrategy::Challenge, NO_HISTORY)
            .unwrap();
        assert_eq!(item.id, "q1");
    }

    #[test]
    fn test_review_draws_below_target() {
        let items = pool(&[1.5, 2.0, 2.5, 3.0, 4.0]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(3));

        for _ in 0..100 {
            let item = selector
                .select(&mut rng, &items, 3.0, SelectionStrategy::Review, NO_HISTORY)
                .unwrap();
            assert!(item.difficulty >= 2.0 && item.difficulty < 3.0, "{}", item.difficulty);
        }
    }

    #[test]
    fn test_review_falls_back_to_easiest() {
        let items = pool(&[4.0, 3.5, 4.5]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(1));
        let item = selector
            .select(&mut rng, &items, 2.0, SelectionStrategy::Review, NO_HISTORY)
            .unwrap();
        assert_eq!(item.id, "q1");
    }

    #[test]
    fn test_targeted_prefers_discrimination() {
        let items = vec![
            Item::new("a", 3.0).with_discrimination(0.4),
            Item::new("b", 3.4).with_discrimination(0.9),
            Item::new("c", 2.6).with_discrimination(0.9),
            Item::new("d", 4.5).with_discrimination(1.0),
        ];
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(1));

        let item = selector
            .select(&mut rng, &items, 3.0, SelectionStrategy::Targeted, NO_HISTORY)
            .unwrap();
        assert_eq!(item.id, "b");
    }

    #[test]
    fn test_targeted_without_candidates_uses_whole_pool() {
        let items = pool(&[1.0, 5.0]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(11));
        let item = selector
            .select(&mut rng, &items, 3.0, SelectionStrategy::Targeted, NO_HISTORY)
            .unwrap();
        assert!(item.id == "q0" || item.id == "q1");
    }

    #[test]
    fn test_random_stays_within_window() {
        let items = pool(&[1.0, 2.5, 3.0, 3.9, 5.0]);
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(5));
        for _ in 0..100 {
            let item = selector
                .select(&mut rng, &items, 3.0, SelectionStrategy::Random, NO_HISTORY)
                .unwrap();
            assert!((item.difficulty - 3.0).abs() <= 1.0);
        }
    }

    #[test]
    fn test_history_is_excluded() {
        let items = pool(&[3.0, 3.1, 3.2]);
        let history = vec!["q0".to_string(), "q2".to_string()];
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(9));

        for strategy in [
            SelectionStrategy::Random,
            SelectionStrategy::Targeted,
            SelectionStrategy::Review,
            SelectionStrategy::Challenge,
        ] {
            let item = selector.select(&mut rng, &items, 3.0, strategy, &history).unwrap();
            assert_eq!(item.id, "q1");
        }
    }

    #[test]
    fn test_exhausted_pool_returns_none() {
        let items = pool(&[3.0, 4.0]);
        let history = ["q0", "q1"];
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(2));
        assert!(selector
            .select(&mut rng, &items, 3.0, SelectionStrategy::Targeted, &history)
            .is_none());
        assert!(selector
            .select(&mut rng, &[], 3.0, SelectionStrategy::Random, NO_HISTORY)
            .is_none());
    }

    #[test]
    fn test_same_seed_same_choice() {
        let items = pool(&[2.5, 2.8, 3.0, 3.3, 3.6]);
        let selector = QuestionSelector::default();
        let mut a = selection_rng(Some(99));
        let mut b = selection_rng(Some(99));
        for _ in 0..20 {
            let x = selector.select(&mut a, &items, 3.0, SelectionStrategy::Random, NO_HISTORY);
            let y = selector.select(&mut b, &items, 3.0, SelectionStrategy::Random, NO_HISTORY);
            assert_eq!(x.map(|i| &i.id), y.map(|i| &i.id));
        }
    }

    #[test]
    fn test_picks_depend_only_on_callers_rng() {
        let items = pool(&[3.0; 8]);
        let selector = QuestionSelector::default();

        let mut alone = selection_rng(Some(4));
        let expected = selector
            .select(&mut alone, &items, 3.0, SelectionStrategy::Random, NO_HISTORY)
            .map(|i| i.id.clone());

        // another session drawing first from the same selector changes nothing
        let mut other = selection_rng(Some(4));
        let mut learner = selection_rng(Some(4));
        for _ in 0..3 {
            selector.select(&mut other, &items, 3.0, SelectionStrategy::Random, NO_HISTORY);
        }
        let actual = selector
            .select(&mut learner, &items, 3.0, SelectionStrategy::Random, NO_HISTORY)
            .map(|i| i.id.clone());

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_selector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QuestionSelector>();
    }
}
