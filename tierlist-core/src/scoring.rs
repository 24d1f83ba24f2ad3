//! Vote scoring for item rank display.
//!
//! A tier row's score is its distance from the median row: with five rows
//! the middle row scores 0, the top row +2, the bottom row -2. An item's
//! score is the mean over every vote that placed it, and the two ranks
//! derived from that mean are:
//!
//! - absolute: the row whose score is closest to the item's mean
//! - relative: the item's position within the min/max score spread of the
//!   list, so the best-rated item always lands in the top row

use std::collections::HashMap;
use uuid::Uuid;

/// One vote placement: a voter put `item_id` into `tier_id`.
#[derive(Debug, Clone, Copy)]
pub struct VotePlacement {
    pub item_id: Uuid,
    pub tier_id: Uuid,
}

/// Computed ranks for a single item, as tier row indexes (0 = top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRank {
    pub absolute: usize,
    pub relative: usize,
}

/// Score each tier row by its distance from the median row.
///
/// `tiers` must be in display order, top row first.
pub fn tier_scores(tiers: &[Uuid]) -> HashMap<Uuid, f64> {
    let median = median_index(tiers.len());
    tiers
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, median - idx as f64))
        .collect()
}

/// Mean score per item over all vote placements.
///
/// Placements referencing unknown tiers count as score 0, matching how the
/// page treated rows deleted after votes were cast.
pub fn item_averages(tiers: &[Uuid], placements: &[VotePlacement]) -> HashMap<Uuid, f64> {
    let scores = tier_scores(tiers);

    let mut totals: HashMap<Uuid, (f64, u32)> = HashMap::new();
    for p in placements {
        let score = scores.get(&p.tier_id).copied().unwrap_or(0.0);
        let entry = totals.entry(p.item_id).or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(item, (total, count))| (item, total / count as f64))
        .collect()
}

/// Rank one item against every other item voted on in the same list.
///
/// Returns `None` when the list has no rows, no votes at all, or no votes
/// for the target item.
pub fn rank_item(
    target: Uuid,
    tiers: &[Uuid],
    placements: &[VotePlacement],
) -> Option<ItemRank> {
    if tiers.is_empty() || placements.is_empty() {
        return None;
    }

    let averages = item_averages(tiers, placements);
    let target_avg = *averages.get(&target)?;

    let num_tiers = tiers.len();
    let median = median_index(num_tiers);

    // score = median - index, so index = median - score
    let absolute = (median - target_avg).round().clamp(0.0, (num_tiers - 1) as f64) as usize;

    let mut min_avg = f64::INFINITY;
    let mut max_avg = f64::NEG_INFINITY;
    for avg in averages.values() {
        min_avg = min_avg.min(*avg);
        max_avg = max_avg.max(*avg);
    }

    let range = max_avg - min_avg;
    let relative = if range == 0.0 {
        0
    } else {
        let normalized = (target_avg - min_avg) / range;
        let raw = ((1.0 - normalized) * num_tiers as f64).floor() as isize;
        raw.clamp(0, num_tiers as isize - 1) as usize
    };

    Some(ItemRank { absolute, relative })
}

fn median_index(num_tiers: usize) -> f64 {
    (num_tiers.saturating_sub(1)) as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn place(item: Uuid, tier: Uuid) -> VotePlacement {
        VotePlacement {
            item_id: item,
            tier_id: tier,
        }
    }

    #[test]
    fn tier_scores_center_on_median() {
        let tiers = ids(5);
        let scores = tier_scores(&tiers);
        assert_eq!(scores[&tiers[0]], 2.0);
        assert_eq!(scores[&tiers[2]], 0.0);
        assert_eq!(scores[&tiers[4]], -2.0);
    }

    #[test]
    fn even_row_count_splits_the_median() {
        let tiers = ids(4);
        let scores = tier_scores(&tiers);
        assert_eq!(scores[&tiers[0]], 1.5);
        assert_eq!(scores[&tiers[3]], -1.5);
    }

    #[test]
    fn unanimous_top_votes_rank_top() {
        let tiers = ids(5);
        let item = Uuid::new_v4();
        let placements = vec![place(item, tiers[0]), place(item, tiers[0])];

        let rank = rank_item(item, &tiers, &placements).unwrap();
        assert_eq!(rank.absolute, 0);
        // Sole item: zero spread, relative defaults to the top row
        assert_eq!(rank.relative, 0);
    }

    #[test]
    fn split_votes_average_out() {
        let tiers = ids(5);
        let item = Uuid::new_v4();
        // One vote top row (+2), one vote bottom row (-2): average 0 = middle
        let placements = vec![place(item, tiers[0]), place(item, tiers[4])];

        let rank = rank_item(item, &tiers, &placements).unwrap();
        assert_eq!(rank.absolute, 2);
    }

    #[test]
    fn relative_rank_spreads_items_across_rows() {
        let tiers = ids(5);
        let best = Uuid::new_v4();
        let worst = Uuid::new_v4();
        let placements = vec![place(best, tiers[1]), place(worst, tiers[3])];

        let best_rank = rank_item(best, &tiers, &placements).unwrap();
        let worst_rank = rank_item(worst, &tiers, &placements).unwrap();
        assert_eq!(best_rank.relative, 0);
        assert_eq!(worst_rank.relative, 4);
    }

    #[test]
    fn no_votes_means_no_rank() {
        let tiers = ids(5);
        assert!(rank_item(Uuid::new_v4(), &tiers, &[]).is_none());
    }

    #[test]
    fn votes_for_other_items_only_means_no_rank() {
        let tiers = ids(5);
        let other = Uuid::new_v4();
        let placements = vec![place(other, tiers[0])];
        assert!(rank_item(Uuid::new_v4(), &tiers, &placements).is_none());
    }

    #[test]
    fn deleted_tier_counts_as_median() {
        let tiers = ids(5);
        let item = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let placements = vec![place(item, gone)];

        let rank = rank_item(item, &tiers, &placements).unwrap();
        assert_eq!(rank.absolute, 2);
    }
}
