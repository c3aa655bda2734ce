//! Cross-user training ranking.
//!
//! The repositories aggregate per-user totals; this module applies the
//! inclusion rules, ordering, and pagination.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Aggregated training record for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTraining {
    pub user_id: DbId,
    /// Sum of all video durations, in seconds.
    pub total_duration: i64,
    /// Mean of `average_score` over every analysis of the user's videos;
    /// `0.0` when the user has no scored analyses.
    pub average_score: f64,
    pub video_count: i64,
    pub last_activity: Option<Timestamp>,
}

/// Order users for the ranking board.
///
/// Users with neither accumulated duration nor any score are dropped;
/// the rest sort descending by total duration. Score is intentionally
/// not a sort key.
pub fn rank(mut entries: Vec<UserTraining>) -> Vec<UserTraining> {
    entries.retain(|e| e.total_duration > 0 || e.average_score > 0.0);
    entries.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));
    entries
}

/// Take one page out of a ranked list. Pages are 1-based.
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(user_id: DbId, total_duration: i64, average_score: f64) -> UserTraining {
        UserTraining {
            user_id,
            total_duration,
            average_score,
            video_count: 1,
            last_activity: None,
        }
    }

    #[test]
    fn drops_users_with_no_duration_and_no_score() {
        let ranked = rank(vec![user(1, 0, 0.0), user(2, 10, 0.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].user_id, 2);
    }

    #[test]
    fn keeps_zero_duration_user_with_score() {
        let ranked = rank(vec![user(1, 0, 42.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].user_id, 1);
    }

    #[test]
    fn sorts_by_duration_descending_only() {
        // User 3 has the best score but the least duration; duration wins.
        let ranked = rank(vec![user(1, 50, 60.0), user(2, 200, 10.0), user(3, 5, 99.0)]);
        let order: Vec<DbId> = ranked.iter().map(|e| e.user_id).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn paginates_one_based() {
        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(page_slice(&items, 1, 2), vec![1, 2]);
        assert_eq!(page_slice(&items, 2, 2), vec![3, 4]);
        assert_eq!(page_slice(&items, 3, 2), vec![5]);
        assert_eq!(page_slice(&items, 4, 2), Vec::<i32>::new());
        // Page 0 is clamped to page 1.
        assert_eq!(page_slice(&items, 0, 2), vec![1, 2]);
    }
}
