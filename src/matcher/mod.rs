//! Match scoring and ranking.
//!
//! Scores are integers in `0..=99`. A preference mismatch on either side is a
//! hard block (score 0); otherwise the score starts at a baseline and gains
//! weight for shared interests, age proximity and matching goals.

use serde::Serialize;

use crate::models::User;

/// Weights for the scoring terms.
const BASELINE: u32 = 50;
const SHARED_INTEREST: u32 = 15;
const AGE_PROXIMITY: u32 = 10;
const SAME_GOAL: u32 = 20;

/// Largest age gap that still earns the proximity bonus.
const AGE_WINDOW: u32 = 3;

/// Scores are capped below 100.
pub const MAX_SCORE: u32 = 99;

/// A candidate with its score against the requesting user.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    #[serde(flatten)]
    pub user: User,
    pub match_score: u32,
}

/// Compatibility of `b` from `a`'s point of view.
pub fn score(a: &User, b: &User) -> u32 {
    if !a.accepts(b) || !b.accepts(a) {
        return 0;
    }

    let mut score = BASELINE;

    // Counts a's tags, so a tag repeated in a counts once per occurrence.
    let shared = a
        .interests
        .iter()
        .filter(|tag| b.interests.contains(tag))
        .count() as u32;
    score = score.saturating_add(shared.saturating_mul(SHARED_INTEREST));

    if a.age.abs_diff(b.age) <= AGE_WINDOW {
        score = score.saturating_add(AGE_PROXIMITY);
    }

    if a.looking_for == b.looking_for {
        score = score.saturating_add(SAME_GOAL);
    }

    score.min(MAX_SCORE)
}

/// Score every other user in `pool` against `user`, best first.
///
/// The sort is stable, so equal scores keep their pool order. Blocked
/// candidates (score 0) are kept and end up last.
pub fn rank_matches(user: &User, pool: &[User]) -> Vec<ScoredMatch> {
    let mut ranked: Vec<ScoredMatch> = pool
        .iter()
        .filter(|candidate| candidate.id != user.id)
        .map(|candidate| ScoredMatch {
            match_score: score(user, candidate),
            user: candidate.clone(),
        })
        .collect();

    ranked.sort_by(|x, y| y.match_score.cmp(&x.match_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, gender: &str, interested_in: &str, age: u32, looking_for: &str, interests: &[&str]) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
            age,
            bio: String::new(),
            gender: gender.to_string(),
            interested_in: interested_in.to_string(),
            looking_for: looking_for.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            img: None,
            social_qr: Some("/uploads/qr.png".to_string()),
            registered_at: String::new(),
        }
    }

    #[test]
    fn test_worked_example_scores_95() {
        let a = user(1, "Male", "Everyone", 25, "Dating", &["music", "hiking"]);
        let b = user(2, "Female", "Everyone", 26, "Dating", &["music", "art"]);

        assert_eq!(score(&a, &b), 95);
        assert_eq!(score(&b, &a), 95);
    }

    #[test]
    fn test_preference_mismatch_blocks_both_directions() {
        // a only wants women, b is a man.
        let a = user(1, "Female", "Female", 30, "Dating", &["music"]);
        let b = user(2, "Male", "Everyone", 30, "Dating", &["music"]);

        assert_eq!(score(&a, &b), 0);
        assert_eq!(score(&b, &a), 0);
    }

    #[test]
    fn test_preference_match_passes_filter() {
        let a = user(1, "Female", "Male", 30, "Friends", &[]);
        let b = user(2, "Male", "Female", 40, "Dating", &[]);

        assert_eq!(score(&a, &b), BASELINE);
    }

    #[test]
    fn test_blank_fields_use_defaults_in_filter() {
        // Blank gender reads as "Secret", which a "Male" preference rejects.
        let a = user(1, "Female", "Male", 30, "Dating", &[]);
        let b = user(2, "", "", 30, "Dating", &[]);
        assert_eq!(score(&a, &b), 0);

        // A "Secret" preference admits a blank gender.
        let c = user(3, "Female", "Secret", 30, "Dating", &[]);
        assert_eq!(score(&c, &b), BASELINE + AGE_PROXIMITY + SAME_GOAL);
    }

    #[test]
    fn test_score_capped_at_99() {
        let tags = ["a", "b", "c", "d", "e"];
        let a = user(1, "Male", "Everyone", 25, "Dating", &tags);
        let b = user(2, "Male", "Everyone", 25, "Dating", &tags);

        assert_eq!(score(&a, &b), MAX_SCORE);
    }

    #[test]
    fn test_score_always_in_range() {
        let genders = ["Male", "Female", "Secret", ""];
        let prefs = ["Everyone", "Male", "Female", ""];
        let tag_sets: [&[&str]; 3] = [&[], &["x"], &["x", "y", "z", "w", "v", "u", "t"]];

        let mut users = Vec::new();
        let mut id = 0;
        for g in genders {
            for p in prefs {
                for tags in tag_sets {
                    for age in [18, 21, 60] {
                        id += 1;
                        users.push(user(id, g, p, age, if id % 2 == 0 { "Dating" } else { "Friends" }, tags));
                    }
                }
            }
        }

        for a in &users {
            for b in &users {
                assert!(score(a, b) <= MAX_SCORE);
            }
        }
    }

    #[test]
    fn test_age_window_boundary() {
        let a = user(1, "Male", "Everyone", 25, "X", &[]);
        let within = user(2, "Male", "Everyone", 28, "Y", &[]);
        let outside = user(3, "Male", "Everyone", 29, "Y", &[]);

        assert_eq!(score(&a, &within), BASELINE + AGE_PROXIMITY);
        assert_eq!(score(&a, &outside), BASELINE);
    }

    #[test]
    fn test_repeated_tags_make_score_direction_dependent() {
        let a = user(1, "Male", "Everyone", 50, "X", &["music", "music"]);
        let b = user(2, "Male", "Everyone", 20, "Y", &["music"]);

        assert_eq!(score(&a, &b), BASELINE + 2 * SHARED_INTEREST);
        assert_eq!(score(&b, &a), BASELINE + SHARED_INTEREST);
    }

    #[test]
    fn test_rank_matches_sorted_and_complete() {
        let me = user(1, "Male", "Everyone", 25, "Dating", &["music"]);
        let pool = vec![
            user(2, "Female", "Female", 25, "Dating", &["music"]), // blocked
            user(3, "Female", "Everyone", 40, "Friends", &[]),     // 50
            user(4, "Female", "Everyone", 25, "Dating", &["music"]), // 95
            user(5, "Female", "Everyone", 26, "Dating", &[]),      // 80
        ];

        let ranked = rank_matches(&me, &pool);
        assert_eq!(ranked.len(), pool.len());

        let ids: Vec<_> = ranked.iter().map(|m| m.user.id).collect();
        assert_eq!(ids, vec![4, 5, 3, 2]);
        assert!(ranked.windows(2).all(|w| w[0].match_score >= w[1].match_score));
        assert_eq!(ranked.last().map(|m| m.match_score), Some(0));
    }

    #[test]
    fn test_rank_matches_stable_on_ties() {
        let me = user(1, "Male", "Everyone", 25, "Dating", &[]);
        let pool: Vec<_> = (10..20)
            .map(|id| user(id, "Female", "Everyone", 60, "Other", &[]))
            .collect();

        let ids: Vec<_> = rank_matches(&me, &pool).iter().map(|m| m.user.id).collect();
        assert_eq!(ids, (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_rank_matches_skips_self() {
        let me = user(1, "Male", "Everyone", 25, "Dating", &[]);
        let pool = vec![me.clone(), user(2, "Female", "Everyone", 25, "Dating", &[])];

        let ranked = rank_matches(&me, &pool);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].user.id, 2);
    }

    #[test]
    fn test_scored_match_serializes_flat() {
        let me = user(1, "Male", "Everyone", 25, "Dating", &[]);
        let other = user(2, "Female", "Everyone", 25, "Dating", &[]);
        let value = serde_json::to_value(&rank_matches(&me, &[other])[0]).unwrap();

        assert_eq!(value["id"], 2);
        assert_eq!(value["matchScore"], 80);
        assert_eq!(value["interestedIn"], "Everyone");
    }
}
