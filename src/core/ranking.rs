// ranking.rs - Deterministic ordering and rank assignment of scored profiles

use crate::core::scoring::ScoredProfile;
use std::cmp::Ordering;

/// Result order: identity desc, total score desc, feature label
/// case-insensitive asc, profile id asc.
pub fn compare_scored(a: &ScoredProfile<'_>, b: &ScoredProfile<'_>) -> Ordering {
    b.identity
        .total_cmp(&a.identity)
        .then_with(|| b.total_score.total_cmp(&a.total_score))
        .then_with(|| cmp_ignore_case(&a.profile.feature, &b.profile.feature))
        .then_with(|| a.profile.id.cmp(&b.profile.id))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Sort scored profiles and number them 1..N.
///
/// The sort is stable, so entries equal on every key keep their input order.
pub fn rank_profiles(mut scored: Vec<ScoredProfile<'_>>) -> Vec<ScoredProfile<'_>> {
    scored.sort_by(compare_scored);
    for (i, entry) in scored.iter_mut().enumerate() {
        entry.rank = Some(i + 1);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::IdentityMethod;
    use crate::data::Profile;

    fn scored(profile: &Profile, identity: f64, total_score: f64) -> ScoredProfile<'_> {
        ScoredProfile {
            profile,
            matched_alleles: 0,
            total_alleles: 0,
            identical_nucleotides: 0,
            matched_nucleotides: 0,
            profile_nucleotides: 0,
            total_score,
            identity,
            overlap: 0.0,
            method: IdentityMethod::Global,
            rank: None,
            classification: None,
        }
    }

    fn profiles() -> Vec<Profile> {
        vec![
            Profile::new("ST", 1, "beta".into(), "".into()),
            Profile::new("ST", 2, "Alpha".into(), "".into()),
            Profile::new("ST", 3, "alpha".into(), "".into()),
            Profile::new("ST", 4, "gamma".into(), "".into()),
            Profile::new("ST", 5, "delta".into(), "".into()),
            Profile::new("ST", 6, "".into(), "".into()),
        ]
    }

    fn ranked_ids(entries: Vec<ScoredProfile<'_>>) -> Vec<u64> {
        rank_profiles(entries).iter().map(|s| s.profile.id).collect()
    }

    #[test]
    fn test_identity_then_score() {
        let p = profiles();
        let entries = vec![
            scored(&p[0], 90.0, 500.0),
            scored(&p[3], 99.0, 100.0),
            scored(&p[4], 99.0, 300.0),
        ];
        let ranked = rank_profiles(entries);
        let ids: Vec<u64> = ranked.iter().map(|s| s.profile.id).collect();
        assert_eq!(ids, vec![5, 4, 1]);
        let ranks: Vec<usize> = ranked.iter().filter_map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_feature_tie_break_is_case_insensitive() {
        let p = profiles();
        let entries = vec![scored(&p[0], 95.0, 200.0), scored(&p[1], 95.0, 200.0)];
        assert_eq!(ranked_ids(entries), vec![2, 1]);

        // A byte-wise comparison would put "Beta" before "alpha"
        let upper_beta = Profile::new("ST", 7, "Beta".into(), "".into());
        let entries = vec![scored(&upper_beta, 95.0, 200.0), scored(&p[2], 95.0, 200.0)];
        assert_eq!(ranked_ids(entries), vec![3, 7]);
    }

    #[test]
    fn test_profile_id_is_final_tie_break() {
        let p = profiles();
        // "Alpha" (2) and "alpha" (3) compare equal ignoring case
        let entries = vec![scored(&p[2], 95.0, 200.0), scored(&p[1], 95.0, 200.0)];
        assert_eq!(ranked_ids(entries), vec![2, 3]);
    }

    fn build_in_order<'a>(p: &'a [Profile], order: &[usize]) -> Vec<ScoredProfile<'a>> {
        order
            .iter()
            .map(|&i| {
                let (identity, score) = match i {
                    3 => (97.5, 410.0),
                    4 => (0.0, 0.0),
                    _ => (97.5, 400.0),
                };
                scored(&p[i], identity, score)
            })
            .collect()
    }

    #[test]
    fn test_shuffled_input_gives_identical_order() {
        let p = profiles();
        let reference = ranked_ids(build_in_order(&p, &[0, 1, 2, 3, 4, 5]));
        assert_eq!(reference, vec![4, 6, 2, 3, 1, 5]);

        for order in [
            [5, 4, 3, 2, 1, 0],
            [2, 0, 4, 1, 5, 3],
            [3, 5, 1, 0, 2, 4],
        ] {
            assert_eq!(ranked_ids(build_in_order(&p, &order)), reference);
        }
    }
}
