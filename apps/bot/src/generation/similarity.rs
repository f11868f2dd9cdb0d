//! Near-duplicate detection for generated questions.
//!
//! A candidate is a near-duplicate of a prior question when, after lower-casing
//! and trimming both, they are equal or their token-set ratio is at least
//! `SIMILARITY_THRESHOLD`.
//!
//! The token-set ratio is order-independent: both strings are split on
//! whitespace into token sets, and the shared tokens are compared against each
//! side's leftovers using a normalized indel (insert/delete) similarity on the
//! sorted, space-joined token lists. If one token set contains the other the
//! score is 100.

use std::collections::BTreeSet;

use tracing::warn;

/// Scores at or above this (0 – 100) count as near-duplicates.
pub const SIMILARITY_THRESHOLD: f64 = 85.0;

/// The prior question a candidate collided with, and how closely.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    pub prior: String,
    pub score: f64,
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns the first prior question the candidate duplicates, if any.
/// Stops scanning at the first hit.
pub fn find_near_duplicate(prior_questions: &[String], candidate: &str) -> Option<DuplicateMatch> {
    let candidate_norm = normalize(candidate);

    for prior in prior_questions {
        let prior_norm = normalize(prior);

        let score = if candidate_norm == prior_norm {
            100.0
        } else {
            token_set_ratio(&candidate_norm, &prior_norm)
        };

        if score >= SIMILARITY_THRESHOLD {
            warn!("Similar question detected ({score:.1}%): {candidate:?} ~ {prior:?}");
            return Some(DuplicateMatch {
                prior: prior.clone(),
                score,
            });
        }
    }

    None
}

pub fn is_duplicate(prior_questions: &[String], candidate: &str) -> bool {
    find_near_duplicate(prior_questions, candidate).is_some()
}

/// Order-independent similarity in 0 – 100. Either side having no tokens scores 0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // one token set contains the other
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    // BTreeSet iteration is sorted, so the joins are canonical.
    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");

    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();
    let sect_len = intersection.join(" ").chars().count();

    let separator = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    // "sect ab" vs "sect ba" differ only in their tails
    let tails_distance = indel_distance(&diff_ab_joined, &diff_ba_joined);
    let result = normalized_similarity(tails_distance, sect_ab_len + sect_ba_len);

    if sect_len == 0 {
        return result;
    }

    // "sect" vs "sect ab": the distance is exactly the appended tail
    let sect_ab_ratio = normalized_similarity(separator + ab_len, sect_len + sect_ab_len);
    let sect_ba_ratio = normalized_similarity(separator + ba_len, sect_len + sect_ba_len);

    result.max(sect_ab_ratio).max(sect_ba_ratio)
}

fn normalized_similarity(distance: usize, length_sum: usize) -> f64 {
    if length_sum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * distance as f64 / length_sum as f64
}

/// Insertions plus deletions needed to turn `a` into `b` (no substitutions).
fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * longest_common_subsequence(&a, &b)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
