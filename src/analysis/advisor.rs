//! Suggestion ranking: turns the raw n-gram records into a short,
//! non-redundant list of segmentation candidates.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use super::distribution::Distributions;
use super::ngram::{NgramKey, NgramRecord};
use crate::corpus::Corpus;

/// A ranked segmentation candidate.
///
/// `coverage_ratio` is `coverage_count / corpus size`; `specificity`
/// is the n-gram length in segments. Suggestions are read-only once
/// ranked.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    /// Human-readable rendering, e.g. `/shop/shoes/*`.
    pub pattern_description: String,
    pub ngram: NgramKey,
    pub coverage_count: usize,
    pub coverage_ratio: f64,
    pub specificity: usize,
}

impl Suggestion {
    /// Ranking score: broad, short patterns beat narrow, long ones.
    pub fn score(&self) -> f64 {
        self.coverage_ratio / self.specificity as f64
    }
}

/// Minimum coverage a record needs to survive filtering: 2, or 0.1% of
/// the corpus, whichever is larger (unless the caller overrides it).
pub fn effective_min_support(corpus_size: usize, override_support: Option<usize>) -> usize {
    match override_support {
        Some(support) => support,
        None => 2usize.max(corpus_size / 1000),
    }
}

/// Selects and ranks the top suggestions from the n-gram records.
///
/// Filtering first drops records under the support threshold. Records
/// matching exactly the same URL set and related by window containment
/// are redundant with each other; each such family keeps a single
/// representative (see [`collapse_redundant`]). Survivors are ordered
/// by score, then coverage count, then lexicographic key, and the
/// first `top_n` become suggestions.
///
/// The ranking is computed independently of `top_n`, so a larger
/// `top_n` only ever extends the returned list.
pub fn suggest(
    records: &HashMap<NgramKey, NgramRecord>,
    corpus: &Corpus,
    distributions: &Distributions,
    min_support: Option<usize>,
    top_n: usize,
) -> Vec<Suggestion> {
    if corpus.is_empty() {
        info!("Corpus is empty, no suggestions to rank");
        return Vec::new();
    }

    let support = effective_min_support(corpus.len(), min_support);
    let total = corpus.len() as f64;

    let supported: Vec<&NgramRecord> = records
        .values()
        .filter(|r| r.coverage_count() >= support)
        .collect();
    debug!(
        "{} of {} records meet min support {}",
        supported.len(),
        records.len(),
        support
    );

    let mut survivors = collapse_redundant(supported);

    // score desc, coverage desc, key asc. Score ties resolve to a fixed
    // order so reruns are bit-identical.
    survivors.sort_by(|a, b| {
        let score_a = a.coverage_count() as f64 / total / a.key.len() as f64;
        let score_b = b.coverage_count() as f64 / total / b.key.len() as f64;
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.coverage_count().cmp(&a.coverage_count()))
            .then_with(|| a.key.cmp(&b.key))
    });

    // Segments seen anywhere past position 0; a pattern whose first
    // segment never floats can be rendered anchored to the path root.
    let floating_segments: HashSet<&String> = distributions
        .position_values
        .keys()
        .filter(|(position, _)| *position > 0)
        .map(|(_, value)| value)
        .collect();

    survivors
        .into_iter()
        .take(top_n)
        .map(|record| {
            let continues = record
                .matching_url_indices
                .iter()
                .any(|&i| record.key.continues_in(&corpus.entries[i]));
            let anchored = record
                .key
                .segments()
                .first()
                .map(|s| !floating_segments.contains(s))
                .unwrap_or(false);
            Suggestion {
                pattern_description: describe(&record.key, anchored, continues),
                ngram: record.key.clone(),
                coverage_count: record.coverage_count(),
                coverage_ratio: record.coverage_count() as f64 / total,
                specificity: record.key.len(),
            }
        })
        .collect()
}

/// Drops records made redundant by another record with the identical
/// matching-URL set.
///
/// When a window extension matches exactly the same URLs as a shorter
/// key inside it, the extra segments are stable literals every covered
/// URL shares, so the family collapses to its most specific member:
/// it names those literals without losing a single match (for
/// `/shop/shoes/red` and `/shop/shoes/blue`, the family `shop`,
/// `shoes`, `shop/shoes` yields `shop/shoes`). Keys with the same
/// coverage but no window relationship are kept separately.
fn collapse_redundant(records: Vec<&NgramRecord>) -> Vec<&NgramRecord> {
    let mut families: HashMap<&BTreeSet<usize>, Vec<&NgramRecord>> = HashMap::new();
    for record in records {
        families
            .entry(&record.matching_url_indices)
            .or_default()
            .push(record);
    }

    let mut survivors = Vec::new();
    for family in families.into_values() {
        for record in &family {
            let subsumed = family.iter().any(|other| {
                record.key.len() < other.key.len() && record.key.is_window_of(&other.key)
            });
            if subsumed {
                debug!("Pruned {} (redundant with a more specific key)", record.key);
            } else {
                survivors.push(*record);
            }
        }
    }
    survivors
}

/// Renders an n-gram as a slash-joined path fragment. Patterns whose
/// first segment only ever appears at the path root are anchored with
/// a leading `/`; others float behind a leading `*`. A trailing `/*`
/// marks variable continuation.
fn describe(key: &NgramKey, anchored: bool, continues: bool) -> String {
    let joined = key.segments().join("/");
    let mut description = if anchored {
        format!("/{}", joined)
    } else {
        format!("*/{}", joined)
    };
    if continues {
        description.push_str("/*");
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ngram::build_ngrams;

    fn rank(urls: &[&str], max_len: usize, top_n: usize) -> Vec<Suggestion> {
        let corpus = Corpus::build(urls);
        let records = build_ngrams(&corpus, max_len);
        let distributions = Distributions::compute(&corpus);
        suggest(&records, &corpus, &distributions, None, top_n)
    }

    #[test]
    fn test_top_suggestion_names_stable_literals() {
        let suggestions = rank(
            &[
                "https://example.com/shop/shoes/red",
                "https://example.com/shop/shoes/blue",
                "https://example.com/about",
            ],
            2,
            20,
        );
        let top = &suggestions[0];
        assert_eq!(top.pattern_description, "/shop/shoes/*");
        assert_eq!(top.coverage_count, 2);
        assert!((top.coverage_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(top.specificity, 2);
    }

    #[test]
    fn test_min_support_filters_singletons() {
        let suggestions = rank(
            &[
                "https://example.com/shop/a",
                "https://example.com/shop/b",
                "https://example.com/one-off",
            ],
            2,
            20,
        );
        assert!(suggestions.iter().all(|s| s.coverage_count >= 2));
        assert!(suggestions
            .iter()
            .all(|s| s.ngram != NgramKey::new(["one-off"])));
    }

    #[test]
    fn test_identical_coverage_family_collapses() {
        // (shop), (shoes) and (shop, shoes) all match the same two
        // URLs; only the most specific representative survives.
        let suggestions = rank(
            &[
                "https://example.com/shop/shoes/red",
                "https://example.com/shop/shoes/blue",
            ],
            2,
            20,
        );
        let keys: Vec<&NgramKey> = suggestions.iter().map(|s| &s.ngram).collect();
        assert_eq!(keys, vec![&NgramKey::new(["shop", "shoes"])]);
    }

    #[test]
    fn test_extension_with_different_coverage_survives() {
        let suggestions = rank(
            &[
                "https://example.com/shop/shoes/red",
                "https://example.com/shop/shoes/blue",
                "https://example.com/shop/hats/straw",
                "https://example.com/shop/hats/felt",
            ],
            2,
            20,
        );
        let keys: Vec<&NgramKey> = suggestions.iter().map(|s| &s.ngram).collect();
        // (shop) covers all four URLs, (shop, shoes) only two: both
        // carry information, neither is pruned.
        assert!(keys.contains(&&NgramKey::new(["shop"])));
        assert!(keys.contains(&&NgramKey::new(["shop", "shoes"])));
        assert!(keys.contains(&&NgramKey::new(["shop", "hats"])));
    }

    #[test]
    fn test_broad_pattern_outranks_narrow_one() {
        let suggestions = rank(
            &[
                "https://example.com/shop/shoes/red",
                "https://example.com/shop/shoes/blue",
                "https://example.com/shop/hats/straw",
                "https://example.com/shop/hats/felt",
            ],
            2,
            20,
        );
        assert_eq!(suggestions[0].ngram, NgramKey::new(["shop"]));
    }

    #[test]
    fn test_top_n_is_stable_prefix() {
        let urls = [
            "https://example.com/shop/shoes/red",
            "https://example.com/shop/shoes/blue",
            "https://example.com/shop/hats/straw",
            "https://example.com/shop/hats/felt",
            "https://example.com/blog/post-1",
            "https://example.com/blog/post-2",
        ];
        let small = rank(&urls, 3, 2);
        let large = rank(&urls, 3, 10);
        assert!(small.len() <= large.len());
        for (a, b) in small.iter().zip(large.iter()) {
            assert_eq!(a.ngram, b.ngram);
        }
    }

    #[test]
    fn test_empty_corpus_yields_no_suggestions() {
        let suggestions = rank(&["not a url"], 3, 20);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_floating_pattern_keeps_leading_wildcard() {
        // "shoes" appears at position 1 in one URL and position 0 in
        // the other, so the unigram cannot be anchored to the path root.
        let suggestions = rank(
            &[
                "https://example.com/shop/shoes/red",
                "https://example.com/shoes/blue",
            ],
            1,
            20,
        );
        let shoes = suggestions
            .iter()
            .find(|s| s.ngram == NgramKey::new(["shoes"]))
            .unwrap();
        assert!(shoes.pattern_description.starts_with("*/"));
    }

    #[test]
    fn test_full_path_pattern_has_no_trailing_wildcard() {
        let suggestions = rank(
            &["https://example.com/about", "https://example.com/about"],
            1,
            20,
        );
        assert_eq!(suggestions[0].pattern_description, "/about");
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let suggestions = rank(
            &[
                "https://example.com/zebra/x1",
                "https://example.com/zebra/x2",
                "https://example.com/apple/y1",
                "https://example.com/apple/y2",
            ],
            1,
            20,
        );
        // Same score and coverage: the lexicographically smaller key wins.
        assert_eq!(suggestions[0].ngram, NgramKey::new(["apple"]));
        assert_eq!(suggestions[1].ngram, NgramKey::new(["zebra"]));
    }
}
