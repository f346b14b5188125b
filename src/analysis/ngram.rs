//! N-gram generation over path segments.
//!
//! Every contiguous run of 1..K path segments is a candidate pattern.
//! This is the pipeline's dominant cost center: candidates are
//! accumulated into a hash map keyed by segment sequence, merging
//! occurrences from different URLs and offsets into one record.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::corpus::Corpus;
use crate::url_parser::ParsedUrl;

/// A candidate pattern: an ordered run of path-segment values.
///
/// Equality and ordering are value-equality over the segments;
/// the lexicographic `Ord` is the deterministic tie-break used when
/// ranking suggestions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NgramKey(Vec<String>);

impl NgramKey {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        NgramKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Pattern length in segments (its specificity).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` appears as a contiguous window inside `other`.
    pub fn is_window_of(&self, other: &NgramKey) -> bool {
        !self.0.is_empty() && other.0.windows(self.0.len()).any(|w| w == self.0.as_slice())
    }

    /// True if some occurrence of this key in the URL's path does not
    /// reach the final segment, i.e. the path keeps going afterwards.
    pub fn continues_in(&self, url: &ParsedUrl) -> bool {
        let n = self.0.len();
        let path = &url.path_segments;
        if n == 0 || n >= path.len() {
            return false;
        }
        // Windows ending at the last segment start at path.len() - n.
        path.windows(n)
            .take(path.len() - n)
            .any(|w| w == self.0.as_slice())
    }
}

impl fmt::Display for NgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

/// Accumulated occurrences of one n-gram across the corpus.
///
/// `matching_url_indices` indexes into `Corpus::entries`; its size is
/// the n-gram's coverage count. Records are never mutated once the
/// engine pass completes.
#[derive(Debug, Clone)]
pub struct NgramRecord {
    pub key: NgramKey,
    pub matching_url_indices: BTreeSet<usize>,
}

impl NgramRecord {
    pub fn coverage_count(&self) -> usize {
        self.matching_url_indices.len()
    }
}

/// Enumerates all 1..=`max_len` segment windows of every corpus URL.
///
/// Enumeration per URL is ascending window length, then ascending
/// offset, so a rerun over the same corpus produces identical records.
/// Storage is keyed, not ordered; downstream ranking applies its own
/// deterministic tie-breaks.
pub fn build_ngrams(corpus: &Corpus, max_len: usize) -> HashMap<NgramKey, NgramRecord> {
    let mut records: HashMap<NgramKey, NgramRecord> = HashMap::new();

    for (index, entry) in corpus.entries.iter().enumerate() {
        let path = &entry.path_segments;
        for n in 1..=max_len.min(path.len()) {
            for window in path.windows(n) {
                let key = NgramKey(window.to_vec());
                records
                    .entry(key.clone())
                    .or_insert_with(|| NgramRecord {
                        key,
                        matching_url_indices: BTreeSet::new(),
                    })
                    .matching_url_indices
                    .insert(index);
            }
        }
    }

    debug!(
        "N-gram pass over {} URLs produced {} distinct keys (max length {})",
        corpus.len(),
        records.len(),
        max_len
    );

    records
}
