use serde::Serialize;
use tracing::{debug, info, warn};

use crate::url_parser::{ParsedUrl, RejectReason};

/// The validated input for one analysis run.
///
/// Built once from the raw URL column and read-only afterwards.
/// `entries` preserves input order; every row that failed to parse is
/// kept in `rejected` with its reason, so
/// `entries.len() + rejected.len()` always equals the number of
/// non-null input rows.
#[derive(Debug, Clone, Serialize)]
pub struct Corpus {
    pub entries: Vec<ParsedUrl>,
    pub rejected: Vec<(String, RejectReason)>,
}

impl Corpus {
    /// Parses a column of raw URL strings into a corpus.
    ///
    /// Row failures are absorbed here: a malformed row is recorded and
    /// the run continues. This never returns an error.
    pub fn build<I, S>(raw_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut rejected = Vec::new();

        for raw in raw_urls {
            let raw = raw.as_ref();
            match ParsedUrl::parse(raw) {
                Ok(parsed) => entries.push(parsed),
                Err(reason) => {
                    debug!("Rejected row '{}': {}", raw, reason);
                    rejected.push((raw.to_string(), reason));
                }
            }
        }

        if entries.is_empty() {
            warn!("Corpus is empty: {} rows rejected", rejected.len());
        } else {
            info!(
                "Built corpus: {} URLs accepted, {} rejected",
                entries.len(),
                rejected.len()
            );
        }

        Corpus { entries, rejected }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest path depth across all entries.
    pub fn max_depth(&self) -> usize {
        self.entries.iter().map(ParsedUrl::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let corpus = Corpus::build([
            "https://example.com/b",
            "https://example.com/a",
        ]);
        assert_eq!(corpus.entries[0].path_segments, vec!["b"]);
        assert_eq!(corpus.entries[1].path_segments, vec!["a"]);
    }

    #[test]
    fn test_rejections_recorded_not_fatal() {
        let corpus = Corpus::build([
            "https://example.com/a",
            "not a url",
            "   ",
            "https://example.com/b",
        ]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.rejected.len(), 2);
        assert_eq!(corpus.rejected[0].1, RejectReason::MalformedUrl);
        assert_eq!(corpus.rejected[1].1, RejectReason::EmptyInput);
    }

    #[test]
    fn test_partition_invariant() {
        let rows = [
            "https://example.com/a",
            "nope",
            "https://example.com/b",
            "also nope",
        ];
        let corpus = Corpus::build(rows);
        assert_eq!(corpus.len() + corpus.rejected.len(), rows.len());
    }

    #[test]
    fn test_empty_corpus_is_valid() {
        let corpus = Corpus::build(["not a url"]);
        assert!(corpus.is_empty());
        assert_eq!(corpus.rejected.len(), 1);
        assert_eq!(corpus.max_depth(), 0);
    }
}
