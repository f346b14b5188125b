//! Frequency tables over the corpus: domains, subdomains, schemes,
//! path depths, and per-position segment values.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::corpus::Corpus;

/// A frequency table with a deterministic iteration order:
/// descending count, then ascending name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrequencyTable(Vec<(String, usize)>);

impl FrequencyTable {
    fn from_counts(counts: HashMap<String, usize>) -> Self {
        let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        FrequencyTable(rows)
    }

    pub fn rows(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    /// Highest-count entry, if any.
    pub fn top(&self) -> Option<&(String, usize)> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Aggregated structural distributions for one corpus.
///
/// Computed in a single pass and immutable afterwards. The subdomain
/// table counts URLs without a subdomain under the reserved key `""`.
#[derive(Debug, Clone, Serialize)]
pub struct Distributions {
    pub domains: FrequencyTable,
    pub subdomains: FrequencyTable,
    pub schemes: FrequencyTable,
    /// Path depth (segment count) -> number of URLs, ascending depth.
    pub depth_histogram: Vec<(usize, usize)>,
    /// (position index, segment value) -> count, for positions 0..max
    /// depth. Lets the advisor tell stable literal segments apart from
    /// variable ones.
    #[serde(skip)]
    pub position_values: HashMap<(usize, String), usize>,
}

impl Distributions {
    /// Computes all tables over the corpus in one O(total segments) pass.
    pub fn compute(corpus: &Corpus) -> Self {
        let mut domains: HashMap<String, usize> = HashMap::new();
        let mut subdomains: HashMap<String, usize> = HashMap::new();
        let mut schemes: HashMap<String, usize> = HashMap::new();
        let mut depths: HashMap<usize, usize> = HashMap::new();
        let mut position_values: HashMap<(usize, String), usize> = HashMap::new();

        for entry in &corpus.entries {
            *domains.entry(entry.domain.clone()).or_default() += 1;
            *subdomains.entry(entry.subdomain.clone()).or_default() += 1;
            *schemes.entry(entry.scheme.clone()).or_default() += 1;
            *depths.entry(entry.depth()).or_default() += 1;

            for (position, segment) in entry.path_segments.iter().enumerate() {
                *position_values
                    .entry((position, segment.clone()))
                    .or_default() += 1;
            }
        }

        let mut depth_histogram: Vec<(usize, usize)> = depths.into_iter().collect();
        depth_histogram.sort_by_key(|(depth, _)| *depth);

        debug!(
            "Computed distributions: {} domains, {} subdomains, max depth {}",
            domains.len(),
            subdomains.len(),
            depth_histogram.last().map(|(d, _)| *d).unwrap_or(0)
        );

        Distributions {
            domains: FrequencyTable::from_counts(domains),
            subdomains: FrequencyTable::from_counts(subdomains),
            schemes: FrequencyTable::from_counts(schemes),
            depth_histogram,
            position_values,
        }
    }

    /// Mean path depth across the corpus, 0.0 for an empty corpus.
    pub fn average_depth(&self) -> f64 {
        let total: usize = self.depth_histogram.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self.depth_histogram.iter().map(|(d, c)| d * c).sum();
        weighted as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::build([
            "https://example.com/shop/shoes/red",
            "https://example.com/shop/shoes/blue",
            "https://blog.example.com/about",
            "http://example.org/",
        ])
    }

    #[test]
    fn test_domain_counts() {
        let dist = Distributions::compute(&corpus());
        assert_eq!(dist.domains.get("example.com"), Some(3));
        assert_eq!(dist.domains.get("example.org"), Some(1));
        // Descending count puts example.com first
        assert_eq!(dist.domains.top().unwrap().0, "example.com");
    }

    #[test]
    fn test_empty_subdomain_reserved_key() {
        let dist = Distributions::compute(&corpus());
        assert_eq!(dist.subdomains.get(""), Some(3));
        assert_eq!(dist.subdomains.get("blog"), Some(1));
    }

    #[test]
    fn test_tie_break_is_alphabetical() {
        let corpus = Corpus::build(["https://b.com/x", "https://a.com/x"]);
        let dist = Distributions::compute(&corpus);
        let names: Vec<&str> = dist.domains.rows().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_depth_histogram() {
        let dist = Distributions::compute(&corpus());
        // depths: 3, 3, 1, 0
        assert_eq!(dist.depth_histogram, vec![(0, 1), (1, 1), (3, 2)]);
        assert!((dist.average_depth() - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_position_values() {
        let dist = Distributions::compute(&corpus());
        assert_eq!(dist.position_values.get(&(0, "shop".to_string())), Some(&2));
        assert_eq!(dist.position_values.get(&(1, "shoes".to_string())), Some(&2));
        assert_eq!(dist.position_values.get(&(0, "about".to_string())), Some(&1));
    }

    #[test]
    fn test_scheme_counts() {
        let dist = Distributions::compute(&corpus());
        assert_eq!(dist.schemes.get("https"), Some(3));
        assert_eq!(dist.schemes.get("http"), Some(1));
    }
}
