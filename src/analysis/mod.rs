pub mod advisor;
pub mod distribution;
pub mod exporter;
pub mod ngram;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use advisor::Suggestion;
pub use distribution::{Distributions, FrequencyTable};
pub use exporter::SegmentationRule;
pub use ngram::{NgramKey, NgramRecord};

use crate::corpus::Corpus;
use crate::url_parser::RejectReason;

/// Tuning knobs for one analysis run.
///
/// Validated up front: a bad configuration fails before any row is
/// parsed, never mid-run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum n-gram length K. Longer patterns rarely generalize and
    /// cost quadratically more candidates.
    pub max_ngram_length: usize,
    /// Absolute minimum-support override; `None` applies the default
    /// of max(2, 0.1% of corpus size).
    pub min_support: Option<usize>,
    /// How many suggestions to keep.
    pub top_n: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_ngram_length: 3,
            min_support: None,
            top_n: 20,
        }
    }
}

impl AnalyzerConfig {
    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_ngram_length < 1 {
            bail!("invalid configuration: max_ngram_length must be at least 1");
        }
        if self.min_support == Some(0) {
            bail!("invalid configuration: min_support must be at least 1");
        }
        Ok(())
    }
}

/// Complete output of one analysis run: an immutable snapshot the
/// report layer serializes however it likes.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub corpus_size: usize,
    pub rejected: Vec<(String, RejectReason)>,
    pub domain_distribution: FrequencyTable,
    pub subdomain_distribution: FrequencyTable,
    pub scheme_distribution: FrequencyTable,
    pub depth_histogram: Vec<(usize, usize)>,
    pub suggestions: Vec<Suggestion>,
    pub rules: Vec<SegmentationRule>,
    /// All n-grams meeting min support, slash-joined, descending count.
    pub ngram_counts: Vec<(String, usize)>,
    /// Headline facts for human readers.
    pub insights: Vec<String>,
    /// Set when no input row parsed; the run is still valid, just
    /// degenerate, and callers should surface this to the user.
    pub empty_corpus: bool,
}

/// Runs the full pipeline over a raw URL column.
///
/// Stages run strictly in sequence, each consuming the previous
/// stage's complete output: corpus, then distributions and n-grams,
/// then ranked suggestions, then exported rules. The whole computation
/// is pure; rerunning with the same input and configuration produces a
/// bit-identical report.
///
/// # Arguments
/// * `raw_urls` - The resolved URL column, in row order
/// * `config` - Analysis parameters (validated before any work)
///
/// # Returns
/// * `Result<AnalysisReport>` - The report, or an invalid-configuration
///   error raised before processing starts
pub fn analyze<S: AsRef<str>>(raw_urls: &[S], config: &AnalyzerConfig) -> Result<AnalysisReport> {
    config.validate()?;

    info!(
        "Starting analysis of {} rows (K={}, top_n={})",
        raw_urls.len(),
        config.max_ngram_length,
        config.top_n
    );

    // Stage 1: corpus
    let corpus = Corpus::build(raw_urls.iter().map(AsRef::as_ref));
    if corpus.is_empty() {
        warn!("No valid URLs in input; producing a degenerate report");
    }

    // Stage 2: distributions and n-grams
    let distributions = Distributions::compute(&corpus);
    let records = ngram::build_ngrams(&corpus, config.max_ngram_length);

    // Stage 3: ranked suggestions
    let suggestions = advisor::suggest(
        &records,
        &corpus,
        &distributions,
        config.min_support,
        config.top_n,
    );
    debug!("Advisor kept {} suggestions", suggestions.len());

    // Stage 4: rule export
    let rules = exporter::export_rules(&suggestions);

    let support = advisor::effective_min_support(corpus.len(), config.min_support);
    let mut ngram_counts: Vec<(String, usize)> = records
        .values()
        .filter(|r| r.coverage_count() >= support)
        .map(|r| (r.key.segments().join("/"), r.coverage_count()))
        .collect();
    ngram_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let insights = build_insights(&corpus, &distributions);
    let empty_corpus = corpus.is_empty();

    info!(
        "Analysis complete: {} URLs, {} rejected, {} suggestions",
        corpus.len(),
        corpus.rejected.len(),
        suggestions.len()
    );

    Ok(AnalysisReport {
        corpus_size: corpus.len(),
        rejected: corpus.rejected,
        domain_distribution: distributions.domains,
        subdomain_distribution: distributions.subdomains,
        scheme_distribution: distributions.schemes,
        depth_histogram: distributions.depth_histogram,
        suggestions,
        rules,
        ngram_counts,
        insights,
        empty_corpus,
    })
}

/// Headline facts in the order a reader scans them.
fn build_insights(corpus: &Corpus, distributions: &Distributions) -> Vec<String> {
    let mut insights = Vec::new();
    insights.push(format!("Total URLs analyzed: {}", corpus.len()));

    if !corpus.rejected.is_empty() {
        insights.push(format!("Rejected rows: {}", corpus.rejected.len()));
    }
    if corpus.is_empty() {
        insights.push("Warning: no valid URLs in input".to_string());
        return insights;
    }

    if let Some((scheme, _)) = distributions.schemes.top() {
        insights.push(format!("Most common scheme: {}", scheme));
    }
    if let Some((domain, count)) = distributions.domains.top() {
        insights.push(format!("Most common domain: {} ({} URLs)", domain, count));
    }
    if let Some((subdomain, count)) = distributions
        .subdomains
        .rows()
        .iter()
        .find(|(name, _)| !name.is_empty())
    {
        insights.push(format!(
            "Most common subdomain: {} ({} URLs)",
            subdomain, count
        ));
    }
    insights.push(format!(
        "Average path depth: {:.2}",
        distributions.average_depth()
    ));

    insights
}
