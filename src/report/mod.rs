//! Report writers: serialize an [`AnalysisReport`] to the on-disk
//! artifacts the service hands back to users.
//!
//! The core never sees file paths; everything here is presentation.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::analysis::{exporter, AnalysisReport};

/// Rows shown per distribution table in the plain-text summary.
const SUMMARY_TABLE_LIMIT: usize = 20;

/// File names produced by one export pass.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub summary_txt: String,
    pub ngram_csv: String,
    pub rules_txt: String,
    pub recommendations_md: String,
}

/// Writes all report artifacts for a run into `results_dir`.
///
/// File names carry the client name and the current date, e.g.
/// `url_analysis_acme_20260829.txt`.
pub fn write_all(report: &AnalysisReport, results_dir: &Path, client_name: &str) -> Result<ReportFiles> {
    fs::create_dir_all(results_dir)
        .with_context(|| format!("failed to create results dir {}", results_dir.display()))?;

    let date = Local::now().format("%Y%m%d");
    let base = format!("url_analysis_{}_{}", client_name, date);

    let files = ReportFiles {
        summary_txt: format!("{}.txt", base),
        ngram_csv: format!("{}.csv", base),
        rules_txt: format!("botify_segmentation_{}_{}.txt", client_name, date),
        recommendations_md: format!("all_segmentation_{}_{}.md", client_name, date),
    };

    write_file(results_dir, &files.summary_txt, &render_summary(report))?;
    write_file(results_dir, &files.ngram_csv, &render_ngram_table(report))?;
    write_file(
        results_dir,
        &files.rules_txt,
        &exporter::render_rule_file(&report.rules),
    )?;
    write_file(
        results_dir,
        &files.recommendations_md,
        &render_recommendations_markdown(report),
    )?;

    info!(
        "Wrote report files to {}: {}, {}, {}, {}",
        results_dir.display(),
        files.summary_txt,
        files.ngram_csv,
        files.rules_txt,
        files.recommendations_md
    );
    Ok(files)
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Plain-text overview: insights, suggestions, rules, distributions,
/// and the top n-grams.
pub fn render_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str("URL Analysis Results\n\n");

    out.push_str("Insights:\n");
    for insight in &report.insights {
        let _ = writeln!(out, "- {}", insight);
    }

    if !report.rejected.is_empty() {
        out.push_str("\nRejected rows:\n");
        for (raw, reason) in &report.rejected {
            let _ = writeln!(out, "  {}: {}", reason, raw);
        }
    }

    out.push_str("\nSegmentation Suggestions:\n");
    for suggestion in &report.suggestions {
        let _ = writeln!(
            out,
            "  {} (covers {} URLs, {:.1}%)",
            suggestion.pattern_description,
            suggestion.coverage_count,
            suggestion.coverage_ratio * 100.0
        );
    }

    out.push_str("\nSegmentation Rules:\n");
    out.push_str(&exporter::render_rule_file(&report.rules));
    out.push('\n');

    out.push_str("\nDomains:\n");
    for (name, count) in report.domain_distribution.rows().iter().take(SUMMARY_TABLE_LIMIT) {
        let _ = writeln!(out, "  {}: {}", name, count);
    }

    out.push_str("\nSubdomains:\n");
    for (name, count) in report
        .subdomain_distribution
        .rows()
        .iter()
        .take(SUMMARY_TABLE_LIMIT)
    {
        let display = if name.is_empty() { "(none)" } else { name };
        let _ = writeln!(out, "  {}: {}", display, count);
    }

    out.push_str("\nPath depth histogram:\n");
    for (depth, count) in &report.depth_histogram {
        let _ = writeln!(out, "  depth {}: {}", depth, count);
    }

    out.push_str("\nNgram Analysis:\n");
    for (ngram, count) in report.ngram_counts.iter().take(SUMMARY_TABLE_LIMIT) {
        let _ = writeln!(out, "  {}: {}", ngram, count);
    }

    out
}

/// `Ngram,Count` table, descending count (the report's ordering).
pub fn render_ngram_table(report: &AnalysisReport) -> String {
    let mut out = String::from("Ngram,Count\n");
    for (ngram, count) in &report.ngram_counts {
        let _ = writeln!(out, "{},{}", ngram, count);
    }
    out
}

/// Markdown recommendations grouped by the depth level the suggestion
/// starts describing, shallowest first.
pub fn render_recommendations_markdown(report: &AnalysisReport) -> String {
    let mut by_level: BTreeMap<usize, Vec<&crate::analysis::SegmentationRule>> = BTreeMap::new();
    for rule in &report.rules {
        by_level
            .entry(rule.suggestion.specificity)
            .or_default()
            .push(rule);
    }

    let mut out = String::from("# Segmentation Recommendations\n\n");
    for (level, rules) in by_level {
        let _ = writeln!(out, "## Level {}\n", level);
        for rule in rules {
            let _ = writeln!(out, "```\n{}\n```\n", rule.rule_pattern);
        }
    }
    out
}
