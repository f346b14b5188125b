use anyhow::{anyhow, Result};
use std::env;

use url_insights::analysis::{analyze, AnalyzerConfig};

/// Batch analysis walkthrough: feed a file of URLs (one per line)
/// through the pipeline and print the resulting insights, suggestions,
/// and rules.
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <url-list-file> [max-ngram-length]", args[0]);
        return Err(anyhow!("Missing file argument"));
    }

    let content = std::fs::read_to_string(&args[1])?;
    let urls: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim().starts_with('#'))
        .collect();

    let mut config = AnalyzerConfig::default();
    if let Some(k) = args.get(2) {
        config.max_ngram_length = k.parse()?;
    }

    println!("Analyzing {} URLs from {}", urls.len(), args[1]);
    let start = std::time::Instant::now();
    let report = analyze(&urls, &config)?;
    let duration = start.elapsed();

    println!("\nInsights:");
    for insight in &report.insights {
        println!("  - {}", insight);
    }

    if !report.rejected.is_empty() {
        println!("\nRejected rows:");
        for (raw, reason) in &report.rejected {
            println!("  {}: {}", reason, raw);
        }
    }

    println!("\nSuggestions:");
    for (i, suggestion) in report.suggestions.iter().enumerate() {
        println!(
            "  {}. {} (covers {} URLs, {:.1}%)",
            i + 1,
            suggestion.pattern_description,
            suggestion.coverage_count,
            suggestion.coverage_ratio * 100.0
        );
    }

    println!("\nRules:");
    for rule in &report.rules {
        println!("{}\n", rule.rule_pattern);
    }

    println!("Processing time: {:?}", duration);

    Ok(())
}
