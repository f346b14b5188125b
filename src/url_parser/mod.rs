mod host;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;
use url::Url;

pub use host::split_domain;

/// Why a raw input row could not become a [`ParsedUrl`].
///
/// These are per-row outcomes recorded in the corpus, not run-level
/// failures: a rejected row never aborts an analysis.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    #[error("empty input")]
    EmptyInput,
    #[error("malformed URL (no recognizable scheme and host)")]
    MalformedUrl,
}

/// Structural components of a single URL.
///
/// Created once per input row and immutable afterwards. `raw` keeps the
/// original string untouched; `path_segments` excludes the empty
/// segments a leading, trailing, or doubled slash would produce.
/// Percent-encoded segments are kept verbatim so that equal inputs
/// always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    pub raw: String,
    pub scheme: String,
    pub domain: String,
    /// Labels left of the registrable domain, joined with `.`; empty
    /// when the host has no subdomain.
    pub subdomain: String,
    pub path_segments: Vec<String>,
    pub has_query: bool,
}

impl ParsedUrl {
    /// Parses one raw URL string into its structural components.
    ///
    /// This is a total, pure function: the same input always yields the
    /// same result, and nothing outside the returned value is touched.
    ///
    /// # Arguments
    /// * `raw` - The raw column value, surrounding whitespace allowed
    ///
    /// # Returns
    /// * `Result<ParsedUrl, RejectReason>` - The parsed URL, or the
    ///   reason the row must be rejected
    pub fn parse(raw: &str) -> Result<Self, RejectReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RejectReason::EmptyInput);
        }

        trace!("Parsing URL: {}", trimmed);

        // `scheme://host` is required; scheme-only forms like `mailto:`
        // parse but cannot be a base and carry no host.
        let parsed = Url::parse(trimmed).map_err(|_| RejectReason::MalformedUrl)?;
        if parsed.cannot_be_a_base() {
            return Err(RejectReason::MalformedUrl);
        }

        let (domain, subdomain) = match parsed.host() {
            Some(url::Host::Domain(host)) => split_domain(host),
            // IP hosts have no label structure to split
            Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => {
                let host = parsed.host_str().unwrap_or_default().to_string();
                (host, String::new())
            }
            None => return Err(RejectReason::MalformedUrl),
        };
        if domain.is_empty() {
            return Err(RejectReason::MalformedUrl);
        }

        let path_segments: Vec<String> = parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let has_query = parsed.query().is_some_and(|q| !q.is_empty());

        Ok(ParsedUrl {
            raw: raw.to_string(),
            scheme: parsed.scheme().to_string(),
            domain,
            subdomain,
            path_segments,
            has_query,
        })
    }

    /// Number of path segments (the URL's depth).
    pub fn depth(&self) -> usize {
        self.path_segments.len()
    }
}
