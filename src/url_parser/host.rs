//! Host splitting: registrable domain vs. subdomain labels.

// Commonly seen multi-label public suffixes. Hosts under suffixes not
// listed here fall back to "last label = TLD, second-to-last = domain".
const COMPOUND_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "net.uk", "ac.uk", "gov.uk", "com.au", "co.nz", "co.jp", "com.br", "co.in",
];

/// Splits a lowercased host into `(domain, subdomain)`.
///
/// The domain is the public suffix plus the label immediately before
/// it; everything further left is the subdomain. Hosts with exactly
/// two labels (or fewer) have an empty subdomain.
pub fn split_domain(host: &str) -> (String, String) {
    // Compound suffix cases first, e.g. sub.example.co.uk
    for suffix in COMPOUND_SUFFIXES {
        if host == *suffix {
            // The host *is* the suffix; nothing sensible to split.
            return (host.to_string(), String::new());
        }
        if let Some(rest) = host
            .strip_suffix(suffix)
            .and_then(|r| r.strip_suffix('.'))
        {
            return match rest.rsplit_once('.') {
                Some((sub, label)) => (format!("{}.{}", label, suffix), sub.to_string()),
                None => (format!("{}.{}", rest, suffix), String::new()),
            };
        }
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return (host.to_string(), String::new());
    }

    let domain = labels[labels.len() - 2..].join(".");
    let subdomain = labels[..labels.len() - 2].join(".");
    (domain, subdomain)
}
