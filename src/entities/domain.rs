use regex::Regex;
use std::sync::LazyLock;

/// Bare host fallback for inputs without a `scheme://` prefix
static DOMAIN_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9.-]+\.[a-z0-9]+").expect("static domain pattern"));

/// Second-level labels that form a two-part public suffix with a country code
const TWO_PART_SUFFIX_LABELS: [&str; 4] = ["gov", "com", "co", "ne"];

/// Extract the host part of an origin or URL
///
/// Tries `scheme://host` first (userinfo, port, path, query and fragment are
/// stripped), then falls back to the first run of domain characters in the
/// input. The result is lower-cased.
///
/// # Example
/// ```
/// use savings_predictor::entities::domain_from_origin_or_url;
///
/// assert_eq!(
///     domain_from_origin_or_url("https://Ads.Acme.com:8443/x?y=1").as_deref(),
///     Some("ads.acme.com")
/// );
/// assert_eq!(domain_from_origin_or_url("acme.net").as_deref(), Some("acme.net"));
/// assert_eq!(domain_from_origin_or_url("no domain here"), None);
/// ```
pub fn domain_from_origin_or_url(origin_or_url: &str) -> Option<String> {
    if let Some((_, rest)) = origin_or_url.split_once("://") {
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let host_port = authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host);
        let host = strip_port(host_port);
        if !host.is_empty() {
            return Some(host.to_ascii_lowercase());
        }
    }

    let lowered = origin_or_url.to_ascii_lowercase();
    DOMAIN_CHARACTERS
        .find(&lowered)
        .map(|m| m.as_str().to_string())
}

fn strip_port(host_port: &str) -> &str {
    if host_port.starts_with('[') {
        // IPv6 literal: keep the brackets, drop anything after them
        return match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        };
    }
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    }
}

/// Heuristic registrable domain of `domain`
///
/// Keeps the last two labels, or the last three when the second-to-last label
/// is one of `gov`, `com`, `co`, `ne` followed by a two-character country code
/// (`bbc.co.uk`, `example.com.au`). This is not a public suffix list lookup.
/// Inputs that do not end in two non-empty labels are returned unchanged.
///
/// # Example
/// ```
/// use savings_predictor::entities::root_domain;
///
/// assert_eq!(root_domain("sub.acme.net"), "acme.net");
/// assert_eq!(root_domain("news.bbc.co.uk"), "bbc.co.uk");
/// assert_eq!(root_domain("localhost"), "localhost");
/// ```
pub fn root_domain(domain: &str) -> &str {
    let labels: Vec<&str> = domain.split('.').collect();
    let n = labels.len();
    if n < 2 || labels[n - 1].is_empty() || labels[n - 2].is_empty() {
        return domain;
    }

    let keep = if n >= 3
        && !labels[n - 3].is_empty()
        && TWO_PART_SUFFIX_LABELS.contains(&labels[n - 2])
        && is_country_code(labels[n - 1])
    {
        3
    } else {
        2
    };

    let skipped: usize = labels[..n - keep].iter().map(|l| l.len() + 1).sum();
    &domain[skipped..]
}

fn is_country_code(label: &str) -> bool {
    label.len() == 2 && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_url() {
        assert_eq!(
            domain_from_origin_or_url("https://ads.acme.com/x").as_deref(),
            Some("ads.acme.com")
        );
        assert_eq!(
            domain_from_origin_or_url("http://acme.com").as_deref(),
            Some("acme.com")
        );
    }

    #[test]
    fn test_domain_strips_userinfo_port_query() {
        assert_eq!(
            domain_from_origin_or_url("https://user:pw@cdn.acme.com:8080/a/b").as_deref(),
            Some("cdn.acme.com")
        );
        assert_eq!(
            domain_from_origin_or_url("https://acme.com?q=1").as_deref(),
            Some("acme.com")
        );
        assert_eq!(
            domain_from_origin_or_url("https://acme.com#top").as_deref(),
            Some("acme.com")
        );
    }

    #[test]
    fn test_domain_ipv6_literal() {
        assert_eq!(
            domain_from_origin_or_url("http://[::1]:8080/").as_deref(),
            Some("[::1]")
        );
    }

    #[test]
    fn test_domain_fallback_character_class() {
        assert_eq!(
            domain_from_origin_or_url("cdn.acme.com/path").as_deref(),
            Some("cdn.acme.com")
        );
        assert_eq!(
            domain_from_origin_or_url("see Tracker.IO now").as_deref(),
            Some("tracker.io")
        );
    }

    #[test]
    fn test_domain_none() {
        assert_eq!(domain_from_origin_or_url(""), None);
        assert_eq!(domain_from_origin_or_url("localhost"), None);
        assert_eq!(domain_from_origin_or_url("https://"), None);
    }

    #[test]
    fn test_root_domain_two_labels() {
        assert_eq!(root_domain("acme.com"), "acme.com");
        assert_eq!(root_domain("a.b.c.acme.com"), "acme.com");
        assert_eq!(root_domain("*.doubleclick.net"), "doubleclick.net");
    }

    #[test]
    fn test_root_domain_two_part_suffix() {
        assert_eq!(root_domain("www.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(root_domain("shop.example.com.au"), "example.com.au");
        assert_eq!(root_domain("portal.state.gov.br"), "state.gov.br");
        assert_eq!(root_domain("x.y.ne.jp"), "y.ne.jp");
        // Not a country code: plain two-label rule applies
        assert_eq!(root_domain("www.example.co.nz1"), "co.nz1");
        assert_eq!(root_domain("www.example.co.éé"), "co.éé");
        assert_eq!(root_domain("www.example.co.u_"), "example.co.u_");
        // Suffix alone
        assert_eq!(root_domain("co.uk"), "co.uk");
    }

    #[test]
    fn test_root_domain_degenerate() {
        assert_eq!(root_domain(""), "");
        assert_eq!(root_domain("localhost"), "localhost");
        assert_eq!(root_domain("acme.com."), "acme.com.");
        assert_eq!(root_domain(".com"), ".com");
    }
}
