//! Line classifier for raw rule-source lines.
//!
//! Upstream lists mix several syntaxes: plain domains, `.suffix` domains,
//! v2fly `domain:`/`full:` prefixes, hosts-file entries, already formatted
//! Clash payload lines and assorted comments. The classifier reduces each line
//! to a bare domain, a verbatim IP/CIDR line, or a discard.
//!
//! Precedence is driven by an ordered table of [`LineRule`]s:
//!
//! 1. Any [`Action::Discard`] pattern contained in the line drops it.
//! 2. (domain) The first [`Action::StripPrefix`] pattern the line starts with is removed.
//! 3. (domain) The line is cut at the earliest [`Action::Truncate`] pattern.

use std::borrow::Cow;
use std::net::IpAddr;

use crate::Behavior;

/// What a [`LineRule`] does when its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the line if it contains the pattern anywhere
    Discard,
    /// Remove the pattern from the start of the line (at most one per line)
    StripPrefix,
    /// Cut the line at the first occurrence of the pattern
    Truncate,
}

/// A single `(pattern, action)` entry of the classifier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRule {
    pub pattern: &'static str,
    pub action: Action,
}

impl LineRule {
    pub const fn discard(pattern: &'static str) -> Self {
        Self {
            pattern,
            action: Action::Discard,
        }
    }

    pub const fn strip_prefix(pattern: &'static str) -> Self {
        Self {
            pattern,
            action: Action::StripPrefix,
        }
    }

    pub const fn truncate(pattern: &'static str) -> Self {
        Self {
            pattern,
            action: Action::Truncate,
        }
    }
}

/// The standard rule table, in precedence order.
pub const STANDARD_RULES: &[LineRule] = &[
    LineRule::discard("#"),
    LineRule::discard("!"),
    LineRule::discard("regexp:"),
    LineRule::discard("localhost"),
    LineRule::discard("payload:"),
    LineRule::strip_prefix("domain:"),
    LineRule::strip_prefix("full:"),
    // hosts-file entries
    LineRule::strip_prefix("127.0.0.1 "),
    LineRule::strip_prefix("0.0.0.0 "),
    // previously formatted provider lines
    LineRule::strip_prefix("- '+."),
    LineRule::strip_prefix("- \"+."),
    LineRule::strip_prefix("+."),
    LineRule::strip_prefix("- '"),
    LineRule::strip_prefix("- \""),
    LineRule::truncate(":@"),
    LineRule::truncate("'"),
    LineRule::truncate("\""),
];

/// Result of classifying one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A bare domain: lowercase, no leading dot, no marker, no colon
    Domain(String),
    /// An IP/CIDR line, passed through verbatim
    IpCidr(String),
    /// Comment, empty, or unrecognized syntax
    Discard,
}

impl Classified {
    /// Whether the line was discarded.
    pub fn is_discard(&self) -> bool {
        matches!(self, Classified::Discard)
    }

    /// The bare domain, if this is a domain line.
    pub fn into_domain(self) -> Option<String> {
        match self {
            Classified::Domain(d) => Some(d),
            _ => None,
        }
    }
}

/// Table-driven line classifier.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    rules: Cow<'static, [LineRule]>,
}

impl LineClassifier {
    /// Create a classifier using [`STANDARD_RULES`].
    pub fn new() -> Self {
        Self {
            rules: Cow::Borrowed(STANDARD_RULES),
        }
    }

    /// Create a classifier with a custom rule table.
    pub fn with_rules(rules: Vec<LineRule>) -> Self {
        Self {
            rules: Cow::Owned(rules),
        }
    }

    /// Get the rule table in precedence order.
    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    fn patterns(&self, action: Action) -> impl Iterator<Item = &'static str> + '_ {
        self.rules
            .iter()
            .filter(move |r| r.action == action)
            .map(|r| r.pattern)
    }

    /// Classify a single line under the given behavior.
    pub fn classify(&self, line: &str, behavior: Behavior) -> Classified {
        let line = line.trim();
        if line.is_empty() || self.patterns(Action::Discard).any(|p| line.contains(p)) {
            return Classified::Discard;
        }

        match behavior {
            Behavior::Domain => self.classify_domain(line),
            // Colon-bearing lines (annotations, IPv6) are dropped
            Behavior::IpCidr if line.contains(':') => Classified::Discard,
            Behavior::IpCidr => Classified::IpCidr(line.to_string()),
        }
    }

    fn classify_domain(&self, line: &str) -> Classified {
        let stripped = self
            .patterns(Action::StripPrefix)
            .find_map(|p| line.strip_prefix(p))
            .unwrap_or(line);
        if stripped.is_empty() {
            return Classified::Discard;
        }

        let end = self
            .patterns(Action::Truncate)
            .filter_map(|p| stripped.find(p))
            .min()
            .unwrap_or(stripped.len());
        let domain = stripped[..end].trim();
        let domain = domain.strip_prefix('.').unwrap_or(domain);

        if domain.is_empty() || domain.contains(':') || domain.contains(char::is_whitespace) {
            return Classified::Discard;
        }
        if !looks_like_domain(domain) {
            return Classified::Discard;
        }

        Classified::Domain(domain.to_lowercase())
    }
}

/// Reject leftovers such as `-`, `0.0.0.0` or `...` that survive stripping.
fn looks_like_domain(candidate: &str) -> bool {
    !candidate.starts_with('-')
        && candidate.chars().any(char::is_alphanumeric)
        && candidate.parse::<IpAddr>().is_err()
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a line with the standard rule table.
pub fn classify(line: &str, behavior: Behavior) -> Classified {
    LineClassifier::new().classify(line, behavior)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(line: &str) -> Classified {
        classify(line, Behavior::Domain)
    }

    #[test]
    fn test_discard_markers() {
        for line in ["# comment", "", "   ", "regexp:^ad\\.", "localhost", "! adblock", "payload:"] {
            assert_eq!(domain(line), Classified::Discard, "line {:?}", line);
        }
        assert_eq!(domain("127.0.0.1 localhost"), Classified::Discard);
        assert_eq!(domain("example.com # trailing"), Classified::Discard);
    }

    #[test]
    fn test_prefix_strip() {
        assert_eq!(
            domain("full:ads.example.com"),
            Classified::Domain("ads.example.com".to_string())
        );
        assert_eq!(
            domain("domain:example.com"),
            Classified::Domain("example.com".to_string())
        );
        assert_eq!(
            domain(".example.org"),
            Classified::Domain("example.org".to_string())
        );
        assert_eq!(
            domain("0.0.0.0 tracker.example.net"),
            Classified::Domain("tracker.example.net".to_string())
        );
        assert_eq!(
            domain("127.0.0.1   ads.example.net"),
            Classified::Domain("ads.example.net".to_string())
        );
    }

    #[test]
    fn test_only_first_prefix_removed() {
        // `domain:` wins, `full:` is left in place and the colon discards it
        assert_eq!(domain("domain:full:example.com"), Classified::Discard);
    }

    #[test]
    fn test_formatted_artifacts() {
        assert_eq!(
            domain("+.google.com"),
            Classified::Domain("google.com".to_string())
        );
        assert_eq!(
            domain("- '+.google.com'"),
            Classified::Domain("google.com".to_string())
        );
        assert_eq!(
            domain("- \"+.google.com\""),
            Classified::Domain("google.com".to_string())
        );
    }

    #[test]
    fn test_quoted_exact_entries() {
        assert_eq!(
            domain("- 'www.baidu.com'"),
            Classified::Domain("www.baidu.com".to_string())
        );
        assert_eq!(
            domain("- \"example.org\""),
            Classified::Domain("example.org".to_string())
        );
        assert_eq!(domain("- ''"), Classified::Discard);
        assert_eq!(domain("- \"\""), Classified::Discard);
    }

    #[test]
    fn test_non_domain_leftovers_discarded() {
        assert_eq!(domain("-"), Classified::Discard);
        assert_eq!(domain("-bad.example.com"), Classified::Discard);
        assert_eq!(domain("..."), Classified::Discard);
        assert_eq!(domain("0.0.0.0 0.0.0.0"), Classified::Discard);
        assert_eq!(domain("127.0.0.1 127.0.0.1"), Classified::Discard);
        assert_eq!(domain("10.1.2.3"), Classified::Discard);
        assert_eq!(
            domain("0.0.0.0 ads.example.com"),
            Classified::Domain("ads.example.com".to_string())
        );
    }

    #[test]
    fn test_annotation_truncated() {
        assert_eq!(
            domain("domain:example.com:@cn"),
            Classified::Domain("example.com".to_string())
        );
        assert_eq!(
            domain("example.com'"),
            Classified::Domain("example.com".to_string())
        );
    }

    #[test]
    fn test_prefix_only_discarded() {
        assert_eq!(domain("full:"), Classified::Discard);
        assert_eq!(domain("+."), Classified::Discard);
        assert_eq!(domain("."), Classified::Discard);
    }

    #[test]
    fn test_unrecognized_syntax_discarded() {
        assert_eq!(domain("keyword:google"), Classified::Discard);
        assert_eq!(domain("example.com extra"), Classified::Discard);
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(
            domain("WWW.Example.COM"),
            Classified::Domain("www.example.com".to_string())
        );
    }

    #[test]
    fn test_ipcidr_passthrough() {
        assert_eq!(
            classify("192.168.0.0/16", Behavior::IpCidr),
            Classified::IpCidr("192.168.0.0/16".to_string())
        );
        assert_eq!(
            classify("  10.0.0.0/8  ", Behavior::IpCidr),
            Classified::IpCidr("10.0.0.0/8".to_string())
        );
        assert_eq!(classify("2001:db8::/32", Behavior::IpCidr), Classified::Discard);
        assert_eq!(classify("# cn", Behavior::IpCidr), Classified::Discard);
        assert_eq!(classify("", Behavior::IpCidr), Classified::Discard);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = LineClassifier::with_rules(vec![
            LineRule::discard(";"),
            LineRule::strip_prefix("*."),
        ]);
        assert_eq!(classifier.rules().len(), 2);
        assert_eq!(
            classifier.classify("*.example.com", Behavior::Domain),
            Classified::Domain("example.com".to_string())
        );
        assert_eq!(
            classifier.classify("; note", Behavior::Domain),
            Classified::Discard
        );
        // `#` is not in the custom table, but whitespace still rejects it
        assert_eq!(
            classifier.classify("# note", Behavior::Domain),
            Classified::Discard
        );
    }

    #[test]
    fn test_into_domain() {
        assert_eq!(
            domain("a.com").into_domain(),
            Some("a.com".to_string())
        );
        assert!(domain("#").is_discard());
        assert_eq!(classify("1.1.1.1/32", Behavior::IpCidr).into_domain(), None);
    }
}
