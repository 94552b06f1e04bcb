//! Formatted rule lists.

use crate::domain::CoveringSet;

/// Prefix denoting "this domain and all of its subdomains".
pub const WILDCARD_PREFIX: &str = "+.";

/// An ordered, immutable sequence of formatted rule strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<String>,
}

impl RuleList {
    /// Format a covering set: every domain gets the wildcard prefix, sorted.
    pub fn from_covering(domains: &CoveringSet) -> Self {
        let mut rules: Vec<String> = domains
            .iter()
            .map(|d| format!("{}{}", WILDCARD_PREFIX, d))
            .collect();
        rules.sort_unstable();
        Self { rules }
    }

    /// Wrap rules that are emitted in the given order (IP/CIDR pass-through).
    pub fn passthrough(rules: Vec<String>) -> Self {
        Self { rules }
    }

    /// Build a list from arbitrary rules, sorted and with duplicates removed.
    pub fn sorted(mut rules: Vec<String>) -> Self {
        rules.sort_unstable();
        rules.dedup();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.rules
    }

    pub fn into_vec(self) -> Vec<String> {
        self.rules
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Format a covering set into a sorted rule list.
pub fn format_domains(domains: &CoveringSet) -> RuleList {
    RuleList::from_covering(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{dedupe, DomainSet};

    fn covering(domains: &[&str]) -> CoveringSet {
        dedupe(domains.iter().copied().collect::<DomainSet>())
    }

    #[test]
    fn test_format_sorted_and_prefixed() {
        let list = format_domains(&covering(&["b.com", "a.com"]));
        assert_eq!(list.as_slice(), &["+.a.com", "+.b.com"]);
    }

    #[test]
    fn test_format_prefix_once() {
        let list = format_domains(&covering(&["example.com"]));
        assert_eq!(list.as_slice(), &["+.example.com"]);
        assert!(list.iter().all(|r| !r.starts_with("+.+.")));
    }

    #[test]
    fn test_format_empty() {
        let list = format_domains(&CoveringSet::default());
        assert!(list.is_empty());
    }

    #[test]
    fn test_passthrough_keeps_order() {
        let list = RuleList::passthrough(vec!["10.0.0.0/8".to_string(), "1.0.0.0/24".to_string()]);
        assert_eq!(list.as_slice(), &["10.0.0.0/8", "1.0.0.0/24"]);
    }

    #[test]
    fn test_sorted_dedups() {
        let list = RuleList::sorted(vec!["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(list.into_vec(), vec!["a", "b"]);
    }
}
