//! Domain sets and the suffix relationships between them.
//!
//! A [`DomainSet`] is any collection of bare domains. A [`CoveringSet`] is a
//! set in which no member is a subdomain of another member; it can only be
//! built by [`dedupe`] and narrowed by [`filter`].
//!
//! # Example
//!
//! ```
//! use domains2providers::domain::{canonicalize, dedupe};
//!
//! let set = canonicalize(["qq.com", "www.qq.com", ".mail.qq.com", "# comment"]);
//! assert_eq!(set.len(), 3);
//!
//! let covering = dedupe(set);
//! assert_eq!(covering.len(), 1);
//! assert!(covering.contains("qq.com"));
//! ```

mod blacklist;
mod dedupe;

pub use blacklist::filter;
pub use dedupe::dedupe;

use ahash::AHashSet;

use crate::classify::LineClassifier;
use crate::Behavior;

/// Iterator over the parents of a domain, nearest first.
///
/// `a.b.example.com` yields `b.example.com`, `example.com`, `com`.
#[derive(Debug, Clone)]
pub struct Parents<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Parents<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let pos = self.rest.find('.')?;
        self.rest = &self.rest[pos + 1..];
        if self.rest.is_empty() {
            None
        } else {
            Some(self.rest)
        }
    }
}

/// Get the parents of a domain (each formed by dropping leading labels).
pub fn parents(domain: &str) -> Parents<'_> {
    Parents { rest: domain }
}

/// Number of dot-separated labels.
pub fn label_count(domain: &str) -> usize {
    domain.split('.').count()
}

/// Whether `domain` is a strict subdomain of `parent`.
pub fn is_subdomain_of(domain: &str, parent: &str) -> bool {
    domain.len() > parent.len()
        && domain.ends_with(parent)
        && domain.as_bytes()[domain.len() - parent.len() - 1] == b'.'
}

/// A set of bare domains.
#[derive(Debug, Clone, Default)]
pub struct DomainSet {
    domains: AHashSet<String>,
}

impl DomainSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a domain. Returns `false` if it was already present.
    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.domains.insert(domain.into())
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.domains.iter().map(String::as_str)
    }

    /// Get the domains sorted lexicographically.
    pub fn sorted(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.iter().collect();
        v.sort_unstable();
        v
    }
}

impl PartialEq for DomainSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|d| other.contains(d))
    }
}

impl Eq for DomainSet {}

impl IntoIterator for DomainSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for DomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for DomainSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.domains.extend(iter.into_iter().map(Into::into));
    }
}

/// A domain set with no member being a subdomain of another member.
#[derive(Debug, Clone, Default)]
pub struct CoveringSet {
    domains: AHashSet<String>,
}

impl CoveringSet {
    fn from_set(domains: AHashSet<String>) -> Self {
        Self { domains }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Whether `domain` equals a member or is a subdomain of one.
    pub fn covers(&self, domain: &str) -> bool {
        self.contains(domain) || parents(domain).any(|p| self.contains(p))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.domains.iter().map(String::as_str)
    }

    /// Get the domains sorted lexicographically.
    pub fn sorted(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.iter().collect();
        v.sort_unstable();
        v
    }

    /// Drop the covering guarantee.
    pub fn into_domain_set(self) -> DomainSet {
        DomainSet {
            domains: self.domains,
        }
    }

    fn retain(mut self, f: impl FnMut(&String) -> bool) -> Self {
        self.domains.retain(f);
        self
    }
}

impl PartialEq for CoveringSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|d| other.contains(d))
    }
}

impl Eq for CoveringSet {}

/// Canonicalize raw source lines into a domain set with the standard classifier.
pub fn canonicalize<I, S>(lines: I) -> DomainSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    canonicalize_with(&LineClassifier::new(), lines)
}

/// Canonicalize raw source lines with a specific classifier.
pub fn canonicalize_with<I, S>(classifier: &LineClassifier, lines: I) -> DomainSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            classifier
                .classify(line.as_ref(), Behavior::Domain)
                .into_domain()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents() {
        let p: Vec<&str> = parents("a.b.example.com").collect();
        assert_eq!(p, vec!["b.example.com", "example.com", "com"]);
        assert_eq!(parents("com").count(), 0);
        assert_eq!(parents("example.com.").collect::<Vec<_>>(), vec!["com."]);
    }

    #[test]
    fn test_label_count() {
        assert_eq!(label_count("com"), 1);
        assert_eq!(label_count("qq.com"), 2);
        assert_eq!(label_count("www.qq.com"), 3);
    }

    #[test]
    fn test_is_subdomain_of() {
        assert!(is_subdomain_of("www.qq.com", "qq.com"));
        assert!(is_subdomain_of("a.b.qq.com", "qq.com"));
        assert!(!is_subdomain_of("qq.com", "qq.com"));
        assert!(!is_subdomain_of("notqq.com", "qq.com"));
        assert!(!is_subdomain_of("qq.com", "www.qq.com"));
    }

    #[test]
    fn test_canonicalize_collapses_duplicates() {
        let set = canonicalize(["a.com", "a.com", "a.com"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("a.com"));
    }

    #[test]
    fn test_canonicalize_mixed_syntax() {
        let set = canonicalize([
            "# header",
            "",
            "full:ads.example.com",
            ".example.org",
            "+.Example.org",
            "regexp:^ad\\.",
            "keyword:track",
        ]);
        assert_eq!(set.sorted(), vec!["ads.example.com", "example.org"]);
    }

    #[test]
    fn test_canonicalize_order_independent() {
        let forward = canonicalize(["b.com", "a.com", "c.net"]);
        let backward = canonicalize(["c.net", "a.com", "b.com"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_covers() {
        let covering = dedupe(canonicalize(["example.com"]));
        assert!(covering.covers("example.com"));
        assert!(covering.covers("a.b.example.com"));
        assert!(!covering.covers("com"));
        assert!(!covering.covers("badexample.com"));
    }
}
