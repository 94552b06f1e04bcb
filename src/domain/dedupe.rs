//! Suffix deduplication.

use ahash::AHashSet;

use super::{label_count, parents, CoveringSet, DomainSet};

/// Remove every domain that is a subdomain of another domain in the set.
///
/// Candidates are visited by ascending label count, so every possible
/// ancestor of a candidate has been decided before the candidate itself.
/// Ties are broken lexically; domains with equal label count can never
/// cover each other, so the tie order only keeps the walk deterministic.
pub fn dedupe(domains: DomainSet) -> CoveringSet {
    let mut candidates: Vec<(usize, String)> = domains
        .into_iter()
        .map(|d| (label_count(&d), d))
        .collect();
    candidates.sort_unstable();

    let mut result: AHashSet<String> = AHashSet::with_capacity(candidates.len());
    for (_, candidate) in candidates {
        if parents(&candidate).any(|p| result.contains(p)) {
            continue;
        }
        result.insert(candidate);
    }

    CoveringSet::from_set(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{canonicalize, is_subdomain_of};

    fn set(domains: &[&str]) -> DomainSet {
        domains.iter().copied().collect()
    }

    #[test]
    fn test_subdomain_collapse() {
        let covering = dedupe(canonicalize(["qq.com", "www.qq.com", "mail.qq.com"]));
        assert_eq!(covering.sorted(), vec!["qq.com"]);
    }

    #[test]
    fn test_equal_label_count_survives() {
        let covering = dedupe(set(&["a.com", "b.org"]));
        assert_eq!(covering.sorted(), vec!["a.com", "b.org"]);
    }

    #[test]
    fn test_deep_ancestor() {
        // Intermediate label missing from the set
        let covering = dedupe(set(&["x.y.z.example.com", "example.com", "other.example.net"]));
        assert_eq!(covering.sorted(), vec!["example.com", "other.example.net"]);
    }

    #[test]
    fn test_not_a_label_boundary() {
        let covering = dedupe(set(&["google.com", "notgoogle.com", "www.notgoogle.com"]));
        assert_eq!(covering.sorted(), vec!["google.com", "notgoogle.com"]);
    }

    #[test]
    fn test_tld_covers_everything() {
        let covering = dedupe(set(&["cn", "baidu.cn", "www.qq.com.cn", "qq.com"]));
        assert_eq!(covering.sorted(), vec!["cn", "qq.com"]);
    }

    #[test]
    fn test_idempotent() {
        let input = set(&[
            "a.example.com",
            "example.com",
            "b.c.example.org",
            "c.example.org",
            "z.net",
        ]);
        let once = dedupe(input);
        let twice = dedupe(once.clone().into_domain_set());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_covering_invariant() {
        let input = set(&[
            "a.b.c.d",
            "b.c.d",
            "x.c.d",
            "c.d",
            "q.r",
            "p.q.r",
            "s",
            "t.s",
            "u.v.w",
        ]);
        let covering = dedupe(input);
        for a in covering.iter() {
            for b in covering.iter() {
                assert!(!is_subdomain_of(a, b), "{} is covered by {}", a, b);
            }
        }
        assert_eq!(covering.sorted(), vec!["c.d", "q.r", "s", "u.v.w"]);
    }

    #[test]
    fn test_empty() {
        assert!(dedupe(DomainSet::new()).is_empty());
    }
}
