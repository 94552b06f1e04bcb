//! Blacklist exclusion.

use super::CoveringSet;

/// Drop every domain equal to, or a subdomain of, an excluded domain.
///
/// Only parent-excludes-child: an excluded `ads.example.com` does not remove
/// `example.com`. Removing members never creates a new cover relationship, so
/// the result is still a covering set.
pub fn filter(domains: CoveringSet, excluded: &CoveringSet) -> CoveringSet {
    if excluded.is_empty() {
        return domains;
    }
    domains.retain(|d| !excluded.covers(d))
}
