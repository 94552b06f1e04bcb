//! Geosite directory resolver.
//!
//! Reads a v2fly `domain-list-community` style `data/` directory, where every
//! file is a named list, resolves `include:` lines and turns each list into
//! one provider per attribute tag.

mod parse;
mod resolve;

pub use parse::{parse_line, parse_list, AttrFilter, Entry, EntryKind, Include, Line, ListFile};
pub use resolve::GeositeData;

use crate::provider::Provider;
use crate::rule_list::RuleList;

/// Tag whose rules are merged into the `ads` provider.
pub const ADS_TAG: &str = "ads";

/// List whose rules are merged into the `ads` provider regardless of tag.
pub const ADS_LIST: &str = "category-ads-all";

/// Union every `@ads` provider and every `category-ads-all` provider into one `ads` provider.
pub fn collect_ads(providers: &[Provider]) -> Provider {
    let rules: Vec<String> = providers
        .iter()
        .filter(|p| p.name == ADS_LIST || p.tag.as_deref() == Some(ADS_TAG))
        .flat_map(|p| p.rules.iter().cloned())
        .collect();
    Provider::new(ADS_TAG, RuleList::sorted(rules))
}
