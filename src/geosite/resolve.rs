//! Include resolution and per-tag rule generation.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use super::parse::{parse_list, Entry, EntryKind, ListFile};
use crate::domain::{dedupe, DomainSet};
use crate::provider::Provider;
use crate::rule_list::{RuleList, WILDCARD_PREFIX};
use crate::{Error, Result};

/// All lists of a geosite data directory, keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct GeositeData {
    lists: BTreeMap<String, ListFile>,
}

impl GeositeData {
    /// Build from `(name, content)` pairs.
    pub fn from_lists<I, N, C>(lists: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        Self {
            lists: lists
                .into_iter()
                .map(|(name, content)| (name.as_ref().to_lowercase(), parse_list(content.as_ref())))
                .collect(),
        }
    }

    /// Load every file of a data directory.
    ///
    /// Accepts either the `data/` directory itself or a repository root
    /// containing one.
    pub fn load_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = path.join("data");
        let dir = if data.is_dir() { data.as_path() } else { path };

        let mut lists = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let content = fs::read_to_string(entry.path())?;
            lists.push((name, content));
        }

        if lists.is_empty() {
            return Err(Error::Config(format!("no geosite lists found in {:?}", dir)));
        }
        log::info!("loaded {} geosite lists from {:?}", lists.len(), dir);
        Ok(Self::from_lists(lists))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.lists.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Flatten a list and everything it includes.
    pub fn resolve(&self, name: &str) -> Result<Vec<Entry>> {
        let mut stack = Vec::new();
        self.resolve_inner(&name.to_lowercase(), &mut stack)
    }

    fn resolve_inner(&self, name: &str, stack: &mut Vec<String>) -> Result<Vec<Entry>> {
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(Error::IncludeCycle(chain));
        }
        let list = self
            .lists
            .get(name)
            .ok_or_else(|| Error::UnknownList(name.to_string()))?;

        stack.push(name.to_string());
        let mut entries = list.entries.clone();
        for include in &list.includes {
            let included = self.resolve_inner(&include.list, stack)?;
            entries.extend(included.into_iter().filter(|e| include.accepts(e)));
        }
        stack.pop();

        Ok(entries)
    }

    /// Rule lists of one list: `""` for every entry, plus one per attribute.
    pub fn tags(&self, name: &str) -> Result<BTreeMap<String, RuleList>> {
        let entries = self.resolve(name)?;

        let attrs: BTreeSet<&str> = entries
            .iter()
            .flat_map(|e| e.attrs.iter().map(String::as_str))
            .collect();

        let mut tags = BTreeMap::new();
        tags.insert(String::new(), build_rule_list(name, entries.iter()));
        for attr in attrs {
            let rules = build_rule_list(name, entries.iter().filter(|e| e.has_attr(attr)));
            tags.insert(attr.to_string(), rules);
        }
        Ok(tags)
    }

    /// Providers for every list. Lists that fail to resolve are skipped.
    ///
    /// Returns the providers and the names of the failed lists.
    pub fn providers(&self) -> (Vec<Provider>, Vec<String>) {
        let mut providers = Vec::new();
        let mut failed = Vec::new();
        for name in self.names() {
            match self.tags(name) {
                Ok(tags) => {
                    for (tag, rules) in tags {
                        providers.push(if tag.is_empty() {
                            Provider::new(name, rules)
                        } else {
                            Provider::with_tag(name, tag, rules)
                        });
                    }
                }
                Err(e) => {
                    log::warn!("resolve {}: {}", name, e);
                    failed.push(name.to_string());
                }
            }
        }
        (providers, failed)
    }
}

/// Suffix entries become a covering set of `+.` rules; full entries survive
/// unless a suffix rule already covers them.
fn build_rule_list<'a, I>(name: &str, entries: I) -> RuleList
where
    I: Iterator<Item = &'a Entry>,
{
    let mut suffixes = DomainSet::new();
    let mut fulls = Vec::new();
    let mut skipped = 0usize;
    for entry in entries {
        match entry.kind {
            EntryKind::Domain => {
                suffixes.insert(entry.value.as_str());
            }
            EntryKind::Full => fulls.push(entry.value.as_str()),
            EntryKind::Keyword | EntryKind::Regexp => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("{}: skipped {} keyword/regexp entries", name, skipped);
    }

    let covering = dedupe(suffixes);
    let mut rules: Vec<String> = covering
        .iter()
        .map(|d| format!("{}{}", WILDCARD_PREFIX, d))
        .collect();
    rules.extend(
        fulls
            .into_iter()
            .filter(|f| !covering.covers(f))
            .map(str::to_string),
    );
    RuleList::sorted(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(lists: &[(&str, &str)]) -> GeositeData {
        GeositeData::from_lists(lists.iter().copied())
    }

    #[test]
    fn test_resolve_includes() {
        let geo = data(&[
            ("google", "google.com\ninclude:youtube\n"),
            ("youtube", "youtube.com\nytimg.com\n"),
        ]);
        let entries = geo.resolve("google").unwrap();
        let values: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["google.com", "youtube.com", "ytimg.com"]);
    }

    #[test]
    fn test_include_attr_filter() {
        let geo = data(&[
            ("all-ads", "include:google @ads\n"),
            ("google", "google.com\ndoubleclick.net @ads\n"),
        ]);
        let tags = geo.tags("all-ads").unwrap();
        assert_eq!(tags[""].as_slice(), &["+.doubleclick.net"]);
        assert_eq!(tags["ads"].as_slice(), &["+.doubleclick.net"]);
    }

    #[test]
    fn test_unknown_include() {
        let geo = data(&[("a", "include:missing\n")]);
        assert!(matches!(geo.resolve("a"), Err(Error::UnknownList(ref n)) if n == "missing"));
        assert!(matches!(geo.resolve("nope"), Err(Error::UnknownList(_))));
    }

    #[test]
    fn test_include_cycle() {
        let geo = data(&[("a", "include:b\n"), ("b", "include:a\n"), ("c", "c.com\n")]);
        match geo.resolve("a") {
            Err(Error::IncludeCycle(chain)) => assert_eq!(chain, "a -> b -> a"),
            other => panic!("expected cycle, got {:?}", other),
        }

        let (providers, failed) = geo.providers();
        assert_eq!(failed, vec!["a", "b"]);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "c");
    }

    #[test]
    fn test_diamond_include_is_not_a_cycle() {
        let geo = data(&[
            ("top", "include:left\ninclude:right\n"),
            ("left", "include:base\n"),
            ("right", "include:base\n"),
            ("base", "base.com\n"),
        ]);
        assert_eq!(geo.tags("top").unwrap()[""].as_slice(), &["+.base.com"]);
    }

    #[test]
    fn test_tags_and_rule_forms() {
        let geo = data(&[(
            "apple",
            "apple.com\nwww.apple.com\nfull:cdn.apple.com\nfull:icloud.com.cn @cn\n\
             apple.cn @cn\nkeyword:apple\nregexp:^apple\n",
        )]);
        let tags = geo.tags("apple").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(
            tags[""].as_slice(),
            &["+.apple.cn", "+.apple.com", "icloud.com.cn"]
        );
        assert_eq!(tags["cn"].as_slice(), &["+.apple.cn", "icloud.com.cn"]);
    }

    #[test]
    fn test_providers_naming() {
        let geo = data(&[("google", "google.com\ngoogle.cn @cn\n")]);
        let (providers, failed) = geo.providers();
        assert!(failed.is_empty());
        let names: Vec<String> = providers.iter().map(Provider::file_name).collect();
        assert_eq!(names, vec!["google.yaml", "google@cn.yaml"]);
    }
}
