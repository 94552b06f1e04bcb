//! Per-category normalization pipeline.
//!
//! ```text
//! fetch sources -> canonicalize -> dedupe ---------> filter -> format
//!                                                     ^
//! fetch blacklist -> canonicalize -> dedupe ----------'
//! ```
//!
//! `ipcidr` categories skip everything after classification: their lines are
//! emitted verbatim, in source order.

use ahash::AHashMap;

use crate::category::Category;
use crate::classify::{Classified, LineClassifier};
use crate::domain::{canonicalize_with, dedupe, filter, CoveringSet};
use crate::provider::Provider;
use crate::rule_list::RuleList;
use crate::{Behavior, Error, Result};

/// Provider of complete line sequences for source identifiers.
///
/// Implementations must return every line of a source or an error; a partial
/// sequence is never acceptable.
pub trait LineSource {
    fn fetch_lines(&self, source: &str) -> Result<Vec<String>>;
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn fetch_lines(&self, source: &str) -> Result<Vec<String>> {
        (**self).fetch_lines(source)
    }
}

/// In-memory line source, keyed by source identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: AHashMap<String, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the lines of a source.
    pub fn insert<I, S>(&mut self, source: impl Into<String>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources
            .insert(source.into(), lines.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with<I, S>(mut self, source: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(source, lines);
        self
    }
}

impl LineSource for MemorySource {
    fn fetch_lines(&self, source: &str) -> Result<Vec<String>> {
        self.sources
            .get(source)
            .cloned()
            .ok_or_else(|| Error::UnknownSource(source.to_string()))
    }
}

/// Outcome of running one category.
#[derive(Debug)]
pub struct CategoryOutcome {
    pub name: String,
    pub result: Result<RuleList>,
}

/// One parameterized pipeline for every category.
pub struct Pipeline<S> {
    source: S,
    classifier: LineClassifier,
}

impl<S: LineSource> Pipeline<S> {
    /// Create a pipeline with the standard classifier.
    pub fn new(source: S) -> Self {
        Self {
            source,
            classifier: LineClassifier::new(),
        }
    }

    /// Use a custom classifier.
    pub fn with_classifier(mut self, classifier: LineClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Fetch and process one category.
    ///
    /// Any source failing to load aborts the category.
    pub fn run(&self, category: &Category) -> Result<RuleList> {
        let primary = self.fetch_all(&category.sources)?;
        let blacklist = self.fetch_all(&category.blacklist)?;

        let rules = process_with(&self.classifier, category.behavior, &primary, &blacklist);
        log::info!(
            "{}: {} rules from {} source(s), {} blacklist source(s)",
            category.name,
            rules.len(),
            category.sources.len(),
            category.blacklist.len()
        );
        Ok(rules)
    }

    /// Run every category. Failures are reported per category.
    pub fn run_all(&self, categories: &[Category]) -> Vec<CategoryOutcome> {
        categories
            .iter()
            .map(|category| {
                let result = self.run(category);
                if let Err(ref e) = result {
                    log::error!("{}: {}", category.name, e);
                }
                CategoryOutcome {
                    name: category.name.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Run every category and collect successful ones as providers.
    ///
    /// Returns the providers and the names of the categories that failed.
    pub fn providers(&self, categories: &[Category]) -> (Vec<Provider>, Vec<String>) {
        let mut providers = Vec::new();
        let mut failed = Vec::new();
        for outcome in self.run_all(categories) {
            match outcome.result {
                Ok(rules) => providers.push(Provider::new(outcome.name, rules)),
                Err(_) => failed.push(outcome.name),
            }
        }
        (providers, failed)
    }

    fn fetch_all(&self, sources: &[String]) -> Result<Vec<Vec<String>>> {
        sources
            .iter()
            .map(|source| {
                log::debug!("fetching {}", source);
                self.source.fetch_lines(source)
            })
            .collect()
    }
}

/// Process already fetched lines with the standard classifier.
pub fn process(behavior: Behavior, primary: &[Vec<String>], blacklist: &[Vec<String>]) -> RuleList {
    process_with(&LineClassifier::new(), behavior, primary, blacklist)
}

/// Process already fetched lines.
///
/// `primary` and `blacklist` hold one line sequence per source.
pub fn process_with(
    classifier: &LineClassifier,
    behavior: Behavior,
    primary: &[Vec<String>],
    blacklist: &[Vec<String>],
) -> RuleList {
    match behavior {
        Behavior::IpCidr => {
            let rules = primary
                .iter()
                .flatten()
                .filter_map(|line| match classifier.classify(line, Behavior::IpCidr) {
                    Classified::IpCidr(rule) => Some(rule),
                    _ => None,
                })
                .collect();
            RuleList::passthrough(rules)
        }
        Behavior::Domain => {
            let domains = canonicalize_with(classifier, primary.iter().flatten());
            let excluded = if blacklist.is_empty() {
                CoveringSet::default()
            } else {
                dedupe(canonicalize_with(classifier, blacklist.iter().flatten()))
            };
            let total = domains.len();
            let covering = filter(dedupe(domains), &excluded);
            log::debug!(
                "{} unique domains, {} after dedupe and blacklist ({} excluded roots)",
                total,
                covering.len(),
                excluded.len()
            );
            RuleList::from_covering(&covering)
        }
    }
}
