//! domains2providers - Aggregate domain/IP rule lists into Clash rule providers.
//!
//! This crate fetches rule lists from heterogeneous text sources, normalizes
//! them into bare domains, removes redundant entries and writes one
//! `payload:` YAML provider per category.
//!
//! # Features
//!
//! - **Line classification**: table-driven handling of comments, hosts-file
//!   entries, v2fly prefixes and already formatted provider lines
//! - **Suffix deduplication**: `www.qq.com` is dropped when `qq.com` is present
//! - **Blacklists**: remove a domain and all of its subdomains from a category
//! - **IP-CIDR pass-through**: address lists are emitted verbatim
//! - **Geosite resolution**: `include:` and `@attribute` aware conversion of a
//!   v2fly `domain-list-community` data directory
//!
//! # Quick Start
//!
//! ```
//! use domains2providers::pipeline::{MemorySource, Pipeline};
//! use domains2providers::{Behavior, Category};
//!
//! let source = MemorySource::new()
//!     .with("china", ["qq.com", "www.qq.com", "# comment", "full:baidu.com"])
//!     .with("not-china", ["baidu.com"]);
//!
//! let category = Category::new("cn", Behavior::Domain, ["china"]).with_blacklist(["not-china"]);
//! let rules = Pipeline::new(source).run(&category).unwrap();
//!
//! assert_eq!(rules.as_slice(), &["+.qq.com"]);
//! ```
//!
//! For real sources use [`fetch::Fetcher`], which downloads `http(s)://`
//! sources and reads local paths, and [`provider::ProviderWriter`] to write
//! the results.

mod behavior;
mod error;

pub mod category;
pub mod classify;
pub mod domain;
pub mod fetch;
pub mod geosite;
pub mod pipeline;
pub mod provider;
pub mod rule_list;

// Re-export core types
pub use behavior::Behavior;
pub use error::{Error, Result};

pub use category::{Category, CategoryConfig};
pub use classify::{classify, Classified, LineClassifier};
pub use domain::{canonicalize, dedupe, filter, CoveringSet, DomainSet};
pub use pipeline::{LineSource, Pipeline};
pub use provider::{Provider, ProviderWriter};
pub use rule_list::{format_domains, RuleList};
