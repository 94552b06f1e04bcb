//! Category configuration.
//!
//! Categories are plain values handed to the pipeline. A categories file is a
//! YAML document:
//!
//! ```yaml
//! categories:
//!   - name: cn-max
//!     behavior: domain
//!     sources:
//!       - https://example.com/china.txt
//!     blacklist:
//!       - https://example.com/not-china.txt
//! ```

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{Behavior, Error, Result};

/// A named rule grouping with one behavior and one or more sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Output name, used as the provider file name
    pub name: String,
    /// How source lines are processed
    pub behavior: Behavior,
    /// Source identifiers (URLs or paths), fetched in order
    pub sources: Vec<String>,
    /// Sources whose domains are removed from the result
    #[serde(default, alias = "blacklist_sources", skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<String>,
}

impl Category {
    /// Create a new category without a blacklist.
    pub fn new<I, S>(name: impl Into<String>, behavior: Behavior, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            behavior,
            sources: sources.into_iter().map(Into::into).collect(),
            blacklist: Vec::new(),
        }
    }

    /// Add blacklist sources.
    pub fn with_blacklist<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Check this category on its own.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("category name is empty".to_string()));
        }
        if self.name.contains(['/', '\\', '@']) {
            return Err(Error::Config(format!(
                "category name {:?} must not contain '/', '\\' or '@'",
                self.name
            )));
        }
        if self.sources.is_empty() {
            return Err(Error::Config(format!(
                "category {} has no sources",
                self.name
            )));
        }
        if self.behavior == Behavior::IpCidr && !self.blacklist.is_empty() {
            return Err(Error::Config(format!(
                "category {} is ipcidr and cannot have a blacklist",
                self.name
            )));
        }
        Ok(())
    }
}

/// The full set of categories for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CategoryConfig {
    /// Create a config from a list of categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The default source table.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new(
                "cn-ips",
                Behavior::IpCidr,
                ["https://raw.githubusercontent.com/ChanthMiao/China-IPv4-List/refs/heads/release/cn.txt"],
            ),
            Category::new(
                "local-ips",
                Behavior::IpCidr,
                ["https://raw.githubusercontent.com/v2fly/geoip/release/text/private.txt"],
            ),
            Category::new(
                "cn-max",
                Behavior::Domain,
                [
                    "https://raw.githubusercontent.com/blackmatrix7/ios_rule_script/refs/heads/release/rule/Clash/China/China_Domain.txt",
                    "https://raw.githubusercontent.com/blackmatrix7/ios_rule_script/refs/heads/master/rule/Clash/ChinaMax/ChinaMax_Domain.txt",
                ],
            ),
            Category::new(
                "ntp",
                Behavior::Domain,
                ["https://raw.githubusercontent.com/gamesofts/clash-rules/refs/heads/master/ntp.txt"],
            ),
        ])
    }

    /// Parse and validate a config from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check every category and name uniqueness.
    pub fn validate(&self) -> Result<()> {
        let mut names = AHashSet::new();
        for category in &self.categories {
            category.validate()?;
            if !names.insert(category.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate category name: {}",
                    category.name
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
