//! Clash rule-provider output.
//!
//! Providers are written as:
//!
//! ```yaml
//! payload:
//!   - "+.example.com"
//!   - "+.sub.example.net"
//! ```

use serde::Deserialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::rule_list::RuleList;
use crate::Result;

/// A rule list together with the name it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub name: String,
    /// Sub-tag, e.g. an attribute of a geosite list
    pub tag: Option<String>,
    pub rules: RuleList,
}

impl Provider {
    pub fn new(name: impl Into<String>, rules: RuleList) -> Self {
        Self {
            name: name.into(),
            tag: None,
            rules,
        }
    }

    pub fn with_tag(name: impl Into<String>, tag: impl Into<String>, rules: RuleList) -> Self {
        Self {
            name: name.into(),
            tag: Some(tag.into()),
            rules,
        }
    }

    pub fn file_name(&self) -> String {
        provider_file_name(&self.name, self.tag.as_deref())
    }
}

/// `<name>.yaml`, or `<name>@<tag>.yaml` for a non-empty tag.
pub fn provider_file_name(name: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) if !tag.is_empty() => format!("{}@{}.yaml", name, tag),
        _ => format!("{}.yaml", name),
    }
}

/// Serialize rules into provider YAML.
pub fn render_payload(rules: &RuleList) -> String {
    if rules.is_empty() {
        return "payload: []\n".to_string();
    }
    let mut out = String::with_capacity(16 + rules.iter().map(|r| r.len() + 7).sum::<usize>());
    out.push_str("payload:\n");
    for rule in rules {
        out.push_str("  - \"");
        out.push_str(&escape(rule));
        out.push_str("\"\n");
    }
    out
}

fn escape(rule: &str) -> std::borrow::Cow<'_, str> {
    if rule.contains(['"', '\\']) {
        rule.replace('\\', "\\\\").replace('"', "\\\"").into()
    } else {
        rule.into()
    }
}

/// Writes providers into an output directory.
pub struct ProviderWriter {
    dir: PathBuf,
}

impl ProviderWriter {
    /// Create a writer, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write one provider, replacing any existing file. Returns its path.
    pub fn write(&self, provider: &Provider) -> Result<PathBuf> {
        let path = self.dir.join(provider.file_name());
        let mut file = BufWriter::new(fs::File::create(&path)?);
        file.write_all(render_payload(&provider.rules).as_bytes())?;
        file.flush()?;
        log::info!("wrote {:?} ({} rules)", path, provider.rules.len());
        Ok(path)
    }

    /// Write every provider. A failed write is logged and skipped.
    ///
    /// Returns the written paths and the file names that could not be written.
    pub fn write_all<'a, I>(&self, providers: I) -> (Vec<PathBuf>, Vec<String>)
    where
        I: IntoIterator<Item = &'a Provider>,
    {
        let mut written = Vec::new();
        let mut failed = Vec::new();
        for provider in providers {
            match self.write(provider) {
                Ok(path) => written.push(path),
                Err(e) => {
                    log::error!("write {}: {}", provider.file_name(), e);
                    failed.push(provider.file_name());
                }
            }
        }
        (written, failed)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderPayload {
    #[serde(default)]
    payload: Vec<String>,
}

/// Read the rules back from a provider file.
pub fn read_payload(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let payload: ProviderPayload = serde_yaml::from_str(&content)?;
    Ok(payload.payload)
}
