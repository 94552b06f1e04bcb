//! Parser for geosite list files.
//!
//! ```text
//! # comment
//! include:google-ads @ads
//! domain:example.com @cn
//! full:www.example.org
//! keyword:tracker
//! regexp:^ad[0-9]+\.example\.net$
//! example.net            # same as domain:example.net
//! ```

/// Kind of a geosite entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Domain and all of its subdomains
    Domain,
    /// Exactly this domain
    Full,
    /// Any domain containing the keyword
    Keyword,
    /// Any domain matching the regular expression
    Regexp,
}

/// One domain entry with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub value: String,
    /// Attribute names without the leading `@`
    pub attrs: Vec<String>,
}

impl Entry {
    pub fn new(kind: EntryKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            attrs: Vec::new(),
        }
    }

    pub fn has_attr(&self, attr: &str) -> bool {
        self.attrs.iter().any(|a| a == attr)
    }
}

/// Attribute filter on an `include:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrFilter {
    /// `@attr`: keep entries carrying the attribute
    Has(String),
    /// `@-attr`: keep entries without the attribute
    Lacks(String),
}

impl AttrFilter {
    pub fn accepts(&self, entry: &Entry) -> bool {
        match self {
            AttrFilter::Has(attr) => entry.has_attr(attr),
            AttrFilter::Lacks(attr) => !entry.has_attr(attr),
        }
    }
}

/// An `include:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub list: String,
    pub filters: Vec<AttrFilter>,
}

impl Include {
    pub fn accepts(&self, entry: &Entry) -> bool {
        self.filters.iter().all(|f| f.accepts(entry))
    }
}

/// A parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Entry(Entry),
    Include(Include),
}

/// Contents of one list file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFile {
    pub entries: Vec<Entry>,
    pub includes: Vec<Include>,
}

/// Parse a single line. Comments, empty lines and unknown rule types yield `None`.
pub fn parse_line(line: &str) -> Option<Line> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let mut tokens = line.split_whitespace();
    let rule = tokens.next()?;

    let (kind, value) = match rule.split_once(':') {
        Some((kind, value)) => (kind.to_lowercase(), value),
        None => ("domain".to_string(), rule),
    };
    if value.is_empty() {
        return None;
    }

    let attrs = tokens.filter_map(|t| t.strip_prefix('@'));

    if kind == "include" {
        let filters = attrs
            .filter(|a| !a.is_empty())
            .map(|a| match a.strip_prefix('-') {
                Some(attr) => AttrFilter::Lacks(attr.to_lowercase()),
                None => AttrFilter::Has(a.to_lowercase()),
            })
            .collect();
        return Some(Line::Include(Include {
            list: value.to_lowercase(),
            filters,
        }));
    }

    let kind = match kind.as_str() {
        "domain" => EntryKind::Domain,
        "full" => EntryKind::Full,
        "keyword" => EntryKind::Keyword,
        "regexp" => EntryKind::Regexp,
        _ => return None,
    };
    let value = match kind {
        EntryKind::Regexp => value.to_string(),
        EntryKind::Domain => value.trim_start_matches('.').to_lowercase(),
        _ => value.to_lowercase(),
    };
    if value.is_empty() {
        return None;
    }

    Some(Line::Entry(Entry {
        kind,
        value,
        attrs: attrs
            .filter(|a| !a.is_empty())
            .map(str::to_lowercase)
            .collect(),
    }))
}

/// Parse a whole list file.
pub fn parse_list(content: &str) -> ListFile {
    let mut list = ListFile::default();
    for line in content.lines() {
        match parse_line(line) {
            Some(Line::Entry(entry)) => list.entries.push(entry),
            Some(Line::Include(include)) => list.includes.push(include),
            None => {}
        }
    }
    list
}
