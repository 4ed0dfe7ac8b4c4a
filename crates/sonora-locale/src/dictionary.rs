use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;

/// One value in a locale dictionary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<Entry>),
    Table(BTreeMap<String, Entry>),
}

impl Entry {
    /// Text form of scalar entries, `None` for lists and tables
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Entry::Text(text) => Some(Cow::Borrowed(text)),
            Entry::Number(number) => Some(Cow::Owned(number.to_string())),
            Entry::Flag(flag) => Some(Cow::Owned(flag.to_string())),
            Entry::List(_) | Entry::Table(_) => None,
        }
    }
}

/// Immutable translation table for a single locale
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    root: BTreeMap<String, Entry>,
}

impl Dictionary {
    /// Parse a whole dictionary document. The top level must be an object.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        match serde_json::from_str::<Entry>(json)? {
            Entry::Table(root) => Ok(Self { root }),
            _ => Err(LoadError::NotATable),
        }
    }

    /// Walk a dotted key path; only tables are descended into
    pub fn get(&self, key: &str) -> Option<&Entry> {
        let mut segments = key.split('.');
        let mut current = self.root.get(segments.next()?)?;

        for segment in segments {
            match current {
                Entry::Table(table) => current = table.get(segment)?,
                _ => return None,
            }
        }

        Some(current)
    }

    /// Dotted paths of every non-table value
    pub fn leaf_keys(&self) -> Vec<String> {
        fn collect(prefix: &str, table: &BTreeMap<String, Entry>, out: &mut Vec<String>) {
            for (name, entry) in table {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                match entry {
                    Entry::Table(inner) => collect(&path, inner, out),
                    _ => out.push(path),
                }
            }
        }

        let mut keys = Vec::new();
        collect("", &self.root, &mut keys);
        keys
    }
}

/// Resolved text for `key`, if the path ends at a string or at a list whose
/// first element is a string
pub fn lookup<'a>(dictionary: &'a Dictionary, key: &str) -> Option<&'a str> {
    match dictionary.get(key)? {
        Entry::Text(text) => Some(text),
        Entry::List(items) => match items.first() {
            Some(Entry::Text(text)) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

/// Scalar lookup that never fails: unresolved keys come back unchanged
pub fn resolve<'a>(dictionary: &'a Dictionary, key: &'a str) -> &'a str {
    lookup(dictionary, key).unwrap_or_else(|| {
        tracing::trace!("Missing translation for '{key}'");
        key
    })
}

/// List lookup that never fails: a string leaf becomes a single item,
/// anything else unresolved becomes an empty list
pub fn resolve_list<'a>(dictionary: &'a Dictionary, key: &str) -> Vec<&'a Entry> {
    match dictionary.get(key) {
        Some(Entry::List(items)) => items.iter().collect(),
        Some(entry @ Entry::Text(_)) => vec![entry],
        _ => {
            tracing::trace!("No translation list for '{key}'");
            Vec::new()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Dictionary root must be an object")]
    NotATable,
}
