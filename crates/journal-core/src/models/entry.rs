use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::User;
use crate::utils::format_date;

/// Reference to an author profile, as embedded by the server when it
/// populates the `author` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AuthorRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Shown for entries whose author is missing, e.g. a deleted account
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Author of an entry. The server sends either a plain name string or a
/// profile object, and `null` when the referenced profile is gone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(untagged)]
pub enum Author {
    Inline(String),
    Profile(AuthorRef),
    #[default]
    Unknown,
}

impl Author {
    /// Resolve the author to a display string.
    ///
    /// A profile without an embedded name is matched against `known` by id;
    /// when nothing matches the raw id is shown.
    pub fn display_name(&self, known: Option<&User>) -> String {
        match self {
            Author::Inline(name) => name.clone(),
            Author::Profile(AuthorRef {
                name: Some(name), ..
            }) => name.clone(),
            Author::Profile(AuthorRef { id, name: None }) => known
                .filter(|user| &user.id == id)
                .map(|user| user.name.clone())
                .unwrap_or_else(|| id.clone()),
            Author::Unknown => UNKNOWN_AUTHOR.to_string(),
        }
    }
}

/// Wire shape of an entry. The server may identify it by `_id` or `id`
/// and timestamp it with `date` or `createdAt`.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    text: String,
    #[serde(default)]
    author: Author,
    date: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawEntry> for Entry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let id = raw
            .mongo_id
            .or(raw.id)
            .ok_or_else(|| "entry has no id".to_string())?;
        let date = raw
            .date
            .or(raw.created_at)
            .ok_or_else(|| format!("entry {} has no date", id))?;
        Ok(Entry {
            id,
            text: raw.text,
            author: raw.author,
            date,
        })
    }
}

/// A journal record. Entries are immutable once the server has created them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    pub id: String,
    pub text: String,
    pub author: Author,
    pub date: DateTime<Utc>,
}

impl Entry {
    pub fn author_display(&self, known: Option<&User>) -> String {
        self.author.display_name(known)
    }

    pub fn date_display(&self) -> String {
        format_date(&self.date)
    }

    /// Decode a server listing item by item. Items that can't be decoded
    /// are logged and skipped so one bad record doesn't hide the rest.
    pub fn decode_list(items: Vec<serde_json::Value>) -> Vec<Entry> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Entry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(index = index, error = %e, "Skipping undecodable entry");
                    None
                }
            })
            .collect()
    }
}

/// Entries seen by this client, newest first.
///
/// The order is whatever the server returned; new entries go to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    items: Vec<Entry>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a fresh server listing
    pub fn replace(&mut self, entries: Vec<Entry>) {
        self.items = entries;
    }

    pub fn prepend(&mut self, entry: Entry) {
        self.items.insert(0, entry);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Entry> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Entry] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
