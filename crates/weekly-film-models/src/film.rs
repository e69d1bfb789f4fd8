use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One upcoming film as delivered by the feed.
///
/// The feed is not consistent about key names (`title` vs `name`, `picUrl` vs
/// `picurl`, ...), so the record keeps the raw JSON object verbatim and
/// resolves aliases on read. Unknown fields are preserved so the full list
/// can be republished unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FilmRecord {
    fields: Map<String, Value>,
}

impl FilmRecord {
    /// Build a record from an arbitrary `data` entry.
    /// Anything other than a JSON object becomes an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Text of a single field, or `None` when it is missing, `null` or empty.
    /// Numbers and booleans are read as their textual form.
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.fields.get(key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First non-empty value among `keys`, in order.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }
}
