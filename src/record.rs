//! Ad record data model
//!
//! One [`AdRecord`] is built per visited detail page and appended to the
//! batch that eventually becomes the exported tables. A record is an
//! insertion-ordered mapping from field name to [`FieldValue`]; fixed fields
//! are written first by the extractor, dynamically discovered detail fields
//! are merged in afterwards.

use url::Url;

/// Field name under which every record stores its source URL
pub const URL_FIELD: &str = "url_anuncio";

/// A single extracted value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Cleaned text content
    Text(String),
    /// Parsed monetary value
    Float(f64),
    /// Parsed count or measurement
    Int(i64),
    /// The selector matched nothing, or the value could not be interpreted
    Null,
}

impl FieldValue {
    /// Returns true for [`FieldValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value as a CSV cell (`Null` becomes the empty string)
    pub fn to_cell(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Float(v) => v.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Null => String::new(),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => Self::Text(s),
            None => Self::Null,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Self::Float(v),
            None => Self::Null,
        }
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(n) => Self::Int(n),
            None => Self::Null,
        }
    }
}

/// One flat record per ad, in field insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct AdRecord {
    fields: Vec<(String, FieldValue)>,
}

impl AdRecord {
    /// Creates a record identified by its source URL
    pub fn new(ad_url: &Url) -> Self {
        Self {
            fields: vec![(URL_FIELD.to_string(), FieldValue::Text(ad_url.to_string()))],
        }
    }

    /// Sets a field, replacing an existing value in place (the field keeps
    /// its original position) or appending a new one.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Returns the value of a field, if the record carries it
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Merges dynamically discovered detail fields into the record.
    ///
    /// A detail label that collides with an already-set field name
    /// overwrites it (last write wins). Stricter policies, such as
    /// namespacing the dynamic fields, would replace the body of this
    /// method only.
    pub fn merge_details(&mut self, details: Vec<(String, FieldValue)>) {
        for (name, value) in details {
            self.set(name, value);
        }
    }

    /// Iterates over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// The source URL this record was extracted from
    pub fn url(&self) -> &str {
        match self.get(URL_FIELD) {
            Some(FieldValue::Text(url)) => url,
            _ => "",
        }
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
