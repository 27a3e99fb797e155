//! Exact-match filters and partial updates over book documents

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::book::{Book, BookInput, BOOK_FIELDS};

impl Book {
    /// Value of an external field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "edition" => Some(&self.edition),
            "pages" => Some(&self.pages),
            "year" => Some(&self.year),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "id" => Some(&mut self.id),
            "title" => Some(&mut self.title),
            "author" => Some(&mut self.author),
            "edition" => Some(&mut self.edition),
            "pages" => Some(&mut self.pages),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

fn to_object(fields: &IndexMap<&'static str, String>) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
        .collect();
    Value::Object(map)
}

/// Field-value equality filter. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    fields: IndexMap<&'static str, String>,
}

impl BookFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Match on all six external fields, empty strings included
    pub fn exact(book: &Book) -> Self {
        let fields = BOOK_FIELDS
            .iter()
            .map(|name| (*name, book.field(name).unwrap_or_default().to_string()))
            .collect();
        Self { fields }
    }

    /// Match on the five fields other than the logical id
    pub fn exact_except_id(book: &Book) -> Self {
        let mut filter = Self::exact(book);
        filter.fields.shift_remove("id");
        filter
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.fields
            .iter()
            .all(|(name, value)| book.field(name) == Some(value.as_str()))
    }

    /// JSON object form, used for containment queries
    pub fn to_json(&self) -> Value {
        to_object(&self.fields)
    }
}

/// Set of fields to overwrite on one document.
///
/// Only non-empty inputs are kept: an empty string means "leave unchanged",
/// so a field cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    fields: IndexMap<&'static str, String>,
}

impl BookPatch {
    pub fn from_input(input: &BookInput) -> Self {
        let mut fields = IndexMap::new();
        for (name, value) in [
            ("title", &input.title),
            ("author", &input.author),
            ("edition", &input.edition),
            ("pages", &input.pages),
            ("year", &input.year),
        ] {
            if !value.is_empty() {
                fields.insert(name, value.clone());
            }
        }
        Self { fields }
    }

    pub fn apply(&self, book: &mut Book) {
        for (name, value) in &self.fields {
            if let Some(slot) = book.field_mut(name) {
                *slot = value.clone();
            }
        }
    }

    pub fn to_json(&self) -> Value {
        to_object(&self.fields)
    }
}
