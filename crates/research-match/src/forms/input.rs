use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Raw submitted value for one field.
///
/// Text inputs arrive as a single string, checkbox lists as a sequence.
/// Numbers and booleans are read as their text so the field rules, not the
/// decoder, decide whether they are acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, or boolean")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(value.to_string())
    }
}

/// One entry of a submitted list. Nulls inside a list are skipped.
struct ListEntry(Option<String>);

impl<'de> Deserialize<'de> for ListEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Option<String>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean, or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Option<String>, E> {
                Ok(None)
            }

            fn visit_none<E: de::Error>(self) -> Result<Option<String>, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Option<String>, D::Error> {
                deserializer.deserialize_any(ScalarVisitor).map(Some)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Option<String>, E> {
                ScalarVisitor.visit_str(value).map(Some)
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Option<String>, E> {
                ScalarVisitor.visit_bool(value).map(Some)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Option<String>, E> {
                ScalarVisitor.visit_i64(value).map(Some)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Option<String>, E> {
                ScalarVisitor.visit_u64(value).map(Some)
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Option<String>, E> {
                ScalarVisitor.visit_f64(value).map(Some)
            }
        }

        deserializer.deserialize_any(EntryVisitor).map(ListEntry)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean, or list of them")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<FieldValue, E> {
                ScalarVisitor.visit_str(value).map(FieldValue::Single)
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<FieldValue, E> {
                Ok(FieldValue::Single(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<FieldValue, E> {
                ScalarVisitor.visit_bool(value).map(FieldValue::Single)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<FieldValue, E> {
                ScalarVisitor.visit_i64(value).map(FieldValue::Single)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<FieldValue, E> {
                ScalarVisitor.visit_u64(value).map(FieldValue::Single)
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<FieldValue, E> {
                ScalarVisitor.visit_f64(value).map(FieldValue::Single)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldValue, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(ListEntry(entry)) = seq.next_element()? {
                    values.extend(entry);
                }
                Ok(FieldValue::Many(values))
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// Submitted key/value pairs for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormInput {
    fields: BTreeMap<String, FieldValue>,
}

/// A `null` value reads the same as a field that was never sent.
impl<'de> Deserialize<'de> for FormInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<FieldValue>>::deserialize(deserializer)?;
        Ok(Self {
            fields: raw
                .into_iter()
                .filter_map(|(name, value)| value.map(|value| (name, value)))
                .collect(),
        })
    }
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_many<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            name.into(),
            FieldValue::Many(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(name.into(), FieldValue::Single(value.into()));
    }

    /// Single-value view. A list contributes its first entry.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Single(value) => Some(value.as_str()),
            FieldValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Multi-value view. Blank entries are dropped.
    pub fn list(&self, name: &str) -> Vec<&str> {
        let values: Vec<&str> = match self.fields.get(name) {
            Some(FieldValue::Single(value)) => vec![value.as_str()],
            Some(FieldValue::Many(values)) => values.iter().map(String::as_str).collect(),
            None => Vec::new(),
        };
        values
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FormInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut input = Self::new();
        for (name, value) in iter {
            input.insert(name, value);
        }
        input
    }
}

/// Messages for every field that failed, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_strings_and_lists() {
        let input: FormInput = serde_json::from_value(serde_json::json!({
            "title": "Compiler internships",
            "languages": ["1", "", "3"],
        }))
        .expect("input parses");

        assert_eq!(input.text("title"), Some("Compiler internships"));
        assert_eq!(input.list("languages"), vec!["1", "3"]);
        assert_eq!(input.list("research_areas"), Vec::<&str>::new());
    }

    #[test]
    fn reads_numbers_and_booleans_as_text() {
        let input: FormInput = serde_json::from_value(serde_json::json!({
            "wanted_gpa": 3.2,
            "time_commitment": 10,
            "remote": true,
            "languages": [2, null, "3"],
            "other_languages": null,
        }))
        .expect("input parses");

        assert_eq!(input.text("wanted_gpa"), Some("3.2"));
        assert_eq!(input.text("time_commitment"), Some("10"));
        assert_eq!(input.text("remote"), Some("true"));
        assert_eq!(input.list("languages"), vec!["2", "3"]);
        assert_eq!(input.text("other_languages"), None);
    }

    #[test]
    fn nested_objects_are_refused() {
        let result: Result<FormInput, _> =
            serde_json::from_value(serde_json::json!({ "title": { "text": "x" } }));
        assert!(result.is_err());
    }

    #[test]
    fn errors_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Invalid email address.");
        errors.push("email", "Field cannot be longer than 10 characters.");
        errors.push("title", "This field is required.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email").len(), 2);
        assert!(errors.get("missing").is_empty());
        assert_eq!(
            errors.to_string(),
            "email: Invalid email address.; email: Field cannot be longer than 10 characters.; title: This field is required."
        );
    }
}
