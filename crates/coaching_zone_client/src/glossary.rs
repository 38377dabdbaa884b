//! Glossary terms and their detection for outbound category hints.

use regex::RegexBuilder;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Term → explanation pairs in configured order. Stored as a YAML mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary(Vec<(String, String)>);

impl Glossary {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == term)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Glossary {
    /// A repeated term replaces the earlier explanation but keeps its position.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (k, v) in iter {
            let (k, v) = (k.into(), v.into());
            match entries.iter_mut().find(|(existing, _)| *existing == k) {
                Some(entry) => entry.1 = v,
                None => entries.push((k, v)),
            }
        }
        Self(entries)
    }
}

impl Serialize for Glossary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct GlossaryVisitor;

impl<'de> Visitor<'de> for GlossaryVisitor {
    type Value = Glossary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of glossary terms to explanations")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Glossary, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<String, String>()? {
            entries.push((k, v));
        }
        Ok(entries.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GlossaryVisitor)
    }
}

/// Glossary terms that occur in `text` as whole words, ignoring case, in
/// glossary order.
pub fn detect_hits(glossary: &Glossary, text: &str) -> Vec<String> {
    glossary
        .terms()
        .filter(|term| {
            let pattern = format!(r"(^|\b){}(\b|$)", regex::escape(term));
            match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                Ok(re) => re.is_match(text),
                Err(_) => false,
            }
        })
        .map(str::to_string)
        .collect()
}
