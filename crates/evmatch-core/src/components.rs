use std::collections::BTreeMap;
use std::fmt;

use evmatch_template::Tag;
use serde::{Serialize, Serializer};

/// Tag values extracted from (or used to build) a name.
///
/// Tags a template does not mention are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Components(BTreeMap<Tag, String>);

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, tag: Tag, value: impl Into<String>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn insert(&mut self, tag: Tag, value: impl Into<String>) {
        self.0.insert(tag, value.into());
    }

    pub fn get(&self, tag: Tag) -> Option<&str> {
        self.0.get(&tag).map(String::as_str)
    }

    /// True when `tag` has a non-empty value.
    pub fn has(&self, tag: Tag) -> bool {
        self.get(tag).is_some_and(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &str)> {
        self.0.iter().map(|(t, v)| (*t, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Tag, S)> for Components {
    fn from_iter<I: IntoIterator<Item = (Tag, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, v)| (t, v.into())).collect())
    }
}

impl Serialize for Components {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(t, v)| (t.as_str(), v)))
    }
}

pub(crate) fn serialize_tag<S: Serializer>(tag: &Tag, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tag.as_str())
}

/// Which parse strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    Strict,
    Flexible,
    Fuzzy,
}

/// Successful parse of one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedName {
    pub components: Components,
    /// Iterator marker stripped before splitting (`01`, `B`, `B_01`), if any.
    pub iterator: Option<String>,
    pub strategy: ParseStrategy,
}

/// A name no parse strategy could decompose.
///
/// Not an error: the matcher reports the file as an orphan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseMiss {
    pub name: String,
    /// Tokens found after stripping extension and iterator markers.
    pub tokens: usize,
    /// Positional slots the template needs filled.
    pub slots: usize,
}

impl fmt::Display for ParseMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} splits into {} token(s); template needs {}",
            self.name, self.tokens, self.slots
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_ignores_empty_values() {
        let c = Components::new()
            .with(Tag::Prefix, "Sfx")
            .with(Tag::Feature, "");
        assert!(c.has(Tag::Prefix));
        assert!(!c.has(Tag::Feature));
        assert!(!c.has(Tag::Action));
    }

    #[test]
    fn serializes_with_tag_names() {
        let c: Components = [(Tag::Action, "Attack"), (Tag::Prefix, "Sfx")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"prefix":"Sfx","action":"Attack"}"#);
    }
}
