//! Front-matter parsing

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::helpers::parse_date_string;

/// Line that opens and closes a front-matter block
const MARKER: &str = "---";

/// Visitor accepting any YAML scalar as text, so `title: 2024` stays a title
struct ScalarVisitor;

impl<'de> serde::de::Visitor<'de> for ScalarVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: serde::de::Error>(
        self,
        value: String,
    ) -> std::result::Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: serde::de::Error>(self, value: f64) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_bool<E: serde::de::Error>(self, value: bool) -> std::result::Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }
}

/// A scalar list element, rendered as text
struct Scalar(Option<String>);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(Scalar)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor)
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
                vec.extend(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter fields recognised by the indexer.
///
/// Unknown keys (`categories`, `layout`, ...) are accepted and dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub updated: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Split a file into its front-matter and the verbatim body that follows.
    ///
    /// The file must open with a `---` line and the block must be closed by
    /// another `---` line; anything else is malformed.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');

        let start = match lines.next() {
            Some(first) if is_marker(first) => first.len(),
            _ => return Err(Error::malformed(path, "missing opening `---` marker")),
        };
        let mut offset = start;

        for line in lines {
            if is_marker(line) {
                let yaml = &content[start..offset];
                let body = &content[offset + line.len()..];
                return Ok((Self::parse_yaml(path, yaml)?, body));
            }
            offset += line.len();
        }

        Err(Error::malformed(path, "unterminated front-matter block"))
    }

    fn parse_yaml(path: &Path, yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<FrontMatter>(yaml).map_err(|e| Error::malformed(path, e.to_string()))
    }

    /// The required, non-blank title
    pub fn require_title(&self, path: &Path) -> Result<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::MissingField {
                path: path.to_path_buf(),
                field: "title",
            })
    }

    /// The required publication date
    pub fn require_date(&self, path: &Path, tz: &Tz) -> Result<DateTime<FixedOffset>> {
        let raw = self
            .date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::MissingField {
                path: path.to_path_buf(),
                field: "date",
            })?;
        parse_date_string(raw, tz).ok_or_else(|| Error::InvalidDate {
            path: path.to_path_buf(),
            field: "date",
            value: raw.to_string(),
        })
    }

    /// The optional last-updated date; present but unparseable is an error
    pub fn parse_updated(&self, path: &Path, tz: &Tz) -> Result<Option<DateTime<FixedOffset>>> {
        match self.updated.as_deref().filter(|d| !d.trim().is_empty()) {
            None => Ok(None),
            Some(raw) => parse_date_string(raw, tz)
                .map(Some)
                .ok_or_else(|| Error::InvalidDate {
                    path: path.to_path_buf(),
                    field: "updated",
                    value: raw.to_string(),
                }),
        }
    }

    /// Tags split on commas, normalized, and de-duplicated in first-seen order
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tags
            .iter()
            .flat_map(|t| t.split(','))
            .map(normalize_tag)
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }
}

/// Canonical form of a tag: trimmed and lower-cased
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}
