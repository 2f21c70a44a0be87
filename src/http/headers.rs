use std::collections::HashMap;
use std::collections::hash_map;

use crate::http::parser::ParseError;

const CRLF: &[u8] = b"\r\n";

/// Characters allowed in a field name besides ASCII letters and digits.
const TOKEN_SPECIALS: &str = "-!#$%&'*+.^_`|~";

/// HTTP header fields keyed by lower-cased name.
///
/// Repeated names are folded into a single comma-separated value. The
/// container is unordered: iteration (and therefore serialization) order is
/// whatever the underlying `HashMap` yields and must not be relied upon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// terminates the header section was reached:
    ///
    /// - `(2, true)` when `data` starts with `\r\n`
    /// - `(0, false)` when no complete line is buffered yet
    /// - `(line length + 2, false)` after storing one field
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        if data.starts_with(CRLF) {
            return Ok((CRLF.len(), true));
        }

        let Some(line_end) = find_crlf(data) else {
            return Ok((0, false));
        };

        let line = std::str::from_utf8(&data[..line_end])
            .map_err(|_| ParseError::InvalidHeaderFormat("header line is not valid UTF-8".into()))?
            .trim();

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeaderFormat("no colon found".into()))?;

        // Only the separator itself may not be doubled; values such as
        // "[::1]:42069" keep their colons.
        if value.starts_with(':') {
            return Err(ParseError::InvalidHeaderFormat("double colon found".into()));
        }

        if name.trim_end() != name {
            return Err(ParseError::InvalidHeaderFormat("space before colon found".into()));
        }

        if !is_valid_field_name(name) {
            return Err(ParseError::InvalidHeaderFormat(format!(
                "invalid character in field name {:?}",
                name
            )));
        }

        self.add(name, value);

        Ok((line_end + CRLF.len(), false))
    }

    /// Adds a field, folding it into an existing value of the same name.
    ///
    /// The value is trimmed of surrounding whitespace and of leading and
    /// trailing commas before it is stored.
    pub fn add(&mut self, name: &str, value: &str) {
        let value = value.trim().trim_matches(',');

        match self.fields.entry(name.to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let merged = entry.get_mut();
                merged.push_str(", ");
                merged.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_string());
            }
        }
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || TOKEN_SPECIALS.contains(c))
}
