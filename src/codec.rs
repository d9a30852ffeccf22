//! Encoding and decoding of the payload file.
//!
//! A codec turns the whole item set into the payload file's text content
//! and back. The two directions must be mutually inverse up to set
//! equality; byte stability is not required, but a deterministic
//! encoding (guaranteed here by `BTreeSet` ordering) lets the store
//! detect "nothing changed" by comparing file content.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Encodes and decodes the full item set.
pub trait SetCodec<T> {
    fn encode(&self, items: &BTreeSet<T>) -> Result<String>;
    fn decode(&self, content: &str) -> Result<BTreeSet<T>>;
}

// ---------------------------------------------------------------------------
// JsonLines
// ---------------------------------------------------------------------------

/// One JSON document per line.
///
/// Blank lines are ignored on decode; any other undecodable line is a
/// hard [`Error::Corrupt`]. Corruption must surface, not be skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLines<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonLines<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> SetCodec<T> for JsonLines<T>
where
    T: Serialize + DeserializeOwned + Ord,
{
    fn encode(&self, items: &BTreeSet<T>) -> Result<String> {
        let mut out = String::new();
        for item in items {
            let line = serde_json::to_string(item)
                .map_err(|e| Error::corrupt(format!("unencodable item: {}", e)))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    fn decode(&self, content: &str) -> Result<BTreeSet<T>> {
        let mut items = BTreeSet::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let item = serde_json::from_str(line)
                .map_err(|e| Error::corrupt(format!("line {}: {}", lineno + 1, e)))?;
            items.insert(item);
        }
        Ok(items)
    }
}
