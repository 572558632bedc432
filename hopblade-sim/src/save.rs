//! Save-Data Converter
//!
//! Transcodes a save document between human-editable JSON and a compact
//! binary file.
//!
//! ## Binary layout
//!
//! ```text
//! ┌──────────┬─────────────┬──────────────────────────────┐
//! │ "HBSV"   │ version u16 │ bincode(SaveNode)            │
//! │ 4 bytes  │ LE          │ root is always a Mapping     │
//! └──────────┴─────────────┴──────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bincode::Options;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// File magic.
pub const SAVE_MAGIC: [u8; 4] = *b"HBSV";

/// Current binary format version.
pub const SAVE_FORMAT_VERSION: u16 = 1;

/// Header length (magic + version).
pub const HEADER_LEN: usize = 6;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Converter errors.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Input path does not exist
    #[error("input file not found: {0:?}")]
    NotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON input could not be parsed
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Binary encoding failed
    #[error("encode error: {0}")]
    Encode(#[source] bincode::Error),

    /// Binary body could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] bincode::Error),

    /// First four bytes are not the save magic
    #[error("not a save file (bad magic)")]
    BadMagic,

    /// File is shorter than the header
    #[error("file ends inside the header")]
    Truncated,

    /// Header carries a version this build cannot read
    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u16),

    /// Bytes left over after the document
    #[error("{0} trailing bytes after document")]
    TrailingBytes(usize),

    /// JSON null at the given path
    #[error("null value at {0} cannot be stored")]
    NullValue(String),

    /// NaN or infinity at the given path
    #[error("non-finite number at {0} cannot be written as JSON")]
    NonFinite(String),

    /// Top-level node is not a mapping
    #[error("document root must be a mapping")]
    RootNotMapping,
}

/// One node of a save document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SaveNode {
    /// Keyed children, sorted by key
    Mapping(BTreeMap<String, SaveNode>),
    /// Ordered children
    Sequence(Vec<SaveNode>),
    /// Text scalar
    String(String),
    /// Every JSON number, integral or not
    Number(f64),
    /// Boolean scalar
    Boolean(bool),
}

impl SaveNode {
    /// Convert a parsed JSON value.
    ///
    /// Fails on `null` anywhere in the tree, naming the offending path.
    pub fn from_json(value: &Value) -> Result<Self, SaveError> {
        Self::from_json_at(value, "$")
    }

    fn from_json_at(value: &Value, path: &str) -> Result<Self, SaveError> {
        Ok(match value {
            Value::Null => return Err(SaveError::NullValue(path.to_string())),
            Value::Bool(b) => SaveNode::Boolean(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => SaveNode::Number(f),
                None => return Err(SaveError::NonFinite(path.to_string())),
            },
            Value::String(s) => SaveNode::String(s.clone()),
            Value::Array(items) => SaveNode::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Self::from_json_at(item, &format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => SaveNode::Mapping(
                map.iter()
                    .map(|(key, item)| {
                        Ok((key.clone(), Self::from_json_at(item, &format!("{path}.{key}"))?))
                    })
                    .collect::<Result<_, SaveError>>()?,
            ),
        })
    }

    /// Convert back to a JSON value.
    ///
    /// Integral numbers within ±2^53 come out as JSON integers.
    pub fn to_json(&self) -> Result<Value, SaveError> {
        self.to_json_at("$")
    }

    fn to_json_at(&self, path: &str) -> Result<Value, SaveError> {
        Ok(match self {
            SaveNode::Boolean(b) => Value::Bool(*b),
            SaveNode::String(s) => Value::String(s.clone()),
            SaveNode::Number(n) => number_to_json(*n, path)?,
            SaveNode::Sequence(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| item.to_json_at(&format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            SaveNode::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| Ok((key.clone(), item.to_json_at(&format!("{path}.{key}"))?)))
                    .collect::<Result<_, SaveError>>()?,
            ),
        })
    }

    /// Is this a mapping?
    #[inline]
    pub fn is_mapping(&self) -> bool {
        matches!(self, SaveNode::Mapping(_))
    }
}

fn number_to_json(n: f64, path: &str) -> Result<Value, SaveError> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| SaveError::NonFinite(path.to_string()))
}

/// Encode a document: header, then the bincode tree.
pub fn encode_document(root: &SaveNode) -> Result<Vec<u8>, SaveError> {
    if !root.is_mapping() {
        return Err(SaveError::RootNotMapping);
    }

    let body = bincode::serialize(root).map_err(SaveError::Encode)?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&SAVE_MAGIC);
    bytes.extend_from_slice(&SAVE_FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode a document produced by [`encode_document`].
pub fn decode_document(bytes: &[u8]) -> Result<SaveNode, SaveError> {
    if bytes.len() < SAVE_MAGIC.len() || bytes[..SAVE_MAGIC.len()] != SAVE_MAGIC {
        return Err(SaveError::BadMagic);
    }
    if bytes.len() < HEADER_LEN {
        return Err(SaveError::Truncated);
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != SAVE_FORMAT_VERSION {
        return Err(SaveError::UnsupportedVersion(version));
    }

    // Same encoding as `bincode::serialize`, but a length prefix can never
    // claim more bytes than the file holds.
    let mut body = &bytes[HEADER_LEN..];
    let root: SaveNode = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(body.len() as u64)
        .deserialize_from(&mut body)?;
    if !body.is_empty() {
        return Err(SaveError::TrailingBytes(body.len()));
    }
    if !root.is_mapping() {
        return Err(SaveError::RootNotMapping);
    }

    Ok(root)
}

/// Parse JSON text into a document.
pub fn document_from_json_str(text: &str) -> Result<SaveNode, SaveError> {
    let value: Value = serde_json::from_str(text)?;
    let root = SaveNode::from_json(&value)?;
    if !root.is_mapping() {
        return Err(SaveError::RootNotMapping);
    }
    Ok(root)
}

/// Render a document as pretty JSON (two-space indent, trailing newline).
pub fn document_to_json_string(root: &SaveNode) -> Result<String, SaveError> {
    if !root.is_mapping() {
        return Err(SaveError::RootNotMapping);
    }
    let mut text = serde_json::to_string_pretty(&root.to_json()?)?;
    text.push('\n');
    Ok(text)
}

fn read_input(path: &Path) -> Result<Vec<u8>, SaveError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SaveError::NotFound(path.to_path_buf()),
        _ => SaveError::Io(e),
    })
}

/// Convert a JSON save file into the binary format.
pub fn json_to_binary(json_path: &Path, bin_path: &Path) -> Result<(), SaveError> {
    let raw = read_input(json_path)?;
    let text = String::from_utf8(raw)
        .map_err(|e| SaveError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    let root = document_from_json_str(&text)?;
    let bytes = encode_document(&root)?;
    fs::write(bin_path, &bytes)?;

    info!(
        "Converted {} -> {} ({} bytes)",
        json_path.display(),
        bin_path.display(),
        bytes.len()
    );
    Ok(())
}

/// Convert a binary save file back into JSON.
pub fn binary_to_json(bin_path: &Path, json_path: &Path) -> Result<(), SaveError> {
    let bytes = read_input(bin_path)?;
    let root = decode_document(&bytes)?;
    let text = document_to_json_string(&root)?;
    fs::write(json_path, text)?;

    info!("Converted {} -> {}", bin_path.display(), json_path.display());
    Ok(())
}
