//! RADIUS Attribute Dictionary
//!
//! Maps attribute names to their numeric code and data type, and optionally
//! enumerated `VALUE` names for integer attributes. The source format is the
//! FreeRADIUS dictionary syntax:
//!
//! ```text
//! ATTRIBUTE   User-Name        1   string
//! ATTRIBUTE   User-Password    2   string  encrypt=1
//! VALUE       Service-Type     Framed-User  2
//! $INCLUDE    dictionary.local
//! ```
//!
//! Vendor blocks (`VENDOR`, `BEGIN-VENDOR` .. `END-VENDOR`) are accepted but
//! their contents are skipped.
//!
//! A dictionary is immutable once built. [`Dictionary::global`] hands out the
//! process-wide instance, loading it exactly once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

/// Dictionary compiled into the crate
const BUILTIN_DICTIONARY: &str = include_str!("dictionary.rfc");

/// Environment variable naming a dictionary file to load instead of the built-in one
pub const DICTIONARY_ENV: &str = "RADIUS_DICTIONARY";

/// Maximum `$INCLUDE` nesting
const MAX_INCLUDE_DEPTH: usize = 8;

static GLOBAL: OnceLock<Result<Arc<Dictionary>, DictionaryError>> = OnceLock::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Cannot read dictionary {path}: {message}")]
    Io { path: String, message: String },
    #[error("{origin}:{line}: {message}")]
    Syntax {
        origin: String,
        line: usize,
        message: String,
    },
    #[error("Duplicate attribute name: {0}")]
    DuplicateName(String),
    #[error("Duplicate attribute code {code} ({name})")]
    DuplicateCode { code: u8, name: String },
    #[error("VALUE {value} refers to unknown attribute {attribute}")]
    UnknownValueAttribute { attribute: String, value: String },
    #[error("Global dictionary already initialized")]
    AlreadyInitialized,
}

/// Attribute data types understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Octets,
    Integer,
    Byte,
    Short,
    Integer64,
    Signed,
    IpAddr,
    Ipv6Addr,
    Ipv6Prefix,
    Date,
}

impl DataType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" => Some(DataType::String),
            "octets" => Some(DataType::Octets),
            "integer" => Some(DataType::Integer),
            "byte" => Some(DataType::Byte),
            "short" => Some(DataType::Short),
            "integer64" => Some(DataType::Integer64),
            "signed" => Some(DataType::Signed),
            "ipaddr" => Some(DataType::IpAddr),
            "ipv6addr" => Some(DataType::Ipv6Addr),
            "ipv6prefix" => Some(DataType::Ipv6Prefix),
            "date" => Some(DataType::Date),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Octets => "octets",
            DataType::Integer => "integer",
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Integer64 => "integer64",
            DataType::Signed => "signed",
            DataType::IpAddr => "ipaddr",
            DataType::Ipv6Addr => "ipv6addr",
            DataType::Ipv6Prefix => "ipv6prefix",
            DataType::Date => "date",
        }
    }

    /// Whether `VALUE` names may be attached to this type
    pub fn is_enumerable(self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::Byte | DataType::Short | DataType::Integer64
        )
    }
}

/// How an attribute is hidden on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encryption {
    #[default]
    None,
    /// RFC 2865 Section 5.2 (`encrypt=1`)
    UserPassword,
}

/// A single `ATTRIBUTE` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub code: u8,
    pub data_type: DataType,
    pub encryption: Encryption,
}

/// Immutable attribute directory
#[derive(Debug, Default)]
pub struct Dictionary {
    by_name: HashMap<String, Arc<AttributeDef>>,
    by_code: HashMap<u8, Arc<AttributeDef>>,
    value_numbers: HashMap<(u8, String), u64>,
    value_names: HashMap<(u8, u64), String>,
}

impl Dictionary {
    /// Parse the dictionary compiled into the crate
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::parse_str(BUILTIN_DICTIONARY, "<builtin>")
    }

    /// Parse dictionary text. `$INCLUDE` is rejected since there is no base directory.
    pub fn parse_str(text: &str, origin: &str) -> Result<Self, DictionaryError> {
        let mut builder = Builder::default();
        builder.parse(text, origin, None, 0)?;
        builder.finish()
    }

    /// Load a dictionary file, following `$INCLUDE` relative to the including file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let mut builder = Builder::default();
        builder.parse_file(path.as_ref(), 0)?;
        builder.finish()
    }

    /// Process-wide dictionary, loaded on first use.
    ///
    /// Loads the file named by `RADIUS_DICTIONARY` when set, the built-in
    /// dictionary otherwise. A failed load is remembered; every later call
    /// returns the same error.
    pub fn global() -> Result<Arc<Dictionary>, DictionaryError> {
        GLOBAL
            .get_or_init(|| {
                let loaded = match std::env::var_os(DICTIONARY_ENV) {
                    Some(path) => Self::from_file(PathBuf::from(path)),
                    None => Self::builtin(),
                };
                match &loaded {
                    Ok(dict) => info!(attributes = dict.len(), "RADIUS dictionary loaded"),
                    Err(e) => tracing::error!(error = %e, "RADIUS dictionary failed to load"),
                }
                loaded.map(Arc::new)
            })
            .clone()
    }

    /// Install `dictionary` as the process-wide instance.
    ///
    /// Must happen before the first call to [`Dictionary::global`].
    pub fn install_global(dictionary: Dictionary) -> Result<Arc<Dictionary>, DictionaryError> {
        let dictionary = Arc::new(dictionary);
        GLOBAL
            .set(Ok(Arc::clone(&dictionary)))
            .map_err(|_| DictionaryError::AlreadyInitialized)?;
        Ok(dictionary)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&Arc<AttributeDef>> {
        self.by_name.get(name)
    }

    pub fn lookup_by_code(&self, code: u8) -> Option<&Arc<AttributeDef>> {
        self.by_code.get(&code)
    }

    /// Number for a `VALUE` name of the attribute with `code`
    pub fn value_number(&self, code: u8, name: &str) -> Option<u64> {
        self.value_numbers.get(&(code, name.to_string())).copied()
    }

    /// First `VALUE` name defined for `number` on the attribute with `code`
    pub fn value_name(&self, code: u8, number: u64) -> Option<&str> {
        self.value_names.get(&(code, number)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// All attribute definitions ordered by code
    pub fn attributes(&self) -> Vec<&Arc<AttributeDef>> {
        let mut defs: Vec<_> = self.by_code.values().collect();
        defs.sort_by_key(|d| d.code);
        defs
    }
}

struct PendingValue {
    attribute: String,
    name: String,
    number: u64,
    origin: String,
    line: usize,
}

#[derive(Default)]
struct Builder {
    dict: Dictionary,
    values: Vec<PendingValue>,
    vendor_depth: usize,
}

impl Builder {
    fn parse_file(&mut self, path: &Path, depth: usize) -> Result<(), DictionaryError> {
        let text = fs::read_to_string(path).map_err(|e| DictionaryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Reading dictionary file");
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.parse(&text, &path.display().to_string(), Some(&base), depth)
    }

    fn parse(
        &mut self,
        text: &str,
        origin: &str,
        base: Option<&Path>,
        depth: usize,
    ) -> Result<(), DictionaryError> {
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let syntax = |message: String| DictionaryError::Syntax {
                origin: origin.to_string(),
                line: line_no,
                message,
            };
            let fields: Vec<&str> = line.split_whitespace().collect();

            match fields[0] {
                "$INCLUDE" => {
                    let target = fields
                        .get(1)
                        .ok_or_else(|| syntax("$INCLUDE needs a file name".to_string()))?;
                    let base = base.ok_or_else(|| {
                        syntax("$INCLUDE is only allowed in dictionary files".to_string())
                    })?;
                    if depth >= MAX_INCLUDE_DEPTH {
                        return Err(syntax(format!("$INCLUDE nested deeper than {}", MAX_INCLUDE_DEPTH)));
                    }
                    let target = Path::new(target);
                    let path = if target.is_absolute() {
                        target.to_path_buf()
                    } else {
                        base.join(target)
                    };
                    self.parse_file(&path, depth + 1)?;
                }
                "VENDOR" => {}
                "BEGIN-VENDOR" => self.vendor_depth += 1,
                "END-VENDOR" => {
                    if self.vendor_depth == 0 {
                        return Err(syntax("END-VENDOR without BEGIN-VENDOR".to_string()));
                    }
                    self.vendor_depth -= 1;
                }
                "ATTRIBUTE" => {
                    if fields.len() < 4 {
                        return Err(syntax("ATTRIBUTE needs a name, code and type".to_string()));
                    }
                    // A trailing vendor name (old-style) places the attribute in a vendor space
                    let vendor_scoped = fields.get(4).is_some_and(|f| !f.contains('='));
                    if self.vendor_depth > 0 || vendor_scoped {
                        continue;
                    }
                    let def = parse_attribute(&fields).map_err(syntax)?;
                    self.insert(def)?;
                }
                "VALUE" => {
                    if fields.len() != 4 {
                        return Err(syntax("VALUE needs an attribute, name and number".to_string()));
                    }
                    if self.vendor_depth > 0 {
                        continue;
                    }
                    let number = parse_number(fields[3])
                        .ok_or_else(|| syntax(format!("Invalid VALUE number: {}", fields[3])))?;
                    self.values.push(PendingValue {
                        attribute: fields[1].to_string(),
                        name: fields[2].to_string(),
                        number,
                        origin: origin.to_string(),
                        line: line_no,
                    });
                }
                other => return Err(syntax(format!("Unknown keyword: {}", other))),
            }
        }
        Ok(())
    }

    fn insert(&mut self, def: AttributeDef) -> Result<(), DictionaryError> {
        if let Some(existing) = self.dict.by_name.get(&def.name) {
            if **existing == def {
                return Ok(());
            }
            return Err(DictionaryError::DuplicateName(def.name));
        }
        if let Some(existing) = self.dict.by_code.get(&def.code) {
            return Err(DictionaryError::DuplicateCode {
                code: def.code,
                name: existing.name.clone(),
            });
        }
        let def = Arc::new(def);
        self.dict.by_name.insert(def.name.clone(), Arc::clone(&def));
        self.dict.by_code.insert(def.code, def);
        Ok(())
    }

    fn finish(mut self) -> Result<Dictionary, DictionaryError> {
        for value in std::mem::take(&mut self.values) {
            let def = self.dict.by_name.get(&value.attribute).ok_or_else(|| {
                DictionaryError::UnknownValueAttribute {
                    attribute: value.attribute.clone(),
                    value: value.name.clone(),
                }
            })?;
            if !def.data_type.is_enumerable() {
                return Err(DictionaryError::Syntax {
                    origin: value.origin,
                    line: value.line,
                    message: format!("VALUE on non-integer attribute {}", def.name),
                });
            }
            let code = def.code;
            self.dict
                .value_names
                .entry((code, value.number))
                .or_insert_with(|| value.name.clone());
            self.dict.value_numbers.insert((code, value.name), value.number);
        }
        Ok(self.dict)
    }
}

fn parse_attribute(fields: &[&str]) -> Result<AttributeDef, String> {
    let name = fields[1].to_string();
    let code = match parse_number(fields[2]) {
        Some(code @ 1..=255) => code as u8,
        _ => return Err(format!("Invalid attribute code for {}: {}", name, fields[2])),
    };
    let data_type = DataType::from_name(fields[3])
        .ok_or_else(|| format!("Unsupported data type for {}: {}", name, fields[3]))?;

    let mut encryption = Encryption::None;
    if let Some(flags) = fields.get(4) {
        for flag in flags.split(',') {
            match flag.split_once('=') {
                Some(("encrypt", "1")) => encryption = Encryption::UserPassword,
                Some(("encrypt", other)) => {
                    return Err(format!("Unsupported encryption for {}: {}", name, other));
                }
                // has_tag, array, etc. carry no meaning for this codec
                _ => {}
            }
        }
    }

    Ok(AttributeDef {
        name,
        code,
        data_type,
        encryption,
    })
}

fn parse_number(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_dictionary_loads() {
        let dict = Dictionary::builtin().unwrap();
        assert!(dict.len() > 80);

        let user_name = dict.lookup_by_name("User-Name").unwrap();
        assert_eq!(user_name.code, 1);
        assert_eq!(user_name.data_type, DataType::String);

        let password = dict.lookup_by_code(2).unwrap();
        assert_eq!(password.name, "User-Password");
        assert_eq!(password.encryption, Encryption::UserPassword);

        assert_eq!(dict.lookup_by_name("Event-Timestamp").unwrap().data_type, DataType::Date);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let dict = Dictionary::builtin().unwrap();
        assert!(dict.lookup_by_name("Reply-Message").is_some());
        assert!(dict.lookup_by_name("reply-message").is_none());
    }

    #[test]
    fn test_value_aliases() {
        let dict = Dictionary::builtin().unwrap();
        assert_eq!(dict.value_number(6, "Framed-User"), Some(2));
        assert_eq!(dict.value_name(40, 1), Some("Start"));
        assert_eq!(dict.value_name(40, 99), None);
    }

    #[test]
    fn test_vendor_blocks_skipped() {
        let text = "\
ATTRIBUTE Reply-Message 18 string
VENDOR Acme 9999
BEGIN-VENDOR Acme
ATTRIBUTE Acme-Thing 1 string
VALUE Acme-Thing Foo 1
END-VENDOR Acme
ATTRIBUTE Old-Style 7 integer Acme
";
        let dict = Dictionary::parse_str(text, "test").unwrap();
        assert_eq!(dict.len(), 1);
        assert!(dict.lookup_by_name("Acme-Thing").is_none());
        assert!(dict.lookup_by_code(7).is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let text = "ATTRIBUTE A 1 string\nATTRIBUTE B 1 string\n";
        assert_eq!(
            Dictionary::parse_str(text, "test").unwrap_err(),
            DictionaryError::DuplicateCode {
                code: 1,
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_errors_carry_location() {
        let err = Dictionary::parse_str("# header\nATTRIBUTE A 300 string\n", "dict").unwrap_err();
        match err {
            DictionaryError::Syntax { origin, line, .. } => {
                assert_eq!(origin, "dict");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(Dictionary::parse_str("ATTRIBUTE A 1 blob\n", "dict").is_err());
        assert!(Dictionary::parse_str("PROTOCOL RADIUS 1\n", "dict").is_err());
        assert!(Dictionary::parse_str("VALUE Missing Foo 1\n", "dict").is_err());
    }

    #[test]
    fn test_include_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut local = fs::File::create(dir.path().join("dictionary.local")).unwrap();
        writeln!(local, "ATTRIBUTE Site-Tag 200 string").unwrap();

        let main_path = dir.path().join("dictionary");
        let mut main = fs::File::create(&main_path).unwrap();
        writeln!(main, "ATTRIBUTE User-Name 1 string").unwrap();
        writeln!(main, "$INCLUDE dictionary.local").unwrap();

        let dict = Dictionary::from_file(&main_path).unwrap();
        assert_eq!(dict.lookup_by_name("Site-Tag").unwrap().code, 200);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_include_rejected_in_memory() {
        assert!(Dictionary::parse_str("$INCLUDE other\n", "mem").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Dictionary::from_file("/nonexistent/radius/dictionary").unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
    }
}
