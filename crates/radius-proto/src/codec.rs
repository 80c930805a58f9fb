//! Value-Pair Codec
//!
//! Converts between the textual `(name, operator, value)` form callers use
//! and typed [`ValuePair`]s, and between typed values and their wire bytes.
//!
//! Value conversion follows the attribute's dictionary data type:
//!
//! | type         | accepted text                                   | wire                |
//! |--------------|-------------------------------------------------|---------------------|
//! | `string`     | any text                                        | raw bytes           |
//! | `octets`     | `0x` followed by hex, or literal text           | raw bytes           |
//! | `integer`    | decimal, `0x` hex, or a `VALUE` name            | 4 bytes big-endian  |
//! | `ipaddr`     | dotted quad                                     | 4 bytes             |
//! | `ipv6addr`   | IPv6 literal                                    | 16 bytes            |
//! | `ipv6prefix` | `addr/len`                                      | 0, len, 16 bytes    |
//! | `date`       | Unix seconds or `Jan 2 2024 10:00:00` (UTC)     | 4 bytes big-endian  |

use crate::attributes::Attribute;
use crate::dictionary::{AttributeDef, DataType, Dictionary, Encryption};
use chrono::{DateTime, NaiveDateTime};
use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use thiserror::Error;

/// Placeholder rendered for operator codes outside the token table
pub const INVALID_TOKEN: &str = "<INVALID-TOKEN>";

/// Longest User-Password accepted (RFC 2865 Section 5.2)
pub const MAX_PASSWORD_LENGTH: usize = 128;

const DATE_FORMAT: &str = "%b %e %Y %H:%M:%S";

/// Token text indexed by raw operator code
const TOKENS: [&str; 27] = [
    "?",
    "EOL",
    "{",
    "}",
    "(",
    ")",
    ",",
    ";",
    "+=",
    "-=",
    ":=",
    "=",
    "!=",
    ">=",
    ">",
    "<=",
    "<",
    "=~",
    "!~",
    "=*",
    "!*",
    "==",
    "#",
    "<BARE-WORD>",
    "<\"STRING\">",
    "<'STRING'>",
    "<`STRING`>",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("Unknown attribute code: {0}")]
    UnknownCode(u8),
    #[error("Invalid value for {attribute}: {reason}")]
    InvalidValue { attribute: String, reason: String },
}

/// How [`Codec::encode`] treats a value that does not convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecMode {
    /// Drop the pair and report success
    #[default]
    Lenient,
    /// Report [`CodecError::InvalidValue`]
    Strict,
}

/// Pair operators, numbered as the token table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Operator {
    Invalid = 0,
    Eol = 1,
    LeftBrace = 2,
    RightBrace = 3,
    LeftParen = 4,
    RightParen = 5,
    Comma = 6,
    Semicolon = 7,
    /// `+=`
    Add = 8,
    /// `-=`
    Sub = 9,
    /// `:=`
    Set = 10,
    /// `=`
    Eq = 11,
    /// `!=`
    Ne = 12,
    Ge = 13,
    Gt = 14,
    Le = 15,
    Lt = 16,
    RegexMatch = 17,
    RegexNoMatch = 18,
    CmpTrue = 19,
    CmpFalse = 20,
    /// `==`
    CmpEq = 21,
    Hash = 22,
    BareWord = 23,
    DoubleQuotedString = 24,
    SingleQuotedString = 25,
    BackQuotedString = 26,
}

impl Operator {
    pub fn from_u8(value: u8) -> Option<Self> {
        use Operator::*;
        let op = match value {
            0 => Invalid,
            1 => Eol,
            2 => LeftBrace,
            3 => RightBrace,
            4 => LeftParen,
            5 => RightParen,
            6 => Comma,
            7 => Semicolon,
            8 => Add,
            9 => Sub,
            10 => Set,
            11 => Eq,
            12 => Ne,
            13 => Ge,
            14 => Gt,
            15 => Le,
            16 => Lt,
            17 => RegexMatch,
            18 => RegexNoMatch,
            19 => CmpTrue,
            20 => CmpFalse,
            21 => CmpEq,
            22 => Hash,
            23 => BareWord,
            24 => DoubleQuotedString,
            25 => SingleQuotedString,
            26 => BackQuotedString,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn token(self) -> &'static str {
        token_for(self.as_u8())
    }
}

/// Render a raw operator code. Never fails: the invalid slot and anything
/// past the table yield [`INVALID_TOKEN`].
pub fn token_for(raw: u8) -> &'static str {
    match raw as usize {
        idx @ 1..=26 => TOKENS[idx],
        _ => INVALID_TOKEN,
    }
}

/// Typed attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(Vec<u8>),
    Octets(Vec<u8>),
    Integer(u32),
    Byte(u8),
    Short(u16),
    Integer64(u64),
    Signed(i32),
    IpAddr(Ipv4Addr),
    Ipv6Addr(Ipv6Addr),
    Ipv6Prefix { addr: Ipv6Addr, prefix_len: u8 },
    /// Seconds since the Unix epoch
    Date(u32),
}

impl Value {
    /// Convert caller text according to `def`
    pub fn parse(def: &AttributeDef, text: &str, dict: &Dictionary) -> Result<Value, String> {
        let value = match def.data_type {
            DataType::String => Value::String(text.as_bytes().to_vec()),
            DataType::Octets => Value::Octets(parse_octets(text)?),
            DataType::Integer => Value::Integer(
                u32::try_from(parse_enumerated(def, text, dict)?)
                    .map_err(|_| format!("{} does not fit in 32 bits", text))?,
            ),
            DataType::Byte => Value::Byte(
                u8::try_from(parse_enumerated(def, text, dict)?)
                    .map_err(|_| format!("{} does not fit in 8 bits", text))?,
            ),
            DataType::Short => Value::Short(
                u16::try_from(parse_enumerated(def, text, dict)?)
                    .map_err(|_| format!("{} does not fit in 16 bits", text))?,
            ),
            DataType::Integer64 => Value::Integer64(parse_enumerated(def, text, dict)?),
            DataType::Signed => Value::Signed(
                text.trim()
                    .parse()
                    .map_err(|_| format!("{} is not a signed integer", text))?,
            ),
            DataType::IpAddr => Value::IpAddr(
                text.trim()
                    .parse()
                    .map_err(|_| format!("{} is not an IPv4 address", text))?,
            ),
            DataType::Ipv6Addr => Value::Ipv6Addr(
                text.trim()
                    .parse()
                    .map_err(|_| format!("{} is not an IPv6 address", text))?,
            ),
            DataType::Ipv6Prefix => parse_ipv6_prefix(text)?,
            DataType::Date => Value::Date(parse_date(text)?),
        };

        let wire_len = value.to_wire().len();
        if wire_len > Attribute::MAX_VALUE_LENGTH {
            return Err(format!("{} bytes exceeds the attribute limit", wire_len));
        }
        if def.encryption == Encryption::UserPassword && wire_len > MAX_PASSWORD_LENGTH {
            return Err(format!("{} bytes exceeds the password limit", wire_len));
        }
        Ok(value)
    }

    /// Interpret wire bytes according to `data_type`
    pub fn from_wire(data_type: DataType, bytes: &[u8]) -> Result<Value, String> {
        let exact = |len: usize| -> Result<(), String> {
            if bytes.len() == len {
                Ok(())
            } else {
                Err(format!(
                    "{} needs {} bytes, got {}",
                    data_type.name(),
                    len,
                    bytes.len()
                ))
            }
        };

        let value = match data_type {
            DataType::String => Value::String(bytes.to_vec()),
            DataType::Octets => Value::Octets(bytes.to_vec()),
            DataType::Integer => {
                exact(4)?;
                Value::Integer(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            DataType::Byte => {
                exact(1)?;
                Value::Byte(bytes[0])
            }
            DataType::Short => {
                exact(2)?;
                Value::Short(u16::from_be_bytes([bytes[0], bytes[1]]))
            }
            DataType::Integer64 => {
                exact(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Value::Integer64(u64::from_be_bytes(raw))
            }
            DataType::Signed => {
                exact(4)?;
                Value::Signed(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            DataType::IpAddr => {
                exact(4)?;
                Value::IpAddr(Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]))
            }
            DataType::Ipv6Addr => {
                exact(16)?;
                let mut raw = [0u8; 16];
                raw.copy_from_slice(bytes);
                Value::Ipv6Addr(Ipv6Addr::from(raw))
            }
            DataType::Ipv6Prefix => {
                if !(2..=18).contains(&bytes.len()) {
                    return Err(format!("ipv6prefix needs 2-18 bytes, got {}", bytes.len()));
                }
                let prefix_len = bytes[1];
                if prefix_len > 128 {
                    return Err(format!("prefix length {} exceeds 128", prefix_len));
                }
                let mut raw = [0u8; 16];
                raw[..bytes.len() - 2].copy_from_slice(&bytes[2..]);
                Value::Ipv6Prefix {
                    addr: Ipv6Addr::from(raw),
                    prefix_len,
                }
            }
            DataType::Date => {
                exact(4)?;
                Value::Date(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        };
        Ok(value)
    }

    pub fn to_wire(&self) -> Vec<u8> {
        match self {
            Value::String(bytes) | Value::Octets(bytes) => bytes.clone(),
            Value::Integer(n) | Value::Date(n) => n.to_be_bytes().to_vec(),
            Value::Byte(n) => vec![*n],
            Value::Short(n) => n.to_be_bytes().to_vec(),
            Value::Integer64(n) => n.to_be_bytes().to_vec(),
            Value::Signed(n) => n.to_be_bytes().to_vec(),
            Value::IpAddr(addr) => addr.octets().to_vec(),
            Value::Ipv6Addr(addr) => addr.octets().to_vec(),
            Value::Ipv6Prefix { addr, prefix_len } => {
                let mut bytes = Vec::with_capacity(18);
                bytes.push(0);
                bytes.push(*prefix_len);
                bytes.extend_from_slice(&addr.octets());
                bytes
            }
        }
    }
}

/// One attribute instance of a packet.
///
/// The definition is shared with the dictionary, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePair {
    definition: Arc<AttributeDef>,
    operator: Operator,
    value: Value,
}

impl ValuePair {
    pub fn new(definition: Arc<AttributeDef>, operator: Operator, value: Value) -> Self {
        ValuePair {
            definition,
            operator,
            value,
        }
    }

    pub fn definition(&self) -> &Arc<AttributeDef> {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn code(&self) -> u8 {
        self.definition.code
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Human-readable value, the way `get_attribute` reports it
    pub fn render(&self, dict: &Dictionary) -> String {
        let code = self.code();
        let enumerated = |n: u64| {
            dict.value_name(code, n)
                .map(str::to_string)
                .unwrap_or_else(|| n.to_string())
        };

        match &self.value {
            Value::String(bytes) => escape_string(bytes),
            Value::Octets(bytes) => {
                let mut out = String::with_capacity(2 + bytes.len() * 2);
                out.push_str("0x");
                for b in bytes {
                    let _ = write!(out, "{:02x}", b);
                }
                out
            }
            Value::Integer(n) => enumerated(u64::from(*n)),
            Value::Byte(n) => enumerated(u64::from(*n)),
            Value::Short(n) => enumerated(u64::from(*n)),
            Value::Integer64(n) => enumerated(*n),
            Value::Signed(n) => n.to_string(),
            Value::IpAddr(addr) => addr.to_string(),
            Value::Ipv6Addr(addr) => addr.to_string(),
            Value::Ipv6Prefix { addr, prefix_len } => format!("{}/{}", addr, prefix_len),
            Value::Date(secs) => match DateTime::from_timestamp(i64::from(*secs), 0) {
                Some(dt) => format!("{} UTC", dt.format(DATE_FORMAT)),
                None => secs.to_string(),
            },
        }
    }

    /// `Name = value` line, strings quoted
    pub fn display(&self, dict: &Dictionary) -> String {
        let rendered = self.render(dict);
        match self.value {
            Value::String(_) => format!("{} {} \"{}\"", self.name(), self.operator.token(), rendered),
            _ => format!("{} {} {}", self.name(), self.operator.token(), rendered),
        }
    }
}

/// Converts pairs against one dictionary
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    dictionary: &'a Dictionary,
    mode: CodecMode,
}

impl<'a> Codec<'a> {
    pub fn new(dictionary: &'a Dictionary, mode: CodecMode) -> Self {
        Codec { dictionary, mode }
    }

    pub fn mode(&self) -> CodecMode {
        self.mode
    }

    /// Build a pair from caller text.
    ///
    /// Returns `Ok(None)` in lenient mode when the value does not convert:
    /// the pair is dropped without an error.
    pub fn encode(
        &self,
        name: &str,
        operator: Operator,
        value: &str,
    ) -> Result<Option<ValuePair>, CodecError> {
        let def = self
            .dictionary
            .lookup_by_name(name)
            .ok_or_else(|| CodecError::UnknownAttribute(name.to_string()))?;

        match Value::parse(def, value, self.dictionary) {
            Ok(value) => Ok(Some(ValuePair::new(Arc::clone(def), operator, value))),
            Err(reason) => match self.mode {
                CodecMode::Lenient => {
                    tracing::debug!(attribute = name, %reason, "Ignoring unconvertible value");
                    Ok(None)
                }
                CodecMode::Strict => Err(CodecError::InvalidValue {
                    attribute: name.to_string(),
                    reason,
                }),
            },
        }
    }

    /// Build a pair from a received attribute
    pub fn decode(&self, code: u8, bytes: &[u8]) -> Result<ValuePair, CodecError> {
        let def = self
            .dictionary
            .lookup_by_code(code)
            .ok_or(CodecError::UnknownCode(code))?;

        let value = Value::from_wire(def.data_type, bytes).map_err(|reason| {
            CodecError::InvalidValue {
                attribute: def.name.clone(),
                reason,
            }
        })?;

        Ok(ValuePair::new(Arc::clone(def), Operator::Eq, value))
    }
}

fn parse_unsigned(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn parse_enumerated(def: &AttributeDef, text: &str, dict: &Dictionary) -> Result<u64, String> {
    dict.value_number(def.code, text.trim())
        .or_else(|| parse_unsigned(text))
        .ok_or_else(|| format!("{} is neither a number nor a known value", text))
}

fn parse_octets(text: &str) -> Result<Vec<u8>, String> {
    let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
        return Ok(text.as_bytes().to_vec());
    };
    if hex.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex at offset {}", i))
        })
        .collect()
}

fn parse_ipv6_prefix(text: &str) -> Result<Value, String> {
    let (addr, len) = text
        .trim()
        .split_once('/')
        .ok_or_else(|| format!("{} is not an addr/len prefix", text))?;
    let addr: Ipv6Addr = addr
        .parse()
        .map_err(|_| format!("{} is not an IPv6 address", addr))?;
    let prefix_len: u8 = len
        .parse()
        .ok()
        .filter(|l| *l <= 128)
        .ok_or_else(|| format!("{} is not a prefix length", len))?;
    Ok(Value::Ipv6Prefix { addr, prefix_len })
}

fn parse_date(text: &str) -> Result<u32, String> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<u32>() {
        return Ok(secs);
    }
    let text = text.strip_suffix("UTC").map(str::trim_end).unwrap_or(text);
    let parsed = NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| format!("{} is not a date: {}", text, e))?;
    u32::try_from(parsed.and_utc().timestamp()).map_err(|_| format!("{} is out of range", text))
}

/// Printable rendering of string bytes: UTF-8 passes through, control and
/// invalid bytes are escaped.
fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            0x80..=0xff => {
                let width = match b {
                    0xc0..=0xdf => 2,
                    0xe0..=0xef => 3,
                    0xf0..=0xf7 => 4,
                    _ => 0,
                };
                match bytes
                    .get(i..i + width)
                    .filter(|_| width > 0)
                    .and_then(|seq| std::str::from_utf8(seq).ok())
                {
                    Some(ch) => {
                        out.push_str(ch);
                        i += width;
                        continue;
                    }
                    None => {
                        let _ = write!(out, "\\{:03o}", b);
                    }
                }
            }
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Dictionary {
        Dictionary::builtin().unwrap()
    }

    fn roundtrip(dict: &Dictionary, name: &str, text: &str) -> String {
        let codec = Codec::new(dict, CodecMode::Strict);
        let pair = codec.encode(name, Operator::Eq, text).unwrap().unwrap();
        let decoded = codec.decode(pair.code(), &pair.value().to_wire()).unwrap();
        assert_eq!(decoded.name(), name);
        assert_eq!(decoded.value(), pair.value());
        decoded.render(dict)
    }

    #[test]
    fn test_encode_decode_preserves_value() {
        let dict = dict();
        assert_eq!(roundtrip(&dict, "User-Name", "bob"), "bob");
        assert_eq!(roundtrip(&dict, "NAS-Port", "42"), "42");
        assert_eq!(roundtrip(&dict, "NAS-IP-Address", "192.168.1.16"), "192.168.1.16");
        assert_eq!(roundtrip(&dict, "NAS-IPv6-Address", "2001:db8::1"), "2001:db8::1");
        assert_eq!(roundtrip(&dict, "Framed-IPv6-Prefix", "2001:db8::/32"), "2001:db8::/32");
        assert_eq!(roundtrip(&dict, "Class", "0xdeadbeef"), "0xdeadbeef");
        assert_eq!(roundtrip(&dict, "Service-Type", "Framed-User"), "Framed-User");
        assert_eq!(roundtrip(&dict, "Event-Timestamp", "0"), "Jan  1 1970 00:00:00 UTC");
    }

    #[test]
    fn test_integer_forms() {
        let dict = dict();
        let codec = Codec::new(&dict, CodecMode::Strict);
        let hex = codec.encode("Session-Timeout", Operator::Eq, "0x10").unwrap().unwrap();
        assert_eq!(hex.value(), &Value::Integer(16));

        // numeric value that happens to have a name renders as the name
        let pair = codec.encode("Acct-Status-Type", Operator::Eq, "2").unwrap().unwrap();
        assert_eq!(pair.render(&dict), "Stop");
    }

    #[test]
    fn test_date_text_form() {
        let dict = dict();
        let codec = Codec::new(&dict, CodecMode::Strict);
        let pair = codec
            .encode("Event-Timestamp", Operator::Eq, "Feb 13 2009 23:31:30")
            .unwrap()
            .unwrap();
        assert_eq!(pair.value(), &Value::Date(1_234_567_890));
        assert_eq!(pair.render(&dict), "Feb 13 2009 23:31:30 UTC");
    }

    #[test]
    fn test_empty_inputs() {
        let dict = dict();
        let codec = Codec::new(&dict, CodecMode::Lenient);
        assert_eq!(
            codec.encode("", Operator::Eq, "x").unwrap_err(),
            CodecError::UnknownAttribute(String::new())
        );

        let pair = codec.encode("User-Name", Operator::Eq, "").unwrap().unwrap();
        assert_eq!(pair.value(), &Value::String(Vec::new()));
        assert!(pair.value().to_wire().is_empty());

        // an empty number does not convert
        assert_eq!(codec.encode("NAS-Port", Operator::Eq, "").unwrap(), None);
        let strict = Codec::new(&dict, CodecMode::Strict);
        assert!(matches!(
            strict.encode("NAS-Port", Operator::Eq, ""),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_attribute_fails_in_both_modes() {
        let dict = dict();
        for mode in [CodecMode::Lenient, CodecMode::Strict] {
            let codec = Codec::new(&dict, mode);
            assert_eq!(
                codec.encode("No-Such-Attribute", Operator::Eq, "1").unwrap_err(),
                CodecError::UnknownAttribute("No-Such-Attribute".to_string())
            );
        }
        assert_eq!(
            Codec::new(&dict, CodecMode::Lenient).decode(250, b"x").unwrap_err(),
            CodecError::UnknownCode(250)
        );
    }

    #[test]
    fn test_malformed_value_is_dropped_leniently() {
        let dict = dict();
        let lenient = Codec::new(&dict, CodecMode::Lenient);
        assert_eq!(lenient.encode("NAS-Port", Operator::Eq, "not-a-number").unwrap(), None);
        assert_eq!(lenient.encode("NAS-IP-Address", Operator::Eq, "300.1.1.1").unwrap(), None);

        let strict = Codec::new(&dict, CodecMode::Strict);
        assert!(matches!(
            strict.encode("NAS-Port", Operator::Eq, "not-a-number"),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(matches!(
            strict.encode("User-Password", Operator::Eq, &"x".repeat(129)),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(matches!(
            strict.encode("Reply-Message", Operator::Eq, &"x".repeat(254)),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        let dict = dict();
        let codec = Codec::new(&dict, CodecMode::Strict);
        assert!(matches!(
            codec.decode(5, &[0, 1]),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(codec.decode(8, &[10, 0, 0]).is_err());
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(Operator::Eq.token(), "=");
        assert_eq!(Operator::Set.token(), ":=");
        assert_eq!(Operator::Add.token(), "+=");
        assert_eq!(Operator::CmpEq.token(), "==");
        assert_eq!(Operator::RegexNoMatch.token(), "!~");
        assert_eq!(token_for(0), INVALID_TOKEN);
        assert_eq!(token_for(27), INVALID_TOKEN);
        assert_eq!(token_for(255), INVALID_TOKEN);
        assert_eq!(Operator::from_u8(26), Some(Operator::BackQuotedString));
        assert_eq!(Operator::from_u8(27), None);
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_string(b"plain"), "plain");
        assert_eq!(escape_string(b"a\nb\tc\\"), "a\\nb\\tc\\\\");
        assert_eq!(escape_string(b"say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string(&[0x01, b'x', 0xff]), "\\001x\\377");
        assert_eq!(escape_string("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_display_quotes_strings() {
        let dict = dict();
        let codec = Codec::new(&dict, CodecMode::Strict);
        let msg = codec.decode(18, b"Welcome").unwrap();
        assert_eq!(msg.display(&dict), "Reply-Message = \"Welcome\"");
        let port = codec.decode(5, &[0, 0, 0, 3]).unwrap();
        assert_eq!(port.display(&dict), "NAS-Port = 3");
    }
}
