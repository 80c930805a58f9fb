//! Text dumps of packets for debug output

use crate::codec::ValuePair;
use crate::dictionary::Dictionary;
use std::fmt::Write as _;

/// Hex dump of an encoded packet: header fields, then one line per
/// attribute with type and length followed by the value, 16 bytes a line.
///
/// Malformed attribute sections are dumped as far as they go.
pub fn format_packet(raw: &[u8]) -> String {
    let mut out = String::new();
    if raw.len() < 20 {
        return out;
    }

    let _ = writeln!(out, "  Code:\t\t{}", raw[0]);
    let _ = writeln!(out, "  Id:\t\t{}", raw[1]);
    let _ = writeln!(out, "  Length:\t{}", u16::from_be_bytes([raw[2], raw[3]]));
    out.push_str("  Vector:\t");
    for b in &raw[4..20] {
        let _ = write!(out, "{:02x}", b);
    }
    out.push('\n');

    let mut rest = &raw[20..];
    if rest.is_empty() {
        return out;
    }

    out.push_str("  Data:");
    while !rest.is_empty() {
        out.push_str("\t\t");
        if rest.len() < 2 {
            let _ = writeln!(out, "{:02x}", rest[0]);
            break;
        }

        let declared = rest[1] as usize;
        if declared > rest.len() || declared < 2 {
            for b in rest {
                let _ = write!(out, "{:02x} ", b);
            }
            out.push('\n');
            break;
        }

        let _ = write!(out, "{:02x}  {:02x}  ", rest[0], rest[1]);
        let value = &rest[2..declared];
        for (i, b) in value.iter().enumerate() {
            if i > 0 && i % 16 == 0 {
                out.push_str("\t\t\t");
            }
            let _ = write!(out, "{:02x} ", b);
            if i % 16 == 15 {
                out.push('\n');
            }
        }
        if value.len() % 16 != 0 {
            out.push('\n');
        }

        rest = &rest[declared..];
    }

    out
}

/// One `\tName = value` line per pair
pub fn format_pairs(pairs: &[ValuePair], dict: &Dictionary) -> String {
    let mut out = String::new();
    for pair in pairs {
        let _ = writeln!(out, "\t{}", pair.display(dict));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(len: u16) -> Vec<u8> {
        let mut raw = vec![2u8, 9];
        raw.extend_from_slice(&len.to_be_bytes());
        raw.extend_from_slice(&[0xab; 16]);
        raw
    }

    #[test]
    fn test_header_only() {
        let dump = format_packet(&header(20));
        assert_eq!(
            dump,
            "  Code:\t\t2\n  Id:\t\t9\n  Length:\t20\n  Vector:\tabababababababababababababababab\n"
        );
    }

    #[test]
    fn test_attribute_lines() {
        let mut raw = header(27);
        raw.extend_from_slice(&[1, 5, b'b', b'o', b'b']);
        raw.extend_from_slice(&[18, 2]);
        let dump = format_packet(&raw);
        assert!(dump.ends_with("  Data:\t\t01  05  62 6f 62 \n\t\t12  02  "));
    }

    #[test]
    fn test_long_value_wraps() {
        let mut raw = header(40);
        raw.push(25);
        raw.push(20);
        raw.extend(0u8..18);
        let dump = format_packet(&raw);
        assert!(dump.contains("0e 0f \n\t\t\t10 11 \n"));
    }

    #[test]
    fn test_truncated_attribute() {
        let mut raw = header(24);
        raw.extend_from_slice(&[18, 40, b'h', b'i']);
        assert!(format_packet(&raw).ends_with("\t\t12 28 68 69 \n"));

        let mut short = header(21);
        short.push(7);
        assert!(format_packet(&short).ends_with("\t\t07\n"));

        assert_eq!(format_packet(&[1, 2, 3]), "");
    }
}
