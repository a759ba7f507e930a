//! Canonical block encoding and digest.
//!
//! A block is encoded as JSON with every object's keys sorted, `", "` and
//! `": "` as separators and everything outside printable ASCII escaped as
//! `\uXXXX`, and floats written in shortest round-trip form with an exponent
//! only below `1e-4` or from `1e16` up (`1e-05`, `1e+16`, `123.0`). That is
//! byte-for-byte the encoding other nodes of the network produce, so digests
//! computed here can be compared against theirs.

use std::io;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the canonical encoding of `value`.
pub fn hash<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(sha256_hex(&canonical_json(value)?))
}

/// Hex-encoded SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Sorted-key JSON encoding of `value`.
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    Sorted(&value).serialize(&mut ser)?;
    Ok(out)
}

/// Float text as other nodes write it: shortest digits that round-trip,
/// positional between `1e-4` and `1e16`, otherwise `d.ddde±XX`.
pub fn format_float(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    // `{:e}` yields the shortest round-trip digits, e.g. `1.25e3`.
    let sci = format!("{:e}", value.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{value}");
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return format!("{value}");
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exp) {
        if exp < 0 {
            format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
        } else {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
            } else {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            }
        }
    } else {
        let (lead, frac) = digits.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if frac.is_empty() {
            format!("{lead}e{exp_sign}{:02}", exp.abs())
        } else {
            format!("{lead}.{frac}e{exp_sign}{:02}", exp.abs())
        }
    };
    format!("{sign}{body}")
}

/// Serializes a `Value` with object keys in ascending code point order,
/// independent of how the map was built.
struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut m = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    m.serialize_entry(k, &Sorted(v))?;
                }
                m.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Sorted(item))?;
                }
                seq.end()
            }
            other => other.serialize(serializer),
        }
    }
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_float(value).as_bytes())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\x7f' {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
