use std::io::{Read, Seek};

use super::reader::TokenReader;
use crate::{
    error::Result,
    pdf::{Array, Dictionary, Name, Object, ObjectId, Reference, Scalar, Text},
};

pub const OBJ: &[u8] = b"obj";
pub const END_OBJ: &[u8] = b"endobj";
pub const STREAM: &[u8] = b"stream";
pub const REFERENCE: &[u8] = b"R";
pub const GENERATION_ZERO: &[u8] = b"0";

/// Arrays and dictionaries nested deeper than this are rejected.
pub const MAX_NESTING: usize = 256;

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn object_id(token: &[u8]) -> Option<ObjectId> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(token).ok()?.parse().ok()
}

/// Parse the object at the cursor. Leading whitespace and comments are
/// skipped.
pub fn parse_object<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<Object> {
    nested_object(reader, 0)
}

fn nested_object<R: Read + Seek>(reader: &mut TokenReader<R>, depth: usize) -> Result<Object> {
    reader.skip_whitespace()?;
    let start = reader.position();

    match reader.next_char(true)? {
        b'(' => literal_string(reader),
        b'<' => {
            if reader.peek_byte()? == Some(b'<') {
                reader.next_char(false)?;
                check_depth(reader, start, depth)?;
                dictionary(reader, depth + 1)
            } else {
                hex_string(reader)
            }
        }
        b'[' => {
            check_depth(reader, start, depth)?;
            array(reader, depth + 1)
        }
        chr @ (b')' | b'>' | b']' | b'{' | b'}') => {
            Err(reader.error(start, format!("unexpected `{}`", chr as char)))
        }
        chr => bare_token(reader, chr),
    }
}

fn check_depth<R: Read + Seek>(reader: &TokenReader<R>, start: u64, depth: usize) -> Result<()> {
    if depth >= MAX_NESTING {
        return Err(reader.error(start, format!("nesting too deep, the limit is {}", MAX_NESTING)));
    }
    Ok(())
}

/// Balanced, unescaped parentheses nest. An escaped `)` never terminates.
fn literal_string<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<Object> {
    let mut raw = Vec::new();
    let mut depth = 0usize;

    loop {
        let chr = reader.next_char(false)?;
        match chr {
            b'\\' => {
                raw.push(chr);
                raw.push(reader.next_char(false)?);
            }
            b'(' => {
                depth += 1;
                raw.push(chr);
            }
            b')' if depth == 0 => break,
            b')' => {
                depth -= 1;
                raw.push(chr);
            }
            _ => raw.push(chr),
        }
    }

    Ok(Object::Text(Text::literal(raw)))
}

fn hex_string<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<Object> {
    let mut raw = Vec::new();
    loop {
        match reader.next_char(false)? {
            b'>' => break,
            chr => raw.push(chr),
        }
    }
    Ok(Object::Text(Text::hex(raw)))
}

fn dictionary<R: Read + Seek>(reader: &mut TokenReader<R>, depth: usize) -> Result<Object> {
    let mut dict = Dictionary::new();

    loop {
        reader.skip_whitespace()?;
        let start = reader.position();
        match reader.next_char(true)? {
            b'>' => {
                if reader.next_char(false)? != b'>' {
                    return Err(reader.error(start, "expected `>>`"));
                }
                break;
            }
            b'/' => {
                let key = Name::from_escaped(&reader.read_token()?);
                let value = nested_object(reader, depth)?;
                dict.insert(key, value);
            }
            chr => {
                return Err(reader.error(
                    start,
                    format!("expected a dictionary key, found `{}`", chr as char),
                ))
            }
        }
    }

    Ok(Object::Dictionary(dict))
}

fn array<R: Read + Seek>(reader: &mut TokenReader<R>, depth: usize) -> Result<Object> {
    let mut array = Array::new();

    loop {
        reader.skip_whitespace()?;
        match reader.peek_byte()? {
            Some(b']') => {
                reader.next_char(false)?;
                break;
            }
            Some(_) => array.push(nested_object(reader, depth)?),
            None => return Err(reader.end_of_input()),
        }
    }

    Ok(Object::Array(array))
}

/// A bare token, or the first token of an `<id> 0 R` reference.
fn bare_token<R: Read + Seek>(reader: &mut TokenReader<R>, first: u8) -> Result<Object> {
    let mut token = vec![first];
    token.extend(reader.read_token()?);

    if first == b'/' {
        return Ok(Object::Scalar(Scalar::from_name(&Name::from_escaped(&token[1..]))));
    }

    if let Some(index) = object_id(&token) {
        let after_token = reader.position();
        if is_reference_tail(reader)? {
            return Ok(Object::Reference(Reference::new(index)));
        }
        reader.seek(after_token)?;
    }

    Ok(Object::Scalar(Scalar::from(token)))
}

/// Check for `0 R` after an integer. Consumes input, the caller restores the
/// position on `false`.
fn is_reference_tail<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<bool> {
    reader.skip_whitespace()?;
    if reader.read_token()? != GENERATION_ZERO {
        return Ok(false);
    }
    reader.skip_whitespace()?;
    Ok(reader.read_token()? == REFERENCE)
}

/// Parse `<id> <generation> obj` and return the id.
pub fn parse_object_header<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<ObjectId> {
    reader.skip_whitespace()?;
    let start = reader.position();

    let id = reader.read_token()?;
    reader.skip_whitespace()?;
    let generation = reader.read_token()?;
    reader.skip_whitespace()?;
    let keyword = reader.read_token()?;

    let fragment = || format!("{} {} {}", lossy(&id), lossy(&generation), lossy(&keyword));
    if id.is_empty() && reader.at_end() {
        return Err(reader.end_of_input());
    }
    let index = object_id(&id).ok_or_else(|| reader.error(start, format!("invalid object header `{}`", fragment())))?;
    if object_id(&generation).is_none() {
        return Err(reader.error(start, format!("invalid generation in object header `{}`", fragment())));
    }
    if keyword != OBJ {
        return Err(reader.error(start, format!("expected `obj` in object header `{}`", fragment())));
    }

    Ok(index)
}

/// Read the keyword after an object. Returns the offset of the stream data
/// for `stream`, `None` for `endobj`.
pub fn parse_object_trailer_marker<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<Option<u64>> {
    reader.skip_whitespace()?;
    let start = reader.position();
    let keyword = reader.read_token()?;

    if keyword == STREAM {
        reader.skip_line_ending()?;
        Ok(Some(reader.position()))
    } else if keyword == END_OBJ {
        Ok(None)
    } else if keyword.is_empty() && reader.at_end() {
        Err(reader.end_of_input())
    } else {
        Err(reader.error(
            start,
            format!("expected `stream` or `endobj`, found `{}`", lossy(&keyword)),
        ))
    }
}
