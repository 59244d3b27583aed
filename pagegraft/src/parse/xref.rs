use std::io::{Read, Seek};

use fnv::FnvHashSet;
use nom::{branch, bytes, character, combinator, sequence, IResult};

use super::{object::parse_object, reader::TokenReader};
use crate::{
    error::Result,
    pdf::{
        trailer::{Trailer, K_INFO, K_ROOT},
        Dictionary, ObjectId, XrefEntry, XrefTable,
    },
};

pub const XREF: &[u8] = b"xref";
pub const STARTXREF: &[u8] = b"startxref";
pub const TRAILER: &[u8] = b"trailer";

/// Default number of bytes searched backwards for `startxref`.
pub const FOOTER_WINDOW: usize = STARTXREF.len() + 2048;

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn backward_search(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn startxref_offset(input: &[u8]) -> IResult<&[u8], u64> {
    sequence::preceded(character::complete::multispace0, character::complete::u64)(input)
}

/// Find the offset of the newest xref section in the footer of the source.
pub fn startxref<R: Read + Seek>(reader: &mut TokenReader<R>, window: usize) -> Result<u64> {
    let (tail_start, tail) = reader.read_tail(window as u64)?;
    let keyword = backward_search(&tail, STARTXREF)
        .ok_or_else(|| reader.error(tail_start, "no `startxref` found near the end of the document"))?;

    let position = tail_start + keyword as u64;
    let (_, offset) = startxref_offset(&tail[keyword + STARTXREF.len()..])
        .map_err(|_| reader.error(position, "invalid `startxref` offset"))?;
    if offset >= reader.len() {
        return Err(reader.error(position, format!("`startxref` points behind the end of the document ({})", offset)));
    }

    log::debug!("startxref at {}", offset);
    Ok(offset)
}

/// `<start> <count>`
fn subsection_header(line: &[u8]) -> IResult<&[u8], (u32, u32)> {
    combinator::all_consuming(sequence::delimited(
        character::complete::space0,
        sequence::separated_pair(
            character::complete::u32,
            character::complete::space1,
            character::complete::u32,
        ),
        character::complete::space0,
    ))(line)
}

/// `<offset> <generation> <n|f>`, returns `(offset, generation, free)`.
fn entry(line: &[u8]) -> IResult<&[u8], (u64, u32, bool)> {
    let (remainder, _) = character::complete::space0(line)?;
    let (remainder, offset) = character::complete::u64(remainder)?;
    let (remainder, _) = character::complete::space1(remainder)?;
    let (remainder, generation) = character::complete::u32(remainder)?;
    let (remainder, _) = character::complete::space1(remainder)?;
    let (remainder, free) = branch::alt((
        combinator::value(false, bytes::complete::tag(b"n")),
        combinator::value(true, bytes::complete::tag(b"f")),
    ))(remainder)?;
    let (remainder, _) = combinator::eof(character::complete::space0(remainder)?.0)?;

    Ok((remainder, (offset, generation, free)))
}

fn read_nonblank_line<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<(u64, Vec<u8>)> {
    loop {
        let start = reader.position();
        let line = reader.read_line()?;
        if !line.iter().all(|c| super::reader::is_whitespace(*c)) {
            return Ok((start, line));
        }
    }
}

/// Parse a single xref section at `offset` into `table` and return its
/// trailer dictionary. Ids already present in `table` are left untouched.
fn section<R: Read + Seek>(reader: &mut TokenReader<R>, offset: u64, table: &mut XrefTable) -> Result<Dictionary> {
    reader.seek(offset)?;
    reader.skip_whitespace()?;
    let keyword = reader.read_token()?;
    if keyword != XREF {
        let message = if keyword.iter().all(u8::is_ascii_digit) && !keyword.is_empty() {
            "cross-reference streams are not supported".to_owned()
        } else {
            format!("expected `xref`, found `{}`", lossy(&keyword))
        };
        return Err(reader.error(offset, message));
    }

    let mut inserted = 0usize;
    loop {
        reader.skip_whitespace()?;
        let line_start = reader.position();
        if reader.read_token()? == TRAILER {
            break;
        }
        reader.seek(line_start)?;

        let (header_start, header) = read_nonblank_line(reader)?;
        let (_, (start, count)) = subsection_header(&header)
            .map_err(|_| reader.error(header_start, format!("invalid xref subsection header `{}`", lossy(&header))))?;
        log::trace!("xref subsection {} {}", start, count);

        for i in 0..count {
            let (entry_start, line) = read_nonblank_line(reader)?;
            let (_, (byte_offset, generation, free)) = entry(&line)
                .map_err(|_| reader.error(entry_start, format!("invalid xref entry `{}`", lossy(&line))))?;
            let number: ObjectId = start
                .checked_add(i)
                .ok_or_else(|| reader.error(entry_start, "object number overflow"))?;

            let entry = XrefEntry {
                number,
                byte_offset,
                generation,
                free,
            };
            if table.insert_if_absent(&entry) {
                inserted += 1;
            }
        }
    }

    let trailer_start = reader.position();
    let trailer = match parse_object(reader)? {
        crate::pdf::Object::Dictionary(dict) => dict,
        other => {
            return Err(reader.error(
                trailer_start,
                format!("trailer is not a dictionary: {}", other),
            ))
        }
    };
    log::debug!("xref section at {}: {} new entries", offset, inserted);

    Ok(trailer)
}

/// Resolve the chain of xref sections starting at the newest one.
///
/// Entries of newer sections take precedence. The returned trailer is the
/// newest one, with `/Root` and `/Info` taken from older trailers if it lacks
/// them.
pub fn resolve<R: Read + Seek>(reader: &mut TokenReader<R>, entry_offset: u64) -> Result<(Dictionary, XrefTable)> {
    let mut table = XrefTable::default();
    let mut newest: Option<Dictionary> = None;
    let mut visited = FnvHashSet::default();
    let mut next = Some(entry_offset);

    while let Some(offset) = next {
        if !visited.insert(offset) {
            return Err(reader.error(offset, "cyclic /Prev chain in cross-reference sections"));
        }

        let trailer = section(reader, offset, &mut table)?;
        next = Trailer::previous_of(&trailer).map_err(|err| reader.error(offset, err.to_string()))?;

        newest = Some(match newest.take() {
            None => trailer,
            Some(mut newest) => {
                for key in [K_ROOT, K_INFO] {
                    if !newest.contains_key(key) {
                        if let Some(value) = trailer.get(key) {
                            newest.insert(key.into(), value.clone());
                        }
                    }
                }
                newest
            }
        });
    }

    // `next` starts as `Some`, so at least one section was read
    let trailer = newest.unwrap_or_default();
    log::debug!("xref table with {} objects", table.len());
    Ok((trailer, table))
}
