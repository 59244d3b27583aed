use std::io::{Read, Seek};

use nom::{bytes, character, IResult};

use crate::error::Result;

pub use self::reader::TokenReader;

pub mod object;
pub mod reader;
pub mod xref;

const SIGNATURE_WINDOW: u64 = 16;

fn version(input: &[u8]) -> IResult<&[u8], (u8, u8)> {
    let (remainder, _) = bytes::complete::tag("%PDF-")(input)?;
    let (remainder, major) = character::complete::u8(remainder)?;
    let (remainder, _) = character::complete::char('.')(remainder)?;
    let (remainder, minor) = character::complete::u8(remainder)?;

    Ok((remainder, (major, minor)))
}

/// Check the `%PDF-x.y` signature at the very start of the source.
pub fn signature<R: Read + Seek>(reader: &mut TokenReader<R>) -> Result<(u8, u8)> {
    let head = reader.read_exact_at(0, reader.len().min(SIGNATURE_WINDOW))?;
    let (_, version) = version(&head).map_err(|_| reader.error(0, "not a recognized document"))?;
    log::debug!("document version {}.{}", version.0, version.1);
    Ok(version)
}
