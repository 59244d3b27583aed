use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use thiserror::Error;

pub const ASCII_HEX_DECODE: &[u8] = b"ASCIIHexDecode";
pub const ASCII_85_DECODE: &[u8] = b"ASCII85Decode";
pub const FLATE_DECODE: &[u8] = b"FlateDecode";

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("unsupported filter `{0}`")]
    Unsupported(String),
    #[error("invalid hex data: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("invalid base-85 data: {0}")]
    Ascii85(#[from] pagegraft_ascii85::DecodeError),
    #[error("inflate failed: {0}")]
    Inflate(#[source] std::io::Error),
    #[error("deflate failed: {0}")]
    Deflate(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    AsciiHex,
    Ascii85,
    Flate,
}

impl Filter {
    /// Look up a filter by its name, abbreviations included.
    pub fn from_name(name: &[u8]) -> Result<Self, FilterError> {
        match name {
            ASCII_HEX_DECODE | b"AHx" => Ok(Filter::AsciiHex),
            ASCII_85_DECODE | b"A85" => Ok(Filter::Ascii85),
            FLATE_DECODE | b"Fl" => Ok(Filter::Flate),
            _ => Err(FilterError::Unsupported(String::from_utf8_lossy(name).into_owned())),
        }
    }

    pub fn name(&self) -> &'static [u8] {
        match self {
            Filter::AsciiHex => ASCII_HEX_DECODE,
            Filter::Ascii85 => ASCII_85_DECODE,
            Filter::Flate => FLATE_DECODE,
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, FilterError> {
        log::trace!("apply {}", String::from_utf8_lossy(self.name()));
        match self {
            Filter::AsciiHex => decode_hex(data),
            Filter::Ascii85 => Ok(pagegraft_ascii85::decode(data)?),
            Filter::Flate => inflate(data),
        }
    }
}

/// Apply `filters` from left to right.
pub fn decode_chain(filters: &[Filter], data: Vec<u8>) -> Result<Vec<u8>, FilterError> {
    filters.iter().try_fold(data, |data, filter| filter.decode(&data))
}

/// Decode pairs of hex digits up to an optional `>`.
///
/// Characters that are not alphanumeric are ignored, an odd trailing digit is
/// completed with `0`.
pub fn decode_hex(text: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut digits: Vec<u8> = text
        .iter()
        .take_while(|&&c| c != b'>')
        .filter(|c| c.is_ascii_alphanumeric())
        .copied()
        .collect();
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    Ok(hex::decode(digits)?)
}

pub fn inflate(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(FilterError::Inflate)?;
    Ok(out)
}

pub fn deflate(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).map_err(FilterError::Deflate)?;
    encoder.finish().map_err(FilterError::Deflate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Filter::from_name(b"FlateDecode").unwrap(), Filter::Flate);
        assert_eq!(Filter::from_name(b"A85").unwrap(), Filter::Ascii85);
        assert_eq!(Filter::from_name(b"AHx").unwrap(), Filter::AsciiHex);
        let err = Filter::from_name(b"UnknownDecode").unwrap_err();
        assert_eq!(err.to_string(), "unsupported filter `UnknownDecode`");
    }

    #[test]
    fn hex() {
        assert_eq!(decode_hex(b"48656C6C6F>").unwrap(), b"Hello");
        assert_eq!(decode_hex(b"4 8\n65>ff").unwrap(), b"He");
        assert_eq!(decode_hex(b"7").unwrap(), b"p");
        assert_eq!(decode_hex(b"").unwrap(), b"");
        assert!(matches!(decode_hex(b"4g"), Err(FilterError::InvalidHex(_))));
    }

    #[test]
    fn flate() {
        let data = b"q 1 0 0 1 0 0 cm BT /F1 12 Tf (map) Tj ET Q".repeat(10);
        let compressed = deflate(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed).unwrap(), data);
        assert!(matches!(inflate(b"not zlib"), Err(FilterError::Inflate(_))));
    }

    #[test]
    fn chain_order() {
        let data = b"layered".to_vec();
        let encoded = pagegraft_ascii85::encode(&deflate(&data).unwrap());
        let decoded = decode_chain(&[Filter::Ascii85, Filter::Flate], encoded.into_bytes()).unwrap();
        assert_eq!(decoded, data);
    }
}
