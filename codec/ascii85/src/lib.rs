//! Base-85 (ASCII85) encoding as used by the `ASCII85Decode` stream filter.
//!
//! Four input bytes are packed into five printable digits between `!` and `u`.
//! An all-zero group is shortened to a single `z`. The encoder wraps its output
//! into lines that start with a space, so line oriented tools that drop lines
//! beginning with `%` never drop encoded data.

use std::fmt;

/// Maximum length of an encoded line, including the leading space.
pub const LINE_WIDTH: usize = 72;

/// End of data marker. Not produced by [`encode`], accepted by [`decode`].
pub const EOD_MARKER: &[u8] = b"~>";

const FIRST_DIGIT: u8 = b'!';
const LAST_DIGIT: u8 = b'u';
const ZERO_GROUP: u8 = b'z';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte outside of `!`..=`u` that is neither whitespace, `z` nor `~`.
    InvalidDigit { digit: u8, position: usize },
    /// `z` inside of a five digit group.
    MisplacedZero { position: usize },
    /// A group that doesn't fit into 32 bits.
    Overflow { position: usize },
    /// The data ended with a single digit which can't encode a byte.
    TruncatedGroup,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidDigit { digit, position } => {
                write!(f, "invalid base-85 digit 0x{:02x} at position {}", digit, position)
            }
            DecodeError::MisplacedZero { position } => {
                write!(f, "`z` inside of a group at position {}", position)
            }
            DecodeError::Overflow { position } => {
                write!(f, "base-85 group ending at position {} exceeds 32 bits", position)
            }
            DecodeError::TruncatedGroup => write!(f, "final base-85 group has a single digit"),
        }
    }
}

impl std::error::Error for DecodeError {}

struct LineWrapper {
    out: String,
    column: usize,
}

impl LineWrapper {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            column: 0,
        }
    }

    fn push(&mut self, c: u8) {
        if self.column == 0 {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push(' ');
            self.column = 1;
        }
        self.out.push(char::from(c));
        self.column += 1;
        if self.column == LINE_WIDTH {
            self.column = 0;
        }
    }

    fn extend(&mut self, digits: &[u8]) {
        for &d in digits {
            self.push(d);
        }
    }
}

fn digits(mut word: u32) -> [u8; 5] {
    let mut out = [FIRST_DIGIT; 5];
    for d in out.iter_mut().rev() {
        *d = (word % 85) as u8 + FIRST_DIGIT;
        word /= 85;
    }
    out
}

fn word(digits: &[u8; 5]) -> Option<u32> {
    digits
        .iter()
        .try_fold(0u32, |acc, &d| acc.checked_mul(85)?.checked_add(u32::from(d)))
}

/// Encode `data` into wrapped base-85 text.
///
/// The final group of `n < 4` bytes is padded with zeros and emits `n + 1`
/// digits. The `z` shorthand is only used for complete groups.
pub fn encode(data: &[u8]) -> String {
    // 5 digits per 4 bytes plus a newline and space for every line.
    let digit_count = data.len() / 4 * 5 + 5;
    let mut out = LineWrapper::with_capacity(digit_count + digit_count / (LINE_WIDTH - 1) * 2 + 1);

    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let word = u32::from_be_bytes(group);

        if chunk.len() == 4 {
            if word == 0 {
                out.push(ZERO_GROUP);
            } else {
                out.extend(&digits(word));
            }
        } else {
            out.extend(&digits(word)[..chunk.len() + 1]);
        }
    }

    out.out
}

/// Decode base-85 text.
///
/// Whitespace is ignored, a leading `<~` is skipped and decoding stops at the
/// first `~`. A final group of `n` digits is padded with `u` and yields `n - 1`
/// bytes.
pub fn decode(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let start = text
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .unwrap_or(text.len());
    let start = if text[start..].starts_with(b"<~") { start + 2 } else { start };

    let mut out = Vec::with_capacity(text.len() / 5 * 4 + 4);
    let mut group = [0u8; 5];
    let mut len = 0;

    for (position, &c) in text.iter().enumerate().skip(start) {
        match c {
            b'~' => break,
            c if c.is_ascii_whitespace() || c == 0 => continue,
            ZERO_GROUP if len == 0 => out.extend_from_slice(&[0; 4]),
            ZERO_GROUP => return Err(DecodeError::MisplacedZero { position }),
            FIRST_DIGIT..=LAST_DIGIT => {
                group[len] = c - FIRST_DIGIT;
                len += 1;
                if len == 5 {
                    let w = word(&group).ok_or(DecodeError::Overflow { position })?;
                    out.extend_from_slice(&w.to_be_bytes());
                    len = 0;
                }
            }
            digit => return Err(DecodeError::InvalidDigit { digit, position }),
        }
    }

    match len {
        0 => {}
        1 => return Err(DecodeError::TruncatedGroup),
        _ => {
            for d in group[len..].iter_mut() {
                *d = LAST_DIGIT - FIRST_DIGIT;
            }
            let w = word(&group).ok_or(DecodeError::Overflow { position: text.len() })?;
            out.extend_from_slice(&w.to_be_bytes()[..len - 1]);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let encoded = encode(data);
        assert_eq!(decode(encoded.as_bytes()).as_deref(), Ok(data), "encoded: {:?}", encoded);
    }

    #[test]
    fn empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode(b""), Ok(vec![]));
        assert_eq!(decode(b"~>"), Ok(vec![]));
    }

    #[test]
    fn hello() {
        let encoded = encode(b"hello");
        assert_eq!(encoded, " BOu!rDZ");
        assert_eq!(decode(encoded.as_bytes()), Ok(b"hello".to_vec()));
    }

    #[test]
    fn full_groups() {
        assert_eq!(encode(b"Man "), " 9jqo^");
        round_trip(b"Man is distinguished");
        round_trip(&[0xff; 8]);
    }

    #[test]
    fn zero_shorthand_only_for_full_groups() {
        assert_eq!(encode(&[0; 4]), " z");
        assert_eq!(encode(&[0; 6]), " z!!!");
        assert_eq!(encode(&[1, 0, 0, 0, 0, 0, 0, 0]).matches('z').count(), 1);
        round_trip(&[0; 6]);
        round_trip(&[7, 0, 0, 0, 0]);
    }

    #[test]
    fn short_final_groups() {
        for len in 1..=3 {
            let data: Vec<u8> = (0..len).map(|i| 0xf0 + i as u8).collect();
            assert_eq!(encode(&data).trim().len(), len + 1);
            round_trip(&data);
        }
    }

    #[test]
    fn every_byte_value() {
        let data: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        round_trip(&data);
    }

    #[test]
    fn wrapped_lines() {
        let encoded = encode(&[0xab; 100]);
        let lines: Vec<&str> = encoded.split('\n').collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.starts_with(' '));
            assert!(line.len() <= LINE_WIDTH);
        }
        round_trip(&[0xab; 100]);
    }

    #[test]
    fn markers_and_whitespace() {
        assert_eq!(decode(b"  <~BOu!r\n DZ~>"), Ok(b"hello".to_vec()));
        assert_eq!(decode(b"BOu!rDZ~> trailing junk"), Ok(b"hello".to_vec()));
    }

    #[test]
    fn invalid_input() {
        assert_eq!(
            decode(b"BOu!v"),
            Err(DecodeError::InvalidDigit { digit: b'v', position: 4 })
        );
        assert_eq!(decode(b"BOzu"), Err(DecodeError::MisplacedZero { position: 2 }));
        assert_eq!(decode(b"uuuuu"), Err(DecodeError::Overflow { position: 4 }));
        assert_eq!(decode(b"BOu!rD"), Err(DecodeError::TruncatedGroup));
        assert_eq!(decode(b"!"), Err(DecodeError::TruncatedGroup));
    }
}
