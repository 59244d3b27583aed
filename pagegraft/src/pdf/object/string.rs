use super::stream::filter::{decode_hex, FilterError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFlavour {
    /// `( … )`
    Literal,
    /// `< … >`
    Hex,
}

/// A string object.
///
/// The bytes between the delimiters are kept exactly as written, escape
/// sequences and hex digits included. Use [`Text::decoded`] for the payload.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Text {
    raw: Vec<u8>,
    flavour: TextFlavour,
}

impl Text {
    pub fn literal(raw: Vec<u8>) -> Self {
        Self {
            raw,
            flavour: TextFlavour::Literal,
        }
    }

    pub fn hex(raw: Vec<u8>) -> Self {
        Self {
            raw,
            flavour: TextFlavour::Hex,
        }
    }

    /// Build a literal string from an arbitrary payload, escaping backslashes,
    /// parentheses and carriage returns.
    pub fn from_bytes(payload: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(payload.len() + 2);
        for &c in payload {
            match c {
                b'\\' | b'(' | b')' => raw.extend_from_slice(&[b'\\', c]),
                b'\r' => raw.extend_from_slice(br"\r"),
                _ => raw.push(c),
            }
        }
        Self::literal(raw)
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn flavour(&self) -> TextFlavour {
        self.flavour
    }

    pub fn decoded(&self) -> Result<Vec<u8>, FilterError> {
        match self.flavour {
            TextFlavour::Hex => decode_hex(&self.raw),
            TextFlavour::Literal => Ok(unescape(&self.raw)),
        }
    }
}

fn unescape(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().copied().peekable();
    while let Some(c) = iter.next() {
        if c != b'\\' {
            out.push(c);
            continue;
        }
        match iter.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'b') => out.push(0x08),
            Some(b'f') => out.push(0x0c),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                // high-order overflow is ignored
                out.push(value as u8);
            }
            // line continuation
            Some(b'\r') => {
                if iter.peek() == Some(&b'\n') {
                    iter.next();
                }
            }
            Some(b'\n') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Text")
            .field(&self.flavour)
            .field(&String::from_utf8_lossy(&self.raw[..]))
            .finish()
    }
}

impl std::fmt::Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.flavour {
            TextFlavour::Literal => write!(f, "({})", String::from_utf8_lossy(&self.raw)),
            TextFlavour::Hex => write!(f, "<{}>", String::from_utf8_lossy(&self.raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_escapes() {
        let text = Text::literal(br"a\(b\)\\c\n\101\0".to_vec());
        assert_eq!(text.decoded().unwrap(), b"a(b)\\c\nA\0");

        let text = Text::literal(b"split \\\r\nline".to_vec());
        assert_eq!(text.decoded().unwrap(), b"split line");
    }

    #[test]
    fn hex_payload() {
        let text = Text::hex(b"48 65 6c6c 6F7".to_vec());
        assert_eq!(text.decoded().unwrap(), b"Hellop");
    }

    #[test]
    fn from_bytes_round_trip() {
        let payload = b"(unbalanced \\ paren\r";
        let text = Text::from_bytes(payload);
        assert_eq!(text.raw(), br"\(unbalanced \\ paren\r");
        assert_eq!(text.decoded().unwrap(), payload);
    }
}
