use std::{borrow::Borrow, ops::Deref};

/// Dictionary key or name value, stored without the leading `/` and with
/// `#xx` escapes resolved.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Vec<u8>);

impl Name {
    pub const fn new(n: Vec<u8>) -> Self {
        Self(n)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(s.as_bytes().to_owned())
    }

    /// Resolve the `#xx` escapes of a name as written in a document. Invalid
    /// escapes are kept verbatim.
    pub fn from_escaped(raw: &[u8]) -> Self {
        let mut name = Vec::with_capacity(raw.len());
        let mut rest = raw;
        while let Some((&chr, tail)) = rest.split_first() {
            if chr == b'#' && tail.len() >= 2 {
                let mut byte = [0u8; 1];
                if hex::decode_to_slice(&tail[..2], &mut byte).is_ok() {
                    name.push(byte[0]);
                    rest = &tail[2..];
                    continue;
                }
            }
            name.push(chr);
            rest = tail;
        }
        Self(name)
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<Vec<u8>> for Name {
    fn from(v: Vec<u8>) -> Self {
        Name(v)
    }
}

impl From<&[u8]> for Name {
    fn from(v: &[u8]) -> Self {
        Name(v.to_vec())
    }
}

impl Deref for Name {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", &String::from_utf8_lossy(&self.0[..]))
    }
}
