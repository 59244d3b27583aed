use std::ops::Deref;

use super::name::Name;

pub const TRUE_OBJECT: &[u8] = b"true";
pub const FALSE_OBJECT: &[u8] = b"false";
pub const NULL_OBJECT: &[u8] = b"null";

/// A bare token. Numeric or name interpretation happens on access.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Scalar(Vec<u8>);

impl Scalar {
    pub fn from_name(name: &Name) -> Self {
        let mut token = Vec::with_capacity(name.len() + 1);
        token.push(b'/');
        token.extend_from_slice(name);
        Scalar(token)
    }

    fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn integer(&self) -> Option<i64> {
        self.as_str()?.parse().ok()
    }

    pub fn real(&self) -> Option<f64> {
        let s = self.as_str()?;
        // `f64::from_str` accepts `inf` and `NaN`, which are names here
        if s.bytes().all(|c| c.is_ascii_digit() || matches!(c, b'+' | b'-' | b'.')) {
            s.parse().ok()
        } else {
            None
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match &self.0[..] {
            TRUE_OBJECT => Some(true),
            FALSE_OBJECT => Some(false),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.0 == NULL_OBJECT
    }

    /// The name without its leading `/`.
    pub fn name(&self) -> Option<&[u8]> {
        self.0.strip_prefix(b"/")
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(v: Vec<u8>) -> Self {
        Scalar(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar(v.into_bytes())
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar(v.as_bytes().to_vec())
    }
}

impl Deref for Scalar {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Scalar")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &String::from_utf8_lossy(&self.0[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(Scalar::from("612").integer(), Some(612));
        assert_eq!(Scalar::from("-3").integer(), Some(-3));
        assert_eq!(Scalar::from("3.5").integer(), None);
        assert_eq!(Scalar::from("3.5").real(), Some(3.5));
        assert_eq!(Scalar::from("-.5").real(), Some(-0.5));
        assert_eq!(Scalar::from("inf").real(), None);
        assert_eq!(Scalar::from("/Page").real(), None);
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(Scalar::from("true").boolean(), Some(true));
        assert_eq!(Scalar::from("false").boolean(), Some(false));
        assert!(Scalar::from("null").is_null());
        assert_eq!(Scalar::from("/Page").name(), Some(&b"Page"[..]));
        assert_eq!(Scalar::from("Page").name(), None);
        assert_eq!(&Scalar::from_name(&Name::from_str("XObject"))[..], b"/XObject");
    }
}
