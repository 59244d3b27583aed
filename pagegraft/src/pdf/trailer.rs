use thiserror::Error;

use super::{Dictionary, Object, Reference};

pub const K_SIZE: &[u8] = b"Size";
pub const K_PREVIOUS: &[u8] = b"Prev";
pub const K_ENCRYPT: &[u8] = b"Encrypt";
pub const K_ROOT: &[u8] = b"Root";
pub const K_INFO: &[u8] = b"Info";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrailerError {
    #[error("invalid /Size in trailer")]
    InvalidSize,
    #[error("trailer has no /Root")]
    MissingRoot,
    #[error("/Root in trailer is not a reference")]
    InvalidRoot,
    #[error("invalid /Prev in trailer")]
    InvalidPrevious,
    #[error("/Info in trailer is not a reference")]
    InvalidInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    /// Highest object number used in the document plus one.
    pub size: Option<usize>,

    /// Byte offset of the previous xref section.
    pub previous: Option<u64>,

    /// Reference to the document catalog.
    pub root: Reference,

    /// Information for this document.
    pub info: Option<Reference>,

    /// Whether the trailer announces an `/Encrypt` dictionary.
    pub encrypted: bool,
}

impl Trailer {
    /// The `/Prev` offset of a trailer dictionary, if any.
    pub fn previous_of(dict: &Dictionary) -> Result<Option<u64>, TrailerError> {
        dict.get(K_PREVIOUS)
            .map(|prev| {
                prev.integer()
                    .and_then(|prev| u64::try_from(prev).ok())
                    .ok_or(TrailerError::InvalidPrevious)
            })
            .transpose()
    }
}

impl TryFrom<&Dictionary> for Trailer {
    type Error = TrailerError;

    fn try_from(dict: &Dictionary) -> Result<Self, Self::Error> {
        Ok(Trailer {
            size: dict
                .get(K_SIZE)
                .map(|size| {
                    size.integer()
                        .and_then(|size| usize::try_from(size).ok())
                        .ok_or(TrailerError::InvalidSize)
                })
                .transpose()?,

            previous: Self::previous_of(dict)?,

            root: dict
                .get(K_ROOT)
                .ok_or(TrailerError::MissingRoot)?
                .reference()
                .copied()
                .ok_or(TrailerError::InvalidRoot)?,

            info: dict
                .get(K_INFO)
                .map(|o| o.reference().copied().ok_or(TrailerError::InvalidInfo))
                .transpose()?,

            encrypted: dict.get(K_ENCRYPT).map_or(false, |enc| !matches!(enc, Object::Scalar(s) if s.is_null())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{Name, Scalar};

    #[test]
    fn from_dictionary() {
        let dict = Dictionary::from([
            (Name::from_str("Size"), Object::from(12i64)),
            (Name::from_str("Root"), Object::from(Reference::new(1))),
            (Name::from_str("Prev"), Object::from(4711i64)),
        ]);
        let trailer = Trailer::try_from(&dict).unwrap();
        assert_eq!(trailer.size, Some(12));
        assert_eq!(trailer.previous, Some(4711));
        assert_eq!(trailer.root, Reference::new(1));
        assert_eq!(trailer.info, None);
        assert!(!trailer.encrypted);
    }

    #[test]
    fn invalid_entries() {
        let dict = Dictionary::from([(Name::from_str("Size"), Object::from(1i64))]);
        assert_eq!(Trailer::try_from(&dict), Err(TrailerError::MissingRoot));

        let dict = Dictionary::from([(Name::from_str("Root"), Object::from(1i64))]);
        assert_eq!(Trailer::try_from(&dict), Err(TrailerError::InvalidRoot));

        let dict = Dictionary::from([(Name::from_str("Prev"), Object::from(Scalar::from("-1")))]);
        assert_eq!(Trailer::previous_of(&dict), Err(TrailerError::InvalidPrevious));
    }

    #[test]
    fn encrypted() {
        let dict = Dictionary::from([
            (Name::from_str("Root"), Object::from(Reference::new(1))),
            (Name::from_str("Encrypt"), Object::from(Reference::new(9))),
        ]);
        assert!(Trailer::try_from(&dict).unwrap().encrypted);
    }
}
