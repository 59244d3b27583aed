use std::{collections::HashMap, fmt::Display};

pub use self::{
    document::{Document, Rect},
    object::{
        array::Array,
        name::Name,
        reference::Reference,
        scalar::Scalar,
        stream::{filter::Filter, Stream, StreamLocator},
        string::{Text, TextFlavour},
    },
    trailer::Trailer,
    xref::{XrefEntry, XrefTable},
};

pub mod document;
pub mod object;
pub mod trailer;
pub mod xref;

/// Object number as used by indirect references and the xref table.
pub type ObjectId = u32;

pub type Dictionary = HashMap<Name, Object>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Numbers, booleans, `null`, names and any other bare token, kept as
    /// written.
    Scalar(Scalar),
    Text(Text),
    Array(Array),
    Dictionary(Dictionary),
    /// A dictionary followed by a `stream` keyword.
    Stream(Stream),
    Reference(Reference),
}

impl Object {
    pub fn scalar(&self) -> Option<&Scalar> {
        if let Object::Scalar(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn integer(&self) -> Option<i64> {
        self.scalar().and_then(Scalar::integer)
    }

    /// Integers and reals as `f64`.
    pub fn real(&self) -> Option<f64> {
        self.scalar().and_then(Scalar::real)
    }

    /// Name without the leading `/`.
    pub fn name(&self) -> Option<&[u8]> {
        self.scalar().and_then(Scalar::name)
    }

    pub fn text(&self) -> Option<&Text> {
        if let Object::Text(t) = self {
            Some(t)
        } else {
            None
        }
    }

    pub fn array(&self) -> Option<&Array> {
        if let Object::Array(a) = self {
            Some(a)
        } else {
            None
        }
    }

    /// The dictionary of a plain dictionary or of a stream.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dictionary),
            _ => None,
        }
    }

    pub fn stream(&self) -> Option<&Stream> {
        if let Object::Stream(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn reference(&self) -> Option<&Reference> {
        if let Object::Reference(r) = self {
            Some(r)
        } else {
            None
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Scalar(obj) => obj.fmt(f),
            Object::Text(obj) => obj.fmt(f),
            Object::Array(obj) => obj.fmt(f),
            Object::Dictionary(obj) => write!(f, "Dictionary ({} entries)", obj.len()),
            Object::Stream(obj) => obj.fmt(f),
            Object::Reference(obj) => obj.fmt(f),
        }
    }
}

impl From<Scalar> for Object {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Self::Scalar(Scalar::from(v.to_string()))
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Self::Scalar(Scalar::from_name(&n))
    }
}

impl From<Text> for Object {
    fn from(v: Text) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(a.into())
    }
}

impl From<Array> for Object {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Self::Dictionary(d)
    }
}

impl From<Reference> for Object {
    fn from(r: Reference) -> Self {
        Self::Reference(r)
    }
}
