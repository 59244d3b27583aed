use crate::{
    pdf::{Object, Reference, Scalar},
    writer::{Encoder, Writer},
};

pub use self::stream::StreamData;

pub mod array;
pub mod dictionary;
pub mod indirect;
pub mod name;
pub mod stream;
pub mod string;

/// Compact serialization with single spaces between tokens.
pub struct SimpleEncoder;

impl Encoder<Object> for SimpleEncoder {
    fn encoded_len(obj: &Object) -> usize {
        match obj {
            Object::Scalar(s) => Self::encoded_len(s),
            Object::Text(t) => Self::encoded_len(t),
            Object::Array(a) => Self::encoded_len(a),
            Object::Dictionary(d) => Self::encoded_len(d),
            Object::Stream(s) => Self::encoded_len(&s.dictionary),
            Object::Reference(r) => Self::encoded_len(r),
        }
    }

    fn write_to(obj: &Object, writer: &mut dyn Writer) {
        match obj {
            Object::Scalar(s) => Self::write_to(s, writer),
            Object::Text(t) => Self::write_to(t, writer),
            Object::Array(a) => Self::write_to(a, writer),
            Object::Dictionary(d) => Self::write_to(d, writer),
            // the data is written separately, see `StreamData`
            Object::Stream(s) => Self::write_to(&s.dictionary, writer),
            Object::Reference(r) => Self::write_to(r, writer),
        }
    }
}

/// Names are stored unescaped and get their `#xx` escapes back here.
impl Encoder<Scalar> for SimpleEncoder {
    fn encoded_len(s: &Scalar) -> usize {
        match s.name() {
            Some(n) => name::escaped_len(n),
            None => s.len(),
        }
    }

    fn write_to(s: &Scalar, writer: &mut dyn Writer) {
        match s.name() {
            Some(n) => name::write_escaped(n, writer),
            None => writer.write(s),
        }
    }
}

impl Encoder<Reference> for SimpleEncoder {
    fn encoded_len(r: &Reference) -> usize {
        r.index().to_string().len() + 4
    }

    fn write_to(r: &Reference, writer: &mut dyn Writer) {
        writer.write(r.index().to_string().as_bytes());
        writer.write(b" 0 R");
    }
}

/// Serialize `obj` into a new buffer.
pub fn to_vec<T: ?Sized>(obj: &T) -> Vec<u8>
where
    SimpleEncoder: Encoder<T>,
{
    let mut out = Vec::with_capacity(SimpleEncoder::encoded_len(obj));
    SimpleEncoder::write_to(obj, &mut out);
    out
}
