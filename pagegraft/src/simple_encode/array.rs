use super::SimpleEncoder;
use crate::{
    pdf::Array,
    writer::{Encoder, Writer},
};

impl Encoder<Array> for SimpleEncoder {
    fn encoded_len(array: &Array) -> usize {
        // 1 Byte each for opening and closing bracket
        let mut size = 2;

        size += array.iter().map(|item| Self::encoded_len(item)).sum::<usize>();

        // 1 delimiter between 2 objects
        size += array.len().saturating_sub(1);

        size
    }

    fn write_to(array: &Array, writer: &mut dyn Writer) {
        writer.write(b"[");
        for (i, item) in array.iter().enumerate() {
            if i != 0 {
                writer.write(b" ");
            }
            Self::write_to(item, writer);
        }
        writer.write(b"]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pdf::{Object, Reference},
        simple_encode::to_vec,
    };

    #[test]
    fn empty_array() {
        let array = Array::new();
        assert_eq!(SimpleEncoder::encoded_len(&array), 2);
        assert_eq!(to_vec(&array), b"[]");
    }

    #[test]
    fn array_with_numbers() {
        let array = Array::from([Object::from(0i64), Object::from(612i64), Object::from(792i64)]);
        let encoded_len = SimpleEncoder::encoded_len(&array);
        assert_eq!(encoded_len, 9);
        assert_eq!(to_vec(&array), b"[0 612 792]");
    }

    #[test]
    fn nested() {
        let array = Array::from([
            Object::from(Reference::new(3)),
            Object::Array(Array::from([Object::from(1i64)])),
        ]);
        let out = to_vec(&array);
        assert_eq!(out, b"[3 0 R [1]]");
        assert_eq!(SimpleEncoder::encoded_len(&array), out.len());
    }
}
