use super::SimpleEncoder;
use crate::{
    pdf::{Dictionary, Name, Object},
    writer::{Encoder, Writer},
};

/// Entries in ascending key order, so the output does not depend on the hash
/// map's iteration order.
pub(crate) fn sorted_entries(d: &Dictionary) -> Vec<(&Name, &Object)> {
    let mut entries: Vec<_> = d.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

impl Encoder<Dictionary> for SimpleEncoder {
    fn encoded_len(d: &Dictionary) -> usize {
        // 2 bytes for start and end each.
        let mut size = 4;
        size += d
            .iter()
            .map(|(n, o)| Self::encoded_len(n) + Self::encoded_len(o))
            .sum::<usize>();

        // For N entries we need N delimiters between key and value. We also need one
        // delimiter for each pair (N - 1). This leads to 2 * N - 1.
        size += (d.len() * 2).saturating_sub(1);

        size
    }

    fn write_to(d: &Dictionary, writer: &mut dyn Writer) {
        writer.write(b"<<");
        for (i, (key, value)) in sorted_entries(d).into_iter().enumerate() {
            if i != 0 {
                writer.write(b" ");
            }
            Self::write_to(key, writer);
            writer.write(b" ");
            Self::write_to(value, writer);
        }
        writer.write(b">>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple_encode::to_vec;

    #[test]
    fn empty_dict() {
        let d = Dictionary::new();
        assert_eq!(SimpleEncoder::encoded_len(&d), 4);
        assert_eq!(to_vec(&d), b"<<>>");
    }

    #[test]
    fn filled_dict() {
        let mut d = Dictionary::new();
        d.insert(b"one".to_vec().into(), Object::from(1i64));
        d.insert(b"two".to_vec().into(), Object::from(2i64));
        d.insert(b"three".to_vec().into(), Object::from(3i64));

        let expected_output = b"<</one 1 /three 3 /two 2>>";
        assert_eq!(SimpleEncoder::encoded_len(&d), expected_output.len());
        let out = to_vec(&d);
        assert_eq!(
            expected_output,
            &out[..],
            "expected: {} got: {}",
            String::from_utf8_lossy(expected_output),
            String::from_utf8_lossy(&out[..])
        );
    }

    #[test]
    fn nested_dict() {
        let d = Dictionary::from([(
            Name::from_str("Resources"),
            Object::Dictionary(Dictionary::from([(
                Name::from_str("ExtGState"),
                Object::Dictionary(Dictionary::new()),
            )])),
        )]);
        let out = to_vec(&d);
        assert_eq!(out, b"<</Resources <</ExtGState <<>>>>>>");
        assert_eq!(SimpleEncoder::encoded_len(&d), out.len());
    }
}
