use super::SimpleEncoder;
use crate::{
    pdf::{Text, TextFlavour},
    writer::{Encoder, Writer},
};

fn delimiters(flavour: TextFlavour) -> (&'static [u8], &'static [u8]) {
    match flavour {
        TextFlavour::Literal => (b"(", b")"),
        TextFlavour::Hex => (b"<", b">"),
    }
}

/// Strings keep their source text, so they are written back unchanged.
impl Encoder<Text> for SimpleEncoder {
    fn encoded_len(t: &Text) -> usize {
        t.raw().len() + 2
    }

    fn write_to(t: &Text, writer: &mut dyn Writer) {
        let (open, close) = delimiters(t.flavour());
        writer.write(open);
        writer.write(t.raw());
        writer.write(close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple_encode::to_vec;

    #[test]
    fn literal() {
        let text = Text::literal(br"a (nested) \) string".to_vec());
        let out = to_vec(&text);
        assert_eq!(out, br"(a (nested) \) string)");
        assert_eq!(SimpleEncoder::encoded_len(&text), out.len());
    }

    #[test]
    fn hex() {
        let text = Text::hex(b"48656C6C6F".to_vec());
        assert_eq!(to_vec(&text), b"<48656C6C6F>");
        assert_eq!(SimpleEncoder::encoded_len(&text), 12);
    }

    #[test]
    fn escaped_payload() {
        let text = Text::from_bytes(b"unbalanced )(");
        let out = to_vec(&text);
        assert_eq!(out, br"(unbalanced \)\()");
        assert_eq!(text.decoded().unwrap(), b"unbalanced )(");
    }
}
