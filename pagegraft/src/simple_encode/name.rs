use super::SimpleEncoder;
use crate::{
    parse::reader::is_regular,
    pdf::Name,
    writer::{Encoder, Writer},
};

const ESCAPE: u8 = b'#';

fn needs_escape(c: u8) -> bool {
    !is_regular(c) || c == ESCAPE || !(b'!'..=b'~').contains(&c)
}

/// Length of `/name` with `#xx` escapes.
pub(crate) fn escaped_len(n: &[u8]) -> usize {
    n.iter().map(|&c| if needs_escape(c) { 3 } else { 1 }).sum::<usize>() + 1
}

pub(crate) fn write_escaped(n: &[u8], writer: &mut dyn Writer) {
    let mut last_write = 0;
    writer.write(b"/");
    for (index, &c) in n.iter().enumerate() {
        if needs_escape(c) {
            writer.write(&n[last_write..index]);
            last_write = index + 1;
            writer.write(&[ESCAPE]);
            writer.write(hex::encode_upper([c]).as_bytes());
        }
    }
    writer.write(&n[last_write..]);
}

impl Encoder<Name> for SimpleEncoder {
    fn encoded_len(n: &Name) -> usize {
        escaped_len(n)
    }

    fn write_to(n: &Name, writer: &mut dyn Writer) {
        write_escaped(n, writer);
    }
}
