use super::SimpleEncoder;
use crate::{
    pdf::Dictionary,
    writer::{Encoder, Writer},
};

pub const START_STREAM: &[u8] = b"\nstream\n";
pub const END_STREAM: &[u8] = b"\nendstream";

/// A stream dictionary together with its (already encoded) data.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamData {
    pub dictionary: Dictionary,
    pub data: Vec<u8>,
}

impl Encoder<StreamData> for SimpleEncoder {
    fn encoded_len(s: &StreamData) -> usize {
        Self::encoded_len(&s.dictionary) + START_STREAM.len() + s.data.len() + END_STREAM.len()
    }

    fn write_to(s: &StreamData, writer: &mut dyn Writer) {
        Self::write_to(&s.dictionary, writer);
        writer.write(START_STREAM);
        writer.write(&s.data);
        writer.write(END_STREAM);
    }
}
