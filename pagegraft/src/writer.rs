/// Byte sink used by the encoders.
pub trait Writer {
    fn write(&mut self, buf: &[u8]);

    /// Number of bytes written so far.
    fn position(&self) -> usize;
}

impl Writer for Vec<u8> {
    fn write(&mut self, buf: &[u8]) {
        self.extend_from_slice(buf);
    }

    fn position(&self) -> usize {
        self.len()
    }
}

/// Serialization of `T` in a specific output style.
///
/// `encoded_len` must match the number of bytes `write_to` produces.
pub trait Encoder<T: ?Sized> {
    fn encoded_len(o: &T) -> usize;
    fn write_to(o: &T, writer: &mut dyn Writer);
}
