use super::SimpleEncoder;
use crate::{
    export::ExportedObject,
    writer::{Encoder, Writer},
};

const OBJ: &[u8] = b" 0 obj\n";
const END_OBJ: &[u8] = b"\nendobj\n";

impl Encoder<ExportedObject> for SimpleEncoder {
    fn encoded_len(o: &ExportedObject) -> usize {
        o.id.to_string().len() + OBJ.len() + o.data.len() + END_OBJ.len()
    }

    fn write_to(o: &ExportedObject, writer: &mut dyn Writer) {
        log::trace!("write object {} at {}", o.id, writer.position());
        writer.write(o.id.to_string().as_bytes());
        writer.write(OBJ);
        writer.write(&o.data);
        writer.write(END_OBJ);
    }
}
