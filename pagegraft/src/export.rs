//! Copy a part of a document's object graph into a new, self-contained set of
//! objects.

use std::io::{Read, Seek};

use fnv::FnvHashMap;

use crate::{
    error::{GraftError, Result},
    pdf::{
        document::{dict_types, INHERITABLE, K_DECODE_PARMS, K_FILTER, K_LENGTH, K_PARENT, K_TYPE},
        object::stream::filter::{self, ASCII_85_DECODE, FLATE_DECODE},
        Array, Dictionary, Document, Name, Object, ObjectId, Reference, Stream,
    },
    simple_encode::{dictionary::sorted_entries, to_vec, SimpleEncoder, StreamData},
    writer::{Encoder, Writer},
};

/// A serialized object with its new id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedObject {
    pub id: ObjectId,
    /// The object without the `obj`/`endobj` frame.
    pub data: Vec<u8>,
}

impl ExportedObject {
    /// Write `<id> 0 obj`, the data and `endobj`.
    pub fn write_indirect(&self, writer: &mut dyn Writer) {
        SimpleEncoder::write_to(self, writer);
    }
}

struct Exporter<'d, 'n, R> {
    document: &'d Document<R>,
    next_id: &'n mut dyn FnMut() -> ObjectId,
    /// Original id to new id.
    ids: FnvHashMap<ObjectId, ObjectId>,
}

impl<'d, 'n, R: Read + Seek> Exporter<'d, 'n, R> {
    /// New id for `original`, allocated on first use. Newly allocated ids are
    /// appended to `discovered` as `(new, original)`.
    fn local_id(&mut self, original: ObjectId, discovered: &mut Vec<(ObjectId, ObjectId)>) -> ObjectId {
        if let Some(&id) = self.ids.get(&original) {
            return id;
        }
        let id = (self.next_id)();
        log::trace!("object {} becomes {}", original, id);
        self.ids.insert(original, id);
        discovered.push((id, original));
        id
    }

    fn rewrite(&mut self, object: &Object, discovered: &mut Vec<(ObjectId, ObjectId)>) -> Result<Object> {
        Ok(match object {
            Object::Reference(r) => Object::Reference(Reference::new(self.local_id(r.index(), discovered))),
            Object::Array(array) => {
                let mut rewritten = Array::new();
                for item in array.iter() {
                    rewritten.push(self.rewrite(item, discovered)?);
                }
                Object::Array(rewritten)
            }
            Object::Dictionary(dict) => Object::Dictionary(self.rewrite_dictionary(dict, discovered)?),
            Object::Stream(stream) => Object::Dictionary(self.rewrite_dictionary(&stream.dictionary, discovered)?),
            other => other.clone(),
        })
    }

    /// Keys are visited in sorted order, so new ids do not depend on hashing.
    fn rewrite_dictionary(
        &mut self,
        dict: &Dictionary,
        discovered: &mut Vec<(ObjectId, ObjectId)>,
    ) -> Result<Dictionary> {
        let detached;
        let dict = if is_page(dict) {
            detached = self.detach_page(dict)?;
            &detached
        } else {
            dict
        };

        let mut rewritten = Dictionary::with_capacity(dict.len());
        for (key, value) in sorted_entries(dict) {
            rewritten.insert(key.clone(), self.rewrite(value, discovered)?);
        }
        Ok(rewritten)
    }

    /// A page without `/Parent`, which would pull in the rest of the page
    /// tree. Inherited attributes are copied onto the page instead.
    fn detach_page(&self, page: &Dictionary) -> Result<Dictionary> {
        let mut detached = page.clone();
        for key in INHERITABLE {
            if detached.contains_key(key) {
                continue;
            }
            if let Some(value) = self.document.inherited(page, key)? {
                detached.insert(Name::from(key), value.clone());
            }
        }
        detached.remove(K_PARENT);
        Ok(detached)
    }

    fn serialize(&mut self, object: &Object, discovered: &mut Vec<(ObjectId, ObjectId)>) -> Result<Vec<u8>> {
        match object {
            Object::Stream(stream) => {
                let mut source = stream.dictionary.clone();
                for key in [K_LENGTH, K_FILTER, K_DECODE_PARMS] {
                    source.remove(key);
                }
                let mut dictionary = self.rewrite_dictionary(&source, discovered)?;
                let data = self.reencode(stream)?;

                dictionary.insert(
                    Name::from(K_FILTER),
                    Object::from(vec![
                        Object::from(Name::from(ASCII_85_DECODE)),
                        Object::from(Name::from(FLATE_DECODE)),
                    ]),
                );
                dictionary.insert(Name::from(K_LENGTH), Object::from(data.len() as i64));

                Ok(to_vec(&StreamData { dictionary, data }))
            }
            other => Ok(to_vec(&self.rewrite(other, discovered)?)),
        }
    }

    /// Decode the stream with its own filters, then compress and encode it as
    /// base-85 text including the end-of-data marker.
    fn reencode(&self, stream: &Stream) -> Result<Vec<u8>> {
        let decoded = self.document.stream_bytes(stream)?;
        let compressed = filter::deflate(&decoded)
            .map_err(|err| GraftError::from_filter(self.document.source_id(), Some(stream.offset), err))?;
        let mut data = pagegraft_ascii85::encode(&compressed).into_bytes();
        data.extend_from_slice(pagegraft_ascii85::EOD_MARKER);
        log::trace!(
            "stream at {}: {} decoded bytes, {} encoded",
            stream.offset,
            decoded.len(),
            data.len()
        );
        Ok(data)
    }
}

fn is_page(dict: &Dictionary) -> bool {
    dict.get(K_TYPE).and_then(Object::name) == Some(dict_types::PAGE)
}

impl<R: Read + Seek> Document<R> {
    /// Serialize `root` and every object reachable from it with new ids.
    ///
    /// `next_id` is called once per exported object. The root gets the first
    /// id and is the first element of the result; every other object follows
    /// the object that referenced it first. Objects reachable on several
    /// paths are exported once. Streams are decoded and re-encoded with
    /// `/Filter [/ASCII85Decode /FlateDecode]`. Pages are exported without
    /// `/Parent` and carry their inherited attributes themselves.
    pub fn export<'a>(
        &'a self,
        root: &'a Object,
        next_id: &mut dyn FnMut() -> ObjectId,
    ) -> Result<Vec<ExportedObject>> {
        self.ensure_open()?;
        let mut exporter = Exporter {
            document: self,
            next_id,
            ids: FnvHashMap::default(),
        };

        let root_id = (exporter.next_id)();
        let root = match root {
            Object::Reference(reference) => {
                exporter.ids.insert(reference.index(), root_id);
                self.object(reference.index())?
            }
            direct => direct,
        };

        let mut exported = Vec::new();
        let mut stack = vec![(root_id, root)];
        while let Some((id, object)) = stack.pop() {
            let mut discovered = Vec::new();
            let data = exporter.serialize(object, &mut discovered)?;
            exported.push(ExportedObject { id, data });

            // reversed, so the first reference is exported next
            for (local, original) in discovered.into_iter().rev() {
                stack.push((local, self.object(original)?));
            }
        }

        log::debug!("{}: exported {} objects", self.source_id(), exported.len());
        Ok(exported)
    }
}
