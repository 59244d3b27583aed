use std::{
    cell::RefCell,
    fs::File,
    io::{Read, Seek},
    path::Path,
};

use fnv::{FnvHashMap, FnvHashSet};

use self::pages::PageEntry;
use crate::{
    error::{GraftError, Result},
    options::OpenOptions,
    parse::{
        self,
        object::{parse_object, parse_object_header, parse_object_trailer_marker},
        xref, TokenReader,
    },
    pdf::{Dictionary, Object, ObjectId, Reference, Stream, Trailer, XrefTable},
};

mod content;
mod pages;

/// Dictionary type names
pub(crate) mod dict_types {
    pub const PAGE: &[u8] = b"Page";
    pub const PAGES: &[u8] = b"Pages";
}

pub(crate) const K_TYPE: &[u8] = b"Type";
pub(crate) const K_PAGES: &[u8] = b"Pages";
pub(crate) const K_KIDS: &[u8] = b"Kids";
pub(crate) const K_PARENT: &[u8] = b"Parent";
pub(crate) const K_MEDIA_BOX: &[u8] = b"MediaBox";
pub(crate) const K_RESOURCES: &[u8] = b"Resources";
pub(crate) const K_EXT_G_STATE: &[u8] = b"ExtGState";
pub(crate) const K_XOBJECT: &[u8] = b"XObject";
pub(crate) const K_CONTENTS: &[u8] = b"Contents";
pub(crate) const K_LENGTH: &[u8] = b"Length";
pub(crate) const K_FILTER: &[u8] = b"Filter";
pub(crate) const K_DECODE_PARMS: &[u8] = b"DecodeParms";
pub(crate) const K_PREDICTOR: &[u8] = b"Predictor";
pub(crate) const K_CROP_BOX: &[u8] = b"CropBox";
pub(crate) const K_ROTATE: &[u8] = b"Rotate";

/// Page attributes a page takes from its ancestors when it lacks them.
pub(crate) const INHERITABLE: [&[u8]; 4] = [K_RESOURCES, K_MEDIA_BOX, K_CROP_BOX, K_ROTATE];

/// Rectangle given by two corners, e.g. a `/MediaBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }
}

/// A loaded document.
///
/// All objects are parsed while opening. The source stays open so stream data
/// can be read on demand, until [`Document::close`] is called or the document
/// is dropped.
pub struct Document<R = File> {
    source_id: String,
    reader: RefCell<Option<TokenReader<R>>>,
    version: (u8, u8),
    xref: XrefTable,
    objects: FnvHashMap<ObjectId, Object>,
    trailer: Dictionary,
    root: Reference,
    pages: Vec<PageEntry>,
}

impl Document<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &OpenOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let source_id = path.as_ref().display().to_string();
        let file = File::open(path.as_ref()).map_err(|err| GraftError::io(&source_id, err))?;
        Self::from_reader(file, source_id, options)
    }
}

impl<R: Read + Seek> Document<R> {
    /// Load a document from any seekable source. `source_id` names the source
    /// in diagnostics.
    ///
    /// The source is dropped again if loading fails.
    pub fn from_reader(source: R, source_id: impl Into<String>, options: &OpenOptions) -> Result<Self> {
        let source_id = source_id.into();
        let mut reader = TokenReader::new(source, source_id.clone())?;

        let version = parse::signature(&mut reader)?;
        if let Some(max_size) = options.max_size {
            if reader.len() > max_size {
                return Err(GraftError::format(
                    &source_id,
                    None,
                    format!("document has {} bytes, the limit is {}", reader.len(), max_size),
                ));
            }
        }

        let entry_offset = xref::startxref(&mut reader, options.footer_window)?;
        let (trailer, xref) = xref::resolve(&mut reader, entry_offset)?;
        let parsed_trailer =
            Trailer::try_from(&trailer).map_err(|err| reader.error(entry_offset, err.to_string()))?;
        if parsed_trailer.encrypted {
            return Err(reader.error(entry_offset, "encrypted documents are not supported"));
        }

        let objects = load_objects(&mut reader, &xref)?;

        let mut document = Self {
            source_id,
            reader: RefCell::new(Some(reader)),
            version,
            xref,
            objects,
            trailer,
            root: parsed_trailer.root,
            pages: Vec::new(),
        };
        document.pages = pages::flatten(&document)?;
        log::debug!(
            "{}: {} objects, {} pages",
            document.source_id,
            document.objects.len(),
            document.pages.len()
        );

        Ok(document)
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// `(major, minor)` from the `%PDF-` signature.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    pub fn xref(&self) -> &XrefTable {
        &self.xref
    }

    /// The merged trailer dictionary.
    pub fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    /// Reference to the document catalog.
    pub fn root(&self) -> Reference {
        self.root
    }

    /// Release the source. Afterwards every query fails with a closed error.
    pub fn close(&mut self) {
        if self.reader.get_mut().take().is_some() {
            log::debug!("{}: closed", self.source_id);
        }
        self.objects.clear();
        self.pages.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.reader.borrow().is_none()
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(GraftError::Closed {
                source_id: self.source_id.clone(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn format_error(&self, offset: Option<u64>, message: impl Into<String>) -> GraftError {
        GraftError::format(&self.source_id, offset, message)
    }

    /// Run `f` with exclusive access to the source.
    pub(crate) fn with_reader<T>(&self, f: impl FnOnce(&mut TokenReader<R>) -> Result<T>) -> Result<T> {
        let mut reader = self.reader.borrow_mut();
        match reader.as_mut() {
            Some(reader) => f(reader),
            None => Err(GraftError::Closed {
                source_id: self.source_id.clone(),
            }),
        }
    }

    /// The object with the given id.
    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.ensure_open()?;
        self.objects
            .get(&id)
            .ok_or_else(|| self.format_error(None, format!("object {} is not defined", Reference::new(id))))
    }

    /// Follow references until a direct object is reached.
    pub fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        let mut current = object;
        let mut visited = FnvHashSet::default();
        while let Object::Reference(reference) = current {
            if !visited.insert(reference.index()) {
                return Err(self.format_error(None, format!("reference cycle at {}", reference)));
            }
            current = self.object(reference.index())?;
        }
        Ok(current)
    }

    /// Resolve `object` and require a dictionary (or stream dictionary).
    pub(crate) fn resolve_dictionary<'a>(&'a self, object: &'a Object, what: &str) -> Result<&'a Dictionary> {
        let resolved = self.resolve(object)?;
        resolved
            .dictionary()
            .ok_or_else(|| self.format_error(None, format!("{} is not a dictionary: {}", what, resolved)))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_entry(&self, index: usize) -> Result<&PageEntry> {
        self.ensure_open()?;
        self.pages.get(index).ok_or_else(|| GraftError::PageOutOfRange {
            source_id: self.source_id.clone(),
            index,
            count: self.pages.len(),
        })
    }

    /// The page dictionary at `index` in document order.
    pub fn page(&self, index: usize) -> Result<&Dictionary> {
        Ok(&self.page_entry(index)?.dictionary)
    }

    /// The page as an exportable object: a reference if the page is an
    /// indirect object, the dictionary otherwise.
    pub fn page_object(&self, index: usize) -> Result<Object> {
        let entry = self.page_entry(index)?;
        Ok(match entry.reference {
            Some(reference) => Object::Reference(reference),
            None => Object::Dictionary(entry.dictionary.clone()),
        })
    }

    pub fn media_box(&self, index: usize) -> Result<Rect> {
        let page = self.page(index)?;
        let media_box = self
            .inherited(page, K_MEDIA_BOX)?
            .ok_or_else(|| self.format_error(None, format!("page {} has no /MediaBox", index)))?;

        let invalid = || self.format_error(None, format!("invalid /MediaBox on page {}", index));
        let corners = self.resolve(media_box)?.array().ok_or_else(invalid)?;
        if corners.len() != 4 {
            return Err(invalid());
        }
        let mut values = [0f64; 4];
        for (value, corner) in values.iter_mut().zip(corners.iter()) {
            *value = self.resolve(corner)?.real().ok_or_else(invalid)?;
        }

        Ok(Rect {
            x1: values[0],
            y1: values[1],
            x2: values[2],
            y2: values[3],
        })
    }

    /// `/ExtGState` of the page resources, empty if there is none.
    pub fn ext_g_state(&self, index: usize) -> Result<Dictionary> {
        self.resource(index, K_EXT_G_STATE)
    }

    /// `/XObject` of the page resources, empty if there is none.
    pub fn x_object(&self, index: usize) -> Result<Dictionary> {
        self.resource(index, K_XOBJECT)
    }

    fn resource(&self, index: usize, key: &[u8]) -> Result<Dictionary> {
        let page = self.page(index)?;
        let resources = match self.inherited(page, K_RESOURCES)? {
            Some(resources) => self.resolve_dictionary(resources, "/Resources")?,
            None => return Ok(Dictionary::new()),
        };
        match resources.get(key) {
            Some(entry) => Ok(self
                .resolve_dictionary(entry, &String::from_utf8_lossy(key))?
                .clone()),
            None => Ok(Dictionary::new()),
        }
    }

    /// Look up `key` on the page or, if it is missing there, on its ancestors.
    pub(crate) fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Result<Option<&'a Object>> {
        let mut node = page;
        let mut visited = FnvHashSet::default();
        loop {
            if let Some(value) = node.get(key) {
                return Ok(Some(value));
            }
            let parent = match node.get(K_PARENT) {
                Some(parent) => parent,
                None => return Ok(None),
            };
            if let Object::Reference(reference) = parent {
                if !visited.insert(reference.index()) {
                    return Err(self.format_error(None, format!("/Parent cycle at {}", reference)));
                }
            }
            node = self.resolve_dictionary(parent, "/Parent")?;
        }
    }

    /// Objects in ascending id order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        let mut ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.objects.get(&id).map(|o| (id, o)))
    }
}

/// Parse every object listed in `xref`.
fn load_objects<R: Read + Seek>(
    reader: &mut TokenReader<R>,
    xref: &XrefTable,
) -> Result<FnvHashMap<ObjectId, Object>> {
    let mut objects = FnvHashMap::default();

    for (id, offset) in xref.iter() {
        if offset >= reader.len() {
            return Err(reader.error(offset, format!("object {} lies behind the end of the document", id)));
        }
        reader.seek(offset)?;
        let found = parse_object_header(reader)?;
        if found != id {
            return Err(reader.error(offset, format!("expected object {}, found object {}", id, found)));
        }

        let object = parse_object(reader)?;
        let object = match parse_object_trailer_marker(reader)? {
            None => object,
            Some(data_offset) => match object {
                Object::Dictionary(dictionary) => {
                    if !dictionary.contains_key(K_LENGTH) {
                        return Err(reader.error(offset, format!("stream object {} has no /Length", id)));
                    }
                    Object::Stream(Stream {
                        dictionary,
                        offset: data_offset,
                    })
                }
                other => {
                    return Err(reader.error(
                        offset,
                        format!("object {} is followed by `stream` but is not a dictionary: {}", id, other),
                    ))
                }
            },
        };

        log::trace!("object {} at {}: {}", id, offset, object);
        objects.insert(id, object);
    }

    log::debug!("loaded {} objects", objects.len());
    Ok(objects)
}
