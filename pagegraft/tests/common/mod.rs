#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::{write::ZlibEncoder, Compression};
use pagegraft::{Document, ObjectId, OpenOptions};

/// Builds small documents in memory, with correct xref offsets.
///
/// Objects are collected until `section` writes an xref section for them, so
/// calling `section` twice produces an incremental update.
pub struct Fixture {
    data: Vec<u8>,
    pending: Vec<(ObjectId, usize)>,
    last_xref: Option<usize>,
    size: ObjectId,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            data: b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec(),
            pending: Vec::new(),
            last_xref: None,
            size: 1,
        }
    }

    pub fn object(&mut self, id: ObjectId, body: &str) -> &mut Self {
        self.raw_object(id, body.as_bytes())
    }

    /// A stream object, `/Length` is added.
    pub fn stream(&mut self, id: ObjectId, entries: &str, data: &[u8]) -> &mut Self {
        let mut body = format!("<< /Length {} {} >>\nstream\n", data.len(), entries).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.raw_object(id, &body)
    }

    pub fn raw_object(&mut self, id: ObjectId, body: &[u8]) -> &mut Self {
        self.pending.push((id, self.data.len()));
        self.size = self.size.max(id + 1);
        write!(self.data, "{} 0 obj\n", id).unwrap();
        self.data.extend_from_slice(body);
        self.data.extend_from_slice(b"\nendobj\n");
        self
    }

    pub fn offset_of_last(&self) -> usize {
        self.pending.last().map(|(_, offset)| *offset).unwrap()
    }

    /// Write an xref section for the pending objects and its trailer.
    pub fn section(&mut self, trailer_entries: &str) -> &mut Self {
        let xref = self.data.len();
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_unstable();

        self.data.extend_from_slice(b"xref\n0 1\n0000000000 65535 f\r\n");
        for (id, offset) in pending {
            write!(self.data, "{} 1\n{:010} 00000 n\r\n", id, offset).unwrap();
        }
        write!(self.data, "trailer\n<< /Size {} {}", self.size, trailer_entries).unwrap();
        if let Some(prev) = self.last_xref {
            write!(self.data, " /Prev {}", prev).unwrap();
        }
        self.data.extend_from_slice(b" >>\n");
        self.last_xref = Some(xref);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        let mut data = self.data.clone();
        write!(data, "startxref\n{}\n%%EOF\n", self.last_xref.unwrap()).unwrap();
        data
    }

    pub fn try_open(&mut self) -> pagegraft::Result<Document<Cursor<Vec<u8>>>> {
        Document::from_reader(Cursor::new(self.finish()), "fixture.pdf", &OpenOptions::default())
    }

    pub fn open(&mut self) -> Document<Cursor<Vec<u8>>> {
        self.try_open().unwrap()
    }
}

/// Catalog (1) and a page tree node (2) with the given kids.
pub fn with_page_tree(kids: &str) -> Fixture {
    let mut fixture = Fixture::new();
    fixture
        .object(1, "<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, &format!("<< /Type /Pages /Kids [{}] >>", kids));
    fixture
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn counter(start: ObjectId) -> impl FnMut() -> ObjectId {
    let mut next = start;
    move || {
        let id = next;
        next += 1;
        id
    }
}
