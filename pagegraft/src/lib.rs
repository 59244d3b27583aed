//! Read PDF documents and copy pages and their resources into new documents.
//!
//! ```no_run
//! let doc = pagegraft::open("map.pdf")?;
//! for index in 0..doc.page_count() {
//!     let media_box = doc.media_box(index)?;
//!     println!("page {}: {} x {}", index, media_box.width(), media_box.height());
//! }
//! # Ok::<(), pagegraft::Error>(())
//! ```

use std::{fs::File, path::Path};

pub mod error;
pub mod export;
pub mod options;
pub mod parse;
pub mod pdf;
pub mod simple_encode;
pub mod writer;

pub use error::{ErrorKind, GraftError as Error, Result};
pub use export::ExportedObject;
pub use options::OpenOptions;
pub use pdf::{Dictionary, Document, Object, ObjectId, Rect};

/// Open the document at `path` with default options.
pub fn open(path: impl AsRef<Path>) -> Result<Document<File>> {
    Document::open(path)
}
