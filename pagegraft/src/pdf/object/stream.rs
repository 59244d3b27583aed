use std::fmt::Display;

use self::filter::Filter;
use crate::pdf::Dictionary;

pub mod filter;

/// A stream dictionary and the position of its raw data.
///
/// The data itself stays in the source until it is materialized through
/// [`crate::pdf::Document::stream_bytes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub dictionary: Dictionary,
    /// Byte offset of the first data byte, right after the `stream` keyword
    /// and its line ending.
    pub offset: u64,
}

impl Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stream at {} ({} entries)", self.offset, self.dictionary.len())
    }
}

/// Resolved location of a stream's raw bytes and the filters to decode them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamLocator {
    pub offset: u64,
    pub length: u64,
    /// In the order they have to be applied for decoding.
    pub filters: Vec<Filter>,
}
