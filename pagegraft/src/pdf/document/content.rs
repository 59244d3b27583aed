use std::io::{Read, Seek};

use super::{Document, K_CONTENTS, K_DECODE_PARMS, K_FILTER, K_LENGTH, K_PREDICTOR};
use crate::{
    error::{GraftError, Result},
    pdf::{
        object::stream::filter::{decode_chain, Filter},
        Object, Stream, StreamLocator,
    },
};

impl<R: Read + Seek> Document<R> {
    /// Where the raw bytes of `stream` are and how to decode them.
    pub fn stream_locator(&self, stream: &Stream) -> Result<StreamLocator> {
        let dict = &stream.dictionary;
        let length = dict
            .get(K_LENGTH)
            .ok_or_else(|| self.format_error(Some(stream.offset), "stream has no /Length"))?;
        let length = self
            .resolve(length)?
            .integer()
            .and_then(|length| u64::try_from(length).ok())
            .ok_or_else(|| self.format_error(Some(stream.offset), "invalid stream /Length"))?;

        let filters = match dict.get(K_FILTER) {
            None => Vec::new(),
            Some(filter) => match self.resolve(filter)? {
                Object::Array(names) => names
                    .iter()
                    .map(|name| self.filter(self.resolve(name)?, stream))
                    .collect::<Result<Vec<_>>>()?,
                name => vec![self.filter(name, stream)?],
            },
        };
        self.check_decode_parms(stream)?;

        Ok(StreamLocator {
            offset: stream.offset,
            length,
            filters,
        })
    }

    fn filter(&self, name: &Object, stream: &Stream) -> Result<Filter> {
        let name = name
            .name()
            .ok_or_else(|| self.format_error(Some(stream.offset), format!("invalid /Filter entry {}", name)))?;
        Filter::from_name(name).map_err(|err| GraftError::from_filter(&self.source_id, Some(stream.offset), err))
    }

    /// Predictors are not implemented, so data using them is rejected instead
    /// of being decoded into garbage.
    fn check_decode_parms(&self, stream: &Stream) -> Result<()> {
        let parms = match stream.dictionary.get(K_DECODE_PARMS) {
            Some(parms) => self.resolve(parms)?,
            None => return Ok(()),
        };
        let entries: Vec<&Object> = match parms {
            Object::Array(entries) => entries.iter().collect(),
            other => vec![other],
        };
        for entry in entries {
            let predictor = self
                .resolve(entry)?
                .dictionary()
                .and_then(|parms| parms.get(K_PREDICTOR))
                .and_then(Object::integer);
            if let Some(predictor) = predictor.filter(|&p| p > 1) {
                return Err(self.format_error(
                    Some(stream.offset),
                    format!("/Predictor {} is not supported", predictor),
                ));
            }
        }
        Ok(())
    }

    /// Read the raw bytes of `stream` and decode them through its filters, in
    /// declared order.
    pub fn stream_bytes(&self, stream: &Stream) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let locator = self.stream_locator(stream)?;
        let raw = self.with_reader(|reader| reader.read_exact_at(locator.offset, locator.length))?;
        log::trace!(
            "stream at {}: {} raw bytes, {} filters",
            locator.offset,
            raw.len(),
            locator.filters.len()
        );
        decode_chain(&locator.filters, raw)
            .map_err(|err| GraftError::from_filter(&self.source_id, Some(locator.offset), err))
    }

    /// Decoded `/Contents` of a page. Multiple content streams are
    /// concatenated without separator.
    pub fn page_contents(&self, index: usize) -> Result<Vec<u8>> {
        let page = self.page(index)?;
        let contents = match page.get(K_CONTENTS) {
            Some(contents) => self.resolve(contents)?,
            None => return Ok(Vec::new()),
        };

        match contents {
            Object::Stream(stream) => self.stream_bytes(stream),
            Object::Array(parts) => {
                let mut data = Vec::new();
                for part in parts.iter() {
                    data.extend(self.content_stream(part, index)?);
                }
                Ok(data)
            }
            other => Err(self.format_error(
                None,
                format!("/Contents of page {} is not a stream: {}", index, other),
            )),
        }
    }

    fn content_stream(&self, part: &Object, index: usize) -> Result<Vec<u8>> {
        match self.resolve(part)? {
            Object::Stream(stream) => self.stream_bytes(stream),
            other => Err(self.format_error(
                None,
                format!("/Contents of page {} contains a non-stream: {}", index, other),
            )),
        }
    }
}
