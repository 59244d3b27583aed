use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use crate::error::{GraftError, Result};

pub(crate) const COMMENT: u8 = b'%';

pub fn is_whitespace(chr: u8) -> bool {
    matches!(chr, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

pub fn is_delimiter(chr: u8) -> bool {
    matches!(
        chr,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

pub fn is_regular(chr: u8) -> bool {
    !is_delimiter(chr) && !is_whitespace(chr)
}

/// Byte cursor over a seekable source.
///
/// Tracks its own position so peeking and restoring never needs to query the
/// underlying handle. All errors carry the source identifier.
pub struct TokenReader<R> {
    inner: BufReader<R>,
    position: u64,
    len: u64,
    source_id: String,
}

impl<R: Read + Seek> TokenReader<R> {
    pub fn new(inner: R, source_id: impl Into<String>) -> Result<Self> {
        let source_id = source_id.into();
        let mut inner = BufReader::new(inner);
        let len = inner
            .seek(SeekFrom::End(0))
            .and_then(|len| inner.seek(SeekFrom::Start(0)).map(|_| len))
            .map_err(|err| GraftError::io(&source_id, err))?;

        Ok(Self {
            inner,
            position: 0,
            len,
            source_id,
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.len
    }

    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset == self.position {
            return Ok(());
        }
        let delta = offset as i64 - self.position as i64;
        // keeps the buffer if the target is still inside of it
        self.inner
            .seek_relative(delta)
            .map_err(|err| GraftError::io(&self.source_id, err))?;
        self.position = offset;
        Ok(())
    }

    pub(crate) fn error(&self, offset: u64, message: impl Into<String>) -> GraftError {
        GraftError::format(&self.source_id, Some(offset), message)
    }

    pub(crate) fn end_of_input(&self) -> GraftError {
        GraftError::UnexpectedEndOfInput {
            source_id: self.source_id.clone(),
            offset: self.position,
        }
    }

    /// Next byte without consuming it, comments are not special.
    pub fn peek_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.inner.fill_buf().map(|buf| buf.first().copied());
        byte.map_err(|err| GraftError::io(&self.source_id, err))
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.inner.consume(1);
            self.position += 1;
        }
        Ok(byte)
    }

    /// Consume a comment up to and including its line ending. Returns the line
    /// ending, `None` if the input ended first.
    fn skip_comment(&mut self) -> Result<Option<u8>> {
        loop {
            match self.read_byte()? {
                Some(eol @ (b'\n' | b'\r')) => return Ok(Some(eol)),
                Some(_) => continue,
                None => return Ok(None),
            }
        }
    }

    /// Consume and return the next byte.
    ///
    /// With `skip_comments` a comment is consumed and its line ending returned
    /// instead, so callers see plain whitespace.
    pub fn next_char(&mut self, skip_comments: bool) -> Result<u8> {
        let chr = self.read_byte()?.ok_or_else(|| self.end_of_input())?;
        if skip_comments && chr == COMMENT {
            return self.skip_comment()?.ok_or_else(|| self.end_of_input());
        }
        Ok(chr)
    }

    /// Like [`Self::next_char`] but the position is restored afterwards.
    pub fn peek_char(&mut self, skip_comments: bool) -> Result<u8> {
        match self.peek_byte()? {
            Some(COMMENT) if skip_comments => {
                let saved = self.position;
                let chr = self.next_char(true);
                self.seek(saved)?;
                chr
            }
            Some(chr) => Ok(chr),
            None => Err(self.end_of_input()),
        }
    }

    /// Skip whitespace and comments. Stops at the end of input without error.
    pub fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(chr) = self.peek_byte()? {
            if chr == COMMENT {
                self.skip_comment()?;
            } else if is_whitespace(chr) {
                self.read_byte()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Read regular bytes up to the next whitespace or delimiter. The
    /// terminating byte is not consumed. Empty at the end of input.
    pub fn read_token(&mut self) -> Result<Vec<u8>> {
        let mut token = Vec::new();
        while let Some(chr) = self.peek_byte()? {
            if !is_regular(chr) {
                break;
            }
            token.push(chr);
            self.read_byte()?;
        }
        Ok(token)
    }

    /// Read up to the next line ending (`\n`, `\r` or `\r\n`), which is
    /// consumed but not returned.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        if self.at_end() {
            return Err(self.end_of_input());
        }
        let mut line = Vec::new();
        while let Some(chr) = self.read_byte()? {
            match chr {
                b'\n' => break,
                b'\r' => {
                    if self.peek_byte()? == Some(b'\n') {
                        self.read_byte()?;
                    }
                    break;
                }
                _ => line.push(chr),
            }
        }
        Ok(line)
    }

    /// Consume at most one line ending.
    pub fn skip_line_ending(&mut self) -> Result<()> {
        match self.peek_byte()? {
            Some(b'\r') => {
                self.read_byte()?;
                if self.peek_byte()? == Some(b'\n') {
                    self.read_byte()?;
                }
            }
            Some(b'\n') => {
                self.read_byte()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read_exact_at(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let end = offset.checked_add(len).filter(|&end| end <= self.len);
        if end.is_none() {
            return Err(GraftError::UnexpectedEndOfInput {
                source_id: self.source_id.clone(),
                offset: self.len,
            });
        }
        self.seek(offset)?;

        let len = usize::try_from(len).map_err(|_| self.error(offset, "stream too large"))?;
        let mut buf = vec![0; len];
        self.inner.read_exact(&mut buf).map_err(|err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                self.end_of_input()
            } else {
                GraftError::io(&self.source_id, err)
            }
        })?;
        self.position += len as u64;
        Ok(buf)
    }

    /// Read the last `window` bytes of the source. Returns the offset of the
    /// first returned byte.
    pub fn read_tail(&mut self, window: u64) -> Result<(u64, Vec<u8>)> {
        let start = self.len.saturating_sub(window);
        let tail = self.read_exact_at(start, self.len - start)?;
        Ok((start, tail))
    }
}
