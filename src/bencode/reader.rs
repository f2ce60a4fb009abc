use super::error::BencodeError;
use bytes::Bytes;
use std::io::{self, BufRead, Read};

/// A byte source the decoder pulls from.
///
/// Decoding needs exactly three primitives: consume one byte, consume a run
/// of raw bytes, and look at the next byte without consuming it. Running out
/// of input in any of them is [`BencodeError::UnexpectedEof`].
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<u8, BencodeError>;

    /// Reads exactly `n` bytes.
    fn read_exact(&mut self, n: usize) -> Result<Bytes, BencodeError>;

    fn peek_byte(&mut self) -> Result<u8, BencodeError>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<u8, BencodeError> {
        (**self).read_byte()
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes, BencodeError> {
        (**self).read_exact(n)
    }

    fn peek_byte(&mut self) -> Result<u8, BencodeError> {
        (**self).peek_byte()
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}

/// Reads from an in-memory buffer.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl ByteSource for SliceReader<'_> {
    fn read_byte(&mut self) -> Result<u8, BencodeError> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes, BencodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(BencodeError::UnexpectedEof)?;
        let bytes = Bytes::copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(bytes)
    }

    fn peek_byte(&mut self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof)
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Reads from any buffered reader, one token at a time.
///
/// Lookahead goes through [`BufRead::fill_buf`], so a large payload is never
/// buffered as a whole before decoding starts.
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    pos: usize,
}

impl<R: BufRead> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> ByteSource for IoReader<R> {
    fn read_byte(&mut self) -> Result<u8, BencodeError> {
        let byte = self.peek_byte()?;
        self.inner.consume(1);
        self.pos += 1;
        Ok(byte)
    }

    fn read_exact(&mut self, n: usize) -> Result<Bytes, BencodeError> {
        // Grow with the data actually read instead of trusting `n` up front.
        let mut buf = Vec::with_capacity(n.min(64 * 1024));
        let read = (&mut self.inner)
            .take(n as u64)
            .read_to_end(&mut buf)
            .map_err(io_error)?;
        self.pos += read;
        if read < n {
            return Err(BencodeError::UnexpectedEof);
        }
        Ok(Bytes::from(buf))
    }

    fn peek_byte(&mut self) -> Result<u8, BencodeError> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return buf.first().copied().ok_or(BencodeError::UnexpectedEof),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(e)),
            }
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}

fn io_error(err: io::Error) -> BencodeError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        BencodeError::UnexpectedEof
    } else {
        BencodeError::Io(err)
    }
}
