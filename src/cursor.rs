//! Sequential byte reader and writer with a fixed integer byte order.
//!
//! The byte order is a type parameter (`LittleEndian`, `BigEndian`) chosen at
//! construction. Every read is bounds-checked and fails with
//! [`TapError::OutOfRange`] instead of panicking, so truncated input surfaces
//! as an ordinary error.

use std::marker::PhantomData;

use byteorder::ByteOrder;

use crate::error::{Result, TapError};

pub struct ByteReader<'a, B: ByteOrder> {
    data: &'a [u8],
    pos: usize,
    order: PhantomData<B>,
}

impl<'a, B: ByteOrder> ByteReader<'a, B> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            order: PhantomData,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Takes `len` raw bytes. A short read leaves the cursor where it was.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(TapError::OutOfRange {
                offset: self.pos,
                needed: len,
                remaining,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(B::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(B::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_bytes(1)?[0] as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(B::read_i16(self.read_bytes(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(B::read_i32(self.read_bytes(4)?))
    }

    /// Reads `len` bytes as ASCII text.
    ///
    /// Bytes outside the ASCII range become U+FFFD so a corrupt signature is
    /// still printable when it is reported.
    pub fn read_ascii(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
            .collect())
    }
}

pub struct ByteWriter<B: ByteOrder> {
    buf: Vec<u8>,
    order: PhantomData<B>,
}

impl<B: ByteOrder> ByteWriter<B> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            order: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        B::write_u16(&mut bytes, value);
        self.write_bytes(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        B::write_u32(&mut bytes, value);
        self.write_bytes(&bytes);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub fn write_i16(&mut self, value: i16) {
        let mut bytes = [0u8; 2];
        B::write_i16(&mut bytes, value);
        self.write_bytes(&bytes);
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        B::write_i32(&mut bytes, value);
        self.write_bytes(&bytes);
    }

    /// Appends the ASCII characters of `text`; anything else is dropped.
    pub fn write_ascii(&mut self, text: &str) {
        self.buf
            .extend(text.chars().filter(char::is_ascii).map(|c| c as u8));
    }
}

impl<B: ByteOrder> Default for ByteWriter<B> {
    fn default() -> Self {
        Self::new()
    }
}
