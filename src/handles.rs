// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides the two small building blocks shared by the
//! decoders: a fixed-capacity inline byte buffer that holds the unconsumed
//! tail of a chunk (and the offending bytes of an error), and a byte source
//! that reads through that tail and the next chunk as if they were one
//! contiguous slice.
//!
//! Neither allocates. The longest sequence either decoder ever needs to
//! hold is four bytes (a four-byte UTF-8 sequence or a UTF-16 surrogate
//! pair).

use std::fmt;
use std::ops::Deref;

/// Up to four bytes stored inline.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct InlineBytes {
    bytes: [u8; 4],
    len: u8,
}

impl InlineBytes {
    pub const CAPACITY: usize = 4;

    #[inline(always)]
    pub const fn new() -> InlineBytes {
        InlineBytes {
            bytes: [0u8; 4],
            len: 0,
        }
    }

    /// Copies `src` into a new buffer.
    ///
    /// # Panics
    ///
    /// If `src` is longer than `CAPACITY`.
    pub fn from_slice(src: &[u8]) -> InlineBytes {
        assert!(src.len() <= InlineBytes::CAPACITY);
        let mut ret = InlineBytes::new();
        ret.bytes[..src.len()].copy_from_slice(src);
        ret.len = src.len() as u8;
        ret
    }

    /// # Panics
    ///
    /// If `self` already holds `CAPACITY` bytes.
    #[inline(always)]
    pub(crate) fn push(&mut self, byte: u8) {
        debug_assert!((self.len as usize) < InlineBytes::CAPACITY);
        self.bytes[self.len as usize] = byte;
        self.len += 1;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Empties `self`, returning the previous contents.
    #[inline(always)]
    pub fn take(&mut self) -> InlineBytes {
        ::std::mem::take(self)
    }
}

impl Deref for InlineBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for InlineBytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.as_slice().iter().map(|b| ByteDisplay(*b)))
            .finish()
    }
}

/// Renders as `[ 0xE2 0x98 ]`.
impl fmt::Display for InlineBytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        for byte in self.as_slice() {
            write!(f, " {}", ByteDisplay(*byte))?;
        }
        f.write_str(" ]")
    }
}

/// Renders a byte as `0xAB`.
#[derive(Copy, Clone)]
pub struct ByteDisplay(pub u8);

impl fmt::Display for ByteDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

impl fmt::Debug for ByteDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// Byte source

/// Reads the bytes reserved by the previous call followed by the bytes of
/// the current chunk.
///
/// Positions are indices into the logical concatenation. Callers check
/// `remaining()` before reading; reading past the end panics.
pub struct ByteSource<'a> {
    head: InlineBytes,
    tail: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource<'a> {
    #[inline(always)]
    pub fn new(head: InlineBytes, tail: &'a [u8]) -> ByteSource<'a> {
        ByteSource {
            head,
            tail,
            pos: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.len() - self.pos
    }

    #[inline(always)]
    pub fn consumed(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    fn byte_at(&self, index: usize) -> u8 {
        let head_len = self.head.len();
        if index < head_len {
            self.head.as_slice()[index]
        } else {
            self.tail[index - head_len]
        }
    }

    #[inline(always)]
    pub fn read(&mut self) -> u8 {
        let ret = self.byte_at(self.pos);
        self.pos += 1;
        ret
    }

    /// Reads two bytes as one code unit.
    #[inline(always)]
    pub fn read_unit(&mut self, big_endian: bool) -> u16 {
        let first = self.read();
        let second = self.read();
        if big_endian {
            u16::from_be_bytes([first, second])
        } else {
            u16::from_le_bytes([first, second])
        }
    }

    #[inline(always)]
    pub fn unread(&mut self, count: usize) {
        debug_assert!(count <= self.pos);
        self.pos -= count;
    }

    /// The part of the current chunk that has not been read yet, or an
    /// empty slice while reserved bytes from the previous call are still
    /// pending.
    #[inline(always)]
    pub fn unread_tail(&self) -> &'a [u8] {
        let head_len = self.head.len();
        if self.pos < head_len {
            &[]
        } else {
            &self.tail[self.pos - head_len..]
        }
    }

    #[inline(always)]
    pub fn skip(&mut self, count: usize) {
        debug_assert!(count <= self.remaining());
        self.pos += count;
    }

    /// Copies the bytes from `start` to the end into an inline buffer and
    /// marks everything consumed.
    pub fn reserve_from(&mut self, start: usize) -> InlineBytes {
        debug_assert!(self.len() - start < InlineBytes::CAPACITY);
        let mut reserved = InlineBytes::new();
        for index in start..self.len() {
            reserved.push(self.byte_at(index));
        }
        self.pos = self.len();
        reserved
    }

    /// The bytes in `start..end` (at most four).
    pub fn bytes_between(&self, start: usize, end: usize) -> InlineBytes {
        let mut ret = InlineBytes::new();
        for index in start..end {
            ret.push(self.byte_at(index));
        }
        ret
    }
}
