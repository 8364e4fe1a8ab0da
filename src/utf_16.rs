// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, InvalidEndianness};
use crate::handles::{ByteSource, InlineBytes};
use crate::Mode;

/// The byte order of a UTF-16 stream, or a request to take it from the
/// byte order mark at the start of the stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Endianness {
    Be,
    Le,
    #[default]
    Bom,
}

impl Endianness {
    /// Implements a lookup of the labels `be`, `le` and `bom`.
    ///
    /// Matching is ASCII case-insensitive and ignores leading and trailing
    /// ASCII whitespace.
    pub fn for_label(label: &[u8]) -> Option<Endianness> {
        let label = label.trim_ascii();
        if label.eq_ignore_ascii_case(b"be") {
            Some(Endianness::Be)
        } else if label.eq_ignore_ascii_case(b"le") {
            Some(Endianness::Le)
        } else if label.eq_ignore_ascii_case(b"bom") {
            Some(Endianness::Bom)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Endianness::Be => "be",
            Endianness::Le => "le",
            Endianness::Bom => "bom",
        }
    }
}

impl FromStr for Endianness {
    type Err = InvalidEndianness;

    fn from_str(label: &str) -> Result<Endianness, InvalidEndianness> {
        Endianness::for_label(label.as_bytes()).ok_or_else(|| InvalidEndianness {
            label: label.to_owned(),
        })
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for `Utf16Decoder`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Utf16Options {
    /// Defaults to `Endianness::Bom`.
    pub endianness: Endianness,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ByteOrder {
    ExplicitLittle,
    ExplicitBig,
    BomPending,
    SniffedLittle,
    SniffedBig,
}

impl ByteOrder {
    fn new(endianness: Endianness) -> ByteOrder {
        match endianness {
            Endianness::Le => ByteOrder::ExplicitLittle,
            Endianness::Be => ByteOrder::ExplicitBig,
            Endianness::Bom => ByteOrder::BomPending,
        }
    }

    #[inline(always)]
    fn big_endian(self) -> Option<bool> {
        match self {
            ByteOrder::ExplicitLittle | ByteOrder::SniffedLittle => Some(false),
            ByteOrder::ExplicitBig | ByteOrder::SniffedBig => Some(true),
            ByteOrder::BomPending => None,
        }
    }
}

#[inline(always)]
fn unit_from_bytes(first: u8, second: u8, big_endian: bool) -> u16 {
    if big_endian {
        u16::from_be_bytes([first, second])
    } else {
        u16::from_le_bytes([first, second])
    }
}

/// A streaming UTF-16 (or WTF-16) to codepoint decoder.
pub struct Utf16Decoder {
    mode: Mode,
    endianness: Endianness,
    byte_order: ByteOrder,
    reserved: InlineBytes,
}

impl Utf16Decoder {
    /// A strict UTF-16 decoder. Unpaired surrogates are errors.
    pub fn new(options: Utf16Options) -> Utf16Decoder {
        Utf16Decoder::with_mode(Mode::Strict, options)
    }

    /// A WTF-16 decoder. Unpaired surrogates are emitted as codepoints.
    pub fn new_wtf16(options: Utf16Options) -> Utf16Decoder {
        Utf16Decoder::with_mode(Mode::Permissive, options)
    }

    fn with_mode(mode: Mode, options: Utf16Options) -> Utf16Decoder {
        Utf16Decoder {
            mode,
            endianness: options.endianness,
            byte_order: ByteOrder::new(options.endianness),
            reserved: InlineBytes::new(),
        }
    }

    /// `Mode::Permissive` for the WTF variant, `Mode::Strict` otherwise.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The byte order in effect: the explicit one, the one taken from the
    /// byte order mark, or `None` while the byte order mark is still
    /// pending.
    pub fn endianness(&self) -> Option<Endianness> {
        self.byte_order.big_endian().map(|big_endian| {
            if big_endian {
                Endianness::Be
            } else {
                Endianness::Le
            }
        })
    }

    /// Make the decoder ready to process a new stream.
    pub fn reset(&mut self) {
        self.byte_order = ByteOrder::new(self.endianness);
        self.reserved = InlineBytes::new();
    }

    /// The worst-case number of codepoints the next call can append given
    /// `byte_length` bytes of input.
    pub fn max_cps_buffer_length(&self, byte_length: usize) -> usize {
        (byte_length + self.reserved.len()) / 2
    }

    /// Incrementally decode a chunk of the byte stream, appending the
    /// codepoints to `dst`.
    ///
    /// A code unit or surrogate pair left incomplete at the end of `src` is
    /// held until the next call. `last` signals the end of the stream.
    ///
    /// On error, `dst` still contains every codepoint decoded before the
    /// offending code unit.
    pub fn decode_to_cps(
        &mut self,
        src: &[u8],
        dst: &mut Vec<u32>,
        last: bool,
    ) -> Result<(), DecodeError> {
        let mut source = ByteSource::new(self.reserved.take(), src);
        dst.reserve(source.len() / 2);
        let mut result = self.scan(&mut source, dst);
        if result.is_ok() && last {
            result = self.finish(dst);
        }
        if let Err(ref err) = result {
            debug!("UTF-16 decode failed at byte {} of chunk: {}", source.consumed(), err);
        }
        result
    }

    fn finish(&mut self, dst: &mut Vec<u32>) -> Result<(), DecodeError> {
        let reserved = self.reserved.take();
        if reserved.is_empty() {
            return Ok(());
        }
        let big_endian = match self.byte_order.big_endian() {
            Some(big_endian) => big_endian,
            None => return Err(DecodeError::MissingUtf16Bom),
        };
        if reserved.len() % 2 == 1 {
            return Err(DecodeError::AbruptUtf16CodeUnitEof {
                byte: reserved[reserved.len() - 1],
            });
        }
        let high = unit_from_bytes(reserved[0], reserved[1], big_endian);
        match self.mode {
            Mode::Strict => Err(DecodeError::AbruptUtf16SurrogateEof { high }),
            Mode::Permissive => {
                dst.push(u32::from(high));
                Ok(())
            }
        }
    }

    fn sniff_bom(&mut self, source: &mut ByteSource) -> Result<Option<bool>, DecodeError> {
        if source.remaining() < 2 {
            self.reserved = source.reserve_from(source.consumed());
            return Ok(None);
        }
        let big_endian = match (source.read(), source.read()) {
            (0xFF, 0xFE) => {
                self.byte_order = ByteOrder::SniffedLittle;
                false
            }
            (0xFE, 0xFF) => {
                self.byte_order = ByteOrder::SniffedBig;
                true
            }
            _ => return Err(DecodeError::MissingUtf16Bom),
        };
        debug!("UTF-16 byte order mark resolved to {}", if big_endian { "be" } else { "le" });
        Ok(Some(big_endian))
    }

    fn scan(&mut self, source: &mut ByteSource, dst: &mut Vec<u32>) -> Result<(), DecodeError> {
        let big_endian = match self.byte_order.big_endian() {
            Some(big_endian) => big_endian,
            None => match self.sniff_bom(source)? {
                Some(big_endian) => big_endian,
                None => return Ok(()),
            },
        };
        while source.remaining() != 0 {
            let start = source.consumed();
            if source.remaining() == 1 {
                self.reserved = source.reserve_from(start);
                trace!("holding half a UTF-16 code unit for the next chunk");
                return Ok(());
            }
            let unit = source.read_unit(big_endian);
            match unit & 0xFC00 {
                0xD800 => {
                    if source.remaining() < 2 {
                        self.reserved = source.reserve_from(start);
                        trace!(
                            "holding {} bytes of a UTF-16 surrogate pair for the next chunk",
                            self.reserved.len()
                        );
                        return Ok(());
                    }
                    let next = source.read_unit(big_endian);
                    if next & 0xFC00 == 0xDC00 {
                        let high = u32::from(unit ^ 0xD800);
                        let low = u32::from(next ^ 0xDC00);
                        dst.push(0x10000 + ((high << 10) | low));
                        continue;
                    }
                    if self.mode == Mode::Strict {
                        return Err(DecodeError::InvalidUtf16Continuation { high: unit, unit: next });
                    }
                    // The second unit may start a pair of its own.
                    dst.push(u32::from(unit));
                    source.unread(2);
                }
                0xDC00 => {
                    if self.mode == Mode::Strict {
                        return Err(DecodeError::OrphanedUtf16LowSurrogate { unit });
                    }
                    dst.push(u32::from(unit));
                }
                _ => {
                    dst.push(u32::from(unit));
                }
            }
        }
        Ok(())
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
