// Copyright 2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The errors reported by the decoders.
//!
//! Every malformation has its own variant carrying the bytes or code units
//! that caused it, so callers can branch on the kind and render their own
//! diagnostics. The `Display` implementations give a human-readable
//! explanation.

use std::fmt;
use thiserror::Error;

use crate::handles::{ByteDisplay, InlineBytes};

/// A malformation found in the input of a decoder.
///
/// Once a decoder has returned one of these, it must be reset before it is
/// used for another stream. The codepoints that were appended to the output
/// before the error remain valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The UTF-8 input ended in the middle of a multi-byte sequence.
    #[error(
        "the byte sequence {bytes} should have been followed by {}, but was instead \
         abruptly terminated by the end of input",
        Continuations::missing(.bytes, .expected_len)
    )]
    AbruptUtf8Eof {
        /// The lead byte and the continuation bytes seen so far.
        bytes: InlineBytes,
        /// The length the complete sequence would have had.
        expected_len: u8,
    },

    /// The UTF-16 input ended with an odd number of bytes.
    #[error(
        "the UTF-16 input ended with an odd number of bytes; received lone byte {}, \
         which is not a complete code unit",
        render_byte(.byte)
    )]
    AbruptUtf16CodeUnitEof { byte: u8 },

    /// The UTF-16 input ended right after a high surrogate.
    #[error(
        "the UTF-16 input ended abruptly after the high surrogate {}, which must be \
         followed by a low surrogate",
        render_unit(.high)
    )]
    AbruptUtf16SurrogateEof { high: u16 },

    /// The sequence decodes to a surrogate or to a value above U+10FFFF.
    #[error(
        "the byte sequence {bytes} decodes to {}, which is not a valid Unicode codepoint",
        render_codepoint(.codepoint)
    )]
    InvalidCodepoint { bytes: InlineBytes, codepoint: u32 },

    /// The byte cannot start a UTF-8 sequence.
    #[error("the byte {} is not a recognized code unit in UTF-8", render_byte(.byte))]
    InvalidUtf8Byte { byte: u8 },

    /// A lead byte was followed by something other than a continuation byte.
    #[error(
        "the byte sequence {preceding} should have been followed by {}, but was instead \
         followed by {}, which is not a continuation byte",
        Continuations::remaining(.remaining),
        render_byte(.byte)
    )]
    InvalidUtf8Continuation {
        /// The byte that should have been a continuation byte.
        byte: u8,
        /// How many continuation bytes were still expected, including the
        /// one that `byte` should have been.
        remaining: u8,
        /// The lead byte and any continuation bytes before `byte`.
        preceding: InlineBytes,
    },

    /// A high surrogate was followed by something other than a low surrogate.
    #[error(
        "the high surrogate code unit {} must be followed by a low surrogate code unit, \
         but encountered {} instead",
        render_unit(.high),
        render_unit(.unit)
    )]
    InvalidUtf16Continuation { high: u16, unit: u16 },

    /// A continuation byte appeared where a lead byte was expected.
    #[error(
        "encountered continuation byte {} orphaned where no continuation was expected",
        render_byte(.byte)
    )]
    OrphanedUtf8Continuation { byte: u8 },

    /// The sequence is longer than the shortest encoding of its value.
    #[error(
        "the byte sequence {bytes} is overlong; it decodes to {}, whose correct \
         representation is {}",
        render_codepoint_and_char(.codepoint),
        shortest_utf8(.codepoint)
    )]
    OverlongUtf8 { bytes: InlineBytes, codepoint: u32 },

    /// A four-byte sequence that is both overlong and decodes to a
    /// surrogate.
    #[error(
        "the byte sequence {bytes} decodes to {}, which is not a valid Unicode codepoint \
         (also, the encoding would be overlong even if it were)",
        render_codepoint(.codepoint)
    )]
    OverlongSurrogateUtf8 { bytes: InlineBytes, codepoint: u32 },

    /// BOM sniffing was requested but the input does not start with one.
    #[error(
        "decoding UTF-16 without specifying an explicit endianness requires that the \
         input begin with a BOM"
    )]
    MissingUtf16Bom,

    /// A low surrogate appeared without a preceding high surrogate.
    #[error("encountered orphaned UTF-16 low surrogate code unit {}", render_unit(.unit))]
    OrphanedUtf16LowSurrogate { unit: u16 },
}

impl DecodeError {
    /// Whether the error was caused by the input ending too early rather
    /// than by an illegal byte or code unit.
    pub fn is_truncation(&self) -> bool {
        matches!(
            *self,
            DecodeError::AbruptUtf8Eof { .. }
                | DecodeError::AbruptUtf16CodeUnitEof { .. }
                | DecodeError::AbruptUtf16SurrogateEof { .. }
        )
    }
}

/// An endianness label other than `be`, `le` or `bom`.
///
/// This signals misuse of the API rather than malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("endianness must be 'be', 'le', or 'bom'; got {label:?}")]
pub struct InvalidEndianness {
    pub label: String,
}

struct Continuations(usize);

impl Continuations {
    fn missing(bytes: &InlineBytes, expected_len: &u8) -> Continuations {
        Continuations((*expected_len as usize).saturating_sub(bytes.len()))
    }

    fn remaining(remaining: &u8) -> Continuations {
        Continuations(*remaining as usize)
    }
}

impl fmt::Display for Continuations {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            1 => f.write_str("one continuation byte"),
            2 => f.write_str("two continuation bytes"),
            _ => f.write_str("three continuation bytes"),
        }
    }
}

struct UnitDisplay(u16);

impl fmt::Display for UnitDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

struct CodepointDisplay {
    codepoint: u32,
    with_char: bool,
}

fn render_byte(byte: &u8) -> ByteDisplay {
    ByteDisplay(*byte)
}

fn render_unit(unit: &u16) -> UnitDisplay {
    UnitDisplay(*unit)
}

fn render_codepoint(codepoint: &u32) -> CodepointDisplay {
    CodepointDisplay {
        codepoint: *codepoint,
        with_char: false,
    }
}

fn render_codepoint_and_char(codepoint: &u32) -> CodepointDisplay {
    CodepointDisplay {
        codepoint: *codepoint,
        with_char: true,
    }
}

impl fmt::Display for CodepointDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\u{{{:X}}}", self.codepoint)?;
        if self.with_char {
            let c = char::from_u32(self.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
            write!(f, " ({:?})", c)?;
        }
        Ok(())
    }
}

/// Re-encodes a value in its shortest UTF-8 form for diagnostics.
///
/// Surrogates are encoded like any other value (generalized UTF-8).
fn shortest_utf8(codepoint: &u32) -> InlineBytes {
    let codepoint = *codepoint;
    let mut ret = InlineBytes::new();
    if codepoint < 0x80 {
        ret.push(codepoint as u8);
    } else if codepoint < 0x800 {
        ret.push((0xC0 | (codepoint >> 6)) as u8);
        ret.push((0x80 | (codepoint & 0x3F)) as u8);
    } else if codepoint < 0x10000 {
        ret.push((0xE0 | (codepoint >> 12)) as u8);
        ret.push((0x80 | ((codepoint >> 6) & 0x3F)) as u8);
        ret.push((0x80 | (codepoint & 0x3F)) as u8);
    } else {
        ret.push((0xF0 | ((codepoint >> 18) & 0x07)) as u8);
        ret.push((0x80 | ((codepoint >> 12) & 0x3F)) as u8);
        ret.push((0x80 | ((codepoint >> 6) & 0x3F)) as u8);
        ret.push((0x80 | (codepoint & 0x3F)) as u8);
    }
    ret
}
