// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! codepoint_rs decodes UTF-8 and UTF-16 byte streams into sequences of
//! Unicode codepoints (`u32`).
//!
//! # Decoders
//!
//! `Utf8Decoder` handles UTF-8 and, via `Utf8Decoder::new_wtf8()`, WTF-8,
//! which additionally accepts encoded surrogates. `Utf16Decoder` handles
//! UTF-16 with an explicit byte order or with the byte order taken from a
//! byte order mark, and via `Utf16Decoder::new_wtf16()`, WTF-16, which
//! emits unpaired surrogates instead of failing. `Decoder` wraps either one
//! and can be created from a label such as `"utf-16le"` or `"wtf-8"`.
//!
//! # Streaming
//!
//! The `decode_to_cps` methods take a chunk of input of any size (including
//! zero), a `Vec<u32>` that the decoded codepoints are appended to, and a
//! boolean `last` that signals the end of the stream.
//!
//! Input may be split at arbitrary points, including inside a multi-byte
//! sequence or surrogate pair. The decoder holds the incomplete tail (at
//! most three bytes) until the next call. Splitting the input differently
//! never changes the output or the error.
//!
//! During the processing of a single stream, the caller calls
//! `decode_to_cps` zero or more times with `last` set to `false` and then
//! once with `last` set to `true`. Before processing another stream, the
//! caller calls `reset()`.
//!
//! # Errors
//!
//! Decoding stops at the first malformation and returns a `DecodeError`
//! that identifies the kind of malformation and the offending bytes or code
//! units. Every codepoint decoded before the malformation has already been
//! appended to the output vector when the error is returned. A decoder that
//! has returned an error must be reset before further use.
//!
//! ```
//! use codepoint_rs::*;
//!
//! let mut decoder = Utf16Decoder::new(Utf16Options { endianness: Endianness::Le });
//! let mut cps = Vec::new();
//! decoder.decode_to_cps(b"\x3D\xD8", &mut cps, false).unwrap();
//! decoder.decode_to_cps(b"\xA9\xDC", &mut cps, true).unwrap();
//! assert_eq!(cps, [0x1F4A9]);
//!
//! let mut decoder = Utf8Decoder::new(Utf8Options::default());
//! let mut cps = Vec::new();
//! let err = decoder.decode_to_cps(b"ab\xC0\x80", &mut cps, true).unwrap_err();
//! assert_eq!(cps, [0x61, 0x62]);
//! assert!(matches!(err, DecodeError::OverlongUtf8 { codepoint: 0, .. }));
//! ```
//!
//! # I/O
//!
//! `ReadDecoder` pulls bytes from a `std::io::Read` and iterates over the
//! decoded codepoints. `WriteDecoder` is a `std::io::Write` that pushes the
//! decoded codepoints into a `CodepointSink`.

mod ascii;
mod error;
mod handles;
mod stream;
mod utf_16;
mod utf_8;
mod variant;

#[cfg(test)]
mod testing;

pub use crate::error::{DecodeError, InvalidEndianness};
pub use crate::handles::InlineBytes;
pub use crate::stream::{CodepointSink, ReadDecoder, StreamError, WriteDecoder};
pub use crate::utf_16::{Endianness, Utf16Decoder, Utf16Options};
pub use crate::utf_8::{Utf8Decoder, Utf8Options};
pub use crate::variant::Decoder;

/// Whether malformations involving surrogates are errors (UTF-8, UTF-16)
/// or are passed through as codepoints (WTF-8, WTF-16).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Strict,
    Permissive,
}

#[inline(always)]
fn is_surrogate(codepoint: u32) -> bool {
    codepoint.wrapping_sub(0xD800) < 0x800
}
