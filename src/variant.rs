// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides an enum that wraps the two decoders. The purpose is
//! to let callers pick a decoder at run time (for example from a label)
//! without boxing, by writing the dispatch explicitly for the finite set of
//! decoders.

use crate::error::DecodeError;
use crate::utf_16::{Endianness, Utf16Decoder, Utf16Options};
use crate::utf_8::{Utf8Decoder, Utf8Options};
use crate::Mode;

pub enum Decoder {
    Utf8(Utf8Decoder),
    Utf16(Utf16Decoder),
}

impl Decoder {
    /// Implements a lookup of a decoder by label with default options.
    ///
    /// Recognized labels are `utf-8`, `utf8`, `wtf-8`, `wtf8`, `utf-16`,
    /// `utf16`, `utf-16le`, `utf-16be`, `wtf-16`, `wtf-16le` and
    /// `wtf-16be`. `utf-16` and `wtf-16` take the byte order from the byte
    /// order mark. Matching is ASCII case-insensitive and ignores leading
    /// and trailing ASCII whitespace.
    pub fn for_label(label: &[u8]) -> Option<Decoder> {
        let label = label.trim_ascii().to_ascii_lowercase();
        let utf16 = |endianness| Utf16Options { endianness };
        let decoder: Decoder = match &label[..] {
            b"utf-8" | b"utf8" => Utf8Decoder::new(Utf8Options::default()).into(),
            b"wtf-8" | b"wtf8" => Utf8Decoder::new_wtf8(Utf8Options::default()).into(),
            b"utf-16" | b"utf16" => Utf16Decoder::new(utf16(Endianness::Bom)).into(),
            b"utf-16le" => Utf16Decoder::new(utf16(Endianness::Le)).into(),
            b"utf-16be" => Utf16Decoder::new(utf16(Endianness::Be)).into(),
            b"wtf-16" => Utf16Decoder::new_wtf16(utf16(Endianness::Bom)).into(),
            b"wtf-16le" => Utf16Decoder::new_wtf16(utf16(Endianness::Le)).into(),
            b"wtf-16be" => Utf16Decoder::new_wtf16(utf16(Endianness::Be)).into(),
            _ => return None,
        };
        Some(decoder)
    }

    /// The name of the decoded format, e.g. `"WTF-8"`.
    pub fn name(&self) -> &'static str {
        match (self, self.mode()) {
            (Decoder::Utf8(_), Mode::Strict) => "UTF-8",
            (Decoder::Utf8(_), Mode::Permissive) => "WTF-8",
            (Decoder::Utf16(_), Mode::Strict) => "UTF-16",
            (Decoder::Utf16(_), Mode::Permissive) => "WTF-16",
        }
    }

    /// Whether surrogates are errors or passed through.
    pub fn mode(&self) -> Mode {
        match *self {
            Decoder::Utf8(ref d) => d.mode(),
            Decoder::Utf16(ref d) => d.mode(),
        }
    }

    /// Whether this is a WTF-8 or WTF-16 decoder.
    pub fn is_permissive(&self) -> bool {
        self.mode() == Mode::Permissive
    }

    /// Make the decoder ready to process a new stream.
    pub fn reset(&mut self) {
        match *self {
            Decoder::Utf8(ref mut d) => d.reset(),
            Decoder::Utf16(ref mut d) => d.reset(),
        }
    }

    /// The worst-case number of codepoints the next call can append given
    /// `byte_length` bytes of input.
    pub fn max_cps_buffer_length(&self, byte_length: usize) -> usize {
        match *self {
            Decoder::Utf8(ref d) => d.max_cps_buffer_length(byte_length),
            Decoder::Utf16(ref d) => d.max_cps_buffer_length(byte_length),
        }
    }

    /// See `Utf8Decoder::decode_to_cps()` and
    /// `Utf16Decoder::decode_to_cps()`.
    pub fn decode_to_cps(
        &mut self,
        src: &[u8],
        dst: &mut Vec<u32>,
        last: bool,
    ) -> Result<(), DecodeError> {
        match *self {
            Decoder::Utf8(ref mut d) => d.decode_to_cps(src, dst, last),
            Decoder::Utf16(ref mut d) => d.decode_to_cps(src, dst, last),
        }
    }

    /// Decodes `bytes` as a complete stream.
    ///
    /// Returns the codepoints decoded before any error along with the
    /// outcome. The decoder is reset afterwards.
    pub fn decode(&mut self, bytes: &[u8]) -> (Vec<u32>, Result<(), DecodeError>) {
        let mut cps = Vec::with_capacity(self.max_cps_buffer_length(bytes.len()));
        let result = self.decode_to_cps(bytes, &mut cps, true);
        self.reset();
        (cps, result)
    }
}

impl From<Utf8Decoder> for Decoder {
    fn from(decoder: Utf8Decoder) -> Decoder {
        Decoder::Utf8(decoder)
    }
}

impl From<Utf16Decoder> for Decoder {
    fn from(decoder: Utf16Decoder) -> Decoder {
        Decoder::Utf16(decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_for_label() {
        assert_eq!(Decoder::for_label(b"utf-8").map(|d| d.name()), Some("UTF-8"));
        assert_eq!(Decoder::for_label(b" UTF8 ").map(|d| d.name()), Some("UTF-8"));
        assert_eq!(Decoder::for_label(b"wtf-8").map(|d| d.name()), Some("WTF-8"));
        assert_eq!(Decoder::for_label(b"utf-16").map(|d| d.name()), Some("UTF-16"));
        assert_eq!(Decoder::for_label(b"Wtf-16BE").map(|d| d.name()), Some("WTF-16"));
        assert!(Decoder::for_label(b"wtf8").unwrap().is_permissive());
        assert!(!Decoder::for_label(b"utf-16le").unwrap().is_permissive());
        assert!(Decoder::for_label(b"latin1").is_none());
        assert!(Decoder::for_label(b"").is_none());
    }

    #[test]
    fn test_labelled_decoders() {
        let decode = |label: &[u8], bytes: &[u8]| match Decoder::for_label(label) {
            Some(mut decoder) => decoder.decode(bytes),
            None => panic!("unknown label"),
        };
        assert_eq!(decode(b"utf-16le", b"\x21\x00").0, [0x21]);
        assert_eq!(decode(b"utf-16be", b"\x00\x21").0, [0x21]);
        assert_eq!(decode(b"utf-16", b"\xFE\xFF\x00\x21").0, [0x21]);
        assert_eq!(decode(b"wtf-16le", b"\x3D\xD8\x21\x00").0, [0xD83D, 0x21]);
        assert_eq!(decode(b"wtf-8", b"\xED\xA0\x80").0, [0xD800]);
        assert_eq!(decode(b"utf-8", b"\xED\xA0\x80"),
                   (vec![],
                    Err(DecodeError::InvalidCodepoint {
                        bytes: InlineBytes::from_slice(b"\xED\xA0\x80"),
                        codepoint: 0xD800,
                    })));
    }

    #[test]
    fn test_decode_resets() {
        let mut decoder: Decoder = Utf8Decoder::new(Utf8Options::default()).into();
        let (cps, result) = decoder.decode(b"a\xC3");
        assert_eq!(cps, [0x61]);
        assert!(result.unwrap_err().is_truncation());
        let (cps, result) = decoder.decode(b"\xEF\xBB\xBFb");
        assert_eq!(cps, [0x62]);
        assert!(result.is_ok());
    }
}
