// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ascii::copy_ascii_to_cps;
use crate::error::DecodeError;
use crate::handles::{ByteSource, InlineBytes};
use crate::{is_surrogate, Mode};

/// Configuration for `Utf8Decoder`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Utf8Options {
    /// Whether a U+FEFF at the very start of the stream is swallowed
    /// instead of being emitted. Defaults to `true`.
    pub discard_bom: bool,
}

impl Default for Utf8Options {
    fn default() -> Utf8Options {
        Utf8Options { discard_bom: true }
    }
}

/// The total length of the sequence started by `lead`.
#[inline(always)]
fn sequence_len(lead: u8) -> u8 {
    if lead < 0xE0 {
        2
    } else if lead < 0xF0 {
        3
    } else {
        4
    }
}

/// A streaming UTF-8 (or WTF-8) to codepoint decoder.
pub struct Utf8Decoder {
    mode: Mode,
    discard_bom: bool,
    bom_seen: bool,
    past_bom: bool,
    reserved: InlineBytes,
}

impl Utf8Decoder {
    /// A strict UTF-8 decoder. Encoded surrogates are errors.
    pub fn new(options: Utf8Options) -> Utf8Decoder {
        Utf8Decoder::with_mode(Mode::Strict, options)
    }

    /// A WTF-8 decoder. Encoded surrogates are emitted as codepoints.
    pub fn new_wtf8(options: Utf8Options) -> Utf8Decoder {
        Utf8Decoder::with_mode(Mode::Permissive, options)
    }

    fn with_mode(mode: Mode, options: Utf8Options) -> Utf8Decoder {
        Utf8Decoder {
            mode,
            discard_bom: options.discard_bom,
            bom_seen: false,
            past_bom: false,
            reserved: InlineBytes::new(),
        }
    }

    /// `Mode::Permissive` for the WTF variant, `Mode::Strict` otherwise.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the stream started with a byte order mark. (Regardless of
    /// whether it was discarded.)
    pub fn bom_seen(&self) -> bool {
        self.bom_seen
    }

    /// Make the decoder ready to process a new stream.
    pub fn reset(&mut self) {
        self.bom_seen = false;
        self.past_bom = false;
        self.reserved = InlineBytes::new();
    }

    /// The worst-case number of codepoints the next call can append given
    /// `byte_length` bytes of input.
    pub fn max_cps_buffer_length(&self, byte_length: usize) -> usize {
        byte_length + self.reserved.len()
    }

    /// Incrementally decode a chunk of the byte stream, appending the
    /// codepoints to `dst`.
    ///
    /// A sequence left incomplete at the end of `src` is held until the next
    /// call. `last` signals the end of the stream, at which point an
    /// incomplete sequence is an error.
    ///
    /// On error, `dst` still contains every codepoint decoded before the
    /// offending byte.
    pub fn decode_to_cps(
        &mut self,
        src: &[u8],
        dst: &mut Vec<u32>,
        last: bool,
    ) -> Result<(), DecodeError> {
        let mut source = ByteSource::new(self.reserved.take(), src);
        dst.reserve(source.len());
        let mut result = self.scan(&mut source, dst);
        if result.is_ok() && last {
            result = self.finish();
        }
        if let Err(ref err) = result {
            debug!("UTF-8 decode failed at byte {} of chunk: {}", source.consumed(), err);
        }
        result
    }

    fn finish(&mut self) -> Result<(), DecodeError> {
        if self.reserved.is_empty() {
            return Ok(());
        }
        let bytes = self.reserved.take();
        Err(DecodeError::AbruptUtf8Eof {
            expected_len: sequence_len(bytes[0]),
            bytes,
        })
    }

    #[inline(always)]
    fn emit(&mut self, codepoint: u32, dst: &mut Vec<u32>) {
        self.past_bom = true;
        dst.push(codepoint);
    }

    fn scan(&mut self, source: &mut ByteSource, dst: &mut Vec<u32>) -> Result<(), DecodeError> {
        while source.remaining() != 0 {
            let tail = source.unread_tail();
            if !tail.is_empty() && tail[0] < 0x80 {
                let ascii = copy_ascii_to_cps(tail, dst);
                source.skip(ascii);
                self.past_bom = true;
                continue;
            }
            let start = source.consumed();
            let lead = source.read();
            let (len, bits) = match lead {
                0x00..=0x7F => {
                    self.emit(u32::from(lead), dst);
                    continue;
                }
                0x80..=0xBF => {
                    return Err(DecodeError::OrphanedUtf8Continuation { byte: lead });
                }
                0xC0..=0xDF => (2usize, lead & 0x1F),
                0xE0..=0xEF => (3usize, lead & 0x0F),
                0xF0..=0xF4 => (4usize, lead & 0x07),
                _ => {
                    return Err(DecodeError::InvalidUtf8Byte { byte: lead });
                }
            };
            let mut codepoint = u32::from(bits);
            for seen in 1..len {
                if source.remaining() == 0 {
                    self.reserved = source.reserve_from(start);
                    trace!(
                        "holding {} of {} bytes of a UTF-8 sequence for the next chunk",
                        self.reserved.len(),
                        len
                    );
                    return Ok(());
                }
                let byte = source.read();
                if byte & 0xC0 != 0x80 {
                    return Err(DecodeError::InvalidUtf8Continuation {
                        byte,
                        remaining: (len - seen) as u8,
                        preceding: source.bytes_between(start, start + seen),
                    });
                }
                codepoint = (codepoint << 6) | u32::from(byte & 0x3F);
            }
            match len {
                2 => {
                    if codepoint < 0x80 {
                        return Err(DecodeError::OverlongUtf8 {
                            bytes: source.bytes_between(start, start + len),
                            codepoint,
                        });
                    }
                }
                3 => {
                    if codepoint < 0x800 {
                        return Err(DecodeError::OverlongUtf8 {
                            bytes: source.bytes_between(start, start + len),
                            codepoint,
                        });
                    }
                    if self.mode == Mode::Strict && is_surrogate(codepoint) {
                        return Err(DecodeError::InvalidCodepoint {
                            bytes: source.bytes_between(start, start + len),
                            codepoint,
                        });
                    }
                    if codepoint == 0xFEFF && !self.past_bom {
                        self.past_bom = true;
                        self.bom_seen = true;
                        if self.discard_bom {
                            debug!("discarding UTF-8 byte order mark");
                            continue;
                        }
                    }
                }
                _ => {
                    if codepoint < 0x10000 {
                        let bytes = source.bytes_between(start, start + len);
                        if self.mode == Mode::Strict && is_surrogate(codepoint) {
                            return Err(DecodeError::OverlongSurrogateUtf8 { bytes, codepoint });
                        }
                        return Err(DecodeError::OverlongUtf8 { bytes, codepoint });
                    }
                    if codepoint > 0x10FFFF {
                        return Err(DecodeError::InvalidCodepoint {
                            bytes: source.bytes_between(start, start + len),
                            codepoint,
                        });
                    }
                }
            }
            self.emit(codepoint, dst);
        }
        Ok(())
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
