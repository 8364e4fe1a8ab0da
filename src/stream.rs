// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Adapters between the decoders and `std::io`.
//!
//! `ReadDecoder` pulls bytes from a reader through a caller-provided buffer
//! and yields codepoints. `WriteDecoder` accepts bytes as a writer and
//! pushes codepoints to a `CodepointSink`. Flow control is left to the
//! reader and the sink.

use std::io::{self, Read, Write};

use log::trace;
use thiserror::Error;

use crate::error::DecodeError;
use crate::variant::Decoder;

/// Receives decoded codepoints in order.
pub trait CodepointSink {
    fn push_cps(&mut self, cps: &[u32]) -> io::Result<()>;
}

impl CodepointSink for Vec<u32> {
    fn push_cps(&mut self, cps: &[u32]) -> io::Result<()> {
        self.extend_from_slice(cps);
        Ok(())
    }
}

impl<'a, S: CodepointSink + ?Sized> CodepointSink for &'a mut S {
    fn push_cps(&mut self, cps: &[u32]) -> io::Result<()> {
        (**self).push_cps(cps)
    }
}

/// An error from `ReadDecoder`.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("reading the byte stream failed")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Copy, Clone)]
enum ReadState {
    Reading,
    Failed(DecodeError),
    Done,
}

/// Iterates over the codepoints decoded from a byte reader.
///
/// Each `read()` from the underlying stream fills at most the buffer, so
/// the buffer size determines the chunking. Every codepoint decoded before
/// an error is yielded before the error itself; nothing is yielded after
/// it.
pub struct ReadDecoder<R: Read, B: AsMut<[u8]>> {
    decoder: Decoder,
    stream: R,
    buffer: B,
    pending: Vec<u32>,
    pending_pos: usize,
    state: ReadState,
}

impl<R: Read, B: AsMut<[u8]>> ReadDecoder<R, B> {
    /// # Panics
    ///
    /// If `buffer` is empty.
    pub fn new<D: Into<Decoder>>(decoder: D, stream: R, mut buffer: B) -> ReadDecoder<R, B> {
        assert!(!buffer.as_mut().is_empty(), "ReadDecoder needs a non-empty buffer");
        ReadDecoder {
            decoder: decoder.into(),
            stream,
            buffer,
            pending: Vec::new(),
            pending_pos: 0,
            state: ReadState::Reading,
        }
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: Read, B: AsMut<[u8]>> Iterator for ReadDecoder<R, B> {
    type Item = Result<u32, StreamError>;

    fn next(&mut self) -> Option<Result<u32, StreamError>> {
        loop {
            if self.pending_pos < self.pending.len() {
                let cp = self.pending[self.pending_pos];
                self.pending_pos += 1;
                return Some(Ok(cp));
            }
            match self.state {
                ReadState::Reading => {}
                ReadState::Failed(err) => {
                    self.state = ReadState::Done;
                    return Some(Err(err.into()));
                }
                ReadState::Done => return None,
            }
            self.pending.clear();
            self.pending_pos = 0;
            let buffer = self.buffer.as_mut();
            let read = match self.stream.read(buffer) {
                Ok(read) => read,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.state = ReadState::Done;
                    return Some(Err(e.into()));
                }
            };
            let last = read == 0;
            trace!("decoding a chunk of {} bytes (last: {})", read, last);
            match self.decoder.decode_to_cps(&buffer[..read], &mut self.pending, last) {
                Ok(()) if last => self.state = ReadState::Done,
                Ok(()) => {}
                Err(err) => self.state = ReadState::Failed(err),
            }
        }
    }
}

/// A byte writer that decodes what is written to it into a sink.
///
/// A malformation makes `write()` fail with `io::ErrorKind::InvalidData`
/// wrapping the `DecodeError`, after the codepoints preceding it have been
/// pushed to the sink. The error is terminal: every later `write()` and
/// `close()` fails with the same error without touching the sink. The end
/// of the stream is signalled with `close()`.
pub struct WriteDecoder<S: CodepointSink> {
    decoder: Decoder,
    sink: S,
    buffer: Vec<u32>,
    failed: Option<DecodeError>,
}

impl<S: CodepointSink> WriteDecoder<S> {
    pub fn new<D: Into<Decoder>>(decoder: D, sink: S) -> WriteDecoder<S> {
        WriteDecoder {
            decoder: decoder.into(),
            sink,
            buffer: Vec::new(),
            failed: None,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Ends the stream and returns the sink.
    ///
    /// Fails if the stream ended in the middle of a sequence.
    pub fn close(mut self) -> io::Result<S> {
        self.decode(&[], true)?;
        Ok(self.sink)
    }

    fn decode(&mut self, src: &[u8], last: bool) -> io::Result<()> {
        if let Some(err) = self.failed {
            return Err(invalid_data(err));
        }
        self.buffer.clear();
        let result = self.decoder.decode_to_cps(src, &mut self.buffer, last);
        if let Err(err) = result {
            self.failed = Some(err);
        }
        self.sink.push_cps(&self.buffer)?;
        result.map_err(invalid_data)
    }
}

fn invalid_data(err: DecodeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

impl<S: CodepointSink> Write for WriteDecoder<S> {
    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        self.decode(src, false)?;
        Ok(src.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
