// Copyright 2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Feeds `chunks` to a fresh decoder, stopping at the first error.
fn decode_chunks(new_decoder: &dyn Fn() -> Decoder,
                 chunks: &[&[u8]])
                 -> (Vec<u32>, Result<(), DecodeError>) {
    let mut decoder = new_decoder();
    let mut dest: Vec<u32> = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let last = i + 1 == chunks.len();
        if let Err(err) = decoder.decode_to_cps(chunk, &mut dest, last) {
            return (dest, Err(err));
        }
    }
    (dest, Ok(()))
}

/// Decodes `bytes` in one piece, split in two at every position and one
/// byte at a time, and checks that every way gives the same outcome.
fn decode_all_splits(new_decoder: &dyn Fn() -> Decoder,
                     bytes: &[u8],
                     expect: &[u32],
                     outcome: Result<(), DecodeError>) {
    init_logging();
    let (dest, result) = decode_chunks(new_decoder, &[bytes]);
    assert_eq!(&dest[..], expect, "whole input");
    assert_eq!(result, outcome, "whole input");
    for i in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(i);
        let (dest, result) = decode_chunks(new_decoder, &[head, tail]);
        assert_eq!(&dest[..], expect, "split at {}", i);
        assert_eq!(result, outcome, "split at {}", i);
    }
    let mut chunks: Vec<&[u8]> = bytes.chunks(1).collect();
    chunks.push(b"");
    let (dest, result) = decode_chunks(new_decoder, &chunks);
    assert_eq!(&dest[..], expect, "byte at a time");
    assert_eq!(result, outcome, "byte at a time");
}

pub fn decode_ok(new_decoder: &dyn Fn() -> Decoder, bytes: &[u8], expect: &[u32]) {
    decode_all_splits(new_decoder, bytes, expect, Ok(()));
}

pub fn decode_err(new_decoder: &dyn Fn() -> Decoder,
                  bytes: &[u8],
                  expect: &[u32],
                  err: DecodeError) {
    decode_all_splits(new_decoder, bytes, expect, Err(err));
}

pub fn utf16le_bytes(string: &str) -> Vec<u8> {
    string.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

pub fn utf16be_bytes(string: &str) -> Vec<u8> {
    string.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
}
