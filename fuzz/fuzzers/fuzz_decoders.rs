// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![no_main]
use codepoint_rs::*;
use libfuzzer_sys::fuzz_target;

static LABELS: [&[u8]; 8] = [b"utf-8",
                             b"wtf-8",
                             b"utf-16",
                             b"utf-16le",
                             b"utf-16be",
                             b"wtf-16",
                             b"wtf-16le",
                             b"wtf-16be"];

fn new_decoder(label: &[u8]) -> Decoder {
    match Decoder::for_label(label) {
        Some(decoder) => decoder,
        None => panic!("Bogus label."),
    }
}

fn check_scalars(decoder: &Decoder, cps: &[u32]) {
    for &cp in cps {
        assert!(cp <= 0x10FFFF);
        if !decoder.is_permissive() {
            assert!(char::from_u32(cp).is_some(), "Surrogate from a strict decoder.");
        }
    }
}

fn decode_split(label: &[u8], data: &[u8], split: usize) -> (Vec<u32>, Result<(), DecodeError>) {
    let mut decoder = new_decoder(label);
    let mut cps = Vec::new();
    let (head, tail) = data.split_at(split);
    if let Err(err) = decoder.decode_to_cps(head, &mut cps, false) {
        return (cps, Err(err));
    }
    let result = decoder.decode_to_cps(tail, &mut cps, true);
    (cps, result)
}

fn decode_bytewise(label: &[u8], data: &[u8]) -> (Vec<u32>, Result<(), DecodeError>) {
    let mut decoder = new_decoder(label);
    let mut cps = Vec::new();
    for byte in data.chunks(1) {
        if let Err(err) = decoder.decode_to_cps(byte, &mut cps, false) {
            return (cps, Err(err));
        }
    }
    let result = decoder.decode_to_cps(b"", &mut cps, true);
    (cps, result)
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // The first byte picks the split point.
    let split = usize::from(data[0]) % data.len();
    let data = &data[1..];
    let split = split.min(data.len());
    for label in LABELS.iter() {
        let mut decoder = new_decoder(label);
        let whole = decoder.decode(data);
        check_scalars(&decoder, &whole.0);
        assert_eq!(whole, decode_split(label, data, split));
        assert_eq!(whole, decode_bytewise(label, data));
    }
});
