// Copyright 2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Strides are checked a word at a time. The byte loop only sees the stride
// containing the first non-ASCII byte and the tail.

const STRIDE_SIZE: usize = 8;

const ASCII_MASK: u64 = 0x8080_8080_8080_8080;

/// Returns the length of the longest all-ASCII prefix of `src`.
#[inline(always)]
pub fn ascii_prefix_len(src: &[u8]) -> usize {
    let mut offset = 0usize;
    let mut strides = src.chunks_exact(STRIDE_SIZE);
    for stride in &mut strides {
        let mut word = [0u8; STRIDE_SIZE];
        word.copy_from_slice(stride);
        if u64::from_ne_bytes(word) & ASCII_MASK != 0 {
            break;
        }
        offset += STRIDE_SIZE;
    }
    while offset < src.len() {
        if src[offset] > 0x7F {
            return offset;
        }
        offset += 1;
    }
    offset
}

/// Appends the leading ASCII run of `src` to `dst` as codepoints and
/// returns its length.
#[inline(always)]
pub fn copy_ascii_to_cps(src: &[u8], dst: &mut Vec<u32>) -> usize {
    let len = ascii_prefix_len(src);
    dst.extend(src[..len].iter().map(|&b| u32::from(b)));
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_prefix_len() {
        assert_eq!(ascii_prefix_len(b""), 0);
        assert_eq!(ascii_prefix_len(b"abc"), 3);
        assert_eq!(ascii_prefix_len(b"abcdefghijklmnopq"), 17);
        assert_eq!(ascii_prefix_len(b"abcdefghij\xC3\xA4"), 10);
        assert_eq!(ascii_prefix_len(b"abcdefg\x80"), 7);
        assert_eq!(ascii_prefix_len(b"\xFFabcdefghij"), 0);
    }

    #[test]
    fn test_copy_ascii_to_cps() {
        let mut dst = vec![0x1F4A9];
        assert_eq!(copy_ascii_to_cps(b"ab\x7F\xC3", &mut dst), 3);
        assert_eq!(dst, [0x1F4A9, 0x61, 0x62, 0x7F]);
    }
}
