use codepoint_rs::*;

fn all_scalars() -> Vec<u32> {
    (0..0x110000u32).filter(|cp| char::from_u32(*cp).is_some()).collect()
}

fn all_scalars_string() -> String {
    (0..0x110000u32).filter_map(char::from_u32).collect()
}

fn read_all<D: Into<Decoder>>(decoder: D, bytes: &[u8]) -> Vec<u32> {
    // An odd buffer size splits sequences and code units at every offset.
    let cps: Result<Vec<u32>, StreamError> = ReadDecoder::new(decoder, bytes, [0u8; 7]).collect();
    cps.unwrap()
}

#[test]
#[cfg_attr(miri, ignore)] // Miri is too slow
fn test_utf8_decode_all() {
    let expectation = all_scalars();
    let input = all_scalars_string();
    let cps = read_all(Utf8Decoder::new(Utf8Options { discard_bom: false }), input.as_bytes());
    assert_eq!(cps.len(), 0x110000 - 0x800);
    assert_eq!(cps, expectation);
    let cps = read_all(Utf8Decoder::new_wtf8(Utf8Options { discard_bom: false }), input.as_bytes());
    assert_eq!(cps, expectation);
}

#[test]
#[cfg_attr(miri, ignore)] // Miri is too slow
fn test_utf16_decode_all() {
    let expectation = all_scalars();
    let input = all_scalars_string();
    let mut le = vec![0xFFu8, 0xFE];
    let mut be = vec![0xFEu8, 0xFF];
    for unit in input.encode_utf16() {
        le.extend_from_slice(&unit.to_le_bytes());
        be.extend_from_slice(&unit.to_be_bytes());
    }
    let bom = Utf16Options { endianness: Endianness::Bom };
    assert_eq!(read_all(Utf16Decoder::new(bom), &le), expectation);
    assert_eq!(read_all(Utf16Decoder::new(bom), &be), expectation);
    assert_eq!(read_all(Utf16Decoder::new_wtf16(bom), &le), expectation);
    let explicit = Utf16Options { endianness: Endianness::Le };
    let cps = read_all(Utf16Decoder::new(explicit), &le);
    assert_eq!(cps[0], 0xFEFF);
    assert_eq!(&cps[1..], &expectation[..]);
}

#[test]
fn test_wtf8_decode_all_surrogates() {
    let mut input = Vec::new();
    for cp in 0xD800u32..0xE000 {
        input.push(0xE0 | (cp >> 12) as u8);
        input.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        input.push(0x80 | (cp & 0x3F) as u8);
    }
    let cps = read_all(Utf8Decoder::new_wtf8(Utf8Options::default()), &input);
    assert_eq!(cps, (0xD800u32..0xE000).collect::<Vec<u32>>());

    let mut decoder = Decoder::from(Utf8Decoder::new(Utf8Options::default()));
    let (cps, result) = decoder.decode(&input);
    assert!(cps.is_empty());
    assert_eq!(result,
               Err(DecodeError::InvalidCodepoint {
                   bytes: InlineBytes::from_slice(b"\xED\xA0\x80"),
                   codepoint: 0xD800,
               }));
}

#[test]
fn test_wtf16_decode_all_lone_surrogates() {
    let mut input = Vec::new();
    for unit in 0xD800u16..0xE000 {
        input.extend_from_slice(&unit.to_be_bytes());
        input.extend_from_slice(b"\x00\x21");
    }
    let cps = read_all(Utf16Decoder::new_wtf16(Utf16Options { endianness: Endianness::Be }), &input);
    let expectation: Vec<u32> = (0xD800u32..0xE000).flat_map(|cp| [cp, 0x21]).collect();
    assert_eq!(cps, expectation);
}
