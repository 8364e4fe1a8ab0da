#![cfg(feature = "serde")]

use codepoint_rs::*;

#[test]
fn test_endianness_serde() {
    assert_eq!(serde_json::to_string(&Endianness::Le).unwrap(), "\"le\"");
    assert_eq!(serde_json::from_str::<Endianness>("\"bom\"").unwrap(), Endianness::Bom);
    assert!(serde_json::from_str::<Endianness>("\"middle\"").is_err());
}

#[test]
fn test_options_serde() {
    let options: Utf16Options = serde_json::from_str(r#"{"endianness":"be"}"#).unwrap();
    assert_eq!(options, Utf16Options { endianness: Endianness::Be });
    let options: Utf16Options = serde_json::from_str("{}").unwrap();
    assert_eq!(options, Utf16Options::default());
    let options: Utf8Options = serde_json::from_str("{}").unwrap();
    assert!(options.discard_bom);
    let json = serde_json::to_string(&Utf8Options { discard_bom: false }).unwrap();
    assert_eq!(json, r#"{"discard_bom":false}"#);
}
