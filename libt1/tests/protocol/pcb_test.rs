use libt1::protocol::{Pcb, Received, SuperKind, pcb_name};
use proptest::prelude::*;

#[test]
fn canonical_bytes_roundtrip() {
    let canonical: Vec<u8> = vec![
        0x00, 0x20, 0x40, 0x60, 0x80, 0x81, 0x82, 0x83, 0x90, 0x91, 0x92, 0x93, 0xC0, 0xC1, 0xC2,
        0xC3, 0xE0, 0xE1, 0xE2, 0xE3,
    ];
    for byte in canonical {
        assert_eq!(Pcb::from_byte(byte).to_byte(), byte, "byte {:#04x}", byte);
        assert_ne!(pcb_name(byte), "???");
    }
}

#[test]
fn kinds_are_decided_by_top_bits() {
    assert!(Pcb::from_byte(0x3F).is_info());
    assert!(matches!(Pcb::from_byte(0xBF), Pcb::Ready { .. }));
    assert_eq!(
        Pcb::from_byte(0xFE),
        Pcb::Super {
            kind: SuperKind::Abort,
            response: true
        }
    );
    assert_eq!(Received::from_byte(0xFF), Received::Invalid);
}

#[test]
fn display_names() {
    assert_eq!(Pcb::ack(true).to_string(), "R(1, 0, 0)");
    assert_eq!(Pcb::response(SuperKind::Ifs).to_string(), "S(IFS, RESPONSE)");
    assert_eq!(Received::Invalid.to_string(), "INTERNAL-ERROR");
}

proptest! {
    #[test]
    fn decoding_is_total(byte in any::<u8>()) {
        let pcb = Pcb::from_byte(byte);
        let name = pcb_name(byte);
        prop_assert!(!name.is_empty());
        if pcb.to_byte() == byte && byte != 0xFF {
            prop_assert_eq!(name, pcb.to_string());
        }
    }
}
