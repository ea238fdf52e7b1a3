#[path = "../common/mod.rs"]
mod common;

use anyhow::Result;
use libt1::prelude::*;
use libt1::test_support::{CardBlock, chained_response, script_card, scripted_interface};
use proptest::prelude::*;

#[test]
fn six_hundred_bytes_go_out_in_three_blocks() -> Result<()> {
    common::init_logging();
    let data = common::fixtures::payload(600);
    let mut iface = scripted_interface(vec![
        CardBlock::Ack(true),
        CardBlock::Ack(false),
        CardBlock::Info(false, false, common::fixtures::status_ok()),
    ])?;

    let mut rx = [0u8; 2];
    let n = iface.transceive(&data, &mut rx)?;
    assert_eq!(&rx[..n], &[0x90, 0x00]);

    let sent = iface.transport().sent_frames();
    let shape: Vec<(Pcb, usize)> = sent.iter().map(|f| (f.pcb(), f.inf().len())).collect();
    assert_eq!(
        shape,
        vec![
            (Pcb::info(false, true), 254),
            (Pcb::info(true, true), 254),
            (Pcb::info(false, false), 92),
        ]
    );
    let reassembled: Vec<u8> = sent.iter().flat_map(|f| f.inf().to_vec()).collect();
    assert_eq!(reassembled, data);
    Ok(())
}

#[test]
fn chained_card_response_is_acknowledged() -> Result<()> {
    common::init_logging();
    let response = common::fixtures::payload(300);
    let mut iface = scripted_interface(chained_response(&response, 120, false))?;

    let mut rx = vec![0u8; 512];
    let n = iface.transceive(&common::fixtures::select_apdu(), &mut rx)?;
    assert_eq!(&rx[..n], &response[..]);
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![Pcb::info(false, false), Pcb::ack(true), Pcb::ack(false)]
    );
    Ok(())
}

#[test]
fn lost_ack_during_chaining_is_requested_again() -> Result<()> {
    common::init_logging();
    let data = common::fixtures::payload(300);
    let mut iface = scripted_interface(vec![
        CardBlock::Silence,
        CardBlock::Ack(true),
        CardBlock::Info(false, false, common::fixtures::status_ok()),
    ])?;
    let mut rx = [0u8; 2];
    iface.transceive(&data, &mut rx)?;
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![
            Pcb::info(false, true),
            Pcb::Ready {
                seq: false,
                other: true,
                parity: false
            },
            Pcb::info(true, false),
        ]
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn block_count_follows_ifs(len in 1usize..1200) {
        let data = common::fixtures::payload(len);
        let blocks = len.div_ceil(254);
        let mut mock = MockTransport::new();
        let mut script = Vec::new();
        for i in 1..blocks {
            script.push(CardBlock::Ack(i % 2 == 1));
        }
        script.push(CardBlock::Info(false, false, vec![]));
        script_card(&mut mock, script).unwrap();
        let mut iface = Interface::new(mock).open().unwrap();

        let mut rx = [0u8; 1];
        iface.transceive(&data, &mut rx).unwrap();
        let sent = iface.transport().sent_frames();
        prop_assert_eq!(sent.len(), blocks);
        let reassembled: Vec<u8> = sent.iter().flat_map(|f| f.inf().to_vec()).collect();
        prop_assert_eq!(reassembled, data);
    }

    #[test]
    fn chained_responses_reassemble(len in 1usize..700, chunk in 1usize..=254) {
        let response = common::fixtures::payload(len);
        let mut iface = scripted_interface(chained_response(&response, chunk, false)).unwrap();
        let mut rx = vec![0u8; len];
        let n = iface.transceive(&[0x00], &mut rx).unwrap();
        prop_assert_eq!(&rx[..n], &response[..]);
    }
}
