#[path = "../common/mod.rs"]
mod common;

use anyhow::Result;
use libt1::engine::SequenceState;
use libt1::prelude::*;
use libt1::test_support::{CardBlock, scripted_interface};

#[test]
fn ten_bytes_out_five_bytes_back() -> Result<()> {
    common::init_logging();
    let reply = common::fixtures::short_response();
    let mut iface = scripted_interface(vec![CardBlock::Info(false, false, reply.clone())])?;

    let mut rx = [0u8; 32];
    let n = iface.transceive(&common::fixtures::get_data_apdu(), &mut rx)?;
    assert_eq!(&rx[..n], &reply[..]);

    let sent = iface.transport().sent_frames();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].nad(), 0x5A);
    assert_eq!(sent[0].pcb(), Pcb::info(false, false));
    assert_eq!(sent[0].inf(), &common::fixtures::get_data_apdu()[..]);
    Ok(())
}

#[test]
fn empty_response_is_success() -> Result<()> {
    let mut iface = scripted_interface(vec![CardBlock::Info(false, false, vec![])])?;
    let mut rx = [0u8; 4];
    assert_eq!(iface.transceive(&[0x01], &mut rx)?, 0);
    assert!(iface.last_error().is_none());
    Ok(())
}

#[test]
fn sequence_alternates_across_exchanges() -> Result<()> {
    common::init_logging();
    let mut iface = scripted_interface(vec![
        CardBlock::Info(false, false, common::fixtures::status_ok()),
        CardBlock::Info(true, false, common::fixtures::status_ok()),
        CardBlock::Info(false, false, common::fixtures::status_ok()),
    ])?;

    let mut rx = [0u8; 4];
    for _ in 0..3 {
        iface.transceive(&common::fixtures::select_apdu(), &mut rx)?;
    }
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![
            Pcb::info(false, false),
            Pcb::info(true, false),
            Pcb::info(false, false)
        ]
    );
    assert_eq!(
        iface.sequence(),
        SequenceState {
            host: false,
            card: false
        }
    );
    Ok(())
}

#[test]
fn replayed_card_block_is_rejected_then_recovered() -> Result<()> {
    common::init_logging();
    let mut iface = scripted_interface(vec![
        CardBlock::Info(false, false, vec![0x01]),
        // Replay of the previous block for the second exchange
        CardBlock::Info(false, false, vec![0x01]),
        CardBlock::Info(true, false, vec![0x02]),
    ])?;

    let mut rx = [0u8; 4];
    iface.transceive(&[0xA0], &mut rx)?;
    let n = iface.transceive(&[0xA1], &mut rx)?;
    assert_eq!(&rx[..n], &[0x02]);
    assert_eq!(
        iface.transport().sent_pcbs()[1..].to_vec(),
        vec![
            Pcb::info(true, false),
            Pcb::Ready {
                seq: true,
                other: true,
                parity: false
            }
        ]
    );
    Ok(())
}

#[test]
fn oversized_response_is_truncated() -> Result<()> {
    let reply = common::fixtures::payload(40);
    let mut iface = scripted_interface(vec![CardBlock::Info(false, false, reply.clone())])?;
    let mut rx = [0u8; 16];
    let n = iface.transceive(&[0x00], &mut rx)?;
    assert_eq!(n, 16);
    assert_eq!(&rx[..], &reply[..16]);
    Ok(())
}

#[test]
fn builder_and_prelude_work_together() -> Result<()> {
    let mut mock = MockTransport::new();
    libt1::test_support::script_card(
        &mut mock,
        vec![CardBlock::Info(false, false, common::fixtures::status_ok())],
    )?;
    let mut iface = InterfaceBuilder::new()
        .with_transport(mock)
        .with_bwt(ms(20))
        .open()?;
    let mut rx = [0u8; 2];
    iface.transceive(&[0x00], &mut rx)?;
    assert_eq!(iface.transport().poll_timeouts, vec![ms(20)]);
    Ok(())
}
