#[path = "../common/mod.rs"]
mod common;

use anyhow::Result;
use libt1::prelude::*;
use libt1::test_support::{CardBlock, script_card, scripted_interface};
use libt1::transport::mock::{MockFault, Reply};

fn resync() -> Pcb {
    Pcb::request(SuperKind::Resync)
}

#[test]
fn corrupted_reply_then_success() -> Result<()> {
    common::init_logging();
    let mut mock = MockTransport::new();
    let host = mock.protocol_options().host_address;
    mock.push_reply(Reply::Frame(common::fixtures::corrupted_block(
        host,
        Pcb::info(false, false),
        &common::fixtures::status_ok(),
    )));
    mock.push_frame(Pcb::info(false, false), &common::fixtures::status_ok())?;
    let mut iface = Interface::new(mock).open()?;

    let mut rx = [0u8; 4];
    let n = iface.transceive(&common::fixtures::select_apdu(), &mut rx)?;
    assert_eq!(&rx[..n], &[0x90, 0x00]);
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![
            Pcb::info(false, false),
            Pcb::Ready {
                seq: false,
                other: false,
                parity: true
            }
        ]
    );
    Ok(())
}

#[test]
fn silent_peer_escalates_to_resync_then_fails() -> Result<()> {
    common::init_logging();
    let mut iface = Interface::new(MockTransport::new()).open()?;
    let mut rx = [0u8; 4];

    let err = match iface.transceive(&[0x00, 0xB0, 0x00, 0x00], &mut rx) {
        Err(err) => err,
        Ok(n) => panic!("expected failure, got {} bytes", n),
    };
    assert!(matches!(err, Error::HardFail(_)));
    assert_eq!(err.code(), 0);

    let pcbs = iface.transport().sent_pcbs();
    let other_error = Pcb::Ready {
        seq: false,
        other: true,
        parity: false,
    };
    assert_eq!(
        pcbs,
        vec![
            Pcb::info(false, false),
            other_error,
            other_error,
            resync(),
            resync(),
            resync(),
            resync(),
        ]
    );

    let report = iface.last_error().cloned().unwrap();
    assert_eq!(report.code, 0);
    assert!(report.message.contains("RESYNC"));
    Ok(())
}

#[test]
fn resync_restarts_exchange_from_first_block() -> Result<()> {
    common::init_logging();
    let mut iface = scripted_interface(vec![
        CardBlock::Info(false, false, vec![0x01]),
        CardBlock::Silence,
        CardBlock::Silence,
        CardBlock::Silence,
        CardBlock::Response(SuperKind::Resync, None),
        CardBlock::Info(false, false, vec![0x02]),
    ])?;

    let mut rx = [0u8; 4];
    iface.transceive(&[0x10], &mut rx)?;
    let n = iface.transceive(&[0x20], &mut rx)?;
    assert_eq!(&rx[..n], &[0x02]);

    let pcbs = iface.transport().sent_pcbs();
    let other_error = Pcb::Ready {
        seq: true,
        other: true,
        parity: false,
    };
    assert_eq!(
        pcbs[1..].to_vec(),
        vec![
            Pcb::info(true, false),
            other_error,
            other_error,
            resync(),
            Pcb::info(false, false),
        ]
    );
    // The restarted block carries the same data again.
    let last = iface.transport().sent_frames().pop().unwrap();
    assert_eq!(last.inf(), &[0x20]);
    assert_eq!(iface.transport().resets, 0);
    Ok(())
}

#[test]
fn bus_fault_is_treated_as_a_lost_block() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_reply(Reply::Fault(MockFault::Bus));
    script_card(&mut mock, vec![CardBlock::Info(false, false, vec![0x61, 0x10])])?;
    let mut iface = Interface::new(mock).open()?;

    let mut rx = [0u8; 2];
    assert_eq!(iface.transceive(&[0x00], &mut rx)?, 2);
    assert_eq!(iface.transport().sent_pcbs().len(), 2);
    Ok(())
}

#[test]
fn reply_for_another_address_is_ignored() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_reply(Reply::Frame(
        Frame::encode(0x12, Pcb::info(false, false), &[0xEE])?,
    ));
    mock.push_frame(Pcb::info(false, false), &[0x01])?;
    let mut iface = Interface::new(mock).open()?;

    let mut rx = [0u8; 2];
    let n = iface.transceive(&[0x00], &mut rx)?;
    assert_eq!(&rx[..n], &[0x01]);
    Ok(())
}

#[test]
fn last_error_clears_after_success() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_silence(7);
    mock.push_frame(Pcb::info(false, false), &[0x01])?;
    let mut iface = Interface::new(mock).open()?;

    let mut rx = [0u8; 2];
    assert!(iface.transceive(&[0x00], &mut rx).is_err());
    assert!(iface.last_error().is_some());
    iface.transceive(&[0x00], &mut rx)?;
    assert!(iface.last_error().is_none());
    Ok(())
}

#[test]
fn fourth_retransmit_request_forces_resync() -> Result<()> {
    common::init_logging();
    let mut blocks = vec![CardBlock::Ack(false); 4];
    blocks.push(CardBlock::Response(SuperKind::Resync, None));
    blocks.push(CardBlock::Info(false, false, common::fixtures::status_ok()));
    let mut iface = scripted_interface(blocks)?;

    let mut rx = [0u8; 4];
    let n = iface.transceive(&[0x00, 0xB0, 0x00, 0x00], &mut rx)?;
    assert_eq!(&rx[..n], &[0x90, 0x00]);

    let first = Pcb::info(false, false);
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![first, first, first, first, resync(), first]
    );
    assert!(iface.last_error().is_none());
    Ok(())
}

#[test]
fn retransmit_bound_applies_to_chained_blocks() -> Result<()> {
    common::init_logging();
    let data = common::fixtures::payload(600);
    let mut blocks = vec![CardBlock::Ack(false); 4];
    blocks.push(CardBlock::Response(SuperKind::Resync, None));
    blocks.push(CardBlock::Ack(true));
    blocks.push(CardBlock::Ack(false));
    blocks.push(CardBlock::Info(false, false, common::fixtures::status_ok()));
    let mut iface = scripted_interface(blocks)?;

    let mut rx = [0u8; 4];
    assert_eq!(iface.transceive(&data, &mut rx)?, 2);

    let head = Pcb::info(false, true);
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![
            head,
            head,
            head,
            head,
            resync(),
            head,
            Pcb::info(true, true),
            Pcb::info(false, false),
        ]
    );
    // The chain restarts from the first byte after the RESYNC.
    let sent = iface.transport().sent_frames();
    let sizes: Vec<usize> = sent[5..].iter().map(|f| f.inf().len()).collect();
    assert_eq!(sizes, vec![254, 254, 92]);
    assert_eq!(sent[5].inf(), &data[..254]);
    Ok(())
}
