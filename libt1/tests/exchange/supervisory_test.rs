#[path = "../common/mod.rs"]
mod common;

use std::convert::TryFrom;

use anyhow::Result;
use libt1::prelude::*;
use libt1::test_support::{CardBlock, scripted_interface};

#[test]
fn wtx_extends_exactly_one_receive() -> Result<()> {
    common::init_logging();
    let mut iface = scripted_interface(vec![
        CardBlock::Request(SuperKind::Wtx, Some(5)),
        CardBlock::Info(false, false, common::fixtures::status_ok()),
        CardBlock::Info(true, false, common::fixtures::status_ok()),
    ])?;
    let bwt = iface.options().bwt;

    let mut rx = [0u8; 2];
    iface.transceive(&[0x01], &mut rx)?;
    iface.transceive(&[0x02], &mut rx)?;

    assert_eq!(iface.transport().poll_timeouts, vec![bwt, bwt * 5, bwt]);
    let wtx = &iface.transport().sent_frames()[1];
    assert_eq!(wtx.pcb(), Pcb::response(SuperKind::Wtx));
    assert_eq!(wtx.inf(), &[5]);
    Ok(())
}

#[test]
fn zero_wtx_multiplier_counts_as_one() -> Result<()> {
    let mut iface = scripted_interface(vec![
        CardBlock::Request(SuperKind::Wtx, Some(0)),
        CardBlock::Info(false, false, vec![]),
    ])?;
    let bwt = iface.options().bwt;
    let mut rx = [0u8; 1];
    iface.transceive(&[0x01], &mut rx)?;
    assert_eq!(iface.transport().poll_timeouts, vec![bwt, bwt]);
    Ok(())
}

#[test]
fn card_ifs_request_resizes_remaining_blocks() -> Result<()> {
    common::init_logging();
    let data = common::fixtures::payload(600);
    let mut iface = scripted_interface(vec![
        CardBlock::Request(SuperKind::Ifs, Some(100)),
        CardBlock::Ack(true),
        CardBlock::Ack(false),
        CardBlock::Ack(true),
        CardBlock::Ack(false),
        CardBlock::Info(false, false, vec![]),
    ])?;

    let mut rx = [0u8; 1];
    iface.transceive(&data, &mut rx)?;

    let sent = iface.transport().sent_frames();
    let shape: Vec<(Pcb, usize)> = sent.iter().map(|f| (f.pcb(), f.inf().len())).collect();
    assert_eq!(
        shape,
        vec![
            (Pcb::info(false, true), 254),
            (Pcb::response(SuperKind::Ifs), 1),
            (Pcb::info(true, true), 100),
            (Pcb::info(false, true), 100),
            (Pcb::info(true, true), 100),
            (Pcb::info(false, false), 46),
        ]
    );
    Ok(())
}

#[test]
fn host_ifs_negotiation() -> Result<()> {
    common::init_logging();
    let mut iface = scripted_interface(vec![
        // Wrong value first, so the request goes out again.
        CardBlock::Response(SuperKind::Ifs, Some(32)),
        CardBlock::Response(SuperKind::Ifs, Some(64)),
    ])?;
    iface.negotiate_ifs(Ifs::try_from(64)?)?;

    let sent = iface.transport().sent_frames();
    assert_eq!(sent.len(), 2);
    for frame in &sent {
        assert_eq!(frame.pcb(), Pcb::request(SuperKind::Ifs));
        assert_eq!(frame.inf(), &[64]);
    }
    Ok(())
}

#[test]
fn host_abort() -> Result<()> {
    let mut iface = scripted_interface(vec![CardBlock::Response(SuperKind::Abort, None)])?;
    iface.abort()?;
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![Pcb::request(SuperKind::Abort)]
    );
    Ok(())
}

#[test]
fn card_abort_during_chain_is_reported() -> Result<()> {
    common::init_logging();
    let data = common::fixtures::payload(600);
    let mut iface = scripted_interface(vec![
        CardBlock::Request(SuperKind::Abort, None),
        CardBlock::Ack(false),
    ])?;

    let mut rx = [0u8; 1];
    match iface.transceive(&data, &mut rx) {
        Err(Error::Abort) => {}
        other => panic!("expected abort, got {:?}", other),
    }
    assert_eq!(iface.last_error().map(|r| r.code), Some(1));
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![Pcb::info(false, true), Pcb::response(SuperKind::Abort)]
    );
    Ok(())
}
