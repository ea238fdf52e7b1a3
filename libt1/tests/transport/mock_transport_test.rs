#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use anyhow::Result;
use libt1::prelude::*;
use libt1::transport::mock::{MockFault, Reply};

#[test]
fn mock_records_every_sent_frame() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_frame(Pcb::info(false, false), &common::fixtures::status_ok())?;
    let mut iface = Interface::new(mock).open()?;
    let apdu = common::fixtures::get_data_apdu();
    let mut rx = [0u8; 4];
    iface.transceive(&apdu, &mut rx)?;

    let sent = iface.transport().sent_frames();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].nad(), iface.options().node_address);
    assert_eq!(sent[0].inf(), &apdu[..]);
    Ok(())
}

#[test]
fn mock_fault_surfaces_as_hardware_error() {
    let err: Error = MockFault::ResetLine.into();
    assert_eq!(err.code(), 4);
    assert!(err.to_string().contains("reset line"));
}

#[test]
fn mock_reply_for_other_address_times_out() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_reply(Reply::Frame(Frame::encode(0x01, Pcb::ack(false), &[])?));
    let status = mock.poll(0xA5, Duration::from_millis(1), false)?;
    assert_eq!(status, PollStatus::TimedOut);
    Ok(())
}

#[test]
fn boxed_transport_drives_the_engine() -> Result<()> {
    let mut mock = MockTransport::new();
    mock.push_frame(Pcb::info(false, false), &[0x6A, 0x82])?;
    let mut transport: Box<dyn Transport> = Box::new(mock);
    let options = transport.protocol_options();
    transport.open()?;

    let mut sequence = SequenceState::default();
    let mut rx = [0u8; 4];
    let n = libt1::engine::run(
        transport.as_mut(),
        &options,
        &mut sequence,
        libt1::engine::Opening::Transceive,
        &[0x00, 0xB0, 0x00, 0x00],
        &mut rx,
    )?;
    assert_eq!(&rx[..n], &[0x6A, 0x82]);
    assert_eq!(transport.name(), "mock");
    Ok(())
}

#[test]
fn read_fault_after_poll_is_recovered() -> Result<()> {
    common::init_logging();
    let mut mock = MockTransport::new();
    mock.push_reply(Reply::ReadFault(MockFault::Bus));
    mock.push_frame(Pcb::info(false, false), &common::fixtures::status_ok())?;
    let mut iface = Interface::new(mock).open()?;

    let mut rx = [0u8; 4];
    assert_eq!(iface.transceive(&[0x00, 0xCA, 0x00, 0x00], &mut rx)?, 2);
    assert!(!iface.transport().transaction_open);
    assert_eq!(
        iface.transport().sent_pcbs(),
        vec![
            Pcb::info(false, false),
            Pcb::Ready {
                seq: false,
                other: true,
                parity: false
            }
        ]
    );
    Ok(())
}
