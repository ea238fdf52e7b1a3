//! Exchange a few APDUs with the in-memory echo endpoint.
//!
//! Usage:
//!   RUST_LOG=trace cargo run -p libt1 --example echo_probe

use libt1::prelude::*;
use libt1::{Result, utils};

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let mut iface = InterfaceBuilder::new()
        .with_transport(EchoTransport::new())
        .open()?;
    println!("Opened {} with {:?}", iface.name(), iface.options());

    let select: [u8; 13] = [
        0x00, 0xA4, 0x04, 0x00, 0x08, 0xA0, 0x00, 0x00, 0x01, 0x51, 0x00, 0x00, 0x00,
    ];
    let mut rx = [0u8; 256];
    let n = iface.transceive(&select, &mut rx)?;
    println!("SELECT -> {}", utils::bytes_to_hex_spaced(&rx[..n]));

    let long: Vec<u8> = (0..200u8).collect();
    let n = iface.transceive(&long, &mut rx)?;
    println!("{} bytes echoed, sequence {:?}", n, iface.sequence());

    if let Some(report) = iface.last_error() {
        println!("last error: {} ({})", report.message, report.code);
    }
    iface.close()?;
    Ok(())
}
