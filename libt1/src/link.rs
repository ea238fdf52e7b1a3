// libt1/src/link.rs

//! Single-block transmit and receive over a [`Transport`].
//!
//! Neither primitive validates the LRC. Received frames are handed to the
//! rule engine as-is.

use std::time::Duration;

use crate::config::ProtocolOptions;
use crate::constants::LEN_INVALID;
use crate::protocol::{Frame, pcb_name};
use crate::transport::{PollStatus, Transport};
use crate::types::Direction;
use crate::{Error, Result};

/// Address, seal and transmit one frame in a single bus transaction.
pub fn send_frame<T: Transport + ?Sized>(
    transport: &mut T,
    options: &ProtocolOptions,
    frame: &mut Frame,
) -> Result<usize> {
    frame.set_nad(options.node_address);
    frame.seal();
    options.preprocess(frame, Direction::Transmit);

    log::trace!(
        "Interface --> Card: {:<20} LEN {:>3}",
        pcb_name(frame.pcb_byte()),
        frame.len()
    );
    #[cfg(feature = "diagnostics")]
    log::trace!("tx:\n{}", crate::utils::hexdump(frame.as_bytes(), 16));

    transport.transmit(frame.as_bytes(), true)
}

/// Wait up to `timeout` for a frame addressed to this side and read it
/// into `frame`. Returns the number of INF bytes read.
pub fn receive_frame<T: Transport + ?Sized>(
    transport: &mut T,
    options: &ProtocolOptions,
    timeout: Duration,
    frame: &mut Frame,
) -> Result<usize> {
    match transport.poll(options.host_address, timeout, false)? {
        PollStatus::Matched => {}
        PollStatus::TimedOut => return Err(Error::Timeout),
    }
    // The poll consumed the NAD.
    frame.set_nad(options.host_address);

    let header = frame.header_tail_mut();
    let expected = header.len();
    let read = read_or_release(transport, header, false)?;
    if read != expected {
        transport.receive(&mut [], true)?;
        return Err(Error::InvalidLength {
            expected,
            actual: read,
        });
    }

    if frame.len() == LEN_INVALID {
        log::debug!("received invalid LEN of 255");
        transport.receive(&mut [], true)?;
        return Err(Error::FrameFormat("LEN 255 is reserved".into()));
    }

    let len = frame.len() as usize;
    let body = frame.body_mut(len);
    let expected = body.len();
    let read = read_or_release(transport, body, true)?;
    if read != expected {
        return Err(Error::InvalidLength {
            expected,
            actual: read,
        });
    }

    log::trace!(
        "Interface <-- Card: {:<20} LEN {:>3}",
        pcb_name(frame.pcb_byte()),
        frame.len()
    );
    #[cfg(feature = "diagnostics")]
    log::trace!("rx:\n{}", crate::utils::hexdump(frame.as_bytes(), 16));

    options.preprocess(frame, Direction::Receive);
    Ok(len)
}

/// Raw read that releases the bus transaction when it fails.
fn read_or_release<T: Transport + ?Sized>(
    transport: &mut T,
    buf: &mut [u8],
    complete: bool,
) -> Result<usize> {
    match transport.receive(buf, complete) {
        Ok(read) => Ok(read),
        Err(err) => {
            if let Err(release) = transport.receive(&mut [], true) {
                log::debug!("could not release receive transaction: {}", release);
            }
            Err(err)
        }
    }
}
