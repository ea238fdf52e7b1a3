// libt1/src/engine/exchange.rs

use crate::config::ProtocolOptions;
use crate::constants::MAX_RETRANSMITS;
use crate::engine::rules::{self, Outcome};
use crate::engine::state::{ExchangeState, SequenceState};
use crate::link;
use crate::protocol::{Frame, Pcb, SuperKind};
use crate::transport::Transport;
use crate::types::{Ifs, WaitMultiplier};
use crate::utils::extended_wait;
use crate::{Error, Result};

/// First block of an exchange. Kept so a session reset can rebuild it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// Application data in I-blocks
    Transceive,
    /// S(IFS, REQUEST) announcing the largest INF this side accepts
    NegotiateIfs(Ifs),
    /// S(ABORT, REQUEST)
    Abort,
}

impl Opening {
    fn load(self, frame: &mut Frame, state: &mut ExchangeState<'_>, sequence: &SequenceState) {
        *frame = Frame::default();
        match self {
            Opening::Transceive => {
                state.fill_info_block(frame, sequence.next_host());
            }
            Opening::NegotiateIfs(ifs) => {
                frame.set_pcb(Pcb::request(SuperKind::Ifs));
                frame.load_inf(&[ifs.as_u8()]);
            }
            Opening::Abort => frame.set_pcb(Pcb::request(SuperKind::Abort)),
        }
    }
}

fn split(frames: &mut [Frame; 2], active: usize) -> (&Frame, &mut Frame) {
    let [first, second] = frames;
    if active == 0 {
        (&*first, second)
    } else {
        (&*second, first)
    }
}

/// Drive one exchange to completion.
///
/// Two frame buffers alternate as reference block and prepared block. A
/// single-shot block is sent once from the inactive buffer while the
/// active one stays the reference. Returns the number of bytes written to
/// `rx`.
pub fn run<T: Transport + ?Sized>(
    transport: &mut T,
    options: &ProtocolOptions,
    sequence: &mut SequenceState,
    opening: Opening,
    tx: &[u8],
    rx: &mut [u8],
) -> Result<usize> {
    let mut state = ExchangeState::new(tx, rx);
    drive(transport, options, sequence, opening, &mut state)
}

pub(crate) fn drive<T: Transport + ?Sized>(
    transport: &mut T,
    options: &ProtocolOptions,
    sequence: &mut SequenceState,
    opening: Opening,
    state: &mut ExchangeState<'_>,
) -> Result<usize> {
    let mut frames = [Frame::default(), Frame::default()];
    let mut received = Frame::default();
    let mut active = 0;
    let mut single_shot = false;
    let mut was_reset = false;

    opening.load(&mut frames[active], state, sequence);

    loop {
        let outgoing = if single_shot { 1 - active } else { active };
        single_shot = false;
        // Lost transmissions surface as missing replies.
        if let Err(err) = link::send_frame(transport, options, &mut frames[outgoing]) {
            log::debug!("transmit failed: {}", err);
        }

        received.invalidate();
        let timeout = extended_wait(options.bwt, state.wait_mult);
        state.wait_mult = WaitMultiplier::ONE;
        if let Err(err) = link::receive_frame(transport, options, timeout, &mut received) {
            log::debug!("no block received: {}", err);
            received.invalidate();
        }

        frames[1 - active].clear_header();
        let (sent, next) = split(&mut frames, active);
        let outcome = rules::evaluate(state, sequence, sent, &received, next);
        log::debug!("[ {} ]", outcome);

        match outcome {
            Outcome::Complete => return Ok(state.received()),
            Outcome::SingleShot => single_shot = true,
            Outcome::Continue => {
                active = 1 - active;
                state.reset_counters();
            }
            Outcome::Retransmit if state.retransmits < MAX_RETRANSMITS => {
                state.retransmits += 1;
            }
            Outcome::Retransmit => {
                if frames[active].pcb() == Pcb::request(SuperKind::Resync) {
                    return Err(hard_fail("no response to RESYNC"));
                }
                log::debug!("retransmit limit reached for {}", frames[active].pcb());
                frames[1 - active] = Frame::new(Pcb::request(SuperKind::Resync));
                active = 1 - active;
                state.reset_counters();
            }
            Outcome::HardFail => {
                let reason = state
                    .last_error
                    .take()
                    .unwrap_or_else(|| "no recovery path".to_string());
                return Err(hard_fail(&reason));
            }
            Outcome::Abort => {
                log::error!("exchange aborted by the card");
                return Err(Error::Abort);
            }
            Outcome::ResetDevice => {
                if was_reset {
                    log::error!("errors persist after device reset");
                    return Err(Error::DeviceReset);
                }
                if let Err(err) = transport.reset() {
                    log::error!("device reset failed: {}", err);
                    return Err(Error::DeviceReset);
                }
                log::warn!("{} reset after repeated errors", transport.name());
                was_reset = true;
                restart(state, sequence, opening, &mut frames[active]);
            }
            Outcome::ResetSession => {
                restart(state, sequence, opening, &mut frames[active]);
            }
        }
    }
}

fn restart(
    state: &mut ExchangeState<'_>,
    sequence: &mut SequenceState,
    opening: Opening,
    frame: &mut Frame,
) {
    log::debug!("restarting exchange with fresh sequence state");
    state.rewind();
    sequence.reset();
    opening.load(frame, state, sequence);
}

fn hard_fail(reason: &str) -> Error {
    log::error!("T=1 hard failure: {}", reason);
    Error::HardFail(reason.to_string())
}
