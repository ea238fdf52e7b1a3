// libt1/src/engine/rules.rs

//! Rule engine.
//!
//! [`evaluate`] looks at the block last sent as reference and the block just
//! received, updates the exchange state, optionally prepares the next block
//! to send, and tells the orchestrator what to do next. It does no I/O.

use std::convert::TryFrom;

use derive_more::Display;

use crate::constants::{RESET_ERROR_THRESHOLD, RESYNC_ERROR_THRESHOLD};
use crate::engine::state::{ExchangeState, SequenceState};
use crate::protocol::{Frame, Pcb, Received, SuperKind};
use crate::types::{Ifs, WaitMultiplier};

/// What the orchestrator does after a (sent, received) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    /// The exchange finished successfully.
    #[display(fmt = "Complete")]
    Complete,
    /// The card aborted the exchange.
    #[display(fmt = "Abort")]
    Abort,
    /// The prepared block becomes the new reference block.
    #[display(fmt = "Continue")]
    Continue,
    /// No recovery is possible.
    #[display(fmt = "Hard failure")]
    HardFail,
    /// Reset the secure element and start over.
    #[display(fmt = "Reset device")]
    ResetDevice,
    /// Start the exchange over with fresh sequence state.
    #[display(fmt = "Reset session")]
    ResetSession,
    /// Send the reference block again.
    #[display(fmt = "Retransmit")]
    Retransmit,
    /// Send the prepared block once, keeping the reference block.
    #[display(fmt = "Single shot")]
    SingleShot,
}

/// Why a received block failed the error check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BlockError {
    /// LRC mismatch
    #[display(fmt = "parity error")]
    Parity,
    /// Anything else: timeout, bad sequence, malformed block
    #[display(fmt = "other error")]
    Other,
}

impl BlockError {
    /// R-block reporting this error and asking for `seq` again.
    pub fn reply(self, seq: bool) -> Pcb {
        Pcb::Ready {
            seq,
            other: self == BlockError::Other,
            parity: self == BlockError::Parity,
        }
    }
}

/// Check a received block before rule matching and record sequence bits.
///
/// The sequence of an I-block in `sent` is recorded once the received
/// block passes its checksum. A well-formed received I-block records the
/// card sequence.
pub fn check_block(
    sequence: &mut SequenceState,
    sent: &Frame,
    received: &Frame,
) -> Result<(), BlockError> {
    if received.is_invalid() {
        return Err(BlockError::Other);
    }
    if !received.checksum_ok() {
        log::debug!(
            "invalid LRC {:#04x} instead of {:#04x}",
            received.lrc(),
            received.compute_lrc()
        );
        return Err(BlockError::Parity);
    }

    if let Pcb::Info { seq, .. } = sent.pcb() {
        sequence.host = seq;
    }

    match received.pcb() {
        Pcb::Ready { .. } if !received.is_empty() => Err(BlockError::Other),
        Pcb::Ready { .. } => Ok(()),
        Pcb::Super { kind, .. } => {
            let expected = if kind.carries_value() { 1 } else { 0 };
            if received.len() != expected {
                log::debug!("{} block with LEN {}", kind.name(), received.len());
                return Err(BlockError::Other);
            }
            if kind == SuperKind::Ifs && matches!(received.inf_byte(), Some(0) | Some(255)) {
                return Err(BlockError::Other);
            }
            Ok(())
        }
        Pcb::Info { seq, .. } => {
            // I-blocks alternate per endpoint.
            if seq == sequence.card {
                log::debug!("got seq {} expected {}", seq as u8, !sequence.card as u8);
                return Err(BlockError::Other);
            }
            sequence.card = seq;
            Ok(())
        }
    }
}

/// Decide the next step for the reference block `sent` and the block just
/// `received`. `next` has a cleared header and receives any block the
/// outcome asks to send.
pub fn evaluate(
    state: &mut ExchangeState<'_>,
    sequence: &mut SequenceState,
    sent: &Frame,
    received: &Frame,
    next: &mut Frame,
) -> Outcome {
    let card_before = sequence.card;
    let mut forced_invalid = false;

    loop {
        let checked = if forced_invalid {
            Err(BlockError::Other)
        } else {
            check_block(sequence, sent, received)
        };

        let (rx, block_error) = match checked {
            Ok(()) => (received.received(), None),
            Err(err) => {
                log::debug!("incoming frame failed the error check: {}", err);
                state.last_error = Some(format!("invalid frame received ({})", err));
                state.errors += 1;
                if state.errors >= RESET_ERROR_THRESHOLD {
                    return Outcome::ResetDevice;
                }
                // A RESYNC request is bounded by the retransmit limit instead.
                if state.errors >= RESYNC_ERROR_THRESHOLD
                    && sent.pcb() != Pcb::request(SuperKind::Resync)
                {
                    prepare(next, Pcb::request(SuperKind::Resync), None);
                    return Outcome::Continue;
                }
                (Received::Invalid, Some(err))
            }
        };

        if let Some(outcome) = apply(state, sent, rx, received, block_error, next) {
            return outcome;
        }

        if rx == Received::Invalid {
            state.last_error = Some(format!("no rule for {} after {}", rx, sent.pcb()));
            return Outcome::HardFail;
        }

        log::debug!("unexpected {} after {}, re-evaluating as invalid", rx, sent.pcb());
        sequence.card = card_before;
        forced_invalid = true;
    }
}

fn prepare(next: &mut Frame, pcb: Pcb, value: Option<u8>) {
    next.set_pcb(pcb);
    match value {
        Some(v) => next.load_inf(&[v]),
        None => next.load_inf(&[]),
    };
}

fn apply(
    state: &mut ExchangeState<'_>,
    sent: &Frame,
    rx: Received,
    received: &Frame,
    block_error: Option<BlockError>,
    next: &mut Frame,
) -> Option<Outcome> {
    use Received::{Block, Invalid};

    let outcome = match (sent.pcb(), rx) {
        (Pcb::Info { more: false, .. }, Block(Pcb::Info { more: false, .. })) => {
            state.take_app_data(received);
            Outcome::Complete
        }
        // Card starts a chained response.
        (Pcb::Info { more: false, .. }, Block(Pcb::Info { seq, more: true })) => {
            state.take_app_data(received);
            prepare(next, Pcb::ack(!seq), None);
            Outcome::Continue
        }
        // Chained transmission: send the block the card asked for.
        (Pcb::Info { seq, more: true }, Block(ack @ Pcb::Ready { seq: wanted, .. }))
            if ack.is_clean_ack() && wanted != seq =>
        {
            state.fill_info_block(next, wanted);
            Outcome::Continue
        }
        (
            Pcb::Info { more: false, .. },
            Block(Pcb::Super {
                kind: SuperKind::Wtx,
                response: false,
            }),
        ) => {
            let mult = received.inf_byte().unwrap_or(1);
            prepare(next, Pcb::response(SuperKind::Wtx), Some(mult));
            state.wait_mult = WaitMultiplier::new(mult);
            Outcome::SingleShot
        }
        (
            Pcb::Super {
                kind: SuperKind::Ifs,
                response: false,
            },
            Block(Pcb::Super {
                kind: SuperKind::Ifs,
                response: true,
            }),
        ) if received.inf_byte() == sent.inf_byte() => Outcome::Complete,
        (
            reference,
            Block(Pcb::Super {
                kind: SuperKind::Ifs,
                response: false,
            }),
        ) if reference.is_info() || reference.is_clean_ack() => {
            let ifs = received.inf_byte().map(Ifs::try_from)?.ok()?;
            prepare(next, Pcb::response(SuperKind::Ifs), Some(ifs.as_u8()));
            state.ifs = ifs;
            Outcome::SingleShot
        }
        // Card ends or continues its chain.
        (ack @ Pcb::Ready { seq: wanted, .. }, Block(Pcb::Info { seq, more }))
            if ack.is_clean_ack() && seq == wanted =>
        {
            state.take_app_data(received);
            if more {
                prepare(next, Pcb::ack(!seq), None);
                Outcome::Continue
            } else {
                Outcome::Complete
            }
        }
        (
            Pcb::Super {
                kind: SuperKind::Resync,
                response: false,
            },
            Block(Pcb::Super {
                kind: SuperKind::Resync,
                response: true,
            }),
        ) => Outcome::ResetSession,
        (
            Pcb::Super {
                kind: SuperKind::Resync,
                response: false,
            },
            Invalid,
        ) => Outcome::Retransmit,
        // Bad block after an I-block: ask for it again.
        (Pcb::Info { seq, .. }, Invalid) => {
            let err = block_error.unwrap_or(BlockError::Other);
            prepare(next, err.reply(seq), None);
            log::debug!("bad rx, sending error {}", next.pcb());
            Outcome::SingleShot
        }
        (Pcb::Info { seq, more: false }, Block(Pcb::Ready { seq: wanted, .. })) if wanted != seq => {
            prepare(next, Pcb::ack(seq), None);
            log::debug!("unexpected ack, sending {}", next.pcb());
            Outcome::SingleShot
        }
        (Pcb::Ready { .. }, Invalid) => Outcome::Retransmit,
        (Pcb::Info { seq, .. }, Block(Pcb::Ready { seq: wanted, .. })) if wanted == seq => {
            Outcome::Retransmit
        }
        (
            Pcb::Super {
                kind: SuperKind::Abort,
                response: false,
            },
            Block(Pcb::Super {
                kind: SuperKind::Abort,
                response: true,
            }),
        ) => Outcome::Complete,
        (
            Pcb::Info { more: true, .. } | Pcb::Ready { .. },
            Block(Pcb::Super {
                kind: SuperKind::Abort,
                response: false,
            }),
        ) => {
            prepare(next, Pcb::response(SuperKind::Abort), None);
            Outcome::Continue
        }
        (
            Pcb::Super {
                kind: SuperKind::Abort,
                response: true,
            },
            Block(ack),
        ) if ack.is_clean_ack() => Outcome::Abort,
        (
            Pcb::Super {
                kind: SuperKind::Abort,
                ..
            }
            | Pcb::Super {
                kind: SuperKind::Ifs,
                response: false,
            },
            Invalid,
        ) => Outcome::Retransmit,
        _ => return None,
    };
    Some(outcome)
}
