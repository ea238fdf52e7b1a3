//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTransport setup so tests across the
//! crate and tests/ directory can script a card the same way.
#![allow(dead_code)]

use crate::interface::{Interface, Open};
use crate::protocol::{Pcb, SuperKind};
use crate::transport::mock::MockTransport;
use crate::Result;

/// One scripted card block.
#[doc(hidden)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBlock {
    /// I-block with the given sequence, more-data bit and INF
    Info(bool, bool, Vec<u8>),
    /// Error-free R-block expecting the given sequence
    Ack(bool),
    /// S-block request, value for IFS and WTX
    Request(SuperKind, Option<u8>),
    /// S-block response, value for IFS and WTX
    Response(SuperKind, Option<u8>),
    /// No reply within the timeout
    Silence,
}

fn value_inf(value: Option<u8>) -> Vec<u8> {
    value.map(|v| vec![v]).unwrap_or_default()
}

/// Queue `blocks` as the card's replies, in order.
#[doc(hidden)]
pub fn script_card(mock: &mut MockTransport, blocks: Vec<CardBlock>) -> Result<()> {
    for block in blocks {
        match block {
            CardBlock::Info(seq, more, inf) => mock.push_frame(Pcb::info(seq, more), &inf)?,
            CardBlock::Ack(seq) => mock.push_frame(Pcb::ack(seq), &[])?,
            CardBlock::Request(kind, value) => {
                mock.push_frame(Pcb::request(kind), &value_inf(value))?
            }
            CardBlock::Response(kind, value) => {
                mock.push_frame(Pcb::response(kind), &value_inf(value))?
            }
            CardBlock::Silence => mock.push_silence(1),
        }
    }
    Ok(())
}

/// Card replies for a chained response of `data` split into `chunk`-sized
/// I-blocks, starting at card sequence `first_seq`.
#[doc(hidden)]
pub fn chained_response(data: &[u8], chunk: usize, first_seq: bool) -> Vec<CardBlock> {
    let chunks: Vec<&[u8]> = if data.is_empty() {
        vec![data]
    } else {
        data.chunks(chunk.max(1)).collect()
    };
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, c)| CardBlock::Info(first_seq ^ (i % 2 == 1), i != last, c.to_vec()))
        .collect()
}

/// Open an interface over a MockTransport scripted with `blocks`.
#[doc(hidden)]
pub fn scripted_interface(blocks: Vec<CardBlock>) -> Result<Interface<MockTransport, Open>> {
    let mut mock = MockTransport::new();
    script_card(&mut mock, blocks)?;
    Interface::new(mock).open()
}
