// libt1/src/interface/handle.rs

use std::marker::PhantomData;

use crate::config::ProtocolOptions;
use crate::engine::{self, Opening, SequenceState};
use crate::error::ErrorReport;
use crate::transport::Transport;
use crate::types::Ifs;
use crate::Result;

/// Type-state markers
/// Not yet opened, or closed again
pub struct Closed;
/// Ready for exchanges
pub struct Open;

/// Handle to a secure element behind a transport. Exchanges are only
/// available once the handle is open.
pub struct Interface<T: Transport, State = Closed> {
    transport: T,
    options: ProtocolOptions,
    sequence: SequenceState,
    last_error: Option<ErrorReport>,
    _state: PhantomData<State>,
}

impl<T: Transport> Interface<T, Closed> {
    /// Wrap a transport using the backend's default protocol options.
    pub fn new(transport: T) -> Self {
        let options = transport.protocol_options();
        Self::with_options(transport, options)
    }

    /// Wrap a transport with explicit options.
    pub fn with_options(transport: T, options: ProtocolOptions) -> Self {
        Self {
            transport,
            options,
            sequence: SequenceState::default(),
            last_error: None,
            _state: PhantomData,
        }
    }

    /// Validate the options and open the backend. Sequence state starts
    /// fresh for every open session.
    pub fn open(mut self) -> Result<Interface<T, Open>> {
        self.options.validate()?;
        self.transport.open()?;
        log::debug!("opened {} with {:?}", self.transport.name(), self.options);
        Ok(Interface {
            transport: self.transport,
            options: self.options,
            sequence: SequenceState::default(),
            last_error: None,
            _state: PhantomData,
        })
    }
}

impl<T: Transport> Interface<T, Open> {
    /// Send `tx` to the card and place its response in `rx`. Returns the
    /// number of response bytes written. Response bytes beyond `rx.len()`
    /// are dropped.
    pub fn transceive(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        self.exchange(Opening::Transceive, tx, rx)
    }

    /// Announce the largest INF this side accepts. Succeeds when the card
    /// echoes the value.
    pub fn negotiate_ifs(&mut self, ifs: Ifs) -> Result<()> {
        self.exchange(Opening::NegotiateIfs(ifs), &[], &mut []).map(|_| ())
    }

    /// Ask the card to abandon the current chain.
    pub fn abort(&mut self) -> Result<()> {
        self.exchange(Opening::Abort, &[], &mut []).map(|_| ())
    }

    fn exchange(&mut self, opening: Opening, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        let result = engine::run(
            &mut self.transport,
            &self.options,
            &mut self.sequence,
            opening,
            tx,
            rx,
        );
        self.last_error = result.as_ref().err().map(|err| err.report());
        result
    }

    /// Current sequence toggles.
    pub fn sequence(&self) -> SequenceState {
        self.sequence
    }

    /// Error left by the most recent operation, if it failed.
    pub fn last_error(&self) -> Option<&ErrorReport> {
        self.last_error.as_ref()
    }

    /// Close the backend and hand back a closed handle.
    pub fn close(mut self) -> Result<Interface<T, Closed>> {
        self.transport.close()?;
        Ok(Interface {
            transport: self.transport,
            options: self.options,
            sequence: SequenceState::default(),
            last_error: None,
            _state: PhantomData,
        })
    }
}

impl<T: Transport, State> Interface<T, State> {
    /// Backend name.
    pub fn name(&self) -> &'static str {
        self.transport.name()
    }

    /// Options in effect.
    pub fn options(&self) -> &ProtocolOptions {
        &self.options
    }

    /// Borrow the backend.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Borrow the backend mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give up the handle and keep the backend.
    pub fn into_transport(self) -> T {
        self.transport
    }
}
