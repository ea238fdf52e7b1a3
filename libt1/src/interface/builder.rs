// libt1/src/interface/builder.rs

use std::time::Duration;

use crate::config::{Preprocess, ProtocolOptions};
use crate::interface::handle::{Closed, Interface, Open};
use crate::transport::Transport;
use crate::{Error, Result};

/// Helper to construct an Interface with optional configuration.
///
/// Options start from the backend's defaults; each setter overrides one
/// field.
pub struct InterfaceBuilder<T: Transport> {
    transport: Option<T>,
    options: Option<ProtocolOptions>,
    addresses: Option<(u8, u8)>,
    bwt: Option<Duration>,
    etu: Option<Duration>,
    preprocess: Option<Preprocess>,
}

impl<T: Transport> Default for InterfaceBuilder<T> {
    fn default() -> Self {
        Self {
            transport: None,
            options: None,
            addresses: None,
            bwt: None,
            etu: None,
            preprocess: None,
        }
    }
}

impl<T: Transport> InterfaceBuilder<T> {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend to build on. Required.
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the backend defaults entirely.
    pub fn with_options(mut self, options: ProtocolOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// NAD to listen for and NAD to send with.
    pub fn with_addresses(mut self, host: u8, node: u8) -> Self {
        self.addresses = Some((host, node));
        self
    }

    /// Override the block waiting time.
    pub fn with_bwt(mut self, bwt: Duration) -> Self {
        self.bwt = Some(bwt);
        self
    }

    /// Override the elementary time unit.
    pub fn with_etu(mut self, etu: Duration) -> Self {
        self.etu = Some(etu);
        self
    }

    /// Override the preprocessing hook.
    pub fn with_preprocess(mut self, hook: Preprocess) -> Self {
        self.preprocess = Some(hook);
        self
    }

    /// Consume the builder and return a closed Interface.
    /// Requires a transport to be provided; otherwise returns a config error.
    pub fn build(self) -> Result<Interface<T, Closed>> {
        let transport = self
            .transport
            .ok_or_else(|| Error::Config("no transport provided".into()))?;
        let mut options = self
            .options
            .unwrap_or_else(|| transport.protocol_options());
        if let Some((host, node)) = self.addresses {
            options.host_address = host;
            options.node_address = node;
        }
        if let Some(bwt) = self.bwt {
            options.bwt = bwt;
        }
        if let Some(etu) = self.etu {
            options.etu = etu;
        }
        if let Some(hook) = self.preprocess {
            options.preprocess = Some(hook);
        }
        Ok(Interface::with_options(transport, options))
    }

    /// Build and open in one step.
    pub fn open(self) -> Result<Interface<T, Open>> {
        self.build()?.open()
    }
}
