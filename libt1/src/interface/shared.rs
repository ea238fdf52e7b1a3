// libt1/src/interface/shared.rs

//! Thread-safe wrappers around an open interface. The lock is held for a
//! whole exchange so blocks of concurrent callers never interleave.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ErrorReport;
use crate::interface::handle::{Interface, Open};
use crate::transport::Transport;
use crate::types::Ifs;
use crate::Result;

/// Cloneable handle sharing one open interface between threads.
pub struct SharedInterface<T: Transport> {
    inner: Arc<Mutex<Interface<T, Open>>>,
}

impl<T: Transport> Clone for SharedInterface<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> SharedInterface<T> {
    /// Share `interface`.
    pub fn new(interface: Interface<T, Open>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(interface)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Interface<T, Open>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`Interface::transceive`].
    pub fn transceive(&self, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        self.lock().transceive(tx, rx)
    }

    /// See [`Interface::negotiate_ifs`].
    pub fn negotiate_ifs(&self, ifs: Ifs) -> Result<()> {
        self.lock().negotiate_ifs(ifs)
    }

    /// See [`Interface::abort`].
    pub fn abort(&self) -> Result<()> {
        self.lock().abort()
    }

    /// Copy of the last recorded failure.
    pub fn last_error(&self) -> Option<ErrorReport> {
        self.lock().last_error().cloned()
    }

    /// Run `f` with exclusive access to the interface.
    pub fn with<R>(&self, f: impl FnOnce(&mut Interface<T, Open>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }
}

#[cfg(feature = "async")]
pub use self::asynchronous::AsyncInterface;

#[cfg(feature = "async")]
mod asynchronous {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use crate::error::ErrorReport;
    use crate::interface::handle::{Interface, Open};
    use crate::transport::Transport;
    use crate::{Error, Result};

    /// Async handle. Exchanges block, so each one runs on the blocking
    /// pool while the owned lock guard travels with it.
    pub struct AsyncInterface<T: Transport + Send + 'static> {
        inner: Arc<Mutex<Interface<T, Open>>>,
    }

    impl<T: Transport + Send + 'static> Clone for AsyncInterface<T> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T: Transport + Send + 'static> AsyncInterface<T> {
        /// Share `interface` between tasks.
        pub fn new(interface: Interface<T, Open>) -> Self {
            Self {
                inner: Arc::new(Mutex::new(interface)),
            }
        }

        /// Exchange `tx` and return at most `rx_capacity` response bytes.
        pub async fn transceive(&self, tx: Vec<u8>, rx_capacity: usize) -> Result<Vec<u8>> {
            let mut guard = Arc::clone(&self.inner).lock_owned().await;
            tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
                let mut rx = vec![0u8; rx_capacity];
                let n = guard.transceive(&tx, &mut rx)?;
                rx.truncate(n);
                Ok(rx)
            })
            .await
            .map_err(|e| Error::HardFail(format!("exchange task failed: {}", e)))?
        }

        /// Copy of the last recorded failure.
        pub async fn last_error(&self) -> Option<ErrorReport> {
            self.inner.lock().await.last_error().cloned()
        }
    }

}
