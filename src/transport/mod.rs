//! # Printer Transport Layer
//!
//! This module provides communication backends for sending encoded labels
//! to printers.
//!
//! ## Available Transports
//!
//! | Descriptor | Backend |
//! |------------|---------|
//! | `tcp://192.168.0.23:9100` | [`tcp`]: raw TCP socket with a write timeout |
//! | `file:///dev/usb/lp0`, `/dev/usb/lp0` | [`file`]: local device node or file |
//!
//! ## Lifecycle
//!
//! A device handle is opened, written, and disposed. [`DeviceGuard`] owns
//! the handle for the duration of one print and disposes it when dropped,
//! so every exit path releases the device.

pub mod file;
pub mod tcp;

pub use file::FileTransport;
pub use tcp::TcpTransport;

use std::io;
use std::time::Duration;

use crate::error::LabelError;

/// Default write timeout for network printers.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// An open connection to a printer.
pub trait Transport: Send {
    /// Send all of `data` to the device.
    fn write(&mut self, data: &[u8]) -> Result<(), LabelError>;

    /// Flush and release the device. Called exactly once by [`DeviceGuard`].
    fn dispose(&mut self) -> Result<(), LabelError>;
}

/// Opens transports for target descriptors.
pub trait TransportFactory: Send + Sync {
    fn open(&self, target: &str) -> Result<Box<dyn Transport>, LabelError>;
}

/// Backend selected from a target descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// `host:port` of a network printer
    Network(String),
    /// Path of a local device node
    Device(String),
}

/// Pick a backend from a target descriptor.
///
/// ```
/// use etiqueta::transport::{guess_backend, Backend};
///
/// assert_eq!(
///     guess_backend("tcp://192.168.0.23:9100").unwrap(),
///     Backend::Network("192.168.0.23:9100".into())
/// );
/// assert_eq!(
///     guess_backend("file:///dev/usb/lp0").unwrap(),
///     Backend::Device("/dev/usb/lp0".into())
/// );
/// assert!(guess_backend("usb://0x04f9:0x2015").is_err());
/// ```
pub fn guess_backend(target: &str) -> Result<Backend, LabelError> {
    let target = target.trim();
    if let Some(addr) = target.strip_prefix("tcp://") {
        if addr.is_empty() {
            return Err(LabelError::Transport("Missing host in tcp:// target".into()));
        }
        let addr = if addr.contains(':') {
            addr.to_string()
        } else {
            format!("{}:{}", addr, tcp::DEFAULT_PORT)
        };
        return Ok(Backend::Network(addr));
    }
    if let Some(path) = target.strip_prefix("file://") {
        return Ok(Backend::Device(path.to_string()));
    }
    if target.starts_with('/') {
        return Ok(Backend::Device(target.to_string()));
    }

    Err(LabelError::Transport(format!(
        "Couldn't guess the backend to use from the printer descriptor '{}'",
        target
    )))
}

/// The built-in network and device backends.
#[derive(Debug, Clone, Copy)]
pub struct Backends {
    pub write_timeout: Duration,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl TransportFactory for Backends {
    fn open(&self, target: &str) -> Result<Box<dyn Transport>, LabelError> {
        match guess_backend(target)? {
            Backend::Network(addr) => Ok(Box::new(TcpTransport::connect(&addr, self.write_timeout)?)),
            Backend::Device(path) => Ok(Box::new(FileTransport::open(&path)?)),
        }
    }
}

/// Map an I/O error to a transport error, keeping timeouts distinct.
pub(crate) fn io_error(context: &str, e: io::Error) -> LabelError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            LabelError::TransportTimeout(format!("{}: {}", context, e))
        }
        _ => LabelError::Transport(format!("{}: {}", context, e)),
    }
}

/// # Device Guard
///
/// Scoped ownership of an open transport. The handle is disposed when the
/// guard is dropped, whether the print succeeded or failed.
pub struct DeviceGuard {
    handle: Option<Box<dyn Transport>>,
    target: String,
}

impl DeviceGuard {
    pub fn open(factory: &dyn TransportFactory, target: &str) -> Result<Self, LabelError> {
        let handle = factory.open(target)?;
        Ok(Self {
            handle: Some(handle),
            target: target.to_string(),
        })
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), LabelError> {
        match self.handle.as_mut() {
            Some(handle) => handle.write(data),
            None => Err(LabelError::Transport(format!("{} is already closed", self.target))),
        }
    }

    /// Dispose now and report a failing dispose to the caller.
    pub fn close(mut self) -> Result<(), LabelError> {
        match self.handle.take() {
            Some(mut handle) => handle.dispose(),
            None => Ok(()),
        }
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take()
            && let Err(e) = handle.dispose()
        {
            log::warn!("Failed to release {}: {}", self.target, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    struct RecordingTransport {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for RecordingTransport {
        fn write(&mut self, data: &[u8]) -> Result<(), LabelError> {
            self.events.lock().unwrap().push(format!("write {}", data.len()));
            Err(LabelError::Transport("Connection reset".into()))
        }

        fn dispose(&mut self) -> Result<(), LabelError> {
            self.events.lock().unwrap().push("dispose".into());
            Ok(())
        }
    }

    impl TransportFactory for Recorder {
        fn open(&self, _target: &str) -> Result<Box<dyn Transport>, LabelError> {
            Ok(Box::new(RecordingTransport {
                events: self.events.clone(),
            }))
        }
    }

    #[test]
    fn test_guard_disposes_on_drop() {
        let recorder = Recorder::default();
        {
            let mut guard = DeviceGuard::open(&recorder, "mock").unwrap();
            assert!(guard.write(b"abc").is_err());
        }
        assert_eq!(*recorder.events.lock().unwrap(), vec!["write 3", "dispose"]);
    }

    #[test]
    fn test_guard_close_disposes_once() {
        let recorder = Recorder::default();
        let guard = DeviceGuard::open(&recorder, "mock").unwrap();
        guard.close().unwrap();
        assert_eq!(*recorder.events.lock().unwrap(), vec!["dispose"]);
    }

    #[test]
    fn test_guess_backend() {
        assert_eq!(
            guess_backend("tcp://printer.local").unwrap(),
            Backend::Network("printer.local:9100".into())
        );
        assert_eq!(
            guess_backend("/dev/usb/lp1").unwrap(),
            Backend::Device("/dev/usb/lp1".into())
        );
        assert_eq!(guess_backend("tcp://").unwrap_err().kind(), "TransportError");
        assert_eq!(guess_backend("printer").unwrap_err().kind(), "TransportError");
    }

    #[test]
    fn test_timeouts_are_distinct() {
        let err = io_error("write", io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(err.kind(), "TransportTimeout");
        let err = io_error("write", io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(err.kind(), "TransportError");
    }
}
