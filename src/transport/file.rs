//! # Device File Transport
//!
//! Writes to a local device node such as `/dev/usb/lp0` (the kernel's USB
//! printer class driver). Any writable path works, which makes it handy
//! for capturing output to a regular file.
//!
//! ## Chunked Writes
//!
//! Large labels are written in chunks with a small delay between them so
//! slow USB printers are not flooded.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use super::{Transport, io_error};
use crate::error::LabelError;

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// An open device file.
pub struct FileTransport {
    file: File,
    path: String,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl FileTransport {
    /// Open the device for writing.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or the lp group)
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, LabelError> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .write(true)
            .create(!path.starts_with("/dev"))
            .truncate(!path.starts_with("/dev"))
            .open(path)
            .map_err(|e| io_error(&format!("Failed to open {}", path.display()), e))?;

        Ok(Self {
            file,
            path: path.display().to_string(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }
}

impl Transport for FileTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), LabelError> {
        if data.len() <= self.chunk_size {
            self.file
                .write_all(data)
                .map_err(|e| io_error(&format!("Write to {} failed", self.path), e))?;
        } else {
            for chunk in data.chunks(self.chunk_size) {
                self.file
                    .write_all(chunk)
                    .map_err(|e| io_error(&format!("Write to {} failed", self.path), e))?;

                if !self.chunk_delay.is_zero() {
                    thread::sleep(self.chunk_delay);
                }
            }
        }

        Ok(())
    }

    fn dispose(&mut self) -> Result<(), LabelError> {
        self.file
            .flush()
            .map_err(|e| io_error(&format!("Flush of {} failed", self.path), e))
    }
}
