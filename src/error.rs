/*
 * Copyright (C) 2025 taylor.fish <contact@taylor.fish>
 *
 * This file is part of Rawline.
 *
 * Rawline is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Rawline is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Rawline. If not, see <https://www.gnu.org/licenses/>.
 */

//! Error types.

use nix::errno::Errno;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

/// The kind of error that occurred.
#[non_exhaustive]
#[derive(Debug)]
pub enum ErrorKind {
    /// The requested baud rate has no matching OS speed constant.
    #[non_exhaustive]
    UnsupportedBaudRate(u32),
    /// Could not open the serial device.
    #[non_exhaustive]
    DeviceOpenFailed {
        /// The device that could not be opened.
        device: PathBuf,
    },
    /// Could not read terminal attributes from the device.
    #[non_exhaustive]
    AttributeReadFailed {
        /// The device whose attributes could not be read.
        device: PathBuf,
    },
    /// Could not apply terminal attributes to the device.
    #[non_exhaustive]
    AttributeWriteFailed {
        /// The device whose attributes could not be applied.
        device: PathBuf,
    },
}

use ErrorKind::*;

impl ErrorKind {
    pub(crate) fn with(
        self,
        call: &'static str,
    ) -> impl FnOnce(Errno) -> Error {
        move |errno| Error {
            kind: self,
            call: Some(call),
            io_error: Some(errno.into()),
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedBaudRate(rate) => {
                write!(f, "baud rate [{rate}] is not supported")
            }
            DeviceOpenFailed {
                device,
            } => {
                write!(f, "could not open device [{}]", device.display())
            }
            AttributeReadFailed {
                device,
            } => write!(
                f,
                "could not read attributes of [{}]",
                device.display(),
            ),
            AttributeWriteFailed {
                device,
            } => write!(
                f,
                "could not apply attributes to [{}]",
                device.display(),
            ),
        }
    }
}

/// Returned by [`open_port`](crate::open_port) and
/// [`translate`](crate::translate()) when an error occurs.
#[non_exhaustive]
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The name of the function (if any) that produced the error.
    pub call: Option<&'static str>,
    /// The underlying system error (if any) that occurred.
    pub io_error: Option<io::Error>,
}

impl Error {
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            call: None,
            io_error: None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let errno = self
            .io_error
            .as_ref()
            .and_then(|e| e.raw_os_error())
            .map(Errno::from_raw);
        write!(f, "{}", self.kind)?;
        match (&self.call, errno) {
            (Some(call), Some(e)) => {
                write!(f, " ({call}() returned {e})")
            }
            (Some(call), None) => {
                write!(f, " (from {call}())")
            }
            (None, Some(e)) => {
                write!(f, " (got {e})")
            }
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for Error {}
