/*
 * Copyright (C) 2025-2026 taylor.fish <contact@taylor.fish>
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

//! Rawline opens a serial character device and configures it for raw
//! binary transport: no echo, no canonical processing, no signal
//! generation, no flow control, and no output post-processing. It logs a
//! bit-by-bit report of the terminal attributes before and after
//! configuration so a misbehaving line can be diagnosed by diffing the
//! two reports.
//!
//! The crate establishes a correctly configured channel and hands back
//! its descriptor; it does not implement a protocol, buffer data, or
//! recover from device failures.
//!
//! ```no_run
//! use rawline::{Parity, SerialParams};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), rawline::Error> {
//! let params = SerialParams {
//!     baud_rate: 115200,
//!     parity: Parity::Even,
//!     ..SerialParams::default()
//! };
//! let fd = rawline::open_port(Path::new("/dev/ttyUSB0"), &params)?;
//! // Read and write raw bytes through `fd`; dropping it closes the
//! // device.
//! # Ok(())
//! # }
//! ```

use std::os::fd::OwnedFd;
use std::path::Path;

use log::{debug, info};
use nix::fcntl::{fcntl, open, FcntlArg, OFlag};
use nix::sys::stat::Mode;
use nix::sys::termios::{tcflush, tcgetattr, tcsetattr};
use nix::sys::termios::{FlushArg, SetArg};

mod describe;
mod error;
mod params;
mod translate;

pub use describe::describe;
pub use error::{Error, ErrorKind};
pub use params::{DataBits, Parity, SerialParams, StopBits};
pub use translate::translate;

use describe::state;

/// Opens the serial device at `device` and configures it for raw
/// transport per `params`.
///
/// On success the configured descriptor is returned; ownership transfers
/// to the caller, and dropping it closes the device. On any failure no
/// descriptor is left open by this crate. The device is never retried;
/// the caller decides whether to try again with different parameters.
///
/// The baseline and target attribute states are logged at `info` level
/// via [`describe()`].
pub fn open_port(
    device: &Path,
    params: &SerialParams,
) -> Result<OwnedFd, Error> {
    let mut flags = OFlag::O_RDWR;
    flags.set(OFlag::O_NOCTTY, params.no_ctty);
    flags.set(OFlag::O_NONBLOCK, params.no_delay);

    info!(
        "opening [{}]: O_RDWR [enabled] O_NOCTTY [{}] O_NONBLOCK [{}]",
        device.display(),
        state(params.no_ctty),
        state(params.no_delay),
    );

    let fd = open(device, flags, Mode::empty()).map_err(
        ErrorKind::DeviceOpenFailed {
            device: device.to_owned(),
        }
        .with("open"),
    )?;

    // O_NONBLOCK is honored only for the open itself; reads on the
    // configured line block per VMIN/VTIME.
    if let Err(e) = fcntl(&fd, FcntlArg::F_SETFL(OFlag::empty())) {
        debug!("fcntl(F_SETFL): {e}");
    }

    configure(&fd, device, params)?;
    Ok(fd)
}

/// Reads the baseline attributes, translates them per `params`, and
/// applies the result. Borrows the descriptor: on failure the caller
/// still owns it and its drop closes the device.
fn configure(
    fd: &OwnedFd,
    device: &Path,
    params: &SerialParams,
) -> Result<(), Error> {
    let baseline = tcgetattr(fd).map_err(
        ErrorKind::AttributeReadFailed {
            device: device.to_owned(),
        }
        .with("tcgetattr"),
    )?;
    info!(
        "baseline attributes of [{}]:\n{}",
        device.display(),
        describe(&baseline),
    );

    let target = translate(&baseline, params)?;
    info!(
        "target attributes of [{}]:\n{}",
        device.display(),
        describe(&target),
    );

    tcsetattr(fd, SetArg::TCSANOW, &target).map_err(
        ErrorKind::AttributeWriteFailed {
            device: device.to_owned(),
        }
        .with("tcsetattr"),
    )?;

    // Drop anything that arrived on the line before it was configured.
    if let Err(e) = tcflush(fd, FlushArg::TCIFLUSH) {
        debug!("tcflush: {e}");
    }
    Ok(())
}
