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

use clap::Parser;
use rawline::{DataBits, Parity, SerialParams, StopBits};
use std::error::Error;
use std::os::fd::AsRawFd;
use std::path::PathBuf;
use std::str::FromStr;

/// Open a serial device, configure it for raw transport, and report the
/// resulting terminal attributes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial device path (e.g. /dev/ttyUSB0)
    device: PathBuf,

    /// Line speed in baud
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Parity mode (none, even, odd, mark, space)
    #[arg(short, long, default_value = "none", value_parser = Parity::from_str)]
    parity: Parity,

    /// Stop bits (1, 1.5, 2)
    #[arg(short, long, default_value = "1", value_parser = StopBits::from_str)]
    stop_bits: StopBits,

    /// Data bits per character (5, 6, 7, 8)
    #[arg(long, default_value = "8", value_parser = DataBits::from_str)]
    data_bits: DataBits,

    /// Zero all flag groups before applying settings
    #[arg(long)]
    clear: bool,

    /// Do not become the controlling terminal
    #[arg(long)]
    no_ctty: bool,

    /// Open the device without blocking
    #[arg(long)]
    no_delay: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    let params = SerialParams {
        baud_rate: args.baud,
        parity: args.parity,
        stop_bits: args.stop_bits,
        data_bits: args.data_bits,
        clear_flags: args.clear,
        no_ctty: args.no_ctty,
        no_delay: args.no_delay,
    };

    let fd = rawline::open_port(&args.device, &params)?;
    println!(
        "configured [{}] on fd [{}]",
        args.device.display(),
        fd.as_raw_fd(),
    );
    Ok(())
}
