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

//! Translation of logical serial parameters into terminal attributes.

use crate::error::{Error, ErrorKind};
use crate::params::{DataBits, Parity, SerialParams, StopBits};
use nix::sys::termios::{cfsetispeed, cfsetospeed};
use nix::sys::termios::{BaudRate, SpecialCharacterIndices, Termios};
use nix::sys::termios::{ControlFlags, InputFlags, LocalFlags, OutputFlags};

/// Maps a numeric line speed onto its OS speed constant.
///
/// Only the discrete rates in this table are supported. Anything else is
/// rejected rather than rounded to a neighboring constant, including rates
/// the OS happens to define a constant for.
fn baud_constant(rate: u32) -> Option<BaudRate> {
    Some(match rate {
        300 => BaudRate::B300,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        _ => return None,
    })
}

/// Produces the terminal attributes that configure a serial line per
/// `params`, starting from `baseline`.
///
/// The result always describes a raw line: no echo, no canonical
/// processing, no signal generation, no flow control, and no output
/// post-processing, with reads blocking until a single byte is available.
/// `baseline` is not modified; if [`clear_flags`](SerialParams::clear_flags)
/// is set, its flag groups are discarded entirely rather than refined.
///
/// Fails with [`ErrorKind::UnsupportedBaudRate`] if the requested rate is
/// not in the supported table.
pub fn translate(
    baseline: &Termios,
    params: &SerialParams,
) -> Result<Termios, Error> {
    let baud = baud_constant(params.baud_rate).ok_or_else(|| {
        Error::from_kind(ErrorKind::UnsupportedBaudRate(params.baud_rate))
    })?;

    let mut attrs = baseline.clone();
    if params.clear_flags {
        attrs.input_flags = InputFlags::empty();
        attrs.output_flags = OutputFlags::empty();
        attrs.control_flags = ControlFlags::empty();
        attrs.local_flags = LocalFlags::empty();
    }

    // No newline translation, no break handling, no parity marking, and
    // no software flow control on input.
    attrs.input_flags &= !(InputFlags::INLCR
        | InputFlags::IGNCR
        | InputFlags::ICRNL
        | InputFlags::IGNBRK
        | InputFlags::PARMRK
        | InputFlags::IXON
        | InputFlags::IXOFF
        | InputFlags::IXANY);

    // No hardware flow control; the session always owns the line locally
    // and keeps the receiver running.
    attrs.control_flags &= !ControlFlags::CRTSCTS;
    attrs.control_flags |= ControlFlags::CREAD | ControlFlags::CLOCAL;

    match params.parity {
        Parity::None => {
            attrs.control_flags &=
                !(ControlFlags::PARENB | ControlFlags::PARODD);
        }
        // Space parity is driven as even, mark as odd; termios cannot
        // represent either distinctly.
        Parity::Even | Parity::Space => {
            attrs.control_flags |= ControlFlags::PARENB;
            attrs.control_flags &= !ControlFlags::PARODD;
        }
        Parity::Odd | Parity::Mark => {
            attrs.control_flags |=
                ControlFlags::PARENB | ControlFlags::PARODD;
        }
    }

    match params.stop_bits {
        StopBits::One => {
            attrs.control_flags &= !ControlFlags::CSTOPB;
        }
        // 1.5 stop bits has no termios representation either; two is the
        // closest the line can get.
        StopBits::OneAndHalf | StopBits::Two => {
            attrs.control_flags |= ControlFlags::CSTOPB;
        }
    }

    attrs.control_flags &= !ControlFlags::CSIZE;
    attrs.control_flags |= match params.data_bits {
        DataBits::Five => ControlFlags::CS5,
        DataBits::Six => ControlFlags::CS6,
        DataBits::Seven => ControlFlags::CS7,
        DataBits::Eight => ControlFlags::CS8,
    };

    // No line discipline at all: no canonical mode, no echo in any
    // variant, no signal generation, no extended processing.
    attrs.local_flags &= !(LocalFlags::ICANON
        | LocalFlags::ECHO
        | LocalFlags::ECHOE
        | LocalFlags::ECHOK
        | LocalFlags::ECHONL
        | LocalFlags::ECHOCTL
        | LocalFlags::ECHOKE
        | LocalFlags::ISIG
        | LocalFlags::IEXTEN);

    // Output bytes pass through unmodified.
    attrs.output_flags &= !(OutputFlags::OPOST
        | OutputFlags::ONLCR
        | OutputFlags::OCRNL);

    // Reads return as soon as one byte is available.
    attrs.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    attrs.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

    cfsetispeed(&mut attrs, baud).map_err(
        ErrorKind::UnsupportedBaudRate(params.baud_rate).with("cfsetispeed"),
    )?;
    cfsetospeed(&mut attrs, baud).map_err(
        ErrorKind::UnsupportedBaudRate(params.baud_rate).with("cfsetospeed"),
    )?;

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::libc;
    use nix::sys::termios::{cfgetispeed, cfgetospeed};

    fn zeroed() -> Termios {
        Termios::from(unsafe { std::mem::zeroed::<libc::termios>() })
    }

    fn params(baud_rate: u32) -> SerialParams {
        SerialParams {
            baud_rate,
            ..SerialParams::default()
        }
    }

    #[test]
    fn supported_rates_map_to_speed_constants() {
        let table = [
            (300, BaudRate::B300),
            (9600, BaudRate::B9600),
            (19200, BaudRate::B19200),
            (38400, BaudRate::B38400),
            (57600, BaudRate::B57600),
            (115200, BaudRate::B115200),
            (230400, BaudRate::B230400),
        ];
        for (rate, constant) in table {
            let target = translate(&zeroed(), &params(rate)).unwrap();
            assert_eq!(cfgetispeed(&target), constant, "{rate}");
            assert_eq!(cfgetospeed(&target), constant, "{rate}");
        }
    }

    #[test]
    fn rates_outside_the_table_are_rejected() {
        // 110 through 4800 have OS constants but are deliberately not in
        // the supported table.
        for rate in [0, 110, 1200, 2400, 4800, 14400, 921600] {
            let err = translate(&zeroed(), &params(rate)).unwrap_err();
            assert!(
                matches!(
                    err.kind,
                    ErrorKind::UnsupportedBaudRate(r) if r == rate,
                ),
                "{rate}",
            );
        }
    }

    #[test]
    fn translation_is_a_fixed_point_with_cleared_flags() {
        let mut p = params(115200);
        p.clear_flags = true;
        let mut noisy = zeroed();
        noisy.input_flags = InputFlags::all();
        noisy.output_flags = OutputFlags::all();
        noisy.control_flags = ControlFlags::all();
        noisy.local_flags = LocalFlags::all();

        let once = translate(&noisy, &p).unwrap();
        let twice = translate(&once, &p).unwrap();
        assert_eq!(once.input_flags, twice.input_flags);
        assert_eq!(once.output_flags, twice.output_flags);
        assert_eq!(once.control_flags, twice.control_flags);
        assert_eq!(once.local_flags, twice.local_flags);
        assert_eq!(once.control_chars, twice.control_chars);
        assert_eq!(cfgetispeed(&once), cfgetispeed(&twice));
        assert_eq!(cfgetospeed(&once), cfgetospeed(&twice));
    }

    #[test]
    fn parity_bit_mapping() {
        let cases = [
            (Parity::None, false, false),
            (Parity::Even, true, false),
            (Parity::Space, true, false),
            (Parity::Odd, true, true),
            (Parity::Mark, true, true),
        ];
        // Start from a baseline with both parity bits set so that
        // `Parity::None` actually has something to clear.
        let mut baseline = zeroed();
        baseline.control_flags =
            ControlFlags::PARENB | ControlFlags::PARODD;
        for (parity, enable, odd) in cases {
            let mut p = params(9600);
            p.parity = parity;
            let target = translate(&baseline, &p).unwrap();
            assert_eq!(
                target.control_flags.contains(ControlFlags::PARENB),
                enable,
                "{parity:?}",
            );
            assert_eq!(
                target.control_flags.contains(ControlFlags::PARODD),
                odd,
                "{parity:?}",
            );
        }
    }

    #[test]
    fn stop_bit_mapping() {
        let mut baseline = zeroed();
        baseline.control_flags = ControlFlags::CSTOPB;
        for (stop_bits, two) in [
            (StopBits::One, false),
            (StopBits::OneAndHalf, true),
            (StopBits::Two, true),
        ] {
            let mut p = params(9600);
            p.stop_bits = stop_bits;
            let target = translate(&baseline, &p).unwrap();
            assert_eq!(
                target.control_flags.contains(ControlFlags::CSTOPB),
                two,
                "{stop_bits:?}",
            );
        }
    }

    #[test]
    fn line_discipline_is_silenced_without_clearing() {
        let mut noisy = zeroed();
        noisy.local_flags = LocalFlags::all();
        let target = translate(&noisy, &params(9600)).unwrap();
        for flag in [
            LocalFlags::ICANON,
            LocalFlags::ECHO,
            LocalFlags::ECHOE,
            LocalFlags::ECHOK,
            LocalFlags::ECHONL,
            LocalFlags::ECHOCTL,
            LocalFlags::ECHOKE,
            LocalFlags::ISIG,
            LocalFlags::IEXTEN,
        ] {
            assert!(!target.local_flags.contains(flag), "{flag:?}");
        }
    }

    #[test]
    fn flow_control_is_disabled_without_clearing() {
        let mut noisy = zeroed();
        noisy.input_flags =
            InputFlags::IXON | InputFlags::IXOFF | InputFlags::IXANY;
        noisy.control_flags = ControlFlags::CRTSCTS;
        let target = translate(&noisy, &params(9600)).unwrap();
        assert!(!target.input_flags.intersects(
            InputFlags::IXON | InputFlags::IXOFF | InputFlags::IXANY
        ));
        assert!(!target.control_flags.contains(ControlFlags::CRTSCTS));
    }

    #[test]
    fn reads_block_until_one_byte() {
        let target = translate(&zeroed(), &params(9600)).unwrap();
        let vmin = SpecialCharacterIndices::VMIN as usize;
        let vtime = SpecialCharacterIndices::VTIME as usize;
        assert_eq!(target.control_chars[vmin], 1);
        assert_eq!(target.control_chars[vtime], 0);
    }

    #[test]
    fn control_group_for_9600_8e2() {
        let p = SerialParams {
            baud_rate: 9600,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
            data_bits: DataBits::Eight,
            clear_flags: false,
            no_ctty: false,
            no_delay: false,
        };
        let target = translate(&zeroed(), &p).unwrap();
        let control = target.control_flags;
        assert!(control.contains(ControlFlags::PARENB));
        assert!(!control.contains(ControlFlags::PARODD));
        assert!(control.contains(ControlFlags::CSTOPB));
        assert_eq!(control & ControlFlags::CSIZE, ControlFlags::CS8);
        assert!(control
            .contains(ControlFlags::CREAD | ControlFlags::CLOCAL));
    }
}
