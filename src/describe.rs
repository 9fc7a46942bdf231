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

//! Human-readable reporting of terminal attribute state.

use bitflags::Flags;
use nix::sys::termios::{cfgetispeed, cfgetospeed, Termios};
use std::fmt::Write;

pub(crate) fn state(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Appends one flag group to the report: the raw value in decimal and
/// hex, then one line per defined bit. Bits that do not exist on the
/// build platform are not part of the flag type and so never appear.
fn flag_group<F>(report: &mut String, name: &str, value: F)
where
    F: Flags + Copy,
    F::Bits: Into<u64>,
{
    let bits: u64 = value.bits().into();
    let _ = writeln!(report, "  {name}: [{bits}] [0x{bits:04X}]");
    for (flag, mask) in F::all().iter_names() {
        let _ = writeln!(
            report,
            "    {name}.[{flag:<10}] = [{}]",
            state(value.contains(mask)),
        );
    }
}

/// Renders every relevant bit of `attrs` as an `enabled`/`disabled` line,
/// grouped the way the termios structure is.
///
/// Pure and infallible; the output is meant to be logged for the baseline
/// and target states of a line so the two can be diffed by eye.
pub fn describe(attrs: &Termios) -> String {
    let mut report = String::from("termios {\n");
    flag_group(&mut report, "c_iflag", attrs.input_flags);
    flag_group(&mut report, "c_oflag", attrs.output_flags);
    flag_group(&mut report, "c_lflag", attrs.local_flags);
    flag_group(&mut report, "c_cflag", attrs.control_flags);
    report.push_str("  c_cc: {\n");
    for (i, cc) in attrs.control_chars.iter().enumerate() {
        let _ = writeln!(report, "    [{i:02}] = [0x{cc:02X}]");
    }
    report.push_str("  }\n");
    let _ = writeln!(report, "  ispeed: [{:?}]", cfgetispeed(attrs));
    let _ = writeln!(report, "  ospeed: [{:?}]", cfgetospeed(attrs));
    report.push('}');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::libc;
    use nix::sys::termios::LocalFlags;

    fn zeroed() -> Termios {
        Termios::from(unsafe { std::mem::zeroed::<libc::termios>() })
    }

    #[test]
    fn zeroed_attributes_report_everything_disabled() {
        let report = describe(&zeroed());
        assert!(report.contains("c_iflag: [0] [0x0000]"), "{report}");
        assert!(report.contains("c_oflag: [0] [0x0000]"), "{report}");
        assert!(report.contains("c_lflag: [0] [0x0000]"), "{report}");
        assert!(report.contains("c_cflag: [0] [0x0000]"), "{report}");
        assert!(!report.contains("= [enabled]"), "{report}");
    }

    #[test]
    fn set_bits_are_reported_enabled() {
        let mut attrs = zeroed();
        attrs.local_flags = LocalFlags::ECHO | LocalFlags::ISIG;
        let report = describe(&attrs);
        assert!(report.contains("c_lflag.[ECHO      ] = [enabled]"));
        assert!(report.contains("c_lflag.[ISIG      ] = [enabled]"));
        assert!(report.contains("c_lflag.[ICANON    ] = [disabled]"));
    }

    #[test]
    fn control_characters_are_reported_by_index() {
        let mut attrs = zeroed();
        attrs.control_chars[0] = 0x1C;
        let report = describe(&attrs);
        assert!(report.contains("[00] = [0x1C]"));
    }
}
