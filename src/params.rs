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

//! The logical description of how a serial line should behave.
//!
//! Everything in this module is pure data: the bit-level meaning of each
//! variant lives in [`translate`](crate::translate()).

use strum::{Display, EnumString};

/// Parity mode of the line.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Parity {
    /// No parity bit.
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
    /// Mark parity. Termios has no distinct representation for it; the
    /// line is driven with odd parity instead.
    Mark,
    /// Space parity. Like [`Mark`](Self::Mark), this has no termios
    /// representation; the line is driven with even parity.
    Space,
}

/// Number of stop bits after each character.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
pub enum StopBits {
    /// One stop bit.
    #[strum(serialize = "1")]
    One,
    /// One and a half stop bits. Termios cannot express this; the line
    /// gets two stop bits instead.
    #[strum(serialize = "1.5")]
    OneAndHalf,
    /// Two stop bits.
    #[strum(serialize = "2")]
    Two,
}

/// Number of data bits in each character.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
pub enum DataBits {
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
}

/// The validated set of parameters for a serial line.
///
/// Read-only input to [`translate`](crate::translate()); nothing mutates
/// a `SerialParams` once it has been built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SerialParams {
    /// Line speed in baud. Must be one of the discrete rates in the
    /// supported table; anything else is rejected with
    /// [`UnsupportedBaudRate`](crate::ErrorKind::UnsupportedBaudRate).
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub data_bits: DataBits,
    /// Zero all four flag groups before applying settings, discarding the
    /// device's current state instead of refining it.
    pub clear_flags: bool,
    /// Open with `O_NOCTTY`: do not make the device the controlling
    /// terminal.
    pub no_ctty: bool,
    /// Open with `O_NONBLOCK`, so the open itself cannot block on modem
    /// control lines.
    pub no_delay: bool,
}

impl Default for SerialParams {
    /// 9600 baud, 8N1, incremental flag handling, blocking open.
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            parity: Parity::None,
            stop_bits: StopBits::One,
            data_bits: DataBits::Eight,
            clear_flags: false,
            no_ctty: false,
            no_delay: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_from_tokens() {
        assert_eq!("even".parse(), Ok(Parity::Even));
        assert_eq!("mark".parse(), Ok(Parity::Mark));
        assert_eq!("1".parse(), Ok(StopBits::One));
        assert_eq!("1.5".parse(), Ok(StopBits::OneAndHalf));
        assert_eq!("8".parse(), Ok(DataBits::Eight));
        assert!("1.25".parse::<StopBits>().is_err());
        assert!("9".parse::<DataBits>().is_err());
    }

    #[test]
    fn modes_display_as_their_tokens() {
        assert_eq!(Parity::Space.to_string(), "space");
        assert_eq!(StopBits::OneAndHalf.to_string(), "1.5");
        assert_eq!(DataBits::Five.to_string(), "5");
    }
}
