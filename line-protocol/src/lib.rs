#![cfg_attr(not(feature = "std"), no_std)]

//! The text line protocol spoken by the theremin's sensor board.
//!
//! Each line carries one reading per distance sensor, e.g. `123a456b`, with
//! `Na` / `Nb` in place of a number when that sensor sees nothing.

mod decode;

use core::fmt;

pub use decode::decode;

/// Value reported in place of a reading when a sensor detects nothing.
pub const DEFAULT_NO_SIGNAL: i32 = 1000;

/// A single sensor field of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Absent,
    Present(i32),
}

impl Reading {
    pub fn or_no_signal(self, no_signal: i32) -> i32 {
        match self {
            Reading::Absent => no_signal,
            Reading::Present(value) => value,
        }
    }
}

/// The contents of a well formed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readings {
    pub a: Reading,
    pub b: Reading,
}

impl Readings {
    pub fn to_pair(self, no_signal: i32) -> SamplePair {
        SamplePair {
            a: self.a.or_no_signal(no_signal),
            b: self.b.or_no_signal(no_signal),
        }
    }
}

/// Formats the readings the way the sensor board sends them, without the
/// line terminator.
impl fmt::Display for Readings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Reading::Absent => f.write_str("Na")?,
            Reading::Present(value) => write!(f, "{value}a")?,
        }
        match self.b {
            Reading::Absent => f.write_str("Nb"),
            Reading::Present(value) => write!(f, "{value}b"),
        }
    }
}

/// Result of decoding one fragment of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Readings(Readings),
    Malformed,
}

/// The pair of values forwarded downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplePair {
    pub a: i32,
    pub b: i32,
}

/// Turns raw fragments into sample pairs, substituting `no_signal` for
/// absent readings and for anything that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    no_signal: i32,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(DEFAULT_NO_SIGNAL)
    }
}

impl LineParser {
    pub const fn new(no_signal: i32) -> Self {
        Self { no_signal }
    }

    pub const fn no_signal_pair(&self) -> SamplePair {
        SamplePair {
            a: self.no_signal,
            b: self.no_signal,
        }
    }

    pub fn parse(&self, fragment: &[u8]) -> SamplePair {
        match decode(fragment) {
            Line::Readings(readings) => readings.to_pair(self.no_signal),
            Line::Malformed => self.no_signal_pair(),
        }
    }
}
