//! Viseme alphabet.
//!
//! Cues arrive already classified into a fixed nine-symbol alphabet: eight
//! articulation classes (`A`..`H`) and a silence class (`X`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A mouth-shape class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viseme {
    /// Closed lips (P, B, M).
    A,
    /// Lightly open.
    B,
    /// Half open.
    C,
    /// Wide open (AA).
    D,
    /// Spread (EH, EE).
    E,
    /// Upper teeth on lower lip (F, V).
    F,
    /// Rounded (O).
    G,
    /// Tightly rounded (U).
    H,
    /// Silence / rest.
    #[default]
    X,
}

impl Viseme {
    /// Every symbol, in table order.
    pub const ALL: [Viseme; 9] = [
        Viseme::A,
        Viseme::B,
        Viseme::C,
        Viseme::D,
        Viseme::E,
        Viseme::F,
        Viseme::G,
        Viseme::H,
        Viseme::X,
    ];

    /// The silence class used whenever no cue is active.
    pub const SILENCE: Viseme = Viseme::X;

    /// Parses a symbol, case-insensitively. Returns `None` for anything outside
    /// the alphabet.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(match c.to_ascii_uppercase() {
            'A' => Viseme::A,
            'B' => Viseme::B,
            'C' => Viseme::C,
            'D' => Viseme::D,
            'E' => Viseme::E,
            'F' => Viseme::F,
            'G' => Viseme::G,
            'H' => Viseme::H,
            'X' => Viseme::X,
            _ => return None,
        })
    }

    /// Parses a symbol, mapping unknown input to [`Viseme::SILENCE`].
    #[must_use]
    pub fn from_symbol_lossy(symbol: &str) -> Self {
        Self::from_symbol(symbol).unwrap_or_else(|| {
            log::debug!("Unknown viseme symbol {symbol:?}, treating as silence");
            Self::SILENCE
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Viseme::A => "A",
            Viseme::B => "B",
            Viseme::C => "C",
            Viseme::D => "D",
            Viseme::E => "E",
            Viseme::F => "F",
            Viseme::G => "G",
            Viseme::H => "H",
            Viseme::X => "X",
        }
    }

    /// Position in [`Viseme::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub fn is_silence(self) -> bool {
        self == Self::SILENCE
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by the strict [`FromStr`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownViseme(pub String);

impl fmt::Display for UnknownViseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown viseme symbol: {:?}", self.0)
    }
}

impl std::error::Error for UnknownViseme {}

impl FromStr for Viseme {
    type Err = UnknownViseme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| UnknownViseme(s.to_string()))
    }
}

impl Serialize for Viseme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown symbols deserialize as silence.
impl<'de> Deserialize<'de> for Viseme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_symbol_lossy(&raw))
    }
}
