//! Event type enum as the single source of truth for persisted type codes.
//!
//! Each variant maps to a stable integer code that is written to storage.
//! Codes are never renumbered and retired codes are never reused; a new kind
//! of event gets the next unused code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    WalkBegin,
    WalkEnd,
    Meal,
    Snack,
    Pee,
    Poop,
}

impl EventType {
    /// Every event type, in code order.
    pub const ALL: [Self; 6] = [
        Self::WalkBegin,
        Self::WalkEnd,
        Self::Meal,
        Self::Snack,
        Self::Pee,
        Self::Poop,
    ];

    /// The two types that open and close a walk.
    pub const WALK_BOUNDARIES: [Self; 2] = [Self::WalkBegin, Self::WalkEnd];

    /// Stable integer code stored in the database.
    pub const fn code(self) -> i32 {
        match self {
            Self::WalkBegin => 0,
            Self::WalkEnd => 1,
            Self::Meal => 2,
            Self::Snack => 3,
            Self::Pee => 4,
            Self::Poop => 5,
        }
    }

    /// Looks up the type for a stored code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::WalkBegin),
            1 => Some(Self::WalkEnd),
            2 => Some(Self::Meal),
            3 => Some(Self::Snack),
            4 => Some(Self::Pee),
            5 => Some(Self::Poop),
            _ => None,
        }
    }

    /// Machine-readable name used on the command line and in JSON.
    pub const fn name(self) -> &'static str {
        match self {
            Self::WalkBegin => "walk_begin",
            Self::WalkEnd => "walk_end",
            Self::Meal => "meal",
            Self::Snack => "snack",
            Self::Pee => "pee",
            Self::Poop => "poop",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::WalkBegin => "Walk Began",
            Self::WalkEnd => "Walk Ended",
            Self::Meal => "Meal",
            Self::Snack => "Snack",
            Self::Pee => "Pee",
            Self::Poop => "Poop",
        }
    }

    /// Short pictorial glyph shown on quick-action buttons and list rows.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::WalkBegin => "🏃🏼",
            Self::WalkEnd => "🏡",
            Self::Meal => "🍔",
            Self::Snack => "🍌",
            Self::Pee => "🚽",
            Self::Poop => "💩",
        }
    }

    /// Theme color for this type.
    pub const fn color(self) -> Rgb {
        match self {
            Self::WalkBegin => Rgb::new(0x1b, 0x93, 0xd4),
            Self::WalkEnd => Rgb::new(0x3a, 0x6e, 0xa5),
            Self::Meal => Rgb::new(0xe0, 0x7a, 0x2f),
            Self::Snack => Rgb::new(0xe8, 0xc5, 0x47),
            Self::Pee => Rgb::new(0x5f, 0xb7, 0x60),
            Self::Poop => Rgb::new(0x8b, 0x5a, 0x2b),
        }
    }

    /// Whether this type opens or closes a walk.
    pub const fn is_walk_boundary(self) -> bool {
        matches!(self, Self::WalkBegin | Self::WalkEnd)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event type names.
#[derive(Debug, Clone)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
