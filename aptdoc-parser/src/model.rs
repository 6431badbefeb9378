use std::fmt;

use serde::{Deserialize, Serialize};

/// Section nesting level, 1 (unstarred title) to 5 (`****`).
pub type SectionLevel = u8;

/// The deepest section level APT can express.
pub const MAX_SECTION_LEVEL: SectionLevel = 5;

/// Numbering scheme applied to a whole numbered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Numbering {
    #[default]
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl Numbering {
    /// Numbering selected by the character inside a `[[X]]` item marker.
    #[must_use]
    pub fn from_marker(marker: Option<char>) -> Self {
        match marker {
            Some('a') => Self::LowerAlpha,
            Some('A') => Self::UpperAlpha,
            Some('i') => Self::LowerRoman,
            Some('I') => Self::UpperRoman,
            _ => Self::Decimal,
        }
    }

    /// The canonical marker for this numbering.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Decimal => '1',
            Self::LowerAlpha => 'a',
            Self::UpperAlpha => 'A',
            Self::LowerRoman => 'i',
            Self::UpperRoman => 'I',
        }
    }
}

impl fmt::Display for Numbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::LowerAlpha => write!(f, "lower-alpha"),
            Self::UpperAlpha => write!(f, "upper-alpha"),
            Self::LowerRoman => write!(f, "lower-roman"),
            Self::UpperRoman => write!(f, "upper-roman"),
        }
    }
}

/// Horizontal alignment of a table column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

impl Justification {
    /// Justification for a column marker in a `*--` separator line.
    #[must_use]
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '*' => Some(Self::Center),
            '+' => Some(Self::Left),
            ':' => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub fn marker(self) -> char {
        match self {
            Self::Left => '+',
            Self::Center => '*',
            Self::Right => ':',
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
        }
    }
}
