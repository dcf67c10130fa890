//! Shelf Position
//!
//! Slot labels for the 7-column x 5-row shelf grid. The middle three
//! columns (C, D, E) only exist at rows 4 and 5, leaving 26 usable slots.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Shelf column, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::A,
        Column::B,
        Column::C,
        Column::D,
        Column::E,
        Column::F,
        Column::G,
    ];

    pub fn as_char(&self) -> char {
        match self {
            Column::A => 'A',
            Column::B => 'B',
            Column::C => 'C',
            Column::D => 'D',
            Column::E => 'E',
            Column::F => 'F',
            Column::G => 'G',
        }
    }

    fn from_char(c: char) -> Option<Column> {
        match c.to_ascii_uppercase() {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            'D' => Some(Column::D),
            'E' => Some(Column::E),
            'F' => Some(Column::F),
            'G' => Some(Column::G),
            _ => None,
        }
    }

    /// Rows that physically exist in this column
    pub fn rows(&self) -> std::ops::RangeInclusive<u8> {
        match self {
            Column::C | Column::D | Column::E => 4..=5,
            _ => 1..=5,
        }
    }
}

/// A slot on the shelf grid, e.g. `C4`
///
/// Serialized as the bare label string, matching the stored column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    column: Column,
    row: u8,
}

impl Position {
    /// Number of usable slots on the shelf
    pub const CAPACITY: usize = 26;

    /// Build a position, rejecting rows the column does not have
    pub fn new(column: Column, row: u8) -> Option<Position> {
        if column.rows().contains(&row) {
            Some(Position { column, row })
        } else {
            None
        }
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// Every slot in display order (down each column, left to right)
    pub fn all() -> impl Iterator<Item = Position> {
        Column::ALL
            .into_iter()
            .flat_map(|column| column.rows().map(move |row| Position { column, row }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column.as_char(), self.row)
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let invalid = || DomainError::InvalidInput(format!("invalid shelf position: {}", s));

        let mut chars = label.chars();
        let (col, row) = match (chars.next(), chars.next(), chars.next()) {
            (Some(col), Some(row), None) => (col, row),
            _ => return Err(invalid()),
        };
        let column = Column::from_char(col).ok_or_else(invalid)?;
        let row = row.to_digit(10).ok_or_else(invalid)? as u8;
        Position::new(column, row).ok_or_else(invalid)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}
