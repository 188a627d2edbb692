//! Defines the `CardinalDirection` enum used to label wind directions.

use std::fmt;

/// One of the eight principal compass points.
///
/// Each label owns a 45° sector of the compass starting at its own bearing:
/// `N` covers `[0°, 45°)`, `NE` covers `[45°, 90°)`, and so on. Bearings wrap
/// modulo 360°, so `360°` maps back to `N`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const COMPASS: [CardinalDirection; 8] = [
    CardinalDirection::N,
    CardinalDirection::NE,
    CardinalDirection::E,
    CardinalDirection::SE,
    CardinalDirection::S,
    CardinalDirection::SW,
    CardinalDirection::W,
    CardinalDirection::NW,
];

impl CardinalDirection {
    /// Maps a bearing in degrees to its compass label.
    ///
    /// Returns `None` for non-finite input.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteodash::CardinalDirection;
    ///
    /// assert_eq!(CardinalDirection::from_degrees(0.0), Some(CardinalDirection::N));
    /// assert_eq!(CardinalDirection::from_degrees(225.0), Some(CardinalDirection::SW));
    /// assert_eq!(CardinalDirection::from_degrees(360.0), Some(CardinalDirection::N));
    /// ```
    pub fn from_degrees(degrees: f64) -> Option<CardinalDirection> {
        if !degrees.is_finite() {
            return None;
        }
        let sector = (degrees.rem_euclid(360.0) / 45.0).floor() as usize % COMPASS.len();
        Some(COMPASS[sector])
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
