//! Wang ids: the 8-slot edge/corner signature of a tile
//!
//! Slots use Tiled's position indexing:
//!   7|0|1
//!   6|X|2
//!   5|4|3
//! - Even indices (0,2,4,6) = Edges (Top, Right, Bottom, Left)
//! - Odd indices (1,3,5,7) = Corners (TopRight, BottomRight, BottomLeft, TopLeft)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the 8 signature slots around a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WangPosition {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl WangPosition {
    /// All positions in slot order
    pub const ALL: [WangPosition; 8] = [
        WangPosition::Top,
        WangPosition::TopRight,
        WangPosition::Right,
        WangPosition::BottomRight,
        WangPosition::Bottom,
        WangPosition::BottomLeft,
        WangPosition::Left,
        WangPosition::TopLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Check if this slot is a corner (odd indices: 1,3,5,7)
    pub fn is_corner(self) -> bool {
        self.index() % 2 == 1
    }

    /// Position on the neighbor that faces this one
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % 8]
    }

    /// Compass abbreviation (N, NE, E, ...)
    pub fn compass(self) -> &'static str {
        match self {
            WangPosition::Top => "N",
            WangPosition::TopRight => "NE",
            WangPosition::Right => "E",
            WangPosition::BottomRight => "SE",
            WangPosition::Bottom => "S",
            WangPosition::BottomLeft => "SW",
            WangPosition::Left => "W",
            WangPosition::TopLeft => "NW",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WangPosition::Top => "Top Edge",
            WangPosition::TopRight => "Top-Right Corner",
            WangPosition::Right => "Right Edge",
            WangPosition::BottomRight => "Bottom-Right Corner",
            WangPosition::Bottom => "Bottom Edge",
            WangPosition::BottomLeft => "Bottom-Left Corner",
            WangPosition::Left => "Left Edge",
            WangPosition::TopLeft => "Top-Left Corner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWangIdError {
    #[error("wang id must have 8 comma-separated values, found {0}")]
    WrongLength(usize),
    #[error("invalid wang id value '{0}'")]
    InvalidValue(String),
}

/// Wang ID representing terrain colors at all 8 positions
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WangId {
    /// 0-based index into the wang set's colors per slot.
    /// None = no color (written as 0 in Tiled files)
    pub colors: [Option<usize>; 8],
}

impl WangId {
    pub const EMPTY: Self = WangId { colors: [None; 8] };

    /// Create a WangId with all positions set to one color
    pub fn filled(color: usize) -> Self {
        WangId {
            colors: [Some(color); 8],
        }
    }

    pub fn color_at(&self, position: WangPosition) -> Option<usize> {
        self.colors[position.index()]
    }

    pub fn set(&mut self, position: WangPosition, color: Option<usize>) {
        self.colors[position.index()] = color;
    }

    /// Bitmask of occupied slots, bit i = slot i
    pub fn mask(&self) -> u8 {
        self.colors
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .fold(0u8, |mask, (i, _)| mask | (1 << i))
    }

    pub fn is_empty(&self) -> bool {
        self.colors.iter().all(|c| c.is_none())
    }

    /// Highest color index referenced, if any
    pub fn max_color(&self) -> Option<usize> {
        self.colors.iter().flatten().copied().max()
    }

    pub fn has_color(&self, color: usize) -> bool {
        self.colors.contains(&Some(color))
    }

    /// The single color at every slot, for "fill" tiles
    pub fn uniform_color(&self) -> Option<usize> {
        let first = self.colors[0]?;
        self.colors
            .iter()
            .all(|c| *c == Some(first))
            .then_some(first)
    }

    /// Occupied positions in slot order
    pub fn occupied(&self) -> impl Iterator<Item = WangPosition> + '_ {
        WangPosition::ALL
            .into_iter()
            .filter(|p| self.colors[p.index()].is_some())
    }

    /// Decode the pre-1.5 Tiled encoding: one nibble per slot, slot 0 lowest
    fn from_legacy(value: u32) -> Self {
        let mut id = WangId::EMPTY;
        for (i, slot) in id.colors.iter_mut().enumerate() {
            let nibble = ((value >> (i * 4)) & 0xF) as usize;
            *slot = nibble.checked_sub(1);
        }
        id
    }
}

impl FromStr for WangId {
    type Err = ParseWangIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let value = u32::from_str_radix(hex, 16)
                .map_err(|_| ParseWangIdError::InvalidValue(s.to_string()))?;
            return Ok(WangId::from_legacy(value));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 8 {
            return Err(ParseWangIdError::WrongLength(parts.len()));
        }

        let mut id = WangId::EMPTY;
        for (slot, part) in id.colors.iter_mut().zip(parts) {
            let value: u8 = part
                .parse()
                .map_err(|_| ParseWangIdError::InvalidValue(part.to_string()))?;
            *slot = (value as usize).checked_sub(1);
        }
        Ok(id)
    }
}

impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", color.map_or(0, |c| c + 1))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_form() {
        let id: WangId = "0,0,1,1,1,0,0,0".parse().unwrap();
        assert_eq!(id.color_at(WangPosition::Top), None);
        assert_eq!(id.color_at(WangPosition::Right), Some(0));
        assert_eq!(id.color_at(WangPosition::BottomRight), Some(0));
        assert_eq!(id.color_at(WangPosition::Bottom), Some(0));
        assert_eq!(id.to_string(), "0,0,1,1,1,0,0,0");
    }

    #[test]
    fn test_parse_legacy_hex() {
        // Top edge = color 1, Bottom edge = color 2
        let id: WangId = "0x00020001".parse().unwrap();
        assert_eq!(id.color_at(WangPosition::Top), Some(0));
        assert_eq!(id.color_at(WangPosition::Bottom), Some(1));
        assert_eq!(id.mask(), 0b0001_0001);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "1,1,1".parse::<WangId>(),
            Err(ParseWangIdError::WrongLength(3))
        );
        assert!(matches!(
            "1,1,1,1,1,1,1,x".parse::<WangId>(),
            Err(ParseWangIdError::InvalidValue(_))
        ));
        assert!("1,1,1,1,1,1,1,256".parse::<WangId>().is_err());
    }

    #[test]
    fn test_mask_and_uniform() {
        let full = WangId::filled(0);
        assert_eq!(full.mask(), 0xFF);
        assert_eq!(full.uniform_color(), Some(0));

        let id: WangId = "1,0,0,0,1,1,1,1".parse().unwrap();
        assert_eq!(id.mask(), 0b1111_0001);
        assert_eq!(id.uniform_color(), None);
        assert_eq!(id.max_color(), Some(0));
        assert!(id.has_color(0));
        assert!(!id.has_color(1));
        assert!(WangId::EMPTY.is_empty());
    }

    #[test]
    fn test_positions() {
        assert_eq!(WangPosition::Top.opposite(), WangPosition::Bottom);
        assert_eq!(WangPosition::TopRight.opposite(), WangPosition::BottomLeft);
        assert!(WangPosition::TopLeft.is_corner());
        assert!(!WangPosition::Left.is_corner());
        assert_eq!(WangPosition::from_index(5), Some(WangPosition::BottomLeft));
        assert_eq!(WangPosition::from_index(8), None);
        assert_eq!(WangPosition::BottomLeft.compass(), "SW");
    }

    #[test]
    fn test_occupied_order() {
        let id: WangId = "0,0,1,1,1,0,0,0".parse().unwrap();
        let occupied: Vec<_> = id.occupied().collect();
        assert_eq!(
            occupied,
            vec![
                WangPosition::Right,
                WangPosition::BottomRight,
                WangPosition::Bottom
            ]
        );
    }
}
