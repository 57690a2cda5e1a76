//! tsxkit_animation - Tile animation types for Tiled tilesets
//!
//! A Tiled tile animation is an ordered list of frames, each naming a tile of
//! the same tileset and how long it stays on screen. Animations always loop.
//!
//! # Usage
//!
//! ```rust
//! use tsxkit_animation::{Frame, TileAnimation};
//!
//! let water = TileAnimation::new(vec![
//!     Frame::new(0, 800),
//!     Frame::new(105, 800),
//!     Frame::new(210, 800),
//! ]);
//!
//! assert_eq!(water.total_duration_ms(), 2400);
//! assert_eq!(water.frame_at_time(900), Some(105));
//! assert_eq!(water.frame_at_time(2400), Some(0));
//! ```

use serde::{Deserialize, Serialize};

/// One step of a tile animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Tile shown during this frame (local id within the tileset)
    pub tile_id: u32,
    /// How long the frame is shown, in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    pub fn new(tile_id: u32, duration_ms: u32) -> Self {
        Self {
            tile_id,
            duration_ms,
        }
    }
}

/// A looping frame sequence attached to a tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileAnimation {
    pub frames: Vec<Frame>,
}

impl TileAnimation {
    /// Create a new animation from a frame list
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Append a frame
    pub fn push(&mut self, tile_id: u32, duration_ms: u32) {
        self.frames.push(Frame::new(tile_id, duration_ms));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the total duration of one loop of the animation in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }

    /// Tile ids in playback order
    pub fn frame_tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.frames.iter().map(|f| f.tile_id)
    }

    /// The duration shared by every frame, if they all agree
    pub fn uniform_duration(&self) -> Option<u32> {
        let first = self.frames.first()?.duration_ms;
        self.frames
            .iter()
            .all(|f| f.duration_ms == first)
            .then_some(first)
    }

    /// Get the index of the frame shown `time_ms` after the loop started
    pub fn frame_index_at_time(&self, time_ms: u64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }

        let total_duration = self.total_duration_ms();
        if total_duration == 0 {
            return Some(0);
        }

        let mut remaining = time_ms % total_duration;
        for (index, frame) in self.frames.iter().enumerate() {
            let duration = u64::from(frame.duration_ms);
            if remaining < duration {
                return Some(index);
            }
            remaining -= duration;
        }

        // Unreachable while the durations sum to total_duration
        Some(self.frames.len() - 1)
    }

    /// Get the tile shown `time_ms` after the loop started
    pub fn frame_at_time(&self, time_ms: u64) -> Option<u32> {
        self.frame_index_at_time(time_ms)
            .map(|index| self.frames[index].tile_id)
    }
}

impl FromIterator<Frame> for TileAnimation {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
