// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node appearance palette and the cyclic index into it.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// A visual attachment for a node mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    /// Flat color as 0xRRGGBB
    Color {
        /// Packed RGB value
        rgb: u32,
    },
    /// Image texture loaded by the renderer
    Texture {
        /// Texture path relative to the asset root
        path: String,
    },
}

impl Appearance {
    /// Flat color appearance
    pub fn color(rgb: u32) -> Self {
        Self::Color { rgb }
    }

    /// Texture appearance
    pub fn texture(path: impl Into<String>) -> Self {
        Self::Texture { path: path.into() }
    }
}

/// Fixed, non-empty list of appearances a node cycles through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<Appearance>,
}

impl Palette {
    /// Create a palette; returns `None` when `entries` is empty
    pub fn new(entries: Vec<Appearance>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// Number of entries (K)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Palettes are never empty once constructed, but deserialized ones may be
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Palette size as a non-zero count, if the palette is usable
    pub fn size(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.entries.len())
    }

    /// Resolve an index into an appearance
    pub fn get(&self, index: AppearanceIndex) -> Option<&Appearance> {
        self.entries.get(index.value())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: vec![
                Appearance::color(0x1987f8),
                Appearance::color(0xe9533b),
                Appearance::color(0x26ebaf),
                Appearance::texture("stainless-steel.jpg"),
                Appearance::texture("lava.jpg"),
            ],
        }
    }
}

/// Index into a [`Palette`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppearanceIndex(usize);

impl AppearanceIndex {
    /// Create an index, wrapping it into `0..palette_size`
    pub fn new(index: usize, palette_size: NonZeroUsize) -> Self {
        Self(index % palette_size.get())
    }

    /// Raw index value
    pub fn value(self) -> usize {
        self.0
    }

    /// Next index in the cycle, wrapping at `palette_size`
    pub fn next(self, palette_size: NonZeroUsize) -> Self {
        Self((self.0 + 1) % palette_size.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(
            palette.get(AppearanceIndex::default()),
            Some(&Appearance::color(0x1987f8))
        );
        assert_eq!(
            palette.get(AppearanceIndex::new(4, k(5))),
            Some(&Appearance::texture("lava.jpg"))
        );
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(Palette::new(Vec::new()).is_none());
    }

    #[test]
    fn test_index_wraps() {
        let last = AppearanceIndex::new(4, k(5));
        assert_eq!(last.next(k(5)).value(), 0);
        assert_eq!(AppearanceIndex::new(7, k(5)).value(), 2);
        assert_eq!(AppearanceIndex::default().next(k(1)).value(), 0);
    }
}
