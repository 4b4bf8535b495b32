//! Sprite size lookup.
//!
//! Attack sprites have a different footprint than movement sprites, so the
//! player resizes its hitbox from the sprite it is about to show. Behaviors
//! ask a [`SpriteMetrics`] implementation instead of touching the filesystem.

use std::path::PathBuf;

use ahash::AHashMap;
use lulu_common::Vec2;

use crate::animation::AnimationHandler;

/// Source of native sprite dimensions.
pub trait SpriteMetrics {
    /// Pixel size of `sprite`, or `None` if it cannot be determined.
    fn dimensions(&mut self, sprite: &str) -> Option<Vec2>;
}

/// Metrics that never know any sprite. Hitboxes keep their configured size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetrics;

impl SpriteMetrics for NoMetrics {
    fn dimensions(&mut self, _sprite: &str) -> Option<Vec2> {
        None
    }
}

/// Fixed table of sprite sizes.
#[derive(Debug, Clone, Default)]
pub struct FixedMetrics {
    sizes: AHashMap<String, Vec2>,
}

impl FixedMetrics {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a sprite's size.
    pub fn insert(&mut self, sprite: impl Into<String>, size: Vec2) {
        self.sizes.insert(sprite.into(), size);
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, sprite: impl Into<String>, size: Vec2) -> Self {
        self.insert(sprite, size);
        self
    }
}

impl SpriteMetrics for FixedMetrics {
    fn dimensions(&mut self, sprite: &str) -> Option<Vec2> {
        self.sizes.get(sprite).copied()
    }
}

/// Reads sizes from image headers under an asset root, caching each answer.
#[derive(Debug, Clone)]
pub struct AssetMetrics {
    root: PathBuf,
    cache: AHashMap<String, Option<Vec2>>,
}

impl AssetMetrics {
    /// Creates metrics resolving sprite identifiers relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: AHashMap::new(),
        }
    }
}

impl SpriteMetrics for AssetMetrics {
    fn dimensions(&mut self, sprite: &str) -> Option<Vec2> {
        if sprite.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.get(sprite) {
            return *cached;
        }
        let dims = AnimationHandler::sprite_dimensions(self.root.join(sprite));
        self.cache.insert(sprite.to_string(), dims);
        dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_metrics_lookup() {
        let mut metrics = FixedMetrics::new().with("sword_up.png", Vec2::new(16.0, 28.0));
        assert_eq!(metrics.dimensions("sword_up.png"), Some(Vec2::new(16.0, 28.0)));
        assert_eq!(metrics.dimensions("missing.png"), None);
    }

    #[test]
    fn test_asset_metrics_caches_missing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut metrics = AssetMetrics::new(dir.path());
        assert_eq!(metrics.dimensions("nope.png"), None);

        image::RgbaImage::new(8, 12)
            .save(dir.path().join("nope.png"))
            .expect("encode png");
        assert_eq!(metrics.dimensions("nope.png"), None);
        assert_eq!(metrics.dimensions(""), None);
    }

    #[test]
    fn test_asset_metrics_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        image::RgbaImage::new(8, 12)
            .save(dir.path().join("zol.png"))
            .expect("encode png");
        let mut metrics = AssetMetrics::new(dir.path());
        assert_eq!(metrics.dimensions("zol.png"), Some(Vec2::new(8.0, 12.0)));
    }
}
