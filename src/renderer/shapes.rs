//! Renderable primitives a particle can drive
//!
//! Particle lifecycle code only talks to [`Renderable`]; which primitive is
//! created is decided by [`RenderableKind`] at emission time.

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::batch::{BatchKey, Quad, RenderBatch};

/// Something a particle pushes its position, color and opacity into.
///
/// Colors and opacity are on the 0-255 scale.
pub trait Renderable: fmt::Debug {
    /// Key of the quad this renderable owns, `None` once deleted
    fn key(&self) -> Option<BatchKey>;

    /// Move to `(x, y)`
    fn update(&mut self, batch: &mut RenderBatch, x: f32, y: f32);

    /// Release the quad from the batch. Calling it twice is harmless.
    fn delete(&mut self, batch: &mut RenderBatch);

    fn set_color(&mut self, batch: &mut RenderBatch, color: Vec3) {
        if let Some(quad) = self.key().and_then(|k| batch.get_mut(k)) {
            let c = (color / 255.0).clamp(Vec3::ZERO, Vec3::ONE);
            quad.color[0] = c.x;
            quad.color[1] = c.y;
            quad.color[2] = c.z;
        }
    }

    fn set_opacity(&mut self, batch: &mut RenderBatch, opacity: f32) {
        if let Some(quad) = self.key().and_then(|k| batch.get_mut(k)) {
            quad.color[3] = (opacity / 255.0).clamp(0.0, 1.0);
        }
    }

    fn is_deleted(&self) -> bool {
        self.key().is_none()
    }
}

/// Image descriptor for sprite particles.
///
/// The anchor is the offset of the particle position from the image's
/// bottom-left corner (0, 0 means the position is the bottom-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteImage {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub anchor_x: f32,
    #[serde(default)]
    pub anchor_y: f32,
}

impl SpriteImage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }

    /// Anchor the image at its center
    pub fn centered(mut self) -> Self {
        self.anchor_x = self.width / 2.0;
        self.anchor_y = self.height / 2.0;
        self
    }
}

impl Default for SpriteImage {
    fn default() -> Self {
        Self::new(8.0, 8.0)
    }
}

/// Image-backed sprite, drawn as a soft round quad
#[derive(Debug)]
pub struct Sprite {
    image: SpriteImage,
    key: Option<BatchKey>,
}

impl Sprite {
    pub fn new(image: SpriteImage, x: f32, y: f32, batch: &mut RenderBatch) -> Self {
        let origin = Vec2::new(x - image.anchor_x, y - image.anchor_y);
        let key = batch.insert(Quad::new(
            origin,
            Vec2::new(image.width, image.height),
            true,
        ));
        Self {
            image,
            key: Some(key),
        }
    }

    pub fn image(&self) -> SpriteImage {
        self.image
    }
}

impl Renderable for Sprite {
    fn key(&self) -> Option<BatchKey> {
        self.key
    }

    fn delete(&mut self, batch: &mut RenderBatch) {
        if let Some(key) = self.key.take() {
            batch.remove(key);
        }
    }

    fn update(&mut self, batch: &mut RenderBatch, x: f32, y: f32) {
        if let Some(quad) = self.key.and_then(|k| batch.get_mut(k)) {
            quad.origin = Vec2::new(x - self.image.anchor_x, y - self.image.anchor_y);
        }
    }
}

/// Solid axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug)]
pub struct Rectangle {
    width: f32,
    height: f32,
    key: Option<BatchKey>,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, batch: &mut RenderBatch) -> Self {
        let key = batch.insert(Quad::new(
            Vec2::new(x, y),
            Vec2::new(width, height),
            false,
        ));
        Self {
            width,
            height,
            key: Some(key),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Renderable for Rectangle {
    fn key(&self) -> Option<BatchKey> {
        self.key
    }

    fn delete(&mut self, batch: &mut RenderBatch) {
        if let Some(key) = self.key.take() {
            batch.remove(key);
        }
    }

    fn update(&mut self, batch: &mut RenderBatch, x: f32, y: f32) {
        if let Some(quad) = self.key.and_then(|k| batch.get_mut(k)) {
            quad.origin = Vec2::new(x, y);
        }
    }
}

/// Which primitive an emission creates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderableKind {
    Sprite(SpriteImage),
    Rect { width: f32, height: f32 },
}

impl Default for RenderableKind {
    fn default() -> Self {
        RenderableKind::Sprite(SpriteImage::default())
    }
}

impl RenderableKind {
    /// Create a renderable at `(x, y)` registered with `batch`
    pub fn create(&self, x: f32, y: f32, batch: &mut RenderBatch) -> Box<dyn Renderable> {
        match *self {
            RenderableKind::Sprite(image) => Box::new(Sprite::new(image, x, y, batch)),
            RenderableKind::Rect { width, height } => {
                Box::new(Rectangle::new(x, y, width, height, batch))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::VERTICES_PER_QUAD;

    #[test]
    fn test_sprite_anchor_offsets_quad() {
        let mut batch = RenderBatch::new();
        let image = SpriteImage::new(10.0, 6.0).centered();
        let mut sprite = Sprite::new(image, 100.0, 50.0, &mut batch);
        let key = sprite.key().unwrap();
        assert_eq!(batch.get(key).unwrap().origin, Vec2::new(95.0, 47.0));
        assert!(batch.get(key).unwrap().soft);

        sprite.update(&mut batch, 0.0, 0.0);
        assert_eq!(batch.get(key).unwrap().origin, Vec2::new(-5.0, -3.0));
    }

    #[test]
    fn test_color_and_opacity_normalized() {
        let mut batch = RenderBatch::new();
        let mut rect = Rectangle::new(0.0, 0.0, 5.0, 5.0, &mut batch);
        rect.set_color(&mut batch, Vec3::new(255.0, 0.0, 51.0));
        rect.set_opacity(&mut batch, 127.5);
        let quad = batch.get(rect.key().unwrap()).unwrap();
        assert_eq!(quad.color[0], 1.0);
        assert_eq!(quad.color[1], 0.0);
        assert!((quad.color[2] - 0.2).abs() < 1e-6);
        assert!((quad.color[3] - 0.5).abs() < 1e-6);
        assert!(!quad.soft);
    }

    #[test]
    fn test_delete_releases_quad_once() {
        let mut batch = RenderBatch::new();
        let mut sprite: Box<dyn Renderable> =
            RenderableKind::default().create(1.0, 2.0, &mut batch);
        assert_eq!(batch.len(), 1);
        sprite.delete(&mut batch);
        assert!(sprite.is_deleted());
        assert_eq!(batch.len(), 0);
        sprite.delete(&mut batch);
        assert_eq!(batch.len(), 0);
        // Updates after delete are ignored
        sprite.update(&mut batch, 5.0, 5.0);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_deleted_slot_is_reused_not_drawn() {
        let mut batch = RenderBatch::new();
        let mut first = RenderableKind::default().create(0.0, 0.0, &mut batch);
        let old_key = first.key().unwrap();
        first.delete(&mut batch);

        let second = RenderableKind::default().create(1.0, 1.0, &mut batch);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.vertex_count(), VERTICES_PER_QUAD);
        assert!(batch.get(old_key).is_none());
        assert!(batch.get(second.key().unwrap()).is_some());
    }

    #[test]
    fn test_kind_creates_matching_primitive() {
        let mut batch = RenderBatch::new();
        let rect = RenderableKind::Rect {
            width: 3.0,
            height: 4.0,
        }
        .create(7.0, 8.0, &mut batch);
        let quad = batch.get(rect.key().unwrap()).unwrap();
        assert_eq!(quad.origin, Vec2::new(7.0, 8.0));
        assert_eq!(quad.size, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_kind_from_json() {
        let kind: RenderableKind =
            serde_json::from_str(r#"{"kind": "rect", "width": 5.0, "height": 5.0}"#).unwrap();
        assert_eq!(
            kind,
            RenderableKind::Rect {
                width: 5.0,
                height: 5.0
            }
        );
        let kind: RenderableKind =
            serde_json::from_str(r#"{"kind": "sprite", "width": 16.0, "height": 16.0}"#).unwrap();
        assert_eq!(kind, RenderableKind::Sprite(SpriteImage::new(16.0, 16.0)));
    }
}
