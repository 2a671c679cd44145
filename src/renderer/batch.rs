//! Render batch: a slot arena of quads drawn with a single call
//!
//! Renderables register a quad when they are created and release it when
//! they are deleted. Slots are recycled through a free list, so insert and
//! remove are O(1) and keys are generation-checked against reuse.

use glam::Vec2;

use super::vertex::{Vertex, colors};

/// Vertices emitted per quad (two triangles)
pub const VERTICES_PER_QUAD: usize = 6;

/// Handle to a quad stored in a [`RenderBatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchKey {
    index: u32,
    generation: u32,
}

/// Axis-aligned quad in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Bottom-left corner
    pub origin: Vec2,
    pub size: Vec2,
    /// Normalized RGBA (alpha carries opacity)
    pub color: [f32; 4],
    /// Round soft-edged falloff (sprites) instead of a solid fill
    pub soft: bool,
}

impl Quad {
    pub fn new(origin: Vec2, size: Vec2, soft: bool) -> Self {
        Self {
            origin,
            size,
            color: colors::WHITE,
            soft,
        }
    }

    /// Two counter-clockwise triangles covering the quad
    pub fn vertices(&self) -> [Vertex; VERTICES_PER_QUAD] {
        let min = self.origin;
        let max = self.origin + self.size;
        let (l0, l1, l2, l3) = if self.soft {
            ([-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0])
        } else {
            ([0.0; 2], [0.0; 2], [0.0; 2], [0.0; 2])
        };
        let c = self.color;

        let v0 = Vertex::new(min.x, min.y, l0, c);
        let v1 = Vertex::new(max.x, min.y, l1, c);
        let v2 = Vertex::new(max.x, max.y, l2, c);
        let v3 = Vertex::new(min.x, max.y, l3, c);

        [v0, v1, v2, v0, v2, v3]
    }
}

/// Backend that receives the aggregated vertex list of a batch
pub trait DrawTarget {
    fn draw_vertices(&mut self, vertices: &[Vertex]);
}

/// Counts draw calls and vertices; useful for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub vertices: usize,
}

impl DrawTarget for FrameStats {
    fn draw_vertices(&mut self, vertices: &[Vertex]) {
        self.draw_calls += 1;
        self.vertices = vertices.len();
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    quad: Option<Quad>,
}

/// Aggregates quads so any number of renderables costs one draw
#[derive(Debug, Default)]
pub struct RenderBatch {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    /// Reused vertex storage for `draw`
    scratch: Vec<Vertex>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quad, reusing a free slot when one exists
    pub fn insert(&mut self, quad: Quad) -> BatchKey {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.quad = Some(quad);
            return BatchKey {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            quad: Some(quad),
        });
        BatchKey {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, key: BatchKey) -> Option<&Quad> {
        self.slots
            .get(key.index as usize)
            .filter(|s| s.generation == key.generation)
            .and_then(|s| s.quad.as_ref())
    }

    pub fn get_mut(&mut self, key: BatchKey) -> Option<&mut Quad> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|s| s.generation == key.generation)
            .and_then(|s| s.quad.as_mut())
    }

    /// Release a quad. Stale keys are ignored.
    pub fn remove(&mut self, key: BatchKey) -> Option<Quad> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let quad = slot.quad.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.live -= 1;
        Some(quad)
    }

    /// Number of registered quads
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn vertex_count(&self) -> usize {
        self.live * VERTICES_PER_QUAD
    }

    /// Rebuild the aggregated vertex list in slot order
    pub fn build_vertices(&mut self) -> &[Vertex] {
        let count = self.vertex_count();
        self.scratch.clear();
        self.scratch.reserve(count);
        for quad in self.slots.iter().filter_map(|s| s.quad.as_ref()) {
            self.scratch.extend_from_slice(&quad.vertices());
        }
        &self.scratch
    }

    /// Issue exactly one draw call for every registered quad
    pub fn draw<T: DrawTarget + ?Sized>(&mut self, target: &mut T) {
        let vertices = self.build_vertices();
        target.draw_vertices(vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32) -> Quad {
        Quad::new(Vec2::new(x, 0.0), Vec2::splat(2.0), false)
    }

    #[test]
    fn test_insert_remove_reuses_slots() {
        let mut batch = RenderBatch::new();
        let a = batch.insert(quad_at(0.0));
        let b = batch.insert(quad_at(1.0));
        assert_eq!(batch.len(), 2);

        assert!(batch.remove(a).is_some());
        assert_eq!(batch.len(), 1);
        assert!(batch.get(a).is_none());

        // Slot is recycled with a new generation
        let c = batch.insert(quad_at(2.0));
        assert_ne!(a, c);
        assert!(batch.get(a).is_none());
        assert_eq!(batch.get(c).map(|q| q.origin.x), Some(2.0));
        assert_eq!(batch.get(b).map(|q| q.origin.x), Some(1.0));
    }

    #[test]
    fn test_stale_remove_is_ignored() {
        let mut batch = RenderBatch::new();
        let a = batch.insert(quad_at(0.0));
        assert!(batch.remove(a).is_some());
        assert!(batch.remove(a).is_none());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_draw_is_single_call() {
        let mut batch = RenderBatch::new();
        for i in 0..50 {
            batch.insert(quad_at(i as f32));
        }
        let mut stats = FrameStats::default();
        batch.draw(&mut stats);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.vertices, 50 * VERTICES_PER_QUAD);
    }

    #[test]
    fn test_quad_vertices() {
        let mut quad = Quad::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), true);
        quad.color = [0.5, 0.25, 1.0, 0.75];
        let v = quad.vertices();
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[2].position, [14.0, 26.0]);
        assert_eq!(v[5].position, [10.0, 26.0]);
        assert_eq!(v[1].local, [1.0, -1.0]);
        assert!(v.iter().all(|vx| vx.color == [0.5, 0.25, 1.0, 0.75]));

        let solid = Quad::new(Vec2::ZERO, Vec2::ONE, false);
        assert!(solid.vertices().iter().all(|vx| vx.local == [0.0, 0.0]));
    }
}
