//! Frame-scoped entity storage.

use orrery_math::{DQuat, DVec3};

use crate::entity::{Entity, EntityId, RenderableHandle};

/// Backing storage for per-frame entities.
///
/// The arena outlives every frame; its buffer is cleared, never freed, when a
/// frame ends, so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct FrameArena {
    entities: Vec<Entity>,
    frame: u64,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for `capacity` entities per frame.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            frame: 0,
        }
    }

    /// Open the next frame. Everything it allocates is released when the
    /// returned scope is dropped.
    pub fn begin_frame(&mut self) -> FrameScope<'_> {
        self.frame = self.frame.wrapping_add(1);
        self.entities.clear();
        FrameScope { arena: self }
    }

    /// Number of the most recently opened frame; 0 before the first.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Entities still stored. Always 0 outside a frame.
    pub fn live_entities(&self) -> usize {
        self.entities.len()
    }
}

/// Exclusive access to the arena for the duration of one frame.
#[derive(Debug)]
pub struct FrameScope<'a> {
    arena: &'a mut FrameArena,
}

impl FrameScope<'_> {
    pub fn frame(&self) -> u64 {
        self.arena.frame
    }

    /// Allocate an unlinked entity in this frame.
    pub fn alloc(
        &mut self,
        position: DVec3,
        orientation: DQuat,
        radius: f64,
        renderable: RenderableHandle,
    ) -> EntityId {
        let index = self.arena.entities.len() as u32;
        self.arena.entities.push(Entity {
            position,
            orientation,
            radius,
            renderable,
            prev: None,
            next: None,
        });
        EntityId {
            frame: self.arena.frame,
            index,
        }
    }

    /// Link `next` after `prev`. Both must belong to this frame.
    pub fn link(&mut self, prev: EntityId, next: EntityId) -> bool {
        if !self.owns(prev) || !self.owns(next) || prev == next {
            return false;
        }
        self.arena.entities[prev.index as usize].next = Some(next);
        self.arena.entities[next.index as usize].prev = Some(prev);
        true
    }

    /// Look up an entity of this frame. Ids from other frames give `None`.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if id.frame != self.arena.frame {
            return None;
        }
        self.arena.entities.get(id.index as usize)
    }

    pub fn len(&self) -> usize {
        self.arena.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.entities.is_empty()
    }

    pub(crate) fn entities(&self) -> &[Entity] {
        &self.arena.entities
    }

    fn owns(&self, id: EntityId) -> bool {
        id.frame == self.arena.frame && (id.index as usize) < self.arena.entities.len()
    }
}

impl Drop for FrameScope<'_> {
    fn drop(&mut self) {
        self.arena.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc_one(scope: &mut FrameScope<'_>) -> EntityId {
        scope.alloc(DVec3::X, DQuat::IDENTITY, 1.0, RenderableHandle::new(0))
    }

    #[test]
    fn test_frame_numbers_increase() {
        let mut arena = FrameArena::new();
        assert_eq!(arena.frame(), 0);
        assert_eq!(arena.begin_frame().frame(), 1);
        assert_eq!(arena.begin_frame().frame(), 2);
    }

    #[test]
    fn test_drop_releases_entities_keeps_capacity() {
        let mut arena = FrameArena::new();
        {
            let mut scope = arena.begin_frame();
            for _ in 0..64 {
                alloc_one(&mut scope);
            }
            assert_eq!(scope.len(), 64);
        }
        assert_eq!(arena.live_entities(), 0);
        assert!(arena.capacity() >= 64);
    }

    #[test]
    fn test_stale_id_rejected() {
        let mut arena = FrameArena::new();
        let old = {
            let mut scope = arena.begin_frame();
            alloc_one(&mut scope)
        };
        let mut scope = arena.begin_frame();
        let fresh = alloc_one(&mut scope);
        assert_eq!(old.index, fresh.index);
        assert!(scope.get(old).is_none());
        assert!(scope.get(fresh).is_some());
    }

    #[test]
    fn test_link_rejects_foreign_ids() {
        let mut arena = FrameArena::new();
        let old = {
            let mut scope = arena.begin_frame();
            alloc_one(&mut scope)
        };
        let mut scope = arena.begin_frame();
        let a = alloc_one(&mut scope);
        let b = alloc_one(&mut scope);
        assert!(!scope.link(old, a));
        assert!(!scope.link(a, a));
        assert!(scope.link(a, b));
        assert_eq!(scope.get(a).unwrap().next(), Some(b));
        assert_eq!(scope.get(b).unwrap().prev(), Some(a));
    }
}
