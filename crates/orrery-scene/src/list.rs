//! The ordered entity list handed to the renderer.

use orrery_orbit::SolarSystem;
use tracing::trace;

use crate::arena::FrameScope;
use crate::entity::{Entity, EntityId, RenderableHandle};

/// Doubly linked list of this frame's entities, in body load order.
///
/// Borrows the [`FrameScope`] it was built in and cannot outlive it.
#[derive(Clone, Copy, Debug)]
pub struct FrameList<'s> {
    entities: &'s [Entity],
    frame: u64,
    head: Option<EntityId>,
    tail: Option<EntityId>,
    len: usize,
}

impl<'s> FrameList<'s> {
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<EntityId> {
        self.head
    }

    pub fn tail(&self) -> Option<EntityId> {
        self.tail
    }

    /// Resolve `id`, rejecting ids from any other frame.
    pub fn get(&self, id: EntityId) -> Option<&'s Entity> {
        if id.frame != self.frame {
            return None;
        }
        self.entities.get(id.index as usize)
    }

    /// Walk the list from head to tail.
    pub fn iter(&self) -> FrameListIter<'s> {
        FrameListIter {
            list: *self,
            cursor: self.head,
        }
    }
}

impl<'s> IntoIterator for &FrameList<'s> {
    type Item = &'s Entity;
    type IntoIter = FrameListIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Follows `next` links from the head of a [`FrameList`].
#[derive(Clone, Debug)]
pub struct FrameListIter<'s> {
    list: FrameList<'s>,
    cursor: Option<EntityId>,
}

impl<'s> Iterator for FrameListIter<'s> {
    type Item = &'s Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.list.get(self.cursor?)?;
        self.cursor = entity.next;
        Some(entity)
    }
}

/// Allocate one entity per body, in body order, and link them.
///
/// Every entity shares `renderable`; positions, orientations and radii are
/// taken from the system's last update.
pub fn build_frame_list<'s>(
    scope: &'s mut FrameScope<'_>,
    system: &SolarSystem,
    renderable: RenderableHandle,
) -> FrameList<'s> {
    let mut head = None;
    let mut tail: Option<EntityId> = None;

    for body in system.bodies() {
        let id = scope.alloc(
            body.position(),
            body.orientation(),
            body.radius(),
            renderable,
        );
        match tail {
            Some(prev) => {
                let linked = scope.link(prev, id);
                debug_assert!(linked);
            }
            None => head = Some(id),
        }
        tail = Some(id);
    }

    trace!(frame = scope.frame(), entities = system.len(), "Built frame list");

    FrameList {
        frame: scope.frame(),
        entities: scope.entities(),
        head,
        tail,
        len: system.len(),
    }
}
