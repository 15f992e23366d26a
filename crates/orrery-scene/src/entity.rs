use orrery_math::{DQuat, DVec3};

/// Non-owning reference to a renderable held by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderableHandle(u32);

impl RenderableHandle {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Identifies an entity within the frame that allocated it.
///
/// Ids carry their frame number; lookups in any other frame return `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub(crate) frame: u64,
    pub(crate) index: u32,
}

impl EntityId {
    /// Frame number of the scope that allocated this entity.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Transient draw record for one body.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Global position in metres.
    pub position: DVec3,
    pub orientation: DQuat,
    /// Physical radius in metres.
    pub radius: f64,
    pub renderable: RenderableHandle,
    pub(crate) prev: Option<EntityId>,
    pub(crate) next: Option<EntityId>,
}

impl Entity {
    pub fn prev(&self) -> Option<EntityId> {
        self.prev
    }

    pub fn next(&self) -> Option<EntityId> {
        self.next
    }
}
