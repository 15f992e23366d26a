//! Per-frame scene list.
//!
//! Every frame the solar system is flattened into a doubly linked list of
//! [`Entity`] values that the renderer walks. Entities live in a
//! [`FrameArena`] and are only reachable through the [`FrameScope`] that
//! allocated them, so the borrow checker rejects any reference that would
//! outlive its frame:
//!
//! ```compile_fail
//! use orrery_math::{DQuat, DVec3};
//! use orrery_scene::{FrameArena, RenderableHandle};
//!
//! let mut arena = FrameArena::new();
//! let escaped = {
//!     let mut scope = arena.begin_frame();
//!     let id = scope.alloc(DVec3::ZERO, DQuat::IDENTITY, 1.0, RenderableHandle::new(0));
//!     scope.get(id)
//! };
//! println!("{:?}", escaped);
//! ```
//!
//! Only one frame can be open at a time:
//!
//! ```compile_fail
//! use orrery_scene::FrameArena;
//!
//! let mut arena = FrameArena::new();
//! let first = arena.begin_frame();
//! let second = arena.begin_frame();
//! drop(first);
//! ```

mod arena;
mod entity;
mod list;

pub use arena::{FrameArena, FrameScope};
pub use entity::{Entity, EntityId, RenderableHandle};
pub use list::{FrameList, FrameListIter, build_frame_list};
