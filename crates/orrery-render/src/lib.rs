//! wgpu renderer for the orrery: GPU context, Phong pipeline and camera.
//!
//! Meshes are uploaded once with [`Renderer::upload_to_gpu`]; each frame
//! [`Renderer::render`] walks the frame's entity list and draws every entity
//! as an instance of its renderable, positioned relative to the camera.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod light;
pub mod pass;
pub mod phong_pipeline;
pub mod renderer;
pub mod shader;

pub use buffer::{InstanceBuffer, InstanceRaw, MeshBuffer, VertexPositionNormal};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use light::Light;
pub use pass::{CORNFLOWER_BLUE, FrameEncoder, RenderPassBuilder};
pub use phong_pipeline::{FrameUniform, PHONG_SHADER_SOURCE, PhongPipeline};
pub use renderer::{DrawBatch, RenderSettings, Renderer, RendererError, build_instances};
pub use shader::{ShaderError, create_shader_module, validate_wgsl};
