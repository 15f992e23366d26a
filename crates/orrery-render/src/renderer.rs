//! Frame rendering: uploads meshes once, then walks each frame's entity list.

use std::ops::Range;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use orrery_mesh::Mesh;
use orrery_scene::{FrameList, RenderableHandle};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::buffer::{InstanceBuffer, InstanceRaw, MeshBuffer};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
use crate::light::Light;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::phong_pipeline::{FrameUniform, PhongPipeline};
use crate::shader::ShaderError;

/// Fatal renderer start-up failures.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error(transparent)]
    Context(#[from] RenderContextError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// How bodies are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub clear_color: wgpu::Color,
    /// Physical radii are multiplied by this before drawing.
    pub body_scale: f64,
    /// Bodies are never drawn smaller than this radius, metres.
    pub min_display_radius: f64,
    /// Extra factor for the mesh itself, applied after the clamp.
    pub mesh_scale: f64,
    pub wireframe: bool,
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: crate::pass::CORNFLOWER_BLUE,
            body_scale: 30.0,
            min_display_radius: 1.5e9,
            mesh_scale: 1.0,
            wireframe: false,
            vsync: true,
        }
    }
}

impl RenderSettings {
    /// Radius a body of physical `radius` is drawn with.
    pub fn display_radius(&self, radius: f64) -> f64 {
        (radius * self.body_scale).max(self.min_display_radius) * self.mesh_scale
    }
}

/// Consecutive entities sharing one renderable, drawn with one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub renderable: RenderableHandle,
    pub instances: Range<u32>,
}

/// Camera-relative model matrices for every entity, in list order, grouped
/// into runs of the same renderable.
pub fn build_instances(
    list: &FrameList<'_>,
    camera: &Camera,
    settings: &RenderSettings,
    instances: &mut Vec<InstanceRaw>,
    batches: &mut Vec<DrawBatch>,
) {
    instances.clear();
    batches.clear();

    for entity in list {
        let scale = settings.display_radius(entity.radius) as f32;
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            entity.orientation.as_quat(),
            camera.relative(entity.position),
        );
        let index = instances.len() as u32;
        instances.push(InstanceRaw {
            model: model.to_cols_array_2d(),
        });

        match batches.last_mut() {
            Some(batch) if batch.renderable == entity.renderable => batch.instances.end = index + 1,
            _ => batches.push(DrawBatch {
                renderable: entity.renderable,
                instances: index..index + 1,
            }),
        }
    }
}

/// Owns the GPU context and every long-lived GPU resource.
///
/// Fields drop top to bottom, so the context goes last.
pub struct Renderer {
    renderables: Vec<MeshBuffer>,
    instances: InstanceBuffer,
    instance_scratch: Vec<InstanceRaw>,
    batches: Vec<DrawBatch>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    phong: PhongPipeline,
    depth: DepthBuffer,
    settings: RenderSettings,
    wireframe: bool,
    context: RenderContext,
}

impl Renderer {
    /// Create the GPU context for `window` and build the Phong pipeline.
    pub fn new(window: Arc<Window>, settings: RenderSettings) -> Result<Self, RendererError> {
        let context = init_render_context_blocking(window, settings.vsync)?;
        let (width, height) = context.size();
        let device = &context.device;

        let phong = PhongPipeline::new(
            device,
            context.surface_format,
            context.supports_wireframe(),
        )?;

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-uniform"),
            contents: bytemuck::bytes_of(&FrameUniform::new(
                &Camera::default(),
                &Light::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &phong.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let depth = DepthBuffer::new(device, width, height);
        let instances = InstanceBuffer::new(device, 16);
        let wireframe = settings.wireframe && phong.wireframe_pipeline.is_some();

        Ok(Self {
            renderables: Vec::new(),
            instances,
            instance_scratch: Vec::new(),
            batches: Vec::new(),
            frame_buffer,
            frame_bind_group,
            phong,
            depth,
            settings,
            wireframe,
            context,
        })
    }

    /// Upload `mesh` once; entities refer to it through the returned handle.
    pub fn upload_to_gpu(&mut self, mesh: &Mesh) -> RenderableHandle {
        let handle = RenderableHandle::new(self.renderables.len() as u32);
        let label = format!("renderable-{}", handle.index());
        self.renderables
            .push(MeshBuffer::upload(&self.context.device, &label, mesh));
        log::info!(
            "Uploaded renderable {} ({} vertices, {} triangles)",
            handle.index(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        handle
    }

    /// Draw one frame's entity list and present it.
    ///
    /// A timeout skips the frame; a lost surface has already been retried
    /// once by the time the error is returned.
    pub fn render(
        &mut self,
        list: &FrameList<'_>,
        camera: &Camera,
        light: &Light,
    ) -> Result<(), SurfaceError> {
        build_instances(
            list,
            camera,
            &self.settings,
            &mut self.instance_scratch,
            &mut self.batches,
        );

        let context = &self.context;
        context.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::new(camera, light)),
        );
        self.instances
            .write(&context.device, &context.queue, &self.instance_scratch);

        let surface_texture = context.get_current_texture()?;
        let mut frame = FrameEncoder::new(&context.device, context.queue.clone(), surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_color(self.settings.clear_color)
            .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
            .label("bodies");

        if let Some(mut pass) = frame.begin_render_pass(&builder) {
            let pipeline = match (&self.phong.wireframe_pipeline, self.wireframe) {
                (Some(wireframe), true) => wireframe,
                _ => &self.phong.pipeline,
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instances.buffer().slice(..));

            for batch in &self.batches {
                let Some(mesh) = self.renderables.get(batch.renderable.index() as usize) else {
                    log::warn!("Skipping unknown renderable {}", batch.renderable.index());
                    continue;
                };
                mesh.bind(&mut pass);
                pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
            }
        }

        frame.submit();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth.resize(&self.context.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    pub fn supports_wireframe(&self) -> bool {
        self.phong.wireframe_pipeline.is_some()
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Flip between filled and line rendering. Returns the new state, which
    /// stays `false` on adapters without line polygon mode.
    pub fn toggle_wireframe(&mut self) -> bool {
        if self.supports_wireframe() {
            self.wireframe = !self.wireframe;
        } else {
            log::warn!("Wireframe not supported by this adapter");
        }
        self.wireframe
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use orrery_orbit::{Body, BodyIndex, ElementSet, OrbitalElements, SolarSystem, Spin};
    use orrery_scene::{FrameArena, build_frame_list};

    fn system() -> SolarSystem {
        let circular = |r, p| OrbitalElements::new(ElementSet::circular(r, p)).unwrap();
        SolarSystem::new(vec![
            Body::new("Sun", circular(0.0, 1.0), 6.957e8),
            Body::new("Earth", circular(1.5e11, 3.15e7), 6.371e6).with_parent(BodyIndex(0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_display_radius_clamps_small_bodies() {
        let settings = RenderSettings::default();
        assert_eq!(settings.display_radius(6.957e8), 6.957e8 * 30.0);
        assert_eq!(settings.display_radius(1.0), 1.5e9);
        let doubled = RenderSettings {
            mesh_scale: 2.0,
            ..RenderSettings::default()
        };
        assert_eq!(doubled.display_radius(1.0), 3.0e9);
    }

    #[test]
    fn test_instances_are_camera_relative() {
        let system = system();
        let camera = Camera::default();
        let settings = RenderSettings::default();
        let mut arena = FrameArena::new();
        let mut scope = arena.begin_frame();
        let list = build_frame_list(&mut scope, &system, RenderableHandle::new(0));

        let mut instances = Vec::new();
        let mut batches = Vec::new();
        build_instances(&list, &camera, &settings, &mut instances, &mut batches);

        assert_eq!(instances.len(), 2);
        let sun = Mat4::from_cols_array_2d(&instances[0].model);
        let translation = sun.col(3).truncate();
        assert!((translation - Vec3::new(0.0, 0.0, -1.5e11)).length() < 1.0e4);
        let scale = sun.col(0).truncate().length();
        assert!((scale / (6.957e8 * 30.0) as f32 - 1.0).abs() < 1e-5);

        assert_eq!(
            batches,
            [DrawBatch {
                renderable: RenderableHandle::new(0),
                instances: 0..2,
            }]
        );
    }

    #[test]
    fn test_orientation_reaches_model_matrix() {
        let elements = OrbitalElements::new(ElementSet::circular(0.0, 1.0)).unwrap();
        let spinner = Body::new("Spinner", elements, 1.0e8).with_spin(Spin {
            axial_tilt: 0.0,
            rotation_period: 4.0,
        });
        let mut system = SolarSystem::new(vec![spinner]).unwrap();
        system.update(1.0);

        let camera = Camera {
            position: DVec3::new(0.0, 0.0, 1.0e10),
            ..Camera::default()
        };
        let settings = RenderSettings {
            body_scale: 1.0,
            min_display_radius: 0.0,
            ..RenderSettings::default()
        };
        let mut arena = FrameArena::new();
        let mut scope = arena.begin_frame();
        let list = build_frame_list(&mut scope, &system, RenderableHandle::new(0));
        let mut instances = Vec::new();
        let mut batches = Vec::new();
        build_instances(&list, &camera, &settings, &mut instances, &mut batches);

        // A quarter turn about +Z carries the mesh's +X onto +Y.
        let model = Mat4::from_cols_array_2d(&instances[0].model);
        let x_axis = model.transform_vector3(Vec3::X) / 1.0e8;
        assert!((x_axis - Vec3::Y).length() < 1e-5, "{x_axis}");
    }
}
