//! Phong pipeline: one frame uniform at group 0, mesh vertices in slot 0 and
//! per-body model matrices in slot 1.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::buffer::{InstanceRaw, VertexPositionNormal};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::light::Light;
use crate::shader::{ShaderError, create_shader_module};

/// WGSL source of the Phong shader.
pub const PHONG_SHADER_SOURCE: &str = include_str!("shaders/phong.wgsl");

/// Per-frame uniform matching `FrameUniform` in `phong.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// rgb: specular colour, w: shininess.
    pub specular: [f32; 4],
}

impl FrameUniform {
    /// Camera matrices and the light, rebased to the camera position.
    pub fn new(camera: &Camera, light: &Light) -> Self {
        let view_proj: Mat4 = camera.view_projection_matrix();
        let light_position = camera.relative(light.position);
        let [sr, sg, sb] = light.specular;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_position: light_position.extend(1.0).to_array(),
            ambient: rgb_to_vec4(light.ambient),
            diffuse: rgb_to_vec4(light.diffuse),
            specular: [sr, sg, sb, light.shininess],
        }
    }
}

fn rgb_to_vec4([r, g, b]: [f32; 3]) -> [f32; 4] {
    [r, g, b, 1.0]
}

/// Filled pipeline plus, where supported, a line-mode twin for wireframes.
pub struct PhongPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub wireframe_pipeline: Option<wgpu::RenderPipeline>,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
}

impl PhongPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        wireframe_supported: bool,
    ) -> Result<Self, ShaderError> {
        let shader = create_shader_module(device, "phong", PHONG_SHADER_SOURCE)?;

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phong-frame-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<FrameUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            immediate_size: 0,
        });

        let build = |label: &str, polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[VertexPositionNormal::layout(), InstanceRaw::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: match polygon_mode {
                        wgpu::PolygonMode::Fill => Some(wgpu::Face::Back),
                        _ => None,
                    },
                    unclipped_depth: false,
                    polygon_mode,
                    conservative: false,
                },
                depth_stencil: Some(DepthBuffer::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let pipeline = build("phong-pipeline", wgpu::PolygonMode::Fill);
        let wireframe_pipeline =
            wireframe_supported.then(|| build("phong-wireframe-pipeline", wgpu::PolygonMode::Line));

        Ok(Self {
            pipeline,
            wireframe_pipeline,
            frame_bind_group_layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::validate_wgsl;
    use glam::DVec3;

    #[test]
    fn test_phong_shader_validates() {
        let module = validate_wgsl("phong", PHONG_SHADER_SOURCE).unwrap();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn test_frame_uniform_size_matches_shader() {
        // mat4x4 + four vec4
        assert_eq!(std::mem::size_of::<FrameUniform>(), 128);
    }

    #[test]
    fn test_frame_uniform_rebases_light() {
        let camera = Camera {
            position: DVec3::new(0.0, 0.0, 1.0e11),
            ..Camera::default()
        };
        let uniform = FrameUniform::new(&camera, &Light::default());
        assert_eq!(uniform.light_position, [0.0, 0.0, -1.0e11, 1.0]);
        assert!((uniform.specular[3] - 11.264).abs() < 1e-4);
        assert_eq!(uniform.ambient[3], 1.0);
    }

    #[test]
    fn test_pipeline_builds_on_device() {
        let Some((device, _queue)) = crate::depth::tests::headless_device() else {
            return;
        };
        let pipeline =
            PhongPipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, false).unwrap();
        assert!(pipeline.wireframe_pipeline.is_none());
    }
}
