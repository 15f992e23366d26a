//! Reverse-Z depth attachment.
//!
//! Depth 1.0 sits on the near plane and 0.0 at infinity. With a float
//! target this spreads precision evenly enough to draw a planet a million
//! metres away and Neptune's orbit in the same frame.

pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    /// Reverse-Z only pays off with a float target.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    /// Allocate a depth target matching the swapchain. Zero extents become one.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("orrery-depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());

        Self {
            texture,
            view,
            width: size.width,
            height: size.height,
        }
    }

    /// Reallocate when the swapchain size changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (self.width, self.height) != (width.max(1), height.max(1)) {
            *self = Self::new(device, width, height);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pipeline-side half of the reverse-Z setup.
    pub fn depth_stencil_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled: true,
            depth_compare: Self::COMPARE_FUNCTION,
            stencil: Default::default(),
            bias: Default::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A device with no surface, or `None` when the machine has no adapter
    /// (CI containers). GPU tests return early in that case.
    pub(crate) fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::default();
        let options = wgpu::RequestAdapterOptions::default();
        pollster::block_on(async move {
            let adapter = instance.request_adapter(&options).await.ok()?;
            adapter.request_device(&Default::default()).await.ok()
        })
    }

    #[test]
    fn test_clear_value_is_behind_everything() {
        // With GreaterEqual, any fragment in [0, 1] passes against a fresh clear.
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(DepthBuffer::COMPARE_FUNCTION, wgpu::CompareFunction::GreaterEqual);
    }

    #[test]
    fn test_pipeline_state_matches_attachment() {
        let state = DepthBuffer::depth_stencil_state();
        assert_eq!(state.format, DepthBuffer::FORMAT);
        assert_eq!(state.depth_compare, DepthBuffer::COMPARE_FUNCTION);
        assert!(state.depth_write_enabled);
        assert!(DepthBuffer::FORMAT.has_depth_aspect());
        assert!(!DepthBuffer::FORMAT.has_stencil_aspect());
    }

    #[test]
    fn test_minimized_window_gets_one_pixel_target() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600);
        assert_eq!((depth.width(), depth.height()), (800, 600));

        depth.resize(&device, 0, 0);
        assert_eq!((depth.width(), depth.height()), (1, 1));
        assert_eq!(depth.texture.width(), 1);
    }
}
