//! Command recording for one presented frame.

use std::sync::Arc;

/// Default background, `(100, 149, 237)` in 8-bit sRGB terms.
pub const CORNFLOWER_BLUE: wgpu::Color = wgpu::Color {
    r: 100.0 / 255.0,
    g: 149.0 / 255.0,
    b: 237.0 / 255.0,
    a: 1.0,
};

/// Describes how the frame's single render pass clears its attachments.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth: Option<(&'a wgpu::TextureView, f32)>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new() -> Self {
        Self {
            clear_color: CORNFLOWER_BLUE,
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach `view` as depth, cleared to `clear_value` each frame.
    pub fn depth(mut self, view: &'a wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some((view, clear_value));
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        target: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e> {
        let clear_and_keep = |load| wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        };

        let color = wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: clear_and_keep(wgpu::LoadOp::Clear(self.clear_color)),
            depth_slice: None,
        };
        let depth = self.depth.map(|(view, value)| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(value),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color)],
            depth_stencil_attachment: depth,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Records into the acquired swapchain image and presents it.
///
/// Call [`submit`](Self::submit) when done. A frame that is dropped first
/// still gets presented so the swapchain image is never leaked.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let surface_view = surface_texture.texture.create_view(&Default::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orrery-frame"),
        });

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
        }
    }

    /// Open the pass over the swapchain image. Returns `None` after submit.
    pub fn begin_render_pass<'e>(
        &'e mut self,
        builder: &RenderPassBuilder<'_>,
    ) -> Option<wgpu::RenderPass<'e>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.begin(encoder, &self.surface_view))
    }

    pub fn submit(mut self) {
        self.present();
    }

    /// Returns whether anything was left to present.
    fn present(&mut self) -> bool {
        match (self.encoder.take(), self.surface_texture.take()) {
            (Some(encoder), Some(image)) => {
                self.queue.submit(std::iter::once(encoder.finish()));
                image.present();
                true
            }
            _ => false,
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if self.present() {
            log::warn!("Frame presented on drop, submit() was never called");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pass_clears_to_background() {
        let pass = RenderPassBuilder::default();
        assert_eq!(pass.clear_color, CORNFLOWER_BLUE);
        assert_eq!(CORNFLOWER_BLUE.a, 1.0);
        assert!(CORNFLOWER_BLUE.b > CORNFLOWER_BLUE.g && CORNFLOWER_BLUE.g > CORNFLOWER_BLUE.r);
    }

    #[test]
    fn test_chained_options_are_kept() {
        let pass = RenderPassBuilder::new()
            .label("bodies")
            .clear_color(wgpu::Color::BLACK);
        assert_eq!(pass.clear_color, wgpu::Color::BLACK);
        assert_eq!(pass.label, Some("bodies"));
        assert!(pass.depth.is_none());
    }
}
