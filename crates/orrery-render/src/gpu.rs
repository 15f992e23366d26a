//! The wgpu device, queue and window surface behind every draw.

use std::sync::Arc;
use winit::window::Window;

/// Why the GPU could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no graphics adapter can present to this window")]
    NoAdapter,

    #[error("graphics device request was refused: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("window surface could not be created: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
}

/// Outcome of a failed swapchain acquire, as seen by the frame loop.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Still unusable after one reconfigure.
    #[error("swapchain lost")]
    Lost,

    #[error("swapchain out of memory")]
    OutOfMemory,

    /// Skip this frame and try the next.
    #[error("swapchain acquire timed out")]
    Timeout,
}

pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: Arc<wgpu::Queue>,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    features: wgpu::Features,
}

impl RenderContext {
    /// Bring up the GPU for `window` and configure its swapchain.
    ///
    /// Line polygon mode is enabled only where the adapter has it; see
    /// [`RenderContext::supports_wireframe`].
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;
        let adapter = pick_adapter(&instance, &surface).await?;

        let features = optional_features(&adapter);
        let (device, queue) = open_device(&adapter, features).await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = select_preferred_srgb_format(&caps.formats);
        let present_mode = select_present_mode(&caps.present_modes, vsync);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::debug!("Swapchain {surface_format:?} presenting with {present_mode:?}");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            instance,
            adapter,
            device,
            queue: Arc::new(queue),
            surface,
            surface_config,
            surface_format,
            features,
        })
    }

    pub fn supports_wireframe(&self) -> bool {
        self.features.contains(wgpu::Features::POLYGON_MODE_LINE)
    }

    /// Swapchain size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Zero extents (minimized windows) are bumped to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Acquire the next swapchain image. Lost and outdated surfaces get one
    /// reconfigure before the error is reported.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Swapchain out of date, reconfiguring once");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(wgpu::SurfaceError::Other) => {
                log::error!("Swapchain acquire failed for an unspecified reason");
                Err(SurfaceError::Lost)
            }
        }
    }
}

/// Blocking wrapper over [`RenderContext::new`] for the winit thread.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

async fn pick_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> Result<wgpu::Adapter, RenderContextError> {
    let options = wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(surface),
        force_fallback_adapter: false,
    };
    let adapter = instance
        .request_adapter(&options)
        .await
        .map_err(|_| RenderContextError::NoAdapter)?;

    let info = adapter.get_info();
    log::info!(
        "Rendering on {} via {:?} ({:?})",
        info.name,
        info.backend,
        info.device_type
    );
    Ok(adapter)
}

/// Features worth having but not required to start.
fn optional_features(adapter: &wgpu::Adapter) -> wgpu::Features {
    let wanted = wgpu::Features::POLYGON_MODE_LINE;
    let granted = adapter.features() & wanted;
    if granted.is_empty() {
        log::info!("Line polygon mode unavailable, wireframe toggle disabled");
    }
    granted
}

async fn open_device(
    adapter: &wgpu::Adapter,
    features: wgpu::Features,
) -> Result<(wgpu::Device, wgpu::Queue), RenderContextError> {
    let descriptor = wgpu::DeviceDescriptor {
        label: Some("orrery-device"),
        required_features: features,
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        experimental_features: wgpu::ExperimentalFeatures::default(),
        trace: wgpu::Trace::Off,
    };
    Ok(adapter.request_device(&descriptor).await?)
}

/// The shaders write linear color, so an sRGB target is wanted. BGRA is
/// tried first since most desktop swapchains are native BGRA.
fn select_preferred_srgb_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    use wgpu::TextureFormat as F;

    let preferred = [F::Bgra8UnormSrgb, F::Rgba8UnormSrgb];
    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
        .or_else(|| formats.first().copied())
        .unwrap_or(F::Bgra8UnormSrgb)
}

/// Vsync always maps to Fifo, which every surface supports. Otherwise take
/// the lowest-latency mode on offer.
fn select_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    use wgpu::PresentMode as P;

    if vsync {
        return P::Fifo;
    }
    [P::Immediate, P::Mailbox]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(P::Fifo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::PresentMode as P;
    use wgpu::TextureFormat as F;

    #[test]
    fn test_bgra_srgb_wins_regardless_of_order() {
        let caps = [F::Rgba8UnormSrgb, F::Rgba16Float, F::Bgra8UnormSrgb];
        assert_eq!(select_preferred_srgb_format(&caps), F::Bgra8UnormSrgb);
    }

    #[test]
    fn test_rgba_srgb_when_no_bgra() {
        let caps = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(select_preferred_srgb_format(&caps), F::Rgba8UnormSrgb);
    }

    #[test]
    fn test_any_srgb_beats_linear() {
        let caps = [F::Rgb10a2Unorm, F::Bc1RgbaUnormSrgb];
        assert_eq!(select_preferred_srgb_format(&caps), F::Bc1RgbaUnormSrgb);
    }

    #[test]
    fn test_linear_only_surface_uses_first() {
        let caps = [F::Rgba16Float, F::Bgra8Unorm];
        assert_eq!(select_preferred_srgb_format(&caps), F::Rgba16Float);
    }

    #[test]
    fn test_empty_capabilities_still_pick_a_format() {
        assert_eq!(select_preferred_srgb_format(&[]), F::Bgra8UnormSrgb);
    }

    #[test]
    fn test_vsync_ignores_faster_modes() {
        let modes = [P::Mailbox, P::Immediate, P::Fifo];
        assert_eq!(select_present_mode(&modes, true), P::Fifo);
    }

    #[test]
    fn test_uncapped_mode_order() {
        assert_eq!(
            select_present_mode(&[P::Fifo, P::Mailbox, P::Immediate], false),
            P::Immediate
        );
        assert_eq!(select_present_mode(&[P::Fifo, P::Mailbox], false), P::Mailbox);
        assert_eq!(select_present_mode(&[P::Fifo], false), P::Fifo);
    }
}
