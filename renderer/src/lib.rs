//====================================================================

use std::{error::Error, fmt::Display, path::PathBuf, sync::Arc};

use camera::{Camera, OrthographicCamera};
use common::{Color, Rect, Size};
use pipelines::quad_pipeline::{InstanceQuad, QuadRenderer};
use shared::SharedRenderResources;
use text::TextResources;
use texture::Texture;
use texture_storage::{LoadedTexture, TextureStorage};
use wgpu::SurfaceTarget;

pub use text::TextStyle;

pub mod camera;
pub mod pipelines;
pub mod shared;
pub mod text;
pub mod texture;
pub mod texture_storage;
pub mod tools;

//====================================================================

#[derive(Debug)]
pub enum RendererError {
    CreateSurface(wgpu::CreateSurfaceError),
    NoAdapter,
    RequestDevice(wgpu::RequestDeviceError),
    UnsupportedSurface,
}

impl Error for RendererError {}

impl Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::CreateSurface(e) => write!(f, "Unable to create surface: {}", e),
            RendererError::NoAdapter => write!(f, "No compatible graphics adapter found"),
            RendererError::RequestDevice(e) => write!(f, "Unable to request device: {}", e),
            RendererError::UnsupportedSurface => {
                write!(f, "Surface reports no supported texture formats")
            }
        }
    }
}

//====================================================================

/// Surface colors are authored in sRGB, the swapchain expects linear values.
fn to_linear(color: Color) -> [f32; 4] {
    let channel = |value: f32| match value <= 0.04045 {
        true => value / 12.92,
        false => ((value + 0.055) / 1.055).powf(2.4),
    };

    [channel(color.r), channel(color.g), channel(color.b), color.a]
}

//====================================================================

pub struct Renderer {
    core: RendererCore,
    shared: SharedRenderResources,

    camera: Camera,
    clear_color: wgpu::Color,

    textures: TextureStorage,
    text_res: TextResources,
    quad_pipeline: QuadRenderer,
}

impl Renderer {
    pub fn new(
        window: impl Into<SurfaceTarget<'static>>,
        window_size: Size<u32>,
        asset_root: impl Into<PathBuf>,
    ) -> Result<Self, RendererError> {
        let core = pollster::block_on(RendererCore::new(window, window_size))?;
        let shared = SharedRenderResources::new(&core.device);

        let fallback = Arc::new(LoadedTexture::load_texture(
            &core.device,
            &shared,
            Texture::from_color(
                &core.device,
                &core.queue,
                [255; 3],
                Some("Default Texture"),
                None,
            ),
        ));

        let camera = Camera::new(
            &core.device,
            OrthographicCamera::new_sized(window_size.to_f32()),
        );

        let quad_pipeline = QuadRenderer::new(
            &core.device,
            &core.config,
            &shared,
            camera.bind_group_layout(),
        );

        Ok(Self {
            core,
            shared,
            camera,
            clear_color: wgpu::Color::WHITE,
            textures: TextureStorage::new(asset_root.into(), fallback),
            text_res: TextResources::new(),
            quad_pipeline,
        })
    }

    pub fn resize(&mut self, new_size: Size<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            log::trace!("Ignoring empty surface size {}", new_size);
            return;
        }

        self.core.config.width = new_size.width;
        self.core.config.height = new_size.height;
        self.core
            .surface
            .configure(&self.core.device, &self.core.config);

        self.camera.camera.set_size(new_size.to_f32());
    }

    #[inline]
    pub fn size(&self) -> Size<u32> {
        Size::new(self.core.config.width, self.core.config.height)
    }

    pub fn set_clear_color(&mut self, color: Color) {
        let [r, g, b, a] = to_linear(color);
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };
    }

    #[inline]
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let texture = self.textures.fallback().clone();
        self.push_quad(&texture, rect, color);
    }

    pub fn draw_image(&mut self, source: &str, rect: Rect, tint: Color) {
        let texture = self.textures.get_or_load(
            &self.core.device,
            &self.core.queue,
            &self.shared,
            source,
        );
        self.push_quad(&texture, rect, tint);
    }

    pub fn draw_text(&mut self, text: &str, style: &TextStyle, rect: Rect) {
        if text.trim().is_empty() {
            return;
        }

        let texture = self.text_res.get_or_rasterize(
            &self.core.device,
            &self.core.queue,
            &self.shared,
            text,
            style,
            rect.size,
        );

        let rect = Rect {
            size: Size::new(rect.size.width.ceil(), rect.size.height.ceil()),
            ..rect
        };
        self.push_quad(&texture, rect, Color::WHITE);
    }

    fn push_quad(&mut self, texture: &Arc<LoadedTexture>, rect: Rect, color: Color) {
        if rect.size.width <= 0. || rect.size.height <= 0. {
            return;
        }

        self.quad_pipeline.push(
            texture,
            InstanceQuad {
                position: rect.position,
                size: glam::vec2(rect.size.width, rect.size.height),
                color: to_linear(color).into(),
            },
        );
    }

    /// Submit everything drawn since the previous tick.
    pub fn tick(&mut self) {
        self.camera.update_camera(&self.core.queue);
        self.quad_pipeline
            .prep(&self.core.device, &self.core.queue);

        self.render();
        self.quad_pipeline.clear();
    }

    fn render(&mut self) {
        let (surface_texture, surface_view) = match self.core.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                (texture, view)
            }
            Err(e) => {
                log::warn!("Unable to get surface texture - skipping frame: {}", e);
                return;
            }
        };

        let mut encoder = self
            .core
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.quad_pipeline
                .render(&mut render_pass, self.camera.bind_group());
        }

        self.core.queue.submit(Some(encoder.finish()));
        surface_texture.present();
    }
}

//====================================================================

pub struct RendererCore {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
}

impl RendererCore {
    pub async fn new(
        window: impl Into<SurfaceTarget<'static>>,
        window_size: Size<u32>,
    ) -> Result<Self, RendererError> {
        log::debug!("Creating core wgpu renderer components.");

        log::debug!("Window inner size = {:?}", window_size);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(RendererError::CreateSurface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        log::debug!("Chosen device adapter: {:#?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(RendererError::RequestDevice)?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        let surface_format = surface_capabilities
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_capabilities.formats.first())
            .copied()
            .ok_or(RendererError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.width.max(1),
            height: window_size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };

        surface.configure(&device, &config);

        log::debug!("Successfully created core wgpu components.");

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }
}

//====================================================================


//====================================================================
