use crate::constants::{CLEAR_COLOR_HEX, RING_ALPHA, RING_COLOR_HEX};
use crate::scene::Scene;
use bagua_core::constants::{POINT_WORLD_SIZE, RING_DEPTH};
use bagua_core::{noise_strength, RingRectInstance};
use glam::{Mat4, Vec2};
use web_sys as web;

mod helpers;
mod particles;
mod rings;

use particles::{ParticleFrame, ParticleRenderer, ParticleUniforms};
use rings::{RingRenderer, RingUniforms};

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    quad_vb: wgpu::Buffer,
    particles: ParticleRenderer,
    rings: RingRenderer,
    ring_color: [f32; 3],
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

fn tilt_matrix(rotation: Vec2) -> Mat4 {
    Mat4::from_rotation_x(rotation.x) * Mat4::from_rotation_y(rotation.y)
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        particle_count: usize,
        ring_instances: &[RingRectInstance],
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // colours are authored in sRGB; an sRGB surface expects linear values
        let to_surface = |hex: u32| {
            if format.is_srgb() {
                helpers::hex_to_linear(hex)
            } else {
                let c = |s: u32| ((hex >> s) & 0xff) as f32 / 255.0;
                [c(16), c(8), c(0)]
            }
        };
        let [r, g, b] = to_surface(CLEAR_COLOR_HEX);

        let quad_vb = helpers::create_quad_buffer(&device);
        let particles = ParticleRenderer::new(&device, format, particle_count);
        let rings = RingRenderer::new(&device, format, ring_instances);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            quad_vb,
            particles,
            rings,
            ring_color: to_surface(RING_COLOR_HEX),
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
        }
    }

    /// Re-apply the surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.config.width = self.width.max(1);
        self.config.height = self.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        if let Some(vertices) = scene.particles.take_gpu_update() {
            self.particles.upload(&self.queue, &vertices);
        }

        let camera = scene.orbit.camera();
        let proj = camera.projection_matrix();
        let morph = scene.particles.morph_factor();
        let particle_uniforms = ParticleUniforms::from_frame(&ParticleFrame {
            view: camera.view_matrix(),
            proj,
            parallax: tilt_matrix(scene.parallax.particle_rotation()),
            time: scene.particles.time(),
            morph,
            point_size: POINT_WORLD_SIZE,
            noise_strength: noise_strength(morph),
            drag_radius: scene.elastic.config.radius,
            slots: scene.elastic.slots(),
        });
        self.particles
            .write_uniforms(&self.queue, &particle_uniforms);

        let ring_uniforms = RingUniforms::new(
            proj,
            tilt_matrix(scene.parallax.ring_rotation()),
            scene.ring_scale(),
            RING_DEPTH,
            RING_ALPHA,
            self.ring_color,
            scene.rings.ring_states(),
        );
        self.rings.write_uniforms(&self.queue, &ring_uniforms);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            // rings sit behind the cloud; no depth buffer, draw order decides
            self.rings.draw(&mut rpass, &self.quad_vb);
            self.particles.draw(&mut rpass, &self.quad_vb);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
