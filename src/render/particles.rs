use super::helpers::{self, UniformBinding, QUAD_VERTEX_COUNT};
use bagua_core::{DragSlot, ParticleVertex, PARTICLES_WGSL};
use glam::{Mat4, Vec3};

/// Mirrors `Globals` in particles.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub parallax: [[f32; 4]; 4],
    pub cam_right: [f32; 4],
    pub cam_up: [f32; 4],
    pub params: [f32; 4],
    pub drag_center0: [f32; 4],
    pub drag_offset0: [f32; 4],
    pub drag_center1: [f32; 4],
    pub drag_offset1: [f32; 4],
}

pub struct ParticleFrame<'a> {
    pub view: Mat4,
    pub proj: Mat4,
    pub parallax: Mat4,
    pub time: f32,
    pub morph: f32,
    pub point_size: f32,
    pub noise_strength: f32,
    pub drag_radius: f32,
    pub slots: &'a [DragSlot; 2],
}

impl ParticleUniforms {
    pub fn from_frame(f: &ParticleFrame<'_>) -> Self {
        let right = f.view.row(0).truncate();
        let up = f.view.row(1).truncate();
        let v4 = |v: Vec3, w: f32| [v.x, v.y, v.z, w];
        Self {
            view_proj: (f.proj * f.view).to_cols_array_2d(),
            parallax: f.parallax.to_cols_array_2d(),
            cam_right: v4(right, f.time),
            cam_up: v4(up, f.morph),
            params: [f.point_size, f.noise_strength, f.drag_radius, 0.0],
            drag_center0: v4(f.slots[0].center, 0.0),
            drag_offset0: v4(f.slots[0].offset, 0.0),
            drag_center1: v4(f.slots[1].center, 0.0),
            drag_offset1: v4(f.slots[1].offset, 0.0),
        }
    }
}

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // base position
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 1,
    },
    // seed
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 12,
        shader_location: 2,
    },
    // morph target
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 16,
        shader_location: 3,
    },
];

pub struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding,
    instance_vb: wgpu::Buffer,
    count: u32,
}

impl ParticleRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, count: usize) -> Self {
        let uniforms = helpers::create_uniform_binding(
            device,
            "particle_uniforms",
            std::mem::size_of::<ParticleUniforms>() as u64,
        );
        let pipeline = helpers::create_instanced_pipeline(
            device,
            "particles",
            PARTICLES_WGSL,
            &uniforms,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &PARTICLE_ATTRIBUTES,
            },
            format,
        );
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_instances"),
            size: (std::mem::size_of::<ParticleVertex>() * count.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            pipeline,
            uniforms,
            instance_vb,
            count: count as u32,
        }
    }

    /// Replace instance data; called only when the morph target changed.
    pub fn upload(&self, queue: &wgpu::Queue, vertices: &[ParticleVertex]) {
        let n = vertices.len().min(self.count as usize);
        queue.write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&vertices[..n]));
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, u: &ParticleUniforms) {
        queue.write_buffer(&self.uniforms.buffer, 0, bytemuck::bytes_of(u));
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, quad_vb: &wgpu::Buffer) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.uniforms.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..self.count);
    }
}
