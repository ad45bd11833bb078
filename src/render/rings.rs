use super::helpers::{self, UniformBinding, QUAD_VERTEX_COUNT};
use bagua_core::constants::MAX_RING_COUNT;
use bagua_core::{RingRectInstance, RINGS_WGSL};
use glam::Mat4;

/// Mirrors `Globals` in rings.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingUniforms {
    pub proj: [[f32; 4]; 4],
    pub tilt: [[f32; 4]; 4],
    pub params: [f32; 4],
    pub color: [f32; 4],
    pub rings: [[f32; 4]; MAX_RING_COUNT],
}

impl RingUniforms {
    pub fn new(
        proj: Mat4,
        tilt: Mat4,
        scale: f32,
        depth: f32,
        alpha: f32,
        color: [f32; 3],
        states: impl Iterator<Item = (f32, f32)>,
    ) -> Self {
        let mut rings = [[0.0; 4]; MAX_RING_COUNT];
        for (slot, (rotation, opacity)) in rings.iter_mut().zip(states) {
            *slot = [rotation, opacity, 0.0, 0.0];
        }
        Self {
            proj: proj.to_cols_array_2d(),
            tilt: tilt.to_cols_array_2d(),
            params: [scale, depth, alpha, 0.0],
            color: [color[0], color[1], color[2], 1.0],
            rings,
        }
    }
}

const RING_ATTRIBUTES: [wgpu::VertexAttribute; 5] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 8,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 16,
        shader_location: 3,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 20,
        shader_location: 4,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Uint32,
        offset: 24,
        shader_location: 5,
    },
];

pub struct RingRenderer {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding,
    instance_vb: wgpu::Buffer,
    count: u32,
}

impl RingRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        instances: &[RingRectInstance],
    ) -> Self {
        use wgpu::util::DeviceExt;
        let uniforms = helpers::create_uniform_binding(
            device,
            "ring_uniforms",
            std::mem::size_of::<RingUniforms>() as u64,
        );
        let pipeline = helpers::create_instanced_pipeline(
            device,
            "rings",
            RINGS_WGSL,
            &uniforms,
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<RingRectInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &RING_ATTRIBUTES,
            },
            format,
        );
        // glyph layout never changes after build
        let instance_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ring_instances"),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            pipeline,
            uniforms,
            instance_vb,
            count: instances.len() as u32,
        }
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, u: &RingUniforms) {
        queue.write_buffer(&self.uniforms.buffer, 0, bytemuck::bytes_of(u));
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, quad_vb: &wgpu::Buffer) {
        if self.count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.uniforms.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..self.count);
    }
}
