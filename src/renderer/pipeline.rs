//! WebGPU pipeline that draws a whole render batch in one call
//!
//! The host owns the window, surface, device and queue; this type only owns
//! the render pipeline and a growable vertex buffer.

use super::batch::DrawTarget;
use super::vertex::{Vertex, colors};

/// Initial vertex buffer capacity (in vertices)
const INITIAL_CAPACITY: usize = 6 * 1024;

/// Convert pixel coordinates (origin bottom-left) to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, size: (u32, u32)) -> (f32, f32) {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    (x / w * 2.0 - 1.0, y / h * 2.0 - 1.0)
}

/// Render pipeline plus the vertex buffer holding the current batch
pub struct BatchPipeline {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Capacity of `vertex_buffer` in vertices
    capacity: usize,
    vertex_count: u32,
    /// Viewport size in pixels
    size: (u32, u32),
    /// Reused NDC conversion buffer
    ndc: Vec<Vertex>,
}

impl BatchPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = Self::create_vertex_buffer(device, INITIAL_CAPACITY);

        Self {
            pipeline,
            vertex_buffer,
            capacity: INITIAL_CAPACITY,
            vertex_count: 0,
            size: (width, height),
            ndc: Vec::new(),
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_vertex_buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Convert batch vertices to NDC and upload them, growing the buffer if needed
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        let size = self.size;
        self.ndc.clear();
        self.ndc.extend(vertices.iter().map(|v| {
            let (x, y) = pixel_to_ndc(v.position[0], v.position[1], size);
            Vertex::new(x, y, v.local, v.color)
        }));

        if self.ndc.len() > self.capacity {
            let capacity = self.ndc.len().next_power_of_two();
            log::debug!("Growing particle vertex buffer: {} -> {}", self.capacity, capacity);
            self.vertex_buffer = Self::create_vertex_buffer(device, capacity);
            self.capacity = capacity;
        }

        if !self.ndc.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.ndc));
        }
        self.vertex_count = self.ndc.len() as u32;
    }

    /// Record the single draw call for the uploaded batch
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }

    /// Clear `view` and draw the uploaded batch into it
    pub fn render(&self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("particle_encoder"),
        });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particle_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.record(&mut render_pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// [`DrawTarget`] that uploads a batch into a [`BatchPipeline`]
pub struct GpuDrawTarget<'a> {
    pipeline: &'a mut BatchPipeline,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> GpuDrawTarget<'a> {
    pub fn new(
        pipeline: &'a mut BatchPipeline,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> Self {
        Self {
            pipeline,
            device,
            queue,
        }
    }
}

impl DrawTarget for GpuDrawTarget<'_> {
    fn draw_vertices(&mut self, vertices: &[Vertex]) {
        self.pipeline.upload(self.device, self.queue, vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let size = (960, 540);
        assert_eq!(pixel_to_ndc(0.0, 0.0, size), (-1.0, -1.0));
        assert_eq!(pixel_to_ndc(960.0, 540.0, size), (1.0, 1.0));
        assert_eq!(pixel_to_ndc(480.0, 270.0, size), (0.0, 0.0));
    }

    #[test]
    fn test_pixel_to_ndc_zero_size() {
        let (x, y) = pixel_to_ndc(1.0, 1.0, (0, 0));
        assert!(x.is_finite() && y.is_finite());
    }
}
