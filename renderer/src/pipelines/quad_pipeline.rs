//====================================================================

use std::{ops::Range, sync::Arc};

use crate::{
    shared::{SharedRenderResources, Vertex},
    texture_storage::LoadedTexture,
    tools,
};

//====================================================================

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct InstanceQuad {
    pub position: glam::Vec2,
    pub size: glam::Vec2,
    pub color: glam::Vec4,
}

impl Vertex for InstanceQuad {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x2, // Position
            1 => Float32x2, // Size
            2 => Float32x4, // Color
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

//====================================================================

struct QuadBatch {
    texture: Arc<LoadedTexture>,
    range: Range<u32>,
}

/// Draws textured, tinted quads in submission order. Consecutive quads
/// sharing a texture are merged into one draw call.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,

    instances: Vec<InstanceQuad>,
    batches: Vec<QuadBatch>,
    buffer: tools::InstanceBuffer<InstanceQuad>,
}

impl QuadRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        shared: &SharedRenderResources,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = tools::create_pipeline(
            device,
            config,
            "Quad Pipeline",
            &[camera_bind_group_layout, shared.texture_bind_group_layout()],
            &[InstanceQuad::desc()],
            include_str!("shaders/quad.wgsl"),
            tools::RenderPipelineDescriptor {
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let buffer =
            tools::InstanceBuffer::new(device, &[<InstanceQuad as bytemuck::Zeroable>::zeroed()]);

        Self {
            pipeline,
            instances: Vec::new(),
            batches: Vec::new(),
            buffer,
        }
    }

    pub fn push(&mut self, texture: &Arc<LoadedTexture>, instance: InstanceQuad) {
        let index = self.instances.len() as u32;
        self.instances.push(instance);

        match self.batches.last_mut() {
            Some(batch) if batch.texture.id() == texture.id() => batch.range.end = index + 1,
            _ => self.batches.push(QuadBatch {
                texture: texture.clone(),
                range: index..index + 1,
            }),
        }
    }

    #[inline]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub(crate) fn prep(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.buffer.update(device, queue, &self.instances);
    }

    pub(crate) fn render(&self, pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        if self.instances.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.buffer.buffer().slice(..));

        self.batches.iter().for_each(|batch| {
            pass.set_bind_group(1, batch.texture.bind_group(), &[]);
            pass.draw(0..4, batch.range.clone());
        });
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }
}

//====================================================================
