//====================================================================

use common::Size;
use wgpu::util::DeviceExt;

//====================================================================

pub struct Camera {
    pub camera: OrthographicCamera,
    pub data: CameraData,
}

impl Camera {
    #[inline]
    pub fn new(device: &wgpu::Device, camera: OrthographicCamera) -> Self {
        Self {
            data: CameraData::new(device, &camera),
            camera,
        }
    }

    #[inline]
    pub fn update_camera(&self, queue: &wgpu::Queue) {
        self.data.update_camera(queue, &self.camera);
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.data.bind_group_layout()
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.data.bind_group()
    }
}

//====================================================================

pub struct CameraData {
    camera_buffer: wgpu::Buffer,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
}

impl CameraData {
    pub fn new(device: &wgpu::Device, camera: &OrthographicCamera) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera buffer"),
            contents: bytemuck::cast_slice(&[camera.into_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(camera_buffer.as_entire_buffer_binding()),
            }],
        });

        Self {
            camera_buffer,
            camera_bind_group_layout,
            camera_bind_group,
        }
    }

    #[inline]
    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &OrthographicCamera) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.into_uniform()]),
        );
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_bind_group_layout
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }
}

//====================================================================

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy)]
pub struct CameraUniformRaw {
    view_projection: glam::Mat4,
    camera_position: glam::Vec3,
    _padding: u32,
}

impl CameraUniformRaw {
    pub fn new(view_projection: glam::Mat4, camera_position: glam::Vec3) -> Self {
        Self {
            view_projection,
            camera_position,
            _padding: 0,
        }
    }
}

//--------------------------------------------------

/// Pixel space camera with the origin in the top left corner and y pointing
/// down, matching element coordinates.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub z_near: f32,
    pub z_far: f32,

    pub translation: glam::Vec3,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new_sized(Size::new(1920., 1080.))
    }
}

impl OrthographicCamera {
    pub fn new_sized(size: Size<f32>) -> Self {
        Self {
            left: 0.,
            right: size.width,
            bottom: size.height,
            top: 0.,
            z_near: -1.,
            z_far: 1.,

            translation: glam::Vec3::ZERO,
        }
    }

    #[inline]
    pub fn set_size(&mut self, size: Size<f32>) {
        self.right = self.left + size.width;
        self.bottom = self.top + size.height;
    }

    pub fn get_projection(&self) -> glam::Mat4 {
        let projection_matrix = glam::Mat4::orthographic_lh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.z_near,
            self.z_far,
        );

        projection_matrix * glam::Mat4::from_translation(-self.translation)
    }

    #[inline]
    fn into_uniform(&self) -> CameraUniformRaw {
        CameraUniformRaw::new(self.get_projection(), self.translation)
    }
}

//====================================================================


//====================================================================
