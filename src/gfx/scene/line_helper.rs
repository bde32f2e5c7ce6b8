//! Line-list helpers drawn over the scene (axes, light gizmo)

use crate::gfx::geometry::LineData;

pub struct LineHelper {
    pub name: String,
    pub lines: LineData,
    pub visible: bool,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl LineHelper {
    pub fn new(name: impl Into<String>, lines: LineData) -> Self {
        Self {
            name: name.into(),
            lines,
            visible: true,
            vertex_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.lines.vertices.len() as u32
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device) {
        if self.lines.vertices.is_empty() {
            return;
        }
        self.vertex_buffer = Some(wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Line Helper: {}", self.name)),
                contents: bytemuck::cast_slice(&self.lines.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertex_buffer.as_ref()
    }
}
