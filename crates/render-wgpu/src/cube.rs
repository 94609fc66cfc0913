use crate::uniforms::ObjectUniforms;
use cubeshade_common::Rgba;
use cubeshade_scene::{CubeMesh, DrawCall, Vertex};
use wgpu::util::DeviceExt;

/// Vertex buffer layouts shared by every cube: geometry in slot 0, colors in
/// slot 1.
pub(crate) fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    const GEOMETRY: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 2 => Float32x3];
    const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &GEOMETRY,
        },
        wgpu::VertexBufferLayout {
            array_stride: (4 * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR,
        },
    ]
}

/// Host copy of a cube's colors and whether its device buffers still exist.
#[derive(Debug, Clone, PartialEq)]
struct CubeHost {
    mesh: CubeMesh,
    released: bool,
}

impl CubeHost {
    fn new(mesh: CubeMesh) -> Self {
        Self {
            mesh,
            released: false,
        }
    }

    fn is_live(&self) -> bool {
        !self.released
    }

    /// Recolor one face. Returns the full color buffer to upload, or `None`
    /// when nothing changed.
    fn recolor(&mut self, face: usize, color: Rgba) -> Option<&[f32]> {
        if self.released || !self.mesh.update_face_color(face, color) {
            return None;
        }
        Some(self.mesh.colors())
    }

    /// Returns `true` only on the first call.
    fn release(&mut self) -> bool {
        !std::mem::replace(&mut self.released, true)
    }
}

/// Device-resident copy of a [`CubeMesh`] plus its per-draw uniform block.
pub struct GpuCube {
    host: CubeHost,
    vertex_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
}

impl GpuCube {
    pub fn new(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: CubeMesh,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_color_buffer")),
            contents: bytemuck::cast_slice(mesh.colors()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}_object_uniforms")),
            size: std::mem::size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_object_bind_group")),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        Self {
            index_count: mesh.index_count(),
            host: CubeHost::new(mesh),
            vertex_buffer,
            color_buffer,
            index_buffer,
            object_buffer,
            object_bind_group,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Recolor one face and push the whole color buffer to the device.
    ///
    /// Out-of-range faces and released cubes are left untouched.
    pub fn update_face_color(&mut self, queue: &wgpu::Queue, face: usize, color: Rgba) -> bool {
        let Some(colors) = self.host.recolor(face, color) else {
            return false;
        };
        queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(colors));
        true
    }

    pub(crate) fn write_object(&self, queue: &wgpu::Queue, draw: &DrawCall) {
        if !self.host.is_live() {
            return;
        }
        queue.write_buffer(
            &self.object_buffer,
            0,
            bytemuck::bytes_of(&ObjectUniforms::from(draw)),
        );
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if !self.host.is_live() {
            return;
        }
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Free every device buffer. Later calls do nothing.
    pub fn release(&mut self) {
        if !self.host.release() {
            return;
        }
        self.vertex_buffer.destroy();
        self.color_buffer.destroy();
        self.index_buffer.destroy();
        self.object_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeshade_common::ColorPreset;
    use cubeshade_scene::pulsing_cube_mesh;

    #[test]
    fn release_reports_only_the_first_call() {
        let mut host = CubeHost::new(pulsing_cube_mesh());
        assert!(host.is_live());
        assert!(host.release());
        assert!(!host.release());
        assert!(!host.is_live());
    }

    #[test]
    fn recolor_returns_full_buffer_to_upload() {
        let mut host = CubeHost::new(pulsing_cube_mesh());
        let colors = host.recolor(0, ColorPreset::Cyan.rgba()).map(<[f32]>::to_vec);
        let colors = colors.expect("face 0 exists");
        assert_eq!(colors.len(), 96);
        assert_eq!(&colors[..4], &ColorPreset::Cyan.rgba().to_array());
        assert_eq!(host.recolor(6, ColorPreset::Cyan.rgba()), None);
    }

    #[test]
    fn released_cube_ignores_recolor() {
        let mut host = CubeHost::new(pulsing_cube_mesh());
        host.release();
        let before = host.mesh.clone();
        assert_eq!(host.recolor(0, ColorPreset::Yellow.rgba()), None);
        assert_eq!(host.mesh, before);
    }

    #[test]
    fn geometry_layout_skips_color_location() {
        let [geometry, color] = vertex_layouts();
        assert_eq!(geometry.array_stride, 24);
        assert_eq!(geometry.attributes[0].shader_location, 0);
        assert_eq!(geometry.attributes[1].shader_location, 2);
        assert_eq!(geometry.attributes[1].offset, 12);
        assert_eq!(color.array_stride, 16);
        assert_eq!(color.attributes[0].shader_location, 1);
    }
}
