use bytemuck::{Pod, Zeroable};
use cubeshade_scene::{DrawCall, FramePlan};
use glam::{Mat3, Vec3};

/// Frame-wide block at group 0. vec3 members take a full 16-byte slot, so
/// each is followed by a scalar or explicit padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    light_color: [f32; 3],
    shininess: f32,
    light_pos: [f32; 3],
    _pad0: f32,
    view_pos: [f32; 3],
    _pad1: f32,
    ambient_strength: [f32; 3],
    _pad2: f32,
    diffuse_strength: [f32; 3],
    _pad3: f32,
    specular_strength: [f32; 3],
    _pad4: f32,
}

impl From<&FramePlan> for FrameUniforms {
    fn from(plan: &FramePlan) -> Self {
        let l = &plan.lighting;
        Self {
            view: plan.view.to_cols_array_2d(),
            projection: plan.projection.to_cols_array_2d(),
            light_color: l.light_color.to_array(),
            shininess: l.shininess,
            light_pos: l.light_position.to_array(),
            _pad0: 0.0,
            view_pos: l.view_position.to_array(),
            _pad1: 0.0,
            ambient_strength: l.ambient_strength.to_array(),
            _pad2: 0.0,
            diffuse_strength: l.diffuse_strength.to_array(),
            _pad3: 0.0,
            specular_strength: l.specular_strength.to_array(),
            _pad4: 0.0,
        }
    }
}

/// Per-draw block at group 1. WGSL `mat3x3<f32>` columns are 16 bytes apart.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
}

impl From<&DrawCall> for ObjectUniforms {
    fn from(draw: &DrawCall) -> Self {
        Self {
            model: draw.model.to_cols_array_2d(),
            normal: padded_columns(draw.normal),
        }
    }
}

fn padded_columns(m: Mat3) -> [[f32; 4]; 3] {
    let col = |c: Vec3| c.extend(0.0).to_array();
    [col(m.x_axis), col(m.y_axis), col(m.z_axis)]
}
