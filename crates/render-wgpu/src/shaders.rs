/// WGSL shader for the lit cubes.
///
/// Color arrives in its own vertex buffer (location 1) so faces can be
/// recolored without rewriting geometry.
pub const CUBE_SHADER: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_color: vec3<f32>,
    shininess: f32,
    light_pos: vec3<f32>,
    view_pos: vec3<f32>,
    ambient_strength: vec3<f32>,
    diffuse_strength: vec3<f32>,
    specular_strength: vec3<f32>,
};

struct ObjectUniforms {
    model: mat4x4<f32>,
    normal: mat3x3<f32>,
};

@group(0) @binding(0)
var<uniform> u_frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> u_object: ObjectUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) world_position: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = u_object.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = u_frame.projection * u_frame.view * world;
    out.color = vertex.color;
    out.world_normal = u_object.normal * vertex.normal;
    out.world_position = world.xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let ambient = u_frame.ambient_strength * u_frame.light_color;

    let norm = normalize(in.world_normal);
    let light_dir = normalize(u_frame.light_pos - in.world_position);
    let diff = max(dot(norm, light_dir), 0.0);
    let diffuse = diff * u_frame.light_color * u_frame.diffuse_strength;

    // Specular is normalized by the larger of the view and light cosines.
    let view_dir = normalize(u_frame.view_pos - in.world_position);
    let reflect_dir = reflect(-light_dir, norm);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), u_frame.shininess)
        / max(dot(norm, view_dir), -dot(norm, light_dir));
    let specular = u_frame.specular_strength * spec * u_frame.light_color;

    let result = (ambient + diffuse + specular) * in.color.rgb;
    return vec4<f32>(result, in.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_both_entry_points() {
        assert!(CUBE_SHADER.contains("fn vs_main("));
        assert!(CUBE_SHADER.contains("fn fs_main("));
    }

    #[test]
    fn attribute_locations_match_buffer_layout() {
        assert!(CUBE_SHADER.contains("@location(0) position: vec3<f32>"));
        assert!(CUBE_SHADER.contains("@location(1) color: vec4<f32>"));
        assert!(CUBE_SHADER.contains("@location(2) normal: vec3<f32>"));
    }
}
