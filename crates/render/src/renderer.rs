use cubeshade_scene::{CubeRole, FramePlan};
use glam::{Mat3, Mat4, Vec3};

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from a precomputed plan.
    fn render(&self, frame: &FramePlan) -> Self::Output;
}

/// Human-readable dump of a frame plan.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Decimal places printed for matrix entries.
    pub precision: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { precision: 3 }
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FramePlan) -> String {
        let p = self.precision;
        let l = &frame.lighting;
        let mut out = String::from("=== Frame ===\n");
        out.push_str(&format!("Viewer: {}\n", vec3(l.view_position, p)));
        out.push_str(&format!(
            "Light: pos={} color={} shininess={:.1}\n",
            vec3(l.light_position, p),
            vec3(l.light_color, p),
            l.shininess
        ));
        out.push_str(&format!(
            "Strengths: ambient={} diffuse={} specular={}\n",
            vec3(l.ambient_strength, p),
            vec3(l.diffuse_strength, p),
            vec3(l.specular_strength, p)
        ));
        let c = frame.clear_color;
        out.push_str(&format!(
            "Clear: ({:.p$}, {:.p$}, {:.p$}, {:.p$})\n",
            c.r, c.g, c.b, c.a
        ));
        out.push_str(&format!("View:\n{}\n", mat4(&frame.view, p)));
        out.push_str(&format!("Projection:\n{}\n", mat4(&frame.projection, p)));
        for draw in &frame.draws {
            let name = match draw.role {
                CubeRole::Pulsing => "pulsing",
                CubeRole::Orbiting => "orbiting",
            };
            out.push_str(&format!("Draw [{name}] model:\n{}\n", mat4(&draw.model, p)));
            out.push_str(&format!("Draw [{name}] normal:\n{}\n", mat3(&draw.normal, p)));
        }
        out
    }
}

fn vec3(v: Vec3, p: usize) -> String {
    format!("({:.p$}, {:.p$}, {:.p$})", v.x, v.y, v.z)
}

/// Row-major text so the matrix reads the way it is written on paper.
fn mat4(m: &Mat4, p: usize) -> String {
    (0..4)
        .map(|r| {
            let row = m.row(r);
            format!("  [{:>8.p$} {:>8.p$} {:>8.p$} {:>8.p$}]", row.x, row.y, row.z, row.w)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mat3(m: &Mat3, p: usize) -> String {
    (0..3)
        .map(|r| {
            let row = m.row(r);
            format!("  [{:>8.p$} {:>8.p$} {:>8.p$}]", row.x, row.y, row.z)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
