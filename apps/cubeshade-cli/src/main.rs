use clap::{Parser, Subcommand};
use cubeshade_common::{ColorPreset, Rgba};
use cubeshade_input::Action;
use cubeshade_render::{DebugTextRenderer, Renderer};
use cubeshade_scene::mesh::{COLOR_BUFFER_LEN, FACE_COUNT};
use cubeshade_scene::{
    AspectMode, FramePipeline, FramePlan, ProjectionConfig, SceneState, orbiting_cube_mesh,
    pulsing_cube_mesh,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubeshade-cli", about = "CLI tool for inspecting cubeshade frames")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default configuration
    Info,
    /// Compute the matrices and uniforms for one frame
    Frame {
        /// Seconds of animation to run before planning
        #[arg(short, long, default_value = "0")]
        time: f64,
        /// Azimuth key presses; negative presses the opposite key
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        azimuth_steps: i32,
        /// Elevation key presses; negative presses the opposite key
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        elevation_steps: i32,
        /// Distance key presses; negative moves closer
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        distance_steps: i32,
        /// Derive aspect from --width/--height instead of 1024:768
        #[arg(long)]
        viewport_aspect: bool,
        #[arg(long, default_value = "500")]
        width: u32,
        #[arg(long, default_value = "500")]
        height: u32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print cube geometry statistics and face colors
    Mesh,
}

/// Inputs for a headless frame.
struct FrameRequest {
    time: f64,
    azimuth_steps: i32,
    elevation_steps: i32,
    distance_steps: i32,
    viewport_aspect: bool,
    viewport: (u32, u32),
}

fn press(scene: &mut SceneState, steps: i32, up: Action, down: Action) {
    let action = if steps >= 0 { up } else { down };
    for _ in 0..steps.unsigned_abs() {
        scene.apply(action);
    }
}

fn plan_frame(req: &FrameRequest) -> FramePlan {
    let mut scene = SceneState::default();
    press(
        &mut scene,
        req.azimuth_steps,
        Action::IncreaseAzimuth,
        Action::DecreaseAzimuth,
    );
    press(
        &mut scene,
        req.elevation_steps,
        Action::IncreaseElevation,
        Action::DecreaseElevation,
    );
    press(
        &mut scene,
        req.distance_steps,
        Action::IncreaseDistance,
        Action::DecreaseDistance,
    );

    if req.time > 0.0 {
        scene.apply(Action::ToggleAnimation);
        scene.update(req.time);
        scene.apply(Action::ToggleAnimation);
    }

    let projection = ProjectionConfig {
        aspect: if req.viewport_aspect {
            AspectMode::Viewport
        } else {
            ProjectionConfig::default().aspect
        },
        ..ProjectionConfig::default()
    };
    scene.plan_frame(&FramePipeline::new(projection), req.viewport)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let scene = SceneState::default();
            let projection = ProjectionConfig::default();
            println!("cubeshade-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "camera: distance={} range=[{}, {}] step={} angle_step={}",
                scene.camera.distance(),
                scene.camera.config.min_distance,
                scene.camera.config.max_distance,
                scene.camera.config.distance_step,
                scene.camera.config.angle_step
            );
            println!(
                "animation: own_rate={} global_rate={} pulse=1+{}*sin({}t)",
                scene.clock.config.own_revolution_rate,
                scene.clock.config.global_revolution_rate,
                scene.clock.config.pulse_amplitude,
                scene.clock.config.pulse_frequency
            );
            println!(
                "projection: fov_y={:.4} aspect={:?} near={} far={}",
                projection.fov_y, projection.aspect, projection.near, projection.far
            );
        }
        Commands::Frame {
            time,
            azimuth_steps,
            elevation_steps,
            distance_steps,
            viewport_aspect,
            width,
            height,
            json,
        } => {
            let plan = plan_frame(&FrameRequest {
                time,
                azimuth_steps,
                elevation_steps,
                distance_steps,
                viewport_aspect,
                viewport: (width, height),
            });
            tracing::debug!(time, "frame planned");
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&plan));
            }
        }
        Commands::Mesh => {
            let pulsing = pulsing_cube_mesh();
            let orbiting = orbiting_cube_mesh();
            println!(
                "vertices={} indices={} color_floats={}",
                pulsing.vertices().len(),
                pulsing.index_count(),
                COLOR_BUFFER_LEN
            );
            let name = |c: Option<Rgba>| {
                ColorPreset::ALL
                    .iter()
                    .find(|p| Some(p.rgba()) == c)
                    .map_or("custom", |p| p.name())
            };
            for face in 0..FACE_COUNT {
                println!(
                    "face {face}: normal={:?} pulsing={} orbiting={}",
                    pulsing.vertices()[face * 4].normal,
                    name(pulsing.face_color(face)),
                    name(orbiting.face_color(face))
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeshade_scene::CubeRole;
    use glam::{Mat3, Mat4};

    fn request() -> FrameRequest {
        FrameRequest {
            time: 0.0,
            azimuth_steps: 0,
            elevation_steps: 0,
            distance_steps: 0,
            viewport_aspect: false,
            viewport: (500, 500),
        }
    }

    #[test]
    fn default_frame_has_identity_center() {
        let plan = plan_frame(&request());
        let center = plan.draw(CubeRole::Pulsing);
        assert_eq!(center.model, Mat4::IDENTITY);
        assert_eq!(center.normal, Mat3::IDENTITY);
    }

    #[test]
    fn negative_distance_steps_move_closer() {
        let plan = plan_frame(&FrameRequest {
            distance_steps: -3,
            ..request()
        });
        let closer = plan.lighting.view_position.length();
        assert!((closer - 3.25).abs() < 1e-5);
    }

    #[test]
    fn timed_frame_moves_orbiting_cube() {
        let still = plan_frame(&request());
        let moved = plan_frame(&FrameRequest {
            time: 1.0,
            ..request()
        });
        assert_ne!(
            still.draw(CubeRole::Orbiting).model,
            moved.draw(CubeRole::Orbiting).model
        );
    }

    #[test]
    fn plan_serializes_to_json() {
        let json = serde_json::to_value(plan_frame(&request())).expect("serialize plan");
        assert!(json.get("draws").is_some());
        assert!(json["lighting"].get("shininess").is_some());
    }
}
