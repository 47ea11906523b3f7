use anyhow::Context;
use clap::{Parser, Subcommand};
use flyline_common::{Viewport, ndc_to_screen, screen_to_ndc};
use flyline_input::InputScript;
use flyline_render::{DebugTextRenderer, FramePlan, Renderer};
use flyline_sim::{
    AppState, AppSummary, DemoConfig, FrameOutcome, Integrator, JumpConfig, JumpPhase,
    JumpPhysics,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flyline-cli", about = "Headless tools for the flyline demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info,
    /// Map a pixel position to normalized device coordinates
    Ndc {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "800")]
        height: u32,
        /// Treat x/y as NDC and print the pixel position instead
        #[arg(long)]
        inverse: bool,
    },
    /// Simulate one jump from the ground and report its trajectory
    Jump {
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Use fixed-step integration regardless of the config
        #[arg(long)]
        fixed_step: bool,
        /// Print the height after every frame
        #[arg(long)]
        trace: bool,
    },
    /// Replay a YAML input script and print the final frame
    Replay {
        script: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Summary of one simulated jump.
#[derive(Debug, Clone, PartialEq)]
struct JumpReport {
    apex: f32,
    air_time: f32,
    frames: usize,
    final_height: f32,
    heights: Vec<f32>,
}

/// Upper bound on simulated frames, in case the config never lands.
const MAX_JUMP_FRAMES: usize = 100_000;

fn simulate_jump(config: JumpConfig, dt: f32) -> anyhow::Result<JumpReport> {
    anyhow::ensure!(dt > 0.0, "dt must be positive");
    let mut physics = JumpPhysics::new(config);
    let mut y = 0.0_f32;
    physics.try_jump(y);

    let mut report = JumpReport {
        apex: 0.0,
        air_time: 0.0,
        frames: 0,
        final_height: 0.0,
        heights: Vec::new(),
    };
    loop {
        let phase = physics.step(&mut y, dt);
        report.frames += 1;
        report.air_time += dt;
        report.apex = report.apex.max(y);
        report.heights.push(y);
        if phase == JumpPhase::Landed {
            break;
        }
        anyhow::ensure!(
            report.frames < MAX_JUMP_FRAMES,
            "jump did not land within {MAX_JUMP_FRAMES} frames"
        );
    }
    report.final_height = y;
    Ok(report)
}

#[derive(Serialize)]
struct ReplayReport {
    summary: AppSummary,
    plan: FramePlan,
}

fn replay(config: &DemoConfig, script: &InputScript) -> ReplayReport {
    let mut app = AppState::new(config);
    app.set_viewport(script.viewport);
    for frame in &script.frames {
        frame.deliver(&mut app);
        let outcome = app.update(frame.dt);
        if outcome != FrameOutcome::default() {
            tracing::debug!("frame {}: {outcome:?}", app.frame_index());
        }
    }
    ReplayReport {
        summary: app.summary(),
        plan: FramePlan::build(&app),
    }
}

/// Pixel to NDC, or NDC to pixel when `inverse` is set.
fn map_point(x: f64, y: f64, viewport: Viewport, inverse: bool) -> (f64, f64) {
    if inverse {
        ndc_to_screen(glam::Vec2::new(x as f32, y as f32), viewport)
    } else {
        let ndc = screen_to_ndc(x, y, viewport);
        (ndc.x as f64, ndc.y as f64)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config =
        DemoConfig::load_or_default(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Info => {
            println!("flyline-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", flyline_render::crate_info());
            println!("mode: {}", config.mode);
            println!(
                "window: {}x{} \"{}\"",
                config.window.width, config.window.height, config.window.title
            );
            println!(
                "camera: sensitivity={} speed={} fov={}",
                config.camera.sensitivity, config.camera.speed, config.camera.fov_degrees
            );
            println!(
                "jump: speed={} gravity={} integrator={:?}",
                config.jump.jump_speed, config.jump.gravity, config.jump.integrator
            );
        }
        Commands::Ndc {
            x,
            y,
            width,
            height,
            inverse,
        } => {
            let viewport = Viewport::new(width, height);
            anyhow::ensure!(!viewport.is_empty(), "viewport must be non-empty");
            let (a, b) = map_point(x, y, viewport, inverse);
            println!("({a:.6}, {b:.6})");
        }
        Commands::Jump {
            dt,
            fixed_step,
            trace,
        } => {
            let mut jump = config.jump.clone();
            if fixed_step {
                jump.integrator = Integrator::FixedStep;
            }
            let integrator = jump.integrator;
            let report = simulate_jump(jump, dt)?;
            if trace {
                for (i, h) in report.heights.iter().enumerate() {
                    println!("{i:>5} {h:.5}");
                }
            }
            println!(
                "integrator={integrator:?} dt={dt} frames={} air_time={:.4}s apex={:.4} final_y={}",
                report.frames, report.air_time, report.apex, report.final_height
            );
        }
        Commands::Replay { script, json } => {
            let input = InputScript::load(&script)
                .with_context(|| format!("failed to load script {}", script.display()))?;
            let report = replay(&config, &input);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&report.plan));
                println!("{}", report.summary);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyline_input::{InputEvent, Key, MouseButton, ScriptFrame};
    use flyline_sim::DemoMode;
    use std::io::Write;

    #[test]
    fn euler_jump_lands_on_ground() {
        let report = simulate_jump(JumpConfig::default(), 1.0 / 60.0).expect("simulate");
        assert_eq!(report.final_height, 0.0);
        assert!(report.apex > 0.25);
        assert!(report.air_time > 0.4 && report.air_time < 0.6);
        assert_eq!(report.heights.len(), report.frames);
    }

    #[test]
    fn fixed_step_jump_lands_on_ground() {
        let config = JumpConfig {
            integrator: Integrator::FixedStep,
            ..JumpConfig::default()
        };
        let report = simulate_jump(config, 1.0 / 20.0).expect("simulate");
        assert_eq!(report.final_height, 0.0);
    }

    #[test]
    fn jump_rejects_zero_dt() {
        assert!(simulate_jump(JumpConfig::default(), 0.0).is_err());
    }

    #[test]
    fn replay_draws_line_in_sketch_mode() {
        let config = DemoConfig {
            mode: DemoMode::Sketch,
            ..DemoConfig::default()
        };
        let script = InputScript {
            viewport: Viewport::new(400, 400),
            frames: vec![
                ScriptFrame::new(
                    0.016,
                    vec![
                        InputEvent::cursor(0.0, 400.0),
                        InputEvent::click(MouseButton::Left),
                        InputEvent::release(MouseButton::Left),
                    ],
                ),
                ScriptFrame::new(
                    0.016,
                    vec![
                        InputEvent::cursor(400.0, 0.0),
                        InputEvent::click(MouseButton::Left),
                    ],
                ),
            ],
        };
        let report = replay(&config, &script);
        let [a, b] = report.plan.line.expect("line drawn").points;
        assert_eq!((a.x, a.y, a.z), (-1.0, -1.0, 0.0));
        assert_eq!((b.x, b.y, b.z), (1.0, 1.0, 0.0));
        assert!(report.plan.square.is_none());
        assert!(report.summary.line_ready);
    }

    #[test]
    fn replay_is_deterministic() {
        let text = r#"
frames:
  - events:
      - { kind: key, key: w, pressed: true }
      - { kind: key, key: space, pressed: true }
  - dt: 0.1
  - dt: 0.1
    events:
      - { kind: key, key: p, pressed: true }
"#;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write script");
        let script = InputScript::load(file.path()).expect("load script");

        let config = DemoConfig::default();
        let a = replay(&config, &script);
        let b = replay(&config, &script);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.summary, b.summary);
        assert!(a.summary.wireframe);
        assert!(a.summary.position.z < 2.0);
    }

    #[test]
    fn replay_report_serializes() {
        let script = InputScript {
            viewport: Viewport::default(),
            frames: vec![ScriptFrame::new(0.016, vec![InputEvent::key_down(Key::P)])],
        };
        let report = replay(&DemoConfig::default(), &script);
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["summary"]["wireframe"], true);
        assert_eq!(json["plan"]["square"]["fill"], "wireframe");
    }

    #[test]
    fn ndc_maps_both_ways() {
        let vp = Viewport::new(800, 600);
        assert_eq!(map_point(0.0, 0.0, vp, false), (-1.0, 1.0));
        assert_eq!(map_point(0.0, 0.0, vp, true), (400.0, 300.0));
        assert_eq!(map_point(-1.0, 1.0, vp, true), (0.0, 0.0));
    }

    #[test]
    fn flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["flyline-cli", "replay", "x.yaml", "-v", "-c", "cfg.yaml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.yaml")));

        let cli = Cli::parse_from([
            "flyline-cli", "ndc", "--x", "-0.5", "--y", "0.5", "--inverse",
        ]);
        assert!(matches!(cli.command, Commands::Ndc { inverse: true, .. }));
    }
}
