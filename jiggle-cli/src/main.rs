use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use glam::Vec3;
use jiggle_core::export::{self, Trace};
use jiggle_core::render::{DebugRay, DebugSink};
use jiggle_core::{scenario, JiggleParams, VERSION};

#[derive(Parser, Debug)]
#[command(name = "jiggle", version = VERSION, about = "Spring-damped jiggle bone simulator")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one bone through a preset or scenario file
    #[command(allow_negative_numbers = true)]
    Run {
        /// Preset name (see `presets`) or path to a scenario YAML
        scenario: String,
        #[command(flatten)]
        tuning: Tuning,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Write the trace here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List built-in scenarios
    Presets,
    /// Load and validate a scenario YAML
    Inspect { path: PathBuf },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

/// Jiggle tunables; anything left unset keeps the library default.
#[derive(Args, Debug, Default)]
struct Tuning {
    #[arg(long)]
    stiffness: Option<f32>,
    #[arg(long)]
    mass: Option<f32>,
    #[arg(long)]
    damping: Option<f32>,
    #[arg(long)]
    gravity: Option<f32>,
    /// Disable squash and stretch
    #[arg(long)]
    no_stretch: bool,
    #[arg(long)]
    side_stretch: Option<f32>,
    #[arg(long)]
    front_stretch: Option<f32>,
    /// Lower Euler limits as pitch,yaw,roll degrees, compared in [0, 360)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    lower_angle: Option<Vec3>,
    /// Upper Euler limits as pitch,yaw,roll degrees, compared in [0, 360)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    upper_angle: Option<Vec3>,
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    lower_scale: Option<Vec3>,
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    upper_scale: Option<Vec3>,
    /// Emit debug rays (logged at trace level)
    #[arg(long)]
    debug: bool,
}

impl Tuning {
    fn params(&self) -> JiggleParams {
        let mut p = JiggleParams::default();
        if let Some(v) = self.stiffness { p.stiffness = v; }
        if let Some(v) = self.mass { p.mass = v; }
        if let Some(v) = self.damping { p.damping = v; }
        if let Some(v) = self.gravity { p.gravity = v; }
        if let Some(v) = self.side_stretch { p.side_stretch = v; }
        if let Some(v) = self.front_stretch { p.front_stretch = v; }
        if let Some(v) = self.lower_angle { p.lower_angular_limit = v; }
        if let Some(v) = self.upper_angle { p.upper_angular_limit = v; }
        if let Some(v) = self.lower_scale { p.lower_scale_limit = v; }
        if let Some(v) = self.upper_scale { p.upper_scale_limit = v; }
        p.stretch = !self.no_stretch;
        p.debug_render = self.debug;
        p
    }
}

/// Parses `x,y,z`; components accept `inf` and `-inf`.
fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected three comma-separated numbers, got '{}'", s));
    };
    let num = |v: &str| v.parse::<f32>().map_err(|e| format!("'{}': {}", v, e));
    Ok(Vec3::new(num(*x)?, num(*y)?, num(*z)?))
}

/// Forwards debug rays to the log.
#[derive(Default)]
struct LogSink {
    rays: usize,
}

impl DebugSink for LogSink {
    fn draw_ray(&mut self, ray: DebugRay) {
        self.rays += 1;
        log::trace!("ray {:?} {} -> {}", ray.color, ray.origin, ray.end());
    }
}

fn render_table(trace: &Trace) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "scenario: {} (dt={:.4}s)", trace.scenario, trace.dt);
    let _ = writeln!(out, "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7}", "frame", "time", "disp", "angle", "pitch", "yaw", "roll", "len");
    for s in &trace.samples {
        let len = s.scale.map_or(1.0, |v| v.z);
        let _ = writeln!(
            out,
            "{:>6} {:>8.3} {:>8.4} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>7.3}",
            s.frame, s.time, s.displacement, s.angle_from_bind_deg, s.euler_deg.x, s.euler_deg.y, s.euler_deg.z, len
        );
    }
    let summary = trace.summary();
    let _ = writeln!(
        out,
        "frames={} peak_disp={:.4} final_angle={:.2}deg settled={}",
        summary.frames, summary.peak_displacement, summary.final_angle_from_bind_deg, summary.settled
    );
    out
}

fn render(trace: &Trace, format: Format) -> Result<String> {
    Ok(match format {
        Format::Table => render_table(trace),
        Format::Json => export::to_json(trace)?,
        Format::Csv => export::to_csv(trace),
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Run { scenario: name, tuning, format, out } => {
            let scn = scenario::resolve(&name)?;
            let params = tuning.params();
            let mut sink = LogSink::default();
            let trace = scenario::run(&scn, params, Some(&mut sink))?;
            if params.debug_render {
                log::debug!("emitted {} debug rays", sink.rays);
            }
            let text = render(&trace, format)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {} frames to {}", trace.samples.len(), path.display());
                }
                None => print!("{}", text),
            }
        }
        Command::Presets => {
            for (name, about) in scenario::PRESETS {
                println!("{:<8} {}", name, about);
            }
        }
        Command::Inspect { path } => {
            let scn = scenario::load_from_path(&path)?;
            println!("Loaded scenario: {}", scn.name);
            println!("  frames: {} (dt={:.4}s, {:.2}s total)", scn.frames, scn.dt, scn.duration());
            println!("  interpolation: {:?}", scn.interpolation);
            println!("  bone offset: {}, bind rotation: {} deg", scn.bone_offset, scn.bind_rotation_deg);
            for key in &scn.keys {
                println!("  key @{}: translation={} rotation={} deg", key.frame, key.translation, key.rotation_deg);
            }
        }
    }
    Ok(())
}
