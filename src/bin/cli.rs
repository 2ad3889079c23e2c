// CLI binary: failures print to stderr and exit non-zero.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unreachable, clippy::indexing_slicing)]

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use glam::Vec4;
use serde_json::Value;

use noisetex::config::{self, RenderConfig};
use noisetex::error::ConfigError;
use noisetex::noise::PerlinKernel;
use noisetex::render::{self, Frame};
use noisetex::svm::noise_node::evaluate_dimensions;
use noisetex::svm::{eval_nodes, NoiseDimensions, RegisterStack, ShaderProgram};
use noisetex::texture::NoiseResult;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "noisetex-cli", about = "Fractal noise texture evaluator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the noise texture at a single point
    Eval {
        /// Noise dimensionality (1-4)
        #[arg(long, default_value_t = 3)]
        dimensions: u32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        y: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        z: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        w: f32,
        #[arg(long, default_value_t = 5.0)]
        scale: f32,
        #[arg(long, default_value_t = 2.0)]
        detail: f32,
        #[arg(long, default_value_t = 0.0)]
        distortion: f32,
        /// Also compute the color output
        #[arg(long)]
        color: bool,
    },
    /// Render a texture image (PPM with --color, PGM otherwise)
    Render {
        #[command(flatten)]
        overrides: RenderOverrides,
        /// Output image path
        #[arg(long, short)]
        out: PathBuf,
        /// Write the effective config next to the image
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
    /// Execute a JSON node program and print stack slots
    Run {
        /// Program file ({"nodes": [[u32; 4], ...]})
        program: PathBuf,
        /// Stack slots to print, comma separated
        #[arg(long, value_delimiter = ',')]
        slots: Vec<u32>,
    },
    /// Print the render config JSON Schema
    Schema,
    /// Render repeatedly and report timing
    Bench {
        #[command(flatten)]
        overrides: RenderOverrides,
        #[arg(long, default_value_t = 10)]
        iterations: usize,
    },
}

#[derive(clap::Args)]
struct RenderOverrides {
    /// Base config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    dimensions: Option<u32>,
    #[arg(long)]
    scale: Option<f32>,
    #[arg(long)]
    detail: Option<f32>,
    #[arg(long)]
    distortion: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    w: Option<f32>,
    #[arg(long)]
    color: bool,
}

impl RenderOverrides {
    fn resolve(&self) -> Result<RenderConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => RenderConfig::default(),
        };
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.dimensions {
            config.dimensions = v;
        }
        if let Some(v) = self.scale {
            config.params.scale = v;
        }
        if let Some(v) = self.detail {
            config.params.detail = v;
        }
        if let Some(v) = self.distortion {
            config.params.distortion = v;
        }
        if let Some(v) = self.w {
            config.w = v;
        }
        config.color |= self.color;
        config.validate()?;
        Ok(config)
    }
}

// ── Subcommands ──────────────────────────────────────────────────

fn eval_point(
    dimensions: u32,
    p: Vec4,
    scale: f32,
    detail: f32,
    distortion: f32,
    color: bool,
) -> Result<NoiseResult, ConfigError> {
    let dimensions = NoiseDimensions::try_from(dimensions)?;
    let p = p * scale;
    Ok(evaluate_dimensions(
        &PerlinKernel,
        dimensions,
        p.truncate(),
        p.w,
        detail,
        distortion,
        color,
    ))
}

fn write_frame(frame: &Frame, path: &Path) -> Result<(), ConfigError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    if frame.colors.is_some() {
        render::write_ppm(frame, &mut out)?;
    } else {
        render::write_pgm(frame, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn run_program(path: &Path, slots: &[u32]) -> Result<Value, ConfigError> {
    let program: ShaderProgram = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut stack = RegisterStack::new();
    eval_nodes(&PerlinKernel, &program, &mut stack)?;

    let dump: serde_json::Map<String, Value> = slots
        .iter()
        .map(|&slot| (slot.to_string(), serde_json::json!(stack.load_float(slot))))
        .collect();
    Ok(Value::Object(dump))
}

#[allow(clippy::cast_precision_loss)]
fn run_bench(config: &RenderConfig, iterations: usize) -> Result<(), ConfigError> {
    use std::time::Instant;

    let pixels = config.width as usize * config.height as usize;
    eprintln!(
        "[noisetex] {}x{} {}D, detail {}, {} iteration(s)",
        config.width, config.height, config.dimensions, config.params.detail, iterations
    );

    let start = Instant::now();
    for _ in 0..iterations {
        render::render(&PerlinKernel, config)?;
    }
    let elapsed = start.elapsed();

    let per_frame = elapsed.as_secs_f64() / iterations.max(1) as f64;
    let per_pixel_ns = per_frame * 1e9 / pixels.max(1) as f64;
    eprintln!("[noisetex] {:.3} ms/frame, {per_pixel_ns:.1} ns/pixel", per_frame * 1e3);
    Ok(())
}

fn run(command: Commands) -> Result<(), ConfigError> {
    match command {
        Commands::Eval { dimensions, x, y, z, w, scale, detail, distortion, color } => {
            let p = Vec4::new(x, y, z, w);
            let result = eval_point(dimensions, p, scale, detail, distortion, color)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Render { overrides, out, save_config } => {
            let config = overrides.resolve()?;
            let frame = render::render(&PerlinKernel, &config)?;
            write_frame(&frame, &out)?;
            if let Some(path) = save_config {
                config::save_config(&path, &config)?;
            }
            eprintln!("[noisetex] wrote {}", out.display());
        }
        Commands::Run { program, slots } => {
            let dump = run_program(&program, &slots)?;
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&config::config_schema())?);
        }
        Commands::Bench { overrides, iterations } => {
            let config = overrides.resolve()?;
            run_bench(&config, iterations)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use noisetex::texture::{tex_noise_1d, tex_noise_3d};

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn eval_rejects_bad_dimensions() {
        let err = eval_point(0, Vec4::ZERO, 1.0, 0.0, 0.0, false);
        assert!(matches!(err, Err(ConfigError::Svm(_))));
    }

    #[test]
    fn eval_scales_the_point() {
        let result = eval_point(3, Vec4::new(0.1, 0.2, 0.3, 0.0), 2.0, 1.0, 0.0, true).unwrap();
        let expected = tex_noise_3d(&PerlinKernel, Vec3::new(0.1, 0.2, 0.3) * 2.0, 1.0, 0.0, true);
        assert_eq!(result, expected);
    }

    #[test]
    fn eval_one_d_reads_scaled_w() {
        let p = Vec4::new(0.1, 0.2, 0.3, 0.7);
        let result = eval_point(1, p, 2.0, 2.0, 0.5, false).unwrap();
        let expected = tex_noise_1d(&PerlinKernel, 0.7 * 2.0, 2.0, 0.5, false);
        assert_eq!(result, expected);
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let cli = Cli::parse_from([
            "noisetex-cli",
            "bench",
            "--width",
            "8",
            "--detail",
            "0.5",
            "--color",
        ]);
        let Commands::Bench { overrides, .. } = cli.command else {
            unreachable!("parsed a different subcommand");
        };
        let config = overrides.resolve().unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, RenderConfig::default().height);
        assert_eq!(config.params.detail, 0.5);
        assert!(config.color);
    }
}
