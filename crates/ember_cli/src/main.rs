use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ember_renderer::{
    render, save_png, write_ppm, Camera, JobLayout, RandomSource, RenderConfig, Scene,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod scenes;

/// Built-in scenes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneChoice {
    Example,
    Random,
    RandomDark,
    SimpleLight,
    CornellBox,
}

impl SceneChoice {
    fn build(self, rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
        match self {
            SceneChoice::Example => scenes::example(rng, aspect_ratio),
            SceneChoice::Random => scenes::random(rng, aspect_ratio),
            SceneChoice::RandomDark => scenes::random_dark(rng, aspect_ratio),
            SceneChoice::SimpleLight => scenes::simple_light(rng, aspect_ratio),
            SceneChoice::CornellBox => scenes::cornell_box(rng, aspect_ratio),
        }
    }
}

/// Render one of the Ember demo scenes.
///
/// Writes an ASCII PPM to stdout unless `--output` is given; a `.png`
/// output path produces a PNG instead.
#[derive(Debug, Parser)]
#[command(name = "ember", version)]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneChoice::CornellBox)]
    scene: SceneChoice,

    /// Width of the rendered image
    #[arg(short = 'w', long, default_value_t = 600)]
    width: u32,

    /// Width divided by height
    #[arg(long, default_value_t = 1.0)]
    aspect_ratio: f32,

    /// Samples per pixel
    #[arg(short = 's', long, default_value_t = 50)]
    samples: u32,

    /// Maximum number of bounces per path
    #[arg(short = 'd', long, default_value_t = 50)]
    depth: u32,

    /// Number of worker threads
    #[arg(short = 't', long, default_value_t = 8)]
    threads: usize,

    /// Rows per job, for full-width strip jobs
    #[arg(long, default_value_t = 1, conflicts_with = "tile_size")]
    rows_per_job: u32,

    /// Edge length of square tile jobs
    #[arg(long)]
    tile_size: Option<u32>,

    /// Seed for scene generation and BVH construction
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file (.png for PNG, anything else for PPM)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl Args {
    fn height(&self) -> u32 {
        (self.width as f32 / self.aspect_ratio) as u32
    }

    fn render_config(&self) -> RenderConfig {
        let layout = match self.tile_size {
            Some(size) => JobLayout::Tiles(size),
            None => JobLayout::Rows(self.rows_per_job),
        };
        RenderConfig {
            width: self.width,
            height: self.height(),
            samples_per_pixel: self.samples,
            max_depth: self.depth,
            thread_count: self.threads,
            layout,
        }
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if !(args.aspect_ratio.is_finite() && args.aspect_ratio > 0.0) {
        anyhow::bail!("aspect ratio must be a positive number, got {}", args.aspect_ratio);
    }
    let config = args.render_config();

    log::info!("Building scene {:?} (seed {})", args.scene, args.seed);
    let start = Instant::now();
    let mut rng = RandomSource::new(args.seed);
    let (scene, camera) = args.scene.build(&mut rng, args.aspect_ratio);
    log::info!("Scene built in {:?}", start.elapsed());

    let image = render(&scene, &camera, &config).context("Failed to render scene")?;

    match &args.output {
        Some(path) if is_png(path) => {
            save_png(&image, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_ppm(&image, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            write_ppm(&image, BufWriter::new(io::stdout().lock()))
                .context("Failed to write image to stdout")?;
        }
    }

    if let Some(path) = &args.output {
        log::info!("Wrote {}", path.display());
    }
    log::info!("Total time {:?}", start.elapsed());

    Ok(())
}
