use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use log::{ error, info, LevelFilter };

use whitted_tracer::camera::CameraBuilder;
use whitted_tracer::canvas::ImageWriter;
use whitted_tracer::color::Color;
use whitted_tracer::consts::DEFAULT_OUT_FILE;
use whitted_tracer::scene::{ Scene, SceneJson };
use whitted_tracer::tracer::BasicRayTracer;

/// Renders a JSON scene description to a PPM image.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Scene description file (JSON).
    #[clap(short, long)]
    scene: PathBuf,

    /// Where to write the rendered image.
    #[clap(short, long, default_value = DEFAULT_OUT_FILE)]
    output: PathBuf,

    /// Worker threads, 0 renders on the main thread. Overrides the scene file.
    #[clap(short, long)]
    threads: Option<usize>,

    /// Rays per pixel side. Overrides the scene file.
    #[clap(long)]
    supersampling: Option<usize>,

    /// Use adaptive supersampling.
    #[clap(long)]
    adaptive: bool,

    /// Draw grid lines every N pixels over the finished render.
    #[clap(long)]
    grid: Option<usize>,

    /// Log level: off, error, warn, info, debug or trace.
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(args: Args) -> whitted_tracer::Result<()> {
    let scene_json = SceneJson::load(&args.scene)?;
    let camera_json = scene_json.camera.clone();
    let scene = Arc::new(Scene::try_from(scene_json)?);
    info!("loaded scene '{}' from {}", scene.name, args.scene.display());

    let [nx, ny] = camera_json.resolution;
    let mut builder = CameraBuilder::from_json(&camera_json)?
        .image_writer(ImageWriter::new(args.output.clone(), nx, ny))
        .ray_tracer(BasicRayTracer::new(Arc::clone(&scene)));

    if let Some(threads) = args.threads {
        builder = builder.threads(threads);
    }
    if let Some(n) = args.supersampling {
        builder = builder.supersampling(n);
    }
    if args.adaptive {
        builder = builder.adaptive(true);
    }

    let mut camera = builder.build()?;
    camera.render_image()?;

    if let Some(interval) = args.grid {
        camera.print_grid(interval, Color::white())?;
    }

    camera.write_to_image()
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        Env::default().default_filter_or(args.log_level.to_string())
    ).init();

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}
