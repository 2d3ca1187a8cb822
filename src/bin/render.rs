use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use meshtrace::renderer::Renderer;
use meshtrace::{Descent, Intersector, Scene, Strategy};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Render the surface normals of a scene as seen from its camera.
#[derive(Parser)]
#[command(name = "render")]
struct Args {
    /// Scene description (.json)
    scene: PathBuf,

    /// Output image; the format follows the extension
    output: PathBuf,

    /// 0 (naive), 1 (aabb), 2 (bvh) or 3 (two-level-bvh)
    strategy: Strategy,

    /// How rays walk down the trees in strategies 2 and 3
    #[arg(long, default_value = "first-fit")]
    descent: Descent,

    /// Number of worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Render on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Log the scene-level tree before rendering
    #[arg(long)]
    print_bvh: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let scene = Scene::load(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;
    if args.print_bvh {
        tracing::info!("scene tree:\n{}", scene.dump_bvh());
    }

    let intersector = Intersector::with_descent(args.strategy, args.descent);
    tracing::info!("Intersection type: {}", args.strategy);
    if args.strategy.uses_scene_tree() {
        tracing::info!("Descent: {}", args.descent);
    }

    let mut renderer = Renderer::new(intersector);
    if args.sequential {
        renderer = renderer.sequential();
    }

    let progress = ProgressBar::new(scene.resolution.1 as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{elapsed_precise} [{bar:40}] {pos}/{len} rows")
            .context("bad progress template")?,
    );

    let start = Instant::now();
    let film = match args.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            renderer.render_with_pool(&scene, &progress, &pool)
        }
        None => renderer.render(&scene, &progress),
    };
    let elapsed = start.elapsed();
    tracing::info!("Render Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    film.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
