//! Command-line front end: generate the marbles scene, export its
//! GLSL tables, and render it.

use anyhow::{bail, Context, Result};
use marbles_render::{
    generate, render_parallel, save_png, save_ppm, Camera, SceneTables,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod settings;

use settings::RenderSettings;

const USAGE: &str = "\
usage: marbles [options]

options:
    --settings <file>   load settings from a JSON file
    --width <px>        image width (height follows the aspect ratio)
    --samples <n>       samples per pixel
    --depth <n>         maximum bounce depth
    --seed <n>          rng seed for scene generation and sampling
    --tables <path|->   write the GLSL scene tables (- for stdout)
    --output <file>     image output path (.png or .ppm)
    --no-render         generate and export the scene, skip rendering
    --help              show this help
";

struct Args {
    settings_path: Option<PathBuf>,
    width: Option<u32>,
    samples: Option<u32>,
    depth: Option<u32>,
    seed: Option<u64>,
    tables: Option<String>,
    output: Option<PathBuf>,
    no_render: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        settings_path: None,
        width: None,
        samples: None,
        depth: None,
        seed: None,
        tables: None,
        output: None,
        no_render: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .with_context(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--settings" => args.settings_path = Some(PathBuf::from(value("--settings")?)),
            "--width" => args.width = Some(value("--width")?.parse()?),
            "--samples" => args.samples = Some(value("--samples")?.parse()?),
            "--depth" => args.depth = Some(value("--depth")?.parse()?),
            "--seed" => args.seed = Some(value("--seed")?.parse()?),
            "--tables" => args.tables = Some(value("--tables")?),
            "--output" => args.output = Some(PathBuf::from(value("--output")?)),
            "--no-render" => args.no_render = true,
            "--help" | "-h" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                eprint!("{USAGE}");
                bail!("unknown argument: {other}");
            }
        }
    }

    Ok(args)
}

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.settings_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing settings from {}", path.display()))?
        }
        None => RenderSettings::default(),
    };

    // Flags override the settings file
    if let Some(width) = args.width {
        settings.image_width = width;
    }
    if let Some(samples) = args.samples {
        settings.render.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        settings.render.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    if settings.image_width == 0 {
        bail!("image width must be positive");
    }

    Ok(settings)
}

fn write_tables(tables: &SceneTables, target: &str) -> Result<()> {
    if target == "-" {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        tables.write_glsl(&mut lock)?;
        lock.flush()?;
    } else {
        let mut file = std::fs::File::create(target)
            .with_context(|| format!("creating table file {target}"))?;
        tables.write_glsl(&mut file)?;
        log::info!("scene tables written to {target}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let settings = load_settings(&args)?;

    // Scene generation
    let mut rng = settings.scene_rng();
    let scene = generate(&settings.scene, &mut rng);
    let tables = SceneTables::build(&scene.spheres);
    log::info!(
        "scene: {} spheres ({} diffuse, {} mirror, {} metal, {} glass)",
        scene.spheres.len(),
        tables.diffuse.len(),
        tables.mirror.len(),
        tables.metal.len(),
        tables.dielectric.len(),
    );

    if let Some(target) = &args.tables {
        write_tables(&tables, target)?;
    }

    if args.no_render {
        return Ok(());
    }

    // Camera
    let (width, height) = settings.resolution();
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(settings.look_from, settings.look_at, settings.vup)
        .with_lens(settings.vfov, settings.defocus_angle, settings.focus_dist);
    camera.initialize();

    // Render
    let world = scene.world();
    log::info!(
        "rendering {}x{} @ {} spp, depth {}",
        width,
        height,
        settings.render.samples_per_pixel,
        settings.render.max_depth
    );
    let start = Instant::now();
    let image = render_parallel(&camera, &world, &settings.render, settings.seed);
    log::info!("rendered in {:.2?}", start.elapsed());

    // Save
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from("marbles.png"));
    save_image(&image, &output)?;
    log::info!("image written to {}", output.display());

    Ok(())
}

fn save_image(image: &marbles_render::ImageBuffer, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ppm") => save_ppm(image, path)?,
        Some("png") | None => save_png(image, path)?,
        Some(other) => bail!("unsupported image format: .{other}"),
    }
    Ok(())
}
