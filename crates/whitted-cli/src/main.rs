//! whitted CLI - render scene files with the recursive ray tracer
//!
//! Renders a TOML/JSON scene (or the built-in reference scene) to a PNG.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use whitted_ir::{Format, SceneDocument, ShapeDef};
use whitted_trace::{render, Camera, Scene};

#[derive(Parser)]
#[command(name = "whitted")]
#[command(about = "Whitted-style recursive ray tracer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to a PNG image
    Render {
        /// Scene file (.toml or .json); the reference scene if omitted
        scene: Option<PathBuf>,
        /// Output image
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,
        /// Cells per side of the image grid
        #[arg(short, long)]
        resolution: Option<u32>,
        /// Average four samples per pixel
        #[arg(short, long)]
        antialias: bool,
        /// Recursion bound for reflected and refracted rays
        #[arg(long)]
        max_depth: Option<u32>,
    },
    /// Display information about a scene file
    Info {
        /// Scene file (.toml or .json)
        file: PathBuf,
    },
    /// Write the reference scene as a scene file
    Reference {
        /// Output file (format determined by extension: .toml, .json);
        /// TOML on stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Command-line overrides of the document's render settings.
#[derive(Debug, Default)]
struct Overrides {
    resolution: Option<u32>,
    antialias: bool,
    max_depth: Option<u32>,
}

impl Overrides {
    fn apply(&self, doc: &mut SceneDocument) {
        if let Some(resolution) = self.resolution {
            doc.camera.resolution = resolution;
        }
        if self.antialias {
            doc.render.antialias = true;
        }
        if let Some(max_depth) = self.max_depth {
            doc.render.max_depth = max_depth;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            resolution,
            antialias,
            max_depth,
        } => {
            let overrides = Overrides {
                resolution,
                antialias,
                max_depth,
            };
            render_file(scene.as_deref(), &output, &overrides)?;
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
        Commands::Reference { output } => {
            write_reference(output.as_deref())?;
        }
    }

    Ok(())
}

fn load_document(path: Option<&Path>) -> Result<SceneDocument> {
    match path {
        Some(path) => SceneDocument::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display())),
        None => {
            log::info!("no scene given, using the reference scene");
            Ok(SceneDocument::reference())
        }
    }
}

fn render_file(scene_path: Option<&Path>, output: &Path, overrides: &Overrides) -> Result<()> {
    let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("png") {
        anyhow::bail!("Unknown output format: {:?} (expected .png)", ext);
    }

    let mut doc = load_document(scene_path)?;
    overrides.apply(&mut doc);

    let scene = Scene::from_document(&doc).context("Invalid scene")?;
    let camera = Camera::from_document(&doc).context("Invalid camera")?;
    let fb = render(&scene, &camera);

    let img = image::RgbImage::from_raw(fb.width(), fb.height(), fb.to_rgb8())
        .context("Framebuffer does not match image size")?;
    img.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Rendered {}x{} image to {}",
        fb.width(),
        fb.height(),
        output.display()
    );
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let doc = SceneDocument::load(file)
        .with_context(|| format!("Failed to load scene {}", file.display()))?;

    println!("whitted scene: {}", file.display());
    let c = &doc.camera;
    println!(
        "  Camera: eye {:?}, plane {}x{} at {}, {}x{} cells",
        c.eye, c.width, c.height, c.distance, c.resolution, c.resolution
    );
    println!("  Light: {:?}", doc.light.position);
    println!(
        "  Render: max depth {}, antialias {}, background {:?}",
        doc.render.max_depth, doc.render.antialias, doc.render.background
    );
    match &doc.fog {
        Some(fog) => println!(
            "  Fog: z {} to {}{}",
            fog.near,
            fog.far,
            if fog.clamp { " (clamped)" } else { "" }
        ),
        None => println!("  Fog: none"),
    }

    if !doc.objects.is_empty() {
        println!("\nObjects:");
        for (i, object) in doc.objects.iter().enumerate() {
            let name = object.name.as_deref().unwrap_or("unnamed");
            println!("  {}: {} {}{}", i, shape_label(&object.shape), name, effects(object));
        }
    }

    match Scene::from_document(&doc) {
        Ok(scene) => println!("\nPrimitives: {}", scene.len()),
        Err(e) => println!("\nFailed to build scene: {}", e),
    }

    Ok(())
}

fn shape_label(shape: &ShapeDef) -> &'static str {
    match shape {
        ShapeDef::Sphere { .. } => "sphere",
        ShapeDef::Plane { .. } => "plane",
        ShapeDef::Cylinder { .. } => "cylinder",
        ShapeDef::Cone { .. } => "cone",
        ShapeDef::Cube { .. } => "cube",
    }
}

fn effects(object: &whitted_ir::ObjectDef) -> String {
    let m = &object.material;
    let mut parts = Vec::new();
    if let Some(r) = m.reflection {
        parts.push(format!("reflection {r}"));
    }
    if let Some(t) = m.transparency {
        parts.push(format!("transparency {t}"));
    }
    if let Some(r) = &m.refraction {
        parts.push(format!("refraction {} (index {})", r.coeff, r.index));
    }
    if m.checker.is_some() {
        parts.push("checker".to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}

fn write_reference(output: Option<&Path>) -> Result<()> {
    let doc = SceneDocument::reference();
    match output {
        Some(path) => {
            doc.save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote reference scene to {}", path.display());
        }
        None => print!("{}", doc.render(Format::Toml)?),
    }
    Ok(())
}
