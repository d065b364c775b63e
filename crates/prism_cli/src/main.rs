use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::output::{save_image, write_ppm};
use prism_renderer::{Camera, CameraConfig, RenderConfig};

mod cli;
mod scene;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Prism");

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("Failed to configure render threads")?;
    }

    let (world, scene_camera) = scene::build_scene(args.scene, args.seed);

    let base = match &args.config {
        Some(path) => load_camera_config(path)?,
        None => scene_camera,
    };
    let camera = Camera::initialize(apply_overrides(base, &args))
        .context("Invalid camera configuration")?;

    let config = RenderConfig {
        seed: args.seed,
        parallel: !args.sequential,
        bucket_size: args.bucket_size,
    };
    let image = camera.render(&world, &config);

    match &args.output {
        Some(path) => save_image(&image, path)
            .with_context(|| format!("Failed to save {}", path.display()))?,
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            write_ppm(&image, &mut writer).context("Failed to write image to stdout")?;
        }
    }

    log::info!("Done");
    Ok(())
}

/// Read camera settings from a JSON file.
fn load_camera_config(path: &Path) -> Result<CameraConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read camera config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse camera config {}", path.display()))?;
    log::info!("Loaded camera config from {}", path.display());
    Ok(config)
}

/// Apply command line overrides on top of a base camera config.
fn apply_overrides(mut config: CameraConfig, args: &Args) -> CameraConfig {
    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(aspect_ratio) = args.aspect_ratio {
        config.aspect_ratio = aspect_ratio;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(vfov) = args.vfov {
        config.vfov = vfov;
    }
    if let Some(defocus_angle) = args.defocus_angle {
        config.defocus_angle = defocus_angle;
    }
    if let Some(focus_dist) = args.focus_dist {
        config.focus_dist = focus_dist;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from(["prism", "--width", "64", "--samples", "2", "--defocus-angle", "0"]);
        let config = apply_overrides(scene::default_camera(), &args);

        assert_eq!(config.image_width, 64);
        assert_eq!(config.samples_per_pixel, 2);
        assert_eq!(config.defocus_angle, 0.0);
        // Untouched settings keep the scene's values
        assert_eq!(config.vfov, 20.0);
        assert_eq!(config.max_depth, 50);
    }

    #[test]
    fn test_load_camera_config() {
        let path = std::env::temp_dir().join(format!("prism_camera_{}.json", std::process::id()));
        fs::write(&path, r#"{ "image_width": 48, "vfov": 35.0 }"#).unwrap();

        let config = load_camera_config(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.image_width, 48);
        assert_eq!(config.vfov, 35.0);
    }

    #[test]
    fn test_missing_camera_config() {
        assert!(load_camera_config(Path::new("/nonexistent/prism.json")).is_err());
    }
}
