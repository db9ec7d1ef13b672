//! Config snapshot setup: load, apply CLI overrides, validate.

use anyhow::Context;
use quickmark_core::Config;
use std::path::{Path, PathBuf};

use super::WatermarkArgs;

/// Build the frozen config for a batch from the base config and CLI flags.
pub fn build_config(args: &WatermarkArgs, base: Config) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let path = expand(path);
            Config::load_from(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => base,
    };

    apply_overrides(&mut config, args);
    config.check()?;

    let watermark = config.watermark_path();
    if !watermark.is_file() {
        anyhow::bail!(
            "Watermark image not found: {}\n\n  \
             Hint: pass --watermark <FILE> or set watermark.filename in `quickmark config path`.",
            watermark.display()
        );
    }

    if let Some(dir) = config.saving_dir() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
    }

    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &WatermarkArgs) {
    if let Some(path) = &args.watermark {
        config.watermark.filename = expand(path);
    }
    if let Some(dir) = &args.output_dir {
        config.output.saving_path = Some(expand(dir));
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if let Some(position) = args.position {
        config.watermark.position = position.into();
    }
    if let Some(opacity) = args.opacity {
        config.watermark.opacity = opacity;
    }
    if let Some(suffix) = &args.suffix {
        config.output.suffix = suffix.clone();
    }
    if let Some(author) = &args.author {
        config.metadata.author_name = author.clone();
    }
    if let Some(copyright) = &args.copyright {
        config.metadata.copyright = copyright.clone();
    }
    if let Some(width) = args.max_width {
        config.output.max_width = width;
    }
    if let Some(height) = args.max_height {
        config.output.max_height = height;
    }
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = parallel;
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
