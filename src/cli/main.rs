use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use icon_forge::config::Config;
use icon_forge::encoder::IconEncoder;
use icon_forge::ico::{self, IconFile};
use icon_forge::presets::SizePreset;
use icon_forge::raster::Raster;
use icon_forge::sizes::SizeList;

#[derive(Parser, Debug)]
#[command(
    name = "icon-forge",
    version,
    about = "Multi-resolution Windows ICO builder — resample an image to standard icon sizes and pack them as PNG entries"
)]
struct Cli {
    /// Source image (PNG, JPEG or WebP)
    #[arg(value_name = "IMAGE")]
    input: Option<PathBuf>,

    /// Output .ico path (default: next to the input, or the configured directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Size preset: 2048, 1024, 512, 256 or 128
    #[arg(short, long, value_name = "PRESET")]
    preset: Option<SizePreset>,

    /// Explicit sizes, e.g. "256,128,64" (overrides --preset)
    #[arg(short, long, value_name = "LIST", allow_hyphen_values = true)]
    sizes: Option<SizeList>,

    /// Path to config file (default: icon-forge.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default icon-forge.json and exit
    #[arg(long)]
    init: bool,

    /// Print the directory of an existing .ico file and exit
    #[arg(long, value_name = "ICO")]
    inspect: Option<PathBuf>,

    /// Resample and compress sizes in parallel
    #[arg(long)]
    parallel: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    force: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    // Handle --inspect
    if let Some(ref ico_path) = cli.inspect {
        let bytes = std::fs::read(ico_path)
            .with_context(|| format!("Failed to read {}", ico_path.display()))?;
        let icon = ico::read_icon(&bytes)
            .with_context(|| format!("{} is not a valid icon file", ico_path.display()))?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&inspect_json(ico_path, &icon))?);
        } else {
            print_directory(ico_path, &icon, bytes.len());
        }
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("No input image specified. Use --help for usage.");
    };

    // Load config
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.parallel {
        config.encoder.parallel = true;
    }
    if cli.force {
        config.output.overwrite = true;
    }

    let sizes = match (cli.sizes, cli.preset) {
        (Some(sizes), _) => sizes,
        (None, Some(preset)) => preset.size_list(),
        (None, None) => config.preset.size_list(),
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_path_for(input));
    if output.exists() && !config.output.overwrite {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            output.display()
        );
    }

    let source = Raster::open(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    log::info!(
        "Source: {} ({}x{})",
        input.display(),
        source.width(),
        source.height()
    );
    if source.width() != source.height() {
        log::warn!("Source is not square; every size will be stretched to a square");
    }
    log::info!("Sizes: {sizes}");

    let encoder = IconEncoder::new()
        .parallel(config.encoder.parallel)
        .overwrite(config.output.overwrite);
    let container = encoder
        .encode_to_file(&source, sizes.as_slice(), &output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    // JSON output
    if cli.json {
        let entries: Vec<serde_json::Value> = container
            .payloads()
            .iter()
            .zip(container.entries())
            .map(|(payload, entry)| {
                serde_json::json!({
                    "size": payload.size,
                    "bytes": entry.byte_len,
                    "offset": entry.offset,
                })
            })
            .collect();
        let report = serde_json::json!({
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "total_bytes": container.len(),
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // Summary
    log::info!(
        "Done: {} images, {} bytes -> {}",
        container.entries().len(),
        container.len(),
        output.display()
    );

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print the header and directory of a parsed icon as a table.
fn print_directory(path: &Path, icon: &IconFile<'_>, file_len: usize) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("  {:<22} : {:?}", "Type", icon.kind);
    println!("  {:<22} : {}", "Images", icon.entries.len());
    println!("  {:<22} : {file_len}", "Bytes");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    println!(
        "  {BOLD}{:>3}  {:>9}  {:>6}  {:>4}  {:>10}  {:>10}  {:<6}{RESET}",
        "#", "size", "fields", "bpp", "offset", "bytes", "format"
    );
    for (i, entry) in icon.entries.iter().enumerate() {
        let format = if icon.is_png(i) { "PNG" } else { "BMP" };
        println!(
            "  {:>3}  {:>9}  {:>6}  {:>4}  {:>10}  {:>10}  {:<6}",
            i,
            payload_dimensions(icon, i),
            format!("{}/{}", entry.width, entry.height),
            entry.bits_per_pixel,
            entry.offset,
            entry.byte_len,
            format
        );
    }
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    println!();
}

/// Real dimensions of a PNG payload, falling back to the directory fields.
fn payload_dimensions(icon: &IconFile<'_>, index: usize) -> String {
    let decoded = icon
        .payload(index)
        .filter(|_| icon.is_png(index))
        .and_then(|data| image::load_from_memory_with_format(data, image::ImageFormat::Png).ok());
    match decoded {
        Some(img) => format!("{}x{}", img.width(), img.height()),
        None => {
            let entry = &icon.entries[index];
            format!("{}x{}", entry.pixel_width(), entry.pixel_height())
        }
    }
}

fn inspect_json(path: &Path, icon: &IconFile<'_>) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = icon
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::json!({
                "dimensions": payload_dimensions(icon, i),
                "width_field": entry.width,
                "height_field": entry.height,
                "bits_per_pixel": entry.bits_per_pixel,
                "offset": entry.offset,
                "bytes": entry.byte_len,
                "png": icon.is_png(i),
            })
        })
        .collect();
    serde_json::json!({
        "path": path.display().to_string(),
        "type": format!("{:?}", icon.kind),
        "entries": entries,
    })
}
