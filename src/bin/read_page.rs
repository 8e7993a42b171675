//! Read a comic page from disk and print the recognized dialogue
//! Run with: cargo run --release --features tesseract --bin read_page -- <image_path> [--annotate out.png]

use anyhow::{Context, Result};
use comic_reader::{Config, Lexicon, PageReader, TesseractEngine};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "comic_reader=info".to_string()),
        ))
        .with_target(false)
        .init();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path> [--annotate out.png]", args[0]);
        std::process::exit(1);
    }

    let image_path = &args[1];
    let mut annotate_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--annotate" | "-a" => {
                if i + 1 < args.len() {
                    annotate_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    if !Path::new(image_path).exists() {
        eprintln!("Image not found: {}", image_path);
        std::process::exit(1);
    }

    // Initialize capabilities; any of these missing is fatal
    let config = Arc::new(Config::new().context("Failed to load configuration")?);
    let lexicon = Arc::new(
        Lexicon::load(Path::new(&config.normalize.word_list_path))
            .context("Failed to load word list")?,
    );
    let engine =
        Arc::new(TesseractEngine::new("eng").context("Failed to initialize Tesseract")?);
    let reader = PageReader::new(config, engine, lexicon);

    info!("Loading image: {}", image_path);
    let image = image::open(image_path)?;
    info!("Image dimensions: {}x{}", image.width(), image.height());

    if let Some(out) = annotate_path {
        let annotated = reader.annotate(&image)?;
        annotated
            .save(&out)
            .with_context(|| format!("Failed to write {}", out))?;
        info!("Annotated page written to {}", out);
    }

    let script = reader.read_page(&image)?;

    println!("\n=== Page script ===");
    if script.is_empty() {
        println!("  (no dialogue recognized)");
    } else {
        for (i, line) in script.iter().enumerate() {
            println!("  {}. {}", i + 1, line);
        }
    }

    Ok(())
}
