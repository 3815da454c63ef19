use std::{env, fs};

use anyhow::Context;
use quickslide_tools::{
    geometry::{apply_layout_variant, starter_elements, LayoutVariant},
    LayoutDocument, QuickCreateDraft, ResolveOptions,
};

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level.
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example resolve_preview -- <CONTENT_FILE> [LAYOUT_JSON_FILE]");
        return Ok(());
    }

    let content = fs::read_to_string(&args[1]).with_context(|| format!("reading {}", args[1]))?;
    let layout = match args.get(2) {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            LayoutDocument::from_json(&json).with_context(|| format!("parsing layout {}", path))?
        }
        None => {
            log::info!("No layout given, using the starter layout");
            LayoutDocument::new(apply_layout_variant(&starter_elements(), LayoutVariant::TitleTopSingleColumn))
        }
    };

    let draft = QuickCreateDraft::new("Subject", "Lesson", content);
    let slides = draft.preview(&[layout.clone()], false, &ResolveOptions::new());
    log::info!("Resolved {} slide(s)", slides.len());

    for (i, slide) in slides.iter().enumerate() {
        println!("--- Slide {}: {} ---", i + 1, slide.title);
        for el in &layout.elements {
            let value = slide.value(el.id).unwrap_or("");
            println!("  [{:?} #{}] {}", el.element_type, el.slot_index.unwrap_or(0), value);
        }
    }

    match draft.request_payload(&quickslide_tools::LayoutSource::Single(layout)) {
        Ok(request) => println!("\nRequest:\n{}", serde_json::to_string_pretty(&request)?),
        Err(e) => log::warn!("Cannot build a quick-create request: {}", e),
    }

    Ok(())
}
