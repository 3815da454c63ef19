use std::{env, fs, path::Path};

use anyhow::Context;
use dotenvy::dotenv;
use quickslide_tools::{
    batch::{build_generate_request, dynamic_columns, label_created, valid_rows},
    models::api::ExportFormat,
    ClientConfig, QuickSlideClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example batch_upload -- <SPREADSHEET> [TEMPLATE_ID] [--export]");
        eprintln!("Set QUICKSLIDE_API_URL and QUICKSLIDE_TOKEN in your environment or .env file.");
        return Ok(());
    }
    let template_id = args.get(2).and_then(|id| id.parse::<u64>().ok());
    let export = args.iter().any(|arg| arg == "--export");

    let config = ClientConfig::from_env()?;
    log::info!("Using backend {}", config.base_url);
    let mut client = QuickSlideClient::from_config(config);

    let rows = client
        .upload_batch_file(Path::new(&args[1]))
        .await
        .context("uploading spreadsheet")?;
    println!("Rows: {} ({} valid)", rows.len(), valid_rows(&rows).count());
    println!("Extra columns: {:?}", dynamic_columns(&rows));
    for row in &rows {
        let status = if row.is_error {
            row.error_message.as_deref().unwrap_or("error")
        } else {
            "ok"
        };
        println!("  {:<30} {}", row.name, status);
    }

    let request = build_generate_request(&rows, template_id, None)?;
    let outcome = client.generate_batch(&request).await?;
    if let Some(warning) = &outcome.warning {
        println!("Warning: {}", warning);
    }

    let created = label_created(&rows, &outcome.created);
    client.store_mut().set_created_presentations(&created)?;
    for presentation in &created {
        println!("Created #{}: {}", presentation.id, presentation.title);
    }

    if export {
        let files = client.export_many(&created, "batch", ExportFormat::Pdf, None).await?;
        for file in files {
            fs::write(&file.file_name, &file.bytes).with_context(|| format!("writing {}", file.file_name))?;
            println!("Saved {}", file.file_name);
        }
    }

    Ok(())
}
