use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use invoice_core::editor::{EditorHandle, InvoiceEditor, LogoSource};
use invoice_core::print::{print_invoice, FilePrintSink};
use invoice_core::render::{render_text, RenderFormat, RenderOptions};
use invoice_core::{AppConfig, Invoice};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Render a saved invoice draft to the print spool
#[derive(Parser, Debug)]
#[command(name = "invoice-print", version, about)]
struct Cli {
    /// Invoice draft as JSON
    draft: PathBuf,

    /// Image file to use as the invoice logo
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Document format written to the spool
    #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
    format: RenderFormat,
}

/// Renders a saved invoice draft and writes it to the print spool.
///
/// A text preview of the same snapshot is printed to stdout.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let args = Cli::parse();
    let config = AppConfig::from_env()?;

    let raw = tokio::fs::read_to_string(&args.draft)
        .await
        .with_context(|| format!("Failed to read draft {}", args.draft.display()))?;
    let draft: Invoice = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid invoice draft {}", args.draft.display()))?;

    info!(
        "Loaded draft {:?} with {} line item(s)",
        draft.invoice_number,
        draft.items.len()
    );

    let (editor, editor_task) = EditorHandle::spawn(
        InvoiceEditor::from_invoice(draft),
        config.editor_queue_depth,
        config.logo_max_bytes,
    );

    if let Some(logo) = args.logo {
        let applied = editor.load_logo(LogoSource::File(logo)).await?;
        if !applied {
            warn!("Logo was not applied; keeping the draft's logo, if any");
        }
    }

    let invoice = editor.snapshot().await?;
    drop(editor);
    editor_task.await?;

    let options = RenderOptions::from(&config);
    let sink = FilePrintSink::new(&config.print_output_dir);
    let receipt = print_invoice(&invoice, &options, args.format, &sink)?;

    print!("{}", render_text(&invoice, &options));
    info!("Wrote {} ({} bytes)", receipt.location, receipt.bytes);

    Ok(())
}
