mod bootstrap;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use posts_core::settings::{Command, Settings};
use posts_data::pipeline::load_and_prepare;
use posts_notebook::NotebookPatcher;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("linkedin-posts v{} starting", env!("CARGO_PKG_VERSION"));

    match &settings.command {
        Command::Inspect { path, head, output } => {
            let table = load_and_prepare(path)
                .with_context(|| format!("Failed to load posts from {}", path.display()))?;

            print!("{}", report::render_inspection(&table, *head));

            if let Some(output) = output {
                table.write_json(output)?;
                println!("\nWrote {} rows to {}", table.len(), output.display());
            }
        }

        Command::PatchNotebooks { .. } => {
            let paths = settings.command.notebook_paths();
            tracing::info!("Patching {} notebooks", paths.len());

            let patcher = NotebookPatcher::new();
            let total_modified = patcher.patch_all(&paths, |notebook_report| {
                for line in report::render_patch_report(notebook_report) {
                    println!("{}", line);
                }
            })?;

            print!("{}", report::render_patch_summary(total_modified));
        }
    }

    Ok(())
}
