// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Connect to the ECoS and generate every page
// 4. Optionally check the links between the generated pages
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod checker;       // src/checker/ - verifies links in the generated pages
mod cli;           // src/cli.rs - command-line parsing
mod ecos;          // src/ecos/ - ECoSNet protocol client
mod generator;     // src/generator/ - crawl and HTML output

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use ecos::EcosClient;
use generator::{HelpGenerator, PageRecord};
use serde::Serialize;
use std::path::Path;
use tracing::Level;

// What --json prints
#[derive(Serialize)]
struct Summary<'a> {
    output_dir: &'a Path,
    pages: &'a [PageRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<&'a checker::LinkReport>,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = pages written (and all links fine, with --check)
//   Ok(1) = --check found broken links
//   Err   = connection, protocol or filesystem error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let client = EcosClient::connect(&cli.ecos_ip, cli.port).await?;
    let mut generator = HelpGenerator::new(client, &cli.output_dir);
    generator.build().await?;

    let report = if cli.check {
        Some(checker::check_output(&cli.output_dir)?)
    } else {
        None
    };

    if cli.json {
        let summary = Summary {
            output_dir: &cli.output_dir,
            pages: generator.pages(),
            links: report.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&cli.output_dir, generator.pages(), report.as_ref());
    }

    Ok(exit_code(report.as_ref()))
}

// 1 only when a link check ran and found broken links
fn exit_code(report: Option<&checker::LinkReport>) -> i32 {
    let broken = report.is_some_and(|r| !r.is_ok());
    if broken {
        1
    } else {
        0
    }
}

// Logs go to stderr so --json output on stdout stays clean
fn init_logging(quiet: bool) {
    let max_level = if quiet { Level::WARN } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(output_dir: &Path, pages: &[PageRecord], report: Option<&checker::LinkReport>) {
    println!("📄 Wrote {} page(s) to {}", pages.len(), output_dir.display());

    let Some(report) = report else {
        return;
    };

    println!(
        "🔗 Checked {} link(s) on {} page(s)",
        report.links_checked, report.pages_checked
    );
    for broken in &report.broken {
        println!("   ❌ {}: {} ({})", broken.page, broken.href, broken.reason);
    }
    if report.is_ok() {
        println!("✅ All links resolve");
    }
}
