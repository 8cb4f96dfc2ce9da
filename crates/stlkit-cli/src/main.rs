//! stlkit CLI - read an STL file and report its solids.
//!
//! ASCII files are parsed and summarized, optionally exported as JSON.
//! Binary files are recognized and left undecoded.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use stlkit::{ParseOptions, StlContent, VertexPolicy};

#[derive(Parser)]
#[command(name = "stlkit")]
#[command(about = "Read an ASCII STL file and report its solids", long_about = None)]
struct Cli {
    /// Path to the STL file
    file: PathBuf,
    /// Write the parsed document as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Require exactly three vertices per facet
    #[arg(long)]
    triangles: bool,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            vertex_policy: if self.triangles {
                VertexPolicy::Triangle
            } else {
                VertexPolicy::UntilEndloop
            },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    for line in run(&cli)? {
        println!("{line}");
    }
    Ok(())
}

/// Read, summarize and optionally export one file. Returns the report lines.
fn run(cli: &Cli) -> Result<Vec<String>> {
    let mut report = vec![format!("Filename: {}", cli.file.display())];

    let content = stlkit::read_stl_file(&cli.file, cli.parse_options())
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    match content {
        StlContent::Ascii(parsed) => {
            report.push("Format: text".to_string());
            report.extend(parsed.events.iter().map(ToString::to_string));

            let odd = parsed.document.non_triangles().count();
            if odd > 0 {
                tracing::warn!(facets = odd, "facets that are not triangles");
            }

            if let Some(output) = &cli.output {
                export(&parsed.document, output)?;
                report.push(format!("Exported JSON to {}", output.display()));
            }
        }
        StlContent::Binary { len } => {
            report.push(format!("Format: binary ({len} bytes, not decoded)"));
        }
    }

    report.push("Done.".to_string());
    Ok(report)
}

fn export(doc: &stlkit::Document, output: &Path) -> Result<()> {
    stlkit::write_json(doc, output)
        .with_context(|| format!("failed to write {}", output.display()))
}
