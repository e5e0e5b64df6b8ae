use crate::cli::Cli;
use crate::config::OutputTargets;
use crate::errors::ExtractError;
use crate::extract;
use crate::mime;
use crate::types::SavedPart;
use anyhow::{Context, Result};
use clap::CommandFactory;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let Some(path) = cli.email_file.as_deref() else {
        println!("{}", Cli::command().render_usage());
        return Ok(ExitCode::from(1));
    };
    let targets = OutputTargets::in_dir(&cli.out_dir);

    let raw = read_input(path).context("loading email")?;
    info!(path = %path.display(), bytes = raw.len(), "Read email");
    let message = mime::parse_message_lossy(&mime::decode_lossy(&raw));

    println!("📧 Email: {}", message.summary.subject_or_default());
    println!("From: {}", message.summary.from_or_default());
    println!("Content-Type: {}", message.summary.content_type);
    println!();

    if cli.tree {
        print!("{}", mime::outline(&message.root));
        println!();
    }

    let extraction = extract::extract(&message);
    let (html, text) =
        extract::write_outputs(&extraction, &targets).context("saving extracted parts")?;

    report(html.as_ref(), "HTML");
    report(text.as_ref(), "text");

    println!();
    println!("Next step:");
    println!(
        "  ./test-email.sh {} {}",
        targets.html_path().display(),
        targets.text_path().display()
    );

    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<Vec<u8>, ExtractError> {
    fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn report(saved: Option<&SavedPart>, label: &str) {
    match saved {
        Some(part) => {
            println!("✅ Saved {} to: {}", label, part.path.display());
            println!("   Size: {} bytes", part.size_bytes);
        }
        None => println!("⚠️  No {} part found", label),
    }
}
