use clap::Parser;
use std::path::PathBuf;

/// Pull the first HTML and plain-text bodies out of a MIME email.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the raw email (RFC 822 / MIME text).
    pub email_file: Option<PathBuf>,

    /// Directory to write extracted-email.html and extracted-email.txt into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Print an outline of the MIME part tree before extracting.
    #[arg(long)]
    pub tree: bool,
}
