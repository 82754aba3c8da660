//! Print the OpenAPI document as JSON, to stdout or to `--output`.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use experience_backend::doc::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Parser)]
#[command(about = "Dump the placement experience OpenAPI document")]
struct Cli {
    /// Write the document to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))?;
    match cli.output {
        Some(path) => fs::write(path, json),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
