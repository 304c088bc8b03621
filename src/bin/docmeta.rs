//! docmeta: command-line front end for the metadata engine.
//!
//! Reads and rewrites the metadata of .docx, .pptx and .xlsx files.

use clap::{Parser, Subcommand};
use docmeta::{DocumentKind, EditRequest, EditSet, MetadataEditor, UnknownFieldPolicy};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docmeta")]
#[command(author, version, about = "Read and rewrite Office document metadata")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metadata of a document as YAML
    Show {
        /// Input document
        file: PathBuf,

        /// Document kind, extension or MIME type (default: from the file extension)
        #[arg(short, long)]
        kind: Option<DocumentKind>,
    },

    /// Rewrite metadata fields and save the result
    Set {
        /// Input document
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Document kind, extension or MIME type (default: from the file extension)
        #[arg(short, long)]
        kind: Option<DocumentKind>,

        /// Field assignment, e.g. `title=Q3 report` or `custom:Client=Acme`
        #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// New author (core `creator`)
        #[arg(long)]
        author: Option<String>,

        /// New last-modified-by
        #[arg(long)]
        last_modified_by: Option<String>,

        /// How to treat field names outside the schema (default: environment, then reject)
        #[arg(long, value_enum)]
        unknown_fields: Option<UnknownFieldPolicy>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { file, kind } => cmd_show(&file, kind)?,
        Commands::Set {
            file,
            output,
            kind,
            set,
            author,
            last_modified_by,
            unknown_fields,
        } => {
            let mut edits = EditSet::from_author_fields(author.as_deref(), last_modified_by.as_deref());
            for (name, value) in set {
                edits.push(name, value);
            }
            cmd_set(&file, &output, kind, edits, unknown_fields)?;
        },
    }
    Ok(())
}

fn cmd_show(file: &Path, kind: Option<DocumentKind>) -> Result<(), Box<dyn std::error::Error>> {
    let kind = resolve_kind(file, kind)?;
    let bytes = std::fs::read(file)?;

    let metadata = MetadataEditor::from_env().inspect(&bytes, kind)?;
    print!("{}", serde_saphyr::to_string(&metadata)?);
    Ok(())
}

fn cmd_set(
    file: &Path,
    output: &Path,
    kind: Option<DocumentKind>,
    edits: EditSet,
    unknown_fields: Option<UnknownFieldPolicy>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = resolve_kind(file, kind)?;
    let bytes = std::fs::read(file)?;

    let mut config = MetadataEditor::from_env().config().clone();
    if let Some(policy) = unknown_fields {
        config = config.with_unknown_fields(policy);
    }
    let editor = MetadataEditor::new(config);

    let fields = edits.len();
    let request = EditRequest::new(&bytes, kind).with_edits(edits);
    let rewritten = editor.edit(&request)?;

    std::fs::write(output, &rewritten)?;
    info!(
        input = %file.display(),
        output = %output.display(),
        fields,
        bytes = rewritten.len(),
        "Metadata written"
    );
    Ok(())
}

/// The explicit kind, or the one the file extension implies.
fn resolve_kind(file: &Path, kind: Option<DocumentKind>) -> Result<DocumentKind, String> {
    let kind = match kind {
        Some(kind) => kind,
        None => file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentKind::from_extension)
            .ok_or_else(|| {
                format!(
                    "Cannot tell the document kind of {}; pass --kind",
                    file.display()
                )
            })?,
    };
    debug!(file = %file.display(), kind = %kind, mime = kind.mime_type(), "Document kind");
    Ok(kind)
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}
