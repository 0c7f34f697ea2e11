use clap::Parser;
use frontcheck::{collections, decode_record, Config, Error, UnknownKeys};
use serde_yaml::Value;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Checks one content entry's frontmatter, read from stdin, against a
/// declared collection and prints the validated record as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Manifest file
    #[arg(short, long, default_value_t = String::from(frontcheck::config::DEFAULT_MANIFEST))]
    manifest: String,

    /// Collection to validate against (defaults to the manifest's)
    #[arg(short, long)]
    collection: Option<String>,

    /// What to do with keys the schema does not declare
    #[arg(short, long, value_enum)]
    unknown_keys: Option<UnknownKeys>,

    /// Print the declared collections instead of validating
    #[arg(long)]
    print_schema: bool,
}

fn run(args: Args) -> frontcheck::Result<()> {
    let config = Config::load(Path::new(&args.manifest))?;
    let unknown_keys = args.unknown_keys.unwrap_or(config.unknown_keys);
    let declared = collections().with_unknown_keys(unknown_keys);

    if args.print_schema {
        println!("{}", serde_json::to_string_pretty(&declared)?);
        return Ok(());
    }

    let collection = args.collection.unwrap_or(config.collection);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let record = decode_record(&input)?;
    let validated = declared.validate(&collection, &record)?;
    info!(collection = %collection, fields = validated.len(), "entry is valid");

    println!("{}", serde_json::to_string_pretty(&Value::Mapping(validated))?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Validation(e)) => {
            error!(path = %e.path(), reason = %e.reason(), "frontmatter failed validation");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
