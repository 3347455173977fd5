use clap::{Arg, ArgAction, Command};
use multilingual::store::MemoryStore;
use multilingual::{
    ClientType, ResolveReport, Resolver, ResolverConfig, load_document_from_file,
    load_records_from_file, load_schemas_from_file,
};
use multilingual_client::HttpStore;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("multilingual")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve translatable fields in a JSON document against a translation store")
        .arg(
            Arg::new("input")
                .help("JSON document to resolve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("client")
                .long("client")
                .short('c')
                .help("Client type: WEB, APP, ADMIN or OPEN_API")
                .required(true),
        )
        .arg(
            Arg::new("schemas")
                .long("schemas")
                .short('s')
                .help("Schema registry file describing the translatable record types")
                .required(true),
        )
        .arg(
            Arg::new("store-url")
                .long("store-url")
                .short('u')
                .help("Translation service base URL (default: $MULTILINGUAL_STORE_URL)")
                .conflicts_with("fixture"),
        )
        .arg(
            Arg::new("fixture")
                .long("fixture")
                .short('f')
                .help("Resolve against translation records from a local JSON file"),
        )
        .arg(
            Arg::new("pointer")
                .long("pointer")
                .short('p')
                .help("JSON pointer to the data inside the document (default: whole document)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Resolver configuration file (default: read from environment)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline progress and print the report to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    let input = matches
        .get_one::<String>("input")
        .ok_or("missing INPUT")?;
    let client_type: ClientType = matches
        .get_one::<String>("client")
        .ok_or("missing --client")?
        .parse()?;
    let schemas = matches
        .get_one::<String>("schemas")
        .ok_or("missing --schemas")?;
    let pointer = matches
        .get_one::<String>("pointer")
        .map(String::as_str)
        .unwrap_or_default();

    let registry = load_schemas_from_file(Path::new(schemas))?;
    let mut document = load_document_from_file(Path::new(input))?;
    let config = match matches.get_one::<String>("config") {
        Some(path) => ResolverConfig::from_file(Path::new(path))?,
        None => ResolverConfig::from_env()?,
    };

    let report = if let Some(fixture) = matches.get_one::<String>("fixture") {
        let records = load_records_from_file(Path::new(fixture))?;
        let store = Arc::new(MemoryStore::from_records(records));
        let resolver = Resolver::new(Arc::clone(&store)).with_config(config);
        let report = resolver
            .resolve_json(client_type, &registry, &mut document, pointer)
            .await?;

        if verbose {
            for record in store.untranslated(client_type)? {
                eprintln!("⏳ Pending: {}", record.composite_key());
            }
        }
        report
    } else {
        let store = match matches.get_one::<String>("store-url") {
            Some(url) => HttpStore::new(url.as_str())?,
            None => HttpStore::from_env().map_err(|e| {
                eprintln!("❌ {}", e);
                eprintln!("   Pass --store-url, or --fixture to resolve against a local file");
                e
            })?,
        };
        Resolver::new(store)
            .with_config(config)
            .resolve_json(client_type, &registry, &mut document, pointer)
            .await?
    };

    if verbose {
        print_report(&report);
    }
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

fn print_report(report: &ResolveReport) {
    eprintln!("📋 Conditions:  {}", report.conditions);
    eprintln!("📦 Records:     {}", report.records);
    eprintln!("✅ Translated:  {}", report.translated);
    eprintln!("🌱 Initialized: {}", report.initialized);
    if report.degraded {
        eprintln!("⚠️  Lookup failed; document returned untranslated");
    }
}
