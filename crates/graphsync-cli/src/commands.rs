use crate::input;
use crate::RecordArgs;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use graphsync_core::{render_update, ContextNamespaces, Serializer};
use graphsync_ingest::{JsonLdWriter, NdjsonReader, OrganizationMap, RecordDecoder};
use graphsync_transport::config::ENV_UPDATE_URL;
use graphsync_transport::{
    parse_header, BatchLoader, BatchReport, MemorySink, SparqlUpdateClient, TransportConfig,
};
use std::io::{self, Write};
use std::path::Path;

// ============================================================================
// Shared setup
// ============================================================================

fn pipeline(args: &RecordArgs) -> Result<(RecordDecoder, Serializer)> {
    let namespaces = ContextNamespaces::new(args.context_base.as_str());
    let placeholder = namespaces.unmapped_organization();
    let organizations = match &args.org_map {
        Some(path) => OrganizationMap::from_path(path, placeholder)
            .with_context(|| format!("loading organization map {}", path.display()))?,
        None => OrganizationMap::new(placeholder),
    };

    let mut serializer = Serializer::new(namespaces);
    if let Some(date) = args.date {
        serializer = serializer.with_valid_on(date);
    }
    Ok((RecordDecoder::new(organizations), serializer))
}

fn print_report(verb: &str, report: &BatchReport) {
    let status = if report.failed == 0 {
        "ok".green().bold()
    } else {
        "failed".red().bold()
    };
    eprintln!(
        "{} {} {} records ({} statements); {} failed, {} skipped",
        status,
        verb,
        report.succeeded,
        report.statements,
        report.failed,
        report.skipped
    );
}

// ============================================================================
// serialize
// ============================================================================

pub(crate) fn cmd_serialize(args: &RecordArgs) -> Result<()> {
    let (decoder, serializer) = pipeline(args)?;
    let mut reader = NdjsonReader::new(input::open(args.input.as_deref())?);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut report = BatchReport::default();

    for line in reader.by_ref() {
        let line = line.context("reading input")?;
        let statements = decoder
            .decode_record(&line.value)
            .map_err(anyhow::Error::from)
            .and_then(|record| serializer.serialize(&record).map_err(anyhow::Error::from));
        match statements {
            Ok(statements) => {
                report.succeeded += 1;
                report.statements += statements.len();
                writeln!(out, "{}", render_update(&statements))?;
            }
            Err(error) => {
                report.failed += 1;
                tracing::error!(line = line.line_number, %error, "record failed");
            }
        }
    }
    out.flush()?;
    report.skipped = reader.skipped();

    print_report("serialized", &report);
    Ok(())
}

// ============================================================================
// load
// ============================================================================

pub(crate) fn cmd_load(
    args: &RecordArgs,
    update_url: Option<String>,
    headers: &[String],
    max_retries: Option<u32>,
    dry_run: bool,
) -> Result<()> {
    let (decoder, serializer) = pipeline(args)?;
    let source = input::open(args.input.as_deref())?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let report = if dry_run {
        let loader = BatchLoader::new(decoder, serializer, MemorySink::new());
        let report = runtime.block_on(loader.load(source))?;
        let store = loader.sink().snapshot();
        eprintln!(
            "{} dry run: {} quads across {} graphs",
            "note".yellow().bold(),
            store.len(),
            store.graphs().len()
        );
        report
    } else {
        let mut config = TransportConfig::from_lookup(|key| match key {
            ENV_UPDATE_URL => update_url.clone(),
            _ => std::env::var(key).ok(),
        })?;
        for raw in headers {
            let (name, value) = parse_header(raw)?;
            config = config.with_header(name, value);
        }
        if let Some(n) = max_retries {
            config = config.with_max_retries(n);
        }
        tracing::info!(url = %config.update_url, "loading records");
        let client = SparqlUpdateClient::new(config)?;
        let loader = BatchLoader::new(decoder, serializer, client);
        runtime.block_on(loader.load(source))?
    };

    print_report("loaded", &report);
    if report.failed > 0 {
        return Err(anyhow!("{} record(s) failed to load", report.failed));
    }
    Ok(())
}

// ============================================================================
// jsonld
// ============================================================================

pub(crate) fn cmd_jsonld(input_path: Option<&Path>, context: Option<&Path>) -> Result<()> {
    let mut reader = NdjsonReader::new(input::open(input_path)?);
    let mut writer = JsonLdWriter::new(io::BufWriter::new(io::stdout().lock()));
    if let Some(path) = context {
        writer = writer.with_context(input::read_json(path)?);
    }

    for line in reader.by_ref() {
        writer.put(line.context("reading input")?.value);
    }
    let records = writer.len();
    writer.close().context("writing JSON-LD document")?;

    eprintln!(
        "{} wrote {} records ({} skipped)",
        "ok".green().bold(),
        records,
        reader.skipped()
    );
    Ok(())
}
