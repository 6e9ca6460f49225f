//! swift-log-features entrypoint: one extraction per run, rows written to stdout as NDJSON.

use chrono::Utc;
use clap::Parser;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use swift_log_features::{
    config::ExtractorConfig,
    features::FeatureExtractor,
    logging::{RowRecord, StructuredLogger},
    query::{DateRange, LogScope},
    ElasticClient,
};
use tracing::info;

/// Extract per-node 30-second feature rows from Swift logs in Elasticsearch
#[derive(Parser, Debug)]
#[command(name = "swift-log-features")]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// JSON configuration file (defaults apply when missing)
    #[arg(long, env = "SWIFT_FEATURES_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Range start (inclusive), ISO-8601
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// Range end (inclusive), ISO-8601
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Without --start/--end: extract the last N minutes
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(i64).range(1..))]
    last_minutes: i64,

    /// Include every service, not just object/container/account/proxy servers
    #[arg(long)]
    all_logs: bool,

    /// Elasticsearch base URL
    #[arg(long, env = "SWIFT_ES_URL")]
    url: Option<String>,

    /// Index holding the log events
    #[arg(long, env = "SWIFT_ES_INDEX")]
    index: Option<String>,

    #[arg(long, env = "SWIFT_ES_USER")]
    user: Option<String>,

    #[arg(long, env = "SWIFT_ES_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print the search request body and exit
    #[arg(long)]
    print_query: bool,
}

impl CliArgs {
    fn apply(&self, config: &mut ExtractorConfig) {
        if let Some(url) = &self.url {
            config.elastic.url = url.clone();
        }
        if let Some(index) = &self.index {
            config.elastic.index = index.clone();
        }
        if self.user.is_some() {
            config.elastic.user = self.user.clone();
        }
        if self.password.is_some() {
            config.elastic.password = self.password.clone();
        }
    }

    fn date_range(&self) -> swift_log_features::Result<DateRange> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Ok(DateRange::new(start.as_str(), end.as_str())),
            _ => DateRange::ending_at(Utc::now(), self.last_minutes),
        }
    }

    fn scope(&self) -> LogScope {
        if self.all_logs {
            LogScope::AllLog
        } else {
            LogScope::MainLog
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = CliArgs::parse();
    let mut config = ExtractorConfig::load(&args.config)?;
    args.apply(&mut config);

    StructuredLogger::init(config.log.json, &config.log.level);

    let range = args.date_range()?;
    let scope = args.scope();
    let client = ElasticClient::new(&config.elastic)?;
    let extractor = FeatureExtractor::new(client, config.query.clone());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.print_query {
        let body = extractor.request_body(&range, scope);
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        out.flush()?;
        return Ok(());
    }

    info!(
        url = %extractor.backend().search_url(),
        scope = scope.as_str(),
        start = %range.start,
        end = %range.end,
        "extraction starting"
    );
    let tables = extractor.extract(&range, scope)?;
    for table in tables.values() {
        for row in &table.rows {
            StructuredLogger::emit_json(
                &RowRecord {
                    node: &table.node,
                    row,
                },
                &mut out,
            )?;
        }
    }
    out.flush()?;
    Ok(())
}
