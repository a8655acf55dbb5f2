mod output;
mod request;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use meet_core::config::{load_config, load_or_default, CONFIG_FILE_NAME};
use meet_core::links::SharedSearch;
use meet_core::ports::Geocoder;
use meet_core::providers::build_travel_time_provider;
use meet_core::{MeetingSearch, SortPreference};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "meet",
    version,
    about = "Find a meeting place that is fair for everyone."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank venues for a group of participants.
    Search(SearchArgs),
    /// Print a shareable link for a request file.
    Share(ShareArgs),
    /// Decode a shared link into a request (JSON on stdout).
    OpenLink(OpenLinkArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Fairness,
    Speed,
}

impl From<SortArg> for SortPreference {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Fairness => SortPreference::Fairness,
            SortArg::Speed => SortPreference::Speed,
        }
    }
}

#[derive(Debug, Parser)]
struct SearchArgs {
    /// Request file (participants, query, filters, optional gazetteer).
    #[arg(long)]
    request: PathBuf,

    /// Venue catalog (JSON array of venues).
    #[arg(long)]
    catalog: PathBuf,

    /// Search config (default: ./meet.toml if present).
    #[arg(long, env = "MEET_CONFIG")]
    config: Option<PathBuf>,

    /// Override the request's sort preference.
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Print the full outcome as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Geocode addresses with a Nominatim endpoint instead of the gazetteer.
    #[cfg(feature = "nominatim")]
    #[arg(long, env = "MEET_NOMINATIM")]
    nominatim: Option<String>,
}

#[derive(Debug, Parser)]
struct ShareArgs {
    #[arg(long)]
    request: PathBuf,

    /// Base URL the parameters are appended to.
    #[arg(long, default_value = "http://localhost:8080/")]
    base: String,
}

#[derive(Debug, Parser)]
struct OpenLinkArgs {
    url: String,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Search(args) => cmd_search(args),
        Command::Share(args) => cmd_share(args),
        Command::OpenLink(args) => cmd_open_link(args),
    }
}

fn cmd_search(args: SearchArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_or_default(&PathBuf::from(CONFIG_FILE_NAME))?,
    };
    debug!(?config, "search config");

    let file = request::load_request(&args.request)?;
    let catalog = request::load_catalog(&args.catalog)?;
    let geocoder = build_geocoder(&args, &file)?;
    let travel_times =
        build_travel_time_provider(&config.travel_time_provider, config.cache_capacity);

    let mut search_request = file.search;
    if let Some(sort) = args.sort {
        search_request.sort_preference = sort.into();
    }

    let search = MeetingSearch::new(geocoder, Arc::new(catalog), travel_times, config);
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let outcome = runtime
        .block_on(search.run(&search_request))
        .context("meeting search failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", output::render_text(&outcome));
    }
    Ok(())
}

fn build_geocoder(
    args: &SearchArgs,
    file: &request::RequestFile,
) -> anyhow::Result<Arc<dyn Geocoder>> {
    #[cfg(feature = "nominatim")]
    if let Some(endpoint) = &args.nominatim {
        let user_agent = concat!("meet/", env!("CARGO_PKG_VERSION"));
        let geocoder = meet_core::providers::nominatim::NominatimGeocoder::new(endpoint, user_agent)
            .context("build Nominatim client")?;
        return Ok(Arc::new(geocoder));
    }
    #[cfg(not(feature = "nominatim"))]
    let _ = args;
    Ok(Arc::new(file.gazetteer()?))
}

fn cmd_share(args: ShareArgs) -> anyhow::Result<()> {
    let file = request::load_request(&args.request)?;
    let url = SharedSearch::from_request(&file.search)?.to_url(&args.base)?;
    println!("{url}");
    Ok(())
}

fn cmd_open_link(args: OpenLinkArgs) -> anyhow::Result<()> {
    let request = SharedSearch::parse(&args.url)
        .context("decode shared link")?
        .into_request();
    let file = request::RequestFile {
        search: request,
        gazetteer: Vec::new(),
    };
    println!("{}", serde_json::to_string_pretty(&file)?);
    Ok(())
}
