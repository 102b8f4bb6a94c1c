use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use modaps::{Client, CoordsMode, ProductFilter, SearchCriteria, format_product};
use std::path::PathBuf;

/// What to do with the MODAPS service.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Search the MODAPS database for files matching the search parameters.
    Search,
    /// List MODAPS products, optionally filtered with --term.
    List,
    /// Download the files given with --pid.
    Download,
}

/// Command-line arguments for the MODAPS client.
#[derive(Parser, Debug)]
#[command(
    name = "modaps",
    version,
    about = "Searches, lists, and downloads MODAPS products.",
    allow_negative_numbers = true
)]
struct Args {
    /// What to do: search for files, list products, or download files.
    #[arg(short, long, value_enum, default_value_t = Mode::Search)]
    mode: Mode,
    /// Search term for list mode. Wildcards (*) are supported, e.g. 'M*D09GA'. Case-insensitive.
    #[arg(short, long, default_value = "")]
    term: String,
    /// North boundary: -90 to 90 for coordinates, 0 to 17 for tiles.
    #[arg(short, long)]
    north: Option<f64>,
    /// South boundary: -90 to 90 for coordinates, 0 to 17 for tiles.
    #[arg(short, long)]
    south: Option<f64>,
    /// East boundary: -180 to 180 for coordinates, 0 to 35 for tiles.
    #[arg(short, long)]
    east: Option<f64>,
    /// West boundary: -180 to 180 for coordinates, 0 to 35 for tiles.
    #[arg(short, long)]
    west: Option<f64>,
    /// Coordinate mode. With 'global' the boundary values are ignored by the service.
    #[arg(short, long, value_enum, default_value_t = CoordsMode::Coords)]
    coords: CoordsMode,
    /// Start date of search. YYYY-MM-DD or YYYY-MM-DD hh:mm:ss
    #[arg(long)]
    start: Option<String>,
    /// End date of search. YYYY-MM-DD or YYYY-MM-DD hh:mm:ss
    #[arg(long)]
    end: Option<String>,
    /// Product name, e.g. MOD09GA.
    #[arg(short = 'p', long, default_value = "")]
    name: String,
    /// Download destination. A file for a single ID; a directory for several IDs, or whenever
    /// it names an existing directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Comma delimited list of file IDs to download.
    #[arg(long)]
    pid: Option<String>,
    /// MODAPS service base URL (overrides MODAPS_URL and .modapsrc).
    #[arg(long)]
    url: Option<String>,
    /// Do not show a progress spinner while downloading.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria::new(self.name.as_str())
            .with_mode(self.coords)
            .with_time_range(self.start.clone(), self.end.clone())
            .with_bounds(self.north, self.south, self.east, self.west)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let client = Client::new(args.url.clone(), None)
        .context("failed to configure MODAPS client")?
        .with_progress(!args.quiet);
    info!("Using MODAPS service at {}", client.base_url());

    match args.mode {
        Mode::List => list(&client, &args)?,
        Mode::Search => search(&client, &args)?,
        Mode::Download => download(&client, &args)?,
    }

    println!("Done.");
    Ok(())
}

fn list(client: &Client, args: &Args) -> Result<()> {
    let filter = ProductFilter::new(&args.term)
        .with_context(|| format!("invalid search term '{}'", args.term))?;
    if !args.term.is_empty() {
        info!("Search term: {}", args.term);
    }

    let products = client
        .list_products()
        .context("failed to fetch the MODAPS product list")?;
    for product in filter.apply(&products) {
        println!("{}", format_product(product));
    }
    Ok(())
}

fn search(client: &Client, args: &Args) -> Result<()> {
    let criteria = args.criteria();
    let ids = client
        .search_files(&criteria)
        .with_context(|| format!("search for product '{}' failed", criteria.product))?;
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

fn download(client: &Client, args: &Args) -> Result<()> {
    let Some(pid) = args.pid.as_deref().filter(|p| !p.trim().is_empty()) else {
        bail!("download mode needs file IDs: pass them with --pid, e.g. --pid 1412536410");
    };

    let written = client
        .download(pid, args.output.as_deref())
        .with_context(|| format!("failed to download file(s) {}", pid))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["modaps"]).unwrap();
        assert_eq!(args.mode, Mode::Search);
        assert_eq!(args.coords, CoordsMode::Coords);
        assert!(args.term.is_empty());
        assert_eq!(args.north, None);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_negative_bounds_and_short_flags() {
        let args = Args::try_parse_from([
            "modaps", "-p", "mod09ga", "-n", "10", "-s", "-10.5", "-e", "20", "-w", "-20", "-c",
            "coords",
        ])
        .unwrap();
        let bounds = args.criteria().effective_bounds();
        assert_eq!(bounds.south, -10.5);
        assert_eq!(bounds.west, -20.0);
        assert_eq!(args.name, "mod09ga");
    }

    #[test]
    fn test_tiles_criteria_from_args() {
        let args = Args::try_parse_from(["modaps", "--coords", "tiles", "--north", "90"]).unwrap();
        let bounds = args.criteria().effective_bounds();
        assert_eq!(bounds.north, 90.0);
        assert_eq!(bounds.east, 35.0);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Args::try_parse_from(["modaps", "--mode", "upload"]).is_err());
    }
}
