use std::path::PathBuf;

use discretbox::{io::Driver, AllocationPolicy, Containment, Neighborhood, ShapeKind};

/// Discretize study regions, overlay regressors and build travel-time matrices
#[derive(clap::Parser, Debug)]
#[command(name = "discretbox", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Cover a region with hexagonal or rectangular cells (forbids stdout)
    Discretize(DiscretizeArgs),

    /// Redistribute regressor attributes onto a discretization (forbids stdout)
    Overlay(OverlayArgs),

    /// Build the travel-time matrix between cell centers (forbids stdout)
    TravelTimes(TravelTimesArgs),
}

#[derive(clap::Args, Debug)]
pub struct DiscretizeArgs {
    /// Region file (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub region: PathBuf,

    /// Output discretization (.geojson or .csv)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Cell shape: hexagon or rectangle
    #[arg(long, default_value = "hexagon")]
    pub shape: ShapeKind,

    /// H3 resolution (0-15) for hexagons
    #[arg(long, default_value_t = 8)]
    pub resolution: u8,

    /// Which hexagons count as inside the region: covers or centroid
    #[arg(long, default_value = "covers")]
    pub containment: Containment,

    /// Rectangle columns
    #[arg(long, default_value_t = 10)]
    pub nx: usize,

    /// Rectangle rows
    #[arg(long, default_value_t = 10)]
    pub ny: usize,

    /// Rectangle adjacency: 4 (rook) or 8 (queen)
    #[arg(long, default_value = "8")]
    pub neighborhood: Neighborhood,

    /// EPSG code of the region coordinates (defaults to 4326)
    #[arg(long)]
    pub source_epsg: Option<u32>,

    /// Output format; inferred from the extension when omitted
    #[arg(long)]
    pub driver: Option<Driver>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct OverlayArgs {
    /// Discretization written by `discretize`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub table: PathBuf,

    /// Regressor file (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub regressor: PathBuf,

    /// Output discretization (.geojson or .csv)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Allocation policy: weighted or uniform
    #[arg(long, default_value = "weighted")]
    pub policy: AllocationPolicy,

    /// Discretization column the results are aggregated on
    #[arg(long, default_value = "id")]
    pub id_column: String,

    /// Regressor columns to overlay (comma separated); all numeric columns by default
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// EPSG code of the regressor coordinates (defaults to 4326)
    #[arg(long)]
    pub source_epsg: Option<u32>,

    /// Format of input and output; inferred from the extensions when omitted
    #[arg(long)]
    pub driver: Option<Driver>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum BatchingMode { Chunked, Split }

#[derive(clap::Args, Debug)]
pub struct TravelTimesArgs {
    /// Discretization written by `discretize`
    #[arg(value_hint = clap::ValueHint::FilePath, required_unless_present = "points")]
    pub table: Option<PathBuf>,

    /// Point list (count, then `lat lon` lines) instead of a discretization
    #[arg(long, value_hint = clap::ValueHint::FilePath, conflicts_with = "table")]
    pub points: Option<PathBuf>,

    /// Output matrix CSV
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Routing configuration (JSON); GRAPHHOPPER_API_KEY supplies a missing key
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Request batching
    #[arg(long, value_enum, default_value_t = BatchingMode::Chunked)]
    pub batching: BatchingMode,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}
