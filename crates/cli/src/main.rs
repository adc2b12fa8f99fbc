use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gridheight::api::{
    run as grid_run, GridCfg, GridRun, HeightSource, HttpTransport, Outcome, SelectionSource,
    SwisstopoCfg, SwisstopoResolver, DEFAULT_ENDPOINT,
};
use gridheight::Vec2;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod adapters;
mod provenance;

use adapters::{CloudFile, JsonSelection, SpacingPrompt, TracingNotifier};

#[derive(Parser)]
#[command(name = "gridheight-cli")]
#[command(about = "Sample swisstopo ground heights on a grid inside a closed polygon")]
struct Cmd {
    /// Also log debug-level events
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Resolve heights for every grid node inside the boundary and write the cloud
    Run {
        /// Boundary selection JSON
        #[arg(long)]
        polygon: PathBuf,
        /// Grid spacing in metres; prompts when omitted
        #[arg(long)]
        spacing: Option<f64>,
        /// Output cloud (*.csv for CSV, JSON otherwise)
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// List the grid nodes inside the boundary without querying heights
    Plan {
        #[arg(long)]
        polygon: PathBuf,
        #[arg(long, default_value_t = 2.0)]
        spacing: f64,
    },
    /// Look up a single height
    Height {
        #[arg(long, allow_hyphen_values = true)]
        easting: f64,
        #[arg(long, allow_hyphen_values = true)]
        northing: f64,
        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[derive(Args)]
struct ServiceArgs {
    /// Height service endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// EPSG code sent as `sr`
    #[arg(long, default_value_t = 2056)]
    sr: u32,
    /// Per-request timeout in seconds; 0 waits forever
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl ServiceArgs {
    fn resolver(&self) -> Result<SwisstopoResolver<HttpTransport>> {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        let transport = HttpTransport::new(timeout).context("building HTTP client")?;
        let cfg = SwisstopoCfg {
            endpoint: self.endpoint.clone(),
            sr: self.sr,
        };
        SwisstopoResolver::new(&cfg, transport).map_err(anyhow::Error::msg)
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    match cmd.action {
        Action::Run {
            polygon,
            spacing,
            out,
            service,
        } => run(polygon, spacing, out, service),
        Action::Plan { polygon, spacing } => plan(polygon, spacing),
        Action::Height {
            easting,
            northing,
            service,
        } => height(easting, northing, service),
    }
}

fn run(polygon: PathBuf, spacing: Option<f64>, out: PathBuf, service: ServiceArgs) -> Result<()> {
    tracing::info!(
        polygon = %polygon.display(),
        out = %out.display(),
        endpoint = %service.endpoint,
        sr = service.sr,
        "run"
    );
    let selection = JsonSelection::load(&polygon)?;
    let cfg = GridCfg::default();
    let mut dialog = SpacingPrompt::new(
        spacing,
        cfg.spacing_default,
        (cfg.spacing_min, cfg.spacing_max),
        io::stdin().lock(),
        io::stderr(),
    );
    let mut heights = service.resolver()?;
    let mut sink = CloudFile::new(&out);

    let outcome = grid_run(
        &selection,
        &mut dialog,
        &mut heights,
        &mut sink,
        &mut TracingNotifier,
        cfg,
    )?;

    if let Outcome::Published { summary, .. } = &outcome {
        let payload = provenance::Payload {
            params: serde_json::json!({
                "polygon": polygon.to_string_lossy(),
                "spacing": dialog.chosen(),
                "endpoint": service.endpoint,
                "sr": service.sr,
                "fallback_height": cfg.fallback_height
            }),
            summary: *summary,
        };
        let prov = provenance::write_sidecar(sink.path(), payload)?;
        tracing::info!(cloud = %sink.path().display(), provenance = %prov.display(), "written");
    }
    for line in provenance::ATTRIBUTION {
        tracing::info!("{line}");
    }
    Ok(())
}

fn plan(polygon: PathBuf, spacing: f64) -> Result<()> {
    let selection = JsonSelection::load(&polygon)?;
    let grid = GridRun::initialize(
        &selection.selected_polylines(),
        spacing,
        GridCfg::default(),
        &mut TracingNotifier,
    )?;
    let mut n = 0usize;
    for p in grid.accepted_candidates() {
        println!("{},{}", p.x, p.y);
        n += 1;
    }
    tracing::info!(accepted = n, spacing, "plan");
    Ok(())
}

fn height(easting: f64, northing: f64, service: ServiceArgs) -> Result<()> {
    let mut resolver = service.resolver()?;
    match resolver.resolve_height(Vec2::new(easting, northing)) {
        Ok(h) => {
            println!("height at E={easting}, N={northing} = {h} m");
            Ok(())
        }
        Err(e) => bail!("no height for E={easting}, N={northing}: {e}"),
    }
}
