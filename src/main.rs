use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sunfall::derivative::{self, DerivativeSeries};
use sunfall::models::Location;
use sunfall::report::SeasonalReport;
use sunfall::{SunfallConfig, plot, series};

fn main() -> anyhow::Result<()> {
    let config = SunfallConfig::load().context("Failed to load configuration")?;
    init_logging(&config);

    let location = Location::from(&config.location);
    let year = config.analysis.year;
    let tz = location.tz()?;

    let series = series::generate(&location, year)?;
    let transitions =
        derivative::resolve_transitions(tz, config.analysis.dst_spring, config.analysis.dst_fall);
    let derivative = DerivativeSeries::from_series(&series, &transitions)?;
    let report = SeasonalReport::analyze(&series, &derivative)?;

    println!("{report}");

    plot::render(
        &series,
        &derivative,
        &report,
        &transitions,
        &config.output.plot_path,
    )
    .context("Failed to render the sunset analysis chart")?;

    info!("Analysis complete");
    Ok(())
}

fn init_logging(config: &SunfallConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
