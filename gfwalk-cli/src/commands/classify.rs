//! Classify command - one-shot classification around a coordinate.

use gfwalk::discovery::{classify, DiscoverySet};
use gfwalk::geo::Coordinate;
use gfwalk::mode::Mode;

use super::common::print_points;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the classify command.
pub struct ClassifyArgs {
    pub subject: Coordinate,
    pub mode: Mode,
    pub discovered: Vec<String>,
}

/// Run the classify command.
pub fn run(runner: &CliRunner, args: ClassifyArgs) -> Result<(), CliError> {
    let catalog = runner.load_catalog()?;

    if let Some(unknown) = args.discovered.iter().find(|id| !catalog.contains(id)) {
        return Err(CliError::InvalidArgument(format!(
            "'{}' is not in the catalog",
            unknown
        )));
    }
    let discovered: DiscoverySet = args.discovered.into_iter().map(Into::into).collect();

    let thresholds = runner.engine_config().thresholds(args.mode);
    println!(
        "{} mode around {} (interactive {} km, visible {} km)",
        args.mode, args.subject, thresholds.interactive_km, thresholds.visible_km
    );

    let points = classify(Some(args.subject), &catalog, &discovered, thresholds);
    print_points(&points);
    Ok(())
}
