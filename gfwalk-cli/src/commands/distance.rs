//! Distance command - great-circle distance between two coordinates.

use tracing::warn;

use gfwalk::geo::{distance_km, Coordinate};

use crate::error::CliError;

/// Run the distance command.
///
/// Out-of-range coordinates are not rejected; the spherical formula is
/// applied to them as given.
pub fn run(from: Coordinate, to: Coordinate) -> Result<(), CliError> {
    for c in [from, to] {
        if !in_range(c) {
            warn!(coordinate = %c, "Coordinate outside [-90, 90] x [-180, 180]");
        }
    }

    let km = distance_km(from, to);
    println!("{} -> {}", from, to);
    println!("  {:.6} km ({:.1} m)", km, km * 1000.0);
    Ok(())
}

fn in_range(c: Coordinate) -> bool {
    (-90.0..=90.0).contains(&c.lat) && (-180.0..=180.0).contains(&c.lon)
}
