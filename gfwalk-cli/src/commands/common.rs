//! Common types and formatting shared across CLI commands.

use clap::ValueEnum;
use console::style;

use gfwalk::discovery::{ClassifiedPoint, Tier};
use gfwalk::engine::RenderSnapshot;
use gfwalk::mode::Mode;
use gfwalk::position::PositionStatus;

/// Mode selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    /// Live position from the host (wide thresholds)
    Legacy,
    /// Simulated walker moved in fixed steps (tight thresholds)
    Remote,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Legacy => Mode::Legacy,
            ModeArg::Remote => Mode::Remote,
        }
    }
}

/// Short tier label, styled for the terminal.
pub fn tier_label(tier: Tier) -> String {
    let label = format!("{:<11}", tier.to_string());
    match tier {
        Tier::Revealed => style(label).green().bold().to_string(),
        Tier::Interactive => style(label).yellow().bold().to_string(),
        Tier::Obscured => style(label).dim().to_string(),
        Tier::Hidden => label,
    }
}

/// One line per classified point: tier, distance, id and display name.
pub fn format_point(point: &ClassifiedPoint) -> String {
    let mut line = format!(
        "  {} {:>8.3} km  {:<22} {}",
        tier_label(point.tier),
        point.distance_km,
        point.point.id,
        point.display_name()
    );
    if let Some(description) = point.display_description() {
        line.push_str(&format!("\n{:>48}{}", "", style(description).dim()));
    }
    line
}

/// Print the classified points, or a note when there are none.
pub fn print_points(points: &[ClassifiedPoint]) {
    if points.is_empty() {
        println!("  (no points in range)");
        return;
    }
    for point in points {
        println!("{}", format_point(point));
    }
}

/// Print a full render snapshot.
pub fn print_snapshot(snapshot: &RenderSnapshot) {
    let subject = snapshot
        .subject
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{} {} | {} | subject {} | discovered {}/{}",
        style("mode").dim(),
        style(snapshot.mode).cyan(),
        snapshot.view,
        subject,
        snapshot.discovered_count,
        snapshot.catalog_size
    );

    match &snapshot.status {
        PositionStatus::Pending => println!("  {}", style("Acquiring position...").yellow()),
        PositionStatus::Unavailable(reason) => {
            println!("  {} {}", style("Position unavailable:").red(), reason);
            if reason.suggests_remote_mode() {
                println!("  Try 'mode remote' to walk a simulated position instead.");
            } else {
                println!("  Use 'retry' to request the position again.");
            }
        }
        PositionStatus::Ready if snapshot.subject.is_some() => {
            print_points(&snapshot.points);
            if let Some(nearest) = snapshot.nearest_undiscovered() {
                println!(
                    "  nearest undiscovered: {} at {:.3} km",
                    nearest.display_name(),
                    nearest.distance_km
                );
            } else if snapshot.is_complete() {
                println!("  {}", style("Every point discovered!").green().bold());
            }
        }
        PositionStatus::Ready => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_arg_conversion() {
        assert_eq!(Mode::from(ModeArg::Legacy), Mode::Legacy);
        assert_eq!(Mode::from(ModeArg::Remote), Mode::Remote);
    }

    #[test]
    fn test_tier_label_contains_name() {
        for tier in [Tier::Hidden, Tier::Obscured, Tier::Interactive, Tier::Revealed] {
            assert!(tier_label(tier).contains(&tier.to_string()));
        }
    }
}
