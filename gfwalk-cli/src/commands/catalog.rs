//! Catalog command - list the points of interest in effect.

use console::style;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the catalog command.
pub fn run(runner: &CliRunner, json: bool) -> Result<(), CliError> {
    let catalog = runner.load_catalog()?;

    if json {
        let points: Vec<_> = catalog.iter().map(|p| p.as_ref()).collect();
        let text = serde_json::to_string_pretty(&points)?;
        println!("{}", text);
        return Ok(());
    }

    match runner.catalog_path() {
        Some(path) => println!("Catalog: {}", path.display()),
        None => println!("Catalog: built-in"),
    }
    println!("{} points", catalog.len());
    println!();

    for point in catalog.iter() {
        println!(
            "  {:<22} {}  {}",
            point.id,
            point.position,
            style(&point.name).bold()
        );
        if let Some(description) = &point.description {
            println!("  {:<22} {}", "", style(description).dim());
        }
    }
    Ok(())
}
