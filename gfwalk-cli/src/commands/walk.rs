//! Walk command - interactive discovery session driven from stdin.
//!
//! Each line read from stdin is one command. Background events (a live fix
//! arriving, a held direction repeating) are applied between lines, so the
//! engine sees one change at a time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use gfwalk::discovery::DiscoverOutcome;
use gfwalk::engine::DiscoveryEngine;
use gfwalk::geo::Coordinate;
use gfwalk::mode::{Mode, View};
use gfwalk::position::{
    Direction, FixedLocationProvider, LocationProvider, UnsupportedLocationProvider,
};

use super::common::print_snapshot;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the walk command.
pub struct WalkArgs {
    pub mode: Mode,
    /// Fixed answer for live acquisition; `None` means no location capability.
    pub live: Option<Coordinate>,
    /// Simulated latency of the live answer.
    pub live_delay: Duration,
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkCommand {
    Step(Direction),
    Hold(Direction),
    Release,
    Discover(String),
    Mode(Mode),
    View(View),
    Retry,
    Status,
    Help,
    Quit,
}

/// Rejected input line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWalkCommandError(String);

impl fmt::Display for ParseWalkCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type 'help' for commands)", self.0)
    }
}

impl std::error::Error for ParseWalkCommandError {}

impl FromStr for WalkCommand {
    type Err = ParseWalkCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(WalkCommand::Status);
        };
        let arg = words.next();
        let err = |msg: String| ParseWalkCommandError(msg);

        if arg.is_none() {
            if let Ok(direction) = head.parse::<Direction>() {
                return Ok(WalkCommand::Step(direction));
            }
        }

        let need = |what: &str| arg.ok_or_else(|| err(format!("'{}' needs {}", head, what)));

        match head.to_lowercase().as_str() {
            "hold" => need("a direction")?
                .parse()
                .map(WalkCommand::Hold)
                .map_err(|e| err(e.to_string())),
            "release" | "stop" => Ok(WalkCommand::Release),
            "discover" | "x" => Ok(WalkCommand::Discover(need("a point id")?.to_string())),
            "mode" => need("legacy or remote")?
                .parse()
                .map(WalkCommand::Mode)
                .map_err(|e| err(e.to_string())),
            "view" => need("home or map")?
                .parse()
                .map(WalkCommand::View)
                .map_err(|e| err(e.to_string())),
            "retry" => Ok(WalkCommand::Retry),
            "status" => Ok(WalkCommand::Status),
            "help" | "?" => Ok(WalkCommand::Help),
            "quit" | "exit" | "q" => Ok(WalkCommand::Quit),
            other => Err(err(format!("unknown command '{}'", other))),
        }
    }
}

enum Input {
    Line(Option<String>),
    Event(bool),
    Interrupt,
}

/// Run the walk command until `quit`, end of input or Ctrl-C.
pub async fn run(runner: &CliRunner, args: WalkArgs) -> Result<(), CliError> {
    let catalog = runner.load_catalog()?;
    let provider: Arc<dyn LocationProvider> = match args.live {
        Some(position) => {
            Arc::new(FixedLocationProvider::new(position).with_delay(args.live_delay))
        }
        None => Arc::new(UnsupportedLocationProvider),
    };

    let mut engine = DiscoveryEngine::builder()
        .catalog(catalog)
        .config(runner.engine_config().clone())
        .provider(provider)
        .build();
    engine.set_mode(args.mode);
    engine.set_view(View::Map);

    println!("{}", style("Type 'help' for commands.").dim());
    print_snapshot(&engine.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            changed = engine.next_event() => Input::Event(changed),
            _ = tokio::signal::ctrl_c() => Input::Interrupt,
        };

        match input {
            Input::Line(None) | Input::Interrupt => break,
            Input::Line(Some(line)) => match line.parse::<WalkCommand>() {
                Ok(command) => {
                    if !apply(&mut engine, command) {
                        break;
                    }
                }
                Err(e) => println!("{}", style(e).red()),
            },
            Input::Event(true) => {
                if engine.controller().stepper().is_active() {
                    print_position(&engine);
                } else {
                    print_snapshot(&engine.snapshot());
                }
            }
            Input::Event(false) => {}
        }
    }

    engine.stop_continuous_step();
    info!(
        discovered = engine.discovered().len(),
        total = engine.catalog().len(),
        "Walk finished"
    );
    println!(
        "Discovered {} of {} points.",
        engine.discovered().len(),
        engine.catalog().len()
    );
    Ok(())
}

/// Apply one command. Returns `false` when the session should end.
fn apply(engine: &mut DiscoveryEngine, command: WalkCommand) -> bool {
    match command {
        WalkCommand::Step(direction) => {
            if engine.step(direction).is_some() {
                print_snapshot(&engine.snapshot());
            } else {
                println!("Stepping only works in remote mode on the map.");
            }
        }
        WalkCommand::Hold(direction) => {
            if engine.start_continuous_step(direction) {
                println!("Holding {}. Type 'release' to stop.", direction);
                print_position(engine);
            } else {
                println!("Holding only works in remote mode on the map.");
            }
        }
        WalkCommand::Release => {
            if engine.stop_continuous_step() {
                print_snapshot(&engine.snapshot());
            }
        }
        WalkCommand::Discover(id) => {
            let outcome = engine.discover(&id);
            report_discovery(engine, &id, outcome);
            if outcome.changed() {
                print_snapshot(&engine.snapshot());
            }
        }
        WalkCommand::Mode(mode) => {
            engine.set_mode(mode);
            print_snapshot(&engine.snapshot());
        }
        WalkCommand::View(view) => {
            engine.set_view(view);
            print_snapshot(&engine.snapshot());
        }
        WalkCommand::Retry => {
            if engine.retry_acquisition() {
                print_snapshot(&engine.snapshot());
            } else {
                println!("Retry only applies to legacy mode on the map.");
            }
        }
        WalkCommand::Status => print_snapshot(&engine.snapshot()),
        WalkCommand::Help => print_help(),
        WalkCommand::Quit => return false,
    }
    true
}

fn report_discovery(engine: &DiscoveryEngine, id: &str, outcome: DiscoverOutcome) {
    match outcome {
        DiscoverOutcome::Discovered => {
            let name = engine
                .catalog()
                .get(id)
                .map(|p| p.name.as_str())
                .unwrap_or(id);
            println!("{} {}", style("Discovered").green().bold(), name);
        }
        DiscoverOutcome::AlreadyDiscovered => println!("Already discovered."),
        DiscoverOutcome::NotInteractive => println!("Too far away to discover."),
        DiscoverOutcome::UnknownPoint => println!("No point with id '{}'.", id),
    }
}

fn print_position(engine: &DiscoveryEngine) {
    if let Some(subject) = engine.subject() {
        println!("  at {}", subject);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  up | down | left | right     move one step (remote mode)");
    println!("  hold <direction>             keep moving until 'release'");
    println!("  release                      stop holding");
    println!("  discover <id>                discover an interactive point");
    println!("  mode legacy|remote           switch position source");
    println!("  view home|map                switch view");
    println!("  retry                        request the live position again");
    println!("  status                       show the current state");
    println!("  quit                         end the session");
}
