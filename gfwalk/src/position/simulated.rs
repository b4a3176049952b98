//! Simulated position source.
//!
//! A single mutable coordinate moved by fixed-size steps. Steps compose
//! additively with no clamping, so the subject can wander arbitrarily far
//! from its start.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::Coordinate;

use super::{PositionSource, PositionStatus};

/// Movement direction for a simulated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increase latitude.
    Up,
    /// Decrease latitude.
    Down,
    /// Decrease longitude.
    Left,
    /// Increase longitude.
    Right,
}

impl Direction {
    /// All directions, in display order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(dlat, dlon)` for one step of `step_size` degrees.
    pub fn delta(&self, step_size: f64) -> (f64, f64) {
        match self {
            Direction::Up => (step_size, 0.0),
            Direction::Down => (-step_size, 0.0),
            Direction::Left => (0.0, -step_size),
            Direction::Right => (0.0, step_size),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction '{0}' (expected up, down, left or right)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" | "north" | "n" => Ok(Direction::Up),
            "down" | "d" | "south" | "s" => Ok(Direction::Down),
            "left" | "l" | "west" | "w" => Ok(Direction::Left),
            "right" | "r" | "east" | "e" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Deterministic, command-driven position source.
#[derive(Debug, Clone)]
pub struct SimulatedPositionSource {
    start: Coordinate,
    position: Coordinate,
    step_size: f64,
    steps_taken: u64,
}

impl SimulatedPositionSource {
    /// Create a source seeded at `start`, moving `step_size` degrees per step.
    pub fn new(start: Coordinate, step_size: f64) -> Self {
        Self {
            start,
            position: start,
            step_size,
            steps_taken: 0,
        }
    }

    /// Move one step and return the new position.
    pub fn step(&mut self, direction: Direction) -> Coordinate {
        let (dlat, dlon) = direction.delta(self.step_size);
        self.position = self.position.offset(dlat, dlon);
        self.steps_taken += 1;
        debug!(%direction, position = %self.position, "Simulated step");
        self.position
    }

    /// Move back to the starting coordinate.
    pub fn reseed(&mut self) {
        self.position = self.start;
        self.steps_taken = 0;
    }

    /// The starting coordinate.
    pub fn start(&self) -> Coordinate {
        self.start
    }

    /// Degrees moved per step.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Steps taken since the last seed.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

impl PositionSource for SimulatedPositionSource {
    fn current_position(&self) -> Option<Coordinate> {
        Some(self.position)
    }

    fn status(&self) -> PositionStatus {
        PositionStatus::Ready
    }
}
