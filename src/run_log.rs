use crate::grid::Position;
use crate::spawn::{PlacementEvent, RejectReason};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Something that happened while generating a cave and placing the agent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// Initial random fill
    Randomized { seed: u64, size: i32, walls: usize },
    /// One smoothing pass finished
    Smoothed { pass: u32, changed: usize, walls: usize },
    /// A sampled spawn candidate was discarded
    CandidateRejected { x: i32, y: i32, reason: RejectReason },
    /// Reachable tiles counted in the window of the given radius around a candidate
    AreaMeasured { x: i32, y: i32, radius: i32, reachable: usize },
    /// The agent was placed
    AgentPlaced { x: i32, y: i32, attempts: usize },
    /// Placement gave up
    PlacementFailed { attempts: usize },
}

impl From<PlacementEvent> for RunEvent {
    fn from(event: PlacementEvent) -> Self {
        match event {
            PlacementEvent::CandidateRejected { position, reason } => RunEvent::CandidateRejected {
                x: position.x,
                y: position.y,
                reason,
            },
            PlacementEvent::AreaMeasured {
                position,
                radius,
                reachable,
            } => RunEvent::AreaMeasured {
                x: position.x,
                y: position.y,
                radius,
                reachable,
            },
        }
    }
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub event: RunEvent,
}

/// Event recorder for a single run
pub struct RunLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        RunLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Log an event with current timestamp
    pub fn log(&mut self, event: RunEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent {
            timestamp_ms,
            event,
        });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Position of the last placed agent, if any
    pub fn placed_at(&self) -> Option<Position> {
        self.events.iter().rev().find_map(|logged| match logged.event {
            RunEvent::AgentPlaced { x, y, .. } => Some(Position::new(x, y)),
            _ => None,
        })
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut passes = 0;
        let mut changed_total = 0;
        let mut rejected = 0;
        let mut measurements = 0;

        for logged in &self.events {
            match &logged.event {
                RunEvent::Smoothed { changed, .. } => {
                    passes += 1;
                    changed_total += changed;
                }
                RunEvent::CandidateRejected { .. } => rejected += 1,
                RunEvent::AreaMeasured { .. } => measurements += 1,
                _ => {}
            }
        }

        let duration = self.events.last().map(|last| last.timestamp_ms).unwrap_or(0);
        let placement = match self.placed_at() {
            Some(pos) => format!("agent at {}", pos),
            None => "agent not placed".to_string(),
        };

        format!(
            "Run Duration: {}ms\n\
             Smoothing: {} passes, {} cell changes\n\
             Placement: {} candidates rejected, {} area measurements, {}",
            duration, passes, changed_total, rejected, measurements, placement
        )
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}
