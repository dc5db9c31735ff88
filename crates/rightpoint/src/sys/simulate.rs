//! Headless play-through: the autopilot feeds pointer events into a real session and waits on
//! the same resume timer a window would.

use crate::events::AppEvent;
use crate::game::Phase;
use crate::sys::autopilot::{Autopilot, Probe};
use crate::sys::session::Session;
use async_channel::{Receiver, RecvError};
use ringkit::{Canvas, Point};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub number: u32,
    pub sectors: usize,
    pub moves: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationReport {
    pub levels: Vec<LevelReport>,
}

impl SimulationReport {
    pub fn total_moves(&self) -> usize {
        self.levels.iter().map(|l| l.moves).sum()
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Level {level} unsolved after {moves} moves")]
    Unsolved { level: u32, moves: usize },
    #[error("Session quit before level {0} started")]
    Quit(u32),
    #[error("Event channel closed: {0}")]
    ChannelClosed(#[from] RecvError),
}

/// Plays `levels` consecutive levels. Between levels it blocks on the session's own
/// `ResumeLevel` timer rather than advancing the game directly.
pub async fn run(
    session: &mut Session,
    rx: &Receiver<AppEvent>,
    levels: u32,
    max_moves: usize,
) -> Result<SimulationReport, SimulationError> {
    let mut report = SimulationReport::default();

    for played in 0..levels {
        let number = session.game().level().number;
        let sectors = session.game().level().sector_count();
        let mut pilot = Autopilot::new(session.game().config().grid_size, max_moves);

        let moves = pilot
            .solve(|pointer| probe(session, pointer))
            .ok_or(SimulationError::Unsolved {
                level: number,
                moves: max_moves,
            })?;
        log::info!("Autopilot solved level {} in {} moves", number, moves);
        report.levels.push(LevelReport {
            number,
            sectors,
            moves,
        });

        if played + 1 < levels {
            wait_for_next_level(session, rx, number).await?;
        }
    }

    Ok(report)
}

fn probe(session: &mut Session, pointer: Point) -> Probe {
    let viewport = session.scene().viewport();
    let grid = session.game().config().grid_size as f64;
    let raw = Point::new(
        pointer.x * viewport.width / grid,
        pointer.y * viewport.height / grid,
    );

    let _ = session.handle_event(AppEvent::PointerMove(raw));
    session.flush();

    if session.game().phase() == Phase::Paused {
        return Probe::Won;
    }
    Probe::Diff(session.game().last_diff().unwrap_or(f64::INFINITY))
}

async fn wait_for_next_level(
    session: &mut Session,
    rx: &Receiver<AppEvent>,
    solved: u32,
) -> Result<(), SimulationError> {
    while session.game().phase() != Phase::Play {
        let event = rx.recv().await?;
        if session.handle_event(event).is_break() {
            return Err(SimulationError::Quit(solved + 1));
        }
        session.flush();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let report = SimulationReport {
            levels: vec![
                LevelReport {
                    number: 1,
                    sectors: 5,
                    moves: 40,
                },
                LevelReport {
                    number: 2,
                    sectors: 6,
                    moves: 35,
                },
            ],
        };
        assert_eq!(report.total_moves(), 75);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["levels"][1]["sectors"], 6);
    }
}
