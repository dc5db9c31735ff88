//! A scripted player that only sees what a human sees: the distance signal the pie encodes.

use ringkit::Point;

/// Outcome of placing the pointer somewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    Diff(f64),
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Coordinate descent over the feedback grid. Each axis is searched with a halving step, which
/// converges because the signal is the sum of the two per-axis distances.
#[derive(Debug, Clone)]
pub struct Autopilot {
    grid: f64,
    max_moves: usize,
    position: Point,
    moves: usize,
}

impl Autopilot {
    pub fn new(grid_size: u32, max_moves: usize) -> Self {
        let grid = grid_size.max(1) as f64;
        let mid = (grid / 2.0).floor();
        Self {
            grid,
            max_moves,
            position: Point::new(mid, mid),
            moves: 0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Probes until the level is won. Returns the number of probes used, or `None` once
    /// `max_moves` is spent.
    pub fn solve(&mut self, mut probe: impl FnMut(Point) -> Probe) -> Option<usize> {
        let mut best = match self.step(&mut probe, self.position)? {
            Probe::Won => return Some(self.moves),
            Probe::Diff(d) => d,
        };

        loop {
            let sweep_start = self.moves;
            for axis in [Axis::X, Axis::Y] {
                let mut stride = (self.grid / 2.0).floor().max(1.0);
                while stride >= 1.0 {
                    let mut improved = false;
                    for sign in [1.0, -1.0] {
                        let candidate = self.offset(axis, sign * stride);
                        if candidate == self.position {
                            continue;
                        }
                        match self.step(&mut probe, candidate)? {
                            Probe::Won => return Some(self.moves),
                            Probe::Diff(d) if d < best => {
                                best = d;
                                self.position = candidate;
                                improved = true;
                                break;
                            }
                            Probe::Diff(_) => {}
                        }
                    }
                    if !improved {
                        stride = (stride / 2.0).floor();
                    }
                }
            }
            if self.moves == sweep_start {
                log::warn!("Autopilot has nowhere left to probe");
                return None;
            }
            // both axes settled without a win, sweep again from here
            log::debug!(
                "Autopilot settled at {:?} with diff {} after {} moves",
                self.position,
                best,
                self.moves
            );
        }
    }

    fn step(&mut self, probe: &mut impl FnMut(Point) -> Probe, at: Point) -> Option<Probe> {
        if self.moves >= self.max_moves {
            log::warn!("Autopilot gave up after {} moves", self.moves);
            return None;
        }
        self.moves += 1;
        let outcome = probe(at);
        if outcome == Probe::Won {
            self.position = at;
        }
        Some(outcome)
    }

    fn offset(&self, axis: Axis, delta: f64) -> Point {
        let clamp = |v: f64| v.clamp(0.0, self.grid - 1.0);
        match axis {
            Axis::X => Point::new(clamp(self.position.x + delta), self.position.y),
            Axis::Y => Point::new(self.position.x, clamp(self.position.y + delta)),
        }
    }
}
