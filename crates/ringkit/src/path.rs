//! SVG-style path commands (`M`, `L`, `A`, `z`) used to describe sector wedges.

use crate::geom::Point;
use derive_more::{Deref, From, Into};
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Circular arc from the current point to `(x, y)`; the x-axis rotation is always 0.
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathCommand {
    /// End point of the command, `None` for `Close`.
    pub fn end(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(x, y) | Self::LineTo(x, y) | Self::Arc { x, y, .. } => {
                Some(Point::new(x, y))
            }
            Self::Close => None,
        }
    }
}

// -0 would otherwise print as "-0"
fn num(v: f64) -> f64 {
    v + 0.0
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MoveTo(x, y) => write!(f, "M{},{}", num(x), num(y)),
            Self::LineTo(x, y) => write!(f, "L{},{}", num(x), num(y)),
            Self::Arc {
                radius,
                large_arc,
                sweep,
                x,
                y,
            } => write!(
                f,
                "A{r},{r} 0 {},{} {},{}",
                u8::from(large_arc),
                u8::from(sweep),
                num(x),
                num(y),
                r = num(radius)
            ),
            Self::Close => f.write_str("z"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deref, From, Into)]
pub struct PathData(Vec<PathCommand>);

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.0.push(PathCommand::MoveTo(x, y));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.0.push(PathCommand::LineTo(x, y));
        self
    }

    pub fn arc_to(mut self, radius: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> Self {
        self.0.push(PathCommand::Arc {
            radius,
            large_arc,
            sweep,
            x,
            y,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.0.push(PathCommand::Close);
        self
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

/// A circular arc in center parameterisation, as immediate-mode painters expect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    /// `true` when the arc runs with increasing angle.
    pub positive: bool,
}

impl CenterArc {
    /// Converts an endpoint arc into center form. Radii too small for the chord are scaled up
    /// the way SVG user agents do. Returns `None` for a zero-length chord.
    pub fn from_endpoints(
        from: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> Option<Self> {
        let (hx, hy) = ((from.x - to.x) / 2.0, (from.y - to.y) / 2.0);
        let half_chord_sq = hx * hx + hy * hy;
        if half_chord_sq == 0.0 || !half_chord_sq.is_finite() {
            return None;
        }

        let radius = radius.abs().max(half_chord_sq.sqrt());
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coef = sign * ((radius * radius - half_chord_sq).max(0.0) / half_chord_sq).sqrt();

        let center = Point::new(
            coef * hy + (from.x + to.x) / 2.0,
            -coef * hx + (from.y + to.y) / 2.0,
        );

        let start = (from.y - center.y).atan2(from.x - center.x);
        let mut end = (to.y - center.y).atan2(to.x - center.x);
        if sweep {
            while end <= start {
                end += 2.0 * PI;
            }
        } else {
            while end >= start {
                end -= 2.0 * PI;
            }
        }

        Some(Self {
            center,
            radius,
            start,
            end,
            positive: sweep,
        })
    }
}
