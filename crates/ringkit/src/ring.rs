use crate::canvas::{Canvas, GroupId};
use crate::geom::{Point, Transform};
use crate::path::PathData;
use std::f64::consts::PI;
use thiserror::Error;

pub type Color = palette::Srgb<u8>;

const FULL_TURN: f64 = 2.0 * PI;
const FULL_TURN_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub value: f64,
    pub color: Color,
}

impl Sector {
    pub fn new(value: f64, color: Color) -> Self {
        Self { value, color }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRingConfiguration {
    #[error("total sector weight must be positive, got {0}")]
    NonPositiveTotal(f64),
    #[error("sector {index} has invalid weight {value}")]
    InvalidWeight { index: usize, value: f64 },
    #[error("radius {0} must be finite and non-negative")]
    InvalidRadius(f64),
    #[error("outer radius {outer} is smaller than inner radius {inner}")]
    InvertedRadii { outer: f64, inner: f64 },
    #[error("sector index {index} out of range for {len} sectors")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Construction parameters for a [`SectorRing`]. Unset values default to zero / empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSpec {
    pub center: Point,
    pub sectors: Vec<Sector>,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub rotation: f64,
    pub cutout: Color,
}

impl Default for RingSpec {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            sectors: Vec::new(),
            outer_radius: 0.0,
            inner_radius: 0.0,
            rotation: 0.0,
            cutout: Color::new(255, 255, 255),
        }
    }
}

impl RingSpec {
    pub fn new(sectors: Vec<Sector>) -> Self {
        Self {
            sectors,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn with_radii(mut self, outer: f64, inner: f64) -> Self {
        self.outer_radius = outer;
        self.inner_radius = inner;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_cutout(mut self, color: Color) -> Self {
        self.cutout = color;
        self
    }
}

/// Angular extent and rounded outer endpoints of one sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorArc {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub start: Point,
    pub end: Point,
    pub large_arc: bool,
}

impl SectorArc {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_full_circle(&self) -> bool {
        self.span() >= FULL_TURN - FULL_TURN_EPSILON
    }

    /// A long arc whose rounded endpoints land on the same point, including a full circle.
    pub fn wraps_around(&self) -> bool {
        self.is_full_circle() || (self.large_arc && self.start == self.end)
    }

    /// Wedge from the local origin out to the arc and back. A wrapping arc is split in two
    /// halves since an arc whose endpoints coincide draws nothing.
    pub fn path(&self, radius: f64) -> PathData {
        let wedge = PathData::new()
            .move_to(0.0, 0.0)
            .line_to(self.start.x, self.start.y);

        let wedge = if self.wraps_around() {
            let mid = polar(radius, self.start_angle + PI);
            wedge
                .arc_to(radius, false, true, mid.x, mid.y)
                .arc_to(radius, false, true, self.end.x, self.end.y)
        } else {
            wedge.arc_to(radius, self.large_arc, true, self.end.x, self.end.y)
        };
        wedge.close()
    }
}

fn polar(radius: f64, angle: f64) -> Point {
    Point::new(
        (radius * angle.cos()).round(),
        (radius * angle.sin()).round(),
    )
}

/// Euclidean modulo into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // tiny negative inputs round up to exactly 360
    if r >= 360.0 { 0.0 } else { r }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorRing {
    center: Point,
    sectors: Vec<Sector>,
    outer_radius: f64,
    inner_radius: f64,
    rotation: f64,
    cutout: Color,
}

impl SectorRing {
    pub fn new(spec: RingSpec) -> Result<Self, InvalidRingConfiguration> {
        Self::validate(&spec.sectors, spec.outer_radius, spec.inner_radius)?;

        let mut ring = Self {
            center: spec.center,
            sectors: spec.sectors,
            outer_radius: spec.outer_radius,
            inner_radius: spec.inner_radius,
            rotation: 0.0,
            cutout: spec.cutout,
        };
        ring.rotate(Some(spec.rotation));
        Ok(ring)
    }

    fn validate(
        sectors: &[Sector],
        outer: f64,
        inner: f64,
    ) -> Result<(), InvalidRingConfiguration> {
        for radius in [outer, inner] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(InvalidRingConfiguration::InvalidRadius(radius));
            }
        }
        if outer < inner {
            return Err(InvalidRingConfiguration::InvertedRadii { outer, inner });
        }
        if let Some((index, s)) = sectors
            .iter()
            .enumerate()
            .find(|(_, s)| !Self::valid_weight(s.value))
        {
            return Err(InvalidRingConfiguration::InvalidWeight {
                index,
                value: s.value,
            });
        }
        let total: f64 = sectors.iter().map(|s| s.value).sum();
        if total <= 0.0 {
            return Err(InvalidRingConfiguration::NonPositiveTotal(total));
        }
        Ok(())
    }

    fn valid_weight(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    pub fn normalized_radian(value: f64, sum: f64) -> f64 {
        FULL_TURN * value / sum
    }

    pub fn total(&self) -> f64 {
        self.sectors.iter().map(|s| s.value).sum()
    }

    /// Lays the sectors out consecutively from angle 0, each spanning its share of the full turn.
    pub fn arcs(&self) -> Vec<SectorArc> {
        let sum = self.total();
        let mut start_angle = 0.0;

        self.sectors
            .iter()
            .enumerate()
            .map(|(index, sector)| {
                let end_angle = start_angle + Self::normalized_radian(sector.value, sum);
                let arc = SectorArc {
                    index,
                    start_angle,
                    end_angle,
                    start: polar(self.outer_radius, start_angle),
                    end: polar(self.outer_radius, end_angle),
                    large_arc: end_angle - start_angle > PI,
                };
                start_angle = end_angle;
                arc
            })
            .collect()
    }

    /// Re-emits every wedge, the inner cutout and the group transform.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, group: GroupId) {
        canvas.clear(group);
        for (arc, sector) in self.arcs().iter().zip(&self.sectors) {
            canvas.path(group, arc.path(self.outer_radius), sector.color);
        }
        self.draw_inner_circle(canvas, group);
        canvas.set_transform(group, self.transform());
    }

    fn draw_inner_circle<C: Canvas + ?Sized>(&self, canvas: &mut C, group: GroupId) {
        if self.inner_radius > 0.0 {
            canvas.circle(group, self.inner_radius * 2.0, Point::ORIGIN, self.cutout);
        }
    }

    pub fn move_to(&mut self, center: Option<Point>) {
        if let Some(center) = center {
            self.center = center;
        }
    }

    pub fn rotate(&mut self, rotation: Option<f64>) {
        match rotation {
            Some(r) if r.is_finite() => self.rotation = normalize_degrees(r),
            Some(r) => log::warn!("Ignoring non-finite rotation {}", r),
            None => {}
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.center, self.rotation)
    }

    pub fn set_sector_value(
        &mut self,
        index: usize,
        value: f64,
    ) -> Result<(), InvalidRingConfiguration> {
        let len = self.sectors.len();
        let old = self
            .sectors
            .get(index)
            .map(|s| s.value)
            .ok_or(InvalidRingConfiguration::IndexOutOfRange { index, len })?;
        if !Self::valid_weight(value) {
            return Err(InvalidRingConfiguration::InvalidWeight { index, value });
        }
        let total = self.total() - old + value;
        if total <= 0.0 {
            return Err(InvalidRingConfiguration::NonPositiveTotal(total));
        }
        self.sectors[index].value = value;
        Ok(())
    }

    pub fn sector_value(&self, index: usize) -> Option<f64> {
        self.sectors.get(index).map(|s| s.value)
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }
}
