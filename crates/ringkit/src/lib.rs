pub mod canvas;
pub mod geom;
pub mod path;
pub mod ring;

pub use canvas::{Canvas, GroupId, Node, Scene, Shape};
pub use geom::{Point, Transform, Viewport};
pub use path::{CenterArc, PathCommand, PathData};
pub use ring::{
    Color, InvalidRingConfiguration, RingSpec, Sector, SectorArc, SectorRing, normalize_degrees,
};
