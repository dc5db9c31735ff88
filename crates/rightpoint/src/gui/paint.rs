//! Replays a retained [`Scene`] onto a cairo context.

use cairo::Context;
use palette::Srgb;
use ringkit::{CenterArc, Color, GroupId, Node, PathCommand, PathData, Point, Scene, Shape};
use std::f64::consts::PI;

pub fn paint(cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
    if let Some(background) = scene.background() {
        set_color(cr, background);
        cr.paint()?;
    }
    for &root in scene.roots() {
        paint_group(cr, scene, root)?;
    }
    Ok(())
}

fn paint_group(cr: &Context, scene: &Scene, group: GroupId) -> Result<(), cairo::Error> {
    let transform = scene.transform(group);
    cr.save()?;
    cr.translate(transform.translate.x, transform.translate.y);
    cr.rotate(transform.rotate.to_radians());

    for node in scene.children(group) {
        match node {
            Node::Group(child) => paint_group(cr, scene, *child)?,
            Node::Shape(Shape::Path { data, fill }) => {
                trace(cr, data);
                set_color(cr, *fill);
                cr.fill()?;
            }
            Node::Shape(Shape::Circle {
                center,
                radius,
                fill,
            }) => {
                cr.new_path();
                cr.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
                set_color(cr, *fill);
                cr.fill()?;
            }
        }
    }

    cr.restore()
}

fn trace(cr: &Context, data: &PathData) {
    cr.new_path();
    let mut current = Point::ORIGIN;
    let mut subpath_start = Point::ORIGIN;

    for command in data.iter() {
        match *command {
            PathCommand::MoveTo(x, y) => {
                cr.move_to(x, y);
                subpath_start = Point::new(x, y);
            }
            PathCommand::LineTo(x, y) => cr.line_to(x, y),
            PathCommand::Arc {
                radius,
                large_arc,
                sweep,
                x,
                y,
            } => match CenterArc::from_endpoints(current, radius, large_arc, sweep, Point::new(x, y))
            {
                Some(arc) if arc.positive => {
                    cr.arc(arc.center.x, arc.center.y, arc.radius, arc.start, arc.end)
                }
                Some(arc) => {
                    cr.arc_negative(arc.center.x, arc.center.y, arc.radius, arc.start, arc.end)
                }
                None => cr.line_to(x, y),
            },
            PathCommand::Close => {
                cr.close_path();
                current = subpath_start;
                continue;
            }
        }
        if let Some(end) = command.end() {
            current = end;
        }
    }
}

fn set_color(cr: &Context, color: Color) {
    let c: Srgb<f64> = color.into_format();
    cr.set_source_rgb(c.red, c.green, c.blue);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringkit::{Canvas, RingSpec, Sector, SectorRing, Viewport};

    #[test]
    fn test_paints_ring_into_image() {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0)).with_background(Color::new(0, 0, 0));
        let group = scene.group(None);
        let ring = SectorRing::new(
            RingSpec::new(vec![Sector::new(1.0, Color::new(255, 0, 0))])
                .with_center(Point::new(50.0, 50.0))
                .with_radii(40.0, 0.0),
        )
        .unwrap();
        ring.draw(&mut scene, group);

        let mut surface = cairo::ImageSurface::create(cairo::Format::Rgb24, 100, 100).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            paint(&cr, &scene).unwrap();
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // Rgb24 is stored as native-endian 0x00RRGGBB
        let pixel = |x: usize, y: usize| {
            let i = y * stride + x * 4;
            u32::from_ne_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]) & 0x00ff_ffff
        };
        assert_eq!(pixel(50, 50), 0x00ff_0000);
        assert_eq!(pixel(2, 2), 0x0000_0000);
    }
}
