use ringkit::{Canvas, Color, Point, RingSpec, Scene, Sector, SectorRing, Shape, Viewport};

const RED: Color = Color::new(255, 0, 0);
const GREEN: Color = Color::new(0, 255, 0);

fn two_sector_ring() -> SectorRing {
    SectorRing::new(
        RingSpec::new(vec![Sector::new(30.0, RED), Sector::new(50.0, GREEN)]).with_radii(100.0, 30.0),
    )
    .unwrap()
}

#[test]
fn wedge_paths_match_svg_arc_commands() {
    let ring = two_sector_ring();
    let paths: Vec<String> = ring
        .arcs()
        .iter()
        .map(|arc| arc.path(ring.outer_radius()).to_string())
        .collect();

    assert_eq!(
        paths,
        vec![
            "M0,0 L100,0 A100,100 0 0,1 -71,71 z".to_string(),
            "M0,0 L-71,71 A100,100 0 1,1 100,0 z".to_string(),
        ]
    );
}

#[test]
fn ring_renders_into_nested_group() {
    let mut scene = Scene::new(Viewport::new(640.0, 480.0));
    let root = scene.group(None);
    let group = scene.group(Some(root));

    let mut ring = two_sector_ring();
    ring.move_to(Some(scene.viewport().center()));
    ring.draw(&mut scene, group);

    let fills: Vec<Color> = scene
        .shapes(group)
        .map(|shape| match shape {
            Shape::Path { fill, .. } | Shape::Circle { fill, .. } => *fill,
        })
        .collect();
    assert_eq!(fills, vec![RED, GREEN, Color::new(255, 255, 255)]);

    let svg = scene.to_svg();
    assert!(svg.contains(r#"<g transform="translate(320,240) rotate(0)">"#));
    assert!(svg.contains(r#"<circle cx="0" cy="0" r="30""#));
}

#[test]
fn transform_places_first_sector_start_on_screen() {
    let mut ring = two_sector_ring();
    ring.move_to(Some(Point::new(200.0, 200.0)));
    ring.rotate(Some(-90.0));

    let arc = ring.arcs()[0];
    let on_screen = ring.transform().apply(arc.start);
    assert!((on_screen.x - 200.0).abs() < 1e-9);
    assert!((on_screen.y - 100.0).abs() < 1e-9);
}
