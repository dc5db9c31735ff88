use super::{GameController, Redraw};
use ringkit::{Canvas, GroupId, Scene, Viewport};

/// Canvas groups the two rings draw into. The pie sits above the ring so it shows through the
/// ring's cutout.
#[derive(Debug, Clone, Copy)]
pub struct BoardView {
    pub root: GroupId,
    ring: GroupId,
    pie: GroupId,
}

impl BoardView {
    pub fn attach<C: Canvas + ?Sized>(canvas: &mut C) -> Self {
        let root = canvas.group(None);
        let ring = canvas.group(Some(root));
        let pie = canvas.group(Some(root));
        Self { root, ring, pie }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, game: &GameController, redraw: Redraw) {
        match redraw {
            Redraw::None => {}
            Redraw::Pie => game.pie().draw(canvas, self.pie),
            Redraw::All => {
                game.ring().draw(canvas, self.ring);
                game.pie().draw(canvas, self.pie);
            }
        }
    }
}

/// A scene with the board attached and the game centered and fully drawn.
pub fn new_scene(game: &mut GameController, viewport: Viewport) -> (Scene, BoardView) {
    let mut scene = Scene::new(viewport).with_background(*game.config().cutout);
    let view = BoardView::attach(&mut scene);
    let redraw = game.resize(viewport);
    view.draw(&mut scene, game, redraw);
    (scene, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use ringkit::{Node, Point, Shape};

    #[test]
    fn test_board_layers() {
        let mut game = GameController::with_seed(GameConfig::default(), 5).unwrap();
        let (scene, view) = new_scene(&mut game, Viewport::new(800.0, 600.0));

        let layers: Vec<GroupId> = scene
            .children(view.root)
            .iter()
            .filter_map(|n| match n {
                Node::Group(g) => Some(*g),
                Node::Shape(_) => None,
            })
            .collect();
        assert_eq!(layers.len(), 2);

        // ring: one wedge per sector plus the cutout
        assert_eq!(scene.shapes(layers[0]).count(), 6);
        assert!(
            scene
                .shapes(layers[0])
                .any(|s| matches!(s, Shape::Circle { radius, .. } if *radius == 140.0))
        );
        // pie: solid
        assert_eq!(scene.shapes(layers[1]).count(), 5);
        assert_eq!(scene.transform(layers[1]).translate, Point::new(400.0, 300.0));
        assert_eq!(scene.transform(layers[1]).rotate, 180.0);
    }

    #[test]
    fn test_pie_redraw_leaves_ring_alone() {
        let mut game = GameController::with_seed(GameConfig::default(), 5).unwrap();
        let (mut scene, view) = new_scene(&mut game, Viewport::new(800.0, 600.0));
        let ring_before = scene.children(view.ring).to_vec();

        game.update_pointer(Point::new(999.0, 999.0)).unwrap();
        view.draw(&mut scene, &game, Redraw::Pie);

        assert_eq!(scene.children(view.ring), ring_before.as_slice());
        assert_eq!(
            scene.transform(view.pie).rotate,
            game.pie().rotation()
        );
    }
}
