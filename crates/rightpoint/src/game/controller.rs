use crate::config::{ConfigError, GameConfig};
use crate::game::level::Level;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ringkit::{InvalidRingConfiguration, Point, RingSpec, SectorRing, Viewport};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Ring(#[from] InvalidRingConfiguration),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Play,
    Paused,
}

/// What needs repainting. Requests merge by taking the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Redraw {
    #[default]
    None,
    Pie,
    All,
}

impl Redraw {
    pub fn merge(self, other: Redraw) -> Redraw {
        self.max(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerAction {
    pub redraw: Redraw,
    pub won: bool,
    /// Set on a win: deliver `ResumeLevel` after this long.
    pub resume_after: Option<Duration>,
}

impl PointerAction {
    fn ignored() -> Self {
        Self::default()
    }

    fn moved() -> Self {
        Self {
            redraw: Redraw::Pie,
            ..Self::default()
        }
    }
}

/// Pie state derived from one feedback signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub rotation: f64,
    pub weights: Vec<f64>,
}

pub struct GameController {
    config: GameConfig,
    rng: StdRng,
    phase: Phase,
    level: Level,
    pointer: Point,
    last_diff: Option<f64>,
    moves: u32,
    ring: SectorRing,
    pie: SectorRing,
}

impl GameController {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;
        let level = Level::generate(&mut rng, 1, config.initial_sector_count, &config);
        Self::with_level(config, rng, level)
    }

    /// Starts from a prepared level instead of a generated one.
    pub fn with_level(config: GameConfig, rng: StdRng, level: Level) -> Result<Self, GameError> {
        config.validate()?;
        let (ring, pie) = build_rings(&config, &level, Point::ORIGIN)?;
        log::info!(
            "Starting level {} with {} sectors",
            level.number,
            level.sector_count()
        );

        Ok(Self {
            config,
            rng,
            phase: Phase::Play,
            level,
            pointer: Point::ORIGIN,
            last_diff: None,
            moves: 0,
            ring,
            pie,
        })
    }

    /// Re-centers both rings on the viewport.
    pub fn resize(&mut self, viewport: Viewport) -> Redraw {
        let center = viewport.center();
        self.ring.move_to(Some(center));
        self.pie.move_to(Some(center));
        Redraw::All
    }

    /// Maps raw viewport pixels onto the square feedback grid.
    pub fn normalize(&self, raw: Point, viewport: Viewport) -> Option<Point> {
        if viewport.is_empty() || !raw.is_finite() {
            return None;
        }
        let grid = self.config.grid_size as f64;
        Some(Point::new(
            (raw.x * grid / viewport.width).round(),
            (raw.y * grid / viewport.height).round(),
        ))
    }

    pub fn pointer_moved(
        &mut self,
        raw: Point,
        viewport: Viewport,
    ) -> Result<PointerAction, GameError> {
        if self.phase != Phase::Play {
            return Ok(PointerAction::ignored());
        }
        match self.normalize(raw, viewport) {
            Some(pointer) => self.update_pointer(pointer),
            None => {
                log::debug!("Ignoring pointer {:?} in viewport {:?}", raw, viewport);
                Ok(PointerAction::ignored())
            }
        }
    }

    /// Feeds a normalized pointer position, adjusting the pie and checking for a win.
    pub fn update_pointer(&mut self, pointer: Point) -> Result<PointerAction, GameError> {
        if self.phase != Phase::Play {
            return Ok(PointerAction::ignored());
        }

        self.pointer = pointer;
        self.moves += 1;
        self.apply(self.level.target.manhattan(pointer))?;

        if !self.is_win() {
            return Ok(PointerAction::moved());
        }

        // snap onto the answer so the pie exactly overlays the ring
        self.pointer = self.level.target;
        self.apply(0.0)?;
        self.phase = Phase::Paused;
        log::info!(
            "Level {} solved after {} moves ({} sectors)",
            self.level.number,
            self.moves,
            self.level.sector_count()
        );

        Ok(PointerAction {
            redraw: Redraw::Pie,
            won: true,
            resume_after: Some(self.config.win_pause()),
        })
    }

    /// Pie rotation and weights for a given distance from the target.
    pub fn feedback(&self, diff: f64) -> Feedback {
        let grid = self.config.grid_size as f64;
        let weights = self
            .ring
            .sectors()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                s.value + self.config.weight_gain * diff * self.config.jitter.factor(i, diff, grid)
            })
            .collect();

        Feedback {
            rotation: self.ring.rotation() + self.config.rotation_gain * diff,
            weights,
        }
    }

    fn apply(&mut self, diff: f64) -> Result<(), GameError> {
        let Feedback { rotation, weights } = self.feedback(diff);
        self.pie.rotate(Some(rotation));
        for (i, w) in weights.into_iter().enumerate() {
            self.pie.set_sector_value(i, w)?;
        }
        self.last_diff = Some(diff);
        Ok(())
    }

    pub fn rotation_diff(&self) -> f64 {
        self.config
            .rotation_metric
            .difference(self.pie.rotation(), self.ring.rotation())
    }

    pub fn max_sector_diff(&self) -> f64 {
        self.pie
            .sectors()
            .iter()
            .zip(self.ring.sectors())
            .map(|(p, r)| {
                let d = p.value - r.value;
                if d == 0.0 {
                    0.0
                } else if r.value == 0.0 {
                    f64::INFINITY
                } else {
                    (d / r.value).abs()
                }
            })
            .fold(0.0, f64::max)
    }

    pub fn is_win(&self) -> bool {
        self.rotation_diff() < self.config.rotation_tolerance
            && self.max_sector_diff() < self.config.sector_tolerance
    }

    /// Builds the next, one-sector-harder level. Only valid while paused after a win.
    pub fn start_next_level(&mut self) -> Result<Redraw, GameError> {
        if self.phase != Phase::Paused {
            log::debug!("Ignoring resume while in phase {}", self.phase);
            return Ok(Redraw::None);
        }

        let level = Level::generate(
            &mut self.rng,
            self.level.number + 1,
            self.level.sector_count() + 1,
            &self.config,
        );
        let (ring, pie) = build_rings(&self.config, &level, self.ring.center())?;
        log::info!(
            "Starting level {} with {} sectors",
            level.number,
            level.sector_count()
        );

        self.level = level;
        self.ring = ring;
        self.pie = pie;
        self.phase = Phase::Play;
        self.moves = 0;
        self.last_diff = None;
        Ok(Redraw::All)
    }

    /// Swaps in a new config. Tolerances and gains apply immediately, ring looks from the next level.
    pub fn reload(&mut self, config: GameConfig) -> Result<(), GameError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn target(&self) -> Point {
        self.level.target
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Manhattan distance behind the pie's current shape, `None` before the first move.
    pub fn last_diff(&self) -> Option<f64> {
        self.last_diff
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn ring(&self) -> &SectorRing {
        &self.ring
    }

    pub fn pie(&self) -> &SectorRing {
        &self.pie
    }
}

fn build_rings(
    config: &GameConfig,
    level: &Level,
    center: Point,
) -> Result<(SectorRing, SectorRing), InvalidRingConfiguration> {
    let ring = SectorRing::new(
        RingSpec::new(level.sectors.clone())
            .with_center(center)
            .with_radii(config.ring.outer_radius, config.ring.inner_radius)
            .with_rotation(config.ring.rotation)
            .with_cutout(*config.cutout),
    )?;
    let pie = SectorRing::new(
        RingSpec::new(level.sectors.clone())
            .with_center(center)
            .with_radii(config.pie.outer_radius, config.pie.inner_radius)
            .with_rotation(ring.rotation() + config.pie.rotation)
            .with_cutout(*config.cutout),
    )?;
    Ok((ring, pie))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationMetric;
    use ringkit::{Color, Sector};

    const GREY: Color = Color::new(90, 90, 90);

    fn level(values: &[f64], target: Point) -> Level {
        Level::new(
            1,
            target,
            values.iter().map(|&v| Sector::new(v, GREY)).collect(),
        )
    }

    fn controller(values: &[f64], target: Point) -> GameController {
        GameController::with_level(
            GameConfig::default(),
            StdRng::seed_from_u64(1),
            level(values, target),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        assert_eq!(game.phase(), Phase::Play);
        assert_eq!(game.ring().len(), game.pie().len());
        assert_eq!(game.pie().rotation(), 180.0);
        assert_eq!(game.last_diff(), None);
        assert!(!game.is_win());
    }

    #[test]
    fn test_normalize() {
        let game = controller(&[1.0], Point::ORIGIN);
        let vp = Viewport::new(500.0, 250.0);
        assert_eq!(
            game.normalize(Point::new(50.0, 50.0), vp),
            Some(Point::new(100.0, 200.0))
        );
        assert_eq!(
            game.normalize(Point::new(0.3, 0.1), vp),
            Some(Point::new(1.0, 0.0))
        );
        assert_eq!(game.normalize(Point::new(1.0, 1.0), Viewport::default()), None);
    }

    #[test]
    fn test_feedback_at_target_is_exact() {
        let game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        let fb = game.feedback(0.0);
        assert_eq!(fb.rotation, game.ring().rotation());
        assert_eq!(fb.weights, vec![30.0, 50.0, 100.0]);
    }

    #[test]
    fn test_feedback_formula() {
        let game = controller(&[30.0, 50.0, 100.0], Point::ORIGIN);
        let fb = game.feedback(400.0);
        assert_eq!(fb.rotation, 200.0);
        assert_eq!(fb.weights[0], 30.0);
        assert!((fb.weights[1] - (50.0 + 80.0 * 0.4f64.sin())).abs() < 1e-12);
        assert!((fb.weights[2] - (100.0 + 80.0 * 0.8f64.sin())).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_on_target_wins_and_pauses() {
        let mut game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        let action = game.update_pointer(Point::new(100.0, 100.0)).unwrap();

        assert!(action.won);
        assert_eq!(action.redraw, Redraw::Pie);
        assert_eq!(action.resume_after, Some(Duration::from_millis(1500)));
        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.pie().rotation(), game.ring().rotation());
        assert_eq!(game.pie().sectors(), game.ring().sectors());
        assert!(game.is_win());
    }

    #[test]
    fn test_near_miss_snaps_to_answer() {
        let mut config = GameConfig::default();
        config.rotation_tolerance = 10.0;
        config.sector_tolerance = 0.5;
        let mut game = GameController::with_level(
            config,
            StdRng::seed_from_u64(1),
            level(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0)),
        )
        .unwrap();

        let action = game.update_pointer(Point::new(103.0, 99.0)).unwrap();
        assert!(action.won);
        assert_eq!(game.pointer(), Point::new(100.0, 100.0));
        assert_eq!(game.last_diff(), Some(0.0));
        assert_eq!(game.pie().rotation(), game.ring().rotation());
    }

    #[test]
    fn test_far_pointer_does_not_win() {
        let mut game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        let action = game.update_pointer(Point::new(400.0, 300.0)).unwrap();
        assert!(!action.won);
        assert_eq!(action.redraw, Redraw::Pie);
        assert_eq!(action.resume_after, None);
        assert_eq!(game.last_diff(), Some(500.0));
        assert_eq!(game.pie().rotation(), 250.0);
        assert_eq!(game.phase(), Phase::Play);
    }

    #[test]
    fn test_paused_ignores_pointer() {
        let mut game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        game.update_pointer(Point::new(100.0, 100.0)).unwrap();
        let moves = game.moves();

        let action = game
            .pointer_moved(Point::new(5.0, 5.0), Viewport::new(100.0, 100.0))
            .unwrap();
        assert_eq!(action, PointerAction::default());
        assert_eq!(game.moves(), moves);
        assert_eq!(game.pie().rotation(), game.ring().rotation());
    }

    #[test]
    fn test_next_level_adds_a_sector() {
        let mut game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        game.resize(Viewport::new(800.0, 600.0));
        game.update_pointer(Point::new(100.0, 100.0)).unwrap();

        assert_eq!(game.start_next_level().unwrap(), Redraw::All);
        assert_eq!(game.phase(), Phase::Play);
        assert_eq!(game.level().number, 2);
        assert_eq!(game.ring().len(), 4);
        assert_eq!(game.pie().len(), 4);
        assert_ne!(game.target(), Point::new(100.0, 100.0));
        assert_eq!(game.ring().center(), Point::new(400.0, 300.0));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_resume_outside_pause_is_ignored() {
        let mut game = controller(&[30.0, 50.0], Point::new(10.0, 10.0));
        assert_eq!(game.start_next_level().unwrap(), Redraw::None);
        assert_eq!(game.level().number, 1);
    }

    #[test]
    fn test_rotation_gap_grows_with_distance() {
        let mut game = controller(&[30.0, 50.0, 100.0], Point::new(100.0, 100.0));
        let mut previous = -1.0;
        for dx in [10.0, 50.0, 120.0, 300.0, 600.0] {
            game.update_pointer(Point::new(100.0 + dx, 100.0)).unwrap();
            let gap = (game.pie().rotation() - game.ring().rotation()).abs();
            assert_eq!(gap, 0.5 * dx);
            assert!(gap > previous);
            previous = gap;
        }
    }

    #[test]
    fn test_linear_metric_misses_wraparound() {
        let mut config = GameConfig::default();
        config.ring.rotation = 359.0;
        config.rotation_metric = RotationMetric::Linear;
        config.sector_tolerance = 10.0;
        let mut game = GameController::with_level(
            config.clone(),
            StdRng::seed_from_u64(1),
            level(&[30.0, 50.0], Point::new(0.0, 0.0)),
        )
        .unwrap();
        game.update_pointer(Point::new(4.0, 0.0)).unwrap();
        assert_eq!(game.pie().rotation(), 1.0);
        assert_eq!(game.rotation_diff(), 358.0);
        assert_eq!(game.phase(), Phase::Play);

        config.rotation_metric = RotationMetric::Circular;
        let mut game = GameController::with_level(
            config,
            StdRng::seed_from_u64(1),
            level(&[30.0, 50.0], Point::new(0.0, 0.0)),
        )
        .unwrap();
        game.update_pointer(Point::new(4.0, 0.0)).unwrap();
        assert_eq!(game.phase(), Phase::Paused);
    }

    #[test]
    fn test_generated_game_starts_with_configured_sectors() {
        let game = GameController::with_seed(GameConfig::default(), 99).unwrap();
        assert_eq!(game.level().sector_count(), 5);
        let grid = game.config().grid_size as f64;
        assert!(game.target().x < grid && game.target().y < grid);
    }

    #[test]
    fn test_reload_rejects_invalid_config() {
        let mut game = controller(&[1.0], Point::ORIGIN);
        let mut config = GameConfig::default();
        config.rotation_tolerance = -1.0;
        assert!(matches!(game.reload(config), Err(GameError::Config(_))));

        let mut config = GameConfig::default();
        config.rotation_tolerance = 20.0;
        game.reload(config).unwrap();
        assert_eq!(game.config().rotation_tolerance, 20.0);
    }

    #[test]
    fn test_invalid_radii_are_rejected() {
        let mut config = GameConfig::default();
        config.ring.inner_radius = 500.0;
        let err = GameController::with_level(
            config,
            StdRng::seed_from_u64(1),
            level(&[1.0], Point::ORIGIN),
        );
        assert!(matches!(
            err,
            Err(GameError::Ring(InvalidRingConfiguration::InvertedRadii { .. }))
        ));
    }

    #[test]
    fn test_redraw_merge() {
        assert_eq!(Redraw::None.merge(Redraw::Pie), Redraw::Pie);
        assert_eq!(Redraw::All.merge(Redraw::Pie), Redraw::All);
        assert_eq!(Redraw::None.merge(Redraw::None), Redraw::None);
    }
}
