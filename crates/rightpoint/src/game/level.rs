use super::{CHANNEL_SPREAD, TONE_JITTER, WEIGHT_MIN_STEP, WEIGHT_STEPS, WEIGHT_UNIT};
use crate::config::{GameConfig, Tone};
use rand::Rng;
use ringkit::{Color, Point, Sector};

/// One round of play: a hidden target and the sectors both rings are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub number: u32,
    pub target: Point,
    pub sectors: Vec<Sector>,
}

impl Level {
    pub fn new(number: u32, target: Point, sectors: Vec<Sector>) -> Self {
        Self {
            number,
            target,
            sectors,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        number: u32,
        sector_count: usize,
        config: &GameConfig,
    ) -> Self {
        let weights: Vec<f64> = (0..sector_count).map(|_| random_weight(rng)).collect();
        let colors = gradient(rng, &config.tones, sector_count);
        let target = random_target(rng, config.grid_size);

        let sectors = weights
            .into_iter()
            .zip(colors)
            .map(|(value, color)| Sector::new(value, color))
            .collect();

        Self::new(number, target, sectors)
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }
}

pub fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    ((rng.random::<f64>() * WEIGHT_STEPS).floor() + WEIGHT_MIN_STEP) * WEIGHT_UNIT
}

pub fn random_target<R: Rng + ?Sized>(rng: &mut R, grid_size: u32) -> Point {
    let grid = grid_size as f64;
    Point::new(
        (rng.random::<f64>() * grid).floor(),
        (rng.random::<f64>() * grid).floor(),
    )
}

/// A randomized gradient: a jittered base tone stepping up towards white, one color per sector.
pub fn gradient<R: Rng + ?Sized>(rng: &mut R, tones: &[Tone], count: usize) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    let tone = match tones.len() {
        0 => Tone::new(0x40, 0x40, 0x40),
        n => tones[rng.random_range(0..n)],
    };

    let base = [tone.red, tone.green, tone.blue];
    let start = base.map(|c| (c as f64 + (rng.random::<f64>() * TONE_JITTER).floor()).min(255.0));
    let step = [(); 3]
        .map(|_| ((rng.random::<f64>() * CHANNEL_SPREAD + CHANNEL_SPREAD) / count as f64).floor());

    (0..count)
        .map(|i| {
            let channel = |c: usize| (start[c] + step[c] * i as f64).min(255.0) as u8;
            Color::new(channel(0), channel(1), channel(2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_weights_on_five_step_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let w = random_weight(&mut rng);
            assert!((20.0..=100.0).contains(&w), "{w}");
            assert_eq!(w % 5.0, 0.0);
        }
    }

    #[test]
    fn test_target_inside_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = random_target(&mut rng, 500);
            assert!((0.0..500.0).contains(&p.x) && (0.0..500.0).contains(&p.y));
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
        }
    }

    #[test]
    fn test_gradient_is_monotone_and_capped() {
        let mut rng = StdRng::seed_from_u64(3);
        for count in [1, 2, 5, 12, 40] {
            let colors = gradient(&mut rng, &[Tone::new(0xf0, 0x10, 0x10)], count);
            assert_eq!(colors.len(), count);
            for pair in colors.windows(2) {
                assert!(pair[1].red >= pair[0].red);
                assert!(pair[1].green >= pair[0].green);
                assert!(pair[1].blue >= pair[0].blue);
            }
            // starts near the tone
            assert!(colors[0].green >= 0x10 && colors[0].green < 0x10 + 32);
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let config = GameConfig::default();
        let a = Level::generate(&mut StdRng::seed_from_u64(42), 1, 6, &config);
        let b = Level::generate(&mut StdRng::seed_from_u64(42), 1, 6, &config);
        assert_eq!(a, b);
        assert_eq!(a.sector_count(), 6);
        assert_eq!(a.number, 1);
    }
}
