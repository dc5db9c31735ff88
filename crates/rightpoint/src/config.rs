use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ringkit::Color;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// How the pointer's distance skews each pie sector.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Jitter {
    /// `|sin(i * diff / grid)|`
    #[default]
    #[strum(to_string = "abs-sine", serialize = "sine")]
    AbsSine,
    #[strum(to_string = "flat")]
    Flat,
}

impl Jitter {
    pub fn factor(&self, index: usize, diff: f64, grid: f64) -> f64 {
        match self {
            Self::AbsSine => (index as f64 * diff / grid).sin().abs(),
            Self::Flat => 1.0,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum RotationMetric {
    /// Shortest way around the circle.
    #[default]
    Circular,
    /// Plain absolute difference of the stored angles.
    Linear,
}

impl RotationMetric {
    pub fn difference(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Circular => {
                let d = (a - b).rem_euclid(360.0);
                d.min(360.0 - d)
            }
            Self::Linear => (a - b).abs(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToneParseError {
    #[error("expected a #rrggbb color, got '{0}'")]
    Malformed(String),
}

/// An sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr, Deref, From, Into)]
pub struct Tone(Color);

impl Tone {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Color::new(red, green, blue))
    }
}

impl FromStr for Tone {
    type Err = ToneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ToneParseError::Malformed(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(malformed());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingLook {
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub rotation: f64,
}

impl Default for RingLook {
    fn default() -> Self {
        Self {
            outer_radius: 200.0,
            inner_radius: 140.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: u32,
    pub initial_sector_count: usize,
    pub rotation_tolerance: f64,
    pub sector_tolerance: f64,
    pub rotation_gain: f64,
    pub weight_gain: f64,
    pub jitter: Jitter,
    pub rotation_metric: RotationMetric,
    pub win_pause_ms: u64,
    pub tones: Vec<Tone>,
    pub cutout: Tone,
    pub ring: RingLook,
    pub pie: RingLook,
}

pub const DEFAULT_TONES: [Tone; 6] = [
    Tone::new(0x40, 0x10, 0x10),
    Tone::new(0x10, 0x40, 0x10),
    Tone::new(0x10, 0x10, 0x40),
    Tone::new(0x40, 0x40, 0x10),
    Tone::new(0x10, 0x40, 0x40),
    Tone::new(0x40, 0x10, 0x40),
];

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 1000,
            initial_sector_count: 5,
            rotation_tolerance: 5.0,
            sector_tolerance: 0.05,
            rotation_gain: 0.5,
            weight_gain: 0.2,
            jitter: Jitter::default(),
            rotation_metric: RotationMetric::default(),
            win_pause_ms: 1500,
            tones: DEFAULT_TONES.to_vec(),
            cutout: Tone::new(0xff, 0xff, 0xff),
            ring: RingLook::default(),
            pie: RingLook {
                outer_radius: 130.0,
                inner_radius: 0.0,
                rotation: 180.0,
            },
        }
    }
}

impl GameConfig {
    pub fn win_pause(&self) -> Duration {
        Duration::from_millis(self.win_pause_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.grid_size == 0 {
            return invalid("grid_size must be at least 1".into());
        }
        // a single sector never jitters, so only the rotation (mod 360) would carry the signal
        if self.initial_sector_count < 2 {
            return invalid("initial_sector_count must be at least 2".into());
        }
        for (name, value) in [
            ("rotation_tolerance", self.rotation_tolerance),
            ("sector_tolerance", self.sector_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        for (name, value) in [
            ("rotation_gain", self.rotation_gain),
            ("weight_gain", self.weight_gain),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{name} must be non-negative, got {value}"));
            }
        }
        if self.tones.is_empty() {
            return invalid("tones must list at least one color".into());
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "rightpoint", "rightpoint")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

pub fn load_config_from(path: &Path) -> Result<GameConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(config::Environment::with_prefix("RIGHTPOINT").try_parsing(true))
        .build()?;

    let config: GameConfig = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> Result<GameConfig, ConfigError> {
    load_config_from(&resolve_path(path)?)
}

pub fn load_or_default(path: Option<&Path>) -> GameConfig {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            GameConfig::default()
        }
    }
}

pub fn write_default_config(path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = resolve_path(path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(path: Option<PathBuf>, tx: Sender<AppEvent>) {
    let config_path = match resolve_path(path.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p.ends_with(config_file_name(&config_path)))
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

fn config_file_name(path: &Path) -> &Path {
    path.file_name().map(Path::new).unwrap_or(path)
}
