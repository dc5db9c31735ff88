use anyhow::Context;
use clap::{Parser, Subcommand};
use rightpoint::config::{self, GameConfig};
use rightpoint::game::{GameController, view};
use rightpoint::sys::session::Session;
use rightpoint::sys::simulate;
use ringkit::Viewport;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "rightpoint", version, about = "Find the right point", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the per-user one
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the game window.
    Play {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Let the autopilot play through levels without a window.
    Simulate {
        #[arg(short = 'n', long, default_value_t = 5)]
        levels: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long, default_value_t = 5_000)]
        max_moves: usize,
        /// Override the pause after each win
        #[arg(long)]
        win_pause_ms: Option<u64>,
        /// Write the final board as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the SVG of a freshly generated level.
    Snapshot {
        #[arg(short = 'o', long)]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Write the default config file.
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Play { seed: None }) {
        Commands::Play { seed } => play(config_path, seed),
        Commands::Simulate {
            levels,
            seed,
            width,
            height,
            max_moves,
            win_pause_ms,
            svg,
            json,
        } => {
            let mut config = config::load_config(config_path)?;
            if let Some(ms) = win_pause_ms {
                config.win_pause_ms = ms;
            }
            run_simulation(
                config,
                seed,
                Viewport::new(width, height),
                levels,
                max_moves,
                svg.as_deref(),
                json,
            )
        }
        Commands::Snapshot {
            out,
            seed,
            width,
            height,
        } => {
            let config = config::load_config(config_path)?;
            let mut game = new_game(config, seed)?;
            let (scene, _) = view::new_scene(&mut game, Viewport::new(width, height));
            fs_err::write(&out, scene.to_svg())?;
            println!("Level {} written to {}", game.level().number, out.display());
            Ok(())
        }
        Commands::InitConfig => {
            let path = config::write_default_config(config_path)?;
            println!("Default config written to {}", path.display());
            Ok(())
        }
    }
}

fn new_game(config: GameConfig, seed: Option<u64>) -> anyhow::Result<GameController> {
    let game = match seed {
        Some(seed) => GameController::with_seed(config, seed)?,
        None => GameController::new(config)?,
    };
    Ok(game)
}

fn run_simulation(
    config: GameConfig,
    seed: Option<u64>,
    viewport: Viewport,
    levels: u32,
    max_moves: usize,
    svg: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let (tx, rx) = async_channel::unbounded();
    let game = new_game(config, seed)?;
    let mut session = Session::new(game, viewport, rt.handle().clone(), tx);

    let report = rt.block_on(simulate::run(&mut session, &rx, levels, max_moves))?;
    session.shutdown();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for level in &report.levels {
            println!(
                "level {:>3}  sectors {:>3}  moves {:>5}",
                level.number, level.sectors, level.moves
            );
        }
        println!("total moves: {}", report.total_moves());
    }

    if let Some(path) = svg {
        fs_err::write(path, session.scene().to_svg())?;
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn play(config_path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<()> {
    use relm4::RelmApp;
    use rightpoint::gui::app::AppModel;
    use rightpoint::sys::runtime;

    let config = config::load_or_default(config_path);
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(
        rt.handle(),
        config_path.map(Path::to_path_buf),
        tx.clone(),
    );

    let game = new_game(config, seed)?;
    let session = Session::new(game, Viewport::new(800.0, 600.0), rt.handle().clone(), tx)
        .with_config_path(config_path.map(Path::to_path_buf));

    let app = RelmApp::new("org.rightpoint.game").with_args(Vec::new());
    app.run::<AppModel>((session, rx));
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn play(_config_path: Option<&Path>, _seed: Option<u64>) -> anyhow::Result<()> {
    anyhow::bail!(
        "This build has no window support. Rebuild with `--features gui`, or try `simulate`."
    )
}
