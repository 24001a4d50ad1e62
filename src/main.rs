//! irq-tictactoe - stream machine-vs-machine tic-tac-toe frames
//!
//! Creates a session, opens it and copies frames from the bounded buffer
//! to stdout until `--frames` frames have been printed (forever if 0).
//! Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use irq_tictactoe::{EngineKind, GameConfig, Session, SimConfig};

#[derive(Debug, Parser)]
#[command(name = "irq-tictactoe", version, about)]
struct Cli {
    /// TOML config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge length of the board
    #[arg(long)]
    board_size: Option<usize>,

    /// Run length that wins
    #[arg(long)]
    goal: Option<usize>,

    /// Only runs of exactly `goal` cells win
    #[arg(long)]
    no_exceed: bool,

    /// MCTS iterations per move
    #[arg(long)]
    iterations: Option<u32>,

    /// UCT exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    /// Timer period in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Frame buffer capacity in bytes
    #[arg(long)]
    capacity: Option<usize>,

    /// Worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Seed for every engine's random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Engine playing X (mcts or random)
    #[arg(long)]
    engine_x: Option<EngineKind>,

    /// Engine playing O (mcts or random)
    #[arg(long)]
    engine_o: Option<EngineKind>,

    /// Frames to print before exiting, 0 for no limit
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    fn build_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimConfig::default(),
        };

        if self.board_size.is_some() || self.goal.is_some() {
            let size = self.board_size.unwrap_or(config.game.board_size);
            let goal = self.goal.unwrap_or(config.game.goal.min(size));
            config.game = GameConfig {
                allow_exceed: config.game.allow_exceed,
                ..GameConfig::new(size, goal)
            };
        }
        if self.no_exceed {
            config.game = config.game.exact_goal();
        }
        if let Some(iterations) = self.iterations {
            config.mcts.iterations = iterations;
        }
        if let Some(c) = self.exploration {
            config.mcts.exploration_constant = c;
        }
        if let Some(seed) = self.seed {
            config.mcts.seed = seed;
        }
        if let Some(ms) = self.period_ms {
            config = config.with_tick_period_ms(ms);
        }
        if let Some(bytes) = self.capacity {
            config = config.with_buffer_capacity(bytes);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        let x = self.engine_x.unwrap_or(config.engines.x);
        let o = self.engine_o.unwrap_or(config.engines.o);
        config = config.with_engines(x, o);

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Tracks the buffer's dropped-byte counter between frames.
///
/// Frames carry no delimiter, so once a push is cut short every later
/// fixed-length read is shifted and the printed boards come out torn.
#[derive(Debug, Default)]
struct OverflowWatch {
    seen: u64,
}

impl OverflowWatch {
    /// Bytes dropped since the last call, if any.
    fn check(&mut self, dropped_bytes: u64) -> Option<u64> {
        let grown = dropped_bytes.checked_sub(self.seen).filter(|&n| n > 0);
        self.seen = self.seen.max(dropped_bytes);
        grown
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = cli.build_config()?;
    info!(
        board_size = config.game.board_size,
        goal = config.game.goal,
        iterations = config.mcts.iterations,
        period_ms = config.pipeline.tick_period_ms,
        x = %config.engines.x,
        o = %config.engines.o,
        "starting"
    );

    let session = Session::create(config).context("creating session")?;
    let handle = session.open().context("opening session")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut printed = 0u64;
    let mut overflow = OverflowWatch::default();
    while cli.frames == 0 || printed < cli.frames {
        let frame = handle.read_frame()?;
        if let Some(lost) = overflow.check(session.stats().dropped_bytes) {
            warn!(
                lost,
                total = overflow.seen,
                "frame buffer overflowed, output may no longer be frame aligned; raise --capacity"
            );
        }
        out.write_all(&frame)?;
        out.flush()?;
        printed += 1;
    }

    handle.close();
    info!(frames = printed, stats = ?session.stats(), "finished");
    Ok(())
}
