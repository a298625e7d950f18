//! Headless Blockfall runner (default binary).
//!
//! Drives a session with a fixed clock of one tick per frame and prints the final board.
//! Without `--bot` pieces only fall under gravity, which stacks them up and exercises the
//! game-over reset; with `--bot` the greedy bot places every piece.
//!
//! Usage: `blockfall [--seed N] [--ticks N] [--level N] [--bot]`

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use tracing::info;

use blockfall::bot;
use blockfall::core::{EventKind, ScoreKeeper, Session, SessionConfig};
use blockfall::types::TICKS_PER_SECOND;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DemoConfig {
    seed: u32,
    ticks: u64,
    level: u32,
    bot: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: u64::from(TICKS_PER_SECOND) * 60,
            level: 1,
            bot: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<DemoConfig> {
    let mut config = DemoConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                config.seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--ticks" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --ticks"))?;
                config.ticks = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("invalid --ticks value: {}", v))?;
            }
            "--level" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --level"))?;
                config.level = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --level value: {}", v))?;
            }
            "--bot" => config.bot = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let demo = parse_args(&args)?;
    run(&demo)
}

fn run(demo: &DemoConfig) -> Result<()> {
    let config = SessionConfig::new()
        .with_seed(demo.seed)
        .with_initial_level(demo.level);
    let mut session = Session::new(config)?;

    let (score, _) = ScoreKeeper::attach(session.events());
    let game_overs = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&game_overs);
    session
        .events()
        .subscribe(EventKind::GameOver, move |_| counter.set(counter.get() + 1));

    info!(seed = demo.seed, ticks = demo.ticks, bot = demo.bot, "starting run");

    let mut planned_for = 0u32;
    for _ in 0..demo.ticks {
        if demo.bot && session.piece_id() != planned_for {
            planned_for = session.piece_id();
            bot::play_piece(&mut session);
        }
        session.tick(1.0);
    }

    let snapshot = session.snapshot();
    print!("{}", snapshot.render_text());

    let score = score.borrow();
    println!(
        "level {}  score {}  lines {}  best {}  pieces {}  game overs {}",
        session.level(),
        score.score(),
        score.lines(),
        score.best(),
        session.piece_id(),
        game_overs.get()
    );
    Ok(())
}
