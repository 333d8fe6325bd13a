use std::cell::Cell;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use pose_arcade::config::{try_load_config, ArcadeConfig, DEFAULT_CONFIG_PATH};
use pose_arcade::display::{self, Viewport};
use pose_arcade::input::{KeyTracker, KeyboardPose, PoseClassifier, PredictionStabilizer};
use pose_arcade::session::{CatcherSession, Game, ShooterSession, StartOptions};
use pose_arcade::sound::ToneScheduler;

#[derive(Parser, Debug)]
#[command(name = "pose_arcade")]
#[command(about = "Fruit catcher and space shooter for the terminal")]
struct Cli {
    /// Skip the menu and start this game
    #[arg(long, value_enum)]
    game: Option<GameChoice>,

    /// TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write logs here (overrides `log_file` in the config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed the game RNG for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameChoice {
    Catcher,
    Shooter,
}

// ── Logging ──────────────────────────────────────────────────────────────────

/// The terminal is in raw mode on the alternate screen, so logs can only go
/// to a file.  No file, no subscriber.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let writer = Mutex::new(file);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Sound ────────────────────────────────────────────────────────────────────

#[cfg(feature = "audio")]
fn make_scheduler(enabled: bool) -> ToneScheduler {
    if enabled {
        if let Some(sink) = pose_arcade::playback::RodioSink::open() {
            return ToneScheduler::new(Box::new(sink));
        }
    }
    ToneScheduler::silent()
}

#[cfg(not(feature = "audio"))]
fn make_scheduler(enabled: bool) -> ToneScheduler {
    if enabled {
        debug!("built without the `audio` feature; running silent");
    }
    ToneScheduler::silent()
}

// ── Menu ─────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameChoice),
    Quit,
}

fn viewport() -> std::io::Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    Ok(Viewport::new(cols, rows))
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> anyhow::Result<MenuResult> {
    display::draw_menu(out, viewport()?)?;

    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        match ev {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(GameChoice::Catcher)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(GameChoice::Shooter)),
                _ if is_quit(code, modifiers) => return Ok(MenuResult::Quit),
                _ => {}
            },
            Event::Resize(..) => display::draw_menu(out, viewport()?)?,
            _ => {}
        }
    }
}

// ── Game loop ────────────────────────────────────────────────────────────────

/// What the player chose once a round is over.
enum AfterGame {
    Menu,
    Quit,
}

/// Drive one round of `game` until it ends, then hold the game-over screen.
///
/// Input model: each frame drains the event channel into a `KeyTracker`
/// (wrapped in the keyboard pose stand-in) and `read_input` turns the held
/// keys into the game's input type.  Holding Space and an arrow together
/// works because movement and firing are sampled independently.
fn play<G, W, F>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: &mut G,
    options: StartOptions,
    config: &ArcadeConfig,
    mut read_input: F,
) -> anyhow::Result<AfterGame>
where
    G: Game,
    W: Write,
    F: FnMut(&mut KeyboardPose) -> G::Input,
{
    let frame_len = Duration::from_millis(config.frame_ms);
    let ended: Rc<Cell<Option<(u32, u32)>>> = Rc::new(Cell::new(None));
    let ended_cb = Rc::clone(&ended);
    game.on_game_end(Box::new(move |score: u32, level: u32| {
        ended_cb.set(Some((score, level)))
    }));
    game.on_score_change(Box::new(|score: u32, level: u32| {
        debug!(score, level, "score changed")
    }));

    let mut keys = KeyboardPose {
        tracker: KeyTracker::new(config.hold_window),
        frame: 0,
    };
    game.start(options);

    let mut last = Instant::now();
    while ended.get().is_none() {
        let frame_start = Instant::now();
        keys.frame += 1;

        // ── Drain pending input (non-blocking) ───────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            {
                if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                    game.stop();
                    return Ok(AfterGame::Quit);
                }
                keys.tracker.record(code, kind, keys.frame);
            }
        }

        let input = read_input(&mut keys);
        game.update(input);
        game.advance_clock(frame_start - last);
        last = frame_start;

        display::render(out, &game.render(), viewport()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }

    let (score, level) = ended.get().unwrap_or_else(|| game.score());
    let headline = match options.time_limit {
        Some(_) => "TIME UP",
        None => "GAME OVER",
    };
    display::render(out, &[], viewport()?)?;
    display::draw_game_over(out, viewport()?, headline, score, level)?;

    // Keep the sound clock running so the game-over cue finishes.
    let mut last = Instant::now();
    loop {
        match rx.recv_timeout(frame_len) {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => {
                if code == KeyCode::Enter {
                    return Ok(AfterGame::Menu);
                }
                if is_quit(code, modifiers) {
                    return Ok(AfterGame::Quit);
                }
            }
            Ok(_) | Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(AfterGame::Quit),
        }
        let now = Instant::now();
        game.advance_clock(now - last);
        last = now;
    }
}

fn run_game<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    choice: GameChoice,
    config: &ArcadeConfig,
    rng: &mut StdRng,
) -> anyhow::Result<AfterGame> {
    let game_rng = StdRng::from_rng(&mut *rng).context("failed to seed game rng")?;
    let sounds = make_scheduler(config.audio);
    info!(game = ?choice, "starting round");

    match choice {
        GameChoice::Shooter => {
            let mut game = ShooterSession::new(game_rng, sounds);
            play(out, rx, &mut game, StartOptions::default(), config, |keys| {
                keys.tracker.controls(keys.frame)
            })
        }
        GameChoice::Catcher => {
            let mut game = CatcherSession::new(game_rng, sounds, config.catcher_time_limit);
            let stabilizer = PredictionStabilizer::default();
            let options = StartOptions {
                time_limit: Some(config.catcher_time_limit),
            };
            play(out, rx, &mut game, options, config, |keys| {
                stabilizer.pose(&keys.predict())
            })
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    first: Option<GameChoice>,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let mut next = first;
    loop {
        let choice = match next.take() {
            Some(choice) => choice,
            None => match show_menu(out, rx)? {
                MenuResult::Start(choice) => choice,
                MenuResult::Quit => break,
            },
        };
        match run_game(out, rx, choice, config, rng)? {
            AfterGame::Menu => {}
            AfterGame::Quit => break,
        }
    }
    Ok(())
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = try_load_config(&cli.config);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => ArcadeConfig::default(),
    };
    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    init_tracing(log_file.as_deref())?;
    match loaded {
        Ok(Some(_)) => info!(path = %cli.config.display(), "loaded config"),
        Ok(None) => info!(path = %cli.config.display(), "no config file; using defaults"),
        Err(e) => warn!(error = %e, "using default config"),
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; terminals without the kitty protocol
    // fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    debug!(keyboard_enhanced, "terminal ready");

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, cli.game, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!(error = %e, "exiting with error");
    }
    info!("bye");
    result
}
