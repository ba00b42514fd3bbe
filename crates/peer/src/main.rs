mod config;
mod input;
mod tui;

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use invaders::{FrameReport, GameState, InputFlags, Role, Session};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use input::InputSampler;
use tui::{PeerStatus, TuiState};

const IDLE: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    /// Owns the simulation and sends snapshots
    Authoritative,
    /// Sends inputs and mirrors the snapshots it receives
    Replica,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Authoritative => Role::Authoritative,
            RoleArg::Replica => Role::Replica,
        }
    }
}

#[derive(Parser)]
#[command(name = "invaders-peer")]
#[command(about = "Two-player invaders peer")]
pub struct Args {
    #[arg(short, long, value_enum, default_value_t = RoleArg::Authoritative)]
    role: RoleArg,

    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, default_value_t = invaders::DEFAULT_PORT)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    remote: String,

    #[arg(long, help = "Peer port (defaults to the local port + 1)")]
    remote_port: Option<u16>,

    #[arg(long, default_value_t = 16, help = "Simulation period in ms")]
    sim_ms: u64,

    #[arg(long, default_value_t = 50, help = "Communication period in ms")]
    comm_ms: u64,

    #[arg(long, default_value_t = 30, help = "Close after this long without hearing from the peer")]
    timeout_secs: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, help = "JSON file overriding gameplay tuning")]
    tuning: Option<PathBuf>,

    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 0.0, help = "Inbound packet loss percentage (0-100)")]
    loss_percent: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::session_config(&args)?;

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut session = Session::start(&config, Instant::now())?;

    if args.headless {
        log::info!(
            "{} peer started on {}",
            session.role().as_str(),
            session.local_addr()
        );
        run_headless(&mut session)?;
        log::info!("Peer shutting down");
    } else {
        run_with_tui(&mut session)?;
    }

    Ok(())
}

fn run_headless(session: &mut Session) -> Result<()> {
    loop {
        let report = session.frame(Instant::now(), InputFlags::empty())?;
        if report.is_closed() {
            return Ok(());
        }
        thread::sleep(IDLE);
    }
}

fn run_with_tui(session: &mut Session) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = tui_loop(&mut terminal, session);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    result
}

fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
) -> Result<()> {
    let started = Instant::now();
    let mut sampler = InputSampler::new();
    let mut tui_state = TuiState::new();
    let mut last_state = session.state();

    tui_state.log_info(format!(
        "{} peer started on {}, peer at {}",
        session.role().as_str(),
        session.local_addr(),
        session.remote_addr()
    ));

    loop {
        if event::poll(IDLE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    sampler.on_key(key.code, key.modifiers, Instant::now());
                }
            }
        }

        if sampler.quit_requested() {
            tui_state.log_info("Quitting...");
            session.quit()?;
            return Ok(());
        }

        let now = Instant::now();
        let report = match session.frame(now, sampler.peek(now)) {
            Ok(report) => report,
            Err(e) => {
                tui_state.log_error(e.to_string());
                return Err(e.into());
            }
        };
        if report.simulated {
            sampler.consume();
        }
        note_report(&mut tui_state, &mut last_state, &report);

        let status = PeerStatus {
            role: session.role(),
            local_addr: session.local_addr().to_string(),
            remote_addr: session.remote_addr().to_string(),
            uptime_secs: started.elapsed().as_secs(),
            state: session.state(),
            menu: session.menu(),
            music: session.music(),
            enemies_alive: session.enemies_alive(),
            stats: session.stats(),
        };
        terminal.draw(|frame| tui::render(frame, &tui_state, &status))?;

        if report.is_closed() {
            // Leave the final screen up briefly so the reason is readable.
            thread::sleep(Duration::from_secs(1));
            return Ok(());
        }
    }
}

fn note_report(tui_state: &mut TuiState, last_state: &mut GameState, report: &FrameReport) {
    tui_state.record_cues(report.cues);
    if report.timed_out {
        tui_state.log_warn("Peer went silent, closing");
    }
    if report.state != *last_state {
        tui_state.log_info(format!(
            "Game state {} -> {}",
            last_state.as_str(),
            report.state.as_str()
        ));
        *last_state = report.state;
    }
}
