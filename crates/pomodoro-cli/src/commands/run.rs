//! Foreground timer loop.
//!
//! Drives the engine from a tokio interval and reads one-letter control
//! commands from stdin between ticks.

use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Args;
use pomodoro_core::timer::progress_bar;
use pomodoro_core::{
    dispatch, format_clock, Config, Event, Notifier, Phase, Result, TimerEngine, TimerError,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

const BAR_WIDTH: usize = 20;

const HELP: &str = "commands: s=start p=pause r=reset w=work b=break a=auto-start c <work> <break>=configure q=quit";

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Work duration in minutes (overrides config)
    #[arg(long)]
    work: Option<i64>,
    /// Break duration in minutes (overrides config)
    #[arg(long = "break")]
    break_: Option<i64>,
    /// Stop after this many completed sessions (0 = until quit)
    #[arg(long)]
    cycles: Option<u32>,
    /// Continue into the next phase without waiting for `s`
    #[arg(long)]
    auto_start: bool,
    /// Ask for work and break minutes before starting
    #[arg(long)]
    prompt: bool,
    /// Print a JSON snapshot of the final state on exit
    #[arg(long)]
    json: bool,
    /// Milliseconds between ticks
    #[arg(long, default_value_t = 1000, hide = true, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
}

/// A line typed while the timer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Reset,
    Switch(Phase),
    ToggleAutoStart,
    Configure(String, String),
    Quit,
    Help,
}

pub fn parse_control(line: &str) -> Option<Control> {
    let mut parts = line.split_whitespace();
    let control = match parts.next()? {
        "s" | "start" => Control::Start,
        "p" | "pause" => Control::Pause,
        "r" | "reset" => Control::Reset,
        "w" | "work" => Control::Switch(Phase::Work),
        "b" | "break" => Control::Switch(Phase::Break),
        "a" | "auto" => Control::ToggleAutoStart,
        "c" | "configure" => {
            let work = parts.next()?.to_string();
            let break_ = parts.next()?.to_string();
            Control::Configure(work, break_)
        }
        "q" | "quit" => Control::Quit,
        "?" | "h" | "help" => Control::Help,
        _ => return None,
    };
    Some(control)
}

/// Audio collaborator: rings the terminal bell on phase expiry.
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.notifications.enabled && config.notifications.bell,
        }
    }
}

impl Notifier for TerminalBell {
    fn notify(&mut self, event: &Event) {
        if self.enabled && event.is_audible() {
            print!("\x07");
        }
    }
}

/// Human-readable line for events worth announcing.
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::PhaseChanged { phase: Phase::Break, manual: false } => {
            Some("Time's up! Take a break.".into())
        }
        Event::PhaseChanged { phase: Phase::Work, manual: false } => {
            Some("Break over. Back to work.".into())
        }
        Event::PhaseChanged { phase, manual: true } => Some(format!("Switched to {phase}.")),
        Event::SessionCompleted { sessions_completed } => {
            Some(format!("Session {sessions_completed} complete!"))
        }
        Event::SessionTooShort { phase } => Some(format!(
            "The {phase} phase has no duration; timer stopped. Reconfigure with `c <work> <break>`."
        )),
        Event::ConfigurationChanged { work_secs, break_secs } => Some(format!(
            "Configured: work {}, break {}.",
            format_clock(*work_secs),
            format_clock(*break_secs)
        )),
        Event::InvalidDuration { phase, value } => Some(format!(
            "Invalid {phase} duration '{value}': enter a positive number of minutes."
        )),
        _ => None,
    }
}

/// Single status line, e.g. `Work  24:59  [#---]  sessions: 0`.
pub fn status_line(engine: &TimerEngine) -> String {
    let state = if engine.is_running() { "" } else { "  (paused)" };
    let auto = if engine.auto_start() { "  auto" } else { "" };
    format!(
        "{:<5}  {}  {}  sessions: {}{}{}",
        engine.phase().label(),
        format_clock(engine.remaining_secs()),
        progress_bar(engine.progress_fraction(), BAR_WIDTH),
        engine.sessions_completed(),
        auto,
        state,
    )
}

fn render(engine: &TimerEngine) {
    print!("\r\x1b[2K{}", status_line(engine));
    if let Err(e) = std::io::stdout().flush() {
        warn!("failed to flush stdout: {e}");
    }
}

/// Banner printed whenever a work phase begins.
pub fn session_banner(engine: &TimerEngine) -> String {
    format!("Work session {} started!", engine.sessions_completed() + 1)
}

fn work_resumed(events: &[Event]) -> bool {
    events.contains(&Event::PhaseChanged {
        phase: Phase::Work,
        manual: false,
    })
}

type InputLines = mpsc::Receiver<std::io::Result<String>>;

/// Read stdin lines on a detached thread so a pending read never blocks
/// runtime shutdown.
fn spawn_stdin_reader() -> InputLines {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

fn announce<N: Notifier>(notifier: &mut N, events: &[Event]) {
    dispatch(notifier, events);
    for line in events.iter().filter_map(describe) {
        print!("\r\x1b[2K{line}\n");
    }
}

fn build_engine(config: &Config, args: &RunArgs) -> Result<TimerEngine, TimerError> {
    let mut engine = TimerEngine::with_configuration(config.timer_configuration()?);
    if args.work.is_some() || args.break_.is_some() {
        engine.configure(
            args.work.unwrap_or(config.timer.work_minutes),
            args.break_.unwrap_or(config.timer.break_minutes),
        )?;
    }
    engine.set_auto_start(args.auto_start || config.timer.auto_start);
    Ok(engine)
}

async fn read_answer(input: &mut InputLines, question: &str) -> Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;
    match input.recv().await {
        Some(line) => Ok(line?),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed before durations were entered",
        )
        .into()),
    }
}

/// Ask for durations until the engine accepts them.
async fn prompt_durations(
    engine: &mut TimerEngine,
    input: &mut InputLines,
) -> Result<()> {
    loop {
        let work = read_answer(input, "Enter work session duration (minutes): ").await?;
        let break_ = read_answer(input, "Enter break duration (minutes): ").await?;
        match engine.configure_from_input(&work, &break_) {
            Ok(_) => return Ok(()),
            Err(e) => {
                if let Some(msg) = describe(&Event::from(&e)) {
                    println!("{msg}");
                }
            }
        }
    }
}

/// Apply a typed command. Returns false when the user quits.
fn apply_control<N: Notifier>(engine: &mut TimerEngine, notifier: &mut N, control: Control) -> bool {
    debug!(?control, "control command");
    let events: Vec<Event> = match control {
        Control::Start => engine.start().into_iter().collect(),
        Control::Pause => engine.pause().into_iter().collect(),
        Control::Reset => vec![engine.reset()],
        Control::Switch(phase) => vec![engine.switch_phase(phase)],
        Control::ToggleAutoStart => {
            engine.set_auto_start(!engine.auto_start());
            Vec::new()
        }
        Control::Configure(work, break_) => match engine.configure_from_input(&work, &break_) {
            Ok(event) => vec![event],
            Err(e) => vec![Event::from(&e)],
        },
        Control::Quit => return false,
        Control::Help => {
            print!("\r\x1b[2K{HELP}\n");
            Vec::new()
        }
    };
    announce(notifier, &events);
    true
}

fn cycles_done(limit: u32, engine: &TimerEngine) -> bool {
    limit > 0 && engine.sessions_completed() >= limit
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = Config::load()?;
    let mut engine = build_engine(&config, &args)?;
    let mut bell = TerminalBell::from_config(&config);
    let cycles = args.cycles.unwrap_or(config.timer.cycles);

    let mut input = spawn_stdin_reader();
    if args.prompt {
        prompt_durations(&mut engine, &mut input).await?;
    }

    println!("{HELP}");
    println!("{}", session_banner(&engine));
    engine.start();
    render(&engine);

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so a full second elapses.
    interval.tick().await;

    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = engine.tick();
                announce(&mut bell, &events);
                if cycles_done(cycles, &engine) {
                    break;
                }
                if work_resumed(&events) {
                    print!("\r\x1b[2K{}\n", session_banner(&engine));
                }
            }
            line = input.recv(), if stdin_open => {
                match line {
                    Some(Ok(line)) => match parse_control(&line) {
                        Some(control) => {
                            if !apply_control(&mut engine, &mut bell, control) {
                                break;
                            }
                        }
                        None if line.trim().is_empty() => {}
                        None => print!("\r\x1b[2Kunknown command '{}'. {HELP}\n", line.trim()),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                    Some(Err(e)) => {
                        warn!("failed to read stdin: {e}");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        // Nothing can restart an idle timer once input is gone.
        if !stdin_open && !engine.is_running() {
            println!();
            println!("Timer idle and input closed; stopping.");
            break;
        }
        render(&engine);
    }

    println!();
    if cycles_done(cycles, &engine) {
        println!("Pomodoro session complete!");
    }
    println!("Completed sessions: {}", engine.sessions_completed());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Count(usize);

    impl Notifier for Count {
        fn notify(&mut self, event: &Event) {
            if event.is_audible() {
                self.0 += 1;
            }
        }
    }

    #[test]
    fn parses_short_and_long_commands() {
        assert_eq!(parse_control("s"), Some(Control::Start));
        assert_eq!(parse_control(" pause "), Some(Control::Pause));
        assert_eq!(parse_control("b"), Some(Control::Switch(Phase::Break)));
        assert_eq!(
            parse_control("c 50 10"),
            Some(Control::Configure("50".into(), "10".into()))
        );
        assert_eq!(parse_control("c 50"), None);
        assert_eq!(parse_control("xyz"), None);
        assert_eq!(parse_control(""), None);
    }

    #[test]
    fn status_line_shows_phase_clock_and_sessions() {
        let engine = TimerEngine::new();
        let line = status_line(&engine);
        assert!(line.starts_with("Work   25:00"));
        assert!(line.contains("sessions: 0"));
        assert!(line.ends_with("(paused)"));
    }

    #[test]
    fn apply_control_quit_stops_loop() {
        let mut engine = TimerEngine::new();
        let mut count = Count::default();
        assert!(apply_control(&mut engine, &mut count, Control::Start));
        assert!(engine.is_running());
        assert!(!apply_control(&mut engine, &mut count, Control::Quit));
    }

    #[test]
    fn invalid_configure_keeps_engine() {
        let mut engine = TimerEngine::new();
        let mut count = Count::default();
        apply_control(
            &mut engine,
            &mut count,
            Control::Configure("0".into(), "5".into()),
        );
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn manual_switch_does_not_ring() {
        let mut engine = TimerEngine::new();
        let mut count = Count::default();
        apply_control(&mut engine, &mut count, Control::Switch(Phase::Break));
        assert_eq!(count.0, 0);
        assert_eq!(engine.phase(), Phase::Break);
    }

    #[test]
    fn describes_expiry_and_errors() {
        assert_eq!(
            describe(&Event::PhaseChanged { phase: Phase::Break, manual: false }).as_deref(),
            Some("Time's up! Take a break.")
        );
        assert!(describe(&Event::ProgressUpdated { remaining_secs: 1, phase: Phase::Work }).is_none());
        let err = TimerError::InvalidDuration { phase: Phase::Work, value: "x".into() };
        assert!(describe(&Event::from(&err)).unwrap().contains("'x'"));
    }

    #[test]
    fn banner_counts_the_upcoming_session() {
        let mut engine = TimerEngine::new();
        assert_eq!(session_banner(&engine), "Work session 1 started!");
        engine.configure(1, 1).unwrap();
        engine.set_auto_start(true);
        engine.start();
        let events: Vec<Event> = (0..120).flat_map(|_| engine.tick()).collect();
        assert!(work_resumed(&events));
        assert_eq!(session_banner(&engine), "Work session 2 started!");
    }

    #[test]
    fn manual_switch_to_work_is_not_a_new_session() {
        let mut engine = TimerEngine::new();
        let event = engine.switch_phase(Phase::Work);
        assert!(!work_resumed(&[event]));
    }

    #[test]
    fn flags_override_config() {
        let config = Config::default();
        let args = RunArgs {
            work: Some(50),
            break_: None,
            cycles: None,
            auto_start: true,
            prompt: false,
            json: false,
            tick_ms: 1000,
        };
        let engine = build_engine(&config, &args).unwrap();
        assert_eq!(engine.remaining_secs(), 3000);
        assert_eq!(engine.configuration().break_secs, 300);
        assert!(engine.auto_start());
    }

    #[test]
    fn invalid_flag_is_rejected() {
        let config = Config::default();
        let args = RunArgs {
            work: Some(0),
            break_: None,
            cycles: None,
            auto_start: false,
            prompt: false,
            json: false,
            tick_ms: 1000,
        };
        assert!(build_engine(&config, &args).is_err());
    }
}
