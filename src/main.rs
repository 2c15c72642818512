use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};

use sokudoku::{
    app_dirs::AppDirs,
    audio::{AudioEngine, RodioEngine, SilentEngine},
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    console::{Console, ConsoleSettings, Flow},
    logging,
    runtime::{ConsoleEvent, CrosstermEventSource, FixedTicker, Runner},
    script::{LessonVariant, Navigator},
    ui::screen::current_screen,
};

const TICK_RATE_MS: u64 = 100;

/// terminal console for speed-reading instructors: lesson script, timer, bell and background track
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// lesson script to present
    #[clap(short = 'l', long, value_enum)]
    lesson: Option<LessonVariant>,

    /// directory the lesson's audio paths are resolved against
    #[clap(short = 'a', long = "assets", value_name = "DIR")]
    asset_dir: Option<PathBuf>,

    /// timer length in seconds at startup
    #[clap(short = 'p', long, value_name = "SECS", value_parser = clap::value_parser!(u32).range(1..))]
    preset: Option<u32>,

    /// background track volume, 0 to 1
    #[clap(long, value_parser = parse_volume)]
    track_volume: Option<f32>,

    /// bell volume, 0 to 1
    #[clap(long, value_parser = parse_volume)]
    bell_volume: Option<f32>,

    /// run without an audio device
    #[clap(short = 'm', long)]
    mute: bool,

    /// print the lesson's sections and exit
    #[clap(long)]
    list_sections: bool,

    /// save the effective settings to the config file and exit
    #[clap(long)]
    write_config: bool,

    /// config file to read and write instead of the default location
    #[clap(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is not between 0 and 1"))
    }
}

impl Cli {
    /// Layer command-line flags over a loaded config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(lesson) = self.lesson {
            config.lesson = lesson.to_string();
        }
        if let Some(dir) = &self.asset_dir {
            config.asset_dir = dir.clone();
        }
        if let Some(secs) = self.preset {
            config.preset_secs = secs;
        }
        if let Some(v) = self.track_volume {
            config.track_volume = v;
        }
        if let Some(v) = self.bell_volume {
            config.bell_volume = v;
        }
        config.mute |= self.mute;
        config
    }

    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn list_sections(settings: &ConsoleSettings) -> Result<(), Box<dyn Error>> {
    let lesson = settings.variant.load()?;
    let mut nav = Navigator::new(&lesson);
    loop {
        let (pos, _) = nav.position();
        println!("{}. {} {}", pos, nav.current_key(), nav.current_title());
        if !nav.next() {
            break;
        }
    }
    Ok(())
}

fn audio_engine(mute: bool) -> Box<dyn AudioEngine> {
    if mute {
        return Box::new(SilentEngine);
    }
    match RodioEngine::try_default() {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            log::warn!("no audio output, continuing muted: {}", e);
            Box::new(SilentEngine)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        // The console still works without a log file
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = cli.store();
    let config = cli.apply(store.load());
    let settings = ConsoleSettings::from_config(&config);

    if cli.list_sections {
        return list_sections(&settings);
    }

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut console = Console::new(
        settings,
        audio_engine(config.mute),
        Box::new(SystemClock),
        Instant::now(),
    )?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut console);
    console.teardown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    console: &mut Console,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui(console, f))?;

    loop {
        let mut redraw = match runner.step_within(console.next_due(Instant::now())) {
            ConsoleEvent::Key(key) => {
                if console.handle_key(key, Instant::now()) == Flow::Quit {
                    break;
                }
                true
            }
            ConsoleEvent::Resize => true,
            ConsoleEvent::Tick => false,
        };

        redraw |= console.on_tick(Instant::now());

        if redraw {
            terminal.draw(|f| ui(console, f))?;
        }
    }

    log::info!("console closed");
    Ok(())
}

fn ui(console: &Console, f: &mut Frame) {
    current_screen(console.mode()).render(console, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["sokudoku"]);

        assert_eq!(cli.lesson, None);
        assert_eq!(cli.asset_dir, None);
        assert_eq!(cli.preset, None);
        assert!(!cli.mute);
        assert!(!cli.list_sections);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_lesson() {
        let cli = Cli::parse_from(["sokudoku", "-l", "compact"]);
        assert_eq!(cli.lesson, Some(LessonVariant::Compact));

        let cli = Cli::parse_from(["sokudoku", "--lesson", "standard"]);
        assert_eq!(cli.lesson, Some(LessonVariant::Standard));

        assert!(Cli::try_parse_from(["sokudoku", "--lesson", "weekend"]).is_err());
    }

    #[test]
    fn test_cli_preset_must_be_positive() {
        let cli = Cli::parse_from(["sokudoku", "--preset", "90"]);
        assert_eq!(cli.preset, Some(90));

        assert!(Cli::try_parse_from(["sokudoku", "--preset", "0"]).is_err());
    }

    #[test]
    fn test_cli_volume_range() {
        let cli = Cli::parse_from(["sokudoku", "--track-volume", "0.7", "--bell-volume", "1"]);
        assert_eq!(cli.track_volume, Some(0.7));
        assert_eq!(cli.bell_volume, Some(1.0));

        assert!(Cli::try_parse_from(["sokudoku", "--bell-volume", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["sokudoku", "--track-volume", "loud"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let saved = Config {
            lesson: "standard".into(),
            asset_dir: PathBuf::from("/srv/audio"),
            preset_secs: 60,
            track_volume: 0.4,
            bell_volume: 0.8,
            mute: false,
        };
        let cli = Cli::parse_from(["sokudoku", "-l", "compact", "--preset", "15", "--mute"]);

        let merged = cli.apply(saved);

        assert_eq!(merged.lesson, "compact");
        assert_eq!(merged.preset_secs, 15);
        assert!(merged.mute);
        assert_eq!(merged.asset_dir, PathBuf::from("/srv/audio"));
        assert_eq!(merged.track_volume, 0.4);
        assert_eq!(merged.bell_volume, 0.8);
    }

    #[test]
    fn test_mute_in_config_is_kept_without_flag() {
        let saved = Config {
            mute: true,
            ..Config::default()
        };
        let merged = Cli::parse_from(["sokudoku"]).apply(saved);
        assert!(merged.mute);
    }

    #[test]
    fn test_config_flag_picks_the_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lesson.json");
        let cli = Cli::parse_from(["sokudoku", "--config", path.to_str().unwrap()]);

        assert_eq!(cli.store().path(), path.as_path());
    }
}
