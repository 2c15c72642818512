use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::audio::{AudioEngine, BackgroundTrack, Bell, Volume};
use crate::clock::{time_label, Clock};
use crate::config::Config;
use crate::roster::Roster;
use crate::runtime::Schedule;
use crate::script::{
    topic_pool, Block, Formatter, Lesson, LessonError, LessonVariant, MarkupParser, Navigator,
};
use crate::timer::{CountdownTimer, Preset, TickOutcome};
use crate::topics::TopicGenerator;

const SECOND: Duration = Duration::from_secs(1);
const PAGE: u16 = 10;

/// Everything needed to open a lesson session
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub variant: LessonVariant,
    pub asset_dir: PathBuf,
    pub preset: NonZeroU32,
    pub track_volume: Volume,
    pub bell_volume: Volume,
    /// Fixed seed for the topic draw; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            variant: LessonVariant::Standard,
            asset_dir: PathBuf::from("public"),
            preset: Preset::TenMinutes.seconds(),
            track_volume: Volume::new(0.3),
            bell_volume: Volume::new(0.5),
            seed: None,
        }
    }
}

impl ConsoleSettings {
    /// Settings for a saved configuration. Unknown lesson names and a zero
    /// preset fall back to the defaults.
    pub fn from_config(config: &Config) -> Self {
        let variant = LessonVariant::from_name(&config.lesson).unwrap_or_else(|| {
            log::warn!("unknown lesson {:?}, using standard", config.lesson);
            LessonVariant::Standard
        });
        let preset =
            NonZeroU32::new(config.preset_secs).unwrap_or_else(|| Preset::TenMinutes.seconds());

        Self {
            variant,
            asset_dir: config.asset_dir.clone(),
            preset,
            track_volume: Volume::new(config.track_volume),
            bell_volume: Volume::new(config.bell_volume),
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error("script formatting rules failed to compile: {0}")]
    Rules(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Lesson,
    /// Roster has focus; `draft` holds a name being typed
    Roster { draft: Option<String> },
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State of one lesson session, shared by the event loop and the view
pub struct Console {
    lesson: Lesson,
    navigator: Navigator,
    formatter: Formatter,
    parser: MarkupParser,
    timer: CountdownTimer,
    track: BackgroundTrack,
    bell: Bell,
    topics: TopicGenerator,
    roster: Roster,
    clock: Box<dyn Clock>,
    clock_label: String,
    engine: Box<dyn AudioEngine>,
    rng: StdRng,
    timer_schedule: Schedule,
    clock_schedule: Schedule,
    mode: Mode,
    script_scroll: u16,
    roster_cursor: usize,
}

impl Console {
    pub fn new(
        settings: ConsoleSettings,
        engine: Box<dyn AudioEngine>,
        clock: Box<dyn Clock>,
        now: Instant,
    ) -> Result<Self, ConsoleError> {
        let lesson = settings.variant.load()?;
        let formatter = Formatter::new(&lesson.emphasis)?;
        let parser = MarkupParser::new()?;
        let topics = TopicGenerator::new(topic_pool()?);

        let track = BackgroundTrack::new(
            settings.asset_dir.join(&lesson.assets.background),
            settings.track_volume,
        );
        let bell = Bell::new(
            settings.asset_dir.join(&lesson.assets.bell),
            settings.bell_volume,
        );
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut clock_schedule = Schedule::new(SECOND);
        clock_schedule.start(now);
        let clock_label = time_label(&clock.now());

        log::info!(
            "lesson {} opened: {} sections, preset {}s",
            lesson.name,
            lesson.sections.len(),
            settings.preset
        );

        Ok(Self {
            navigator: Navigator::new(&lesson),
            lesson,
            formatter,
            parser,
            timer: CountdownTimer::new(settings.preset),
            track,
            bell,
            topics,
            roster: Roster::new(),
            clock,
            clock_label,
            engine,
            rng,
            timer_schedule: Schedule::new(SECOND),
            clock_schedule,
            mode: Mode::Lesson,
            script_scroll: 0,
            roster_cursor: 0,
        })
    }

    /// Advance both schedules to `now`. Returns true if anything visible changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.clock_schedule.poll(now) > 0 {
            self.clock_label = time_label(&self.clock.now());
            changed = true;
        }

        for _ in 0..self.timer_schedule.poll(now) {
            changed = true;
            match self.timer.tick() {
                TickOutcome::Counted => {}
                TickOutcome::Expired => {
                    self.timer_schedule.cancel();
                    self.bell.ring(self.engine.as_mut());
                    break;
                }
                TickOutcome::Idle => {
                    self.timer_schedule.cancel();
                    break;
                }
            }
        }

        changed
    }

    /// Time until the next scheduled change, used to size the runner's wait.
    pub fn next_due(&self, now: Instant) -> Option<Duration> {
        [
            self.clock_schedule.remaining(now),
            self.timer_schedule.remaining(now),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.mode {
            Mode::Help => {
                self.mode = Mode::Lesson;
                Flow::Continue
            }
            Mode::Roster { draft: Some(_) } => {
                self.edit_draft(key);
                Flow::Continue
            }
            Mode::Roster { draft: None } => {
                self.roster_key(key);
                Flow::Continue
            }
            Mode::Lesson => self.lesson_key(key, now),
        }
    }

    fn lesson_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Left | KeyCode::Char('h') => self.prev_section(),
            KeyCode::Right | KeyCode::Char('l') => self.next_section(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE as i32)),
            KeyCode::PageDown => self.scroll_by(PAGE as i32),
            KeyCode::Home => self.script_scroll = 0,
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(preset) = Preset::from_digit(c) {
                    self.select_preset(preset.seconds());
                }
            }
            KeyCode::Char('s') | KeyCode::Char(' ') => self.start_timer(now),
            KeyCode::Char('p') => self.pause_timer(),
            KeyCode::Char('r') => self.reset_timer(),
            KeyCode::Char('[') => self.set_bell_volume(self.bell.volume().lowered()),
            KeyCode::Char(']') => self.set_bell_volume(self.bell.volume().raised()),
            KeyCode::Char('-') => self.set_track_volume(self.track.volume().lowered()),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_track_volume(self.track.volume().raised())
            }
            KeyCode::Char('m') => self.toggle_track(),
            KeyCode::Char('t') => self.generate_topics(),
            KeyCode::Char('e') => self.mode = Mode::Roster { draft: None },
            KeyCode::Char('?') => self.mode = Mode::Help,
            _ => {}
        }
        Flow::Continue
    }

    fn roster_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.roster_cursor = self.roster_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.roster_cursor + 1 < self.roster.len() {
                    self.roster_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let name = self
                    .selected_student_id()
                    .and_then(|id| self.roster.get(id))
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                self.mode = Mode::Roster { draft: Some(name) };
            }
            KeyCode::Esc | KeyCode::Char('e') | KeyCode::Tab => self.mode = Mode::Lesson,
            _ => {}
        }
    }

    fn edit_draft(&mut self, key: KeyEvent) {
        let Mode::Roster { draft: Some(draft) } = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => draft.push(c),
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Enter => {
                let name = std::mem::take(draft);
                if let Some(id) = self.selected_student_id() {
                    self.roster.rename(id, name);
                }
                self.mode = Mode::Roster { draft: None };
            }
            KeyCode::Esc => self.mode = Mode::Roster { draft: None },
            _ => {}
        }
    }

    pub fn next_section(&mut self) {
        if self.navigator.next() {
            self.script_scroll = 0;
        }
    }

    pub fn prev_section(&mut self) {
        if self.navigator.prev() {
            self.script_scroll = 0;
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.script_blocks().len().saturating_sub(1) as i32;
        let next = (self.script_scroll as i32 + delta).clamp(0, max.max(0));
        self.script_scroll = next as u16;
    }

    pub fn select_preset(&mut self, seconds: NonZeroU32) {
        self.timer.set_preset(seconds);
        self.timer_schedule.cancel();
    }

    pub fn start_timer(&mut self, now: Instant) {
        if self.timer.start() {
            self.timer_schedule.start(now);
        }
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
        self.timer_schedule.cancel();
    }

    pub fn reset_timer(&mut self) {
        self.timer.stop();
        self.timer_schedule.cancel();
    }

    pub fn toggle_track(&mut self) {
        self.track.toggle(self.engine.as_mut());
    }

    pub fn set_track_volume(&mut self, volume: Volume) {
        self.track.set_volume(volume, self.engine.as_mut());
    }

    pub fn set_bell_volume(&mut self, volume: Volume) {
        self.bell.set_volume(volume);
    }

    pub fn generate_topics(&mut self) {
        self.topics.generate(&mut self.rng);
    }

    pub fn rename_student(&mut self, id: u32, name: impl Into<String>) {
        self.roster.rename(id, name);
    }

    /// Stop recurring work and silence the track. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.timer_schedule.cancel();
        self.clock_schedule.cancel();
        self.track.halt(self.engine.as_mut());
    }

    /// The current section, formatted at the current wall-clock time
    pub fn script_blocks(&self) -> Vec<Block> {
        let markup = self
            .formatter
            .render(self.navigator.current_body(), &self.clock.now());
        self.parser.parse(&markup)
    }

    fn selected_student_id(&self) -> Option<u32> {
        self.roster.students().get(self.roster_cursor).map(|s| s.id)
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn track(&self) -> &BackgroundTrack {
        &self.track
    }

    pub fn bell(&self) -> &Bell {
        &self.bell
    }

    pub fn topics(&self) -> &[String] {
        self.topics.current()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_cursor(&self) -> usize {
        self.roster_cursor
    }

    pub fn clock_label(&self) -> &str {
        &self.clock_label
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn script_scroll(&self) -> u16 {
        self.script_scroll
    }

    pub fn is_timer_scheduled(&self) -> bool {
        self.timer_schedule.is_active()
    }

    pub fn is_clock_scheduled(&self) -> bool {
        self.clock_schedule.is_active()
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.teardown();
    }
}
