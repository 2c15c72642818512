use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::console::{Console, Mode};
use crate::timer::Preset;
use crate::ui::{dim, fit_tail, key_hint, panel, volume_bar};

const NAME_COLUMNS: usize = 20;

pub fn render_timer(console: &Console, area: Rect, buf: &mut Buffer) {
    let timer = console.timer();
    let running = timer.is_running();

    let digits_style = if running {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let presets: Vec<Span> = Preset::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, p)| {
            let active = p.seconds() == timer.preset();
            let style = if active {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            [
                Span::styled(format!("{}:{}", i + 1, p.label()), style),
                Span::raw(" "),
            ]
        })
        .collect();

    let mut controls = key_hint("s", "start", !running);
    controls.extend(key_hint("p", "pause", running));
    controls.extend(key_hint("r", "reset", true));

    let lines = vec![
        Line::from(Span::styled(timer.display(), digits_style)),
        Line::from(presets),
        Line::from(controls),
        Line::from(vec![
            Span::raw("ベル音量 "),
            Span::raw(volume_bar(console.bell().volume().percent())),
            Span::styled(" [ ]", dim()),
        ]),
    ];

    Paragraph::new(lines)
        .block(panel("タイマー"))
        .alignment(Alignment::Center)
        .render(area, buf);
}

pub fn render_audio(console: &Console, area: Rect, buf: &mut Buffer) {
    let track = console.track();
    let status = if track.is_playing() {
        Span::styled(
            "♪ 再生中",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("停止中", dim())
    };

    let lines = vec![
        Line::from(vec![status, Span::styled("  (m)", dim())]),
        Line::from(vec![
            Span::raw("音量 "),
            Span::raw(volume_bar(track.volume().percent())),
            Span::styled(" - +", dim()),
        ]),
    ];

    Paragraph::new(lines)
        .block(panel("速聴制御"))
        .render(area, buf);
}

pub fn render_topics(console: &Console, area: Rect, buf: &mut Buffer) {
    let topics = console.topics();
    let lines: Vec<Line> = if topics.is_empty() {
        vec![Line::from(Span::styled("(t) でテーマを生成", dim()))]
    } else {
        topics
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{}. {}", i + 1, t)))
            .collect()
    };

    Paragraph::new(lines)
        .block(panel("トークテーマ"))
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

pub fn render_roster(console: &Console, area: Rect, buf: &mut Buffer) {
    let (focused, draft) = match console.mode() {
        Mode::Roster { draft } => (true, draft.as_deref()),
        _ => (false, None),
    };

    let lines: Vec<Line> = console
        .roster()
        .students()
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let selected = focused && i == console.roster_cursor();
            let marker = if selected { "▶ " } else { "  " };
            let label = Span::raw(format!("{marker}{:>2}. ", student.id));

            let name = match draft {
                Some(text) if selected => Span::styled(
                    format!("{}▏", fit_tail(text, NAME_COLUMNS)),
                    Style::default().fg(Color::Yellow),
                ),
                _ if student.name.is_empty() => Span::styled("生徒名", dim()),
                _ => Span::raw(fit_tail(&student.name, NAME_COLUMNS)),
            };

            let line = Line::from(vec![label, name]);
            if selected {
                line.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                line
            }
        })
        .collect();

    let block = if focused {
        panel("生徒一覧").border_style(Style::default().fg(Color::Yellow))
    } else {
        panel("生徒一覧")
    };

    Paragraph::new(lines).block(block).render(area, buf);
}
