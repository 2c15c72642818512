use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::ui::panel;

const BINDINGS: &[(&str, &str)] = &[
    ("← → / h l", "前後のセクション"),
    ("↑ ↓ / k j", "台本をスクロール"),
    ("PgUp PgDn Home", "ページ送り / 先頭へ"),
    ("1 2 3 4", "10分 1分 15秒 6秒"),
    ("s / Space", "タイマー開始"),
    ("p", "一時停止"),
    ("r", "リセット"),
    ("[ ]", "ベル音量"),
    ("- +", "速聴の音量"),
    ("m", "速聴の再生 / 停止"),
    ("t", "トークテーマを生成"),
    ("e", "生徒一覧を編集"),
    ("q / Esc", "終了"),
];

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

pub fn render_help(f: &mut Frame) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<16}"), key_style),
                Span::raw(*action),
            ])
        })
        .collect();

    let area = centered(f.area(), 48, BINDINGS.len() as u16 + 2);
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(panel("キー操作")), area);
}
