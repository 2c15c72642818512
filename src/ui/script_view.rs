use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::console::Console;
use crate::script::{Block, BlockKind};
use crate::ui::{dim, panel};

pub fn block_style(kind: BlockKind) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match kind {
        BlockKind::Text => Style::default(),
        BlockKind::Numbered => bold.add_modifier(Modifier::UNDERLINED),
        BlockKind::Bracket => bold.fg(Color::Cyan),
        BlockKind::Emphasis => bold.fg(Color::Red),
        BlockKind::Diamond => bold.fg(Color::Green),
        BlockKind::Dot => bold.fg(Color::Magenta),
    }
}

fn mark_style(base: Style) -> Style {
    base.fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn to_line(block: &Block) -> Line<'static> {
    let base = block_style(block.kind);
    let spans: Vec<Span> = block
        .fragments
        .iter()
        .map(|f| {
            let style = if f.marked { mark_style(base) } else { base };
            Span::styled(f.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

/// Left column: the current section's script
pub fn render(console: &Console, area: Rect, buf: &mut Buffer) {
    let nav = console.navigator();
    let (pos, len) = nav.position();
    let title = format!("レッスン台本 {} ({}/{})", nav.current_title(), pos, len);

    let mut edges = Vec::new();
    if !nav.is_first() {
        edges.push("← 前へ");
    }
    if !nav.is_last() {
        edges.push("次へ →");
    }
    let block = panel(&title).title_bottom(Line::from(Span::styled(
        format!(" {} ", edges.join("   ")),
        dim(),
    )));

    let lines: Vec<Line> = console
        .script_blocks()
        .iter()
        .skip(console.script_scroll() as usize)
        .map(to_line)
        .collect();

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::script::Fragment;
    use crate::ui::buffer_rows;
    use crate::ui::test_support::{console, squash};

    fn draw(console: &Console) -> String {
        let area = Rect::new(0, 0, 70, 30);
        let mut buffer = Buffer::empty(area);
        render(console, area, &mut buffer);
        squash(&buffer_rows(&buffer))
    }

    #[test]
    fn first_section_has_only_a_forward_hint() {
        let (c, _) = console();
        let text = draw(&c);

        assert!(text.contains("準備(1/14)"));
        assert!(text.contains("次へ→"));
        assert!(!text.contains("←前へ"));
    }

    #[test]
    fn date_token_is_filled_in() {
        let (mut c, _) = console();
        c.next_section();
        c.next_section();

        let text = draw(&c);

        assert!(text.contains("4月2日9時5分"));
        assert!(text.contains("←前へ"));
    }

    #[test]
    fn scrolling_drops_leading_lines() {
        let (mut c, t0) = console();
        let first = c.script_blocks()[0].text().replace(' ', "");
        let before = draw(&c);
        assert!(before.contains(&first));

        c.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), t0);
        let second = c.script_blocks()[1].text().replace(' ', "");
        let after = draw(&c);

        assert!(after.contains(&second));
        assert_eq!(c.script_scroll(), 1);
    }

    #[test]
    fn marked_fragments_are_red() {
        let block = Block {
            kind: BlockKind::Text,
            fragments: vec![
                Fragment {
                    text: "ab".into(),
                    marked: false,
                },
                Fragment {
                    text: "cd".into(),
                    marked: true,
                },
            ],
        };

        let line = to_line(&block);

        assert_eq!(line.spans[0].style.fg, None);
        assert_eq!(line.spans[1].style.fg, Some(Color::Red));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn heading_styles_differ_by_kind() {
        assert_eq!(block_style(BlockKind::Emphasis).fg, Some(Color::Red));
        assert_eq!(block_style(BlockKind::Diamond).fg, Some(Color::Green));
        assert_eq!(block_style(BlockKind::Dot).fg, Some(Color::Magenta));
        assert!(block_style(BlockKind::Numbered)
            .add_modifier
            .contains(Modifier::UNDERLINED));
        assert_eq!(block_style(BlockKind::Text), Style::default());
    }
}
