use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &str, pad: usize, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(desc.to_string()),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        key_line("?", 11, "Toggle this help"),
        key_line("n", 11, "Start over"),
        Line::from(""),
        Line::from("Wizard:"),
        key_line("tab/↓/j", 5, "Next step"),
        key_line("⇧tab/↑/k", 4, "Previous step"),
        key_line("←/→", 9, "Move within a step (or h/l)"),
        key_line("enter", 7, "Select mood or meal, toggle cuisine"),
        key_line("space", 7, "Same as enter"),
        key_line("g", 11, "Get recommendations"),
        Line::from(""),
        Line::from("Results:"),
        key_line("↑/↓", 9, "Scroll cards (or j/k)"),
        key_line("r", 11, "Try again with the same choices"),
        key_line("y", 11, "Copy recommendations to clipboard"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
