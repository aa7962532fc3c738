use crate::model::FoodRecommendation;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CARD_HEIGHT: u16 = 7;

/// Draw recommendation cards in provider order, skipping the first `scroll` cards.
pub fn draw_cards(area: Rect, f: &mut Frame, recs: &[FoodRecommendation], scroll: u16) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Your mood-matched recommendations!",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, layout[0]);

    if recs.is_empty() {
        let p = Paragraph::new("No recommendations came back this time. Press r to try again.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, layout[1]);
    } else {
        let skip = (scroll as usize).min(recs.len().saturating_sub(1));
        let fit = ((layout[1].height / CARD_HEIGHT) as usize).max(1);
        let visible: Vec<(usize, &FoodRecommendation)> =
            recs.iter().enumerate().skip(skip).take(fit).collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                visible
                    .iter()
                    .map(|_| Constraint::Length(CARD_HEIGHT))
                    .chain(std::iter::once(Constraint::Min(0)))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);
        for (slot, (index, rec)) in visible.into_iter().enumerate() {
            draw_card(rows[slot], f, index, rec);
        }
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("r", Style::default().fg(Color::Magenta)),
        Span::raw(" Try again   "),
        Span::styled("n", Style::default().fg(Color::Magenta)),
        Span::raw(" Start over   "),
        Span::styled("y", Style::default().fg(Color::Magenta)),
        Span::raw(" Copy   "),
        Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
        Span::raw(" Scroll"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, layout[2]);
}

fn draw_card(area: Rect, f: &mut Frame, index: usize, rec: &FoodRecommendation) {
    let lines = vec![
        Line::from(rec.description.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Why: ", Style::default().fg(Color::Gray)),
            Span::styled(rec.reason.clone(), Style::default().fg(Color::Green)),
        ]),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(255, 165, 0)))
            .title(Span::styled(
                format!(" {}. {} ", index + 1, rec.name),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(p, area);
}
