mod cards;
mod export;
mod help;
mod input;
mod state;

use crate::cli::{build_config, selection_actions, Cli};
use crate::model::WizardEvent;
use crate::orchestrator::{self, UiCommand};
use crate::provider;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::KeyOutcome;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{Focus, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let provider = provider::create_provider(&cfg).context("provider setup failed")?;
    let preselect = selection_actions(&args)?;
    tracing::info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        "starting TUI"
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel::<WizardEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(provider, preselect, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    mut event_rx: UnboundedReceiver<WizardEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::default();
    // Started on first copy.
    let mut clipboard: Option<export::ClipboardWorker> = None;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }
        if let Some(status) = clipboard.as_ref().and_then(export::ClipboardWorker::poll) {
            state.info = status.to_message();
        }

        if last_tick.elapsed() >= tick_rate {
            state.spinner_tick = state.spinner_tick.wrapping_add(1);
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match input::handle_key(&mut state, k.modifiers, k.code) {
                    KeyOutcome::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    KeyOutcome::Send(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break Err(anyhow::anyhow!("controller stopped unexpectedly"));
                        }
                    }
                    KeyOutcome::CopyResults => {
                        state.info = match export::results_as_text(&state.snapshot) {
                            Some(text) => {
                                let cards = state.snapshot.state.recommendations().map_or(0, |r| r.len());
                                let worker = clipboard.get_or_insert_with(export::ClipboardWorker::spawn);
                                match worker.copy(text, cards) {
                                    Ok(()) => "Copying recommendations…".into(),
                                    Err(e) => format!("Copy failed: {e:#}"),
                                }
                            }
                            None => "Nothing to copy yet".into(),
                        };
                    }
                    KeyOutcome::Nothing => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply_event(state: &mut UiState, ev: WizardEvent) {
    match ev {
        WizardEvent::StateChanged { snapshot } => state.apply_snapshot(*snapshot),
        WizardEvent::Info(info) => state.info = info.to_message(),
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Wizard"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("mood-food"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_wizard(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_wizard(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let v = state.snapshot.visibility;
    let mut constraints = vec![Constraint::Min(0)];
    if v.error_banner {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(3));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if v.loading {
        draw_loading(rows[0], f, state);
    } else if let Some(recs) = state.snapshot.state.recommendations() {
        cards::draw_cards(rows[0], f, recs, state.results_scroll);
    } else {
        draw_steps(rows[0], f, state);
    }

    if let Some(err) = state.snapshot.state.error() {
        let banner = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::LightRed))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(banner, rows[1]);
    }

    let status = Paragraph::new(state.info.clone())
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, rows[rows.len() - 1]);
}

fn draw_loading(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let frame = SPINNER[state.spinner_tick % SPINNER.len()];
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{frame} Cooking up some ideas…"),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn step_title(step: usize, title: &str, complete: bool, focused: bool) -> Line<'static> {
    let badge = if complete {
        Span::styled(" ✓ ", Style::default().fg(Color::Black).bg(Color::Green))
    } else {
        Span::styled(
            format!(" {step} "),
            Style::default().fg(Color::Black).bg(Color::Rgb(255, 165, 0)),
        )
    };
    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if focused {
        title_style = title_style.fg(Color::Yellow);
    }
    Line::from(vec![badge, Span::raw(" "), Span::styled(title.to_string(), title_style)])
}

fn option_span(label: String, selected: bool, under_cursor: bool, tint: Option<Color>) -> Span<'static> {
    let mut style = Style::default();
    if let Some(c) = tint {
        style = style.fg(c);
    }
    if selected {
        style = style
            .fg(Color::Black)
            .bg(tint.unwrap_or(Color::Rgb(255, 165, 0)))
            .add_modifier(Modifier::BOLD);
    }
    if under_cursor {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
    }
    Span::styled(format!(" {label} "), style)
}

fn draw_steps(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let v = state.snapshot.visibility;
    let wiz = &state.snapshot.state;

    let mut constraints = vec![Constraint::Length(4)];
    if v.meal_step {
        constraints.push(Constraint::Length(4));
    }
    if v.cuisine_step {
        constraints.push(Constraint::Length(5));
    }
    if v.submit {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut row = 0;

    let focused = |section: Focus| state.focus == section;

    let selected_mood = wiz.selected_mood();
    let moods: Vec<Span> = state
        .moods
        .iter()
        .enumerate()
        .flat_map(|(i, m)| {
            [
                option_span(
                    format!("{} {}", m.emoji, m.name),
                    selected_mood.map(|s| s.same_as(m)).unwrap_or(false),
                    focused(Focus::Mood) && i == state.mood_cursor,
                    Some(state::tint_color(m.tint)),
                ),
                Span::raw(" "),
            ]
        })
        .collect();
    draw_step(
        rows[row],
        f,
        step_title(1, "How are you feeling?", selected_mood.is_some(), focused(Focus::Mood)),
        Line::from(moods),
    );
    row += 1;

    if v.meal_step {
        let selected_meal = wiz.selected_meal_type();
        let meals: Vec<Span> = state
            .meal_types
            .iter()
            .enumerate()
            .flat_map(|(i, m)| {
                [
                    option_span(
                        format!("{} {}", m.emoji.as_deref().unwrap_or(""), m.name),
                        selected_meal.map(|s| s.same_as(m)).unwrap_or(false),
                        focused(Focus::Meal) && i == state.meal_cursor,
                        None,
                    ),
                    Span::raw(" "),
                ]
            })
            .collect();
        draw_step(
            rows[row],
            f,
            step_title(2, "What kind of meal?", selected_meal.is_some(), focused(Focus::Meal)),
            Line::from(meals),
        );
        row += 1;
    }

    if v.cuisine_step {
        let cuisines: Vec<Span> = state
            .cuisines
            .iter()
            .enumerate()
            .flat_map(|(i, c)| {
                [
                    option_span(
                        c.name.clone(),
                        wiz.selected_cuisines().contains(&c.name),
                        focused(Focus::Cuisine) && i == state.cuisine_cursor,
                        None,
                    ),
                    Span::raw(" "),
                ]
            })
            .collect();
        draw_step(
            rows[row],
            f,
            step_title(
                3,
                "Any cuisine preferences? (Optional)",
                true,
                focused(Focus::Cuisine),
            ),
            Line::from(cuisines),
        );
        row += 1;
    }

    if v.submit {
        let mut style = Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD);
        if !v.submit_enabled {
            style = style.add_modifier(Modifier::DIM);
        }
        if focused(Focus::Submit) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let p = Paragraph::new(Line::from(Span::styled("  Get Recommendations  ", style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE))
            .wrap(Wrap { trim: false });
        f.render_widget(p, rows[row]);
    }
}

fn draw_step(area: Rect, f: &mut ratatui::Frame, title: Line<'static>, options: Line<'static>) {
    let p = Paragraph::new(options)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}
