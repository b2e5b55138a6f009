mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::deck::{ActionOutcome, Card, Colour};
use crate::form::{DeckAction, FieldId};
use crate::theme::Theme;
use components::FIELD_HEIGHT;

// Set once at startup from the config; falls back to the default palette
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("theme already initialised");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Min(FIELD_HEIGHT * 3 + 2), // Form + result
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    // Responsive: form and result side by side on wide terminals
    let body = if chunks[1].width >= 100 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FIELD_HEIGHT * 3 + 2), Constraint::Min(3)])
            .split(chunks[1])
    };

    draw_info_line(f, app, chunks[0]);
    let fields = draw_form_box(f, app, body[0]);
    draw_outcome_box(f, app, body[1]);
    draw_footer(f, app, chunks[2]);

    // Menu drops down over whatever is below the selector
    if app.form.menu().is_some() {
        draw_action_menu(f, app, fields[2]);
    }

    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::CardPicker => draw_card_picker(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > deck preview > field error
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![
            Span::styled(status, Style::default().fg(warning())),
        ])
    } else {
        match app.deck_size() {
            Ok(size) => Line::from(vec![
                Span::styled(format!("Deck of {} cards", size), Style::default().fg(text_dim())),
                Span::styled(" │ ", Style::default().fg(inactive())),
                Span::styled(app.form.state().deck_action.label(), Style::default().fg(text_dim())),
            ]),
            Err(e) => Line::from(vec![
                Span::styled(e.to_string(), Style::default().fg(danger())),
            ]),
        }
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

/// Draws the three fields and returns their areas
fn draw_form_box(f: &mut Frame, app: &App, area: Rect) -> [Rect; 3] {
    let block = Block::default()
        .title(Span::styled(" Deck ", Style::default().fg(header()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.form;
    let state = form.state();
    let focus = form.focus();

    f.render_widget(
        components::number_field(FieldId::NumberOfCards, &state.number_of_cards, focus == FieldId::NumberOfCards),
        rows[0],
    );
    f.render_widget(
        components::number_field(FieldId::NumberOfJokers, &state.number_of_jokers, focus == FieldId::NumberOfJokers),
        rows[1],
    );
    f.render_widget(
        components::select_field(state.deck_action, focus == FieldId::DeckAction, form.menu().is_some()),
        rows[2],
    );

    [rows[0], rows[1], rows[2]]
}

fn draw_action_menu(f: &mut Frame, app: &App, field: Rect) {
    let Some(highlight) = app.form.menu() else { return };

    let height = DeckAction::ALL.len() as u16 + 2;
    let screen = f.area();
    // Open downwards when there is room, upwards otherwise
    let y = if field.y + field.height + height <= screen.height {
        field.y + field.height
    } else {
        field.y.saturating_sub(height)
    };
    let menu_area = Rect::new(field.x, y, field.width, height.min(screen.height));

    f.render_widget(Clear, menu_area);

    let items: Vec<ListItem> = DeckAction::ALL
        .iter()
        .map(|action| {
            let selected = *action == app.form.state().deck_action;
            let marker = if selected { "● " } else { "  " };
            let style = if *action == highlight {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default().fg(text_dim())
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(accent())),
                Span::raw(action.label()),
            ]))
            .style(style)
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );
    f.render_widget(menu, menu_area);
}

fn card_span(card: &Card) -> Span<'static> {
    let color = if card.is_joker() {
        success()
    } else if card.colour() == Some(Colour::Red) {
        danger()
    } else {
        text()
    };
    Span::styled(card.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn draw_outcome_box(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Result ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let lines: Vec<Line> = match &app.outcome {
        None => vec![Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("F2", Style::default().fg(accent())),
            Span::styled(" to run the deck action", Style::default().fg(text_dim())),
        ])],
        Some(ActionOutcome::Shuffled { cards }) => {
            let mut spans = Vec::with_capacity(cards.len() * 2);
            for card in cards {
                spans.push(card_span(card));
                spans.push(Span::raw(" "));
            }
            vec![
                Line::from(Span::styled(
                    format!("Shuffled deck ({} cards), top first:", cards.len()),
                    Style::default().fg(text_dim()),
                )),
                Line::from(""),
                Line::from(spans),
            ]
        }
        Some(ActionOutcome::Picked { card, remaining }) => vec![
            Line::from(vec![
                Span::styled("Picked ", Style::default().fg(text_dim())),
                card_span(card),
            ]),
            Line::from(Span::styled(
                format!("{} cards left in the deck", remaining),
                Style::default().fg(text_dim()),
            )),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(text_dim())),
                Span::styled("b", Style::default().fg(accent())),
                Span::styled(" to put it back", Style::default().fg(text_dim())),
            ]),
        ],
    };

    let content = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(content, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = if app.form.menu().is_some() {
        vec![("↑↓", "Highlight"), ("Enter", "Select"), ("Esc", "Close")]
    } else {
        match app.form.focus() {
            FieldId::NumberOfCards | FieldId::NumberOfJokers => vec![
                ("0-9", "Type"),
                ("Tab", "Next"),
                ("F2", "Run"),
                ("h", "Help"),
                ("q", "Quit"),
            ],
            FieldId::DeckAction => vec![
                ("Enter", "Open"),
                ("←→", "Change"),
                ("Tab", "Next"),
                ("F2", "Run"),
                ("h", "Help"),
                ("q", "Quit"),
            ],
        }
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 3 } else if area.width < 80 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_card_picker(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 30, f.area());

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Pick a card ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(popup_area);

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.card_input.as_str(), Style::default().fg(text())),
        Span::styled("_", Style::default().fg(accent())),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Card (AS, 10H, QD, *) ", Style::default().fg(header())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );
    f.render_widget(input, inner[0]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(accent())),
        Span::raw(" pick │ "),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::raw(" cancel"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(text_dim()));
    f.render_widget(hint, inner[1]);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 80 },
        area
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(accent())),
            Span::raw(what),
        ])
    };
    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        heading("═══ Fields ═══"),
        key("Tab ↑/↓", "Move between fields"),
        key("0-9", "Type into a number field"),
        key("Backspace", "Delete the last digit"),
        Line::from(""),
        heading("═══ Deck action ═══"),
        key("Enter", "Open the option menu, Enter again to select"),
        key("←/→", "Cycle through the options"),
        Line::from(""),
        heading("═══ Run ═══"),
        key("F2 Enter", "Build the deck and run the action"),
        key("Ctrl-S", "Same as F2"),
        key("b", "Put the picked card back"),
        key("Esc", "Clear the result"),
        key("q", "Quit"),
        Line::from(""),
        heading("═══ Command line ═══"),
        key("--state", "Print the form values as JSON"),
        key("--run", "Run the action without the TUI"),
        key("--seed N", "Reproducible shuffles"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" deckform Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
