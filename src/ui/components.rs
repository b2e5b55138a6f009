//! Form field widgets
//!
//! Each field is a bordered box: the label (with `*` for required fields)
//! sits in the top border and the current value on the line below it.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{accent, inactive, text, text_dim};
use crate::form::{DeckAction, FieldId, NumberInput};

/// Height of one field box
pub const FIELD_HEIGHT: u16 = 3;

fn field_block(field: FieldId, focused: bool) -> Block<'static> {
    let (border, title) = if focused {
        (accent(), Style::default().fg(accent()).add_modifier(Modifier::BOLD))
    } else {
        (inactive(), Style::default().fg(text_dim()))
    };

    Block::default()
        .title(Span::styled(format!(" {} * ", field.label()), title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Numeric input showing its digits and a cursor while focused
pub fn number_field(field: FieldId, input: &NumberInput, focused: bool) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(input.text().to_string(), Style::default().fg(text()))];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(accent())));
    }
    Paragraph::new(Line::from(spans)).block(field_block(field, focused))
}

/// Single-choice selector showing the selected option's label
pub fn select_field(action: DeckAction, focused: bool, open: bool) -> Paragraph<'static> {
    let arrow = if open { " ▴" } else { " ▾" };
    let line = Line::from(vec![
        Span::styled(action.label(), Style::default().fg(text())),
        Span::styled(arrow, Style::default().fg(if focused { accent() } else { text_dim() })),
    ]);
    Paragraph::new(line).block(field_block(FieldId::DeckAction, focused))
}
