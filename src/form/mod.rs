//! Deck input form
//!
//! `DeckInputForm` owns every field as controlled state: the two numeric
//! inputs and the deck-action selector. Fields are only ever changed through
//! [`DeckInputForm::handle_change`], which takes one typed [`FormUpdate`] per
//! event. The parent reads the submitted values with [`DeckInputForm::values`].

pub mod action;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;

pub use action::DeckAction;

pub const DEFAULT_NUMBER_OF_CARDS: u32 = 52;
pub const DEFAULT_NUMBER_OF_JOKERS: u32 = 0;

/// Largest value either numeric field hands off (a hundred packs' worth)
pub const MAX_COUNT: u32 = 5_200;

/// The fields the form renders, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    NumberOfCards,
    NumberOfJokers,
    DeckAction,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [
        FieldId::NumberOfCards,
        FieldId::NumberOfJokers,
        FieldId::DeckAction,
    ];

    /// Identifier collaborators use to find the field
    pub fn id(self) -> &'static str {
        match self {
            FieldId::NumberOfCards => "numberOfCards",
            FieldId::NumberOfJokers => "numberOfJokers",
            FieldId::DeckAction => "deckAction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::NumberOfCards => "Number of non-joker cards",
            FieldId::NumberOfJokers => "Number of jokers",
            FieldId::DeckAction => "Deck action",
        }
    }

    fn index(self) -> usize {
        match self {
            FieldId::NumberOfCards => 0,
            FieldId::NumberOfJokers => 1,
            FieldId::DeckAction => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Text shown in a numeric field. Holds ASCII digits only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberInput {
    text: String,
}

impl NumberInput {
    pub fn new(value: u32) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    /// Build from raw control text, dropping anything that is not a digit
    pub fn from_text(raw: &str) -> Self {
        Self {
            text: raw.chars().filter(char::is_ascii_digit).collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Parsed value; `None` when empty or too large for `u32`
    pub fn value(&self) -> Option<u32> {
        self.text.parse().ok()
    }
}

/// All form fields, held as one controlled value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub number_of_cards: NumberInput,
    pub number_of_jokers: NumberInput,
    pub deck_action: DeckAction,
}

impl Default for FormState {
    fn default() -> Self {
        Self::from_values(&FormValues::default())
    }
}

impl FormState {
    pub fn from_values(values: &FormValues) -> Self {
        Self {
            number_of_cards: NumberInput::new(values.number_of_cards),
            number_of_jokers: NumberInput::new(values.number_of_jokers),
            deck_action: values.deck_action,
        }
    }
}

/// Snapshot handed to the parent on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub number_of_cards: u32,
    pub number_of_jokers: u32,
    pub deck_action: DeckAction,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            number_of_cards: DEFAULT_NUMBER_OF_CARDS,
            number_of_jokers: DEFAULT_NUMBER_OF_JOKERS,
            deck_action: DeckAction::default(),
        }
    }
}

/// One field change. Each variant targets exactly one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormUpdate {
    NumberOfCards(String),
    NumberOfJokers(String),
    DeckAction(DeckAction),
}

impl FormUpdate {
    pub fn field(&self) -> FieldId {
        match self {
            FormUpdate::NumberOfCards(_) => FieldId::NumberOfCards,
            FormUpdate::NumberOfJokers(_) => FieldId::NumberOfJokers,
            FormUpdate::DeckAction(_) => FieldId::DeckAction,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    Required(FieldId),
    #[error("{} must be at most {}", .0.label(), MAX_COUNT)]
    OutOfRange(FieldId),
}

/// What the form did with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// A field value changed (or was re-selected)
    Changed(FieldId),
    /// The key moved focus or the menu; nothing changed
    Consumed,
    /// The form has no use for the key
    Unhandled,
}

#[derive(Debug, Clone)]
pub struct DeckInputForm {
    state: FormState,
    focus: FieldId,
    // Highlighted option while the deck-action menu is open
    menu: Option<DeckAction>,
}

impl Default for DeckInputForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckInputForm {
    pub fn new() -> Self {
        Self::with_values(FormValues::default())
    }

    /// Mount with caller-provided defaults
    pub fn with_values(values: FormValues) -> Self {
        Self {
            state: FormState::from_values(&values),
            focus: FieldId::NumberOfCards,
            menu: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn focus(&self) -> FieldId {
        self.focus
    }

    pub fn set_focus(&mut self, field: FieldId) {
        self.menu = None;
        self.focus = field;
    }

    /// Highlighted option if the selector menu is open
    pub fn menu(&self) -> Option<DeckAction> {
        self.menu
    }

    pub fn handle_change(&mut self, update: FormUpdate) {
        tracing::debug!(field = update.field().id(), ?update, "form field changed");
        match update {
            FormUpdate::NumberOfCards(raw) => {
                self.state.number_of_cards = NumberInput::from_text(&raw);
            }
            FormUpdate::NumberOfJokers(raw) => {
                self.state.number_of_jokers = NumberInput::from_text(&raw);
            }
            FormUpdate::DeckAction(action) => self.state.deck_action = action,
        }
    }

    /// Values for the parent. Numeric fields are required and capped at
    /// [`MAX_COUNT`].
    pub fn values(&self) -> Result<FormValues, FormError> {
        Ok(FormValues {
            number_of_cards: Self::read_number(&self.state.number_of_cards, FieldId::NumberOfCards)?,
            number_of_jokers: Self::read_number(&self.state.number_of_jokers, FieldId::NumberOfJokers)?,
            deck_action: self.state.deck_action,
        })
    }

    fn read_number(input: &NumberInput, field: FieldId) -> Result<u32, FormError> {
        if input.is_empty() {
            return Err(FormError::Required(field));
        }
        input
            .value()
            .filter(|v| *v <= MAX_COUNT)
            .ok_or(FormError::OutOfRange(field))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        // Open menu is modal
        if let Some(highlight) = self.menu {
            return self.handle_menu_key(key, highlight);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                return FormEvent::Consumed;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                return FormEvent::Consumed;
            }
            _ => {}
        }

        match self.focus {
            FieldId::NumberOfCards | FieldId::NumberOfJokers => self.handle_number_key(key),
            FieldId::DeckAction => self.handle_selector_key(key),
        }
    }

    fn handle_number_key(&mut self, key: KeyEvent) -> FormEvent {
        let input = match self.focus {
            FieldId::NumberOfCards => &self.state.number_of_cards,
            _ => &self.state.number_of_jokers,
        };
        let mut text = input.text().to_string();

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
                text.push(c);
            }
            KeyCode::Backspace => {
                if text.pop().is_none() {
                    return FormEvent::Consumed;
                }
            }
            _ => return FormEvent::Unhandled,
        }

        let update = match self.focus {
            FieldId::NumberOfCards => FormUpdate::NumberOfCards(text),
            _ => FormUpdate::NumberOfJokers(text),
        };
        self.handle_change(update);
        FormEvent::Changed(self.focus)
    }

    fn handle_selector_key(&mut self, key: KeyEvent) -> FormEvent {
        let current = self.state.deck_action;
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.menu = Some(current);
                FormEvent::Consumed
            }
            KeyCode::Left => {
                self.handle_change(FormUpdate::DeckAction(current.prev()));
                FormEvent::Changed(FieldId::DeckAction)
            }
            KeyCode::Right => {
                self.handle_change(FormUpdate::DeckAction(current.next()));
                FormEvent::Changed(FieldId::DeckAction)
            }
            _ => FormEvent::Unhandled,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent, highlight: DeckAction) -> FormEvent {
        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                let idx = highlight.index().saturating_sub(1);
                self.menu = Some(DeckAction::ALL[idx]);
                FormEvent::Consumed
            }
            KeyCode::Down | KeyCode::Tab => {
                let idx = (highlight.index() + 1).min(DeckAction::ALL.len() - 1);
                self.menu = Some(DeckAction::ALL[idx]);
                FormEvent::Consumed
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.menu = None;
                self.handle_change(FormUpdate::DeckAction(highlight));
                FormEvent::Changed(FieldId::DeckAction)
            }
            KeyCode::Esc => {
                self.menu = None;
                FormEvent::Consumed
            }
            _ => FormEvent::Consumed,
        }
    }
}
