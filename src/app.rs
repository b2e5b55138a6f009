use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::deck::{ActionOutcome, Card, Deck, DeckRng};
use crate::form::{DeckAction, DeckInputForm, FormError, FormEvent, FormValues};

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Longest card code accepted ("joker")
const CARD_INPUT_MAX: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    CardPicker,  // Which card to pick for "Pick a card"
}

pub struct App {
    pub form: DeckInputForm,
    pub popup: Popup,

    // Card picker input buffer
    pub card_input: String,

    // Result of the last hand-off, and the deck it left behind
    pub outcome: Option<ActionOutcome>,
    pub deck: Option<Deck>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    rng: DeckRng,
}

impl App {
    pub fn new(defaults: FormValues, rng: DeckRng) -> Self {
        Self {
            form: DeckInputForm::with_values(defaults),
            popup: Popup::None,
            card_input: String::new(),
            outcome: None,
            deck: None,
            status_message: None,
            status_message_time: None,
            rng,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Whether `q` should quit rather than go to a field or popup
    pub fn can_quit(&self) -> bool {
        self.popup == Popup::None && self.form.menu().is_none()
    }

    /// Size of the deck the current form values describe
    pub fn deck_size(&self) -> Result<usize, FormError> {
        let values = self.form.values()?;
        Ok(values.number_of_cards as usize + values.number_of_jokers as usize)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match self.form.handle_key(key) {
            FormEvent::Changed(field) => {
                tracing::trace!(field = field.id(), "field changed");
                Ok(())
            }
            FormEvent::Consumed => Ok(()),
            FormEvent::Unhandled => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Hand the form values off
            KeyCode::F(2) | KeyCode::Enter => self.submit()?,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit()?,

            // Help (? or h)
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.popup = Popup::Help,

            // Return the picked card to its deck
            KeyCode::Char('b') => self.put_back()?,

            // Escape clears the last outcome
            KeyCode::Esc => {
                self.outcome = None;
                self.deck = None;
                self.status_message = None;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::CardPicker => self.handle_card_picker_key(key),
            Popup::None => Ok(()),
        }
    }

    fn handle_card_picker_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.popup = Popup::None;
                self.card_input.clear();
            }
            KeyCode::Enter => {
                let card: Card = self.card_input.parse()?;
                let values = self.form.values()?;
                self.run_action(&values, Some(card))?;
                self.popup = Popup::None;
                self.card_input.clear();
            }
            KeyCode::Backspace => {
                self.card_input.pop();
            }
            KeyCode::Char(c) => {
                // Rank/suit letters, digits, suit symbols and '*' for a joker
                let allowed = c.is_ascii_alphanumeric() || "*♠♥♣♦".contains(c);
                if allowed && self.card_input.chars().count() < CARD_INPUT_MAX {
                    self.card_input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Read the form values and run the chosen action
    fn submit(&mut self) -> Result<()> {
        let values = self.form.values()?;
        tracing::debug!(?values, "form submitted");

        if values.deck_action == DeckAction::PickSpecific {
            self.card_input.clear();
            self.popup = Popup::CardPicker;
            return Ok(());
        }

        self.run_action(&values, None)
    }

    fn run_action(&mut self, values: &FormValues, wanted: Option<Card>) -> Result<()> {
        let mut deck = Deck::from_values(values.number_of_cards, values.number_of_jokers)?;
        let outcome = ActionOutcome::perform(&mut deck, values.deck_action, &mut self.rng, wanted)?;
        let msg = match &outcome {
            ActionOutcome::Shuffled { cards } => format!("Shuffled {} cards", cards.len()),
            ActionOutcome::Picked { card, remaining } => {
                format!("Picked {} ({} left in the deck)", card, remaining)
            }
        };
        self.set_status(msg);
        self.outcome = Some(outcome);
        self.deck = Some(deck);
        Ok(())
    }

    /// Insert the last picked card back into the deck it came from
    fn put_back(&mut self) -> Result<()> {
        let (Some(deck), Some(ActionOutcome::Picked { card, .. })) = (self.deck.as_mut(), &self.outcome) else {
            return Ok(());
        };
        let card = *card;

        deck.insert_card(card, false)?;
        let msg = if deck.is_valid_deck() {
            format!("Put {} back, the deck is complete again", card)
        } else {
            format!("Put {} back ({} in the deck)", card, deck.len())
        };

        self.outcome = None;
        self.set_status(msg);
        Ok(())
    }

    /// Periodic housekeeping from the event loop
    pub fn tick(&mut self) {
        if let Some(t) = self.status_message_time {
            if t.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}
