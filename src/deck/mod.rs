//! Deck of cards built from the form values, and the actions the form can request

pub mod card;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Serialize;

pub use card::{Card, Colour, Rank, Suit};

use crate::form::{DeckAction, FormValues, MAX_COUNT};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("cannot pick {wanted} card(s), only {available} left in the deck")]
    NotEnoughCards { wanted: usize, available: usize },
    #[error("card {0} is not in the deck")]
    CardNotInDeck(Card),
    #[error("no card chosen to pick")]
    NoCardChosen,
    #[error("a deck holds at most {max} cards and {max} jokers, asked for {cards} and {jokers}")]
    TooManyCards { cards: u32, jokers: u32, max: u32 },
    #[error("the deck is full")]
    DeckFull,
    #[error("card {card} is already in the deck {occurrences} time(s)")]
    DuplicateCard { card: Card, occurrences: usize },
    #[error("card {0} does not belong in this deck")]
    NotPartOfDeck(Card),
}

/// Random source for shuffling and picking
#[derive(Debug, Clone)]
pub struct DeckRng {
    seed: Option<u64>,
    rng: StdRng,
}

impl DeckRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// One pack of 52 in suit/rank order
fn pack() -> impl Iterator<Item = Card> + Clone {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
}

const PACK_LEN: usize = Suit::ALL.len() * Rank::ALL.len();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    // Layout the deck was built with; decides when it is full or valid
    number_of_cards: u32,
    number_of_jokers: u32,
}

impl Deck {
    /// `number_of_cards` non-joker cards in pack order, starting another pack
    /// once the first is used up, followed by `number_of_jokers` jokers.
    /// Either count above [`MAX_COUNT`] is refused before anything is allocated.
    pub fn from_values(number_of_cards: u32, number_of_jokers: u32) -> Result<Self, DeckError> {
        if number_of_cards > MAX_COUNT || number_of_jokers > MAX_COUNT {
            return Err(DeckError::TooManyCards {
                cards: number_of_cards,
                jokers: number_of_jokers,
                max: MAX_COUNT,
            });
        }

        let cards = pack()
            .cycle()
            .take(number_of_cards as usize)
            .chain(std::iter::repeat(Card::Joker).take(number_of_jokers as usize))
            .collect();

        Ok(Self {
            cards,
            number_of_cards,
            number_of_jokers,
        })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck as built
    pub fn capacity(&self) -> usize {
        self.number_of_cards as usize + self.number_of_jokers as usize
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    pub fn is_over_filled(&self) -> bool {
        self.len() > self.capacity()
    }

    /// Full, and every card appears exactly as often as in a fresh deck
    pub fn is_valid_deck(&self) -> bool {
        self.is_full()
            && pack()
                .chain(std::iter::once(Card::Joker))
                .all(|card| self.occurrences(&card) == self.expected_occurrences(&card))
    }

    pub fn occurrences(&self, card: &Card) -> usize {
        self.cards.iter().filter(|c| *c == card).count()
    }

    /// How many copies of `card` a fresh deck with this layout holds
    fn expected_occurrences(&self, card: &Card) -> usize {
        match card {
            Card::Joker => self.number_of_jokers as usize,
            Card::Standard { .. } => {
                let n = self.number_of_cards as usize;
                let pos = pack().position(|c| c == *card).unwrap_or(PACK_LEN);
                n / PACK_LEN + usize::from(pos < n % PACK_LEN)
            }
        }
    }

    pub fn shuffle(&mut self, rng: &mut DeckRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove and return one random card
    pub fn pick_random_card(&mut self, rng: &mut DeckRng) -> Result<Card, DeckError> {
        if self.is_empty() {
            return Err(DeckError::NotEnoughCards {
                wanted: 1,
                available: 0,
            });
        }
        let idx = rng.index(self.cards.len());
        Ok(self.cards.remove(idx))
    }

    /// Remove and return `count` random cards
    pub fn pick_random_cards(&mut self, count: usize, rng: &mut DeckRng) -> Result<Vec<Card>, DeckError> {
        if count > self.cards.len() {
            return Err(DeckError::NotEnoughCards {
                wanted: count,
                available: self.cards.len(),
            });
        }

        (0..count).map(|_| self.pick_random_card(rng)).collect()
    }

    /// Remove and return the first copy of a specific card
    pub fn pick_card(&mut self, card: &Card) -> Result<Card, DeckError> {
        let idx = self
            .cards
            .iter()
            .position(|c| c == card)
            .ok_or(DeckError::CardNotInDeck(*card))?;
        Ok(self.cards.remove(idx))
    }

    /// Put a card back at the bottom of the deck. Unless `force` is set, the
    /// deck must not be full and the card must not already be in it as many
    /// times as a fresh deck holds it.
    pub fn insert_card(&mut self, card: Card, force: bool) -> Result<(), DeckError> {
        if !force {
            if self.is_full() || self.is_over_filled() {
                return Err(DeckError::DeckFull);
            }

            let expected = self.expected_occurrences(&card);
            if expected == 0 {
                return Err(DeckError::NotPartOfDeck(card));
            }
            let occurrences = self.occurrences(&card);
            if occurrences >= expected {
                return Err(DeckError::DuplicateCard { card, occurrences });
            }
        }

        tracing::debug!(%card, force, "card inserted");
        self.cards.push(card);
        Ok(())
    }
}

/// Result of running a deck action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ActionOutcome {
    Shuffled { cards: Vec<Card> },
    Picked { card: Card, remaining: usize },
}

impl ActionOutcome {
    /// Build the deck described by `values` and perform its action.
    /// `wanted` is the card for `pick-specific` and ignored otherwise.
    pub fn run(values: &FormValues, rng: &mut DeckRng, wanted: Option<Card>) -> Result<Self, DeckError> {
        let mut deck = Deck::from_values(values.number_of_cards, values.number_of_jokers)?;
        Self::perform(&mut deck, values.deck_action, rng, wanted)
    }

    /// Perform `action` on `deck`, leaving the deck as the action left it
    pub fn perform(
        deck: &mut Deck,
        action: DeckAction,
        rng: &mut DeckRng,
        wanted: Option<Card>,
    ) -> Result<Self, DeckError> {
        tracing::info!(
            cards = deck.len(),
            action = %action,
            seed = ?rng.seed(),
            "running deck action"
        );

        match action {
            DeckAction::Shuffle => {
                deck.shuffle(rng);
                Ok(ActionOutcome::Shuffled {
                    cards: deck.cards().to_vec(),
                })
            }
            DeckAction::PickRandom => {
                let card = deck.pick_random_card(rng)?;
                Ok(ActionOutcome::Picked {
                    card,
                    remaining: deck.len(),
                })
            }
            DeckAction::PickSpecific => {
                let wanted = wanted.ok_or(DeckError::NoCardChosen)?;
                let card = deck.pick_card(&wanted)?;
                Ok(ActionOutcome::Picked {
                    card,
                    remaining: deck.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Deck {
        /// A full pack in suit/rank order
        fn standard() -> Self {
            Self::from_values(52, 0).unwrap()
        }
    }

    /// Percentage of `iterations` runs in which `event` happened
    fn probability(iterations: u32, mut event: impl FnMut() -> bool) -> f64 {
        let hits = (0..iterations).filter(|_| event()).count();
        hits as f64 / f64::from(iterations) * 100.0
    }

    fn values(cards: u32, jokers: u32, action: DeckAction) -> FormValues {
        FormValues {
            number_of_cards: cards,
            number_of_jokers: jokers,
            deck_action: action,
        }
    }

    #[test]
    fn test_standard_deck_order() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.cards()[0], Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(deck.cards()[13], Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(deck.cards()[51], Card::new(Rank::King, Suit::Diamonds));
        for card in deck.cards() {
            assert_eq!(deck.occurrences(card), 1);
        }
    }

    #[test]
    fn test_from_values_cycles_packs_and_adds_jokers() {
        let deck = Deck::from_values(104, 2).unwrap();
        assert_eq!(deck.len(), 106);
        assert!(deck.is_valid_deck());
        assert_eq!(deck.occurrences(&Card::new(Rank::Queen, Suit::Clubs)), 2);
        assert_eq!(deck.occurrences(&Card::Joker), 2);
        assert!(deck.cards()[104].is_joker());

        let short = Deck::from_values(3, 0).unwrap();
        assert_eq!(
            short.cards(),
            &[
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::Two, Suit::Spades),
                Card::new(Rank::Three, Suit::Spades),
            ]
        );
        assert!(Deck::from_values(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut rng = DeckRng::from_seed(7);
        let ordered = Deck::standard();
        let mut shuffled = Deck::standard();
        shuffled.shuffle(&mut rng);

        assert_eq!(shuffled.len(), ordered.len());
        assert_ne!(shuffled, ordered);
        for card in ordered.cards() {
            assert_eq!(shuffled.occurrences(card), 1);
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let mut a = Deck::standard();
        let mut b = Deck::standard();
        a.shuffle(&mut DeckRng::from_seed(42));
        b.shuffle(&mut DeckRng::from_seed(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_random_cards_removes_them() {
        let mut rng = DeckRng::from_seed(1);
        let mut deck = Deck::standard();

        let first = deck.pick_random_card(&mut rng).unwrap();
        assert_eq!(deck.len(), 51);
        assert_eq!(deck.occurrences(&first), 0);

        let picked = deck.pick_random_cards(4, &mut rng).unwrap();
        assert_eq!(picked.len(), 4);
        assert_eq!(deck.len(), 47);
        assert!(!picked.contains(&first));

        let err = deck.pick_random_cards(48, &mut rng).unwrap_err();
        assert_eq!(err, DeckError::NotEnoughCards { wanted: 48, available: 47 });
        assert_eq!(deck.len(), 47);
    }

    #[test]
    fn test_pick_from_empty_deck() {
        let mut deck = Deck::from_values(0, 0).unwrap();
        let err = deck.pick_random_card(&mut DeckRng::from_seed(3)).unwrap_err();
        assert_eq!(err, DeckError::NotEnoughCards { wanted: 1, available: 0 });
    }

    #[test]
    fn test_pick_specific_card() {
        let mut deck = Deck::standard();
        let ace = Card::new(Rank::Ace, Suit::Hearts);
        assert_eq!(deck.pick_card(&ace).unwrap(), ace);
        assert_eq!(deck.len(), 51);
        assert_eq!(deck.pick_card(&ace), Err(DeckError::CardNotInDeck(ace)));
        assert_eq!(deck.pick_card(&Card::Joker), Err(DeckError::CardNotInDeck(Card::Joker)));
    }

    #[test]
    fn test_run_shuffle() {
        let mut rng = DeckRng::from_seed(9);
        let outcome = ActionOutcome::run(&values(52, 2, DeckAction::Shuffle), &mut rng, None).unwrap();
        match outcome {
            ActionOutcome::Shuffled { cards } => {
                assert_eq!(cards.len(), 54);
                assert_eq!(cards.iter().filter(|c| c.is_joker()).count(), 2);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_run_pick_random() {
        let mut rng = DeckRng::from_seed(9);
        let outcome = ActionOutcome::run(&values(10, 0, DeckAction::PickRandom), &mut rng, None).unwrap();
        match outcome {
            ActionOutcome::Picked { card, remaining } => {
                assert_eq!(remaining, 9);
                assert_eq!(card.colour(), Some(Colour::Black));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_run_pick_specific() {
        let mut rng = DeckRng::from_seed(9);
        let form = values(52, 1, DeckAction::PickSpecific);

        let joker = ActionOutcome::run(&form, &mut rng, Some(Card::Joker)).unwrap();
        assert_eq!(joker, ActionOutcome::Picked { card: Card::Joker, remaining: 52 });

        assert_eq!(ActionOutcome::run(&form, &mut rng, None), Err(DeckError::NoCardChosen));

        let small = values(13, 0, DeckAction::PickSpecific);
        let missing = Card::new(Rank::Ace, Suit::Hearts);
        assert_eq!(
            ActionOutcome::run(&small, &mut rng, Some(missing)),
            Err(DeckError::CardNotInDeck(missing))
        );
    }

    #[test]
    fn test_outcome_json() {
        let outcome = ActionOutcome::Picked {
            card: Card::new(Rank::King, Suit::Hearts),
            remaining: 51,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "picked");
        assert_eq!(json["card"], "K♥");
        assert_eq!(json["remaining"], 51);
    }

    #[test]
    fn test_huge_counts_are_refused_up_front() {
        let err = Deck::from_values(u32::MAX, 0).unwrap_err();
        assert_eq!(err, DeckError::TooManyCards { cards: u32::MAX, jokers: 0, max: MAX_COUNT });
        assert!(Deck::from_values(0, MAX_COUNT + 1).is_err());
        assert_eq!(Deck::from_values(MAX_COUNT, 0).unwrap().len(), MAX_COUNT as usize);

        let mut rng = DeckRng::from_seed(4);
        let huge = values(4_000_000_000, 0, DeckAction::Shuffle);
        assert!(matches!(
            ActionOutcome::run(&huge, &mut rng, None),
            Err(DeckError::TooManyCards { .. })
        ));
    }

    #[test]
    fn test_card_occurrences_after_insert() {
        let mut rng = DeckRng::from_seed(12);
        let mut deck = Deck::standard();
        let picked = deck.pick_random_card(&mut rng).unwrap();
        assert_eq!(deck.occurrences(&picked), 0);

        deck.insert_card(picked, false).unwrap();
        assert_eq!(deck.occurrences(&picked), 1);

        deck.insert_card(picked, true).unwrap();
        assert_eq!(deck.occurrences(&picked), 2);
    }

    #[test]
    fn test_full_and_over_filled() {
        let mut rng = DeckRng::from_seed(13);
        let mut deck = Deck::standard();
        assert!(deck.is_full());
        assert!(!deck.is_over_filled());

        let picked = deck.pick_random_card(&mut rng).unwrap();
        assert!(!deck.is_full());
        assert!(!deck.is_over_filled());

        deck.insert_card(picked, false).unwrap();
        deck.insert_card(Card::new(Rank::Two, Suit::Clubs), true).unwrap();
        assert!(!deck.is_full());
        assert!(deck.is_over_filled());
    }

    #[test]
    fn test_insert_into_full_deck() {
        let mut rng = DeckRng::from_seed(14);
        let mut deck = Deck::standard();
        let picked = deck.pick_random_card(&mut rng).unwrap();
        assert_eq!(deck.len(), 51);

        deck.insert_card(picked, false).unwrap();
        assert_eq!(deck.len(), 52);
        assert!(deck.is_valid_deck());

        assert_eq!(deck.insert_card(picked, false), Err(DeckError::DeckFull));
        assert_eq!(deck.len(), 52);

        deck.insert_card(picked, true).unwrap();
        assert_eq!(deck.len(), 53);
        assert!(!deck.is_valid_deck());
    }

    #[test]
    fn test_insert_existing_card() {
        let mut rng = DeckRng::from_seed(15);
        let mut deck = Deck::standard();
        let picked = deck.pick_random_cards(2, &mut rng).unwrap();
        assert_eq!(deck.len(), 50);

        deck.insert_card(picked[0], false).unwrap();
        assert_eq!(deck.len(), 51);
        assert_eq!(
            deck.insert_card(picked[0], false),
            Err(DeckError::DuplicateCard { card: picked[0], occurrences: 1 })
        );
        assert_eq!(deck.len(), 51);

        // Full again, but with one card twice and another missing
        deck.insert_card(picked[0], true).unwrap();
        assert!(deck.is_full());
        assert!(!deck.is_valid_deck());
    }

    #[test]
    fn test_insert_card_the_deck_never_had() {
        let mut deck = Deck::from_values(13, 0).unwrap();
        deck.pick_card(&Card::new(Rank::Ace, Suit::Spades)).unwrap();

        assert_eq!(deck.insert_card(Card::Joker, false), Err(DeckError::NotPartOfDeck(Card::Joker)));
        let heart = Card::new(Rank::Ace, Suit::Hearts);
        assert_eq!(deck.insert_card(heart, false), Err(DeckError::NotPartOfDeck(heart)));
        assert_eq!(deck.len(), 12);
    }

    #[test]
    fn test_is_valid_deck() {
        let mut rng = DeckRng::from_seed(16);
        let mut deck = Deck::standard();
        assert!(deck.is_valid_deck());

        let picked = deck.pick_random_card(&mut rng).unwrap();
        assert!(!deck.is_valid_deck());

        deck.insert_card(picked, false).unwrap();
        assert!(deck.is_valid_deck());

        // Partial packs count only the cards they were built with
        let mut short = Deck::from_values(60, 1).unwrap();
        assert!(short.is_valid_deck());
        assert_eq!(short.occurrences(&Card::new(Rank::Eight, Suit::Spades)), 2);
        assert_eq!(short.occurrences(&Card::new(Rank::Nine, Suit::Spades)), 1);
        let eight = short.pick_card(&Card::new(Rank::Eight, Suit::Spades)).unwrap();
        short.insert_card(eight, false).unwrap();
        assert!(short.is_valid_deck());
    }

    #[test]
    fn test_red_card_probability() {
        assert_eq!(probability(5, || true), 100.0);
        assert_eq!(probability(5, || false), 0.0);

        let mut rng = DeckRng::from_seed(2024);
        let chance = probability(1000, || {
            let mut deck = Deck::standard();
            deck.pick_random_card(&mut rng).unwrap().colour() == Some(Colour::Red)
        });
        assert!(40.0 < chance && chance < 60.0, "red came up {}%", chance);
    }
}
