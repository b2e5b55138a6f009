use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    /// Order used when building a fresh deck
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn colour(self) -> Colour {
        match self {
            Suit::Spades | Suit::Clubs => Colour::Black,
            Suit::Hearts | Suit::Diamonds => Colour::Red,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' | '♠' => Some(Suit::Spades),
            'H' | '♥' => Some(Suit::Hearts),
            'C' | '♣' => Some(Suit::Clubs),
            'D' | '♦' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    fn from_code(s: &str) -> Option<Self> {
        let upper = s.to_ascii_uppercase();
        let code = if upper == "T" { "10" } else { upper.as_str() };
        Self::ALL.into_iter().find(|r| r.symbol() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    Standard { rank: Rank, suit: Suit },
    Joker,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{0}` is not a card (try AS, 10H, QD or *)")]
pub struct ParseCardError(pub String);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card::Standard { rank, suit }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker)
    }

    /// Jokers have no colour
    pub fn colour(&self) -> Option<Colour> {
        match self {
            Card::Standard { suit, .. } => Some(suit.colour()),
            Card::Joker => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Standard { rank, suit } => write!(f, "{}{}", rank.symbol(), suit.symbol()),
            Card::Joker => f.write_str("**"),
        }
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code == "*" || code == "**" || code.eq_ignore_ascii_case("joker") {
            return Ok(Card::Joker);
        }

        let err = || ParseCardError(code.to_string());
        let suit_char = code.chars().last().ok_or_else(err)?;
        let suit = Suit::from_code(suit_char).ok_or_else(err)?;
        let rank_part = &code[..code.len() - suit_char.len_utf8()];
        let rank = Rank::from_code(rank_part).ok_or_else(err)?;
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_colour() {
        assert_eq!(Card::new(Rank::Three, Suit::Spades).colour(), Some(Colour::Black));
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).colour(), Some(Colour::Black));
        assert_eq!(Card::new(Rank::King, Suit::Hearts).colour(), Some(Colour::Red));
        assert_eq!(Card::new(Rank::Ace, Suit::Diamonds).colour(), Some(Colour::Red));
        assert_eq!(Card::Joker.colour(), None);
    }

    #[test]
    fn test_pretty_card() {
        assert_eq!(Card::new(Rank::Three, Suit::Spades).to_string(), "3♠");
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).to_string(), "10♣");
        assert_eq!(Card::new(Rank::King, Suit::Hearts).to_string(), "K♥");
        assert_eq!(Card::new(Rank::Ace, Suit::Diamonds).to_string(), "A♦");
        assert_eq!(Card::Joker.to_string(), "**");
    }

    #[test]
    fn test_parse_card_codes() {
        assert_eq!("AS".parse::<Card>().unwrap(), Card::new(Rank::Ace, Suit::Spades));
        assert_eq!("10h".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!("td".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!("K♥".parse::<Card>().unwrap(), Card::new(Rank::King, Suit::Hearts));
        assert!("q c".parse::<Card>().is_err());
        assert_eq!("*".parse::<Card>().unwrap(), Card::Joker);
        assert_eq!("Joker".parse::<Card>().unwrap(), Card::Joker);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Card>().is_err());
        assert!("S".parse::<Card>().is_err());
        assert!("1S".parse::<Card>().is_err());
        assert!("11H".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
    }

    #[test]
    fn test_same_card() {
        let card = Card::new(Rank::Three, Suit::Spades);
        assert_eq!(card, Card::new(Rank::Three, Suit::Spades));
        assert_ne!(card, Card::new(Rank::Three, Suit::Hearts));
        assert_ne!(card, Card::new(Rank::Four, Suit::Spades));
        assert_ne!(card, Card::Joker);
    }
}
