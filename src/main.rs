mod app;
mod config;
mod deck;
mod form;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use deck::{ActionOutcome, Card, DeckRng};
use form::{DeckAction, FormValues, MAX_COUNT};
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "deckform")]
#[command(version)]
#[command(about = "Configure a card deck and shuffle it or pick cards from it")]
struct Args {
    /// Number of non-joker cards in the deck
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_COUNT)))]
    cards: Option<u32>,

    /// Number of jokers in the deck
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_COUNT)))]
    jokers: Option<u32>,

    /// Deck action: shuffle, pick-random or pick-specific
    #[arg(short, long)]
    action: Option<DeckAction>,

    /// Seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Print the initial form values as JSON and exit
    #[arg(short, long)]
    state: bool,

    /// Run the deck action without the TUI and print the outcome as JSON
    #[arg(short, long)]
    run: bool,

    /// Card to pick with --run and pick-specific (e.g. AS, 10H, *)
    #[arg(long, requires = "run")]
    card: Option<Card>,
}

impl Args {
    /// Config defaults with command-line overrides applied
    fn form_values(&self, config: &AppConfig) -> FormValues {
        let mut values = FormValues::from(config.defaults);
        if let Some(cards) = self.cards {
            values.number_of_cards = cards;
        }
        if let Some(jokers) = self.jokers {
            values.number_of_jokers = jokers;
        }
        if let Some(action) = self.action {
            values.deck_action = action;
        }
        values
    }

    fn rng(&self, config: &AppConfig) -> DeckRng {
        match self.seed.or(config.seed) {
            Some(seed) => DeckRng::from_seed(seed),
            None => DeckRng::from_entropy(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging (stderr, so the TUI and JSON output stay clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = AppConfig::load();
    let values = args.form_values(&config);
    let rng = args.rng(&config);

    // Handle CLI-only commands
    if args.state {
        return print_state(&values);
    }

    if args.run {
        return run_headless(&values, rng, args.card);
    }

    ui::init_theme(Theme::load(&config.theme));

    // Run TUI
    run_tui(App::new(values, rng))
}

fn print_state(values: &FormValues) -> Result<()> {
    println!("{}", serde_json::to_string(values)?);
    Ok(())
}

fn run_headless(values: &FormValues, mut rng: DeckRng, card: Option<Card>) -> Result<()> {
    let outcome = ActionOutcome::run(values, &mut rng, card)?;
    let output = serde_json::json!({
        "form": values,
        "result": outcome,
        "seed": rng.seed(),
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.can_quit() => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Report errors in the info line instead of exiting
                            if let Err(e) = app.handle_key(key) {
                                tracing::debug!("key handling failed: {:#}", e);
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Periodic refresh
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_defaults() {
        let args = Args::parse_from(["deckform", "--jokers", "2", "--action", "pick-random"]);
        let values = args.form_values(&AppConfig::default());
        assert_eq!(
            values,
            FormValues {
                number_of_cards: 52,
                number_of_jokers: 2,
                deck_action: DeckAction::PickRandom,
            }
        );
    }

    #[test]
    fn test_cli_rejects_unknown_action() {
        assert!(Args::try_parse_from(["deckform", "--action", "deal"]).is_err());
    }

    #[test]
    fn test_card_requires_run() {
        assert!(Args::try_parse_from(["deckform", "--card", "AS"]).is_err());
        let args = Args::try_parse_from(["deckform", "--run", "--card", "AS"]).unwrap();
        assert!(args.card.is_some());
    }

    #[test]
    fn test_seed_falls_back_to_config() {
        let config = AppConfig {
            seed: Some(3),
            ..AppConfig::default()
        };
        let args = Args::parse_from(["deckform"]);
        assert_eq!(args.rng(&config).seed(), Some(3));

        let args = Args::parse_from(["deckform", "--seed", "8"]);
        assert_eq!(args.rng(&config).seed(), Some(8));
    }

    #[test]
    fn test_cli_caps_counts() {
        assert!(Args::try_parse_from(["deckform", "--cards", "4000000000"]).is_err());
        assert!(Args::try_parse_from(["deckform", "--jokers", "5201"]).is_err());
        let args = Args::try_parse_from(["deckform", "--cards", "5200"]).unwrap();
        assert_eq!(args.cards, Some(MAX_COUNT));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
