use clap::{Args, Parser, Subcommand, ValueEnum};
use mtg_draw_odds::analysis::{self, CardFilter, ColorMatch, SortKey};
use mtg_draw_odds::card::{CardDatabase, Category, Color};
use mtg_draw_odds::categorize::{Categorizer, CategorizerConfig};
use mtg_draw_odds::deck::{parse_deck_file, Deck, COMMANDER_DECK_SIZE};
use mtg_draw_odds::logging::init_logging;
use mtg_draw_odds::query::{self, cards_seen_by_turn, QueryLayer, Target, OPENING_HAND};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mtg-draw-odds")]
#[command(about = "Draw probabilities and deck statistics for Commander decks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Card database (JSON array of card records)
    #[arg(long, global = true, default_value = "cards.json")]
    cards: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Clone)]
struct DeckArgs {
    /// Deck list file
    #[arg(short, long, default_value = "deck.txt")]
    deck: PathBuf,

    /// Category rules file (JSON)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Creature subtype to track
    #[arg(long)]
    tribe: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category counts, mana curve and colors
    Stats {
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Standard draw scenarios for the deck
    Odds {
        #[command(flatten)]
        deck: DeckArgs,

        /// Cards seen when looking for ramp
        #[arg(long, default_value = "10")]
        ramp_draws: u32,

        /// Cards seen when looking for interaction
        #[arg(long, default_value = "7")]
        interaction_draws: u32,

        /// Use cards seen by this turn for ramp and interaction instead
        #[arg(long)]
        turn: Option<u32>,
    },

    /// Probability for explicit counts
    Custom {
        /// Cards in the library
        #[arg(short = 'N', long, default_value_t = COMMANDER_DECK_SIZE as i64)]
        population: i64,

        /// Cards of the wanted kind in the library
        #[arg(short = 'K', long)]
        successes: i64,

        /// Cards drawn
        #[arg(short = 'n', long, default_value_t = i64::from(OPENING_HAND))]
        draws: i64,

        /// Wanted count (lower bound for between)
        #[arg(short = 'k', long, default_value = "1")]
        wanted: i64,

        /// Upper bound for between
        #[arg(long)]
        max: Option<i64>,

        #[arg(long, value_enum, default_value = "at-least")]
        target: TargetKind,
    },

    /// Colored pip requirements and a basic land split
    ManaBase {
        #[command(flatten)]
        deck: DeckArgs,

        /// Total land count to plan for
        #[arg(long, default_value_t = analysis::DEFAULT_TOTAL_LANDS)]
        lands: u32,

        /// Slots kept for utility lands
        #[arg(long, default_value_t = analysis::DEFAULT_UTILITY_LANDS)]
        utility: u32,
    },

    /// List cards, filtered and sorted
    List {
        #[command(flatten)]
        deck: DeckArgs,

        /// Color letter (W, U, B, R, G, C); repeatable
        #[arg(short, long, value_parser = parse_color)]
        color: Vec<Color>,

        /// Require every listed color instead of any
        #[arg(long)]
        all_colors: bool,

        /// Card type (Land, Creature, Instant, ...); repeatable
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Case-insensitive name fragment
        #[arg(long)]
        name: Option<String>,

        /// Only cards holding this category
        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetKind {
    Exactly,
    AtLeast,
    AtMost,
    Between,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    CmcAsc,
    CmcDesc,
    Color,
    Type,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::CmcAsc => SortKey::ManaValueAsc,
            SortArg::CmcDesc => SortKey::ManaValueDesc,
            SortArg::Color => SortKey::Color,
            SortArg::Type => SortKey::Type,
        }
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Color::from_char(c).ok_or_else(|| format!("unknown color '{}'", s)),
        _ => Err(format!("expected one of W, U, B, R, G, C, got '{}'", s)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Custom {
            population,
            successes,
            draws,
            wanted,
            max,
            target,
        } => {
            run_custom(population, successes, draws, wanted, max, target, cli.json);
        }
        Commands::Stats { deck } => {
            let deck = load_deck(&cli.cards, &deck);
            print_stats(&deck, cli.json);
        }
        Commands::Odds {
            deck: deck_args,
            ramp_draws,
            interaction_draws,
            turn,
        } => {
            let categorizer = build_categorizer(&deck_args);
            let deck = load_categorized(&cli.cards, &deck_args, &categorizer);
            let (ramp_draws, interaction_draws) = match turn {
                Some(turn) => (cards_seen_by_turn(turn), cards_seen_by_turn(turn)),
                None => (ramp_draws, interaction_draws),
            };
            print_odds(
                &deck,
                categorizer.tribal_subtype(),
                ramp_draws,
                interaction_draws,
                cli.json,
            );
        }
        Commands::ManaBase {
            deck,
            lands,
            utility,
        } => {
            let deck = load_deck(&cli.cards, &deck);
            print_mana_base(&deck, lands, utility, cli.json);
        }
        Commands::List {
            deck,
            color,
            all_colors,
            types,
            name,
            category,
            sort,
        } => {
            let deck = load_deck(&cli.cards, &deck);
            let mode = if all_colors {
                ColorMatch::All
            } else {
                ColorMatch::Any
            };
            let mut filter = CardFilter::new()
                .colors(color, mode)
                .types(types)
                .sort_by(sort.into());
            if let Some(name) = name {
                filter = filter.name_contains(name);
            }
            print_list(&deck, &filter, category.map(Category::from), cli.json);
        }
    }
}

fn load_database(path: &Path) -> CardDatabase {
    match CardDatabase::from_file(path) {
        Ok(db) => {
            eprintln!("✓ Loaded {} cards from {}", db.card_count(), path.display());
            db
        }
        Err(e) => {
            eprintln!("✗ Failed to load cards from '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn build_categorizer(args: &DeckArgs) -> Categorizer {
    let categorizer = match &args.rules {
        Some(path) => match CategorizerConfig::from_file(path).and_then(|c| c.build()) {
            Ok(categorizer) => {
                eprintln!("✓ Loaded category rules from {}", path.display());
                categorizer
            }
            Err(e) => {
                eprintln!("✗ Failed to load rules from '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Categorizer::default(),
    };

    match &args.tribe {
        Some(tribe) => categorizer.with_tribal_subtype(tribe),
        None => categorizer,
    }
}

fn load_categorized(cards: &Path, args: &DeckArgs, categorizer: &Categorizer) -> Deck {
    let db = load_database(cards);
    let mut deck = match parse_deck_file(&args.deck, &db) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("✗ Failed to parse deck file '{}': {}", args.deck.display(), e);
            std::process::exit(1);
        }
    };
    if deck.len() != COMMANDER_DECK_SIZE {
        eprintln!(
            "! Deck has {} cards, Commander decks have {}",
            deck.len(),
            COMMANDER_DECK_SIZE
        );
    }
    categorizer.categorize(&mut deck);
    deck
}

fn load_deck(cards: &Path, args: &DeckArgs) -> Deck {
    let categorizer = build_categorizer(args);
    load_categorized(cards, args, &categorizer)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("✗ Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

fn percent(p: f64) -> String {
    format!("{:6.2}%", p * 100.0)
}

fn print_stats(deck: &Deck, json: bool) {
    let summary = analysis::summarize(deck);
    if json {
        print_json(&summary);
        return;
    }

    println!("\n=== Deck Statistics ===\n");
    println!("Total cards: {}", summary.total_cards);
    println!("Categorized: {}", summary.categorized);
    println!();

    println!("Categories:");
    for (category, count) in &summary.category_counts {
        println!("  {:<18} {:3}", category.to_string(), count);
    }
    println!();

    println!("Mana curve (nonland):");
    for (bucket, count) in &summary.mana_curve {
        let bar = "█".repeat(*count);
        println!("  {:>3}: {:3} {}", bucket.to_string(), count, bar);
    }
    println!("Average mana value: {:.2}", summary.average_cost);
    println!();

    println!("Colors:");
    for (color, count) in &summary.color_distribution {
        println!("  {:<10} {:3}", color.name(), count);
    }
}

#[derive(Serialize)]
struct OddsReport {
    lands: query::LandReport,
    scenarios: Vec<query::QueryResult>,
}

fn print_odds(
    deck: &Deck,
    tribal_subtype: Option<&str>,
    ramp_draws: u32,
    interaction_draws: u32,
    json: bool,
) {
    let layer = QueryLayer::new(deck);
    let lands = match layer.land_report() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ Failed to compute land odds: {}", e);
            std::process::exit(1);
        }
    };

    let queries = query::standard_scenarios(tribal_subtype, ramp_draws, interaction_draws);
    let mut scenarios = Vec::new();
    for (query, result) in queries.iter().zip(layer.evaluate_all(&queries)) {
        match result {
            Ok(result) => scenarios.push(result),
            Err(e) => eprintln!("✗ {}: {}", query.label, e),
        }
    }

    if json {
        print_json(&OddsReport { lands, scenarios });
        return;
    }

    println!("\n=== Opening Hand Lands ===\n");
    println!("Lands in deck: {}/{}", lands.lands, lands.deck_size);
    for (k, p) in &lands.exact {
        let bar = "█".repeat((p * 50.0) as usize);
        println!("  Exactly {}: {} {}", k, percent(*p), bar);
    }
    println!();
    println!("  0-1 lands (screw):  {}", percent(lands.screw));
    println!("  2-4 lands (keep):   {}", percent(lands.keepable));
    println!("  3-4 lands (ideal):  {}", percent(lands.ideal));
    println!("  5+ lands (flood):   {}", percent(lands.flood));
    println!("  At least 2 lands:   {}", percent(lands.at_least_two));
    println!("  Expected lands:     {:.2}", lands.expected);

    println!("\n=== Scenarios ===\n");
    for result in &scenarios {
        match result.outcome {
            query::Outcome::Probability(p) => println!(
                "  {:<40} {} ({} of {})",
                result.label,
                percent(p),
                result.successes,
                result.population
            ),
            query::Outcome::NoCardsInCategory => {
                println!("  {:<40}    none in deck", result.label)
            }
        }
    }
}

fn run_custom(
    population: i64,
    successes: i64,
    draws: i64,
    wanted: i64,
    max: Option<i64>,
    kind: TargetKind,
    json: bool,
) {
    let target = match kind {
        TargetKind::Exactly => Target::exactly(wanted),
        TargetKind::AtLeast => Target::at_least(wanted),
        TargetKind::AtMost => Target::at_most(wanted),
        TargetKind::Between => Target::between(wanted, max.unwrap_or(wanted)),
    };

    let p = match QueryLayer::custom(population, successes, draws, target) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    if json {
        print_json(&serde_json::json!({
            "population": population,
            "successes": successes,
            "draws": draws,
            "target": target,
            "probability": p,
        }));
        return;
    }

    println!(
        "P({} of {} in {} draws from {}) = {}",
        target,
        successes,
        draws,
        population,
        percent(p).trim()
    );
}

#[derive(Serialize)]
struct ManaBaseReport {
    requirements: std::collections::BTreeMap<Color, f64>,
    percentages: std::collections::BTreeMap<Color, f64>,
    current: analysis::LandCounts,
    suggested_basics: std::collections::BTreeMap<Color, u32>,
    total_lands: u32,
    utility_lands: u32,
}

fn print_mana_base(deck: &Deck, total_lands: u32, utility_lands: u32, json: bool) {
    let report = ManaBaseReport {
        requirements: analysis::color_requirements(deck),
        percentages: analysis::color_percentages(deck),
        current: analysis::land_counts(deck),
        suggested_basics: analysis::suggest_basics(deck, total_lands, utility_lands),
        total_lands,
        utility_lands,
    };
    if json {
        print_json(&report);
        return;
    }

    println!("\n=== Mana Base ===\n");
    println!(
        "Current lands: {} ({} multicolor)",
        report.current.total, report.current.multicolor
    );
    for (color, count) in &report.current.basics_by_color {
        println!("  {:<10} {:3}", color.name(), count);
    }
    println!();

    if report.requirements.is_empty() {
        println!("No colored mana symbols found.");
        return;
    }

    println!("Color requirements:");
    for (color, pips) in &report.requirements {
        let share = report.percentages.get(color).copied().unwrap_or(0.0);
        println!("  {:<10} {:5.1} pips ({:4.1}%)", color.name(), pips, share);
    }
    println!();

    println!(
        "Suggested basics ({} lands, {} utility):",
        total_lands, utility_lands
    );
    for (color, count) in &report.suggested_basics {
        println!("  {:<10} {:3}", color.name(), count);
    }
}

#[derive(Serialize)]
struct ListedCard<'a> {
    name: &'a str,
    count: usize,
    mana_value: u32,
    type_line: &'a str,
    categories: Vec<String>,
}

fn print_list(deck: &Deck, filter: &CardFilter, category: Option<Category>, json: bool) {
    let cards: Vec<_> = filter
        .apply(deck)
        .into_iter()
        .filter(|card| category.as_ref().map_or(true, |c| card.has_category(c)))
        .collect();

    // Collapse repeated records, keeping the sorted order
    let mut listed: Vec<ListedCard> = Vec::new();
    for card in cards {
        match listed.iter_mut().find(|l| l.name == card.name) {
            Some(entry) => entry.count += 1,
            None => listed.push(ListedCard {
                name: &card.name,
                count: 1,
                mana_value: card.mana_value,
                type_line: &card.type_line,
                categories: card.categories().iter().map(|c| c.to_string()).collect(),
            }),
        }
    }

    if json {
        print_json(&listed);
        return;
    }

    let total: usize = listed.iter().map(|l| l.count).sum();
    println!("\n=== Cards ({}) ===\n", total);
    for card in &listed {
        println!(
            "  {:2}x {:<32} {:2}  {:<36} [{}]",
            card.count,
            card.name,
            card.mana_value,
            card.type_line,
            card.categories.join(", ")
        );
    }
}
