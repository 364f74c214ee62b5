use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mtg_draw_odds::card::CardDatabase;
use mtg_draw_odds::categorize::Categorizer;
use mtg_draw_odds::deck::parse_deck_file;
use mtg_draw_odds::probability::{at_least, exactly, Hypergeometric};
use mtg_draw_odds::query::{standard_scenarios, QueryLayer};

fn benchmark_commander_hand(c: &mut Criterion) {
    c.bench_function("exactly_99_37_7_3", |b| {
        b.iter(|| exactly(black_box(99), black_box(37), black_box(7), black_box(3)))
    });
}

fn benchmark_large_population(c: &mut Criterion) {
    c.bench_function("at_least_5000_2500_2500_1250", |b| {
        b.iter(|| at_least(black_box(5000), black_box(2500), black_box(2500), black_box(1250)))
    });

    let dist = Hypergeometric::new(5000, 2500, 2500).expect("valid parameters");
    c.bench_function("distribution_5000_2500_2500", |b| {
        b.iter(|| black_box(&dist).distribution())
    });
}

fn benchmark_deck_pipeline(c: &mut Criterion) {
    let db = CardDatabase::from_file("cards.json").expect("Failed to load cards");
    let categorizer = Categorizer::default();

    c.bench_function("parse_and_categorize", |b| {
        b.iter(|| {
            let mut deck = parse_deck_file(black_box("deck.txt"), black_box(&db))
                .expect("Failed to parse deck");
            categorizer.categorize(&mut deck);
            deck
        })
    });

    let mut deck = parse_deck_file("deck.txt", &db).expect("Failed to parse deck");
    categorizer.categorize(&mut deck);
    let queries = standard_scenarios(Some("Elemental"), 10, 7);
    c.bench_function("standard_scenarios", |b| {
        b.iter(|| QueryLayer::new(black_box(&deck)).evaluate_all(black_box(&queries)))
    });
}

criterion_group!(
    benches,
    benchmark_commander_hand,
    benchmark_large_population,
    benchmark_deck_pipeline
);
criterion_main!(benches);
