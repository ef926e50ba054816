use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dakar_core::{Category, ResultTable};
use dakar_scrapers::ListingExtractor;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

const BRANDS: &[&str] = &["Toyota", "Hyundai", "Kia", "Peugeot", "Renault", "Mercedes-Benz", "Nissan"];
const GEARBOXES: &[&str] = &["Automatique", "Manuelle"];
const FUELS: &[&str] = &["Essence", "Diesel", "Hybride"];

// Helper function to generate a feed page with fake listings
fn generate_page(listings: usize) -> String {
    let mut rng = rand::thread_rng();
    let cards: String = (0..listings)
        .map(|i| {
            let owner: String = Name().fake();
            format!(
                r#"<div class="listings-cards__list-item"><div class="listing-card">
                <h2 class="listing-card__header__title"><a href="/annonce/{i}">{brand} Model {year}</a></h2>
                <h3 class="listing-card__header__price">{price} FCFA</h3>
                <ul>
                    <li class="listing-card__attribute">Ref {i}</li>
                    <li class="listing-card__attribute">{km} km</li>
                    <li class="listing-card__attribute">{gearbox}</li>
                    <li class="listing-card__attribute">{fuel}</li>
                </ul>
                <div class="entry-zone-address">Dakar</div>
                <p class="time-author">Par {owner}</p>
                </div></div>"#,
                i = i,
                brand = BRANDS.choose(&mut rng).unwrap(),
                year = rng.gen_range(1995..2025),
                price = rng.gen_range(500_000..60_000_000),
                km = rng.gen_range(0..400_000),
                gearbox = GEARBOXES.choose(&mut rng).unwrap(),
                fuel = FUELS.choose(&mut rng).unwrap(),
                owner = owner,
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn bench_extraction(c: &mut Criterion) {
    let extractor = ListingExtractor::new(Category::Cars).unwrap();

    let mut group = c.benchmark_group("extraction");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for size in [25, 100, 500].iter() {
        let page = generate_page(*size);
        group.bench_with_input(BenchmarkId::new("extract", size), &page, |b, page| {
            b.iter(|| black_box(extractor.extract(page)));
        });
    }

    group.finish();
}

fn bench_csv_export(c: &mut Criterion) {
    let extractor = ListingExtractor::new(Category::Cars).unwrap();

    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    for size in [100, 1000].iter() {
        let table = ResultTable::from_records(Category::Cars, extractor.extract(&generate_page(*size)));
        group.bench_with_input(BenchmarkId::new("csv", size), &table, |b, table| {
            b.iter(|| {
                let mut out = Vec::new();
                table.write_csv(&mut out).unwrap();
                black_box(out)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_csv_export);
criterion_main!(benches);
