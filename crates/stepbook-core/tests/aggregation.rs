//! End-to-end aggregation tests over a generated journal

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{rngs::StdRng, Rng, SeedableRng};
use stepbook_core::{
    aggregate, Difficulty, JournalStore, MediaKind, Mood, PracticeRecord, RangeSelector,
};

const STYLES: &[&str] = &[
    "Hip Hop",
    "Contemporary",
    "Ballet",
    "Jazz",
    "House",
    "K-Pop",
    "Heels",
];

const STUDIOS: &[&str] = &[
    "Millennium",
    "Playground LA",
    "Broadway Dance Center",
    "Local Gym",
    "Home Studio",
];

const INSTRUCTORS: &[&str] = &["Alex", "Sarah", "Mike", "Jasmine", "Self", "Emily"];

const NOTES: &[&str] = &[
    "Really felt the music today!",
    "Hard choreography, need to practice the bridge.",
    "Tired but pushed through.",
    "Amazing energy in class.",
    "Worked on basics and foundation.",
    "Freestyle session was great.",
];

const MOODS: &[Mood] = &[
    Mood::Happy,
    Mood::Tired,
    Mood::Energized,
    Mood::Relaxed,
    Mood::Frustrated,
];

const DIFFICULTIES: &[Difficulty] = &[
    Difficulty::Beginner,
    Difficulty::Intermediate,
    Difficulty::Advanced,
    Difficulty::Open,
];

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 14)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Generate `count` records spread over the 60 days before `now`,
/// mirroring the journal's demo-data shape.
fn mock_records(now: NaiveDateTime, count: usize, seed: u64) -> Vec<PracticeRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let days_ago = rng.gen_range(0..60);
            let occurred_at = (now - Duration::days(days_ago))
                .date()
                .and_hms_opt(10 + rng.gen_range(0..10), rng.gen_range(0..4) * 15, 0)
                .unwrap();

            let mut record = PracticeRecord::new(
                occurred_at,
                STYLES[rng.gen_range(0..STYLES.len())],
                60 + rng.gen_range(0..3) * 15,
            )
            .with_studio(STUDIOS[rng.gen_range(0..STUDIOS.len())])
            .with_instructor(INSTRUCTORS[rng.gen_range(0..INSTRUCTORS.len())])
            .with_difficulty(DIFFICULTIES[rng.gen_range(0..DIFFICULTIES.len())])
            .with_mood(MOODS[rng.gen_range(0..MOODS.len())])
            .with_notes(NOTES[rng.gen_range(0..NOTES.len())])
            .with_music(format!("Test Track {}", i + 1));

            if rng.gen_bool(0.4) {
                record = record.with_media(
                    format!("https://picsum.photos/seed/{i}/400/300"),
                    MediaKind::Image,
                );
            }
            record
        })
        .collect()
}

#[test]
fn aggregation_survives_a_store_roundtrip() {
    let records = mock_records(fixed_now(), 20, 7);
    let store = JournalStore::open(":memory:").unwrap();
    for record in &records {
        store.upsert_record(record).unwrap();
    }

    let window = RangeSelector::Month.resolve(fixed_now());
    let direct = aggregate(&records, &window);
    let via_store = aggregate(&store.all_records().unwrap(), &window);

    assert_eq!(direct.stats, via_store.stats);
    assert_eq!(direct.trend, via_store.trend);
    assert_eq!(direct.filtered, via_store.filtered);
}

#[test]
fn every_selector_filters_and_partitions_its_window() {
    let records = mock_records(fixed_now(), 40, 11);

    for selector in [
        RangeSelector::Week,
        RangeSelector::Month,
        RangeSelector::LastMonth,
        RangeSelector::Year,
    ] {
        let window = selector.resolve(fixed_now());
        let report = aggregate(&records, &window);

        // Filtered set matches the window predicate exactly
        let expected = records
            .iter()
            .filter(|r| window.start <= r.occurred_at && r.occurred_at <= window.end)
            .count();
        assert_eq!(report.stats.session_count, expected, "{selector:?}");

        // Buckets are contiguous, non-overlapping, and cover the window
        let trend = &report.trend;
        assert_eq!(trend.first().unwrap().start, window.start_date(), "{selector:?}");
        assert_eq!(trend.last().unwrap().end, window.end_date(), "{selector:?}");
        for pair in trend.windows(2) {
            assert_eq!(
                pair[1].start,
                pair[0].end + Duration::days(1),
                "{selector:?}"
            );
        }

        // Buckets partition the window, so their values re-aggregate
        // to the filtered total
        let bucket_total: f64 = trend.iter().map(|b| b.hours).sum();
        let total_hours = report.stats.total_minutes as f64 / 60.0;
        assert!((bucket_total - total_hours).abs() < 1e-9, "{selector:?}");

        // Enumeration order is ascending by occurrence
        assert!(report
            .filtered
            .windows(2)
            .all(|pair| pair[0].occurred_at <= pair[1].occurred_at));
    }
}

#[test]
fn input_order_never_changes_the_report() {
    let mut records = mock_records(fixed_now(), 20, 3);
    let window = RangeSelector::Month.resolve(fixed_now());
    let baseline = aggregate(&records, &window);

    records.reverse();
    let reversed = aggregate(&records, &window);

    assert_eq!(baseline.stats.total_minutes, reversed.stats.total_minutes);
    assert_eq!(baseline.stats.session_count, reversed.stats.session_count);
    assert_eq!(baseline.trend, reversed.trend);
    assert_eq!(baseline.filtered, reversed.filtered);
}
