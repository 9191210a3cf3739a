mod utils;

use rand::SeedableRng;
use rand::rngs::StdRng;
use utils::{date, random_records};
use ward_metrics::algorithm::{
    OngoingStayPolicy, ReadmissionWindows, average_occupancy, classify_readmissions,
    group_by_patient, length_of_stay_summary, normalize_records, weekday_distribution,
};
use ward_metrics::{AggregateResult, AnalyticsConfig, HospitalSite, build_report};

const SEEDS: [u64; 6] = [1, 7, 42, 2024, 31337, 999_983];

#[test]
fn test_readmission_rates_are_nested_and_bounded() {
    let windows = ReadmissionWindows::default();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let normalized = normalize_records(&random_records(&mut rng, 200), HospitalSite::A);
        let summary = classify_readmissions(&group_by_patient(&normalized.episodes), &windows);

        let (r7, r15, r30) = (summary.rate(7), summary.rate(15), summary.rate(30));
        assert!(r7 <= r15 && r15 <= r30, "seed {seed}: {r7} {r15} {r30}");
        for rate in [r7, r15, r30, summary.beyond_rate()] {
            assert!((0.0..=100.0).contains(&rate), "seed {seed}: rate {rate}");
        }
        assert!(
            (r30 + summary.beyond_rate() - 100.0).abs() < 1e-9 || summary.eligible_discharges == 0,
            "seed {seed}: windows and beyond bucket must cover every eligible discharge"
        );
    }
}

#[test]
fn test_averages_are_non_negative() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let normalized = normalize_records(&random_records(&mut rng, 150), HospitalSite::B);

        for policy in [
            OngoingStayPolicy::Exclude,
            OngoingStayPolicy::ElapsedUntil(date(2024, 3, 1)),
        ] {
            let summary = length_of_stay_summary(&normalized.episodes, policy);
            assert!(summary.average_days >= 0.0, "seed {seed}");
            assert!(summary.average_days.is_finite(), "seed {seed}");
        }

        let occupancy = average_occupancy(&normalized.episodes, 10, date(2024, 1, 1), date(2024, 6, 30));
        assert!(occupancy >= 0.0, "seed {seed}");
    }
}

#[test]
fn test_weekday_counts_sum_to_total() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let normalized = normalize_records(&random_records(&mut rng, 120), HospitalSite::A);
        let distribution = weekday_distribution(&normalized.episodes);

        assert_eq!(distribution.counts.iter().sum::<usize>(), distribution.total);
        if distribution.total > 0 {
            let share: f64 = distribution
                .to_chart_points()
                .iter()
                .map(|p| p.value)
                .sum();
            // Each point is rounded to one decimal
            assert!((share - 100.0).abs() <= 0.35, "seed {seed}: {share}");
        }
    }
}

#[test]
fn test_identical_inputs_give_identical_reports() {
    let config = AnalyticsConfig::default();
    for seed in SEEDS {
        let records = random_records(&mut StdRng::seed_from_u64(seed), 100);
        let first = build_report(&records, HospitalSite::A, &config, date(2024, 8, 1)).unwrap();

        let records = random_records(&mut StdRng::seed_from_u64(seed), 100);
        let second = build_report(&records, HospitalSite::A, &config, date(2024, 8, 1)).unwrap();

        assert_eq!(first, second, "seed {seed}");
        let a = AggregateResult::from(&first);
        let b = AggregateResult::from(&second);
        assert_eq!(a.occupancy_rate_pct.to_bits(), b.occupancy_rate_pct.to_bits());
        assert_eq!(a.average_stay_days.to_bits(), b.average_stay_days.to_bits());
    }
}

#[test]
fn test_empty_input_is_all_zero() {
    let config = AnalyticsConfig::default();
    let report = build_report(&[], HospitalSite::B, &config, date(2024, 8, 1)).unwrap();
    let aggregate = AggregateResult::from(&report);

    assert_eq!(aggregate.average_stay_days, 0.0);
    assert_eq!(aggregate.readmission_rate_7, 0.0);
    assert_eq!(aggregate.readmission_rate_15, 0.0);
    assert_eq!(aggregate.readmission_rate_30, 0.0);
    assert_eq!(aggregate.occupancy_rate_pct, 0.0);
    assert!(aggregate.weekday_distribution.iter().all(|p| p.count == 0 && p.value == 0.0));
    assert_eq!(report.readmission.gap_distribution().len(), 4);
}
