use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use fuzzy_engine::{
    add_time, parse_duration, render_template, Duration, DurationComponent,
    Fuzzy, TimeUnit,
};
use proptest::prelude::*;

fn date_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (1900i32..2200, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        },
    )
}

fn unit_strategy() -> impl Strategy<Value = TimeUnit> {
    prop::sample::select(TimeUnit::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn placeholder_free_templates_render_unchanged(
        seconds in any::<i64>(),
        template in "[a-zA-Z !?,.]{0,40}",
    ) {
        prop_assert_eq!(render_template(seconds, &template), template);
    }

    #[test]
    fn whole_days_match_chrono(start in date_strategy(), days in -20_000i64..20_000) {
        let shifted = add_time(start, days as f64, TimeUnit::Day).unwrap();
        prop_assert_eq!(shifted, start + TimeDelta::days(days));
    }

    #[test]
    fn whole_seconds_match_chrono(start in date_strategy(), seconds in -10_000_000i64..10_000_000) {
        let shifted = add_time(start, seconds as f64, TimeUnit::Second).unwrap();
        prop_assert_eq!(shifted, start + TimeDelta::seconds(seconds));
    }

    #[test]
    fn months_keep_day_and_time_when_day_exists(start in date_strategy(), months in -600i64..600) {
        let shifted = add_time(start, months as f64, TimeUnit::Month).unwrap();
        prop_assert_eq!(shifted.time(), start.time());
        // Days 1-28 exist in every month.
        prop_assert_eq!(shifted.day(), start.day());
    }

    #[test]
    fn positive_offsets_never_move_backwards(
        start in date_strategy(),
        magnitude in 0.0f64..500.0,
        unit in unit_strategy(),
    ) {
        let shifted = add_time(start, magnitude, unit).unwrap();
        prop_assert!(shifted >= start);
    }

    #[test]
    fn canonical_notation_parses_back(
        parts in prop::collection::vec(
            (prop::sample::select(vec![0.5f64, 1.0, 2.0, 2.5, 12.0, -3.0, 0.125]), unit_strategy()),
            0..6,
        ),
    ) {
        let duration: Duration = parts
            .into_iter()
            .map(|(magnitude, unit)| DurationComponent::new(magnitude, unit))
            .collect();
        let parsed = parse_duration(&duration.to_string()).unwrap();

        let mut expected: Vec<DurationComponent> = duration
            .iter()
            .filter(|c| !c.unit.is_time_scale())
            .copied()
            .collect();
        expected.extend(duration.iter().filter(|c| c.unit.is_time_scale()).copied());
        prop_assert_eq!(parsed.components(), expected.as_slice());
    }

    #[test]
    fn single_at_rule_fires_at_its_own_offset(start in date_strategy(), minutes in 1i64..100_000) {
        let mut fuzzy = Fuzzy::new();
        fuzzy.register_at("exactly", format!("T{minutes}M")).unwrap();
        let reference = start + TimeDelta::minutes(minutes);
        prop_assert_eq!(fuzzy.build(start, reference).unwrap(), "exactly");
    }
}
