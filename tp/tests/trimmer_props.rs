//! Property tests for live path trimming

use proptest::prelude::*;
use tripplanner::domain::Coordinate;
use tripplanner::trimmer::{nearest_index, trim_path};

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

fn path() -> impl Strategy<Value = Vec<Coordinate>> {
    prop::collection::vec(coordinate(), 1..40)
}

proptest! {
    #[test]
    fn trimmed_path_is_a_shorter_non_empty_suffix(full in path(), here in coordinate(), shown in 1usize..50) {
        let shown_len = shown.min(full.len());
        if let Some(trimmed) = trim_path(&full, &here, shown_len) {
            prop_assert!(trimmed.len() < shown_len);
            prop_assert!(trimmed.len() >= 2);
            prop_assert_eq!(&full[full.len() - trimmed.len()..], trimmed.as_slice());
        }
    }

    #[test]
    fn trimmed_path_starts_at_nearest_point(full in path(), here in coordinate()) {
        if let Some(trimmed) = trim_path(&full, &here, full.len()) {
            let index = nearest_index(&full, &here).unwrap();
            prop_assert_eq!(trimmed[0], full[index]);
            let best = full[index].distance_to(&here);
            prop_assert!(full.iter().all(|p| p.distance_to(&here) >= best));
        }
    }

    #[test]
    fn repeated_trimming_never_grows(full in path(), walk in prop::collection::vec(coordinate(), 1..10)) {
        let mut shown = full.clone();
        for here in walk {
            if let Some(trimmed) = trim_path(&full, &here, shown.len()) {
                prop_assert!(trimmed.len() < shown.len());
                shown = trimmed;
            }
            prop_assert!(!shown.is_empty());
        }
    }
}
