//! Path trimming geometry

use tracing::debug;

use crate::domain::Coordinate;

/// Index of the path point nearest to `here`
///
/// Linear scan by straight-line distance; ties go to the lowest index.
pub fn nearest_index(path: &[Coordinate], here: &Coordinate) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, point) in path.iter().enumerate() {
        let d = point.distance_to(here);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Remaining part of `full` as seen from `here`, if it is shorter than what is shown
///
/// `shown_len` is the length of the currently displayed path. Returns `None`
/// when nothing should change: empty path, nearest point is the last one, or
/// the walker is not further along than the displayed path already reflects.
pub fn trim_path(full: &[Coordinate], here: &Coordinate, shown_len: usize) -> Option<Vec<Coordinate>> {
    let index = nearest_index(full, here)?;
    if index + 1 == full.len() {
        debug!(index, "trim_path: nearest point is the last one, leaving path as is");
        return None;
    }

    let remaining = &full[index..];
    if remaining.len() >= shown_len {
        return None;
    }

    debug!(index, remaining = remaining.len(), "trim_path: trimmed");
    Some(remaining.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| Coordinate::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_nearest_index() {
        let path = line(5);
        assert_eq!(nearest_index(&path, &Coordinate::new(2.2, 0.1)), Some(2));
        assert_eq!(nearest_index(&path, &Coordinate::new(-10.0, 0.0)), Some(0));
        assert_eq!(nearest_index(&[], &Coordinate::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_nearest_index_ties_pick_first() {
        let path = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert_eq!(nearest_index(&path, &Coordinate::new(1.0, 0.0)), Some(0));
        assert_eq!(nearest_index(&path, &Coordinate::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn test_trim_path_from_nearest_point() {
        let path = line(5);
        let trimmed = trim_path(&path, &Coordinate::new(1.9, 0.0), 5).unwrap();
        assert_eq!(trimmed, path[2..].to_vec());
    }

    #[test]
    fn test_trim_path_keeps_last_point_case_unchanged() {
        let path = line(5);
        assert!(trim_path(&path, &Coordinate::new(9.0, 0.0), 5).is_none());
        assert!(trim_path(&[], &Coordinate::new(9.0, 0.0), 0).is_none());
    }

    #[test]
    fn test_trim_path_never_grows_back() {
        let path = line(5);
        // Already showing the last three points; walking back to the start changes nothing
        assert!(trim_path(&path, &Coordinate::new(0.0, 0.0), 3).is_none());
        // Same position as shown changes nothing either
        assert!(trim_path(&path, &Coordinate::new(2.0, 0.0), 3).is_none());
        assert_eq!(trim_path(&path, &Coordinate::new(3.0, 0.0), 3).unwrap().len(), 2);
    }
}
