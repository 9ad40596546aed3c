//! Color distance primitives for the box classifier.

use crate::pixels::Rgb;

/// Euclidean distance between two normalized RGB colors.
pub fn color_distance(a: Rgb, b: Rgb) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Whether a mask pixel counts as background (every channel below 0.1).
pub fn is_black(color: Rgb) -> bool {
    color[0] < 0.1 && color[1] < 0.1 && color[2] < 0.1
}

/// Distance to the nearest exemplar; infinity when the set is empty.
pub fn min_color_distance(color: Rgb, set: &[Rgb]) -> f32 {
    set.iter()
        .map(|&e| color_distance(color, e))
        .fold(f32::INFINITY, f32::min)
}

/// Mean of the (up to) three smallest exemplar distances; infinity when the
/// set is empty.
pub fn avg_three_closest(color: Rgb, set: &[Rgb]) -> f32 {
    let mut distances: Vec<f32> = set.iter().map(|&e| color_distance(color, e)).collect();
    if distances.is_empty() {
        return f32::INFINITY;
    }
    distances.sort_by(|a, b| a.total_cmp(b));
    let closest = &distances[..distances.len().min(3)];
    closest.iter().sum::<f32>() / closest.len() as f32
}

/// Mean of a distance series; infinity when no values were collected.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        f32::INFINITY
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_symmetric_and_zero_on_self() {
        let a = [0.2, 0.5, 0.9];
        let b = [0.7, 0.1, 0.3];
        assert_eq!(color_distance(a, b), color_distance(b, a));
        assert_eq!(color_distance(a, a), 0.0);
    }

    #[test]
    fn test_distance_red_to_blue() {
        let d = color_distance([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!((d - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_min_distance_empty_set_is_infinite() {
        assert_eq!(min_color_distance([0.5, 0.5, 0.5], &[]), f32::INFINITY);
    }

    #[test]
    fn test_min_distance_picks_nearest() {
        let set = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let d = min_color_distance([0.9, 0.0, 0.0], &set);
        assert!((d - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_avg_three_closest_uses_three_smallest() {
        let set = [
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.0],
            [0.2, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ];
        // Distances from origin color: 0.0, 0.1, 0.2, 1.0 -> mean of first 3.
        let d = avg_three_closest([0.0, 0.0, 0.0], &set);
        assert!((d - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_avg_three_closest_with_fewer_exemplars() {
        let set = [[0.3, 0.0, 0.0]];
        let d = avg_three_closest([0.0, 0.0, 0.0], &set);
        assert!((d - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_is_black_threshold() {
        assert!(is_black([0.0, 0.0, 0.0]));
        assert!(is_black([0.09, 0.09, 0.09]));
        assert!(!is_black([0.1, 0.0, 0.0]));
    }

    #[test]
    fn test_mean_of_empty_is_infinite() {
        assert_eq!(mean(&[]), f32::INFINITY);
        assert_eq!(mean(&[1.0, 3.0]), 2.0);
    }
}
