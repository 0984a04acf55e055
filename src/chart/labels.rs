//! Axis label thinning

/// Label every Nth point; denser series get a wider stride
pub fn label_stride(points: usize) -> usize {
    match points {
        0..=14 => 1,
        15..=31 => 2,
        32..=90 => 7,
        91..=180 => 14,
        _ => 30,
    }
}

/// Which points carry a label. Counted back from the last point, so the
/// most recent one is always labeled.
pub fn label_mask(points: usize) -> Vec<bool> {
    let stride = label_stride(points);
    (0..points).map(|i| (points - 1 - i) % stride == 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_fully_labeled() {
        assert_eq!(label_mask(7), vec![true; 7]);
        assert!(label_mask(0).is_empty());
    }

    #[test]
    fn test_last_point_always_labeled() {
        for n in [1, 14, 15, 30, 31, 32, 90, 91, 180, 181, 365, 730] {
            let mask = label_mask(n);
            assert_eq!(mask.len(), n);
            assert!(mask[n - 1], "last point unlabeled for {} points", n);
        }
    }

    #[test]
    fn test_stride_spacing() {
        let mask = label_mask(30);
        assert!(mask[29] && !mask[28] && mask[27]);
        assert_eq!(mask.iter().filter(|m| **m).count(), 15);

        let mask = label_mask(90);
        let labeled: Vec<usize> = (0..90).filter(|i| mask[*i]).collect();
        assert_eq!(labeled.first(), Some(&5));
        assert!(labeled.windows(2).all(|w| w[1] - w[0] == 7));
    }
}
