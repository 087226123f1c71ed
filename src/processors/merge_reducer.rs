use crate::models::AggregateMap;
use rayon::prelude::*;

/// Fold any number of partial maps into one, left to right.
///
/// Same-station entries combine element-wise (min of mins, max of maxes,
/// sums and counts added), so the result does not depend on the order or
/// grouping of `partials`.
pub fn merge_all<I>(partials: I) -> AggregateMap
where
    I: IntoIterator<Item = AggregateMap>,
{
    partials
        .into_iter()
        .fold(AggregateMap::new(), |mut merged, partial| {
            merged.merge(partial);
            merged
        })
}

/// Same reduction as [`merge_all`], performed as a parallel tree reduce on
/// the current rayon pool
pub fn merge_parallel(partials: Vec<AggregateMap>) -> AggregateMap {
    partials
        .into_par_iter()
        .reduce(AggregateMap::new, |mut left, right| {
            left.merge(right);
            left
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(records: &[(&str, f64)]) -> AggregateMap {
        let mut map = AggregateMap::new();
        for (station, temp) in records {
            map.observe(station, *temp);
        }
        map
    }

    fn assert_same_stats(left: &AggregateMap, right: &AggregateMap) {
        assert_eq!(left.len(), right.len());
        for (station, acc) in left {
            let other = right.get(station).unwrap();
            assert_eq!(acc.min(), other.min(), "{}", station);
            assert_eq!(acc.max(), other.max(), "{}", station);
            assert_eq!(acc.count(), other.count(), "{}", station);
            assert!((acc.sum() - other.sum()).abs() < 1e-9, "{}", station);
        }
    }

    #[test]
    fn test_merge_is_associative_and_commutative() {
        let a = partial(&[("Paris", 10.0), ("Oslo", -3.2), ("Paris", 12.1)]);
        let b = partial(&[("Oslo", 4.4), ("Zurich", 7.7)]);
        let c = partial(&[("Paris", 30.0), ("Zurich", -1.1), ("Berlin", 0.0)]);

        let flat = merge_all(vec![a.clone(), b.clone(), c.clone()]);
        let left_grouped = merge_all(vec![merge_all(vec![a.clone(), b.clone()]), c.clone()]);
        let right_grouped = merge_all(vec![a.clone(), merge_all(vec![b.clone(), c.clone()])]);
        let reversed = merge_all(vec![c, b, a]);

        assert_same_stats(&flat, &left_grouped);
        assert_same_stats(&flat, &right_grouped);
        assert_same_stats(&flat, &reversed);

        let paris = flat.get("Paris").unwrap();
        assert_eq!(paris.count(), 3);
        assert_eq!(paris.min(), 10.0);
        assert_eq!(paris.max(), 30.0);
    }

    #[test]
    fn test_merge_parallel_matches_sequential() {
        let partials: Vec<AggregateMap> = (0..64)
            .map(|i| {
                let t = i as f64 * 0.7 - 20.0;
                partial(&[("Paris", t), ("Oslo", -t), ("Lima", t / 2.0)])
            })
            .collect();

        let sequential = merge_all(partials.clone());
        let parallel = merge_parallel(partials);

        assert_same_stats(&sequential, &parallel);
        assert_eq!(parallel.get("Paris").unwrap().count(), 64);
    }

    #[test]
    fn test_merge_nothing_is_empty() {
        assert!(merge_all(Vec::new()).is_empty());
        assert!(merge_parallel(Vec::new()).is_empty());
    }
}
