/// Running min/sum/max/count for one station.
///
/// The sum carries a Neumaier compensation term, so the total a run reports
/// does not depend (beyond the final rounding) on how the input was split
/// into chunks or in which order partial results were merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationAccumulator {
    min: f64,
    max: f64,
    count: u64,
    sum: f64,
    compensation: f64,
}

impl StationAccumulator {
    /// Accumulator for a station seen for the first time
    pub fn new(temperature: f64) -> Self {
        Self {
            min: temperature,
            max: temperature,
            count: 1,
            sum: temperature,
            compensation: 0.0,
        }
    }

    pub fn observe(&mut self, temperature: f64) {
        self.min = self.min.min(temperature);
        self.max = self.max.max(temperature);
        self.count += 1;
        self.add_to_sum(temperature);
    }

    /// Fold another accumulator for the same station into this one
    pub fn merge(&mut self, other: &StationAccumulator) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count += other.count;
        self.add_to_sum(other.sum);
        self.compensation += other.compensation;
    }

    fn add_to_sum(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum + self.compensation
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accumulator() {
        let acc = StationAccumulator::new(10.0);

        assert_eq!(acc.min(), 10.0);
        assert_eq!(acc.max(), 10.0);
        assert_eq!(acc.sum(), 10.0);
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.mean(), 10.0);
    }

    #[test]
    fn test_observe_updates_all_fields() {
        let mut acc = StationAccumulator::new(10.0);
        acc.observe(30.0);
        acc.observe(20.0);

        assert_eq!(acc.min(), 10.0);
        assert_eq!(acc.max(), 30.0);
        assert_eq!(acc.sum(), 60.0);
        assert_eq!(acc.count(), 3);
        assert_eq!(acc.mean(), 20.0);
    }

    #[test]
    fn test_negative_temperatures() {
        let mut acc = StationAccumulator::new(-5.5);
        acc.observe(-12.3);
        acc.observe(0.0);

        assert_eq!(acc.min(), -12.3);
        assert_eq!(acc.max(), 0.0);
        assert_eq!(acc.count(), 3);
    }

    #[test]
    fn test_merge_combines_element_wise() {
        let mut left = StationAccumulator::new(5.0);
        left.observe(15.0);

        let mut right = StationAccumulator::new(-3.0);
        right.observe(7.0);
        right.observe(40.0);

        left.merge(&right);

        assert_eq!(left.min(), -3.0);
        assert_eq!(left.max(), 40.0);
        assert_eq!(left.count(), 5);
        assert_eq!(left.sum(), 64.0);
    }

    #[test]
    fn test_compensated_sum_is_order_independent() {
        let values = [0.1, 0.2, 0.3, 99.9, -45.6, 12.4, 0.7, 33.3];

        let mut forward = StationAccumulator::new(values[0]);
        for v in &values[1..] {
            forward.observe(*v);
        }

        let mut backward = StationAccumulator::new(values[values.len() - 1]);
        for v in values[..values.len() - 1].iter().rev() {
            backward.observe(*v);
        }

        assert!((forward.sum() - backward.sum()).abs() < 1e-12);
        assert!((forward.sum() - 101.3).abs() < 1e-12);
        assert_eq!(format!("{:.1}", forward.mean()), "12.7");
        assert_eq!(format!("{:.1}", backward.mean()), "12.7");
    }
}
