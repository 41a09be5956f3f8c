#[cfg(test)]
mod test_distributions {
    use saxskit_hist::{
        Axis, Distribution1D, Distribution2D, Distribution3D, GenericDistribution1D,
        GenericDistribution2D, GenericDistribution3D, UniformBinning, VariableBinning,
        WeightedDistribution1D,
    };

    #[test]
    fn zero_width_axes_are_rejected() {
        assert!(Axis::new(0.0, 0.0, 100).is_err());
        assert!(Axis::new(0.0, 1.0, 0).is_err());
        assert!(UniformBinning::new(0.0, 100).is_err());
        assert!(VariableBinning::new(vec![0.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn unweighted_1d_accumulates_weights() {
        let mut p = Distribution1D::with_bins(100);
        p.add(10, 1.0, 2.5);
        p.add(10, 1.05, 1.5);
        p.add(99, 9.9, 1.0);
        assert_eq!(p.counts()[10], 4.0);
        assert_eq!(p.counts()[99], 1.0);
    }

    #[test]
    fn out_of_range_bins_clamp_to_the_last_bin() {
        let mut p = Distribution1D::with_bins(50);
        p.add(1000, 100.0, 1.0);
        assert_eq!(p.counts()[49], 1.0);
    }

    #[test]
    fn merge_adds_bin_by_bin() {
        let mut a = Distribution1D::with_bins(10);
        let mut b = Distribution1D::with_bins(10);
        a.add(3, 0.3, 1.0);
        b.add(3, 0.3, 2.0);
        b.add(7, 0.7, 1.0);
        a.merge(&b);
        assert_eq!(a.counts()[3], 3.0);
        assert_eq!(a.counts()[7], 1.0);
    }

    #[test]
    fn unweighted_bin_centers_are_multiples_of_the_width() {
        let p = Distribution1D::with_bins(5);
        assert_eq!(p.bin_centers(0.1), vec![0.0, 0.1, 0.2, 0.30000000000000004, 0.4]);
    }

    #[test]
    fn weighted_bin_centers_track_the_accumulated_distances() {
        let mut p = WeightedDistribution1D::with_bins(20);
        p.add(10, 0.97, 1.0);
        p.add(10, 1.03, 1.0);
        let centers = p.bin_centers(0.1);
        assert!((centers[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_weighted_bins_degrade_to_bin_centers() {
        let mut p = WeightedDistribution1D::with_bins(20);
        p.add(10, 1.02, 1.0);
        let centers = p.bin_centers(0.1);
        assert!((centers[5] - 0.5).abs() < 1e-12);
        assert!((centers[10] - 1.02).abs() < 1e-12);
    }

    #[test]
    fn weighted_first_bin_is_pinned_to_zero() {
        let mut p = WeightedDistribution1D::with_bins(20);
        p.add(0, 0.01, 1.0);
        assert_eq!(p.bin_centers(0.1)[0], 0.0);
    }

    #[test]
    fn two_d_projects_to_the_distance_axis() {
        let mut p = Distribution2D::with_bins(50);
        p.add(1, 10, 1.0, 2.0);
        p.add(8, 10, 1.0, 3.0);
        p.add(8, 20, 2.0, 1.0);
        let projected = p.project();
        assert_eq!(projected[10], 5.0);
        assert_eq!(projected[20], 1.0);
    }

    #[test]
    fn three_d_normalizes_the_class_pair() {
        let mut p = Distribution3D::with_bins(50);
        // (8, 1) must land in the unordered slot (1, 8)
        p.add(8, 1, 10, 1.0, 2.0);
        p.add(1, 8, 10, 1.0, 1.0);
        assert_eq!(p.pair_counts(1, 8)[10], 3.0);
    }

    #[test]
    fn three_d_projection_sums_each_unordered_pair_once() {
        let mut p = Distribution3D::with_bins(50);
        p.add(1, 2, 5, 0.5, 2.0);
        p.add(2, 2, 5, 0.5, 1.0);
        assert_eq!(p.project()[5], 3.0);
    }

    #[test]
    fn resize_preserves_the_kept_bins() {
        let mut p = Distribution3D::with_bins(50);
        p.add(1, 2, 5, 0.5, 2.0);
        p.resize(10);
        assert_eq!(p.pair_counts(1, 2)[5], 2.0);
        assert_eq!(p.size(), 10);
    }
}
