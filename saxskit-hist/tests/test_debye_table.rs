#[cfg(test)]
mod test_debye_table {
    use saxskit_hist::{default_table, sinc, DebyeTable, D_BINS, Q_BINS};

    #[test]
    fn sinc_at_zero_is_one() {
        assert_eq!(sinc(0.0), 1.0);
    }

    #[test]
    fn sinc_matches_the_direct_formula_away_from_the_pole() {
        for &x in &[0.01, 0.5, 1.0, 3.0, 10.0] {
            assert!((sinc(x) - x.sin() / x).abs() < 1e-12);
        }
    }

    #[test]
    fn sinc_is_continuous_across_the_taylor_threshold() {
        let below = sinc(0.000999999);
        let above = sinc(0.001000001);
        assert!((below - above).abs() < 1e-12);
    }

    #[test]
    fn lookup_matches_direct_evaluation() {
        let q = vec![0.01, 0.1, 0.5];
        let d = vec![0.0, 1.0, 2.0, 10.0];
        let table = DebyeTable::new(&q, &d);
        for (qi, &qv) in q.iter().enumerate() {
            for (di, &dv) in d.iter().enumerate() {
                assert!((table.lookup(qi, di) - sinc(qv * dv)).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn rows_cover_the_d_axis() {
        let table = DebyeTable::new(&[0.1], &[0.0, 1.0, 2.0]);
        assert_eq!(table.row(0).len(), 3);
        assert_eq!(table.size_q(), 1);
        assert_eq!(table.size_d(), 3);
    }

    #[test]
    fn default_table_spans_the_default_axes() {
        let table = default_table();
        assert_eq!(table.size_q(), Q_BINS);
        assert_eq!(table.size_d(), D_BINS);
        // spot-check one entry against the direct formula
        let q = table.q_values()[100];
        assert!((table.lookup(100, 500) - sinc(q * 50.0)).abs() < 1e-12);
    }
}
