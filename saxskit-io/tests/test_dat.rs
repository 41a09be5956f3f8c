#[cfg(test)]
mod test_dat {
    use std::io::BufReader;

    use saxskit_io::{read_saxs_data, write_saxs_data, IoError};

    #[test]
    fn reads_three_column_data_with_comments() {
        let text = "\
# a comment
@ an xvg directive
& another directive
0.01 1.00 0.05
0.02 0.98 0.04

0.03 0.95 0.04
";
        let data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.q, vec![0.01, 0.02, 0.03]);
        assert_eq!(data.sigma[1], 0.04);
    }

    #[test]
    fn two_columns_get_unit_errors() {
        let text = "0.01 1.0\n0.02 0.9\n";
        let data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(data.sigma, vec![1.0, 1.0]);
    }

    #[test]
    fn four_columns_keep_the_third_as_sigma() {
        let text = "0.01 1.0 0.1 999\n0.02 0.9 0.1 999\n";
        let data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(data.sigma, vec![0.1, 0.1]);
    }

    #[test]
    fn five_columns_are_rejected() {
        let text = "0.01 1.0 0.1 1 2\n";
        assert!(matches!(
            read_saxs_data(BufReader::new(text.as_bytes())),
            Err(IoError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn garbage_numbers_name_the_line() {
        let text = "0.01 1.0 0.1\n0.02 oops 0.1\n";
        assert!(matches!(
            read_saxs_data(BufReader::new(text.as_bytes())),
            Err(IoError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn non_monotonic_q_is_rejected() {
        let text = "0.02 1.0 0.1\n0.01 0.9 0.1\n";
        assert!(matches!(
            read_saxs_data(BufReader::new(text.as_bytes())),
            Err(IoError::NonMonotonicQ { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let text = "# only comments\n";
        assert!(matches!(
            read_saxs_data(BufReader::new(text.as_bytes())),
            Err(IoError::EmptyDataset)
        ));
    }

    #[test]
    fn restrict_clamps_to_the_available_window() {
        let text = "0.01 1.0 0.1\n0.02 0.9 0.1\n0.03 0.8 0.1\n";
        let mut data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();
        data.restrict(0.015, 10.0);
        assert_eq!(data.q, vec![0.02, 0.03]);
        assert_eq!(data.i, vec![0.9, 0.8]);
    }

    #[test]
    fn write_read_preserves_the_data() {
        let text = "0.01 1.0 0.1\n0.02 0.9 0.1\n";
        let data = read_saxs_data(BufReader::new(text.as_bytes())).unwrap();

        let mut buffer = Vec::new();
        write_saxs_data(&mut buffer, &data).unwrap();
        let reread = read_saxs_data(BufReader::new(buffer.as_slice())).unwrap();

        assert_eq!(reread.len(), data.len());
        for k in 0..data.len() {
            assert!((reread.q[k] - data.q[k]).abs() < 1e-12);
            assert!((reread.i[k] - data.i[k]).abs() < 1e-12);
        }
    }
}
