#[cfg(test)]
mod test_ccp4 {
    use saxskit_io::{read_ccp4_reader, IoError};

    /// Builds a minimal little-endian CCP4 byte stream.
    fn make_map(mode: i32, dims: [i32; 3], voxels: &[f32]) -> Vec<u8> {
        let mut header = vec![0u8; 1024];
        let put_i32 = |header: &mut Vec<u8>, word: usize, value: i32| {
            header[word * 4..word * 4 + 4].copy_from_slice(&value.to_le_bytes());
        };
        let put_f32 = |header: &mut Vec<u8>, word: usize, value: f32| {
            header[word * 4..word * 4 + 4].copy_from_slice(&value.to_le_bytes());
        };
        put_i32(&mut header, 0, dims[0]);
        put_i32(&mut header, 1, dims[1]);
        put_i32(&mut header, 2, dims[2]);
        put_i32(&mut header, 3, mode);
        put_f32(&mut header, 10, 10.0); // cell a
        put_f32(&mut header, 11, 10.0);
        put_f32(&mut header, 12, 10.0);
        put_i32(&mut header, 16, 1); // mapc = x
        put_i32(&mut header, 17, 2); // mapr = y
        put_i32(&mut header, 18, 3); // maps = z
        put_f32(&mut header, 19, -1.0);
        put_f32(&mut header, 20, 1.0);
        put_f32(&mut header, 21, 0.0);
        header[208..212].copy_from_slice(b"MAP ");
        header[212] = 0x44; // little-endian machine stamp
        header[213] = 0x41;

        let mut bytes = header;
        for &v in voxels {
            match mode {
                0 => bytes.push(v as i8 as u8),
                1 => bytes.extend_from_slice(&(v as i16).to_le_bytes()),
                6 => bytes.extend_from_slice(&(v as u16).to_le_bytes()),
                _ => bytes.extend_from_slice(&v.to_le_bytes()),
            }
        }
        return bytes;
    }

    #[test]
    fn float_map_reads_back() {
        let voxels: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let bytes = make_map(2, [2, 2, 2], &voxels);
        let map = read_ccp4_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(map.dims, [2, 2, 2]);
        assert_eq!(map.at(0, 0, 0), 0.0);
        assert_eq!(map.at(1, 0, 0), 1.0); // x varies fastest
        assert_eq!(map.at(0, 0, 1), 4.0);
        assert_eq!(map.dmax, 1.0);
    }

    #[test]
    fn int8_and_int16_modes_widen_to_float() {
        let voxels: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        for mode in [0, 1, 6] {
            let bytes = make_map(mode, [2, 2, 2], &voxels);
            let map = read_ccp4_reader(&mut bytes.as_slice()).unwrap();
            assert_eq!(map.at(1, 1, 1), 8.0, "mode {mode}");
        }
    }

    #[test]
    fn unsupported_modes_are_rejected() {
        for mode in [3, 4, 12] {
            let bytes = make_map(mode, [2, 2, 2], &[0.0; 8]);
            assert!(matches!(
                read_ccp4_reader(&mut bytes.as_slice()),
                Err(IoError::UnsupportedCcp4Mode(m)) if m == mode
            ));
        }
    }

    #[test]
    fn short_header_is_rejected() {
        let bytes = vec![0u8; 100];
        assert!(matches!(
            read_ccp4_reader(&mut bytes.as_slice()),
            Err(IoError::ShortCcp4Header(100))
        ));
    }

    #[test]
    fn truncated_voxels_are_rejected() {
        let bytes = make_map(2, [4, 4, 4], &[0.0; 8]); // header promises 64 voxels
        assert!(matches!(
            read_ccp4_reader(&mut bytes.as_slice()),
            Err(IoError::TruncatedCcp4Data { expected: 64, .. })
        ));
    }

    #[test]
    fn axis_permutation_is_undone() {
        // store sections along x: mapc = z, maps = x
        let voxels: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let mut bytes = make_map(2, [2, 2, 2], &voxels);
        bytes[16 * 4..16 * 4 + 4].copy_from_slice(&3i32.to_le_bytes()); // mapc = z
        bytes[18 * 4..18 * 4 + 4].copy_from_slice(&1i32.to_le_bytes()); // maps = x
        let map = read_ccp4_reader(&mut bytes.as_slice()).unwrap();
        // the first stored voxel row now runs along z
        assert_eq!(map.at(0, 0, 0), 0.0);
        assert_eq!(map.at(0, 0, 1), 1.0);
        assert_eq!(map.at(1, 0, 0), 4.0);
    }

    #[test]
    fn voxel_size_follows_the_cell() {
        let bytes = make_map(2, [2, 2, 2], &(0..8).map(|v| v as f32).collect::<Vec<_>>());
        let map = read_ccp4_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(map.voxel_size(), [5.0, 5.0, 5.0]);
    }
}
