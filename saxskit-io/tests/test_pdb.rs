#[cfg(test)]
mod test_pdb {
    use std::io::BufReader;

    use saxskit_data::FormFactorClass;
    use saxskit_io::{read_pdb_reader, write_pdb};

    const SAMPLE: &str = "\
HEADER    TEST STRUCTURE
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  O   ALA A   1      13.402   4.628  -4.557  1.00  0.00           O
ATOM      4  CA  GLY B   2       8.000   1.000   0.000  0.50  0.00           C
HETATM    5  O   HOH A 101       2.000   2.000   2.000  1.00  0.00           O
END
";

    #[test]
    fn atoms_and_waters_are_separated() {
        let molecule = read_pdb_reader(BufReader::new(SAMPLE.as_bytes())).unwrap();
        assert_eq!(molecule.atom_count(), 4);
        assert_eq!(molecule.waters().len(), 1);
    }

    #[test]
    fn chains_become_bodies() {
        let molecule = read_pdb_reader(BufReader::new(SAMPLE.as_bytes())).unwrap();
        assert_eq!(molecule.size_bodies(), 2);
        assert_eq!(molecule.body(0).size(), 3);
        assert_eq!(molecule.body(1).size(), 1);
    }

    #[test]
    fn coordinates_and_occupancy_are_parsed() {
        let molecule = read_pdb_reader(BufReader::new(SAMPLE.as_bytes())).unwrap();
        let first = &molecule.body(0).atoms()[0];
        assert!((first.pos.x - 11.104).abs() < 1e-9);
        assert_eq!(first.class, FormFactorClass::N);
        assert_eq!(first.weight, 7.0);

        // half-occupied carbon scatters with three electrons
        let partial = &molecule.body(1).atoms()[0];
        assert_eq!(partial.weight, 3.0);
    }

    #[test]
    fn structure_without_atoms_is_an_error() {
        let text = "HEADER    EMPTY\nEND\n";
        assert!(read_pdb_reader(BufReader::new(text.as_bytes())).is_err());
    }

    #[test]
    fn short_atom_record_is_an_error() {
        let text = "ATOM      1  CA  ALA A   1      11.104\n";
        assert!(read_pdb_reader(BufReader::new(text.as_bytes())).is_err());
    }

    #[test]
    fn written_structures_read_back() {
        let molecule = read_pdb_reader(BufReader::new(SAMPLE.as_bytes())).unwrap();

        let mut buffer = Vec::new();
        write_pdb(&mut buffer, &molecule).unwrap();
        let reread = read_pdb_reader(BufReader::new(buffer.as_slice())).unwrap();

        assert_eq!(reread.atom_count(), molecule.atom_count());
        assert_eq!(reread.waters().len(), molecule.waters().len());
        let a = &molecule.body(0).atoms()[0];
        let b = &reread.body(0).atoms()[0];
        assert!(a.pos.distance_to(&b.pos) < 1e-3);
    }
}
