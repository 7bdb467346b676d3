//! Integration tests for reading real HDF5/NeXus files.
//!
//! Only built with `--features hdf5`; the files are written with the `hdf5`
//! crate into a temporary directory.

#[cfg(feature = "hdf5")]
mod hdf5_file_tests {
    use std::path::{Path, PathBuf};
    use std::str::FromStr;

    use hdf5::types::{FixedAscii, FixedUnicode, VarLenUnicode};
    use hdf5::File;
    use serde_json::json;

    use scicat::metadata::{
        ExtractConfig, Hdf5Source, MetadataExtractor, NodeKind, RawValue, TreeSource,
        get_value_from_file, open_source,
    };
    use scicat::ScicatError;

    /// Two root branches: `root1/x = 3.14` with a fixed-length `units="m"`
    /// attribute, and `root2/y = 2`.
    fn write_two_roots(dir: &Path) -> PathBuf {
        let path = dir.join("two_roots.h5");
        let file = File::create(&path).unwrap();

        let root1 = file.create_group("root1").unwrap();
        let x = root1.new_dataset::<f64>().shape(()).create("x").unwrap();
        x.as_writer().write_scalar(&3.14f64).unwrap();
        let units = x.new_attr::<FixedAscii<8>>().shape(()).create("units").unwrap();
        units
            .as_writer()
            .write_scalar(&FixedAscii::<8>::from_ascii(b"m").unwrap())
            .unwrap();

        let root2 = file.create_group("root2").unwrap();
        let y = root2.new_dataset::<i64>().shape(()).create("y").unwrap();
        y.as_writer().write_scalar(&2i64).unwrap();

        path
    }

    /// One `entry` branch covering the string flavours and array shapes.
    fn write_sas_entry(dir: &Path) -> PathBuf {
        let path = dir.join("sas_entry.nxs");
        let file = File::create(&path).unwrap();
        let entry = file.create_group("entry").unwrap();

        let title = entry.new_dataset::<VarLenUnicode>().shape(()).create("title").unwrap();
        title
            .as_writer()
            .write_scalar(&VarLenUnicode::from_str("silver behenate").unwrap())
            .unwrap();

        let name = entry
            .new_dataset::<FixedUnicode<32>>()
            .shape(())
            .create("instrument")
            .unwrap();
        name.as_writer()
            .write_scalar(&FixedUnicode::<32>::from_str("SAXSess").unwrap())
            .unwrap();

        let intensity = entry.new_dataset::<f64>().shape(4).create("I").unwrap();
        intensity
            .as_writer()
            .write_raw(&[1.0, f64::NAN, 3.0, 8.0][..])
            .unwrap();
        let long_name = intensity
            .new_attr::<VarLenUnicode>()
            .shape(())
            .create("long_name")
            .unwrap();
        long_name
            .as_writer()
            .write_scalar(&VarLenUnicode::from_str("intensity").unwrap())
            .unwrap();

        let blank = entry.new_dataset::<f64>().shape(3).create("blank").unwrap();
        blank
            .as_writer()
            .write_raw(&[f64::NAN, f64::NAN, f64::NAN][..])
            .unwrap();

        let run = entry.new_dataset::<i64>().shape(1).create("run").unwrap();
        run.as_writer().write_raw(&[42i64][..]).unwrap();

        path
    }

    // =========================================================================
    // Extraction Tests
    // =========================================================================

    #[test]
    fn test_excluded_root_with_fixed_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_two_roots(dir.path());

        let config = ExtractConfig::default().with_excluded_roots(["root2"]);
        let extraction = MetadataExtractor::with_config(config)
            .extract_file(&path)
            .expect("Extraction failed");

        assert!(extraction.is_complete());
        assert_eq!(extraction.metadata, json!({"x": {"value": 3.14, "units": "m"}}));
    }

    #[test]
    fn test_string_flavours_and_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sas_entry(dir.path());

        let extraction = MetadataExtractor::new()
            .extract_file(&path)
            .expect("Extraction failed");

        assert!(extraction.is_complete(), "{:?}", extraction.degraded);
        assert_eq!(
            extraction.metadata,
            json!({
                "I": {"value": 4.0, "long_name": "intensity"},
                "blank": "-",
                "instrument": "SAXSess",
                "run": 42,
                "title": "silver behenate"
            })
        );
    }

    #[test]
    fn test_leave_as_array_keeps_shape_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sas_entry(dir.path());

        let config = ExtractConfig::default().with_leave_as_array(true);
        let extraction = MetadataExtractor::with_config(config)
            .extract_file(&path)
            .expect("Extraction failed");

        assert_eq!(extraction.metadata["run"], json!([42]));
        assert_eq!(extraction.metadata["I"]["value"], json!([1.0, "-", 3.0, 8.0]));
    }

    // =========================================================================
    // Source Tests
    // =========================================================================

    #[test]
    fn test_node_kinds_and_children() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sas_entry(dir.path());
        let source = Hdf5Source::open(&path).expect("Open failed");

        assert_eq!(source.node_kind("/"), Some(NodeKind::Group));
        assert_eq!(source.node_kind("/entry"), Some(NodeKind::Group));
        assert_eq!(source.node_kind("/entry/title"), Some(NodeKind::Leaf));
        assert_eq!(source.node_kind("/entry/missing"), None);

        let mut children = source.children("/entry").unwrap();
        children.sort();
        assert_eq!(children, vec!["I", "blank", "instrument", "run", "title"]);
    }

    #[test]
    fn test_scalar_and_shape_one_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sas_entry(dir.path());
        let source = Hdf5Source::open(&path).expect("Open failed");

        assert_eq!(
            source.read_value("/entry/title").unwrap(),
            RawValue::Text("silver behenate".to_string())
        );
        assert_eq!(
            source.read_value("/entry/instrument").unwrap(),
            RawValue::Text("SAXSess".to_string())
        );
        assert_eq!(source.read_value("/entry/run").unwrap(), RawValue::IntArray(vec![42]));
    }

    #[test]
    fn test_attribute_getter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_two_roots(dir.path());

        let units = get_value_from_file(&path, "/root1/x@units", &json!("none")).unwrap();
        assert_eq!(units, json!("m"));
        let missing = get_value_from_file(&path, "/root1/x@offset", &json!("none")).unwrap();
        assert_eq!(missing, json!("none"));
    }

    #[test]
    fn test_non_hdf5_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not hdf5").unwrap();

        let err = open_source(&path).err().unwrap();
        assert!(matches!(err, ScicatError::SourceUnavailable { .. }));
    }
}
