//! Tests for assay and auxiliary table ingestion.

use std::fs;
use std::path::Path;

use chemo_ingest::{
    CsvLookupCache, DEFAULT_SEPARATOR, IDENTIFIER_MAP, IngestError, SEQUENCE_CACHE,
    load_auxiliary, read_assay_table, write_table,
};
use chemo_model::columns::{CID, INCHI_KEY, NBR_MEASUREMENTS, SPECIES, UNIPROT_ID, UNIPROT_SEQUENCE};
use chemo_model::{CellValue, RowId, Table};
use chemo_transform::LookupCache;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn reads_every_column_as_text() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "assays.csv",
        "species;Uniprot ID;nbr_measurements\nhuman;P12345;3\nmouse;;007\n",
    );
    let table = read_assay_table(&path, DEFAULT_SEPARATOR).expect("read");
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns(), &[SPECIES, UNIPROT_ID, NBR_MEASUREMENTS]);
    let second = table.row(RowId::new(1)).expect("row 1");
    assert_eq!(second.get(UNIPROT_ID), &CellValue::Missing);
    // Leading zeros survive because nothing is parsed as a number.
    assert_eq!(second.text(NBR_MEASUREMENTS), Some("007"));
}

#[test]
fn missing_file_is_reported() {
    let err = read_assay_table(Path::new("/nonexistent/assays.csv"), DEFAULT_SEPARATOR)
        .expect_err("missing");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn written_table_reads_back() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("out.csv");
    let table = Table::from_records(
        &[SPECIES, INCHI_KEY],
        &[vec![Some("human"), Some("AAAA-UHFFFAOYSA-N BBBB-CCC-N")], vec![Some("rat"), None]],
    );
    write_table(&path, &table, DEFAULT_SEPARATOR).expect("write");
    let read = read_assay_table(&path, DEFAULT_SEPARATOR).expect("read");
    assert_eq!(read, table);
}

#[test]
fn auxiliary_header_must_match_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let good = write(&dir, "good.csv", "InChI Key;CID\nAAAA-UHFFFAOYSA-N;702\n");
    let table = load_auxiliary(&good, &IDENTIFIER_MAP, DEFAULT_SEPARATOR).expect("load");
    assert_eq!(table.rows()[0].text(CID), Some("702"));

    let swapped = write(&dir, "swapped.csv", "CID;InChI Key\n702;AAAA-UHFFFAOYSA-N\n");
    let err = load_auxiliary(&swapped, &IDENTIFIER_MAP, DEFAULT_SEPARATOR).expect_err("order");
    match err {
        IngestError::SchemaMismatch { found, .. } => assert_eq!(found, vec!["CID", "InChI Key"]),
        other => panic!("unexpected error: {other}"),
    }

    let extra = write(&dir, "extra.csv", "InChI Key;CID;Note\nA;1;x\n");
    assert!(matches!(
        load_auxiliary(&extra, &IDENTIFIER_MAP, DEFAULT_SEPARATOR),
        Err(IngestError::SchemaMismatch { .. })
    ));
}

#[test]
fn csv_cache_persists_new_entries() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "sequences.csv",
        "Entry;Uniprot_Sequence;Query\nP12345;MKTAY;P12345\n",
    );
    let mut cache =
        CsvLookupCache::load(&path, SEQUENCE_CACHE, DEFAULT_SEPARATOR, "Query", UNIPROT_SEQUENCE)
            .expect("load");
    assert_eq!(cache.len(), 1);
    assert!(!cache.is_dirty());

    let wanted = vec!["P12345".to_string(), "Q99999".to_string()];
    assert_eq!(cache.get(&wanted).len(), 1);

    cache.put([("Q99999".to_string(), "MCCCC".to_string())].into_iter().collect());
    assert!(cache.is_dirty());
    cache.flush().expect("flush");

    let reloaded =
        CsvLookupCache::load(&path, SEQUENCE_CACHE, DEFAULT_SEPARATOR, "Query", UNIPROT_SEQUENCE)
            .expect("reload");
    let found = reloaded.get(&wanted);
    assert_eq!(found.get("Q99999").map(String::as_str), Some("MCCCC"));
    assert_eq!(found.get("P12345").map(String::as_str), Some("MKTAY"));
}

#[test]
fn csv_cache_starts_empty_without_file() {
    let dir = TempDir::new().expect("tempdir");
    let cache = CsvLookupCache::load(
        &dir.path().join("absent.csv"),
        SEQUENCE_CACHE,
        DEFAULT_SEPARATOR,
        "Query",
        UNIPROT_SEQUENCE,
    )
    .expect("empty cache");
    assert!(cache.is_empty());
}
