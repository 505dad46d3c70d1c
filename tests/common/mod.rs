#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fastadb::{FastaStore, OpenMode, StoreConfig};
use tempfile::NamedTempFile;

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

/// Compare the bytes of `file` with `tests/snapshots/<name>`.
///
/// Line endings are significant: canonical output must use bare `\n`.
/// Set `FASTADB_UPDATE_SNAPSHOTS` to rewrite the stored copy.
pub fn assert_file_snapshot(name: &str, file: &NamedTempFile) {
    let path = snapshot_root().join(name);
    let actual = fs::read(file.path()).expect("read file under test");
    if std::env::var_os("FASTADB_UPDATE_SNAPSHOTS").is_some() {
        fs::create_dir_all(snapshot_root()).expect("create snapshot directory");
        fs::write(&path, &actual).expect("write snapshot");
        return;
    }

    let expected = fs::read(&path).unwrap_or_else(|_| panic!("snapshot {} not found", path.display()));
    if expected == actual {
        return;
    }
    let lines = |bytes: &[u8]| -> Vec<Vec<u8>> {
        bytes
            .split_inclusive(|&byte| byte == b'\n')
            .map(<[u8]>::to_vec)
            .collect()
    };
    let (want, got) = (lines(&expected), lines(&actual));
    let line = want
        .iter()
        .zip(&got)
        .position(|(want, got)| want != got)
        .unwrap_or(want.len().min(got.len()));
    panic!(
        "{} differs from {} at line {}. Set FASTADB_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
        file.path().display(),
        path.display(),
        line + 1,
        String::from_utf8_lossy(&expected),
        String::from_utf8_lossy(&actual),
    );
}

/// Temporary FASTA file with the given contents.
pub fn fasta_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create temp file");
    fs::write(file.path(), contents).expect("write fixture");
    file
}

pub fn file_text(file: &NamedTempFile) -> String {
    fs::read_to_string(file.path()).expect("read fixture back")
}

pub fn config(file: &NamedTempFile, mode: OpenMode) -> StoreConfig {
    StoreConfig::new(file.path()).with_mode(mode)
}

pub fn open_rw(file: &NamedTempFile) -> FastaStore {
    FastaStore::open(config(file, OpenMode::ReadWrite)).expect("open read-write")
}

pub fn open_ro(file: &NamedTempFile) -> FastaStore {
    FastaStore::open(config(file, OpenMode::ReadOnly)).expect("open read-only")
}

/// Canonical FASTA text for `(id, sequence)` pairs.
pub fn canonical(records: &[(&str, &str)], width: usize) -> String {
    let mut out = String::new();
    for (id, sequence) in records {
        out.push('>');
        out.push_str(id);
        out.push('\n');
        for line in sequence.as_bytes().chunks(width) {
            out.push_str(std::str::from_utf8(line).expect("ascii"));
            out.push('\n');
        }
    }
    out
}

/// Deterministic pseudo-random bases.
pub fn bases(length: usize, seed: u64) -> String {
    const ALPHABET: &[u8] = b"ACGTACGTACGTNNX";
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..length)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ALPHABET[((state >> 33) % ALPHABET.len() as u64) as usize] as char
        })
        .collect()
}

/// Assert that a fresh read-only open of the file agrees with `store`.
pub fn assert_reopen_matches(store: &FastaStore) {
    let reopened = FastaStore::open(
        StoreConfig::new(&store.config().path).with_index_distance(store.config().index_distance),
    )
    .expect("reopen");
    assert_eq!(reopened.get_ids(), store.get_ids());
    for id in store.get_ids() {
        let id = id.as_str();
        assert_eq!(
            reopened.get_sequence(id).unwrap(),
            store.get_sequence(id).unwrap(),
            "sequence of {id}"
        );
        let fresh = reopened.record(id).unwrap();
        let live = store.record(id).unwrap();
        assert_eq!(fresh.length, live.length, "length of {id}");
        assert_eq!(fresh.gc_length, live.gc_length, "gc of {id}");
        assert_eq!(fresh.subt_length, live.subt_length, "subt of {id}");
        assert_eq!(fresh.xn_length, live.xn_length, "xn of {id}");
        assert_eq!(fresh.start_byte, live.start_byte, "start byte of {id}");
        assert_eq!(fresh.start_line, live.start_line, "start line of {id}");
        // An emptied record keeps a blank line that ingestion does not count.
        if live.length > 0 {
            assert_eq!(fresh.line_count, live.line_count, "line count of {id}");
            assert_eq!(fresh.byte_length, live.byte_length, "byte length of {id}");
        }
    }
}
