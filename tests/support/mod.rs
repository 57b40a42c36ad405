#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use snipsql::SnippetStore;

pub(crate) fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// `A -> B -> C` with bodies `b_a`, `b_b`, `b_c`.
pub(crate) fn chain_store() -> SnippetStore {
    let mut store = SnippetStore::new();
    store.store("C", "b_c", None).expect("C should store");
    store
        .store("B", "b_b", Some(names(&["C"])))
        .expect("B should store");
    store
        .store("A", "b_a", Some(names(&["B"])))
        .expect("A should store");
    store
}

/// `A -> [B, C]`, `B -> D`, `C -> D`.
pub(crate) fn diamond_store() -> SnippetStore {
    let mut store = SnippetStore::new();
    store.store("D", "SELECT 4", None).expect("D should store");
    store
        .store("B", "SELECT * FROM D", Some(names(&["D"])))
        .expect("B should store");
    store
        .store("C", "SELECT * FROM D", Some(names(&["D"])))
        .expect("C should store");
    store
        .store("A", "SELECT * FROM B JOIN C USING (id)", Some(names(&["B", "C"])))
        .expect("A should store");
    store
}

pub(crate) fn writers_store() -> SnippetStore {
    let mut store = SnippetStore::new();
    store
        .store(
            "writers_fav",
            "SELECT * FROM writers WHERE genre = 'non-fiction'",
            None,
        )
        .expect("writers_fav should store");
    store
        .store(
            "writers_fav_modern",
            "SELECT * FROM writers_fav WHERE born >= 1970",
            Some(names(&["writers_fav"])),
        )
        .expect("writers_fav_modern should store");
    store
}

/// Run the `snipsql` binary against `dir` with a clean dialect environment.
pub(crate) fn snipsql(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snipsql"))
        .env_remove("SNIPSQL_DIALECT")
        .env_remove("SNIPSQL_LOG")
        .arg("--snippets-dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("should run snipsql binary")
}

pub(crate) fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub(crate) fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
