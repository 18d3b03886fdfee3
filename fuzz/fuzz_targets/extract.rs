// fuzz/fuzz_targets/extract.rs
//! Fuzzes the extraction pipeline's totality guarantees: `extract` and
//! `clean_sql` must never panic, and `clean_sql` must be idempotent, for
//! any input string.

#![no_main]

use libfuzzer_sys::fuzz_target;
use queryscope_core::{clean_sql, extract};

fuzz_target!(|data: &str| {
    let fragments = extract(data);

    let canonical = clean_sql(data);
    assert_eq!(clean_sql(&canonical), canonical);

    // Extracting the canonical form must also be total.
    let canonical_fragments = extract(&canonical);

    let _ = (fragments, canonical_fragments);
});
