//! Shared accessor fixtures

use lcm_core::model::{class, flid};
use lcm_core::{AccessorConfig, DomainDataByFlid, Hvo, NULL_HVO};

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("lcm_core=debug")
        .try_init();
}

/// Accessor over an empty repository with the default configuration.
pub fn accessor() -> DomainDataByFlid {
    init_tracing();
    DomainDataByFlid::new(AccessorConfig::default()).expect("default config is valid")
}

/// A lexicon entry with senses and a few semantic domains.
pub struct Lexicon {
    pub dd: DomainDataByFlid,
    pub entry: Hvo,
    pub senses: Vec<Hvo>,
    pub domains: Vec<Hvo>,
}

/// Builds a committed entry with `senses` senses and `domains` unowned
/// semantic domain possibilities.
pub fn lexicon(senses: usize, domains: usize) -> Lexicon {
    let mut dd = accessor();
    dd.begin_undo_task("Undo Setup", "Redo Setup").unwrap();
    let entry = dd
        .make_new_object(class::LEX_ENTRY, NULL_HVO, 0, -1)
        .unwrap();
    let senses = (0..senses)
        .map(|_| {
            dd.make_new_object(class::LEX_SENSE, entry, flid::LEX_ENTRY_SENSES, -1)
                .unwrap()
        })
        .collect();
    let domains = (0..domains)
        .map(|_| {
            dd.make_new_object(class::CM_POSSIBILITY, NULL_HVO, 0, -1)
                .unwrap()
        })
        .collect();
    dd.end_undo_task().unwrap();
    Lexicon {
        dd,
        entry,
        senses,
        domains,
    }
}
