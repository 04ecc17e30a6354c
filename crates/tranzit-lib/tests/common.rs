use std::path::PathBuf;

use tranzit_lib::TransitSnapshot;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_snapshot() -> TransitSnapshot {
    TransitSnapshot::load(&fixtures_dir().join("tranzy_snapshot.json")).expect("fixture loads")
}
