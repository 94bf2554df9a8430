mod serialize;

pub use serialize::{ExpansionSnapshot, SNAPSHOT_VERSION, load_snapshot, save_snapshot};
