pub mod file_pair;

pub use file_pair::{discover_names, plan_pairs, FilePair};
