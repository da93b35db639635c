//! Persistent statute index (LanceDB) and the in-memory flat inner-product
//! index served from it.

pub mod flat;
pub mod loader;
pub mod schema;
pub mod table;
pub mod writer;

pub use flat::FlatIpIndex;
pub use loader::{load_corpus, LoadedCorpus};
pub use table::IndexManifest;
pub use writer::{build_index, IndexWriter};
