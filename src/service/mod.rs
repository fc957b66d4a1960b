pub mod classifier;
pub mod filter;
pub mod index;
pub mod key;
pub mod normalizer;
pub mod projector;
pub mod reconciler;

pub use classifier::classify;
pub use index::ReferenceIndex;
pub use key::build_key;
pub use reconciler::Reconciler;
