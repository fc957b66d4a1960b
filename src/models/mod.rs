pub mod recon;
pub mod table;

pub use recon::{
    ClassifiedRow, CompositeKey, Disposition, KeyedRow, NormalizedRow, ReconOutput, ReconStats,
    ReferenceEntry,
};
pub use table::{Record, Table, TableKind, Value};
