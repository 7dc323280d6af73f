mod checklist_loader;
mod flat_loader;

pub use checklist_loader::{ChecklistLoader, ChecklistRecord, CsvLoadError, builtin_checklist};
pub use flat_loader::{FlatLoader, FlatRecord, LoaderError};
