//! Backup, restore and CSV export of the core catalog entities.
//!
//! The interchange format is a section-delimited text file: an uppercase
//! section header, a column line, then one CSV row per record. It is
//! deliberately portable: numeric ids are dropped and cross-references go
//! by name, so a backup restores cleanly into a store with different ids.

pub mod export;
pub mod restore;
pub mod snapshot;
pub mod text;

pub use export::{export_csv, ExportKind};
pub use restore::{restore_snapshot, RestoreSummary};
pub use snapshot::{create_backup, BackupSnapshot};
pub use text::{parse_text, serialize_to_text, ParseOutcome, SkippedRow};
