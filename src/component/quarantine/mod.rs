//! Recoverable deletion: selected videos and their mosaics move to quarantine.

mod main;

pub use main::{QuarantineExecutor, QuarantineFailure, QuarantineReport, QuarantinedEntry};
