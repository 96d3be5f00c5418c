pub mod config;
pub mod decisions;
pub mod error;
pub mod inheritance;
pub mod license;
pub mod logging;
pub mod output;
pub mod policy;

// Re-export main types for easy access
pub use decisions::{Command, Decisions, Txn};
pub use error::{DecisionsError, Result};
pub use inheritance::{DefaultReader, InheritanceSpec, SourceReader, SourceTable};
pub use license::{find_by_name, License};
pub use policy::{evaluate, ComplianceSummary, DecisionStatus, DiscoveredPackage};
