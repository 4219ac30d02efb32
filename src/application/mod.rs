//! Application layer - Use cases and orchestration

pub mod extract;
pub mod generate_docs;
pub mod report;
pub mod strip;

use crate::error::Result;

pub use extract::{ExtractCommand, ExtractOutcome};
pub use generate_docs::{GenerateDocsCommand, GenerationOutcome};
pub use report::{RunReport, SkippedFile};
pub use strip::{StripCommand, StripOutcome, StrippedFile};

/// A use case that can be run from the command line
pub trait Command {
    type Output;

    fn invoke(&self) -> Result<Self::Output>;
}
