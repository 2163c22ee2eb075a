//! Business logic services.

pub mod assembly;
pub mod ballot;
pub mod question;
pub mod report;
pub mod tally;

pub use assembly::{AssemblyService, CODES_PER_ASSEMBLY};
pub use ballot::{BallotService, CastResult, ValidatedBallot, MAX_CODES_PER_BALLOT};
pub use question::QuestionService;
pub use report::{AssemblyReport, ReportSection, ReportService};
pub use tally::Tally;
