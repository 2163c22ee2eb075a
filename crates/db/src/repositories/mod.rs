//! Database repositories.

pub mod assembly;
pub mod code;
pub mod question;
pub mod vote;

pub use assembly::AssemblyRepository;
pub use code::CodeRepository;
pub use question::QuestionRepository;
pub use vote::VoteRepository;
