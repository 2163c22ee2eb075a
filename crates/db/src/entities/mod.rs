//! Database entities.

pub mod assembly;
pub mod code;
pub mod question;
pub mod vote;

pub use assembly::Entity as Assembly;
pub use code::Entity as Code;
pub use question::Entity as Question;
pub use vote::Entity as Vote;
pub use vote::VoteOption;
