//! Rule-set repositories for the Verdict policy gate engine
//!
//! A repository hands out whole, versioned rule sets. Rule sets are never
//! mutated through a repository; publishing a new version means writing a
//! new document and reloading it.
//!
//! # Quick Start
//!
//! ```no_run
//! use verdict_repository::{FileSystemRepository, RuleSetRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = FileSystemRepository::new("rulesets")?;
//!
//! // Load by id (searches the directory tree)
//! let (rule_set, _content) = repo.load("safety_guardrails").await?;
//! println!("Loaded {} ({})", rule_set.id(), rule_set.version());
//!
//! // Or by relative path
//! let (rule_set, _content) = repo.load("safety/guardrails.yaml").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file_system;
pub mod memory;
pub mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use file_system::FileSystemRepository;
pub use memory::MemoryRepository;
pub use traits::RuleSetRepository;
