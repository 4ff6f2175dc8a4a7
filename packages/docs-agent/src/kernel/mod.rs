//! Kernel module - provider infrastructure and dependencies.

pub mod deps;
pub mod openai;
pub mod test_dependencies;
pub mod traits;

pub use deps::AgentDeps;
pub use openai::OpenAIAdapter;
pub use test_dependencies::{MockCompletion, MockDocumentStore, MockFileSearch, MockRetriever, TestDependencies};
pub use traits::*;
