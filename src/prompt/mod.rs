pub mod generator;
pub mod history;
pub mod random;
pub mod theme;
pub mod vocabulary;

// Re-export the main types for convenience
pub use generator::{GeneratorConfig, PromptGenerator};
pub use history::PromptHistory;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use theme::{Theme, ThemeMode};
pub use vocabulary::{Vocabulary, WordPart};
