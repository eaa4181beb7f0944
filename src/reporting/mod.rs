pub mod summarizer;

pub use summarizer::summarize;
