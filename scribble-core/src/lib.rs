pub mod scoring;
pub mod turns;
pub mod words;

// Re-export main components
pub use scoring::*;
pub use turns::*;
pub use words::*;
