pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod history;
pub mod output;
pub mod reason;

pub use builder::{DialogueExample, ExampleBuilder, Message, Role};
pub use config::Config;
pub use error::{MoocgenError, Result};
pub use graph::{GraphStore, LoadStats};
pub use reason::{decide, generate_reason, Justification};
