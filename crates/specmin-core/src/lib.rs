pub mod config;
pub mod error;
pub mod node;
pub mod parse;
pub mod resolve;
pub mod transform;

pub use config::{CompactOptions, SpecminConfig};
pub use node::Node;
pub use parse::SpecDocument;
pub use transform::{CompactOutput, compact};
