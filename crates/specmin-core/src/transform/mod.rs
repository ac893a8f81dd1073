pub mod abbreviate;
pub mod compact;
pub mod flatten;
pub mod prune;
pub mod security;
pub mod select;
pub mod serialize;

pub use abbreviate::Abbreviations;
pub use compact::{CompactOutput, compact};
pub use select::EndpointRecord;
