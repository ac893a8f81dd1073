pub mod ref_resolve;

pub use ref_resolve::{RefResolver, ResolveWarning, TypeTable};
