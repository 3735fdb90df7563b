//! Process-wide registries for string formats and custom scalar kinds.
//!
//! Both registries are write-once per name: the first registration wins and
//! later attempts are ignored, so bootstrapping twice, or in a process where
//! another component registered the same names, is harmless.

mod formats;
mod kinds;

pub use formats::{FormatPredicate, FormatRegistry};
pub use kinds::{KindValidator, TypeRegistry};
