mod ops;
mod schema;

pub use ops::{DbStats, QuillDb};
