pub mod formatting;
pub mod options;
pub mod source;
pub mod value;

pub use options::Options;
pub use source::{Record, Relation, Source};
pub use value::{Fields, Presented, Value};
