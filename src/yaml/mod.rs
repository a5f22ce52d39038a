mod emit;
mod parse;
mod value;

pub use emit::{emit_mapping, emit_sequence};
pub use parse::{Document, load_mapping, load_sequence, parse, parse_mapping, parse_sequence};
pub use value::{Mapping, Value};
