mod assemble;
mod xml;

pub use assemble::assemble;
pub use xml::{ATOM_NS, Element, ITUNES_NS, Namespace, render, write_feed};
