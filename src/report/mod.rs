//! Output writers: persisted JSON documents and colored terminal summaries.

mod json;
mod terminal;

pub use json::{write_graph, write_missing_tests};
pub use terminal::{print_graph_summary, print_missing_summary, print_reduce_summary};
