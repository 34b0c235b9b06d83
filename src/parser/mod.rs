mod common;
mod java;
mod unit;

pub use common::node_text;
pub use java::JavaParser;
pub use unit::{
    ArgExpr, ArgHint, CallSite, Import, LocalVar, ParsedField, ParsedMethod, ParsedParam,
    ParsedType, ParsedUnit, Receiver, Span, TypeKind,
};

use crate::discovery::SourceFile;
use rayon::prelude::*;
use tracing::warn;

/// Parse a list of discovered files into units, in file order. Files that
/// cannot be read or parsed are skipped with a warning.
pub fn parse_files(files: &[SourceFile], parallel: bool) -> Vec<ParsedUnit> {
    let parser = JavaParser::new();

    let parse_one = |file: &SourceFile| -> Option<ParsedUnit> {
        let contents = match file.read_contents() {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Skipping unreadable file {}: {}", file.path.display(), err);
                return None;
            }
        };
        match parser.parse(&file.path, &contents) {
            Ok(unit) => Some(unit),
            Err(err) => {
                warn!("Skipping unparseable file {}: {}", file.path.display(), err);
                None
            }
        }
    };

    if parallel {
        files.par_iter().filter_map(parse_one).collect()
    } else {
        files.iter().filter_map(parse_one).collect()
    }
}
