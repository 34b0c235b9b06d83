// Project-source type provider

use super::TypeContext;
use crate::parser::{Import, ParsedMethod, ParsedUnit, TypeKind};
use std::collections::HashMap;
use tracing::debug;

/// A method as declared in source, types still unresolved.
#[derive(Debug, Clone)]
pub struct RawMethod {
    pub name: String,
    pub raw_params: Vec<String>,
    pub varargs: bool,
    pub raw_return: String,
}

impl RawMethod {
    pub fn from_parsed(method: &ParsedMethod) -> Self {
        Self {
            name: method.name.clone(),
            raw_params: method.params.iter().map(|p| p.raw_type.clone()).collect(),
            varargs: method.params.last().map(|p| p.varargs).unwrap_or(false),
            raw_return: method.raw_return_type.clone(),
        }
    }

    /// Whether a call with `argc` arguments can bind to this method.
    pub fn accepts(&self, argc: usize) -> bool {
        if self.varargs {
            argc + 1 >= self.raw_params.len()
        } else {
            argc == self.raw_params.len()
        }
    }
}

/// One type declared in the scanned sources, with everything needed to
/// resolve names appearing inside it.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub fqcn: String,
    pub kind: TypeKind,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    /// Supertype names as written
    pub super_types: Vec<String>,
    /// Field name and type as written, declaration order
    pub fields: Vec<(String, String)>,
    pub methods: Vec<RawMethod>,
}

impl SourceEntry {
    /// The resolution context for names written inside this type.
    pub fn context(&self) -> TypeContext<'_> {
        TypeContext {
            package: self.package.as_deref(),
            imports: &self.imports,
            scope: Some(&self.fqcn),
        }
    }
}

/// Index of every type declared in the scanned compilation units.
#[derive(Debug, Default)]
pub struct SourceSolver {
    types: HashMap<String, SourceEntry>,
}

impl SourceSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: &[ParsedUnit]) -> Self {
        let mut solver = Self::new();
        for unit in units {
            solver.add_unit(unit);
        }
        solver
    }

    pub fn add_unit(&mut self, unit: &ParsedUnit) {
        for parsed in &unit.types {
            if self.types.contains_key(&parsed.fqcn) {
                debug!("Duplicate type declaration ignored: {}", parsed.fqcn);
                continue;
            }
            let entry = SourceEntry {
                fqcn: parsed.fqcn.clone(),
                kind: parsed.kind,
                package: unit.package.clone(),
                imports: unit.imports.clone(),
                super_types: parsed.super_types.clone(),
                fields: parsed
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.raw_type.clone()))
                    .collect(),
                methods: parsed.methods.iter().map(RawMethod::from_parsed).collect(),
            };
            self.types.insert(parsed.fqcn.clone(), entry);
        }
    }

    pub fn get(&self, fqcn: &str) -> Option<&SourceEntry> {
        self.types.get(fqcn)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
