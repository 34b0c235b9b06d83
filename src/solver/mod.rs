//! Type resolution over three providers: a built-in table of common platform
//! types, project sources and classpath archives, checked in that order.
//! Every failure is an `Option::None` rather than an error: callers decide
//! whether an unresolved name is fatal.

mod archive;
mod platform;
mod source;

pub use archive::ArchiveSolver;
pub use platform::{PlatformEntry, PlatformSolver};
pub use source::{RawMethod, SourceEntry, SourceSolver};

use crate::parser::{Import, ParsedUnit, TypeKind};
use std::collections::{HashSet, VecDeque};

/// Where a resolved type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOrigin {
    Source,
    Archive,
    Platform,
}

/// A successfully resolved reference type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub fqcn: String,
    pub kind: TypeKind,
    pub origin: TypeOrigin,
}

/// A method found by hierarchy lookup, with its parameter and return types
/// already rendered to qualified names.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethodSig {
    pub declaring_class: String,
    pub name: String,
    pub param_types: Vec<String>,
    pub varargs: bool,
    pub return_type: String,
}

impl ResolvedMethodSig {
    pub fn signature(&self) -> String {
        crate::model::render_signature(&self.name, &self.param_types)
    }
}

/// Name-resolution context: the package, imports and enclosing type of the
/// location where a raw type name appears.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    pub package: Option<&'a str>,
    pub imports: &'a [Import],
    /// Fully qualified name of the enclosing type, for nested-type lookup
    pub scope: Option<&'a str>,
}

impl<'a> TypeContext<'a> {
    pub fn of_unit(unit: &'a ParsedUnit, scope: Option<&'a str>) -> Self {
        Self {
            package: unit.package.as_deref(),
            imports: &unit.imports,
            scope,
        }
    }
}

/// One provider entry, borrowed from whichever solver owns the type.
pub enum EntryRef<'a> {
    Source(&'a SourceEntry),
    Platform(&'a PlatformEntry),
    /// Known to exist in an archive; no member or hierarchy information
    Archive,
}

/// Shared lookup algorithms over any combination of type providers.
///
/// Implementors supply [`TypeLookup::entry`]; name resolution, hierarchy
/// walking and member lookup are derived from it.
pub trait TypeLookup {
    fn entry(&self, fqcn: &str) -> Option<EntryRef<'_>>;

    /// Resolve an exact fully qualified (or default-package) name.
    fn resolve_fqcn(&self, fqcn: &str) -> Option<ResolvedType> {
        let entry = self.entry(fqcn)?;
        let (kind, origin) = match entry {
            EntryRef::Source(e) => (e.kind, TypeOrigin::Source),
            EntryRef::Platform(e) => (e.kind, TypeOrigin::Platform),
            EntryRef::Archive => (TypeKind::Class, TypeOrigin::Archive),
        };
        Some(ResolvedType {
            fqcn: fqcn.to_string(),
            kind,
            origin,
        })
    }

    /// Resolve a type name as written in source. Generic arguments and array
    /// suffixes are ignored; primitives resolve to nothing.
    fn resolve_name(&self, raw: &str, ctx: &TypeContext) -> Option<ResolvedType> {
        let (base, _) = split_type_text(raw);
        if base.is_empty() || is_primitive(&base) {
            return None;
        }

        if base.contains('.') {
            if let Some(hit) = self.resolve_fqcn(&base) {
                return Some(hit);
            }
            // Qualified by a visible simple name: `Outer.Inner`
            let (first, rest) = base.split_once('.').unwrap();
            if let Some(outer) = self.resolve_simple(first, ctx) {
                return self.resolve_fqcn(&format!("{}.{}", outer.fqcn, rest));
            }
            return None;
        }

        self.resolve_simple(&base, ctx)
    }

    /// Simple-name resolution: enclosing types, then imports, then the same
    /// package, then `java.lang`, then wildcard imports, then the default
    /// package.
    fn resolve_simple(&self, name: &str, ctx: &TypeContext) -> Option<ResolvedType> {
        if let Some(scope) = ctx.scope {
            let mut prefix = scope.to_string();
            loop {
                if ctx.package == Some(prefix.as_str()) {
                    break;
                }
                if let Some(hit) = self.resolve_fqcn(&format!("{}.{}", prefix, name)) {
                    return Some(hit);
                }
                match prefix.rfind('.') {
                    Some(pos) => prefix.truncate(pos),
                    None => break,
                }
            }
        }

        for import in ctx.imports {
            if !import.wildcard && !import.is_static && import.simple_name() == name {
                if let Some(hit) = self.resolve_fqcn(&import.path) {
                    return Some(hit);
                }
            }
        }

        if let Some(pkg) = ctx.package {
            if let Some(hit) = self.resolve_fqcn(&format!("{}.{}", pkg, name)) {
                return Some(hit);
            }
        }

        if let Some(hit) = self.resolve_fqcn(&format!("java.lang.{}", name)) {
            return Some(hit);
        }

        for import in ctx.imports {
            if import.wildcard && !import.is_static {
                if let Some(hit) = self.resolve_fqcn(&format!("{}.{}", import.path, name)) {
                    return Some(hit);
                }
            }
        }

        self.resolve_fqcn(name)
    }

    /// Render a raw type to its qualified form: base name resolved,
    /// generic arguments dropped, array suffix kept. Unresolvable names
    /// render as written.
    fn render_type(&self, raw: &str, ctx: &TypeContext) -> String {
        let (base, suffix) = split_type_text(raw);
        if base.is_empty() || is_primitive(&base) {
            return format!("{}{}", base, suffix);
        }
        match self.resolve_name(&base, ctx) {
            Some(resolved) => format!("{}{}", resolved.fqcn, suffix),
            None => format!("{}{}", base, suffix),
        }
    }

    /// Direct supertypes, resolved to qualified names. Declaration order is
    /// kept: the superclass of a class comes first. Unresolvable supertypes
    /// are dropped.
    fn supertypes_of(&self, fqcn: &str) -> Vec<String> {
        match self.entry(fqcn) {
            Some(EntryRef::Source(entry)) => {
                let ctx = entry.context();
                entry
                    .super_types
                    .iter()
                    .filter_map(|raw| self.resolve_name(raw, &ctx))
                    .map(|resolved| resolved.fqcn)
                    .collect()
            }
            Some(EntryRef::Platform(entry)) => {
                entry.supers.iter().map(|s| s.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// True when a value of type `from` can be assigned to a variable of type
    /// `to`: either both are the same type or `to` is reachable walking up
    /// from `from`.
    fn is_assignable(&self, to: &str, from: &str) -> bool {
        if to == from || to == "java.lang.Object" {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from.to_string()]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for superty in self.supertypes_of(&current) {
                if superty == to {
                    return true;
                }
                queue.push_back(superty);
            }
        }
        false
    }

    /// Find a method by name and argument count, walking the hierarchy
    /// breadth-first from `on`. Varargs methods accept any count at or above
    /// their fixed arity. Falls back to `java.lang.Object` members at the end
    /// of every chain.
    fn lookup_method(&self, on: &str, name: &str, argc: usize) -> Option<ResolvedMethodSig> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([on.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(sig) = self.method_on(&current, name, argc) {
                return Some(sig);
            }
            for superty in self.supertypes_of(&current) {
                queue.push_back(superty);
            }
        }

        if visited.contains("java.lang.Object") {
            return None;
        }
        self.method_on("java.lang.Object", name, argc)
    }

    /// Methods declared directly on one type.
    fn method_on(&self, fqcn: &str, name: &str, argc: usize) -> Option<ResolvedMethodSig> {
        match self.entry(fqcn)? {
            EntryRef::Source(entry) => {
                let ctx = entry.context();
                let raw = entry
                    .methods
                    .iter()
                    .find(|m| m.name == name && m.accepts(argc))?;
                Some(self.render_method(fqcn, raw, &ctx))
            }
            EntryRef::Platform(_) => {
                let m = PlatformSolver::method_on(fqcn, name, argc)?;
                Some(ResolvedMethodSig {
                    declaring_class: fqcn.to_string(),
                    name: m.name.to_string(),
                    param_types: m.params.iter().map(|p| p.to_string()).collect(),
                    varargs: m.varargs,
                    return_type: m.return_type.to_string(),
                })
            }
            EntryRef::Archive => None,
        }
    }

    /// Render a source method to qualified parameter and return types.
    /// The trailing parameter of a varargs method renders as an array.
    fn render_method(&self, declaring: &str, raw: &RawMethod, ctx: &TypeContext) -> ResolvedMethodSig {
        let mut param_types: Vec<String> = raw
            .raw_params
            .iter()
            .map(|p| self.render_type(p, ctx))
            .collect();
        if raw.varargs {
            if let Some(last) = param_types.last_mut() {
                last.push_str("[]");
            }
        }
        ResolvedMethodSig {
            declaring_class: declaring.to_string(),
            name: raw.name.clone(),
            param_types,
            varargs: raw.varargs,
            return_type: self.render_type(&raw.raw_return, ctx),
        }
    }

    /// Find a field by name, walking the hierarchy from `on`. Returns the
    /// field's rendered type.
    fn lookup_field(&self, on: &str, name: &str) -> Option<String> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([on.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            match self.entry(&current) {
                Some(EntryRef::Source(entry)) => {
                    if let Some((_, raw_type)) =
                        entry.fields.iter().find(|(field, _)| field == name)
                    {
                        let ctx = entry.context();
                        return Some(self.render_type(raw_type, &ctx));
                    }
                }
                Some(EntryRef::Platform(_)) => {
                    if let Some(field_type) = PlatformSolver::field_on(&current, name) {
                        return Some(field_type.to_string());
                    }
                }
                _ => {}
            }
            for superty in self.supertypes_of(&current) {
                queue.push_back(superty);
            }
        }
        None
    }
}

/// The combined solver used by every analysis mode.
pub struct TypeSolver {
    platform: PlatformSolver,
    source: SourceSolver,
    archives: ArchiveSolver,
}

impl TypeSolver {
    pub fn new(source: SourceSolver, archives: ArchiveSolver) -> Self {
        Self {
            platform: PlatformSolver::new(),
            source,
            archives,
        }
    }

    /// Number of project types known to the solver.
    pub fn source_type_count(&self) -> usize {
        self.source.len()
    }

    /// Number of archive classes known to the solver.
    pub fn archive_class_count(&self) -> usize {
        self.archives.len()
    }

    /// A view of this solver with one extra compilation unit layered on top,
    /// used when analyzing test files that are not part of the model.
    pub fn with_unit<'a>(&'a self, unit: &ParsedUnit) -> ScopedSolver<'a> {
        ScopedSolver {
            overlay: SourceSolver::from_units(std::slice::from_ref(unit)),
            base: self,
        }
    }
}

impl TypeLookup for TypeSolver {
    fn entry(&self, fqcn: &str) -> Option<EntryRef<'_>> {
        if let Some(platform) = self.platform.get(fqcn) {
            return Some(EntryRef::Platform(platform));
        }
        if let Some(source) = self.source.get(fqcn) {
            return Some(EntryRef::Source(source));
        }
        if self.archives.contains(fqcn) {
            return Some(EntryRef::Archive);
        }
        None
    }
}

/// A [`TypeSolver`] plus the declarations of a single extra unit. The overlay
/// wins on name collisions.
pub struct ScopedSolver<'a> {
    overlay: SourceSolver,
    base: &'a TypeSolver,
}

impl TypeLookup for ScopedSolver<'_> {
    fn entry(&self, fqcn: &str) -> Option<EntryRef<'_>> {
        if let Some(source) = self.overlay.get(fqcn) {
            return Some(EntryRef::Source(source));
        }
        self.base.entry(fqcn)
    }
}

/// Split a raw type into its base name and array suffix, dropping generic
/// arguments: `Map<String, List<Foo>>[]` becomes `("Map", "[]")`.
pub fn split_type_text(raw: &str) -> (String, String) {
    let mut base = String::new();
    let mut depth = 0usize;
    let mut arrays = 0usize;

    for c in raw.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '[' if depth == 0 => arrays += 1,
            ']' => {}
            _ if depth == 0 => base.push(c),
            _ => {}
        }
    }

    (base.trim().to_string(), "[]".repeat(arrays))
}

pub fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "void" | "boolean" | "byte" | "short" | "int" | "long" | "char" | "float" | "double"
    )
}
