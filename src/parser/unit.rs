// Syntactic model of one compilation unit - some accessors reserved for future use
#![allow(dead_code)]

use std::path::PathBuf;

/// Byte range of a node in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One parsed `.java` file: package, imports and every type declared in it.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub path: PathBuf,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<ParsedType>,
}

impl ParsedUnit {
    /// Qualify a top-level simple name with this unit's package.
    pub fn qualify(&self, name: &str) -> String {
        match &self.package {
            Some(pkg) => format!("{}.{}", pkg, name),
            None => name.to_string(),
        }
    }

    pub fn find_type(&self, fqcn: &str) -> Option<&ParsedType> {
        self.types.iter().find(|t| t.fqcn == fqcn)
    }
}

/// An import statement. `path` never carries the trailing `.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub wildcard: bool,
    pub is_static: bool,
}

impl Import {
    /// Last path segment, e.g. `List` for `java.util.List`.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

impl TypeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

/// A class, interface or enum declaration. Nested types appear both in their
/// enclosing unit's `types` list and with a dotted `fqcn` (`pkg.Outer.Inner`).
#[derive(Debug, Clone)]
pub struct ParsedType {
    pub fqcn: String,
    pub simple_name: String,
    pub kind: TypeKind,
    /// Supertype names as written in source (`extends` and `implements`),
    /// possibly generic, unresolved
    pub super_types: Vec<String>,
    pub fields: Vec<ParsedField>,
    pub methods: Vec<ParsedMethod>,
    pub span: Span,
}

/// A field (or interface constant) declarator: one entry per declared name.
#[derive(Debug, Clone)]
pub struct ParsedField {
    pub name: String,
    /// Type as written, possibly generic
    pub raw_type: String,
}

/// A method declaration. Constructors are not modeled; calls are attributed to
/// methods only.
#[derive(Debug, Clone)]
pub struct ParsedMethod {
    pub name: String,
    pub params: Vec<ParsedParam>,
    /// Return type as written, `void` for void methods
    pub raw_return_type: String,
    /// Every method invocation in the body, in traversal order
    pub calls: Vec<CallSite>,
    /// Local variables visible for receiver typing, in declaration order
    pub locals: Vec<LocalVar>,
    /// Full declaration node, modifiers and annotations included
    pub span: Span,
    /// Start of an attached leading comment block, when one sits directly
    /// above the declaration
    pub doc_start: Option<usize>,
    pub line: usize,
}

impl ParsedMethod {
    /// Byte range to cut when this method is removed from its file.
    pub fn removal_span(&self) -> Span {
        Span::new(self.doc_start.unwrap_or(self.span.start), self.span.end)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedParam {
    pub name: String,
    /// Type as written, without the `...` of a varargs parameter
    pub raw_type: String,
    pub varargs: bool,
}

/// A local variable declaration, including for-each variables, try resources
/// and catch parameters.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub name: String,
    pub raw_type: String,
    /// Byte offset of the declaration; the variable is only considered for
    /// receivers appearing after it
    pub declared_at: usize,
}

/// A single method invocation expression.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub name: String,
    pub receiver: Receiver,
    pub args: Vec<ArgExpr>,
    pub byte: usize,
    pub line: usize,
}

/// The receiver expression of a call, reduced to the shapes the resolver
/// understands.
#[derive(Debug, Clone)]
pub enum Receiver {
    /// Unqualified call: `helper()`
    Implicit,
    /// `this.helper()`
    This,
    /// `super.helper()`
    Super,
    /// Bare identifier or dotted identifier chain: `store.save()`,
    /// `com.example.Util.now()`
    Path(String),
    /// Chain rooted at `this`: `this.store.save()`; the leading `this.` is
    /// stripped
    ThisPath(String),
    /// `new Store().save()`; carries the type as written
    New(String),
    /// Chained call: `find().save()`
    Call(Box<CallSite>),
    /// `((Store) obj).save()`; carries the cast type as written
    Cast(String),
    /// `"text".length()`
    StringLit,
    /// Anything else (array access, arithmetic, lambda, ...)
    Other,
}

/// An argument expression with the type information recoverable from syntax.
#[derive(Debug, Clone)]
pub struct ArgExpr {
    /// Source text of the expression
    pub text: String,
    pub hint: ArgHint,
}

#[derive(Debug, Clone)]
pub enum ArgHint {
    /// Literal of a known type, e.g. `int`, `java.lang.String`
    Known(&'static str),
    /// Identifier or dotted chain to look up in scope
    Path(String),
    /// Constructor call; carries the type as written
    New(String),
    /// Nested call; typed by its resolved return type
    Call(Box<CallSite>),
    /// Cast expression; carries the cast type as written
    Cast(String),
    /// `this`
    This,
    /// No type recoverable from syntax alone
    Unknown,
}
