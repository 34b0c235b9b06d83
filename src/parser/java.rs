// Java parser built on tree-sitter

use super::common::{child_of_kind, is_comment, named_children, node_text};
use super::unit::{
    ArgExpr, ArgHint, CallSite, Import, LocalVar, ParsedField, ParsedMethod, ParsedParam,
    ParsedType, ParsedUnit, Receiver, Span, TypeKind,
};
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node, Parser as TsParser};

/// Java source parser. Produces the syntactic unit model consumed by the type
/// solver and the graph builder.
pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one compilation unit. Files with syntax errors are rejected
    /// whole; callers skip them.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<ParsedUnit> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .into_diagnostic()?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| miette::miette!("Failed to parse {}", path.display()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(miette::miette!("Syntax errors in {}", path.display()));
        }
        let mut unit = ParsedUnit {
            path: path.to_path_buf(),
            package: self.extract_package(root, contents),
            imports: self.extract_imports(root, contents),
            types: Vec::new(),
        };

        self.extract_types(root, contents, None, &mut unit);

        debug!(
            "Parsed {}: {} types, {} imports",
            path.display(),
            unit.types.len(),
            unit.imports.len()
        );

        Ok(unit)
    }

    fn extract_package(&self, root: Node, source: &str) -> Option<String> {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "package_declaration" {
                let mut pkg_cursor = child.walk();
                for pkg_child in child.children(&mut pkg_cursor) {
                    if pkg_child.kind() == "scoped_identifier" || pkg_child.kind() == "identifier" {
                        return Some(node_text(pkg_child, source).to_string());
                    }
                }
            }
        }
        None
    }

    fn extract_imports(&self, root: Node, source: &str) -> Vec<Import> {
        let mut imports = Vec::new();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() != "import_declaration" {
                continue;
            }

            let mut is_static = false;
            let mut wildcard = false;
            let mut path = None;

            let mut import_cursor = child.walk();
            for import_child in child.children(&mut import_cursor) {
                match import_child.kind() {
                    "static" => is_static = true,
                    "asterisk" => wildcard = true,
                    "scoped_identifier" | "identifier" => {
                        path = Some(node_text(import_child, source).to_string());
                    }
                    _ => {}
                }
            }

            if let Some(path) = path {
                imports.push(Import {
                    path,
                    wildcard,
                    is_static,
                });
            }
        }

        imports
    }

    /// Walk type declarations at the top level of a file or a type body.
    /// Local classes inside method bodies are not modeled.
    fn extract_types(&self, node: Node, source: &str, enclosing: Option<&str>, unit: &mut ParsedUnit) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let kind = match child.kind() {
                "class_declaration" => TypeKind::Class,
                "interface_declaration" => TypeKind::Interface,
                "enum_declaration" => TypeKind::Enum,
                _ => continue,
            };
            self.extract_type(child, kind, source, enclosing, unit);
        }
    }

    fn extract_type(
        &self,
        node: Node,
        kind: TypeKind,
        source: &str,
        enclosing: Option<&str>,
        unit: &mut ParsedUnit,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let simple_name = node_text(name_node, source).to_string();
        let fqcn = match enclosing {
            Some(outer) => format!("{}.{}", outer, simple_name),
            None => unit.qualify(&simple_name),
        };

        let mut parsed = ParsedType {
            fqcn: fqcn.clone(),
            simple_name,
            kind,
            super_types: self.extract_super_types(node, source),
            fields: Vec::new(),
            methods: Vec::new(),
            span: Span::new(node.start_byte(), node.end_byte()),
        };

        let body = node.child_by_field_name("body");
        if let Some(body) = body {
            // Enum members live one level down, next to the constants
            let member_holder = if body.kind() == "enum_body" {
                child_of_kind(body, "enum_body_declarations")
            } else {
                Some(body)
            };

            if let Some(holder) = member_holder {
                self.extract_members(holder, source, &mut parsed);
            }
        }

        unit.types.push(parsed);

        // Nested types come after their enclosing type
        if let Some(body) = body {
            let member_holder = if body.kind() == "enum_body" {
                child_of_kind(body, "enum_body_declarations")
            } else {
                Some(body)
            };
            if let Some(holder) = member_holder {
                self.extract_types(holder, source, Some(&fqcn), unit);
            }
        }
    }

    fn extract_members(&self, body: Node, source: &str, parsed: &mut ParsedType) {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => {
                    self.extract_field(child, source, parsed);
                }
                "method_declaration" => {
                    if let Some(method) = self.extract_method(child, source) {
                        parsed.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_field(&self, node: Node, source: &str, parsed: &mut ParsedType) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let raw_type = node_text(type_node, source).to_string();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "variable_declarator" {
                if let Some(name_node) = child.child_by_field_name("name") {
                    parsed.fields.push(ParsedField {
                        name: node_text(name_node, source).to_string(),
                        raw_type: raw_type.clone(),
                    });
                }
            }
        }
    }

    fn extract_method(&self, node: Node, source: &str) -> Option<ParsedMethod> {
        let name_node = node.child_by_field_name("name")?;

        let raw_return_type = node
            .child_by_field_name("type")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_else(|| "void".to_string());

        let mut method = ParsedMethod {
            name: node_text(name_node, source).to_string(),
            params: self.extract_parameters(node, source),
            raw_return_type,
            calls: Vec::new(),
            locals: Vec::new(),
            span: Span::new(node.start_byte(), node.end_byte()),
            doc_start: self.leading_comment_start(node, source),
            line: node.start_position().row + 1,
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_body(body, source, &mut method);
        }

        Some(method)
    }

    fn extract_parameters(&self, node: Node, source: &str) -> Vec<ParsedParam> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            match child.kind() {
                "formal_parameter" => {
                    let Some(type_node) = child.child_by_field_name("type") else {
                        continue;
                    };
                    let Some(name_node) = child.child_by_field_name("name") else {
                        continue;
                    };
                    out.push(ParsedParam {
                        name: node_text(name_node, source).to_string(),
                        raw_type: node_text(type_node, source).to_string(),
                        varargs: false,
                    });
                }
                "spread_parameter" => {
                    // Shape: [modifiers] type "..." variable_declarator
                    let type_node = named_children(child)
                        .into_iter()
                        .find(|n| is_type_node(n.kind()));
                    let name_node = child_of_kind(child, "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"));
                    if let (Some(type_node), Some(name_node)) = (type_node, name_node) {
                        out.push(ParsedParam {
                            name: node_text(name_node, source).to_string(),
                            raw_type: node_text(type_node, source).to_string(),
                            varargs: true,
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Walk every node of a method body, collecting invocations and local
    /// variable declarations. Nested constructs (lambdas, anonymous classes)
    /// are attributed to the enclosing method.
    fn collect_body(&self, node: Node, source: &str, method: &mut ParsedMethod) {
        match node.kind() {
            "method_invocation" => {
                if let Some(call) = self.extract_call(node, source) {
                    method.calls.push(call);
                }
            }
            "local_variable_declaration" => {
                self.collect_local_decl(node, source, &mut method.locals);
            }
            "enhanced_for_statement" => {
                if let (Some(type_node), Some(name_node)) = (
                    node.child_by_field_name("type"),
                    node.child_by_field_name("name"),
                ) {
                    method.locals.push(LocalVar {
                        name: node_text(name_node, source).to_string(),
                        raw_type: node_text(type_node, source).to_string(),
                        declared_at: name_node.start_byte(),
                    });
                }
            }
            "resource" => {
                if let (Some(type_node), Some(name_node)) = (
                    node.child_by_field_name("type"),
                    node.child_by_field_name("name"),
                ) {
                    method.locals.push(LocalVar {
                        name: node_text(name_node, source).to_string(),
                        raw_type: node_text(type_node, source).to_string(),
                        declared_at: name_node.start_byte(),
                    });
                }
            }
            "catch_formal_parameter" => {
                let type_node = child_of_kind(node, "catch_type")
                    .and_then(|t| named_children(t).first().copied());
                let name_node = named_children(node)
                    .into_iter()
                    .find(|n| n.kind() == "identifier");
                if let (Some(type_node), Some(name_node)) = (type_node, name_node) {
                    method.locals.push(LocalVar {
                        name: node_text(name_node, source).to_string(),
                        raw_type: node_text(type_node, source).to_string(),
                        declared_at: name_node.start_byte(),
                    });
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_body(child, source, method);
        }
    }

    fn collect_local_decl(&self, node: Node, source: &str, locals: &mut Vec<LocalVar>) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let declared_type = node_text(type_node, source).to_string();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };

            // `var` declarations get their type from a constructor initializer
            // when they have one
            let mut raw_type = declared_type.clone();
            if raw_type == "var" {
                if let Some(value) = child.child_by_field_name("value") {
                    if value.kind() == "object_creation_expression" {
                        if let Some(created) = value.child_by_field_name("type") {
                            raw_type = node_text(created, source).to_string();
                        }
                    }
                }
            }

            locals.push(LocalVar {
                name: node_text(name_node, source).to_string(),
                raw_type,
                declared_at: child.start_byte(),
            });
        }
    }

    fn extract_call(&self, node: Node, source: &str) -> Option<CallSite> {
        let name_node = node.child_by_field_name("name")?;

        let receiver = match node.child_by_field_name("object") {
            Some(object) => self.classify_receiver(object, source),
            None => Receiver::Implicit,
        };

        let mut args = Vec::new();
        if let Some(arg_list) = node.child_by_field_name("arguments") {
            for arg in named_children(arg_list) {
                if is_comment(arg) {
                    continue;
                }
                args.push(self.classify_arg(arg, source));
            }
        }

        Some(CallSite {
            name: node_text(name_node, source).to_string(),
            receiver,
            args,
            byte: node.start_byte(),
            line: node.start_position().row + 1,
        })
    }

    fn classify_receiver(&self, node: Node, source: &str) -> Receiver {
        match node.kind() {
            "this" => Receiver::This,
            "super" => Receiver::Super,
            "identifier" => Receiver::Path(node_text(node, source).to_string()),
            "field_access" => match self.flatten_field_chain(node, source) {
                Some((true, chain)) if !chain.is_empty() => Receiver::ThisPath(chain),
                Some((false, chain)) => Receiver::Path(chain),
                _ => Receiver::Other,
            },
            "method_invocation" => match self.extract_call(node, source) {
                Some(call) => Receiver::Call(Box::new(call)),
                None => Receiver::Other,
            },
            "object_creation_expression" => match node.child_by_field_name("type") {
                Some(type_node) => Receiver::New(node_text(type_node, source).to_string()),
                None => Receiver::Other,
            },
            "cast_expression" => match node.child_by_field_name("type") {
                Some(type_node) => Receiver::Cast(node_text(type_node, source).to_string()),
                None => Receiver::Other,
            },
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => self.classify_receiver(*inner, source),
                None => Receiver::Other,
            },
            "string_literal" => Receiver::StringLit,
            _ => Receiver::Other,
        }
    }

    /// Flatten `a.b.c` shapes into a dotted string. Returns `(rooted_at_this,
    /// chain)`; anything that is not a pure identifier chain yields None.
    fn flatten_field_chain(&self, node: Node, source: &str) -> Option<(bool, String)> {
        match node.kind() {
            "identifier" => Some((false, node_text(node, source).to_string())),
            "this" => Some((true, String::new())),
            "field_access" => {
                let object = node.child_by_field_name("object")?;
                let field = node.child_by_field_name("field")?;
                let (rooted, mut chain) = self.flatten_field_chain(object, source)?;
                if !chain.is_empty() {
                    chain.push('.');
                }
                chain.push_str(node_text(field, source));
                Some((rooted, chain))
            }
            _ => None,
        }
    }

    fn classify_arg(&self, node: Node, source: &str) -> ArgExpr {
        let text = node_text(node, source).to_string();
        let hint = match node.kind() {
            "string_literal" => ArgHint::Known("java.lang.String"),
            "character_literal" => ArgHint::Known("char"),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => {
                if text.ends_with('l') || text.ends_with('L') {
                    ArgHint::Known("long")
                } else {
                    ArgHint::Known("int")
                }
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                if text.ends_with('f') || text.ends_with('F') {
                    ArgHint::Known("float")
                } else {
                    ArgHint::Known("double")
                }
            }
            "true" | "false" => ArgHint::Known("boolean"),
            "this" => ArgHint::This,
            "identifier" => ArgHint::Path(text.clone()),
            "field_access" => match self.flatten_field_chain(node, source) {
                Some((_, chain)) if !chain.is_empty() => ArgHint::Path(chain),
                _ => ArgHint::Unknown,
            },
            "object_creation_expression" => match node.child_by_field_name("type") {
                Some(type_node) => ArgHint::New(node_text(type_node, source).to_string()),
                None => ArgHint::Unknown,
            },
            "method_invocation" => match self.extract_call(node, source) {
                Some(call) => ArgHint::Call(Box::new(call)),
                None => ArgHint::Unknown,
            },
            "cast_expression" => match node.child_by_field_name("type") {
                Some(type_node) => ArgHint::Cast(node_text(type_node, source).to_string()),
                None => ArgHint::Unknown,
            },
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => self.classify_arg(*inner, source).hint,
                None => ArgHint::Unknown,
            },
            _ => ArgHint::Unknown,
        };

        ArgExpr { text, hint }
    }

    fn extract_super_types(&self, node: Node, source: &str) -> Vec<String> {
        let mut super_types = Vec::new();

        // extends clause of a class: the single type after the keyword
        if let Some(superclass) = node.child_by_field_name("superclass") {
            for child in named_children(superclass) {
                if is_type_node(child.kind()) {
                    super_types.push(node_text(child, source).to_string());
                }
            }
        }

        // implements clause of a class, extends clause of an interface
        for clause in ["super_interfaces", "extends_interfaces"] {
            let Some(clause_node) = child_of_kind(node, clause) else {
                continue;
            };
            if let Some(type_list) = child_of_kind(clause_node, "type_list") {
                for type_node in named_children(type_list) {
                    if is_type_node(type_node.kind()) {
                        super_types.push(node_text(type_node, source).to_string());
                    }
                }
            }
        }

        super_types
    }

    /// Start byte of the comment block sitting directly above a declaration,
    /// separated by whitespace only.
    fn leading_comment_start(&self, node: Node, source: &str) -> Option<usize> {
        let mut start = None;
        let mut boundary = node.start_byte();
        let mut prev = node.prev_sibling();

        while let Some(candidate) = prev {
            if !is_comment(candidate) {
                break;
            }
            let between = &source[candidate.end_byte()..boundary];
            if between.chars().any(|c| !c.is_whitespace()) {
                break;
            }
            start = Some(candidate.start_byte());
            boundary = candidate.start_byte();
            prev = candidate.prev_sibling();
        }

        start
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
    )
}
