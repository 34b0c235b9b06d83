//! Call-site resolution: type the receiver expression, then find the invoked
//! method in the receiver's hierarchy. Resolution failures are ordinary
//! outcomes here, not errors; callers log them and skip the call.

use crate::model::{Argument, MethodDescriptor};
use crate::parser::{ArgExpr, ArgHint, CallSite, ParsedMethod, ParsedType, ParsedUnit, Receiver};
use crate::solver::{is_primitive, split_type_text, ResolvedMethodSig, TypeContext, TypeLookup};
use thiserror::Error;

/// Why a call site could not be resolved.
#[derive(Debug, Error)]
pub enum Unresolved {
    #[error("type `{raw}` not found")]
    UnknownType { raw: String },

    #[error("receiver `{name}` not found in scope")]
    UnknownReceiver { name: String },

    #[error("no method `{name}` taking {argc} argument(s) on `{on}`")]
    UnknownMethod {
        on: String,
        name: String,
        argc: usize,
    },

    #[error("receiver of `{name}` is not a supported expression shape")]
    UnsupportedReceiver { name: String },
}

/// Where a call site appears: its compilation unit, the type declaring the
/// calling method and the calling method itself.
#[derive(Clone, Copy)]
pub struct CallScope<'a> {
    pub unit: &'a ParsedUnit,
    pub enclosing: &'a ParsedType,
    pub method: &'a ParsedMethod,
}

impl<'a> CallScope<'a> {
    fn context(&self) -> TypeContext<'a> {
        TypeContext::of_unit(self.unit, Some(&self.enclosing.fqcn))
    }
}

/// Resolves call sites against a type solver.
pub struct CallResolver<'a, S: TypeLookup> {
    solver: &'a S,
}

impl<'a, S: TypeLookup> CallResolver<'a, S> {
    pub fn new(solver: &'a S) -> Self {
        Self { solver }
    }

    /// Resolve one call site to a descriptor of the method it invokes.
    /// The descriptor's arguments carry the call's argument expressions with
    /// their best-known types.
    pub fn resolve_call(
        &self,
        scope: CallScope,
        call: &CallSite,
    ) -> Result<MethodDescriptor, Unresolved> {
        let sig = self.resolve_target(scope, call)?;

        let arguments = call
            .args
            .iter()
            .enumerate()
            .map(|(idx, arg)| {
                let ty = self
                    .arg_value_type(scope, call, arg)
                    .unwrap_or_else(|| declared_slot_type(&sig, idx));
                Argument::new(ty, arg.text.clone())
            })
            .collect();

        Ok(MethodDescriptor {
            signature: sig.signature(),
            name: sig.name.clone(),
            return_type: sig.return_type.clone(),
            arguments,
            declaring_class: sig.declaring_class.clone(),
        })
    }

    /// Find the signature a call binds to, walking from the receiver's type.
    fn resolve_target(
        &self,
        scope: CallScope,
        call: &CallSite,
    ) -> Result<ResolvedMethodSig, Unresolved> {
        match &call.receiver {
            Receiver::Implicit => {
                self.first_hit(self.implicit_candidates(scope, &call.name), scope, call)
            }
            Receiver::This => self.first_hit(self.enclosing_chain(scope), scope, call),
            Receiver::Super => {
                let parent = scope
                    .enclosing
                    .super_types
                    .first()
                    .and_then(|raw| self.solver.resolve_name(raw, &scope.context()))
                    .map(|resolved| resolved.fqcn)
                    .unwrap_or_else(|| "java.lang.Object".to_string());
                self.method_on_type(&parent, call)
            }
            Receiver::Path(path) => {
                let fqcn = self.receiver_class(scope, path, call.byte)?;
                self.method_on_type(&fqcn, call)
            }
            Receiver::ThisPath(path) => {
                let fqcn = self.this_field_class(scope, path)?;
                self.method_on_type(&fqcn, call)
            }
            Receiver::New(raw) => {
                let resolved = self
                    .solver
                    .resolve_name(raw, &scope.context())
                    .ok_or_else(|| Unresolved::UnknownType { raw: raw.clone() })?;
                self.method_on_type(&resolved.fqcn, call)
            }
            Receiver::Call(inner) => {
                let inner_sig = self.resolve_target(scope, inner)?;
                let fqcn = self
                    .class_of(&inner_sig.return_type, scope)
                    .ok_or_else(|| Unresolved::UnknownReceiver {
                        name: format!("{}()", inner.name),
                    })?;
                self.method_on_type(&fqcn, call)
            }
            Receiver::Cast(raw) => {
                let resolved = self
                    .solver
                    .resolve_name(raw, &scope.context())
                    .ok_or_else(|| Unresolved::UnknownType { raw: raw.clone() })?;
                self.method_on_type(&resolved.fqcn, call)
            }
            Receiver::StringLit => self.method_on_type("java.lang.String", call),
            Receiver::Other => Err(Unresolved::UnsupportedReceiver {
                name: call.name.clone(),
            }),
        }
    }

    fn method_on_type(
        &self,
        fqcn: &str,
        call: &CallSite,
    ) -> Result<ResolvedMethodSig, Unresolved> {
        self.solver
            .lookup_method(fqcn, &call.name, call.args.len())
            .ok_or_else(|| Unresolved::UnknownMethod {
                on: fqcn.to_string(),
                name: call.name.clone(),
                argc: call.args.len(),
            })
    }

    fn first_hit(
        &self,
        candidates: Vec<String>,
        scope: CallScope,
        call: &CallSite,
    ) -> Result<ResolvedMethodSig, Unresolved> {
        for candidate in &candidates {
            if let Some(sig) = self
                .solver
                .lookup_method(candidate, &call.name, call.args.len())
            {
                return Ok(sig);
            }
        }
        Err(Unresolved::UnknownMethod {
            on: scope.enclosing.fqcn.clone(),
            name: call.name.clone(),
            argc: call.args.len(),
        })
    }

    /// Receiver candidates for an unqualified call: the enclosing types from
    /// the innermost outward, then the owners of matching static imports.
    fn implicit_candidates(&self, scope: CallScope, name: &str) -> Vec<String> {
        let mut candidates = self.enclosing_chain(scope);
        for import in &scope.unit.imports {
            if !import.is_static {
                continue;
            }
            if import.wildcard {
                candidates.push(import.path.clone());
            } else if import.simple_name() == name {
                if let Some((owner, _)) = import.path.rsplit_once('.') {
                    candidates.push(owner.to_string());
                }
            }
        }
        candidates
    }

    /// The enclosing type and every outer type it is nested inside.
    fn enclosing_chain(&self, scope: CallScope) -> Vec<String> {
        let fqcn = &scope.enclosing.fqcn;
        let mut chain = vec![fqcn.clone()];
        let mut end = fqcn.len();
        while let Some(pos) = fqcn[..end].rfind('.') {
            let outer = &fqcn[..pos];
            if scope.unit.package.as_deref() == Some(outer) {
                break;
            }
            if scope.unit.find_type(outer).is_some() {
                chain.push(outer.to_string());
            }
            end = pos;
        }
        chain
    }

    /// Class of a `Path` receiver. A variable in scope shadows a type of the
    /// same name; a name that is neither resolves as a type for static calls.
    fn receiver_class(
        &self,
        scope: CallScope,
        path: &str,
        byte: usize,
    ) -> Result<String, Unresolved> {
        if let Some(rendered) = self.value_type(scope, path, byte) {
            return self
                .class_of(&rendered, scope)
                .ok_or_else(|| Unresolved::UnknownReceiver {
                    name: path.to_string(),
                });
        }
        if let Some(resolved) = self.solver.resolve_name(path, &scope.context()) {
            return Ok(resolved.fqcn);
        }
        Err(Unresolved::UnknownReceiver {
            name: path.to_string(),
        })
    }

    /// Class of a `this.`-rooted receiver chain. The root must be a field of
    /// the enclosing type or an inherited one.
    fn this_field_class(&self, scope: CallScope, path: &str) -> Result<String, Unresolved> {
        let unknown = || Unresolved::UnknownReceiver {
            name: format!("this.{}", path),
        };

        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let root = self
            .solver
            .lookup_field(&scope.enclosing.fqcn, first)
            .ok_or_else(unknown)?;
        let rendered = match rest {
            None => root,
            Some(rest) => self.walk_fields(&root, rest).ok_or_else(unknown)?,
        };
        self.class_of(&rendered, scope).ok_or_else(unknown)
    }

    /// Type of a value expression written as a dotted identifier chain, or
    /// None when the chain does not denote a value. The result is a rendered
    /// type and may be a primitive or an array.
    fn value_type(&self, scope: CallScope, path: &str, byte: usize) -> Option<String> {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };

        if let Some(root) = self.root_value_type(scope, first, byte) {
            return match rest {
                None => Some(root),
                Some(rest) => self.walk_fields(&root, rest),
            };
        }

        // No value root: the longest resolvable prefix may be a type whose
        // static fields the remaining segments traverse
        let (fqcn, remaining) = self.type_prefix(path, &scope.context())?;
        if remaining.is_empty() {
            // a bare type name is not a value
            return None;
        }
        self.walk_fields(&fqcn, &remaining)
    }

    /// Type of a single identifier when it names a value: locals declared
    /// before the use site shadow parameters, parameters shadow fields.
    fn root_value_type(&self, scope: CallScope, name: &str, byte: usize) -> Option<String> {
        let ctx = scope.context();

        let local = scope
            .method
            .locals
            .iter()
            .filter(|local| local.name == name && local.declared_at < byte)
            .last();
        if let Some(local) = local {
            return Some(self.solver.render_type(&local.raw_type, &ctx));
        }

        if let Some(param) = scope.method.params.iter().find(|p| p.name == name) {
            let mut rendered = self.solver.render_type(&param.raw_type, &ctx);
            if param.varargs {
                rendered.push_str("[]");
            }
            return Some(rendered);
        }

        self.solver.lookup_field(&scope.enclosing.fqcn, name)
    }

    /// Longest dotted prefix of `path` that resolves as a type, with the
    /// segments left over.
    fn type_prefix(&self, path: &str, ctx: &TypeContext) -> Option<(String, String)> {
        let segments: Vec<&str> = path.split('.').collect();
        for take in (1..=segments.len()).rev() {
            let prefix = segments[..take].join(".");
            if let Some(resolved) = self.solver.resolve_name(&prefix, ctx) {
                return Some((resolved.fqcn, segments[take..].join(".")));
            }
        }
        None
    }

    /// Follow a dotted chain of field accesses from a rendered type.
    fn walk_fields(&self, start: &str, rest: &str) -> Option<String> {
        let mut current = start.to_string();
        for segment in rest.split('.') {
            let (base, suffix) = split_type_text(&current);
            if !suffix.is_empty() {
                // arrays carry no fields beyond their length
                return (segment == "length").then(|| "int".to_string());
            }
            if is_primitive(&base) {
                return None;
            }
            current = self.solver.lookup_field(&base, segment)?;
        }
        Some(current)
    }

    /// Reduce a rendered type to the class a method lookup can start from.
    /// Primitives and arrays have no such class.
    fn class_of(&self, rendered: &str, scope: CallScope) -> Option<String> {
        let (base, suffix) = split_type_text(rendered);
        if !suffix.is_empty() || base.is_empty() || is_primitive(&base) {
            return None;
        }
        if self.solver.entry(&base).is_some() {
            return Some(base);
        }
        self.solver
            .resolve_name(&base, &scope.context())
            .map(|resolved| resolved.fqcn)
    }

    /// Best-known type of an argument expression, from its syntax alone.
    fn arg_value_type(&self, scope: CallScope, call: &CallSite, arg: &ArgExpr) -> Option<String> {
        match &arg.hint {
            ArgHint::Known(ty) => Some((*ty).to_string()),
            ArgHint::This => Some(scope.enclosing.fqcn.clone()),
            ArgHint::Path(path) => self.value_type(scope, path, call.byte),
            ArgHint::New(raw) | ArgHint::Cast(raw) => {
                let (base, suffix) = split_type_text(raw);
                if is_primitive(&base) {
                    return Some(format!("{}{}", base, suffix));
                }
                self.solver
                    .resolve_name(&base, &scope.context())
                    .map(|resolved| format!("{}{}", resolved.fqcn, suffix))
            }
            ArgHint::Call(inner) => self
                .resolve_target(scope, inner)
                .ok()
                .map(|sig| sig.return_type),
            ArgHint::Unknown => None,
        }
    }
}

/// Declared type of the parameter slot an argument lands in. Spread slots
/// receive one element of the trailing array.
fn declared_slot_type(sig: &ResolvedMethodSig, idx: usize) -> String {
    if idx < sig.param_types.len() && !(sig.varargs && idx == sig.param_types.len() - 1) {
        return sig.param_types[idx].clone();
    }
    match sig.param_types.last() {
        Some(last) if sig.varargs => last.strip_suffix("[]").unwrap_or(last).to_string(),
        _ => "java.lang.Object".to_string(),
    }
}
