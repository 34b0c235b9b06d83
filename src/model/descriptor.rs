use serde::{Deserialize, Serialize};

/// Canonical description of a method, shared by graph edges, coverage targets
/// and the missing-test report.
///
/// Serialized field names are part of the on-disk document format and must not
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Rendered signature: name followed by the parenthesized parameter types,
    /// e.g. `update(java.lang.String, int)`
    #[serde(rename = "method_signature")]
    pub signature: String,
    /// Simple method name
    #[serde(rename = "method_name")]
    pub name: String,
    /// Rendered return type, `void` for void methods
    pub return_type: String,
    /// One entry per parameter (declarations) or per argument expression
    /// (call sites)
    pub arguments: Vec<Argument>,
    /// Fully qualified name of the declaring class
    pub declaring_class: String,
}

impl MethodDescriptor {
    /// Identity key used when deduplicating coverage targets. Overloads of the
    /// same name stay distinct because the signature carries parameter types.
    pub fn target_key(&self) -> String {
        format!("{}.{}", self.declaring_class, self.signature)
    }

    /// `declaring_class.signature`, the human-readable form used in reports.
    pub fn qualified_signature(&self) -> String {
        self.target_key()
    }
}

impl std::fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.declaring_class, self.signature)
    }
}

/// A typed argument slot on a [`MethodDescriptor`].
///
/// For method declarations `value` holds the parameter name; for call sites it
/// holds the argument expression text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
}

impl Argument {
    pub fn new(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            value: value.into(),
        }
    }
}

/// Render a signature from a method name and already-rendered parameter types.
pub fn render_signature(name: &str, parameter_types: &[String]) -> String {
    format!("{}({})", name, parameter_types.join(", "))
}
