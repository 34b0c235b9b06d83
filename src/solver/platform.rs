// Built-in table of common platform types. Coverage is intentionally partial:
// enough of java.lang, java.util and java.io for receiver typing and
// assignability checks on the code shapes that actually occur. Anything not
// listed here resolves through the archive provider or not at all.

use crate::parser::TypeKind;

#[derive(Debug)]
pub struct PlatformEntry {
    pub fqcn: &'static str,
    pub kind: TypeKind,
    pub supers: &'static [&'static str],
}

#[derive(Debug)]
pub struct PlatformMethod {
    pub declaring: &'static str,
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub varargs: bool,
    pub return_type: &'static str,
}

#[derive(Debug)]
pub struct PlatformField {
    pub declaring: &'static str,
    pub name: &'static str,
    pub field_type: &'static str,
}

/// Provider for the built-in platform table.
#[derive(Debug, Default)]
pub struct PlatformSolver;

impl PlatformSolver {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self, fqcn: &str) -> Option<&'static PlatformEntry> {
        TYPES.iter().find(|entry| entry.fqcn == fqcn)
    }

    pub fn method_on(fqcn: &str, name: &str, argc: usize) -> Option<&'static PlatformMethod> {
        METHODS.iter().find(|m| {
            m.declaring == fqcn && m.name == name && {
                if m.varargs {
                    argc + 1 >= m.params.len()
                } else {
                    argc == m.params.len()
                }
            }
        })
    }

    pub fn field_on(fqcn: &str, name: &str) -> Option<&'static str> {
        FIELDS
            .iter()
            .find(|f| f.declaring == fqcn && f.name == name)
            .map(|f| f.field_type)
    }
}

macro_rules! ty {
    ($fqcn:literal, $kind:ident) => {
        PlatformEntry {
            fqcn: $fqcn,
            kind: TypeKind::$kind,
            supers: &[],
        }
    };
    ($fqcn:literal, $kind:ident, $supers:expr) => {
        PlatformEntry {
            fqcn: $fqcn,
            kind: TypeKind::$kind,
            supers: $supers,
        }
    };
}

macro_rules! method {
    ($declaring:literal, $name:literal, $params:expr, $ret:literal) => {
        PlatformMethod {
            declaring: $declaring,
            name: $name,
            params: $params,
            varargs: false,
            return_type: $ret,
        }
    };
    ($declaring:literal, $name:literal, $params:expr, $ret:literal, varargs) => {
        PlatformMethod {
            declaring: $declaring,
            name: $name,
            params: $params,
            varargs: true,
            return_type: $ret,
        }
    };
}

static TYPES: &[PlatformEntry] = &[
    // java.lang
    ty!("java.lang.Object", Class),
    ty!("java.lang.String", Class, &["java.lang.CharSequence", "java.lang.Comparable"]),
    ty!("java.lang.CharSequence", Interface),
    ty!("java.lang.Comparable", Interface),
    ty!("java.lang.Iterable", Interface),
    ty!("java.lang.Runnable", Interface),
    ty!("java.lang.AutoCloseable", Interface),
    ty!("java.lang.Thread", Class, &["java.lang.Runnable"]),
    ty!("java.lang.StringBuilder", Class, &["java.lang.CharSequence"]),
    ty!("java.lang.Number", Class),
    ty!("java.lang.Integer", Class, &["java.lang.Number", "java.lang.Comparable"]),
    ty!("java.lang.Long", Class, &["java.lang.Number", "java.lang.Comparable"]),
    ty!("java.lang.Short", Class, &["java.lang.Number"]),
    ty!("java.lang.Byte", Class, &["java.lang.Number"]),
    ty!("java.lang.Float", Class, &["java.lang.Number"]),
    ty!("java.lang.Double", Class, &["java.lang.Number"]),
    ty!("java.lang.Boolean", Class, &["java.lang.Comparable"]),
    ty!("java.lang.Character", Class, &["java.lang.Comparable"]),
    ty!("java.lang.Math", Class),
    ty!("java.lang.System", Class),
    ty!("java.lang.Class", Class),
    ty!("java.lang.Enum", Class, &["java.lang.Comparable"]),
    ty!("java.lang.Throwable", Class),
    ty!("java.lang.Exception", Class, &["java.lang.Throwable"]),
    ty!("java.lang.Error", Class, &["java.lang.Throwable"]),
    ty!("java.lang.RuntimeException", Class, &["java.lang.Exception"]),
    ty!("java.lang.IllegalArgumentException", Class, &["java.lang.RuntimeException"]),
    ty!("java.lang.IllegalStateException", Class, &["java.lang.RuntimeException"]),
    ty!("java.lang.NullPointerException", Class, &["java.lang.RuntimeException"]),
    ty!("java.lang.UnsupportedOperationException", Class, &["java.lang.RuntimeException"]),
    ty!("java.lang.IndexOutOfBoundsException", Class, &["java.lang.RuntimeException"]),
    // java.util
    ty!("java.util.Collection", Interface, &["java.lang.Iterable"]),
    ty!("java.util.List", Interface, &["java.util.Collection"]),
    ty!("java.util.Set", Interface, &["java.util.Collection"]),
    ty!("java.util.Queue", Interface, &["java.util.Collection"]),
    ty!("java.util.Deque", Interface, &["java.util.Queue"]),
    ty!("java.util.Map", Interface),
    ty!("java.util.Iterator", Interface),
    ty!("java.util.Comparator", Interface),
    ty!("java.util.ArrayList", Class, &["java.util.List"]),
    ty!("java.util.LinkedList", Class, &["java.util.List", "java.util.Deque"]),
    ty!("java.util.HashSet", Class, &["java.util.Set"]),
    ty!("java.util.LinkedHashSet", Class, &["java.util.HashSet"]),
    ty!("java.util.TreeSet", Class, &["java.util.Set"]),
    ty!("java.util.HashMap", Class, &["java.util.Map"]),
    ty!("java.util.LinkedHashMap", Class, &["java.util.HashMap"]),
    ty!("java.util.TreeMap", Class, &["java.util.Map"]),
    ty!("java.util.Optional", Class),
    ty!("java.util.Arrays", Class),
    ty!("java.util.Collections", Class),
    ty!("java.util.Objects", Class),
    // java.io
    ty!("java.io.Closeable", Interface, &["java.lang.AutoCloseable"]),
    ty!("java.io.File", Class, &["java.lang.Comparable"]),
    ty!("java.io.InputStream", Class, &["java.io.Closeable"]),
    ty!("java.io.OutputStream", Class, &["java.io.Closeable"]),
    ty!("java.io.PrintStream", Class, &["java.io.OutputStream"]),
    ty!("java.io.Reader", Class, &["java.io.Closeable"]),
    ty!("java.io.BufferedReader", Class, &["java.io.Reader"]),
    ty!("java.io.Writer", Class, &["java.io.Closeable"]),
    ty!("java.io.IOException", Class, &["java.lang.Exception"]),
    ty!("java.io.FileNotFoundException", Class, &["java.io.IOException"]),
];

static METHODS: &[PlatformMethod] = &[
    method!("java.lang.Object", "equals", &["java.lang.Object"], "boolean"),
    method!("java.lang.Object", "hashCode", &[], "int"),
    method!("java.lang.Object", "toString", &[], "java.lang.String"),
    method!("java.lang.Object", "getClass", &[], "java.lang.Class"),
    method!("java.lang.String", "length", &[], "int"),
    method!("java.lang.String", "isEmpty", &[], "boolean"),
    method!("java.lang.String", "charAt", &["int"], "char"),
    method!("java.lang.String", "substring", &["int"], "java.lang.String"),
    method!("java.lang.String", "substring", &["int", "int"], "java.lang.String"),
    method!("java.lang.String", "indexOf", &["java.lang.String"], "int"),
    method!("java.lang.String", "contains", &["java.lang.CharSequence"], "boolean"),
    method!("java.lang.String", "startsWith", &["java.lang.String"], "boolean"),
    method!("java.lang.String", "endsWith", &["java.lang.String"], "boolean"),
    method!("java.lang.String", "equalsIgnoreCase", &["java.lang.String"], "boolean"),
    method!("java.lang.String", "compareTo", &["java.lang.String"], "int"),
    method!("java.lang.String", "toLowerCase", &[], "java.lang.String"),
    method!("java.lang.String", "toUpperCase", &[], "java.lang.String"),
    method!("java.lang.String", "trim", &[], "java.lang.String"),
    method!("java.lang.String", "split", &["java.lang.String"], "java.lang.String[]"),
    method!(
        "java.lang.String",
        "replace",
        &["java.lang.CharSequence", "java.lang.CharSequence"],
        "java.lang.String"
    ),
    method!("java.lang.String", "format", &["java.lang.String", "java.lang.Object"], "java.lang.String", varargs),
    method!("java.lang.String", "valueOf", &["java.lang.Object"], "java.lang.String"),
    method!("java.lang.StringBuilder", "append", &["java.lang.Object"], "java.lang.StringBuilder"),
    method!("java.lang.StringBuilder", "toString", &[], "java.lang.String"),
    method!("java.lang.StringBuilder", "length", &[], "int"),
    method!("java.lang.CharSequence", "length", &[], "int"),
    method!("java.lang.CharSequence", "charAt", &["int"], "char"),
    method!("java.lang.Comparable", "compareTo", &["java.lang.Object"], "int"),
    method!("java.lang.Iterable", "iterator", &[], "java.util.Iterator"),
    method!("java.lang.Runnable", "run", &[], "void"),
    method!("java.lang.AutoCloseable", "close", &[], "void"),
    method!("java.lang.Thread", "start", &[], "void"),
    method!("java.lang.Thread", "interrupt", &[], "void"),
    method!("java.lang.Thread", "join", &[], "void"),
    method!("java.lang.Thread", "sleep", &["long"], "void"),
    method!("java.lang.Number", "intValue", &[], "int"),
    method!("java.lang.Number", "longValue", &[], "long"),
    method!("java.lang.Number", "doubleValue", &[], "double"),
    method!("java.lang.Integer", "parseInt", &["java.lang.String"], "int"),
    method!("java.lang.Integer", "valueOf", &["int"], "java.lang.Integer"),
    method!("java.lang.Integer", "toString", &["int"], "java.lang.String"),
    method!("java.lang.Long", "parseLong", &["java.lang.String"], "long"),
    method!("java.lang.Long", "valueOf", &["long"], "java.lang.Long"),
    method!("java.lang.Double", "parseDouble", &["java.lang.String"], "double"),
    method!("java.lang.Double", "valueOf", &["double"], "java.lang.Double"),
    method!("java.lang.Boolean", "parseBoolean", &["java.lang.String"], "boolean"),
    method!("java.lang.Boolean", "valueOf", &["boolean"], "java.lang.Boolean"),
    method!("java.lang.Math", "abs", &["int"], "int"),
    method!("java.lang.Math", "max", &["int", "int"], "int"),
    method!("java.lang.Math", "min", &["int", "int"], "int"),
    method!("java.lang.Math", "sqrt", &["double"], "double"),
    method!("java.lang.Math", "pow", &["double", "double"], "double"),
    method!("java.lang.Math", "round", &["double"], "long"),
    method!("java.lang.Math", "floor", &["double"], "double"),
    method!("java.lang.Math", "ceil", &["double"], "double"),
    method!("java.lang.Math", "random", &[], "double"),
    method!("java.lang.System", "currentTimeMillis", &[], "long"),
    method!("java.lang.System", "nanoTime", &[], "long"),
    method!("java.lang.System", "exit", &["int"], "void"),
    method!("java.lang.System", "getProperty", &["java.lang.String"], "java.lang.String"),
    method!("java.lang.System", "lineSeparator", &[], "java.lang.String"),
    method!(
        "java.lang.System",
        "arraycopy",
        &["java.lang.Object", "int", "java.lang.Object", "int", "int"],
        "void"
    ),
    method!("java.lang.Throwable", "getMessage", &[], "java.lang.String"),
    method!("java.lang.Throwable", "getCause", &[], "java.lang.Throwable"),
    method!("java.lang.Throwable", "printStackTrace", &[], "void"),
    method!("java.util.Collection", "size", &[], "int"),
    method!("java.util.Collection", "isEmpty", &[], "boolean"),
    method!("java.util.Collection", "contains", &["java.lang.Object"], "boolean"),
    method!("java.util.Collection", "add", &["java.lang.Object"], "boolean"),
    method!("java.util.Collection", "remove", &["java.lang.Object"], "boolean"),
    method!("java.util.Collection", "addAll", &["java.util.Collection"], "boolean"),
    method!("java.util.Collection", "clear", &[], "void"),
    method!("java.util.Collection", "iterator", &[], "java.util.Iterator"),
    method!("java.util.Collection", "toArray", &[], "java.lang.Object[]"),
    method!("java.util.List", "get", &["int"], "java.lang.Object"),
    method!("java.util.List", "set", &["int", "java.lang.Object"], "java.lang.Object"),
    method!("java.util.List", "add", &["int", "java.lang.Object"], "void"),
    method!("java.util.List", "indexOf", &["java.lang.Object"], "int"),
    method!("java.util.List", "subList", &["int", "int"], "java.util.List"),
    method!("java.util.List", "of", &["java.lang.Object"], "java.util.List", varargs),
    method!("java.util.Set", "of", &["java.lang.Object"], "java.util.Set", varargs),
    method!("java.util.Queue", "offer", &["java.lang.Object"], "boolean"),
    method!("java.util.Queue", "poll", &[], "java.lang.Object"),
    method!("java.util.Queue", "peek", &[], "java.lang.Object"),
    method!("java.util.Deque", "push", &["java.lang.Object"], "void"),
    method!("java.util.Deque", "pop", &[], "java.lang.Object"),
    method!("java.util.Deque", "addFirst", &["java.lang.Object"], "void"),
    method!("java.util.Deque", "addLast", &["java.lang.Object"], "void"),
    method!("java.util.Map", "put", &["java.lang.Object", "java.lang.Object"], "java.lang.Object"),
    method!("java.util.Map", "get", &["java.lang.Object"], "java.lang.Object"),
    method!("java.util.Map", "remove", &["java.lang.Object"], "java.lang.Object"),
    method!("java.util.Map", "containsKey", &["java.lang.Object"], "boolean"),
    method!("java.util.Map", "containsValue", &["java.lang.Object"], "boolean"),
    method!(
        "java.util.Map",
        "getOrDefault",
        &["java.lang.Object", "java.lang.Object"],
        "java.lang.Object"
    ),
    method!("java.util.Map", "putAll", &["java.util.Map"], "void"),
    method!("java.util.Map", "size", &[], "int"),
    method!("java.util.Map", "isEmpty", &[], "boolean"),
    method!("java.util.Map", "clear", &[], "void"),
    method!("java.util.Map", "keySet", &[], "java.util.Set"),
    method!("java.util.Map", "values", &[], "java.util.Collection"),
    method!("java.util.Map", "entrySet", &[], "java.util.Set"),
    method!("java.util.Iterator", "hasNext", &[], "boolean"),
    method!("java.util.Iterator", "next", &[], "java.lang.Object"),
    method!("java.util.Iterator", "remove", &[], "void"),
    method!("java.util.Comparator", "compare", &["java.lang.Object", "java.lang.Object"], "int"),
    method!("java.util.Optional", "get", &[], "java.lang.Object"),
    method!("java.util.Optional", "isPresent", &[], "boolean"),
    method!("java.util.Optional", "isEmpty", &[], "boolean"),
    method!("java.util.Optional", "orElse", &["java.lang.Object"], "java.lang.Object"),
    method!("java.util.Optional", "ifPresent", &["java.lang.Object"], "void"),
    method!("java.util.Optional", "of", &["java.lang.Object"], "java.util.Optional"),
    method!("java.util.Optional", "ofNullable", &["java.lang.Object"], "java.util.Optional"),
    method!("java.util.Arrays", "asList", &["java.lang.Object"], "java.util.List", varargs),
    method!("java.util.Arrays", "sort", &["java.lang.Object[]"], "void"),
    method!("java.util.Arrays", "copyOf", &["java.lang.Object[]", "int"], "java.lang.Object[]"),
    method!("java.util.Collections", "emptyList", &[], "java.util.List"),
    method!("java.util.Collections", "singletonList", &["java.lang.Object"], "java.util.List"),
    method!("java.util.Collections", "unmodifiableList", &["java.util.List"], "java.util.List"),
    method!("java.util.Collections", "sort", &["java.util.List"], "void"),
    method!("java.util.Collections", "reverse", &["java.util.List"], "void"),
    method!("java.util.Objects", "requireNonNull", &["java.lang.Object"], "java.lang.Object"),
    method!("java.util.Objects", "equals", &["java.lang.Object", "java.lang.Object"], "boolean"),
    method!("java.util.Objects", "hash", &["java.lang.Object"], "int", varargs),
    method!("java.util.Objects", "isNull", &["java.lang.Object"], "boolean"),
    method!("java.util.Objects", "nonNull", &["java.lang.Object"], "boolean"),
    method!("java.util.Objects", "toString", &["java.lang.Object"], "java.lang.String"),
    method!("java.io.Closeable", "close", &[], "void"),
    method!("java.io.File", "exists", &[], "boolean"),
    method!("java.io.File", "getName", &[], "java.lang.String"),
    method!("java.io.File", "getPath", &[], "java.lang.String"),
    method!("java.io.File", "getAbsolutePath", &[], "java.lang.String"),
    method!("java.io.File", "isDirectory", &[], "boolean"),
    method!("java.io.File", "isFile", &[], "boolean"),
    method!("java.io.File", "mkdirs", &[], "boolean"),
    method!("java.io.File", "delete", &[], "boolean"),
    method!("java.io.File", "listFiles", &[], "java.io.File[]"),
    method!("java.io.File", "length", &[], "long"),
    method!("java.io.InputStream", "read", &[], "int"),
    method!("java.io.OutputStream", "write", &["int"], "void"),
    method!("java.io.OutputStream", "flush", &[], "void"),
    method!("java.io.Reader", "read", &[], "int"),
    method!("java.io.BufferedReader", "readLine", &[], "java.lang.String"),
    method!("java.io.Writer", "write", &["java.lang.String"], "void"),
    method!("java.io.Writer", "flush", &[], "void"),
    method!("java.io.PrintStream", "println", &[], "void"),
    method!("java.io.PrintStream", "println", &["java.lang.Object"], "void"),
    method!("java.io.PrintStream", "print", &["java.lang.Object"], "void"),
    method!(
        "java.io.PrintStream",
        "printf",
        &["java.lang.String", "java.lang.Object"],
        "java.io.PrintStream",
        varargs
    ),
    method!("java.io.PrintStream", "flush", &[], "void"),
];

static FIELDS: &[PlatformField] = &[
    PlatformField {
        declaring: "java.lang.System",
        name: "out",
        field_type: "java.io.PrintStream",
    },
    PlatformField {
        declaring: "java.lang.System",
        name: "err",
        field_type: "java.io.PrintStream",
    },
    PlatformField {
        declaring: "java.lang.System",
        name: "in",
        field_type: "java.io.InputStream",
    },
    PlatformField {
        declaring: "java.lang.Integer",
        name: "MAX_VALUE",
        field_type: "int",
    },
    PlatformField {
        declaring: "java.lang.Integer",
        name: "MIN_VALUE",
        field_type: "int",
    },
    PlatformField {
        declaring: "java.lang.Long",
        name: "MAX_VALUE",
        field_type: "long",
    },
    PlatformField {
        declaring: "java.lang.Math",
        name: "PI",
        field_type: "double",
    },
];
