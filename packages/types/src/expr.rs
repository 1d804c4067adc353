use crate::descriptor::ChanDir;
use std::collections::BTreeMap;
use std::fmt;

/// Emittable type syntax produced by lowering a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// Bare identifier (`string`, `any`, `T`, local type names)
    Ident(String),

    /// Identifier with generic arguments and no package (`targetService[T]`)
    Generic { name: String, args: Vec<TypeExpr> },

    /// Package-qualified reference, optionally instantiated
    Qualified {
        path: String,
        name: String,
        args: Vec<TypeExpr>,
    },

    Pointer(Box<TypeExpr>),

    Slice(Box<TypeExpr>),

    /// Spread form of a trailing variadic parameter (`...T`)
    Variadic(Box<TypeExpr>),

    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },

    Chan { dir: ChanDir, elem: Box<TypeExpr> },

    Func {
        params: Vec<TypeExpr>,
        results: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn qualified(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            path: path.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Canonical `context.Context`
    pub fn context() -> Self {
        TypeExpr::qualified("context", "Context")
    }

    pub fn error() -> Self {
        TypeExpr::ident("error")
    }

    /// Render this expression, registering every package it references in `imports`
    pub fn render(&self, imports: &mut Imports) -> String {
        let mut out = String::new();
        self.write_to(&mut out, imports);
        out
    }

    fn write_to(&self, out: &mut String, imports: &mut Imports) {
        match self {
            TypeExpr::Ident(name) => out.push_str(name),
            TypeExpr::Generic { name, args } => {
                out.push_str(name);
                write_type_args(out, args, imports);
            }
            TypeExpr::Qualified { path, name, args } => {
                let alias = imports.add(path);
                out.push_str(&alias);
                out.push('.');
                out.push_str(name);
                write_type_args(out, args, imports);
            }
            TypeExpr::Pointer(elem) => {
                out.push('*');
                elem.write_to(out, imports);
            }
            TypeExpr::Slice(elem) => {
                out.push_str("[]");
                elem.write_to(out, imports);
            }
            TypeExpr::Variadic(elem) => {
                out.push_str("...");
                elem.write_to(out, imports);
            }
            TypeExpr::Map { key, value } => {
                out.push_str("map[");
                key.write_to(out, imports);
                out.push(']');
                value.write_to(out, imports);
            }
            TypeExpr::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::SendRecv => "chan ",
                    ChanDir::RecvOnly => "<-chan ",
                    ChanDir::SendOnly => "chan<- ",
                });
                elem.write_to(out, imports);
            }
            TypeExpr::Func { params, results } => {
                out.push_str("func(");
                write_list(out, params, imports);
                out.push(')');
                match results.len() {
                    0 => {}
                    1 => {
                        out.push(' ');
                        results[0].write_to(out, imports);
                    }
                    _ => {
                        out.push_str(" (");
                        write_list(out, results, imports);
                        out.push(')');
                    }
                }
            }
        }
    }
}

fn write_list(out: &mut String, exprs: &[TypeExpr], imports: &mut Imports) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expr.write_to(out, imports);
    }
}

fn write_type_args(out: &mut String, args: &[TypeExpr], imports: &mut Imports) {
    if args.is_empty() {
        return;
    }
    out.push('[');
    write_list(out, args, imports);
    out.push(']');
}

/// Renders with the default import alias for every package
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut imports = Imports::default();
        f.write_str(&self.render(&mut imports))
    }
}

/// Import table for one generated file: package path to alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports {
    aliases: BTreeMap<String, String>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path`, returning the alias used to qualify references into it
    pub fn add(&mut self, path: &str) -> String {
        if let Some(alias) = self.aliases.get(path) {
            return alias.clone();
        }
        let guessed = guess_alias(path);
        let mut alias = guessed.clone();
        let mut suffix = 1;
        while is_reserved(&alias) || self.aliases.values().any(|taken| *taken == alias) {
            alias = format!("{}{}", guessed, suffix);
            suffix += 1;
        }
        self.aliases.insert(path.to_string(), alias.clone());
        alias
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Registered imports as `(path, alias)`, sorted by path
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(path, alias)| (path.as_str(), alias.as_str()))
    }

    /// Render the import block, or an empty string when nothing is imported
    pub fn render_block(&self) -> String {
        let specs: Vec<String> = self
            .iter()
            .map(|(path, alias)| import_spec(path, alias))
            .collect();
        match specs.len() {
            0 => String::new(),
            1 => format!("import {}\n", specs[0]),
            _ => {
                let mut block = String::from("import (\n");
                for spec in specs {
                    block.push('\t');
                    block.push_str(&spec);
                    block.push('\n');
                }
                block.push_str(")\n");
                block
            }
        }
    }
}

/// Go keywords and predeclared identifiers, never usable as an import alias
const RESERVED_IDENTS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "any", "bool", "byte", "comparable",
    "complex64", "complex128", "error", "float32", "float64", "int", "int8", "int16", "int32",
    "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64", "uintptr", "true",
    "false", "iota", "nil", "append", "cap", "clear", "close", "complex", "copy", "delete",
    "imag", "len", "make", "max", "min", "new", "panic", "print", "println", "real", "recover",
];

fn is_reserved(alias: &str) -> bool {
    RESERVED_IDENTS.contains(&alias)
}

fn import_spec(path: &str, alias: &str) -> String {
    let is_std = !path.contains('.');
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    if is_std && alias == last_segment {
        format!("\"{}\"", path)
    } else {
        format!("{} \"{}\"", alias, path)
    }
}

/// Guess a package alias from its import path
pub fn guess_alias(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let mut segments: Vec<&str> = trimmed.split('/').collect();
    if segments.len() > 1 {
        if let Some(last) = segments.last() {
            if is_major_version(last) {
                segments.pop();
            }
        }
    }
    let last = segments.last().copied().unwrap_or_default();
    let alias: String = last
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .skip_while(|c| c.is_ascii_digit())
        .collect();
    if alias.is_empty() {
        "pkg".to_string()
    } else {
        alias
    }
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}
