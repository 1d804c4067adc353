use crate::error::GenerateResult;
use reinforcer_types::{Imports, TypeExpr};
use std::cell::RefCell;
use std::rc::Rc;

/// Emission context for managing state while writing Go source
pub struct EmitContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
    imports: Rc<RefCell<Imports>>,
}

impl EmitContext {
    pub fn new() -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
            imports: Rc::new(RefCell::new(Imports::new())),
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "\t".repeat(*self.indent_level.borrow());
        self.buffer.borrow_mut().push_str(&indent);
        self.buffer.borrow_mut().push_str(text);
    }

    /// Write `head {`, run `body` one level deeper, then close with `tail`
    pub fn block<F>(&self, head: &str, tail: &str, body: F) -> GenerateResult<()>
    where
        F: FnOnce(&EmitContext) -> GenerateResult<()>,
    {
        self.add_line(&format!("{} {{", head));
        self.indent();
        let result = body(self);
        self.dedent();
        result?;
        self.add_line(tail);
        Ok(())
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    /// Render a type, registering its package references with this file's imports
    pub fn type_expr(&self, expr: &TypeExpr) -> String {
        expr.render(&mut self.imports.borrow_mut())
    }

    /// Comma-separated rendering of several types
    pub fn type_list(&self, exprs: &[TypeExpr]) -> String {
        exprs
            .iter()
            .map(|expr| self.type_expr(expr))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `alias.name` for a package member
    pub fn qualified(&self, path: &str, name: &str) -> String {
        format!("{}.{}", self.imports.borrow_mut().add(path), name)
    }

    pub fn imports(&self) -> Imports {
        self.imports.borrow().clone()
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    pub fn with_new_buffer(&self) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: self.indent_level.clone(),
            imports: self.imports.clone(),
        }
    }

    pub fn merge_buffer(&self, other: &EmitContext) {
        self.buffer.borrow_mut().push_str(&other.buffer.borrow());
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level declaration keyword; a blank line separates declarations whose keyword differs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Type,
    Var,
    Func,
}

/// A generated Go source file assembled declaration by declaration
pub struct GoFile {
    package: String,
    header: String,
    ctx: EmitContext,
    last_kind: Option<DeclKind>,
}

impl GoFile {
    pub fn new(package: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            header: header.into(),
            ctx: EmitContext::new(),
            last_kind: None,
        }
    }

    /// Emit one top-level declaration into the file body
    pub fn decl<F>(&mut self, kind: DeclKind, emit: F) -> GenerateResult<()>
    where
        F: FnOnce(&EmitContext) -> GenerateResult<()>,
    {
        if matches!(self.last_kind, Some(last) if last != kind) {
            self.ctx.add("\n");
        }
        let decl = self.ctx.with_new_buffer();
        emit(&decl)?;
        self.ctx.merge_buffer(&decl);
        self.last_kind = Some(kind);
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.header.lines() {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("package {}\n\n", self.package));
        let imports = self.ctx.imports().render_block();
        if !imports.is_empty() {
            out.push_str(&imports);
            out.push('\n');
        }
        out.push_str(&self.ctx.get_output());
        out
    }
}

/// Pad the first column so the second lines up, the way gofmt aligns fields
pub fn align_columns(rows: &[(String, String)], separator: &str) -> Vec<String> {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(left, right)| {
            format!(
                "{}{}{}{}",
                left,
                separator,
                " ".repeat(width - left.len()),
                right
            )
        })
        .collect()
}

/// Quote `text` as a Go interpreted string literal
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
