use crate::context::{align_columns, string_literal, DeclKind, EmitContext, GoFile};
use crate::error::GenerateResult;
use crate::method::Method;
use crate::options::GenerateOptions;
use crate::synth::{ProxyType, Strategy};
use reinforcer_types::TypeExpr;
use tracing::debug;

/// Generic type parameter of a proxied interface, e.g. `T any`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: TypeExpr,
}

impl TypeParam {
    pub fn new(name: impl Into<String>, constraint: TypeExpr) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}

/// Code generation configuration for one proxied interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    src_type_name: String,
    out_type_name: String,
    type_params: Vec<TypeParam>,
    type_args: Vec<TypeExpr>,
    methods: Vec<Method>,
}

impl FileConfig {
    pub fn new(
        src_type_name: &str,
        out_type_name: &str,
        type_params: Vec<TypeParam>,
        type_args: Vec<TypeExpr>,
        methods: Vec<Method>,
    ) -> Self {
        Self {
            src_type_name: upper_first(src_type_name),
            out_type_name: upper_first(out_type_name),
            type_params,
            type_args,
            methods,
        }
    }

    pub fn src_type_name(&self) -> &str {
        &self.src_type_name
    }

    pub fn out_type_name(&self) -> &str {
        &self.out_type_name
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn type_params(&self) -> &[TypeParam] {
        &self.type_params
    }

    pub fn type_args(&self) -> &[TypeExpr] {
        &self.type_args
    }

    /// Name of the restated interface the proxy delegates to
    pub fn target_name(&self) -> String {
        format!("target{}", self.src_type_name)
    }

    pub fn receiver_name(&self) -> String {
        self.out_type_name
            .chars()
            .next()
            .map(|c| c.to_lowercase().collect())
            .unwrap_or_default()
    }

    fn constants_name(&self) -> String {
        format!("{}Methods", self.out_type_name)
    }

    /// `[T any, K comparable]`, empty when not generic
    fn params_clause(&self, ctx: &EmitContext) -> String {
        if self.type_params.is_empty() {
            return String::new();
        }
        let params: Vec<String> = self
            .type_params
            .iter()
            .map(|p| format!("{} {}", p.name, ctx.type_expr(&p.constraint)))
            .collect();
        format!("[{}]", params.join(", "))
    }

    /// `[T, K]`, empty when not generic
    fn args_clause(&self, ctx: &EmitContext) -> String {
        if self.type_args.is_empty() {
            String::new()
        } else {
            format!("[{}]", ctx.type_list(&self.type_args))
        }
    }
}

/// Upper-case only the first character, leaving the rest untouched
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate the proxy source for one interface
pub fn generate_file(options: &GenerateOptions, file_cfg: &FileConfig) -> GenerateResult<String> {
    let mut file = GoFile::new(&options.out_pkg, &options.header);
    let out = file_cfg.out_type_name();
    let constants = file_cfg.constants_name();

    debug!(type_name = %out, methods = file_cfg.methods.len(), "Adding constants");
    file.decl(DeclKind::Var, |ctx| {
        ctx.add_line(&format!("// {} are the methods in {}", constants, out));
        if file_cfg.methods.is_empty() {
            ctx.add_line(&format!("var {} = struct{{}}{{}}", constants));
            return Ok(());
        }
        let fields: Vec<(String, String)> = file_cfg
            .methods
            .iter()
            .map(|m| (m.name.clone(), "string".to_string()))
            .collect();
        let values: Vec<(String, String)> = file_cfg
            .methods
            .iter()
            .map(|m| (format!("{}:", m.name), format!("{},", string_literal(&m.name))))
            .collect();
        ctx.block(&format!("var {} = struct", constants), "}{", |ctx| {
            for line in align_columns(&fields, " ") {
                ctx.add_line(&line);
            }
            Ok(())
        })?;
        ctx.indent();
        for line in align_columns(&values, " ") {
            ctx.add_line(&line);
        }
        ctx.dedent();
        ctx.add_line("}");
        Ok(())
    })?;

    file.decl(DeclKind::Type, |ctx| {
        let head = format!(
            "type {}{} interface",
            file_cfg.target_name(),
            file_cfg.params_clause(ctx)
        );
        if file_cfg.methods.is_empty() {
            ctx.add_line(&format!("{}{{}}", head));
            return Ok(());
        }
        ctx.block(&head, "}", |ctx| {
            for method in &file_cfg.methods {
                ctx.add_line(&method.signature(ctx));
            }
            Ok(())
        })
    })?;

    file.decl(DeclKind::Type, |ctx| {
        let head = format!("type {}{} struct", out, file_cfg.params_clause(ctx));
        ctx.block(&head, "}", |ctx| {
            ctx.add_line("*base");
            ctx.add_line(&format!(
                "delegate {}{}",
                file_cfg.target_name(),
                file_cfg.args_clause(ctx)
            ));
            Ok(())
        })
    })?;

    file.decl(DeclKind::Func, |ctx| emit_constructor(file_cfg, ctx))?;

    let receiver = file_cfg.receiver_name();
    let proxy = ProxyType::new(out, file_cfg.type_args(), &receiver);
    for method in &file_cfg.methods {
        let strategy = Strategy::classify(method, options.ignore_no_return_methods);
        let synthesizer = strategy.synthesizer(method, proxy)?;
        debug!(
            type_name = %out,
            method = %method.name,
            strategy = synthesizer.name(),
            "Synthesizing method"
        );
        file.decl(DeclKind::Func, |ctx| synthesizer.emit(ctx))?;
    }

    Ok(file.render())
}

fn emit_constructor(file_cfg: &FileConfig, ctx: &EmitContext) -> GenerateResult<()> {
    let out = file_cfg.out_type_name();
    let args = file_cfg.args_clause(ctx);
    let head = format!(
        "func New{}{}(delegate {}{}, runnerFactory runnerFactory, options ...Option) *{}{}",
        out,
        file_cfg.params_clause(ctx),
        file_cfg.target_name(),
        args,
        out,
        args
    );
    ctx.block(&head, "}", |ctx| {
        ctx.block("if delegate == nil", "}", |ctx| {
            ctx.add_line(&format!("panic({})", string_literal("provided nil delegate")));
            Ok(())
        })?;
        ctx.block("if runnerFactory == nil", "}", |ctx| {
            ctx.add_line(&format!(
                "panic({})",
                string_literal("provided nil runner factory")
            ));
            Ok(())
        })?;
        // composite literals open their brace without a space
        ctx.add_line(&format!("c := &{}{}{{", out, args));
        ctx.indent();
        ctx.add_line("base: &base{");
        ctx.indent();
        let fields = vec![
            ("errorPredicate:".to_string(), "RetryAllErrors,".to_string()),
            ("runnerFactory:".to_string(), "runnerFactory,".to_string()),
        ];
        for line in align_columns(&fields, " ") {
            ctx.add_line(&line);
        }
        ctx.dedent();
        ctx.add_line("},");
        ctx.add_line("delegate: delegate,");
        ctx.dedent();
        ctx.add_line("}");
        ctx.block("for _, o := range options", "}", |ctx| {
            ctx.add_line("o(c.base)");
            Ok(())
        })?;
        ctx.add_line("return c");
        Ok(())
    })
}

/// Generate the boilerplate shared by every proxy in the output package
pub fn generate_common(options: &GenerateOptions) -> GenerateResult<String> {
    let mut file = GoFile::new(&options.out_pkg, &options.header);

    file.decl(DeclKind::Type, |ctx| {
        ctx.block("type base struct", "}", |ctx| {
            let fields = vec![
                (
                    "errorPredicate".to_string(),
                    "func(string, error) bool".to_string(),
                ),
                ("runnerFactory".to_string(), "runnerFactory".to_string()),
            ];
            for line in align_columns(&fields, " ") {
                ctx.add_line(&line);
            }
            Ok(())
        })
    })?;

    file.decl(DeclKind::Type, |ctx| {
        ctx.block("type runnerFactory interface", "}", |ctx| {
            ctx.add_line(&format!(
                "GetRunner(name string) {}",
                ctx.qualified(&options.runner.path, &options.runner.name)
            ));
            Ok(())
        })
    })?;

    file.decl(DeclKind::Var, |ctx| {
        ctx.block("var RetryAllErrors = func(_ string, _ error) bool", "}", |ctx| {
            ctx.add_line("return true");
            Ok(())
        })
    })?;

    file.decl(DeclKind::Type, |ctx| {
        ctx.add_line("type Option func(*base)");
        Ok(())
    })?;

    file.decl(DeclKind::Func, |ctx| {
        ctx.block(
            "func WithRetryableErrorPredicate(fn func(string, error) bool) Option",
            "}",
            |ctx| {
                ctx.block("return func(o *base)", "}", |ctx| {
                    ctx.add_line("o.errorPredicate = fn");
                    Ok(())
                })
            },
        )
    })?;

    file.decl(DeclKind::Func, |ctx| {
        let context = ctx.qualified("context", "Context");
        let head = format!(
            "func (b *base) run(ctx {}, name string, fn func(ctx {}) error) error",
            context, context
        );
        ctx.block(&head, "}", |ctx| {
            ctx.add_line("return b.runnerFactory.GetRunner(name).Run(ctx, fn)");
            Ok(())
        })
    })?;

    Ok(file.render())
}
