use crate::context::EmitContext;
use crate::error::{GenerateError, GenerateResult};
use reinforcer_types::{lower, MethodDescriptor, Predicates, TypeDescriptor, TypeExpr};

/// Name given to every context-like parameter
pub const CTX_VAR_NAME: &str = "ctx";

/// Role of a parameter in a proxied method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    Context,
    Ordinary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeExpr,
    pub role: ParamRole,
    /// Trailing variadic parameter; `ty` is already in spread form
    pub variadic: bool,
}

/// Normalized shape of a method after context/error classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub has_context: bool,
    pub returns_error: bool,
    pub has_variadic: bool,
    pub params: Vec<Parameter>,
    pub return_types: Vec<TypeExpr>,
    /// Index of the first context-like parameter
    pub context_param: Option<usize>,
    /// Index of the error-like return value
    pub return_error_index: Option<usize>,
}

/// How a wrapper hands a context to the runner and how its closure names it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextArg {
    /// Forward the method's own context parameter
    Forward,
    /// No context was declared; supply `context.Background()`
    Background,
}

impl ContextArg {
    /// Parameter name for the closure passed to the runner
    pub fn closure_param(&self) -> &'static str {
        match self {
            ContextArg::Forward => CTX_VAR_NAME,
            ContextArg::Background => "_",
        }
    }

    /// Expression passed as the runner's context argument
    pub fn call_arg(&self, ctx: &EmitContext) -> String {
        match self {
            ContextArg::Forward => CTX_VAR_NAME.to_string(),
            ContextArg::Background => format!("{}()", ctx.qualified("context", "Background")),
        }
    }
}

impl Method {
    pub fn context_param(&self) -> ContextArg {
        if self.has_context {
            ContextArg::Forward
        } else {
            ContextArg::Background
        }
    }

    /// Reference to the constant holding this method's name
    pub fn constant_ref(&self, parent_type_name: &str) -> String {
        format!("{}Methods.{}", parent_type_name, self.name)
    }

    /// Arguments forwarded to the delegate, spreading a trailing variadic
    pub fn call_args(&self) -> String {
        self.params
            .iter()
            .map(|param| {
                if param.variadic {
                    format!("{}...", param.name)
                } else {
                    param.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `name type` pairs for the method's declaration
    pub fn param_decls(&self, ctx: &EmitContext) -> String {
        self.params
            .iter()
            .map(|param| format!("{} {}", param.name, ctx.type_expr(&param.ty)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Result clause of the declaration, including its leading space
    pub fn results_decl(&self, ctx: &EmitContext) -> String {
        match self.return_types.len() {
            0 => String::new(),
            1 => format!(" {}", ctx.type_expr(&self.return_types[0])),
            _ => format!(" ({})", ctx.type_list(&self.return_types)),
        }
    }

    /// `Name(params) results` as it appears in an interface or after a receiver
    pub fn signature(&self, ctx: &EmitContext) -> String {
        format!(
            "{}({}){}",
            self.name,
            self.param_decls(ctx),
            self.results_decl(ctx)
        )
    }
}

/// Classifies method signatures using explicit error/context predicates
#[derive(Debug, Default)]
pub struct MethodAnalyzer {
    predicates: Predicates,
}

impl MethodAnalyzer {
    pub fn new(predicates: Predicates) -> Self {
        Self { predicates }
    }

    pub fn analyze_descriptor(&self, method: &MethodDescriptor) -> GenerateResult<Method> {
        self.analyze(&method.name, &method.params, &method.results, method.variadic)
    }

    /// Build the Method model for a signature
    pub fn analyze(
        &self,
        name: &str,
        params: &[TypeDescriptor],
        results: &[TypeDescriptor],
        variadic: bool,
    ) -> GenerateResult<Method> {
        let mut method = Method {
            name: name.to_string(),
            has_context: false,
            returns_error: false,
            has_variadic: variadic,
            params: Vec::with_capacity(params.len()),
            return_types: Vec::with_capacity(results.len()),
            context_param: None,
            return_error_index: None,
        };

        let last = params.len().checked_sub(1);
        for (i, param) in params.iter().enumerate() {
            if self.predicates.is_context(param) {
                method.has_context = true;
                method.context_param.get_or_insert(i);
                method.params.push(Parameter {
                    name: CTX_VAR_NAME.to_string(),
                    ty: TypeExpr::context(),
                    role: ParamRole::Context,
                    variadic: false,
                });
                continue;
            }

            let is_variadic = variadic && Some(i) == last;
            let ty = lower(param, is_variadic).map_err(|source| GenerateError::LowerParam {
                method: name.to_string(),
                ty: param.to_string(),
                source,
            })?;
            method.params.push(Parameter {
                name: format!("arg{}", i),
                ty,
                role: ParamRole::Ordinary,
                variadic: is_variadic,
            });
        }

        for (i, result) in results.iter().enumerate() {
            let ty = lower(result, false).map_err(|source| GenerateError::LowerResult {
                method: name.to_string(),
                ty: result.to_string(),
                source,
            })?;
            if self.predicates.is_error(result) {
                if method.return_error_index.is_some() {
                    return Err(GenerateError::MultipleErrors {
                        method: name.to_string(),
                    });
                }
                method.returns_error = true;
                method.return_error_index = Some(i);
            }
            method.return_types.push(ty);
        }

        Ok(method)
    }
}
