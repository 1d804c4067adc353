mod noreturn;
mod passthrough;
mod retryable;

pub use noreturn::NoReturn;
pub use passthrough::PassThrough;
pub use retryable::Retryable;

use crate::context::EmitContext;
use crate::error::GenerateResult;
use crate::method::Method;
use reinforcer_types::TypeExpr;

/// Name of the variable holding an error the predicate refused to retry
pub(crate) const NON_RETRYABLE_ERR_VAR: &str = "nonRetryableErr";

/// Trait for emitting one proxy method declaration
pub trait MethodSynthesizer {
    /// Strategy identifier, used in logs
    fn name(&self) -> &'static str;

    /// Emit the full method declaration, receiver through closing brace
    fn emit(&self, ctx: &EmitContext) -> GenerateResult<()>;
}

/// The generated proxy struct that methods are declared on
#[derive(Debug, Clone, Copy)]
pub struct ProxyType<'a> {
    pub name: &'a str,
    pub type_args: &'a [TypeExpr],
    pub receiver: &'a str,
}

impl<'a> ProxyType<'a> {
    pub fn new(name: &'a str, type_args: &'a [TypeExpr], receiver: &'a str) -> Self {
        Self {
            name,
            type_args,
            receiver,
        }
    }

    /// `(r *Proxy[T])`
    pub fn receiver_decl(&self, ctx: &EmitContext) -> String {
        if self.type_args.is_empty() {
            format!("({} *{})", self.receiver, self.name)
        } else {
            format!(
                "({} *{}[{}])",
                self.receiver,
                self.name,
                ctx.type_list(self.type_args)
            )
        }
    }

    /// `r.delegate.Method(args)`
    pub fn delegate_call(&self, method: &Method) -> String {
        format!(
            "{}.delegate.{}({})",
            self.receiver,
            method.name,
            method.call_args()
        )
    }

    /// `func (r *Proxy) Method(params) results`
    pub fn method_header(&self, method: &Method, ctx: &EmitContext) -> String {
        format!(
            "func {} {}",
            self.receiver_decl(ctx),
            method.signature(ctx)
        )
    }
}

/// Body synthesis strategy for a method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Retryable,
    NoReturn,
    PassThrough,
}

impl Strategy {
    /// Pick the strategy for a method's shape
    pub fn classify(method: &Method, ignore_no_return_methods: bool) -> Self {
        if method.returns_error {
            Strategy::Retryable
        } else if ignore_no_return_methods {
            Strategy::PassThrough
        } else {
            Strategy::NoReturn
        }
    }

    pub fn synthesizer<'a>(
        self,
        method: &'a Method,
        proxy: ProxyType<'a>,
    ) -> GenerateResult<Box<dyn MethodSynthesizer + 'a>> {
        Ok(match self {
            Strategy::Retryable => Box::new(Retryable::new(method, proxy)?),
            Strategy::NoReturn => Box::new(NoReturn::new(method, proxy)),
            Strategy::PassThrough => Box::new(PassThrough::new(method, proxy)),
        })
    }
}

/// `r0, r1, ...` slot names for a method's results, with `error_name` at the error index
pub(crate) fn result_slots(method: &Method, error_name: &str) -> Vec<String> {
    (0..method.return_types.len())
        .map(|i| {
            if method.return_error_index == Some(i) {
                error_name.to_string()
            } else {
                format!("r{}", i)
            }
        })
        .collect()
}

/// Declare `var rN T` for every non-error result slot
pub(crate) fn declare_result_slots(method: &Method, ctx: &EmitContext) {
    for (i, ty) in method.return_types.iter().enumerate() {
        if method.return_error_index == Some(i) {
            continue;
        }
        ctx.add_line(&format!("var r{} {}", i, ctx.type_expr(ty)));
    }
}
