use super::{declare_result_slots, result_slots, MethodSynthesizer, ProxyType, NON_RETRYABLE_ERR_VAR};
use crate::context::EmitContext;
use crate::error::{GenerateError, GenerateResult};
use crate::method::Method;

const ERR_VAR: &str = "err";

/// Wraps an error-returning method in the runner, letting the injected
/// predicate decide which errors the runner gets to see and retry.
///
/// Errors the predicate rejects are parked in `nonRetryableErr` and the
/// closure reports success, so the runner stops immediately; the wrapper
/// then returns the parked error verbatim.
#[derive(Debug)]
pub struct Retryable<'a> {
    method: &'a Method,
    proxy: ProxyType<'a>,
}

impl<'a> Retryable<'a> {
    /// The method must return an error
    pub fn new(method: &'a Method, proxy: ProxyType<'a>) -> GenerateResult<Self> {
        if !method.returns_error || method.return_error_index.is_none() {
            return Err(GenerateError::NotRetryable {
                method: method.name.clone(),
            });
        }
        Ok(Self { method, proxy })
    }

    fn error_index(&self) -> GenerateResult<usize> {
        self.method
            .return_error_index
            .ok_or_else(|| GenerateError::NotRetryable {
                method: self.method.name.clone(),
            })
    }
}

impl MethodSynthesizer for Retryable<'_> {
    fn name(&self) -> &'static str {
        "retryable"
    }

    fn emit(&self, ctx: &EmitContext) -> GenerateResult<()> {
        let method = self.method;
        let receiver = self.proxy.receiver;
        let constant = method.constant_ref(self.proxy.name);
        let context_arg = method.context_param();

        let return_vars = result_slots(method, ERR_VAR);
        let mut non_retry_returns = return_vars.clone();
        non_retry_returns[self.error_index()?] = NON_RETRYABLE_ERR_VAR.to_string();

        ctx.block(&self.proxy.method_header(method, ctx), "}", |ctx| {
            ctx.add_line(&format!("var {} error", NON_RETRYABLE_ERR_VAR));
            declare_result_slots(method, ctx);

            let run = format!(
                "{} := {}.run({}, {}, func({} {}) error",
                ERR_VAR,
                receiver,
                context_arg.call_arg(ctx),
                constant,
                context_arg.closure_param(),
                ctx.qualified("context", "Context"),
            );
            ctx.block(&run, "})", |ctx| {
                ctx.add_line(&format!("var {} error", ERR_VAR));
                ctx.add_line(&format!(
                    "{} = {}",
                    return_vars.join(", "),
                    self.proxy.delegate_call(method)
                ));
                ctx.block(
                    &format!("if {}.errorPredicate({}, {})", receiver, constant, ERR_VAR),
                    "}",
                    |ctx| {
                        ctx.add_line(&format!("return {}", ERR_VAR));
                        Ok(())
                    },
                )?;
                ctx.add_line(&format!("{} = {}", NON_RETRYABLE_ERR_VAR, ERR_VAR));
                ctx.add_line("return nil");
                Ok(())
            })?;

            ctx.block(&format!("if {} != nil", NON_RETRYABLE_ERR_VAR), "}", |ctx| {
                ctx.add_line(&format!("return {}", non_retry_returns.join(", ")));
                Ok(())
            })?;
            ctx.add_line(&format!("return {}", return_vars.join(", ")));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::MethodAnalyzer;
    use reinforcer_types::{TypeDescriptor, TypeExpr};

    fn emit(method: &Method, type_args: &[TypeExpr]) -> String {
        let ctx = EmitContext::new();
        let proxy = ProxyType::new("Resilient", type_args, "r");
        Retryable::new(method, proxy).unwrap().emit(&ctx).unwrap();
        ctx.get_output()
    }

    #[test]
    fn test_error_only() {
        let method = MethodAnalyzer::default()
            .analyze("MyFunction", &[], &[TypeDescriptor::error()], false)
            .unwrap();
        assert_eq!(
            emit(&method, &[]),
            r#"func (r *Resilient) MyFunction() error {
	var nonRetryableErr error
	err := r.run(context.Background(), ResilientMethods.MyFunction, func(_ context.Context) error {
		var err error
		err = r.delegate.MyFunction()
		if r.errorPredicate(ResilientMethods.MyFunction, err) {
			return err
		}
		nonRetryableErr = err
		return nil
	})
	if nonRetryableErr != nil {
		return nonRetryableErr
	}
	return err
}
"#
        );
    }

    #[test]
    fn test_forwards_context_and_results() {
        let method = MethodAnalyzer::default()
            .analyze(
                "MyFunction",
                &[TypeDescriptor::context(), TypeDescriptor::basic("string")],
                &[TypeDescriptor::basic("string"), TypeDescriptor::error()],
                false,
            )
            .unwrap();
        assert_eq!(
            emit(&method, &[]),
            r#"func (r *Resilient) MyFunction(ctx context.Context, arg1 string) (string, error) {
	var nonRetryableErr error
	var r0 string
	err := r.run(ctx, ResilientMethods.MyFunction, func(ctx context.Context) error {
		var err error
		r0, err = r.delegate.MyFunction(ctx, arg1)
		if r.errorPredicate(ResilientMethods.MyFunction, err) {
			return err
		}
		nonRetryableErr = err
		return nil
	})
	if nonRetryableErr != nil {
		return r0, nonRetryableErr
	}
	return r0, err
}
"#
        );
    }

    #[test]
    fn test_error_in_leading_position() {
        let method = MethodAnalyzer::default()
            .analyze(
                "Flip",
                &[],
                &[TypeDescriptor::error(), TypeDescriptor::basic("int")],
                false,
            )
            .unwrap();
        let out = emit(&method, &[TypeExpr::ident("T")]);
        assert!(out.starts_with("func (r *Resilient[T]) Flip() (error, int) {\n"));
        assert!(out.contains("\tvar r1 int\n"));
        assert!(out.contains("\t\terr, r1 = r.delegate.Flip()\n"));
        assert!(out.contains("\t\treturn nonRetryableErr, r1\n"));
        assert!(out.ends_with("\treturn err, r1\n}\n"));
    }

    #[test]
    fn test_rejects_method_without_error() {
        let method = MethodAnalyzer::default()
            .analyze("Void", &[], &[TypeDescriptor::basic("int")], false)
            .unwrap();
        let proxy = ProxyType::new("Resilient", &[], "r");
        let err = Retryable::new(&method, proxy).unwrap_err();
        assert!(matches!(err, GenerateError::NotRetryable { ref method } if method == "Void"));
    }
}
