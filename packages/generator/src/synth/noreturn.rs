use super::{declare_result_slots, result_slots, MethodSynthesizer, ProxyType};
use crate::context::EmitContext;
use crate::error::GenerateResult;
use crate::method::Method;

/// Routes a method without an error return through the runner.
///
/// There is no channel to report a runner failure through, so the wrapper
/// panics with it.
#[derive(Debug)]
pub struct NoReturn<'a> {
    method: &'a Method,
    proxy: ProxyType<'a>,
}

impl<'a> NoReturn<'a> {
    pub fn new(method: &'a Method, proxy: ProxyType<'a>) -> Self {
        Self { method, proxy }
    }
}

impl MethodSynthesizer for NoReturn<'_> {
    fn name(&self) -> &'static str {
        "no_return"
    }

    fn emit(&self, ctx: &EmitContext) -> GenerateResult<()> {
        let method = self.method;
        let context_arg = method.context_param();
        let slots = result_slots(method, "_");

        ctx.block(&self.proxy.method_header(method, ctx), "}", |ctx| {
            declare_result_slots(method, ctx);

            let run = format!(
                "err := {}.run({}, {}, func({} {}) error",
                self.proxy.receiver,
                context_arg.call_arg(ctx),
                method.constant_ref(self.proxy.name),
                context_arg.closure_param(),
                ctx.qualified("context", "Context"),
            );
            ctx.block(&run, "})", |ctx| {
                let call = self.proxy.delegate_call(method);
                if slots.is_empty() {
                    ctx.add_line(&call);
                } else {
                    ctx.add_line(&format!("{} = {}", slots.join(", "), call));
                }
                ctx.add_line("return nil");
                Ok(())
            })?;

            ctx.block("if err != nil", "}", |ctx| {
                ctx.add_line("panic(err)");
                Ok(())
            })?;

            if !slots.is_empty() {
                ctx.add_line(&format!("return {}", slots.join(", ")));
            }
            Ok(())
        })
    }
}
