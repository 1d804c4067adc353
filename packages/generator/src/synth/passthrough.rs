use super::{MethodSynthesizer, ProxyType};
use crate::context::EmitContext;
use crate::error::GenerateResult;
use crate::method::Method;

/// Calls straight through to the delegate with no runner involved
#[derive(Debug)]
pub struct PassThrough<'a> {
    method: &'a Method,
    proxy: ProxyType<'a>,
}

impl<'a> PassThrough<'a> {
    pub fn new(method: &'a Method, proxy: ProxyType<'a>) -> Self {
        Self { method, proxy }
    }
}

impl MethodSynthesizer for PassThrough<'_> {
    fn name(&self) -> &'static str {
        "pass_through"
    }

    fn emit(&self, ctx: &EmitContext) -> GenerateResult<()> {
        let method = self.method;
        ctx.block(&self.proxy.method_header(method, ctx), "}", |ctx| {
            let call = self.proxy.delegate_call(method);
            if method.return_types.is_empty() {
                ctx.add_line(&call);
            } else {
                ctx.add_line(&format!("return {}", call));
            }
            Ok(())
        })
    }
}
