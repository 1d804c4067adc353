use crate::descriptor::{MethodDescriptor, TypeDescriptor};

/// Recognizes a family of types (error-like, context-like) among descriptors
pub trait TypePredicate {
    /// Unique identifier for this predicate
    fn name(&self) -> &'static str;

    fn matches(&self, ty: &TypeDescriptor) -> bool;
}

/// Matches the predeclared `error` type and anything implementing `Error() string`
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTypePredicate;

impl TypePredicate for ErrorTypePredicate {
    fn name(&self) -> &'static str {
        "error"
    }

    fn matches(&self, ty: &TypeDescriptor) -> bool {
        if let TypeDescriptor::Named(named) = ty {
            if named.package.is_none() && named.name == "error" {
                return true;
            }
        }
        ty.method_set().iter().any(is_error_method)
    }
}

fn is_error_method(method: &MethodDescriptor) -> bool {
    method.name == "Error"
        && method.params.is_empty()
        && matches!(
            method.results.as_slice(),
            [TypeDescriptor::Basic { name }] if name == "string"
        )
}

/// Matches `context.Context` and anything carrying its method set
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextTypePredicate;

/// Name, parameter count and result count of each `context.Context` method
const CONTEXT_METHODS: [(&str, usize, usize); 4] =
    [("Deadline", 0, 2), ("Done", 0, 1), ("Err", 0, 1), ("Value", 1, 1)];

impl TypePredicate for ContextTypePredicate {
    fn name(&self) -> &'static str {
        "context"
    }

    fn matches(&self, ty: &TypeDescriptor) -> bool {
        if ty.to_string() == "context.Context" {
            return true;
        }
        let methods = ty.method_set();
        CONTEXT_METHODS.iter().all(|&(wanted, params, results)| {
            methods.iter().any(|m| {
                m.name == wanted
                    && !m.variadic
                    && m.params.len() == params
                    && m.results.len() == results
                    && has_context_results(m)
            })
        })
    }
}

fn has_context_results(method: &MethodDescriptor) -> bool {
    match (method.name.as_str(), method.results.as_slice()) {
        ("Deadline", [_, TypeDescriptor::Basic { name }]) => name == "bool",
        ("Done", [TypeDescriptor::Chan { .. }]) => true,
        ("Done", _) => false,
        ("Err", [err]) => ErrorTypePredicate.matches(err),
        ("Err", _) => false,
        _ => true,
    }
}

/// The well-known type recognizers handed to signature analysis
pub struct Predicates {
    pub error: Box<dyn TypePredicate + Send + Sync>,
    pub context: Box<dyn TypePredicate + Send + Sync>,
}

impl Predicates {
    pub fn new(
        error: Box<dyn TypePredicate + Send + Sync>,
        context: Box<dyn TypePredicate + Send + Sync>,
    ) -> Self {
        Self { error, context }
    }

    pub fn is_error(&self, ty: &TypeDescriptor) -> bool {
        self.error.matches(ty)
    }

    pub fn is_context(&self, ty: &TypeDescriptor) -> bool {
        self.context.matches(ty)
    }
}

impl Default for Predicates {
    fn default() -> Self {
        Self::new(Box::new(ErrorTypePredicate), Box::new(ContextTypePredicate))
    }
}

impl std::fmt::Debug for Predicates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicates")
            .field("error", &self.error.name())
            .field("context", &self.context.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NamedDescriptor;

    fn custom_error() -> TypeDescriptor {
        TypeDescriptor::Named(NamedDescriptor {
            name: "NotFound".to_string(),
            package: Some("example.com/app/errs".to_string()),
            is_interface: false,
            type_args: Vec::new(),
            methods: TypeDescriptor::error().method_set().to_vec(),
        })
    }

    #[test]
    fn test_error_predicate() {
        let predicate = ErrorTypePredicate;
        assert!(predicate.matches(&TypeDescriptor::error()));
        assert!(predicate.matches(&TypeDescriptor::local("error")));
        assert!(predicate.matches(&custom_error()));
        assert!(predicate.matches(&TypeDescriptor::pointer(custom_error())));
        assert!(!predicate.matches(&TypeDescriptor::basic("string")));
        assert!(!predicate.matches(&TypeDescriptor::named("example.com/app", "error")));
    }

    #[test]
    fn test_error_predicate_checks_signature() {
        let mut named = match custom_error() {
            TypeDescriptor::Named(named) => named,
            _ => unreachable!(),
        };
        named.methods[0].results = vec![TypeDescriptor::basic("int")];
        assert!(!ErrorTypePredicate.matches(&TypeDescriptor::Named(named)));
    }

    #[test]
    fn test_context_predicate() {
        let predicate = ContextTypePredicate;
        assert!(predicate.matches(&TypeDescriptor::context()));
        assert!(predicate.matches(&TypeDescriptor::named("context", "Context")));

        let structural = TypeDescriptor::Interface {
            methods: TypeDescriptor::context().method_set().to_vec(),
        };
        assert!(predicate.matches(&structural));

        assert!(!predicate.matches(&TypeDescriptor::error()));
        assert!(!predicate.matches(&TypeDescriptor::any()));
    }

    #[test]
    fn test_context_predicate_checks_signatures() {
        let context_methods = TypeDescriptor::context().method_set().to_vec();
        let with = |edit: &dyn Fn(&mut Vec<MethodDescriptor>)| {
            let mut methods = context_methods.clone();
            edit(&mut methods);
            TypeDescriptor::Interface { methods }
        };
        let predicate = ContextTypePredicate;

        // Err() string is not Err() error
        let err_string = with(&|methods| methods[2].results = vec![TypeDescriptor::basic("string")]);
        assert!(!predicate.matches(&err_string));

        let done_with_arg = with(&|methods| methods[1].params = vec![TypeDescriptor::basic("int")]);
        assert!(!predicate.matches(&done_with_arg));

        let value_without_key = with(&|methods| methods[3].params.clear());
        assert!(!predicate.matches(&value_without_key));

        let deadline_single = with(&|methods| methods[0].results.truncate(1));
        assert!(!predicate.matches(&deadline_single));

        let done_not_chan = with(&|methods| methods[1].results = vec![TypeDescriptor::basic("bool")]);
        assert!(!predicate.matches(&done_not_chan));

        // Extra methods do not matter
        let extended = with(&|methods| {
            methods.push(MethodDescriptor {
                name: "UserID".to_string(),
                params: Vec::new(),
                results: vec![TypeDescriptor::basic("string")],
                variadic: false,
            })
        });
        assert!(predicate.matches(&extended));
    }

    #[test]
    fn test_default_predicates() {
        let predicates = Predicates::default();
        assert!(predicates.is_error(&TypeDescriptor::error()));
        assert!(predicates.is_context(&TypeDescriptor::context()));
        assert_eq!(
            format!("{:?}", predicates),
            "Predicates { error: \"error\", context: \"context\" }"
        );
    }
}
