use crate::descriptor::{FuncDescriptor, NamedDescriptor, TypeDescriptor};
use crate::error::{LowerError, LowerResult};
use crate::expr::TypeExpr;

/// Lower a descriptor into emittable type syntax.
///
/// When `variadic` is set the descriptor occupies the trailing variadic slot
/// of a signature and must be a slice; it lowers to the spread form `...T`.
/// Any failure in a nested component aborts the whole lowering.
pub fn lower(ty: &TypeDescriptor, variadic: bool) -> LowerResult<TypeExpr> {
    if variadic {
        return lower_variadic(ty);
    }

    match ty {
        TypeDescriptor::Basic { name } => Ok(TypeExpr::Ident(name.clone())),

        TypeDescriptor::Pointer { elem } => Ok(TypeExpr::Pointer(Box::new(lower(elem, false)?))),

        TypeDescriptor::Slice { elem } => Ok(TypeExpr::Slice(Box::new(lower(elem, false)?))),

        TypeDescriptor::Map { key, value } => Ok(TypeExpr::Map {
            key: Box::new(lower(key, false)?),
            value: Box::new(lower(value, false)?),
        }),

        TypeDescriptor::Chan { dir, elem } => Ok(TypeExpr::Chan {
            dir: *dir,
            elem: Box::new(lower(elem, false)?),
        }),

        TypeDescriptor::Signature(sig) => lower_signature(sig),

        TypeDescriptor::Named(named) => lower_named(named),

        TypeDescriptor::Interface { .. } => Ok(TypeExpr::ident("any")),

        TypeDescriptor::TypeParam { name } => Ok(TypeExpr::Ident(name.clone())),

        TypeDescriptor::Array { .. } | TypeDescriptor::Struct { .. } => {
            Err(LowerError::TypeNotHandled {
                kind: ty.kind_name().to_string(),
            })
        }
    }
}

fn lower_variadic(ty: &TypeDescriptor) -> LowerResult<TypeExpr> {
    match ty {
        TypeDescriptor::Slice { elem } => {
            let elem = lower(elem, false).map_err(|e| LowerError::nested(elem, e))?;
            Ok(TypeExpr::Variadic(Box::new(elem)))
        }
        other => Err(LowerError::VariadicNotSlice {
            found: other.kind_name().to_string(),
        }),
    }
}

fn lower_signature(sig: &FuncDescriptor) -> LowerResult<TypeExpr> {
    let last = sig.params.len().checked_sub(1);
    let params = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            lower(param, sig.variadic && Some(i) == last).map_err(|e| LowerError::nested(param, e))
        })
        .collect::<LowerResult<Vec<_>>>()?;

    let results = sig
        .results
        .iter()
        .map(|result| lower(result, false).map_err(|e| LowerError::nested(result, e)))
        .collect::<LowerResult<Vec<_>>>()?;

    Ok(TypeExpr::Func { params, results })
}

fn lower_named(named: &NamedDescriptor) -> LowerResult<TypeExpr> {
    // Interfaces are referenced by name only
    if named.is_interface {
        return Ok(match &named.package {
            Some(path) => TypeExpr::qualified(path.clone(), named.name.clone()),
            None => TypeExpr::Ident(named.name.clone()),
        });
    }

    let args = named
        .type_args
        .iter()
        .map(|arg| lower(arg, false).map_err(|e| LowerError::nested(arg, e)))
        .collect::<LowerResult<Vec<_>>>()?;

    Ok(match &named.package {
        Some(path) => TypeExpr::Qualified {
            path: path.clone(),
            name: named.name.clone(),
            args,
        },
        None if args.is_empty() => TypeExpr::Ident(named.name.clone()),
        None => TypeExpr::Generic {
            name: named.name.clone(),
            args,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ChanDir;

    fn render(ty: &TypeDescriptor) -> String {
        lower(ty, false).unwrap().to_string()
    }

    #[test]
    fn test_lower_basic_and_composites() {
        let user = TypeDescriptor::local("User");
        assert_eq!(render(&TypeDescriptor::basic("int32")), "int32");
        assert_eq!(
            render(&TypeDescriptor::slice(TypeDescriptor::pointer(user.clone()))),
            "[]*User"
        );
        assert_eq!(
            render(&TypeDescriptor::map(TypeDescriptor::basic("string"), user)),
            "map[string]User"
        );
    }

    #[test]
    fn test_lower_channels() {
        let err = TypeDescriptor::error();
        assert_eq!(
            render(&TypeDescriptor::chan(ChanDir::SendRecv, err.clone())),
            "chan error"
        );
        assert_eq!(
            render(&TypeDescriptor::chan(ChanDir::RecvOnly, err.clone())),
            "<-chan error"
        );
        assert_eq!(
            render(&TypeDescriptor::chan(ChanDir::SendOnly, err)),
            "chan<- error"
        );
    }

    #[test]
    fn test_lower_function_result_arity() {
        let string = TypeDescriptor::basic("string");
        let boolean = TypeDescriptor::basic("bool");
        assert_eq!(
            render(&TypeDescriptor::func(vec![string.clone()], vec![])),
            "func(string)"
        );
        assert_eq!(
            render(&TypeDescriptor::func(vec![string.clone()], vec![boolean.clone()])),
            "func(string) bool"
        );
        assert_eq!(
            render(&TypeDescriptor::func(
                vec![],
                vec![boolean, TypeDescriptor::error()]
            )),
            "func() (bool, error)"
        );
    }

    #[test]
    fn test_lower_variadic_function_type() {
        let sig = TypeDescriptor::Signature(FuncDescriptor {
            params: vec![
                TypeDescriptor::slice(TypeDescriptor::basic("int")),
                TypeDescriptor::slice(TypeDescriptor::basic("string")),
            ],
            results: vec![],
            variadic: true,
        });
        assert_eq!(render(&sig), "func([]int, ...string)");
    }

    #[test]
    fn test_lower_named_interface_ignores_type_args() {
        let iface = TypeDescriptor::named("example.com/app", "Store")
            .into_interface()
            .with_type_args(vec![TypeDescriptor::basic("int")]);
        assert_eq!(render(&iface), "app.Store");
    }

    #[test]
    fn test_lower_named_generic_type() {
        let page = TypeDescriptor::named("example.com/app/paging", "Page")
            .with_type_args(vec![TypeDescriptor::type_param("T")]);
        assert_eq!(render(&page), "paging.Page[T]");

        let local = TypeDescriptor::local("Pair").with_type_args(vec![
            TypeDescriptor::basic("string"),
            TypeDescriptor::basic("int"),
        ]);
        assert_eq!(render(&local), "Pair[string, int]");
    }

    #[test]
    fn test_lower_unnamed_interface_is_any() {
        assert_eq!(render(&TypeDescriptor::any()), "any");
    }

    #[test]
    fn test_variadic_requires_slice() {
        let err = lower(&TypeDescriptor::basic("string"), true).unwrap_err();
        assert_eq!(
            err,
            LowerError::VariadicNotSlice {
                found: "basic".to_string()
            }
        );

        let spread = lower(&TypeDescriptor::slice(TypeDescriptor::basic("string")), true).unwrap();
        assert_eq!(spread.to_string(), "...string");
    }

    #[test]
    fn test_unhandled_kind_propagates_from_nested_position() {
        let array = TypeDescriptor::Array {
            len: 4,
            elem: Box::new(TypeDescriptor::basic("byte")),
        };
        let sig = TypeDescriptor::func(vec![array], vec![]);
        let err = lower(&TypeDescriptor::pointer(sig), false).unwrap_err();
        assert!(matches!(err, LowerError::Nested { .. }));
        assert_eq!(
            err.root_cause(),
            &LowerError::TypeNotHandled {
                kind: "array".to_string()
            }
        );
        assert!(err.to_string().contains("[4]byte"));
    }
}
