use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved, language-neutral description of a type as reported by discovery
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Predeclared basic type (`string`, `int32`, `bool`, ...)
    Basic { name: String },

    /// Pointer to another type
    Pointer { elem: Box<TypeDescriptor> },

    /// Slice of another type
    Slice { elem: Box<TypeDescriptor> },

    /// Fixed-length array (no lowering exists for it)
    Array { len: u64, elem: Box<TypeDescriptor> },

    /// Map from key to value
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },

    /// Channel with a direction
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeDescriptor>,
    },

    /// Function signature
    Signature(FuncDescriptor),

    /// Named (declared) type, possibly generic, possibly an interface
    Named(NamedDescriptor),

    /// Unnamed interface literal
    Interface {
        #[serde(default)]
        methods: Vec<MethodDescriptor>,
    },

    /// Generic type parameter
    TypeParam { name: String },

    /// Unnamed struct literal (no lowering exists for it)
    Struct {
        #[serde(default)]
        fields: Vec<FieldDescriptor>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    #[default]
    SendRecv,
    SendOnly,
    RecvOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncDescriptor {
    #[serde(default)]
    pub params: Vec<TypeDescriptor>,
    #[serde(default)]
    pub results: Vec<TypeDescriptor>,
    /// The last parameter is a variadic slice
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedDescriptor {
    pub name: String,
    /// Import path of the owning package; `None` for universe or local names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// The underlying type is an interface
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeDescriptor>,
    /// Method set of the type, used for structural matching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDescriptor>,
}

/// A method as reported by discovery: a name plus its signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeDescriptor>,
    #[serde(default)]
    pub results: Vec<TypeDescriptor>,
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

/// Generic type parameter declaration on a discovered interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParamDescriptor {
    pub name: String,
    #[serde(default = "TypeDescriptor::any")]
    pub constraint: TypeDescriptor,
}

impl TypeDescriptor {
    pub fn basic(name: impl Into<String>) -> Self {
        TypeDescriptor::Basic { name: name.into() }
    }

    pub fn pointer(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: TypeDescriptor) -> Self {
        TypeDescriptor::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn func(params: Vec<TypeDescriptor>, results: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Signature(FuncDescriptor {
            params,
            results,
            variadic: false,
        })
    }

    pub fn type_param(name: impl Into<String>) -> Self {
        TypeDescriptor::TypeParam { name: name.into() }
    }

    /// Named concrete type declared in `package`
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDescriptor::Named(NamedDescriptor {
            name: name.into(),
            package: Some(package.into()),
            is_interface: false,
            type_args: Vec::new(),
            methods: Vec::new(),
        })
    }

    /// Named type with no owning package
    pub fn local(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(NamedDescriptor {
            name: name.into(),
            package: None,
            is_interface: false,
            type_args: Vec::new(),
            methods: Vec::new(),
        })
    }

    /// The empty interface
    pub fn any() -> Self {
        TypeDescriptor::Interface {
            methods: Vec::new(),
        }
    }

    /// The predeclared `error` interface
    pub fn error() -> Self {
        TypeDescriptor::Named(NamedDescriptor {
            name: "error".to_string(),
            package: None,
            is_interface: true,
            type_args: Vec::new(),
            methods: vec![MethodDescriptor {
                name: "Error".to_string(),
                params: Vec::new(),
                results: vec![TypeDescriptor::basic("string")],
                variadic: false,
            }],
        })
    }

    /// `context.Context` with its full method set
    pub fn context() -> Self {
        let method = |name: &str, results: Vec<TypeDescriptor>| MethodDescriptor {
            name: name.to_string(),
            params: Vec::new(),
            results,
            variadic: false,
        };
        TypeDescriptor::Named(NamedDescriptor {
            name: "Context".to_string(),
            package: Some("context".to_string()),
            is_interface: true,
            type_args: Vec::new(),
            methods: vec![
                method(
                    "Deadline",
                    vec![
                        TypeDescriptor::named("time", "Time"),
                        TypeDescriptor::basic("bool"),
                    ],
                ),
                method(
                    "Done",
                    vec![TypeDescriptor::chan(
                        ChanDir::RecvOnly,
                        TypeDescriptor::Struct { fields: Vec::new() },
                    )],
                ),
                method("Err", vec![TypeDescriptor::error()]),
                MethodDescriptor {
                    name: "Value".to_string(),
                    params: vec![TypeDescriptor::any()],
                    results: vec![TypeDescriptor::any()],
                    variadic: false,
                },
            ],
        })
    }

    /// Attach generic arguments to a named type; other kinds are returned unchanged
    pub fn with_type_args(self, args: Vec<TypeDescriptor>) -> Self {
        match self {
            TypeDescriptor::Named(mut named) => {
                named.type_args = args;
                TypeDescriptor::Named(named)
            }
            other => other,
        }
    }

    /// Mark a named type as declared over an interface
    pub fn into_interface(self) -> Self {
        match self {
            TypeDescriptor::Named(mut named) => {
                named.is_interface = true;
                TypeDescriptor::Named(named)
            }
            other => other,
        }
    }

    /// Short name of the descriptor's kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Basic { .. } => "basic",
            TypeDescriptor::Pointer { .. } => "pointer",
            TypeDescriptor::Slice { .. } => "slice",
            TypeDescriptor::Array { .. } => "array",
            TypeDescriptor::Map { .. } => "map",
            TypeDescriptor::Chan { .. } => "chan",
            TypeDescriptor::Signature(_) => "signature",
            TypeDescriptor::Named(_) => "named",
            TypeDescriptor::Interface { .. } => "interface",
            TypeDescriptor::TypeParam { .. } => "type_param",
            TypeDescriptor::Struct { .. } => "struct",
        }
    }

    /// Methods callable on a value of this type
    pub fn method_set(&self) -> &[MethodDescriptor] {
        match self {
            TypeDescriptor::Named(named) => &named.methods,
            TypeDescriptor::Interface { methods } => methods,
            TypeDescriptor::Pointer { elem } => match elem.as_ref() {
                TypeDescriptor::Named(named) if !named.is_interface => &named.methods,
                _ => &[],
            },
            _ => &[],
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Basic { name } => write!(f, "{}", name),
            TypeDescriptor::Pointer { elem } => write!(f, "*{}", elem),
            TypeDescriptor::Slice { elem } => write!(f, "[]{}", elem),
            TypeDescriptor::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeDescriptor::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeDescriptor::Chan { dir, elem } => match dir {
                ChanDir::SendRecv => write!(f, "chan {}", elem),
                ChanDir::SendOnly => write!(f, "chan<- {}", elem),
                ChanDir::RecvOnly => write!(f, "<-chan {}", elem),
            },
            TypeDescriptor::Signature(sig) => {
                write!(f, "func")?;
                write_signature(f, &sig.params, &sig.results, sig.variadic)
            }
            TypeDescriptor::Named(named) => {
                if let Some(package) = &named.package {
                    write!(f, "{}.", package)?;
                }
                write!(f, "{}", named.name)?;
                if !named.type_args.is_empty() {
                    write!(f, "[")?;
                    write_list(f, &named.type_args)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeDescriptor::Interface { methods } => {
                if methods.is_empty() {
                    return write!(f, "interface{{}}");
                }
                write!(f, "interface{{")?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", method.name)?;
                    write_signature(f, &method.params, &method.results, method.variadic)?;
                }
                write!(f, "}}")
            }
            TypeDescriptor::TypeParam { name } => write!(f, "{}", name),
            TypeDescriptor::Struct { fields } => {
                write!(f, "struct{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[TypeDescriptor]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

fn write_signature(
    f: &mut fmt::Formatter<'_>,
    params: &[TypeDescriptor],
    results: &[TypeDescriptor],
    variadic: bool,
) -> fmt::Result {
    write!(f, "(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match param {
            TypeDescriptor::Slice { elem } if variadic && i + 1 == params.len() => {
                write!(f, "...{}", elem)?
            }
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, ")")?;
    match results.len() {
        0 => Ok(()),
        1 => write!(f, " {}", results[0]),
        _ => {
            write!(f, " (")?;
            write_list(f, results)?;
            write!(f, ")")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_qualified_names() {
        let user = TypeDescriptor::named("example.com/app/models", "User");
        assert_eq!(
            TypeDescriptor::slice(TypeDescriptor::pointer(user)).to_string(),
            "[]*example.com/app/models.User"
        );
        assert_eq!(TypeDescriptor::context().to_string(), "context.Context");
        assert_eq!(TypeDescriptor::error().to_string(), "error");
    }

    #[test]
    fn test_display_signature() {
        let sig = TypeDescriptor::Signature(FuncDescriptor {
            params: vec![
                TypeDescriptor::basic("int"),
                TypeDescriptor::slice(TypeDescriptor::basic("string")),
            ],
            results: vec![TypeDescriptor::basic("bool"), TypeDescriptor::error()],
            variadic: true,
        });
        assert_eq!(sig.to_string(), "func(int, ...string) (bool, error)");
    }

    #[test]
    fn test_method_set_through_pointer() {
        let mut named = match TypeDescriptor::local("MyErr") {
            TypeDescriptor::Named(named) => named,
            _ => unreachable!(),
        };
        named.methods = TypeDescriptor::error().method_set().to_vec();
        let ptr = TypeDescriptor::pointer(TypeDescriptor::Named(named));
        assert_eq!(ptr.method_set().len(), 1);
        assert_eq!(ptr.method_set()[0].name, "Error");
    }

    #[test]
    fn test_serde_tagged_representation() {
        let json = r#"{"kind":"pointer","elem":{"kind":"named","name":"User","package":"example.com/app"}}"#;
        let parsed: TypeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            TypeDescriptor::pointer(TypeDescriptor::named("example.com/app", "User"))
        );
    }
}
