//! # Reinforcer Generator
//!
//! Generates resilient Go proxies for interface types. Every proxied method
//! is routed through an injected runner (retries, timeouts, circuit breaking)
//! so callers get resilience without touching the original implementation.
//!
//! ## Pipeline
//!
//! 1. A [`Loader`] discovers interface types and their method descriptors
//! 2. The [`MethodAnalyzer`] classifies context parameters and error returns
//! 3. [`generate`] emits the shared preamble plus one proxy per interface,
//!    picking a body [`Strategy`] for every method
//! 4. [`write_generated`] writes the result into an output package
//!
//! ## Example
//!
//! ```rust
//! use reinforcer_generator::{generate, FileConfig, GenerateOptions, MethodAnalyzer};
//! use reinforcer_types::TypeDescriptor;
//!
//! let analyzer = MethodAnalyzer::default();
//! let method = analyzer
//!     .analyze(
//!         "GetUser",
//!         &[TypeDescriptor::context(), TypeDescriptor::basic("string")],
//!         &[TypeDescriptor::basic("string"), TypeDescriptor::error()],
//!         false,
//!     )
//!     .unwrap();
//!
//! let files = vec![FileConfig::new("Service", "Service", vec![], vec![], vec![method])];
//! let generated = generate(&GenerateOptions::with_out_pkg("resilient"), &files).unwrap();
//!
//! assert!(generated.files[0]
//!     .contents
//!     .contains("func (s *Service) GetUser(ctx context.Context, arg1 string) (string, error) {"));
//! ```

pub mod context;
pub mod error;
pub mod executor;
pub mod file;
pub mod generator;
pub mod manifest;
pub mod method;
pub mod options;
pub mod synth;
pub mod writer;

pub use error::{GenerateError, GenerateResult};
pub use executor::{Executor, LoadMode, LoadedType, Loader, Parameters};
pub use file::{generate_common, generate_file, FileConfig, TypeParam};
pub use generator::{generate, Generated, GeneratedFile};
pub use manifest::{Manifest, ManifestLoader};
pub use method::{ContextArg, Method, MethodAnalyzer, ParamRole, Parameter};
pub use options::{GenerateOptions, RunnerRef};
pub use synth::{MethodSynthesizer, NoReturn, PassThrough, ProxyType, Retryable, Strategy};
pub use writer::write_generated;
