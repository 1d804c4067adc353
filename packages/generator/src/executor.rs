use crate::error::{GenerateError, GenerateResult};
use crate::file::{upper_first, FileConfig, TypeParam};
use crate::generator::{generate, Generated};
use crate::method::MethodAnalyzer;
use crate::options::GenerateOptions;
use reinforcer_types::{lower, LowerError, MethodDescriptor, TypeDescriptor, TypeParamDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

/// How a source location is interpreted by a loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// A whole package of declarations
    Package,
    /// A single file of declarations
    File,
}

impl LoadMode {
    fn label(&self) -> &'static str {
        match self {
            LoadMode::Package => "pkg",
            LoadMode::File => "file",
        }
    }
}

/// An interface type found by a loader, with its methods already resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedType {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeParamDescriptor>,
    /// Arguments used when the proxy refers to its own target. When empty, each
    /// type parameter is passed through by name
    #[serde(default)]
    pub type_args: Vec<TypeDescriptor>,
    /// Methods in declared order
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl LoadedType {
    pub fn new(name: impl Into<String>, methods: Vec<MethodDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            methods,
        }
    }

    /// Declare generic parameters, referring to each by its own name
    pub fn with_type_params(mut self, params: Vec<TypeParamDescriptor>) -> Self {
        self.type_args = params
            .iter()
            .map(|p| TypeDescriptor::type_param(p.name.clone()))
            .collect();
        self.type_params = params;
        self
    }

    /// Type arguments for self references, falling back to the type parameters
    pub fn resolved_type_args(&self) -> Vec<TypeDescriptor> {
        if !self.type_args.is_empty() {
            return self.type_args.clone();
        }
        self.type_params
            .iter()
            .map(|p| TypeDescriptor::type_param(p.name.clone()))
            .collect()
    }
}

/// Discovery seam: resolves interface types out of a source location
pub trait Loader {
    /// Every interface type found at `source`
    fn load_all(&self, source: &str, mode: LoadMode) -> GenerateResult<Vec<LoadedType>>;

    /// Interface types at `source` whose names match any of `targets`
    fn load_matched(
        &self,
        source: &str,
        targets: &[String],
        mode: LoadMode,
    ) -> GenerateResult<Vec<LoadedType>>;
}

/// Input parameters for an executor run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// Files eligible for targeting
    #[serde(default)]
    pub sources: Vec<String>,

    /// Packages eligible for targeting
    #[serde(default)]
    pub source_packages: Vec<String>,

    /// Target type name expressions
    #[serde(default)]
    pub targets: Vec<String>,

    /// Target every interface type found instead of matching `targets`
    #[serde(default)]
    pub targets_all: bool,

    #[serde(flatten)]
    pub options: GenerateOptions,
}

impl Parameters {
    pub fn load(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| GenerateError::io(path, source))?;
        serde_json::from_str(&content).map_err(|source| GenerateError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> GenerateResult<Self> {
        serde_json::from_str(json).map_err(|source| GenerateError::Manifest {
            path: "<inline>".into(),
            source,
        })
    }
}

/// Drives discovery, analysis and generation across every configured source
pub struct Executor<L: Loader> {
    loader: L,
    analyzer: MethodAnalyzer,
}

impl<L: Loader> Executor<L> {
    pub fn new(loader: L) -> Self {
        Self::with_analyzer(loader, MethodAnalyzer::default())
    }

    pub fn with_analyzer(loader: L, analyzer: MethodAnalyzer) -> Self {
        Self { loader, analyzer }
    }

    #[instrument(skip(self, params), fields(
        packages = params.source_packages.len(),
        sources = params.sources.len(),
        targets_all = params.targets_all
    ))]
    pub fn execute(&self, params: &Parameters) -> GenerateResult<Generated> {
        info!("Starting execution");
        let mut discovered = BTreeSet::new();
        let mut configs = Vec::new();

        let locations = params
            .source_packages
            .iter()
            .map(|pkg| (pkg, LoadMode::Package))
            .chain(params.sources.iter().map(|file| (file, LoadMode::File)));

        for (source, mode) in locations {
            let loaded = self.load(source, params, mode)?;
            debug!(source = %source, mode = mode.label(), types = loaded.len(), "Loaded types");
            for ty in &loaded {
                configs.push(self.file_config(&mut discovered, ty)?);
            }
        }

        if configs.is_empty() {
            return Err(GenerateError::NoTargetableTypes);
        }

        info!(types = configs.len(), "Discovery complete");
        generate(&params.options, &configs)
    }

    fn load(
        &self,
        source: &str,
        params: &Parameters,
        mode: LoadMode,
    ) -> GenerateResult<Vec<LoadedType>> {
        let result = if params.targets_all {
            self.loader.load_all(source, mode)
        } else {
            self.loader.load_matched(source, &params.targets, mode)
        };
        result.map_err(|err| GenerateError::Load {
            source_path: format!("{}={}", mode.label(), source),
            message: err.to_string(),
        })
    }

    /// Analyze a loaded type, recording its output name in `discovered`
    fn file_config(
        &self,
        discovered: &mut BTreeSet<String>,
        ty: &LoadedType,
    ) -> GenerateResult<FileConfig> {
        if !discovered.insert(upper_first(&ty.name)) {
            return Err(GenerateError::DuplicateType {
                name: ty.name.clone(),
            });
        }

        let lower_type_param = |source: LowerError| GenerateError::LowerTypeParam {
            type_name: ty.name.clone(),
            source,
        };
        let type_params = ty
            .type_params
            .iter()
            .map(|p| {
                lower(&p.constraint, false)
                    .map(|constraint| TypeParam::new(p.name.clone(), constraint))
                    .map_err(lower_type_param)
            })
            .collect::<GenerateResult<Vec<_>>>()?;
        let type_args = ty
            .resolved_type_args()
            .iter()
            .map(|arg| lower(arg, false).map_err(lower_type_param))
            .collect::<GenerateResult<Vec<_>>>()?;
        let methods = ty
            .methods
            .iter()
            .map(|m| self.analyzer.analyze_descriptor(m))
            .collect::<GenerateResult<Vec<_>>>()?;

        Ok(FileConfig::new(
            &ty.name, &ty.name, type_params, type_args, methods,
        ))
    }
}

impl<L: Loader> fmt::Debug for Executor<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}
