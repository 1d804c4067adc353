use crate::error::{GenerateError, GenerateResult};
use crate::executor::{LoadMode, LoadedType, Loader};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_EXTENSION: &str = "json";

/// On-disk listing of already-resolved interface types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<LoadedType>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| GenerateError::io(path, source))?;
        serde_json::from_str(&content).map_err(|source| GenerateError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Loads interface types from JSON manifests.
///
/// In file mode the source is a single manifest. In package mode it is a
/// directory whose `*.json` manifests are read in file name order.
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader {
    root: Option<PathBuf>,
}

impl ManifestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, source: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source),
            None => PathBuf::from(source),
        }
    }

    fn manifest_paths(&self, source: &str, mode: LoadMode) -> GenerateResult<Vec<PathBuf>> {
        let path = self.resolve(source);
        match mode {
            LoadMode::File => Ok(vec![path]),
            LoadMode::Package => {
                let entries =
                    std::fs::read_dir(&path).map_err(|source| GenerateError::io(&path, source))?;
                let mut paths = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|source| GenerateError::io(&path, source))?;
                    let entry_path = entry.path();
                    if entry_path.is_file()
                        && entry_path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION)
                    {
                        paths.push(entry_path);
                    }
                }
                paths.sort();
                Ok(paths)
            }
        }
    }
}

impl Loader for ManifestLoader {
    fn load_all(&self, source: &str, mode: LoadMode) -> GenerateResult<Vec<LoadedType>> {
        let mut types = Vec::new();
        for path in self.manifest_paths(source, mode)? {
            let manifest = Manifest::load(&path)?;
            debug!(path = %path.display(), types = manifest.types.len(), "Read manifest");
            types.extend(manifest.types);
        }
        Ok(types)
    }

    fn load_matched(
        &self,
        source: &str,
        targets: &[String],
        mode: LoadMode,
    ) -> GenerateResult<Vec<LoadedType>> {
        let matchers = compile_targets(targets)?;
        Ok(self
            .load_all(source, mode)?
            .into_iter()
            .filter(|ty| matchers.iter().any(|re| re.is_match(&ty.name)))
            .collect())
    }
}

/// Compile target expressions so each must match a whole type name
pub fn compile_targets(targets: &[String]) -> GenerateResult<Vec<Regex>> {
    targets
        .iter()
        .map(|expr| {
            Regex::new(&format!("^(?:{})$", expr)).map_err(|source| GenerateError::InvalidTarget {
                expr: expr.clone(),
                source,
            })
        })
        .collect()
}
