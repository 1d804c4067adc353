use crate::error::{GenerateError, GenerateResult};
use crate::file::{generate_common, generate_file, FileConfig};
use crate::options::GenerateOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Generated source for one proxied interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub type_name: String,
    pub contents: String,
}

/// Output of a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    /// Boilerplate shared by every proxy in the package
    pub common: String,
    pub files: Vec<GeneratedFile>,
}

/// Generate the common preamble and one proxy per file configuration.
///
/// Files are produced in input order. Callers are responsible for output
/// names being unique.
#[instrument(skip(options, files), fields(out_pkg = %options.out_pkg, files = files.len()))]
pub fn generate(options: &GenerateOptions, files: &[FileConfig]) -> GenerateResult<Generated> {
    if files.is_empty() {
        return Err(GenerateError::NoFiles);
    }
    info!("Starting generation");

    let common = generate_common(options)?;
    let mut generated = Vec::with_capacity(files.len());
    for file_cfg in files {
        debug!(
            src = file_cfg.src_type_name(),
            out = file_cfg.out_type_name(),
            "Generating proxy"
        );
        generated.push(GeneratedFile {
            type_name: file_cfg.out_type_name().to_string(),
            contents: generate_file(options, file_cfg)?,
        });
    }

    info!(files = generated.len(), "Generation complete");
    Ok(Generated {
        common,
        files: generated,
    })
}
