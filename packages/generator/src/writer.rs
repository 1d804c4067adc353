use crate::error::{GenerateError, GenerateResult};
use crate::generator::Generated;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File holding the boilerplate shared by every proxy
pub const COMMON_FILE_NAME: &str = "reinforcer_common.go";

/// Write generated sources into `dir`, creating it if needed.
///
/// Returns the written paths, common file first. Nothing is written when two
/// outputs map to the same file name.
#[instrument(skip(dir, generated), fields(dir = %dir.as_ref().display(), files = generated.files.len()))]
pub fn write_generated(dir: impl AsRef<Path>, generated: &Generated) -> GenerateResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let outputs = plan_outputs(dir, generated)?;
    std::fs::create_dir_all(dir).map_err(|source| GenerateError::io(dir, source))?;

    let mut written = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        written.push(write_file(&path, contents)?);
    }

    info!(written = written.len(), "Wrote generated sources");
    Ok(written)
}

/// Pair every output with its path, rejecting file names claimed twice
fn plan_outputs<'a>(
    dir: &Path,
    generated: &'a Generated,
) -> GenerateResult<Vec<(PathBuf, &'a str)>> {
    let mut claimed: BTreeMap<String, &str> = BTreeMap::new();
    claimed.insert(COMMON_FILE_NAME.to_string(), "common definitions");

    let mut outputs = Vec::with_capacity(generated.files.len() + 1);
    outputs.push((dir.join(COMMON_FILE_NAME), generated.common.as_str()));
    for file in &generated.files {
        let file_name = format!("{}.go", to_snake_case(&file.type_name));
        if let Some(claimed_by) = claimed.get(&file_name) {
            return Err(GenerateError::OutputCollision {
                path: dir.join(&file_name),
                type_name: file.type_name.clone(),
                claimed_by: claimed_by.to_string(),
            });
        }
        claimed.insert(file_name.clone(), &file.type_name);
        outputs.push((dir.join(file_name), file.contents.as_str()));
    }
    Ok(outputs)
}

fn write_file(path: &Path, contents: &str) -> GenerateResult<PathBuf> {
    debug!(path = %path.display(), bytes = contents.len(), "Writing file");
    std::fs::write(path, contents).map_err(|source| GenerateError::io(path, source))?;
    Ok(path.to_path_buf())
}

/// `GetHTTPClient` -> `get_http_client`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let starts_word = match prev {
                None => false,
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, |n| n.is_lowercase()),
                Some(_) => false,
            };
            if starts_word {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
