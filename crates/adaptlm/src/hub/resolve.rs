use std::path::{Path, PathBuf};

use hf_hub::api::tokio::Api;
use log::debug;

use crate::error::{AdaptError, Result};

/// Finds `filename` for the model named by `identifier`.
///
/// # Parameters
///
/// * `identifier` - A local directory or a hub model id such as `t5-small`
/// * `filename` - File inside the model repository, e.g. `config.json`
///
/// # Returns
///
/// A path to the file on local disk, downloading it into the hub cache if needed.
///
/// # Errors
///
/// Fails with [`AdaptError::Resolution`] when the directory lacks the file or
/// the hub cannot provide it.
pub async fn resolve_file(identifier: &str, filename: &str) -> Result<PathBuf> {
    let local = Path::new(identifier);
    if local.is_dir() {
        let path = local.join(filename);
        if !path.is_file() {
            return Err(AdaptError::resolution(
                identifier,
                anyhow::anyhow!("{} not found in {}", filename, local.display()),
            ));
        }
        debug!("Using local {}", path.display());
        return Ok(path);
    }

    let api = Api::new().map_err(|e| AdaptError::resolution(identifier, e))?;
    let path = api
        .model(identifier.to_string())
        .get(filename)
        .await
        .map_err(|e| AdaptError::resolution(identifier, e))?;
    debug!("Resolved {} for '{}' to {}", filename, identifier, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("adaptlm-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_local_directory_file() {
        let dir = scratch_dir("resolve-hit");
        std::fs::write(dir.join("config.json"), "{}").unwrap();

        let path = resolve_file(dir.to_str().unwrap(), "config.json").await.unwrap();
        assert_eq!(path, dir.join("config.json"));
    }

    #[tokio::test]
    async fn test_local_directory_missing_file() {
        let dir = scratch_dir("resolve-miss");

        let err = resolve_file(dir.to_str().unwrap(), "tokenizer.json").await.unwrap_err();
        assert!(matches!(err, AdaptError::Resolution { .. }));
        assert!(err.to_string().contains("tokenizer.json"));
    }
}
