use std::fs;
use std::path::Path;

/// Write a generated file, creating missing parent directories.
///
/// Plain overwrite: concurrent runs on the same path race and the last
/// writer wins.
pub fn write_artifact(path: &str, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    let target = Path::new(path);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    fs::write(target, contents)
        .map_err(|e| format!("Failed to write '{}': {}", target.display(), e))?;
    tracing::info!(path, bytes = contents.len(), "wrote artifact");
    Ok(())
}
