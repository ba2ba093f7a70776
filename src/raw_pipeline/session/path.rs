use std::ffi::CString;
use std::path::Path;

/// Encode a path for the engine's `const char*` arguments.
///
/// Unix paths are passed as their raw bytes. Elsewhere the engine's narrow
/// API can only be trusted with UTF-8.
pub fn engine_path(path: &Path) -> Result<CString, String> {
    let bytes = path_bytes(path)?;
    if bytes.is_empty() {
        return Err("empty path".to_string());
    }
    CString::new(bytes).map_err(|_| format!("{} contains a NUL byte", path.display()))
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Result<Vec<u8>, String> {
    use std::os::unix::ffi::OsStrExt;
    Ok(path.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Result<Vec<u8>, String> {
    path.to_str()
        .map(|s| s.as_bytes().to_vec())
        .ok_or_else(|| format!("{} is not valid UTF-8", path.display()))
}
