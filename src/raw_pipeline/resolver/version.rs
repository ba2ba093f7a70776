use std::fmt;
use std::path::Path;

/// API revision of the decode engine, taken from its shared library name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineVersion(pub u32);

impl EngineVersion {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API {}", self.0)
    }
}

/// Extract the API version from a library file name.
///
/// - `libraw.so.10` and `libraw.so.10.0.0` give 10 (the soname major)
/// - `libraw.10.dylib` gives 10
/// - otherwise the last dot-separated token must be numeric
pub fn parse_api_version(path: &Path) -> Option<EngineVersion> {
    let name = path.file_name()?.to_str()?;
    let tokens: Vec<&str> = name.split('.').collect();

    let token = if let Some(pos) = tokens.iter().position(|t| *t == "so") {
        *tokens.get(pos + 1)?
    } else if tokens.last() == Some(&"dylib") && tokens.len() >= 3 {
        tokens[tokens.len() - 2]
    } else {
        *tokens.last()?
    };

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok().map(EngineVersion)
}
