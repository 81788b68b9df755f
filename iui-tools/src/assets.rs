//! Preflight checks for the WebAssembly demo assets.

use std::path::{Path, PathBuf};

use crate::error::ServeError;

/// Files the demo shell cannot run without.
pub const REQUIRED_FILES: &[&str] = &["index.html", "iui-wasm.js"];

/// Emscripten output. The HTML/CSS shell is still previewable without it.
pub const WASM_ARTIFACTS: &[&str] = &["libiui_example.js", "libiui_example.wasm"];

/// The set of files `serve-wasm` expects under the asset directory.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            required: REQUIRED_FILES,
            optional: WASM_ARTIFACTS,
        }
    }
}

/// Outcome of a successful preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    pub dir: PathBuf,
    /// Optional artifacts that were not found; non-empty means "warn".
    pub missing_optional: Vec<&'static str>,
}

impl Preflight {
    pub fn is_complete(&self) -> bool {
        self.missing_optional.is_empty()
    }
}

impl AssetManifest {
    /// Verifies `dir` before anything is bound.
    ///
    /// A missing directory or mandatory file is an error. Missing optional
    /// artifacts are reported back in the [`Preflight`].
    pub fn check(&self, dir: &Path) -> Result<Preflight, ServeError> {
        if !dir.is_dir() {
            return Err(ServeError::MissingDirectory(dir.to_path_buf()));
        }

        let missing = Self::missing_in(dir, self.required);
        if !missing.is_empty() {
            return Err(ServeError::MissingFiles(missing));
        }

        Ok(Preflight {
            dir: dir.to_path_buf(),
            missing_optional: Self::missing_in(dir, self.optional),
        })
    }

    fn missing_in(dir: &Path, names: &[&'static str]) -> Vec<&'static str> {
        names
            .iter()
            .copied()
            .filter(|name| !dir.join(name).exists())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    use super::*;

    #[test]
    fn missing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.child("web");
        let err = AssetManifest::default().check(dir.path()).unwrap_err();
        assert!(matches!(err, ServeError::MissingDirectory(_)));
        assert!(err.to_string().contains("Web assets directory not found"));
    }

    #[test]
    fn directory_that_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("web");
        file.touch().unwrap();
        assert!(matches!(
            AssetManifest::default().check(file.path()),
            Err(ServeError::MissingDirectory(_))
        ));
    }

    #[test]
    fn missing_required_files_are_all_listed() {
        let temp = TempDir::new().unwrap();
        let err = AssetManifest::default().check(temp.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required files: index.html, iui-wasm.js"
        );

        temp.child("index.html").write_str("<html></html>").unwrap();
        let err = AssetManifest::default().check(temp.path()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required files: iui-wasm.js");
    }

    #[test]
    fn missing_wasm_artifacts_only_warn() {
        let temp = TempDir::new().unwrap();
        temp.child("index.html").write_str("<html></html>").unwrap();
        temp.child("iui-wasm.js").write_str("// shell").unwrap();
        temp.child("libiui_example.js").write_str("// glue").unwrap();

        let preflight = AssetManifest::default().check(temp.path()).unwrap();
        assert!(!preflight.is_complete());
        assert_eq!(preflight.missing_optional, vec!["libiui_example.wasm"]);
    }

    #[test]
    fn complete_build() {
        let temp = TempDir::new().unwrap();
        for name in REQUIRED_FILES.iter().chain(WASM_ARTIFACTS) {
            temp.child(name).touch().unwrap();
        }
        let preflight = AssetManifest::default().check(temp.path()).unwrap();
        assert!(preflight.is_complete());
        assert_eq!(preflight.dir, temp.path());
    }
}
