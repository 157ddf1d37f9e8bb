use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use wirlwind_types::{ResolutionTier, TemplateResolution};

/// Given a template filename, resolves it to a concrete file path: local
/// override directory first, system template directory second (§4.1).
pub struct TemplateResolver {
    /// `templates/<engine>/` under the process working root (or
    /// `--root` override), e.g. `templates/textfsm`.
    local_dir: PathBuf,
    /// The installed system template directory for this engine, e.g. the
    /// community TextFSM template package directory.
    system_dir: Option<PathBuf>,
}

impl TemplateResolver {
    pub fn new(local_dir: impl Into<PathBuf>, system_dir: Option<PathBuf>) -> Self {
        Self {
            local_dir: local_dir.into(),
            system_dir,
        }
    }

    /// Resolve `filename` (no path components) to an absolute path and the
    /// tier that satisfied it, recording both searched paths regardless of
    /// outcome so the parse trace can show operators whether an override
    /// is actually being used (§4.1).
    pub fn resolve(&self, filename: &str) -> Result<(PathBuf, TemplateResolution)> {
        let local_path = self.local_dir.join(filename);
        let system_path = self
            .system_dir
            .as_ref()
            .map(|d| d.join(filename))
            .unwrap_or_else(|| PathBuf::from("<no system template dir configured>"));

        let local_searched = local_path.display().to_string();
        let system_searched = system_path.display().to_string();

        if local_path.is_file() {
            return Ok((
                local_path,
                TemplateResolution {
                    filename: filename.to_string(),
                    tier: Some(ResolutionTier::Local),
                    local_path_searched: local_searched,
                    system_path_searched: system_searched,
                },
            ));
        }

        if self.system_dir.is_some() && system_path.is_file() {
            return Ok((
                system_path,
                TemplateResolution {
                    filename: filename.to_string(),
                    tier: Some(ResolutionTier::System),
                    local_path_searched: local_searched,
                    system_path_searched: system_searched,
                },
            ));
        }

        Err(Error::TemplateNotFound {
            filename: filename.to_string(),
            local_path_searched: local_searched,
            system_path_searched: system_searched,
        })
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn local_override_shadows_system_template() {
        let local = tempdir().unwrap();
        let system = tempdir().unwrap();
        fs::write(local.path().join("foo.textfsm"), "local").unwrap();
        fs::write(system.path().join("foo.textfsm"), "system").unwrap();

        let resolver = TemplateResolver::new(local.path(), Some(system.path().to_path_buf()));
        let (path, resolution) = resolver.resolve("foo.textfsm").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "local");
        assert_eq!(resolution.tier, Some(ResolutionTier::Local));
    }

    #[test]
    fn falls_back_to_system_when_local_absent() {
        let local = tempdir().unwrap();
        let system = tempdir().unwrap();
        fs::write(system.path().join("bar.textfsm"), "system").unwrap();

        let resolver = TemplateResolver::new(local.path(), Some(system.path().to_path_buf()));
        let (path, resolution) = resolver.resolve("bar.textfsm").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "system");
        assert_eq!(resolution.tier, Some(ResolutionTier::System));
    }

    #[test]
    fn neither_tier_resolves_is_fatal() {
        let local = tempdir().unwrap();
        let resolver = TemplateResolver::new(local.path(), None);
        let err = resolver.resolve("missing.textfsm").unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { .. }));
    }
}
