//! Workspace path resolution and session configuration: an explicit
//! `--root` flag, falling back to a `WIRLWIND_ROOT` env var, falling back
//! to the current directory.

use std::path::PathBuf;

/// Resolve the workspace root used to locate `collections/` and
/// `templates/` when not run from the process working directory directly
/// (§6 "under the process working root"):
/// 1. An explicit `--root` path.
/// 2. The `WIRLWIND_HOME` environment variable.
/// 3. The XDG data directory (`dirs::data_dir()`).
/// 4. `~/.wirlwind` as a last resort.
pub fn resolve_workspace_root(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return expand_tilde(path);
    }
    if let Ok(env_path) = std::env::var("WIRLWIND_HOME") {
        return expand_tilde(&env_path);
    }
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("wirlwind");
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".wirlwind");
    }
    PathBuf::from(".wirlwind")
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Authentication material for the SSH session (§6 `--key` or password
/// prompt; the actual prompt/key-file reading is the CLI's job).
#[derive(Debug, Clone)]
pub enum Auth {
    KeyFile(PathBuf),
    Password(String),
}

/// Everything the Poll Engine needs to start one device session, built
/// directly from CLI args rather than a config file (§1.2: "no file
/// form... matches §6 CLI surface").
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub vendor_id: String,
    pub user: String,
    pub auth: Auth,
    pub debug: bool,
    pub preflight_only: bool,
    pub no_legacy: bool,
    pub root: PathBuf,
}

impl SessionConfig {
    pub fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    pub fn local_template_dir(&self, engine: &str) -> PathBuf {
        self.root.join("templates").join(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_over_everything() {
        let root = resolve_workspace_root(Some("/explicit/path"));
        assert_eq!(root, PathBuf::from("/explicit/path"));
    }

    #[test]
    fn env_var_used_when_no_explicit_path() {
        std::env::set_var("WIRLWIND_HOME", "/from/env");
        let root = resolve_workspace_root(None);
        std::env::remove_var("WIRLWIND_HOME");
        assert_eq!(root, PathBuf::from("/from/env"));
    }

    #[test]
    fn tilde_expands_against_home() {
        std::env::set_var("HOME", "/home/op");
        let root = resolve_workspace_root(Some("~/wirlwind-data"));
        assert_eq!(root, PathBuf::from("/home/op/wirlwind-data"));
    }
}
