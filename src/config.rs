use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be saved as defaults in a flag file.
///
/// The session token is never part of this: it only comes from the
/// command line or the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_images: bool,
    pub perf: bool,
    pub force_half_cell: bool,
    pub fullscreen: bool,
    /// Initial zoom as a percentage, e.g. `125`.
    pub zoom: Option<u16>,
    pub api_url: Option<String>,
    pub pdfium_lib: Option<PathBuf>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_images: self.no_images || other.no_images,
            perf: self.perf || other.perf,
            force_half_cell: self.force_half_cell || other.force_half_cell,
            fullscreen: self.fullscreen || other.fullscreen,
            zoom: other.zoom.or(self.zoom),
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            pdfium_lib: other.pdfium_lib.clone().or_else(|| self.pdfium_lib.clone()),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("folio").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("folio")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("folio").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("folio").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".foliorc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# folio defaults (saved with --save)".to_string()];
    if flags.no_images {
        lines.push("--no-images".to_string());
    }
    if flags.fullscreen {
        lines.push("--fullscreen".to_string());
    }
    if let Some(zoom) = flags.zoom {
        lines.push(format!("--zoom {zoom}"));
    }
    if let Some(url) = &flags.api_url {
        lines.push(format!("--api-url {url}"));
    }
    if let Some(dir) = &flags.pdfium_lib {
        lines.push(format!("--pdfium-lib {}", dir.display()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if flags.force_half_cell {
        lines.push("--force-half-cell".to_string());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of raw arguments, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let mut value = || {
            inline.map(ToOwned::to_owned).or_else(|| {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                next
            })
        };
        match name {
            "--no-images" => flags.no_images = true,
            "--perf" => flags.perf = true,
            "--force-half-cell" => flags.force_half_cell = true,
            "--fullscreen" => flags.fullscreen = true,
            "--zoom" => flags.zoom = value().and_then(|v| v.parse().ok()),
            "--api-url" => flags.api_url = value(),
            "--pdfium-lib" => flags.pdfium_lib = value().map(PathBuf::from),
            "--render-debug-log" => flags.render_debug_log = value().map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "folio",
            "--fullscreen",
            "--no-images",
            "--zoom",
            "125",
            "--api-url=https://biblioteca.escola.br/api",
            "--render-debug-log=render.log",
            "--force-half-cell",
            "42",
        ]));
        assert!(flags.fullscreen);
        assert!(flags.no_images);
        assert_eq!(flags.zoom, Some(125));
        assert_eq!(flags.api_url.as_deref(), Some("https://biblioteca.escola.br/api"));
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
        assert!(flags.force_half_cell);
    }

    #[test]
    fn test_token_flag_is_never_picked_up() {
        let flags = parse_flag_tokens(&args(&["folio", "--token", "secret", "7"]));
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_invalid_zoom_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--zoom", "huge"]));
        assert_eq!(flags.zoom, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            fullscreen: true,
            zoom: Some(75),
            api_url: Some("http://old/api".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            perf: true,
            zoom: Some(150),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.fullscreen);
        assert!(merged.perf);
        assert_eq!(merged.zoom, Some(150));
        assert_eq!(merged.api_url.as_deref(), Some("http://old/api"));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".foliorc");
        let flags = ConfigFlags {
            no_images: true,
            perf: true,
            force_half_cell: true,
            fullscreen: true,
            zoom: Some(50),
            api_url: Some("http://localhost:3001/api".to_string()),
            pdfium_lib: Some(PathBuf::from("/opt/pdfium/lib")),
            render_debug_log: Some(PathBuf::from("render.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
