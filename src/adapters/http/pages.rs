use crate::core::{HistoryEntry, Result};
use minijinja::{context, AutoEscape, Environment};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

pub const INDEX_PAGE: &str = "index.html";
pub const MESSAGE_PAGE: &str = "message.html";
pub const SUCCESS_PAGE: &str = "success.html";
pub const HISTORY_PAGE: &str = "history.html";
pub const ERROR_PAGE: &str = "error.html";

/// Templates and static assets, read from disk on every request so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct Pages {
    templates_dir: PathBuf,
    static_dir: PathBuf,
}

impl Pages {
    pub fn new(templates_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            static_dir: static_dir.into(),
        }
    }

    pub async fn template(&self, name: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.templates_dir.join(name)).await
    }

    pub async fn render_history(&self, entries: &[HistoryEntry]) -> Result<Option<String>> {
        let Some(source) = self.template(HISTORY_PAGE).await? else {
            return Ok(None);
        };
        let source = String::from_utf8_lossy(&source);

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        let html = env.render_str(&source, context! { messages => entries })?;
        Ok(Some(html))
    }

    /// `None` for missing files and for paths that would leave the static directory.
    pub async fn static_asset(&self, relative: &str) -> Result<Option<(&'static str, Vec<u8>)>> {
        let Some(relative) = safe_relative_path(relative) else {
            tracing::debug!("Rejected static path: {}", relative);
            return Ok(None);
        };
        let content_type = content_type_for(&relative);
        Ok(read_optional(&self.static_dir.join(relative))
            .await?
            .map(|data| (content_type, data)))
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        // 目錄不是可送出的檔案
        Err(e) => match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Ok(None),
            _ => Err(e.into()),
        },
    }
}

pub fn safe_relative_path(relative: &str) -> Option<PathBuf> {
    if relative.is_empty() {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("js") => "text/javascript",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
