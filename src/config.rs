//! Configuration types for a vault import run.
//!
//! All import behaviour is controlled through [`ImportConfig`], built via its
//! [`ImportConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across an entire batch, log it, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::ImportError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for an import run.
///
/// Built via [`ImportConfig::builder()`].
///
/// # Example
/// ```rust
/// use clip2md::{CollisionPolicy, ImportConfig};
///
/// let config = ImportConfig::builder("/tmp/vault")
///     .thumbnail_max(200, 200)
///     .collision(CollisionPolicy::Suffix)
///     .build()
///     .unwrap();
/// assert!(config.articles_dir().ends_with("Articles"));
/// ```
#[derive(Clone)]
pub struct ImportConfig {
    /// Root of the target vault. Notes, thumbnails, and source images all
    /// live under subdirectories of this path.
    pub vault_dir: PathBuf,

    /// Subdirectory (under the vault) holding generated notes. Default: `Articles`.
    pub articles_subdir: String,

    /// Subdirectory holding the scanned source images/PDFs. Default: `Images`.
    ///
    /// Source files are resolved against this directory by base name; the
    /// importer never writes here.
    pub images_subdir: String,

    /// Subdirectory receiving generated thumbnails. Default: `thumbnails`.
    ///
    /// Lowercase for vault-history compatibility: existing notes embed
    /// `![[thumbnails/…]]` links.
    pub thumbnails_subdir: String,

    /// Maximum thumbnail dimensions (width, height) in pixels. Default: (300, 300).
    ///
    /// Thumbnails are downscaled to fit within this box preserving aspect
    /// ratio; sources already smaller are left at their native size.
    pub thumbnail_max: (u32, u32),

    /// What to do when two records sanitise to the same filename stem.
    /// Default: [`CollisionPolicy::Overwrite`].
    pub collision: CollisionPolicy,

    /// Optional per-record progress observer. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfig")
            .field("vault_dir", &self.vault_dir)
            .field("articles_subdir", &self.articles_subdir)
            .field("images_subdir", &self.images_subdir)
            .field("thumbnails_subdir", &self.thumbnails_subdir)
            .field("thumbnail_max", &self.thumbnail_max)
            .field("collision", &self.collision)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ImportProgressCallback>"),
            )
            .finish()
    }
}

impl ImportConfig {
    /// Create a new builder rooted at `vault_dir`.
    pub fn builder(vault_dir: impl Into<PathBuf>) -> ImportConfigBuilder {
        ImportConfigBuilder {
            config: ImportConfig {
                vault_dir: vault_dir.into(),
                articles_subdir: "Articles".to_string(),
                images_subdir: "Images".to_string(),
                thumbnails_subdir: "thumbnails".to_string(),
                thumbnail_max: (300, 300),
                collision: CollisionPolicy::Overwrite,
                progress_callback: None,
            },
        }
    }

    /// Directory receiving generated notes.
    pub fn articles_dir(&self) -> PathBuf {
        self.vault_dir.join(&self.articles_subdir)
    }

    /// Directory holding source images/PDFs.
    pub fn images_dir(&self) -> PathBuf {
        self.vault_dir.join(&self.images_subdir)
    }

    /// Directory receiving generated thumbnails.
    pub fn thumbnails_dir(&self) -> PathBuf {
        self.vault_dir.join(&self.thumbnails_subdir)
    }

    /// Vault-relative thumbnail embed path for a thumbnail filename.
    pub fn thumbnail_vault_path(&self, filename: &str) -> String {
        format!("{}/{}", self.thumbnails_subdir, filename)
    }

    /// Vault-relative link path for a source file base name.
    pub fn image_vault_path(&self, filename: &str) -> String {
        format!("{}/{}", self.images_subdir, filename)
    }
}

/// Builder for [`ImportConfig`].
#[derive(Debug)]
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl ImportConfigBuilder {
    pub fn articles_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.articles_subdir = name.into();
        self
    }

    pub fn images_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.images_subdir = name.into();
        self
    }

    pub fn thumbnails_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.thumbnails_subdir = name.into();
        self
    }

    pub fn thumbnail_max(mut self, width: u32, height: u32) -> Self {
        self.config.thumbnail_max = (width, height);
        self
    }

    pub fn collision(mut self, policy: CollisionPolicy) -> Self {
        self.config.collision = policy;
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ImportConfig, ImportError> {
        let c = &self.config;
        if c.vault_dir.as_os_str().is_empty() {
            return Err(ImportError::InvalidConfig(
                "vault directory must not be empty".into(),
            ));
        }
        let (w, h) = c.thumbnail_max;
        if w < 16 || h < 16 {
            return Err(ImportError::InvalidConfig(format!(
                "thumbnail dimensions must be ≥ 16px, got {w}×{h}"
            )));
        }
        for (label, sub) in [
            ("articles", &c.articles_subdir),
            ("images", &c.images_subdir),
            ("thumbnails", &c.thumbnails_subdir),
        ] {
            if sub.is_empty() || Path::new(sub).is_absolute() || sub.contains("..") {
                return Err(ImportError::InvalidConfig(format!(
                    "{label} subdirectory must be a relative path inside the vault, got '{sub}'"
                )));
            }
        }
        Ok(self.config)
    }
}

/// What the Note Writer does when the computed note path already exists.
///
/// The source scripts silently overwrote; reruns of the same dataset rely on
/// that, so it stays the default. `Suffix` keeps both notes when two distinct
/// records sanitise to the same stem; `Skip` makes reruns strictly additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Replace the existing note (default; reruns refresh every note).
    #[default]
    Overwrite,
    /// Disambiguate with ` (2)`, ` (3)`, … before the extension.
    Suffix,
    /// Leave the existing note alone and report the record as skipped.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_vault_convention() {
        let c = ImportConfig::builder("/vault").build().unwrap();
        assert_eq!(c.articles_dir(), PathBuf::from("/vault/Articles"));
        assert_eq!(c.images_dir(), PathBuf::from("/vault/Images"));
        assert_eq!(c.thumbnails_dir(), PathBuf::from("/vault/thumbnails"));
        assert_eq!(c.thumbnail_max, (300, 300));
        assert_eq!(c.collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn vault_relative_paths_use_forward_slashes() {
        let c = ImportConfig::builder("/vault").build().unwrap();
        assert_eq!(c.thumbnail_vault_path("thumb_x.jpg"), "thumbnails/thumb_x.jpg");
        assert_eq!(c.image_vault_path("scan.pdf"), "Images/scan.pdf");
    }

    #[test]
    fn rejects_tiny_thumbnails() {
        let err = ImportConfig::builder("/vault")
            .thumbnail_max(8, 300)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("16px"));
    }

    #[test]
    fn rejects_escaping_subdirs() {
        assert!(ImportConfig::builder("/vault")
            .images_subdir("../elsewhere")
            .build()
            .is_err());
        assert!(ImportConfig::builder("/vault")
            .articles_subdir("/abs")
            .build()
            .is_err());
        assert!(ImportConfig::builder("/vault").thumbnails_subdir("").build().is_err());
    }
}
