//! Filesystem layout produced by provisioning.
//!
//! All paths derive from the invoking user's home directory:
//!
//! ```text
//! ~/.config/virt-lightning/config.ini     # written once, never overwritten
//! ~/.local/share/virt-lightning/          # base, mode 775
//! ├── images/upstream/                    # image cache, user-owned
//! └── pool/                               # service-account-owned, mode 775
//!     └── upstream/                       # user-owned staging dir, mode 775
//! ```

use std::path::{Path, PathBuf};

/// Directory names under the base directory.
pub mod dirs {
    pub const IMAGES: &str = "images";
    pub const POOL: &str = "pool";
    pub const UPSTREAM: &str = "upstream";
}

/// Home-derived paths for one user's virt-lightning installation.
#[derive(Clone, Debug)]
pub struct ProvisionLayout {
    home: PathBuf,
}

impl ProvisionLayout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Base data directory: `<home>/.local/share/virt-lightning`.
    pub fn base_dir(&self) -> PathBuf {
        self.home.join(".local/share/virt-lightning")
    }

    /// Image cache: `<base>/images/upstream`.
    pub fn image_cache_dir(&self) -> PathBuf {
        self.base_dir().join(dirs::IMAGES).join(dirs::UPSTREAM)
    }

    /// VM disk pool: `<base>/pool`. Owned by the service account.
    pub fn pool_dir(&self) -> PathBuf {
        self.base_dir().join(dirs::POOL)
    }

    /// Operator staging dir inside the pool: `<base>/pool/upstream`.
    ///
    /// Kept writable by the invoking user so base images can be dropped in
    /// by hand.
    pub fn pool_upstream_dir(&self) -> PathBuf {
        self.pool_dir().join(dirs::UPSTREAM)
    }

    /// Configuration directory: `<home>/.config/virt-lightning`.
    pub fn config_dir(&self) -> PathBuf {
        self.home.join(".config/virt-lightning")
    }

    /// Configuration file: `<config_dir>/config.ini`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.ini")
    }

    /// Ancestor chain from the filesystem root's first component (normally
    /// `/home`) down to the base directory, outermost first.
    ///
    /// The service account needs execute permission on each of these to
    /// traverse into the pool.
    pub fn traversal_chain(&self) -> Vec<PathBuf> {
        let base = self.base_dir();
        let mut chain: Vec<PathBuf> = base
            .ancestors()
            .take_while(|p| *p != Path::new("/"))
            .map(Path::to_path_buf)
            .collect();
        chain.reverse();
        chain
    }

    /// Render the one-time configuration document.
    pub fn render_config(&self) -> String {
        format!("[main]\nstorage_dir = {}\n", self.pool_dir().display())
    }
}
