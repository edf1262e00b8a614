//! Scope resolution across storage-API generations.
//!
//! Older platforms expose a single global external store rooted at one
//! path. Newer ones expose a store per storage volume, each of which needs
//! its own freshness guarantee. [`resolve`] hides that difference from the
//! executor: it returns the endpoints to query and the filesystem roots
//! backing them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{EndpointRef, ScopeSelector};

/// Path segment where platform-private app storage begins on a volume
pub const PRIVATE_STORAGE_MARKER: &str = "/Android/";

/// A storage volume reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageVolume {
    /// Platform volume name (e.g. `external_primary`, `1a2b-3c4d`)
    pub name: String,

    /// This app's private files directory on the volume, if mounted
    #[serde(default)]
    pub app_files_dir: Option<String>,
}

impl StorageVolume {
    pub fn new(name: impl Into<String>, app_files_dir: Option<&str>) -> Self {
        Self {
            name: name.into(),
            app_files_dir: app_files_dir.map(str::to_string),
        }
    }

    /// Root of the volume, derived from the private files directory
    pub fn root_path(&self) -> Option<String> {
        self.app_files_dir.as_deref().map(volume_root)
    }
}

/// Read-only facts about the running platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Whether the catalog is addressed per storage volume
    #[serde(default)]
    pub per_volume_addressing: bool,

    /// External volumes, in platform order
    #[serde(default)]
    pub volumes: Vec<StorageVolume>,

    /// Root of the primary external storage
    #[serde(default)]
    pub primary_external_root: String,
}

impl PlatformInfo {
    /// A platform with one global external store
    pub fn legacy(primary_external_root: impl Into<String>) -> Self {
        Self {
            per_volume_addressing: false,
            volumes: Vec::new(),
            primary_external_root: primary_external_root.into(),
        }
    }

    /// A platform addressing each volume separately
    pub fn per_volume(
        volumes: Vec<StorageVolume>,
        primary_external_root: impl Into<String>,
    ) -> Self {
        Self {
            per_volume_addressing: true,
            volumes,
            primary_external_root: primary_external_root.into(),
        }
    }
}

/// Endpoints to query and the roots backing them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeResolution {
    /// Never empty
    pub endpoints: Vec<EndpointRef>,

    /// Roots to keep indexed; empty when no scan is needed
    pub root_paths: BTreeSet<String>,
}

/// Decide which endpoints a scope covers. First match wins:
///
/// 1. A fixed selector maps to its single endpoint with no roots.
/// 2. With per-volume addressing and at least one volume, one endpoint per
///    volume, and the roots derived from each volume's private directory.
/// 3. Otherwise the legacy external endpoint rooted at the primary storage.
pub fn resolve(scope: ScopeSelector, platform: &PlatformInfo) -> ScopeResolution {
    if let Some(endpoint) = scope.fixed_endpoint() {
        return ScopeResolution {
            endpoints: vec![endpoint],
            root_paths: BTreeSet::new(),
        };
    }

    if platform.per_volume_addressing && !platform.volumes.is_empty() {
        let endpoints = platform
            .volumes
            .iter()
            .map(|volume| EndpointRef::Volume(volume.name.clone()))
            .collect();
        let root_paths = platform
            .volumes
            .iter()
            .filter_map(StorageVolume::root_path)
            .collect();

        return ScopeResolution {
            endpoints,
            root_paths,
        };
    }

    ScopeResolution {
        endpoints: vec![EndpointRef::External],
        root_paths: BTreeSet::from([platform.primary_external_root.clone()]),
    }
}

/// Cut a private app directory back to the root of its volume.
///
/// `/storage/emulated/0/Android/data/app/files` becomes
/// `/storage/emulated/0`. Paths without the marker are kept whole.
pub fn volume_root(app_dir: &str) -> String {
    match app_dir.find(PRIVATE_STORAGE_MARKER) {
        Some(idx) if idx > 0 => app_dir[..idx].to_string(),
        _ => app_dir.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_root_truncates_at_marker() {
        assert_eq!(
            volume_root("/storage/emulated/0/Android/data/com.example/files"),
            "/storage/emulated/0"
        );
        assert_eq!(
            volume_root("/storage/1A2B-3C4D/Android/data/com.example/files"),
            "/storage/1A2B-3C4D"
        );
    }

    #[test]
    fn test_volume_root_without_marker() {
        assert_eq!(volume_root("/mnt/media/files"), "/mnt/media/files");
        // A marker at the very start has no volume before it
        assert_eq!(volume_root("/Android/data/x"), "/Android/data/x");
    }

    #[test]
    fn test_volume_without_app_dir_has_no_root() {
        let platform = PlatformInfo::per_volume(
            vec![
                StorageVolume::new("external_primary", Some("/storage/emulated/0/Android/data/a/files")),
                StorageVolume::new("unmounted", None),
            ],
            "/storage/emulated/0",
        );

        let resolution = resolve(ScopeSelector::AllVolumes, &platform);
        assert_eq!(resolution.endpoints.len(), 2);
        assert_eq!(
            resolution.root_paths,
            BTreeSet::from(["/storage/emulated/0".to_string()])
        );
    }

    #[test]
    fn test_legacy_resolution() {
        let platform = PlatformInfo::legacy("/sdcard");
        let resolution = resolve(ScopeSelector::AllVolumes, &platform);

        assert_eq!(resolution.endpoints, vec![EndpointRef::External]);
        assert_eq!(resolution.root_paths, BTreeSet::from(["/sdcard".to_string()]));
    }
}
