//! Catalog endpoints and the scope selector that picks them.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Volume name of the platform's internal (system) media store
pub const INTERNAL_VOLUME: &str = "internal";

/// Volume name of the legacy global external store
pub const EXTERNAL_VOLUME: &str = "external";

/// One queryable partition of the media catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRef {
    /// Legacy global store spanning every external volume
    External,

    /// System store shipped with the platform
    Internal,

    /// A single storage volume, addressed by its platform volume name
    Volume(String),

    /// Opaque fixed endpoint named by a scope selector number
    Fixed(NonZeroU32),
}

impl EndpointRef {
    /// Volume name as it appears in content URIs; `None` for a fixed
    /// endpoint, whose volume only the catalog knows
    pub fn volume_name(&self) -> Option<&str> {
        match self {
            EndpointRef::External => Some(EXTERNAL_VOLUME),
            EndpointRef::Internal => Some(INTERNAL_VOLUME),
            EndpointRef::Volume(name) => Some(name),
            EndpointRef::Fixed(_) => None,
        }
    }

    /// Base content URI of the endpoint's audio table
    pub fn content_uri(&self) -> Option<String> {
        self.volume_name().map(volume_content_uri)
    }
}

/// Base content URI of a volume's audio table
pub fn volume_content_uri(volume: &str) -> String {
    format!("content://media/{}/audio/media", volume)
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRef::Fixed(n) => write!(f, "fixed endpoint {}", n),
            _ => f.write_str(&self.content_uri().unwrap_or_default()),
        }
    }
}

/// Which endpoints a query should cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScopeSelector {
    /// Every default external volume (raw value 0)
    #[default]
    AllVolumes,

    /// One fixed endpoint (any non-zero raw value)
    Fixed(NonZeroU32),
}

impl ScopeSelector {
    /// Decode the raw selector the bridge sends
    pub fn from_raw(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            None => ScopeSelector::AllVolumes,
            Some(n) => ScopeSelector::Fixed(n),
        }
    }

    /// The endpoint a fixed selector names; `None` for [`ScopeSelector::AllVolumes`].
    ///
    /// 1 is the internal store, 2 the legacy external store. Other numbers
    /// stay opaque and are left to the catalog to interpret.
    pub fn fixed_endpoint(&self) -> Option<EndpointRef> {
        match self {
            ScopeSelector::AllVolumes => None,
            ScopeSelector::Fixed(n) => Some(match n.get() {
                1 => EndpointRef::Internal,
                2 => EndpointRef::External,
                _ => EndpointRef::Fixed(*n),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_raw() {
        assert_eq!(ScopeSelector::from_raw(0), ScopeSelector::AllVolumes);
        assert_eq!(
            ScopeSelector::from_raw(5),
            ScopeSelector::Fixed(NonZeroU32::new(5).unwrap())
        );
        assert_eq!(ScopeSelector::AllVolumes.fixed_endpoint(), None);
    }

    #[test]
    fn test_fixed_endpoint_mapping() {
        assert_eq!(
            ScopeSelector::from_raw(1).fixed_endpoint(),
            Some(EndpointRef::Internal)
        );
        assert_eq!(
            ScopeSelector::from_raw(2).fixed_endpoint(),
            Some(EndpointRef::External)
        );
        assert_eq!(
            ScopeSelector::from_raw(5).fixed_endpoint(),
            Some(EndpointRef::Fixed(NonZeroU32::new(5).unwrap()))
        );
    }

    #[test]
    fn test_content_uri() {
        assert_eq!(
            EndpointRef::External.content_uri().as_deref(),
            Some("content://media/external/audio/media")
        );
        assert_eq!(
            EndpointRef::Volume("1a2b-3c4d".to_string()).content_uri().as_deref(),
            Some("content://media/1a2b-3c4d/audio/media")
        );
    }

    #[test]
    fn test_fixed_endpoint_has_no_volume_of_its_own() {
        let endpoint = EndpointRef::Fixed(NonZeroU32::new(5).unwrap());
        assert_eq!(endpoint.volume_name(), None);
        assert_eq!(endpoint.content_uri(), None);
        assert_eq!(endpoint.to_string(), "fixed endpoint 5");
    }
}
