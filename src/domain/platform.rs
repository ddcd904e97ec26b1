use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHardware {
    pub operating_system: String,
    pub cpu: String,
    pub memory: String,
    pub storage: Vec<String>,
    pub graphics: String,
    pub sound: String,
    pub online_service: String,
    pub output: Vec<String>,
    pub supported_resolutions: Vec<String>,
    pub connectivity: Vec<String>,
}

/// A marketed hardware revision of a platform (slim models, dev kits, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformVersion {
    pub name: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMeta {
    pub name: String,
    pub description: String,
    pub alt_name: String,
    /// Company id in the source's taxonomy, not resolved here.
    pub manufacturer_id: u64,
    pub developers_id: u64,
    pub generation: String,
    pub platform_type: String,
    pub product_family: String,
    /// Kept verbatim, regional formats differ.
    pub release_dates: Vec<String>,
    pub introduction_price: Vec<String>,
    pub hardware: PlatformHardware,
    pub other_versions: Vec<PlatformVersion>,
}
