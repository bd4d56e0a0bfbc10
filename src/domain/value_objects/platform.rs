//! Platform value object - which OS family a node builds for

use serde::{Deserialize, Serialize};

/// Platform a node can be built for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "iOS")]
    Ios,
    #[serde(alias = "macOS")]
    Macos,
    #[serde(alias = "tvOS")]
    Tvos,
    #[serde(alias = "watchOS")]
    Watchos,
    #[serde(alias = "visionOS")]
    Visionos,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Ios,
        Platform::Macos,
        Platform::Tvos,
        Platform::Watchos,
        Platform::Visionos,
    ];

    /// SDK identifier used in generated build settings
    pub fn sdk_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iphoneos",
            Platform::Macos => "macosx",
            Platform::Tvos => "appletvos",
            Platform::Watchos => "watchos",
            Platform::Visionos => "xros",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Macos => "macOS",
            Platform::Tvos => "tvOS",
            Platform::Watchos => "watchOS",
            Platform::Visionos => "visionOS",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
