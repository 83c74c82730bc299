//! Type definitions for update records

use std::fmt;

use serde::{Deserialize, Serialize};

/// Artix repository a package currently lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtixRepo {
    System,
    SystemGremlins,
    SystemGoblins,
    World,
    WorldGremlins,
    WorldGoblins,
    Galaxy,
    GalaxyGremlins,
    GalaxyGoblins,
    Lib32,
    Lib32Gremlins,
    Lib32Goblins,
    /// Tag outside the known set, kept verbatim (empty when the column was missing)
    Unrecognized(String),
}

impl ArtixRepo {
    /// Map a raw column value to a repository tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "system" => ArtixRepo::System,
            "system-gremlins" => ArtixRepo::SystemGremlins,
            "system-goblins" => ArtixRepo::SystemGoblins,
            "world" => ArtixRepo::World,
            "world-gremlins" => ArtixRepo::WorldGremlins,
            "world-goblins" => ArtixRepo::WorldGoblins,
            "galaxy" => ArtixRepo::Galaxy,
            "galaxy-gremlins" => ArtixRepo::GalaxyGremlins,
            "galaxy-goblins" => ArtixRepo::GalaxyGoblins,
            "lib32" => ArtixRepo::Lib32,
            "lib32-gremlins" => ArtixRepo::Lib32Gremlins,
            "lib32-goblins" => ArtixRepo::Lib32Goblins,
            other => ArtixRepo::Unrecognized(other.to_string()),
        }
    }

    /// Tag as printed by the scanner
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ArtixRepo::System => "system",
            ArtixRepo::SystemGremlins => "system-gremlins",
            ArtixRepo::SystemGoblins => "system-goblins",
            ArtixRepo::World => "world",
            ArtixRepo::WorldGremlins => "world-gremlins",
            ArtixRepo::WorldGoblins => "world-goblins",
            ArtixRepo::Galaxy => "galaxy",
            ArtixRepo::GalaxyGremlins => "galaxy-gremlins",
            ArtixRepo::GalaxyGoblins => "galaxy-goblins",
            ArtixRepo::Lib32 => "lib32",
            ArtixRepo::Lib32Gremlins => "lib32-gremlins",
            ArtixRepo::Lib32Goblins => "lib32-goblins",
            ArtixRepo::Unrecognized(tag) => tag,
        }
    }

    /// Whether the tag is one of the known Artix repositories
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ArtixRepo::Unrecognized(_))
    }
}

impl From<String> for ArtixRepo {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ArtixRepo> for String {
    fn from(repo: ArtixRepo) -> Self {
        match repo {
            ArtixRepo::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ArtixRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arch repository the upstream version comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArchRepo {
    Core,
    CoreTesting,
    CoreStaging,
    Extra,
    ExtraTesting,
    ExtraStaging,
    Multilib,
    MultilibTesting,
    MultilibStaging,
    /// Tag outside the known set, kept verbatim (empty when the column was missing)
    Unrecognized(String),
}

impl ArchRepo {
    /// Map a raw column value to a repository tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "core" => ArchRepo::Core,
            "core-testing" => ArchRepo::CoreTesting,
            "core-staging" => ArchRepo::CoreStaging,
            "extra" => ArchRepo::Extra,
            "extra-testing" => ArchRepo::ExtraTesting,
            "extra-staging" => ArchRepo::ExtraStaging,
            "multilib" => ArchRepo::Multilib,
            "multilib-testing" => ArchRepo::MultilibTesting,
            "multilib-staging" => ArchRepo::MultilibStaging,
            other => ArchRepo::Unrecognized(other.to_string()),
        }
    }

    /// Tag as printed by the scanner
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ArchRepo::Core => "core",
            ArchRepo::CoreTesting => "core-testing",
            ArchRepo::CoreStaging => "core-staging",
            ArchRepo::Extra => "extra",
            ArchRepo::ExtraTesting => "extra-testing",
            ArchRepo::ExtraStaging => "extra-staging",
            ArchRepo::Multilib => "multilib",
            ArchRepo::MultilibTesting => "multilib-testing",
            ArchRepo::MultilibStaging => "multilib-staging",
            ArchRepo::Unrecognized(tag) => tag,
        }
    }

    /// Whether the tag is one of the known Arch repositories
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ArchRepo::Unrecognized(_))
    }
}

impl From<String> for ArchRepo {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ArchRepo> for String {
    fn from(repo: ArchRepo) -> Self {
        match repo {
            ArchRepo::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ArchRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One package the scanner reported as upgradable or movable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Package basename
    pub basename: String,
    /// Artix repository holding the package
    pub source_repository: ArtixRepo,
    /// Version in the Artix repository
    pub source_version: String,
    /// Matching Arch repository
    pub target_repository: ArchRepo,
    /// Version in the Arch repository
    pub target_version: String,
    /// Last packager of record
    pub packager: String,
}

impl UpdateRecord {
    /// First repository column that is not a known tag, if any
    #[must_use]
    pub fn unrecognized_repository(&self) -> Option<&str> {
        if !self.source_repository.is_recognized() {
            Some(self.source_repository.as_str())
        } else if !self.target_repository.is_recognized() {
            Some(self.target_repository.as_str())
        } else {
            None
        }
    }
}

/// Update-checking strategy, passed to the scanner as its only argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Packages with a newer upstream version (`-u`)
    Upgradable,
    /// Packages that moved between upstream repositories (`-m`)
    Movable,
    /// Loosely matched moves (`-ml`)
    LooseMovable,
}

impl FetchMode {
    /// Command-line flag selecting this mode
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            FetchMode::Upgradable => "-u",
            FetchMode::Movable => "-m",
            FetchMode::LooseMovable => "-ml",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Upgradable => write!(f, "upgradable"),
            FetchMode::Movable => write!(f, "movable"),
            FetchMode::LooseMovable => write!(f, "loose-movable"),
        }
    }
}
