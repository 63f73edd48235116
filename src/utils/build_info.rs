/// Version and build details shown by the shell's `version` command.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub revision: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

impl BuildMetadata {
    pub fn summary(&self) -> String {
        format!(
            "subtrack {} ({} {} {}, built {})",
            self.version, self.revision, self.target, self.profile, self.timestamp
        )
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        revision: option_env!("SUBTRACK_BUILD_REVISION").unwrap_or("unknown"),
        timestamp: option_env!("SUBTRACK_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("SUBTRACK_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("SUBTRACK_BUILD_PROFILE").unwrap_or("unknown"),
    }
}
