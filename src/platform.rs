use std::fmt;

/// Detected operating system, used by mapping `target_os` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl Os {
    /// The OS this process is running on.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }

    /// Case-insensitive match against a user-supplied OS name.
    ///
    /// Accepts the common aliases that appear in dotfile configs
    /// (`darwin`/`osx` for macOS).
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match self {
            Self::Linux => name == "linux",
            Self::Macos => matches!(name.as_str(), "macos" | "darwin" | "osx"),
            Self::Windows => name == "windows",
            Self::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_a_known_variant() {
        // On any CI host this should resolve to a concrete OS.
        let os = Os::current();
        assert!(matches!(
            os,
            Os::Linux | Os::Macos | Os::Windows | Os::Other
        ));
    }

    #[test]
    fn matches_is_case_insensitive() {
        assert!(Os::Linux.matches("Linux"));
        assert!(Os::Linux.matches("LINUX"));
        assert!(!Os::Linux.matches("windows"));
    }

    #[test]
    fn macos_aliases() {
        assert!(Os::Macos.matches("darwin"));
        assert!(Os::Macos.matches("osx"));
        assert!(Os::Macos.matches("macOS"));
    }

    #[test]
    fn display_names() {
        assert_eq!(Os::Linux.to_string(), "linux");
        assert_eq!(Os::Windows.to_string(), "windows");
    }
}
