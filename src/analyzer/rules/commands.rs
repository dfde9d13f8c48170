//! Shell command matchers shared by the rules.
//!
//! All patterns are compiled once on first use and never rebuilt.

use once_cell::sync::Lazy;
use regex::Regex;

/// Package managers the rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Apt,
    Yum,
    Apk,
    Npm,
    Pip,
}

impl PackageManager {
    /// Command name used in messages.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Yum => "yum",
            Self::Apk => "apk",
            Self::Npm => "npm",
            Self::Pip => "pip",
        }
    }

    /// Cleanup step that keeps the package cache out of the layer.
    pub fn cleanup_hint(&self) -> &'static str {
        match self {
            Self::Apt => "rm -rf /var/lib/apt/lists/*",
            Self::Yum => "yum clean all",
            Self::Apk => "--no-cache",
            Self::Npm => "npm cache clean --force",
            Self::Pip => "--no-cache-dir",
        }
    }

    /// Whether the cleanup hint is a flag of the install command rather than a trailing step.
    pub fn cleanup_is_flag(&self) -> bool {
        matches!(self, Self::Apk | Self::Pip)
    }
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static INSTALL_PATTERNS: Lazy<Vec<(PackageManager, Regex)>> = Lazy::new(|| {
    vec![
        (PackageManager::Apt, regex(r"\bapt(?:-get)?\s+(?:-\S+\s+)*install\b")),
        (PackageManager::Yum, regex(r"\b(?:yum|dnf|microdnf)\s+(?:-\S+\s+)*install\b")),
        (PackageManager::Apk, regex(r"\bapk\s+(?:-\S+\s+)*add\b")),
        (PackageManager::Npm, regex(r"\bnpm\s+(?:install|ci|i)\b")),
        (PackageManager::Pip, regex(r"\bpip3?\s+install\b")),
    ]
});

static UPDATE_PATTERNS: Lazy<Vec<(PackageManager, Regex)>> = Lazy::new(|| {
    vec![
        (PackageManager::Apt, regex(r"\bapt(?:-get)?\s+(?:-\S+\s+)*update\b")),
        (PackageManager::Yum, regex(r"\b(?:yum|dnf|microdnf)\s+(?:-\S+\s+)*(?:update|makecache)\b")),
        (PackageManager::Apk, regex(r"\bapk\s+(?:-\S+\s+)*update\b")),
    ]
});

static CLEANUP_MARKER: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"rm\s+-(?:rf|fr)\b|apt-get\s+clean|(?:yum|dnf)\s+clean\s+all|cache\s+clean|--no-cache(?:-dir)?\b|--mount=type=cache",
    )
});

/// Arguments of a package install, up to the next shell operator.
static INSTALL_ARGS: Lazy<Regex> = Lazy::new(|| {
    regex(r"\b(?:apt(?:-get)?|yum|dnf|microdnf|apk|pip3?|npm)\s+(?:-\S+\s+)*(?:install|add|ci|i)\b([^&;|]*)")
});

/// Packages that only matter at build time.
const BUILD_TOOLS: &[&str] = &["build-essential", "build-base", "gcc", "g++", "make", "cmake"];

static JS_INSTALL: Lazy<Regex> = Lazy::new(|| {
    regex(r"\bnpm\s+(?:install|ci|i)\b|\byarn(?:\s+install\b|\s*$|\s*&&|\s*;|\s+--)")
});

/// Package managers with an install command in `cmd`, in table order.
pub fn install_managers(cmd: &str) -> Vec<PackageManager> {
    INSTALL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(cmd))
        .map(|(pm, _)| *pm)
        .collect()
}

/// Check for an install command of a specific manager.
pub fn has_install_for(cmd: &str, manager: PackageManager) -> bool {
    INSTALL_PATTERNS
        .iter()
        .any(|(pm, re)| *pm == manager && re.is_match(cmd))
}

/// End offset of the first install command of `manager`, used to insert flags.
pub fn install_match_end(cmd: &str, manager: PackageManager) -> Option<usize> {
    INSTALL_PATTERNS
        .iter()
        .find(|(pm, _)| *pm == manager)
        .and_then(|(_, re)| re.find(cmd))
        .map(|m| m.end())
}

/// Package managers with an index-refresh (`update`) command in `cmd`.
pub fn update_managers(cmd: &str) -> Vec<PackageManager> {
    UPDATE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(cmd))
        .map(|(pm, _)| *pm)
        .collect()
}

/// Check for a cache cleanup marker anywhere in the instruction text.
pub fn has_cleanup(cmd: &str) -> bool {
    CLEANUP_MARKER.is_match(cmd)
}

/// Package names passed to install commands in `cmd`, flags excluded.
pub fn install_arguments(cmd: &str) -> Vec<&str> {
    INSTALL_ARGS
        .captures_iter(cmd)
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| m.as_str().split_whitespace())
        .filter(|token| !token.starts_with('-'))
        .collect()
}

/// Build-only tools installed by `cmd`, in order of appearance.
///
/// Version pins (`gcc=4:12.2.0`) are ignored. Running a tool is not installing it.
pub fn installed_build_tools(cmd: &str) -> Vec<&'static str> {
    let mut tools = Vec::new();
    for package in install_arguments(cmd) {
        let name = package.split('=').next().unwrap_or(package);
        if let Some(tool) = BUILD_TOOLS.iter().find(|t| **t == name) {
            if !tools.contains(tool) {
                tools.push(*tool);
            }
        }
    }
    tools
}

/// npm or yarn dependency install.
pub fn is_js_install(cmd: &str) -> bool {
    JS_INSTALL.is_match(cmd)
}

/// Number of `&&`-chained steps beyond the first.
pub fn chained_steps(cmd: &str) -> usize {
    cmd.matches("&&").count()
}
