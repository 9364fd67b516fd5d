//! Version command

use crate::cli::VersionArgs;
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Build metadata baked in by build.rs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: Option<&'static str>,
}

impl BuildInfo {
    pub const CURRENT: BuildInfo = BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_SHA"),
        build_date: option_env!("BUILD_DATE"),
        target: option_env!("TARGET"),
    };
}

/// One line: `auditbucket <version> [(<commit>)] [<target>]`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(commit) = self.commit {
            write!(f, " ({})", commit)?;
        }
        if let Some(target) = self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = BuildInfo::CURRENT;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info);
    let details = [
        ("Commit", info.commit),
        ("Build date", info.build_date),
        ("Target", info.target),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("{:<11} {}", format!("{}:", label), value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(commit: Option<&'static str>, target: Option<&'static str>) -> BuildInfo {
        BuildInfo {
            name: "auditbucket",
            version: "1.2.3",
            commit,
            build_date: None,
            target,
        }
    }

    #[test]
    fn test_current_version_is_valid_semver() {
        let version = BuildInfo::CURRENT.version;
        assert!(
            semver::Version::parse(version).is_ok(),
            "version should be valid semver, got: {}",
            version
        );
        assert_eq!(BuildInfo::CURRENT.name, "auditbucket");
    }

    #[test]
    fn test_display_with_commit_and_target() {
        let info = info(Some("abc1234"), Some("x86_64-unknown-linux-gnu"));
        assert_eq!(
            info.to_string(),
            "auditbucket 1.2.3 (abc1234) x86_64-unknown-linux-gnu"
        );
    }

    #[test]
    fn test_display_without_optional_fields() {
        assert_eq!(info(None, None).to_string(), "auditbucket 1.2.3");
    }
}
