use anyhow::Result;
use std::io::Write;

/// Static build metadata. Commit and date are injected at build time through
/// `DOCKER_CLEANER_COMMIT` and `DOCKER_CLEANER_BUILD_DATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_date: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("DOCKER_CLEANER_COMMIT").unwrap_or("unknown"),
            build_date: option_env!("DOCKER_CLEANER_BUILD_DATE").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Docker Cleaner {}", self.version)?;
        writeln!(out, "Commit: {}", self.commit)?;
        writeln!(out, "Build Date: {}", self.build_date)?;
        writeln!(out, "Platform: {}/{}", self.os, self.arch)?;
        Ok(())
    }
}

pub fn run() -> Result<()> {
    BuildInfo::current().render(&mut std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let info = BuildInfo {
            version: "1.2.3",
            commit: "abc123",
            build_date: "2026-01-01",
            os: "linux",
            arch: "x86_64",
        };
        let mut out = Vec::new();
        info.render(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Docker Cleaner 1.2.3\nCommit: abc123\nBuild Date: 2026-01-01\nPlatform: linux/x86_64\n"
        );
    }

    #[test]
    fn test_current_uses_crate_version() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.commit.is_empty());
    }
}
