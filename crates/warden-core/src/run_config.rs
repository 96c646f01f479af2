use anyhow::{anyhow, bail, Result};

pub const DEFAULT_THRESHOLD_DAYS: u64 = 21;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid --repo '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid --repo '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Simulate,
    Apply,
}

impl RunMode {
    pub fn is_apply(&self) -> bool {
        matches!(self, Self::Apply)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simulate => "simulate",
            Self::Apply => "apply",
        }
    }
}

/// Parse the execution-mode flag: case-insensitive `true`/`1` enables apply
/// mode; `false`/`0`, absence, and anything ambiguous stay simulate-safe.
pub fn parse_apply_flag(raw: Option<&str>) -> RunMode {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if value == "true" || value == "1" => RunMode::Apply,
        _ => RunMode::Simulate,
    }
}

#[derive(Debug, Clone)]
/// Immutable per-run configuration, constructed once at process start and
/// passed into every component; no ambient globals.
pub struct RunConfig {
    pub repo: RepoRef,
    pub threshold_days: u64,
    pub mode: RunMode,
}

#[cfg(test)]
mod tests {
    use super::{parse_apply_flag, RepoRef, RunMode};

    #[test]
    fn unit_repo_ref_parse_accepts_owner_slash_name() {
        let repo = RepoRef::parse(" owner/name ").expect("valid slug");
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.name, "name");
        assert_eq!(repo.as_slug(), "owner/name");
    }

    #[test]
    fn regression_repo_ref_parse_rejects_malformed_slugs() {
        for raw in ["owner", "/name", "owner/", "owner/name/extra"] {
            let error = RepoRef::parse(raw).expect_err("malformed slug should fail");
            assert!(error.to_string().contains("expected owner/repo"), "{raw}");
        }
    }

    #[test]
    fn functional_parse_apply_flag_is_case_insensitive_and_simulate_safe() {
        assert_eq!(parse_apply_flag(Some("true")), RunMode::Apply);
        assert_eq!(parse_apply_flag(Some("TRUE")), RunMode::Apply);
        assert_eq!(parse_apply_flag(Some("1")), RunMode::Apply);
        assert_eq!(parse_apply_flag(Some("false")), RunMode::Simulate);
        assert_eq!(parse_apply_flag(Some("0")), RunMode::Simulate);
        assert_eq!(parse_apply_flag(Some("yes")), RunMode::Simulate);
        assert_eq!(parse_apply_flag(None), RunMode::Simulate);
    }
}
