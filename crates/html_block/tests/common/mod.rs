#![allow(dead_code)]

use html_block::BlockErrorKind;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const GOLDEN_FORMAT_V1: &str = "html-block-golden-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GoldenManifest {
    pub format: String,
    #[serde(rename = "case")]
    pub cases: Vec<GoldenCase>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GoldenCase {
    pub id: String,
    pub input: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub trailing: Option<String>,
    #[serde(default)]
    pub first_tag: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("blocks.toml")
}

pub fn load_golden_cases() -> Vec<GoldenCase> {
    let path = fixture_path();
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read golden fixtures {path:?}: {err}"));
    let manifest: GoldenManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse golden fixtures {path:?}: {err}"));
    assert_eq!(
        manifest.format, GOLDEN_FORMAT_V1,
        "unsupported golden fixture format in {path:?}"
    );
    for case in &manifest.cases {
        match (&case.html, &case.error) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => panic!(
                "golden case '{}' must set exactly one of `html` or `error`",
                case.id
            ),
        }
    }
    let mut ids: Vec<_> = manifest.cases.iter().map(|case| case.id.as_str()).collect();
    ids.sort_unstable();
    if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
        panic!("duplicate golden case id '{}'", pair[0]);
    }
    manifest.cases
}

/// Kebab-case label used for error kinds in fixtures.
pub fn error_label(kind: &BlockErrorKind) -> &'static str {
    match kind {
        BlockErrorKind::MalformedMarkup => "malformed-markup",
        BlockErrorKind::UnbalancedClose { .. } => "unbalanced-close",
        BlockErrorKind::MismatchedClose { .. } => "mismatched-close",
        BlockErrorKind::UnexpectedEnd => "unexpected-end",
    }
}

pub struct CaseFilter {
    raw: Option<String>,
}

impl CaseFilter {
    pub fn from_env() -> Self {
        Self {
            raw: env::var("HTML_BLOCK_GOLDEN_CASE").ok(),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        let Some(filter) = &self.raw else {
            return true;
        };
        id.contains(filter)
    }
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => trimmed.parse::<u64>().ok(),
    };
    parsed.unwrap_or(default)
}
