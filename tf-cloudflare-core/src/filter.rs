//! Client-side post-filters applied to listed items

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use tf_cloudflare_api::{WafGroup, WafPackage};

/// Compile an optional name pattern. Absent or empty means "no filter".
pub fn compile_pattern(attribute: &str, pattern: Option<&str>) -> CoreResult<Option<Regex>> {
    match pattern.filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|source| CoreError::InvalidFilter {
                attribute: attribute.to_string(),
                source,
            }),
    }
}

/// Exact-match criterion; absent or empty accepts everything.
fn exact(expected: Option<&String>, actual: &str) -> bool {
    expected.is_none_or(|e| e.is_empty() || e == actual)
}

fn pattern(name: Option<&Regex>, actual: &str) -> bool {
    name.is_none_or(|re| re.is_match(actual))
}

/// Criteria for WAF rule groups.
#[derive(Debug, Clone, Default)]
pub struct WafGroupFilter {
    pub name: Option<Regex>,
    pub mode: Option<String>,
}

impl WafGroupFilter {
    /// Keep a group only if every present criterion passes.
    pub fn matches(&self, group: &WafGroup) -> bool {
        pattern(self.name.as_ref(), &group.name) && exact(self.mode.as_ref(), &group.mode)
    }
}

/// Criteria for WAF packages.
#[derive(Debug, Clone, Default)]
pub struct WafPackageFilter {
    pub name: Option<Regex>,
    pub detection_mode: Option<String>,
    pub sensitivity: Option<String>,
    pub action_mode: Option<String>,
}

impl WafPackageFilter {
    pub fn matches(&self, package: &WafPackage) -> bool {
        pattern(self.name.as_ref(), &package.name)
            && exact(self.detection_mode.as_ref(), &package.detection_mode)
            && exact(self.sensitivity.as_ref(), &package.sensitivity)
            && exact(self.action_mode.as_ref(), &package.action_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, name: &str, mode: &str) -> WafGroup {
        WafGroup {
            id: id.to_string(),
            name: name.to_string(),
            mode: mode.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_pattern_means_no_filter() {
        assert!(compile_pattern("filter.0.name", Some("")).unwrap().is_none());
        assert!(compile_pattern("filter.0.name", None).unwrap().is_none());
    }

    #[test]
    fn malformed_pattern_is_invalid_filter() {
        let err = compile_pattern("filter.0.name", Some("[unclosed")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilter { ref attribute, .. } if attribute == "filter.0.name"));
    }

    #[test]
    fn name_and_mode_both_apply() {
        let filter = WafGroupFilter {
            name: compile_pattern("name", Some("^bot")).unwrap(),
            mode: Some("on".to_string()),
        };
        assert!(filter.matches(&group("g1", "bot-detect", "on")));
        assert!(!filter.matches(&group("g2", "sql-inject", "off")));
        assert!(!filter.matches(&group("g3", "bot-block", "off")));
        // mode matches, name does not
        assert!(!filter.matches(&group("g4", "sql-inject", "on")));
    }

    #[test]
    fn pattern_is_unanchored_search() {
        let filter = WafGroupFilter {
            name: compile_pattern("name", Some("inject")).unwrap(),
            mode: None,
        };
        assert!(filter.matches(&group("g2", "sql-inject", "off")));
    }

    #[test]
    fn package_filter_exact_fields() {
        let package = WafPackage {
            id: "p1".to_string(),
            name: "OWASP ModSecurity Core Rule Set".to_string(),
            detection_mode: "anomaly".to_string(),
            sensitivity: "high".to_string(),
            action_mode: "challenge".to_string(),
            ..Default::default()
        };
        let filter = WafPackageFilter {
            name: compile_pattern("name", Some("OWASP")).unwrap(),
            detection_mode: Some("anomaly".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&package));

        let filter = WafPackageFilter {
            sensitivity: Some("low".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&package));
    }
}
