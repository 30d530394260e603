pub mod config;
pub mod exit_codes;
pub mod filter;
pub mod inline_config;
pub mod lint_context;
pub mod mdast;
pub mod position;
pub mod rule;
pub mod rules;

pub use rules::*;

pub use crate::lint_context::LintContext;
pub use crate::rule::{LintError, LintResult, LintWarning, Rule};

use crate::config::{Config, ConfigError, RuleLevel, RuleSetting};
use crate::inline_config::ZoneTable;
use std::panic::{self, AssertUnwindSafe};

/// A rule together with its configured setting.
///
/// `setting` is `None` when the rule is not mentioned in the configuration,
/// which means "on, with the rule's default option".
#[derive(Clone)]
pub struct RuleRegistration {
    pub rule: Box<dyn Rule>,
    pub setting: Option<RuleSetting>,
}

impl RuleRegistration {
    pub fn new(rule: Box<dyn Rule>) -> Self {
        Self { rule, setting: None }
    }

    pub fn with_setting(rule: Box<dyn Rule>, setting: RuleSetting) -> Self {
        Self {
            rule,
            setting: Some(setting),
        }
    }

    pub fn id(&self) -> &'static str {
        self.rule.name()
    }

    /// Turned off in configuration; such a rule is never invoked
    pub fn is_off(&self) -> bool {
        self.setting.as_ref().is_some_and(RuleSetting::is_off)
    }

    /// Whether the rule is enabled where no marker says otherwise
    pub fn default_enabled(&self, reset: bool) -> bool {
        match &self.setting {
            Some(setting) => !setting.is_off(),
            None => !reset,
        }
    }

    fn option(&self) -> Option<&toml::Value> {
        self.setting.as_ref().and_then(|setting| setting.option.as_ref())
    }

    fn level(&self) -> RuleLevel {
        self.setting.as_ref().map_or(RuleLevel::Warn, |setting| setting.level)
    }
}

/// Runs a set of registered rules over documents
#[derive(Clone)]
pub struct Linter {
    registrations: Vec<RuleRegistration>,
    reset: bool,
    marker_name: String,
}

impl Linter {
    /// Rules with their default settings
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            registrations: rules.into_iter().map(RuleRegistration::new).collect(),
            reset: false,
            marker_name: inline_config::DEFAULT_MARKER_NAME.to_string(),
        }
    }

    /// All built-in rules, configured by `config`
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let known = rules::rule_ids();
        for warning in config::validate_config(config, &known) {
            log::warn!("{}", warning.message);
        }

        let mut registrations = Vec::new();
        for rule in rules::all_rules() {
            let registration = match config.rule_setting(rule.name())? {
                Some(setting) => RuleRegistration::with_setting(rule, setting),
                None => RuleRegistration::new(rule),
            };
            registrations.push(registration);
        }

        Ok(Self {
            registrations,
            reset: config.global.reset,
            marker_name: config.global.marker_name.clone(),
        })
    }

    /// Rules are disabled unless explicitly configured
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Comment name recognised by markers, `lint` by default
    pub fn with_marker_name(mut self, marker_name: impl Into<String>) -> Self {
        self.marker_name = marker_name.into();
        self
    }

    /// Add a rule, replacing any registration with the same id
    pub fn register(&mut self, rule: Box<dyn Rule>, setting: Option<RuleSetting>) {
        self.registrations.retain(|r| r.id() != rule.name());
        self.registrations.push(RuleRegistration { rule, setting });
    }

    pub fn registrations(&self) -> &[RuleRegistration] {
        &self.registrations
    }

    /// Parse and lint one document
    pub fn lint(&self, content: &str) -> Vec<LintWarning> {
        let ctx = LintContext::new(content);
        self.lint_context(&ctx)
    }

    /// Lint an already parsed document.
    ///
    /// Markers are read first, then every rule that can be on somewhere in
    /// the document runs. Its warnings are tagged with its id, filtered
    /// against gaps and marker ranges, then sorted.
    pub fn lint_context(&self, ctx: &LintContext) -> Vec<LintWarning> {
        let defaults: Vec<(&str, bool)> = self
            .registrations
            .iter()
            .map(|r| (r.id(), r.default_enabled(self.reset)))
            .collect();
        let mut zones = ZoneTable::from_tree(&ctx.tree, &self.marker_name, &defaults);
        let mut warnings = zones.take_errors();

        for registration in &self.registrations {
            let id = registration.id();
            if registration.is_off() {
                log::debug!("Skipping rule {id}: turned off");
                continue;
            }
            if !registration.default_enabled(self.reset) && !zones.is_ever_enabled(id) {
                log::debug!("Skipping rule {id}: not enabled by reset configuration or markers");
                continue;
            }

            match run_rule(registration, ctx) {
                Ok(rule_warnings) => {
                    log::debug!("Rule {id} produced {} warnings", rule_warnings.len());
                    let fatal = registration.level() == RuleLevel::Error;
                    warnings.extend(rule_warnings.into_iter().map(|warning| {
                        let warning = warning.with_rule_name(id);
                        if fatal { warning.fatal() } else { warning }
                    }));
                }
                Err(e) => {
                    log::error!("Error checking rule {id}: {e}");
                    warnings.push(e.into_warning().with_rule_name(id));
                }
            }
        }

        let gaps = filter::compute_gaps(&ctx.tree, ctx.content);
        let mut warnings = filter::filter_warnings(warnings, &zones, &gaps, &ctx.line_index);
        filter::sort_warnings(&mut warnings);
        warnings
    }
}

/// Run one rule, turning a panic in its body into a fatal error at 1:1
fn run_rule(registration: &RuleRegistration, ctx: &LintContext) -> LintResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| registration.rule.check(ctx, registration.option())));
    outcome.unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(LintError::Fatal {
            message: format!("Rule panicked: {reason}"),
            line: 1,
            column: 1,
        })
    })
}

impl Default for Linter {
    /// Every built-in rule with default settings
    fn default() -> Self {
        Self::new(rules::all_rules())
    }
}

/// Lint `content` with `linter`, returning the final sorted warnings
pub fn lint(content: &str, linter: &Linter) -> Vec<LintWarning> {
    linter.lint(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Failing;

    impl Rule for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        fn check(&self, ctx: &LintContext, _option: Option<&toml::Value>) -> LintResult {
            Err(LintError::at_node(&ctx.tree, "boom"))
        }
    }

    #[derive(Clone)]
    struct Panicking;

    impl Rule for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn description(&self) -> &'static str {
            "Always panics"
        }

        fn check(&self, _ctx: &LintContext, _option: Option<&toml::Value>) -> LintResult {
            panic!("rule bug")
        }
    }

    #[test]
    fn test_warnings_are_tagged() {
        let warnings = Linter::default().lint("# Venus\n\n# Mercury\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule_name.as_deref(), Some("no-multiple-toplevel-headings"));
    }

    #[test]
    fn test_failing_rule_is_isolated() {
        let mut linter = Linter::default();
        linter.register(Box::new(Failing), None);
        let warnings = linter.lint("# Venus\n\n# Mercury\n");

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].rule_name.as_deref(), Some("failing"));
        assert!(warnings[0].fatal);
        assert_eq!((warnings[0].line, warnings[0].column), (1, 1));
        assert_eq!(warnings[1].rule_name.as_deref(), Some("no-multiple-toplevel-headings"));
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let mut linter = Linter::default();
        linter.register(Box::new(Panicking), None);
        let warnings = linter.lint("# Venus\n\n# Mercury\n");

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].rule_name.as_deref(), Some("panicking"));
        assert!(warnings[0].fatal);
        assert_eq!((warnings[0].line, warnings[0].column), (1, 1));
        assert_eq!(warnings[0].message, "Rule panicked: rule bug");
        assert_eq!(warnings[1].rule_name.as_deref(), Some("no-multiple-toplevel-headings"));
        assert_eq!((warnings[1].line, warnings[1].column), (3, 1));
    }

    #[test]
    fn test_off_rules_never_run() {
        let mut linter = Linter::new(Vec::new());
        linter.register(Box::new(Failing), Some(RuleSetting::off()));
        assert!(linter.lint("text\n").is_empty());
    }

    #[test]
    fn test_error_level_marks_warnings_fatal() {
        let mut linter = Linter::new(Vec::new());
        linter.register(
            Box::new(rules::NoMultipleToplevelHeadings),
            Some(RuleSetting {
                level: RuleLevel::Error,
                option: None,
            }),
        );
        let warnings = linter.lint("# Venus\n\n# Mercury\n");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].fatal);
    }

    #[test]
    fn test_default_enabled() {
        let registration = RuleRegistration::new(Box::new(Failing));
        assert!(registration.default_enabled(false));
        assert!(!registration.default_enabled(true));

        let configured = RuleRegistration::with_setting(
            Box::new(Failing),
            RuleSetting {
                level: RuleLevel::Warn,
                option: None,
            },
        );
        assert!(configured.default_enabled(true));
    }
}
