//! Text-to-action intent routing
//!
//! Maps free-form text (typed or recognized) to one action from a closed
//! vocabulary, via ordered rule evaluation over a single data-driven
//! keyword table. Classification is a pure function of the normalized
//! input and the static table: identical input always yields the same
//! action.

mod normalize;
mod rules;

pub use normalize::normalize;
pub use rules::default_rules;

use std::fmt;

use serde::Serialize;

/// Screens the router can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenId {
    /// Home dashboard
    Dashboard,
    /// Medication reminders
    Medication,
    /// Health data records
    HealthData,
    /// Health knowledge library
    Knowledge,
    /// Doctor/family contact list
    Contacts,
    /// Suggested recipes
    Recipe,
    /// Health risk prediction
    RiskPrediction,
    /// App settings
    Settings,
    /// Conversational assistant
    Assistant,
}

impl ScreenId {
    /// Stable identifier consumed by the navigation layer
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Medication => "medication",
            Self::HealthData => "health-data",
            Self::Knowledge => "knowledge",
            Self::Contacts => "contacts",
            Self::Recipe => "recipe",
            Self::RiskPrediction => "risk-prediction",
            Self::Settings => "settings",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action produced by the router — an opaque token for the owning screen;
/// rendering concerns never cross this boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Intent {
    /// Navigate to a screen
    Navigate {
        /// Target screen
        screen: ScreenId,
    },
    /// Trigger the emergency flow
    TriggerEmergency,
    /// Open the assistant with the raw input as conversational context
    OpenAssistant {
        /// The user's original words, for a caring reply
        context: String,
    },
}

/// Rule priority; lower groups are evaluated first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityGroup {
    /// Emotional phrasing that deserves engagement, not literal navigation
    Sentiment,
    /// Literal feature keywords
    Domain,
}

/// What a matched rule resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    /// Hand the input to the assistant for a conversational reply
    Assistant,
    /// Navigate to a screen
    Screen(ScreenId),
    /// Trigger the emergency flow
    Emergency,
}

/// One keyword rule in the ordered table
#[derive(Debug, Clone)]
pub struct IntentRule {
    /// Rule name, used in logs
    pub name: &'static str,

    /// Keyword set; any member matching routes to `target`
    pub keywords: &'static [&'static str],

    /// Action the rule resolves to
    pub target: RuleTarget,

    /// Evaluation priority
    pub group: PriorityGroup,
}

/// Result of a classification, with the rule that produced it
#[derive(Debug, Clone)]
pub struct IntentMatch<'r> {
    /// The resolved action
    pub intent: Intent,

    /// Rule that matched; `None` for the dashboard fallback
    pub rule: Option<&'r IntentRule>,
}

/// A rule with its keywords pre-normalized
struct NormalizedRule {
    rule: IntentRule,
    keywords: Vec<String>,
}

/// Ordered keyword router
pub struct IntentRouter {
    rules: Vec<NormalizedRule>,
}

impl IntentRouter {
    /// Router over the built-in rule table
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(rules::default_rules())
    }

    /// Router over a custom table; rules keep their given order within each
    /// priority group
    #[must_use]
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        let mut rules: Vec<NormalizedRule> = rules
            .into_iter()
            .map(|rule| NormalizedRule {
                keywords: rule.keywords.iter().map(|k| normalize(k)).collect(),
                rule,
            })
            .collect();
        // Stable sort: sentiment ahead of domain, original order otherwise
        rules.sort_by_key(|r| r.rule.group);
        Self { rules }
    }

    /// Classify text into an action
    #[must_use]
    pub fn classify(&self, text: &str) -> Intent {
        self.classify_detailed(text).intent
    }

    /// Classify text, reporting which rule matched
    #[must_use]
    pub fn classify_detailed(&self, text: &str) -> IntentMatch<'_> {
        let normalized = normalize(text);

        for entry in &self.rules {
            let hit = entry
                .keywords
                .iter()
                .any(|k| !k.is_empty() && normalized.contains(k.as_str()));
            if hit {
                tracing::debug!(rule = entry.rule.name, "intent rule matched");
                let intent = match entry.rule.target {
                    RuleTarget::Assistant => Intent::OpenAssistant {
                        context: text.to_string(),
                    },
                    RuleTarget::Screen(screen) => Intent::Navigate { screen },
                    RuleTarget::Emergency => Intent::TriggerEmergency,
                };
                return IntentMatch {
                    intent,
                    rule: Some(&entry.rule),
                };
            }
        }

        tracing::debug!("no intent rule matched, defaulting to dashboard");
        IntentMatch {
            intent: Intent::Navigate {
                screen: ScreenId::Dashboard,
            },
            rule: None,
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_ids_are_stable() {
        assert_eq!(ScreenId::HealthData.as_str(), "health-data");
        assert_eq!(ScreenId::RiskPrediction.as_str(), "risk-prediction");
        assert_eq!(ScreenId::Dashboard.to_string(), "dashboard");
    }

    #[test]
    fn custom_rules_keep_group_priority() {
        let rules = vec![
            IntentRule {
                name: "literal",
                keywords: &["pressure"],
                target: RuleTarget::Screen(ScreenId::HealthData),
                group: PriorityGroup::Domain,
            },
            IntentRule {
                name: "feeling",
                keywords: &["pressure"],
                target: RuleTarget::Assistant,
                group: PriorityGroup::Sentiment,
            },
        ];
        let router = IntentRouter::with_rules(rules);
        // The sentiment rule wins even though it was listed second
        let matched = router.classify_detailed("so much pressure");
        assert_eq!(matched.rule.map(|r| r.name), Some("feeling"));
    }
}
