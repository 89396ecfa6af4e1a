//! Built-in intent rule table
//!
//! Single source of truth for keyword dispatch, replacing per-screen ad hoc
//! keyword checks. Sentiment rules run before literal feature rules: a user
//! saying they feel lonely while mentioning medication should get a caring
//! conversation, not the medication screen.
//!
//! Keywords may be written in Traditional Chinese; the router folds both
//! rules and input through the same normalization.

use super::{IntentRule, PriorityGroup, RuleTarget, ScreenId};

/// The built-in ordered rule table
#[must_use]
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        // -- Sentiment: caring engagement beats literal navigation --
        IntentRule {
            name: "loneliness",
            keywords: &[
                "孤單",
                "孤独",
                "寂寞",
                "冇人陪",
                "得我一個",
                "lonely",
                "alone",
                "by myself",
            ],
            target: RuleTarget::Assistant,
            group: PriorityGroup::Sentiment,
        },
        IntentRule {
            name: "sadness",
            keywords: &[
                "唔開心",
                "不開心",
                "傷心",
                "難過",
                "心情差",
                "想喊",
                "sad",
                "unhappy",
                "upset",
                "depressed",
                "miss",
            ],
            target: RuleTarget::Assistant,
            group: PriorityGroup::Sentiment,
        },
        IntentRule {
            name: "distress",
            keywords: &[
                "好驚",
                "害怕",
                "擔心",
                "煩惱",
                "worried",
                "scared",
                "afraid",
                "anxious",
            ],
            target: RuleTarget::Assistant,
            group: PriorityGroup::Sentiment,
        },
        IntentRule {
            name: "joy",
            keywords: &["開心", "高興", "快樂", "happy", "glad", "delighted"],
            target: RuleTarget::Assistant,
            group: PriorityGroup::Sentiment,
        },
        // -- Domain: first matching set wins --
        IntentRule {
            name: "medication",
            keywords: &[
                "用藥",
                "藥物",
                "食藥",
                "藥丸",
                "medication",
                "medicine",
                "pill",
            ],
            target: RuleTarget::Screen(ScreenId::Medication),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "health-data",
            keywords: &[
                "血壓",
                "血糖",
                "心率",
                "體重",
                "數據",
                "blood pressure",
                "blood sugar",
                "heart rate",
                "health data",
            ],
            target: RuleTarget::Screen(ScreenId::HealthData),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "knowledge",
            keywords: &["知識", "健康貼士", "文章", "knowledge", "health tips", "article"],
            target: RuleTarget::Screen(ScreenId::Knowledge),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "contacts",
            keywords: &[
                "醫生",
                "電話",
                "問診",
                "家人",
                "聯絡",
                "doctor",
                "phone",
                "contact",
                "family",
                "nurse",
            ],
            target: RuleTarget::Screen(ScreenId::Contacts),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "emergency",
            keywords: &[
                "緊急",
                "求助",
                "救命",
                "急救",
                "sos",
                "emergency",
                "urgent",
                "help me",
            ],
            target: RuleTarget::Emergency,
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "recipe",
            keywords: &["菜譜", "食譜", "煮咩", "今日食乜", "recipe", "cook", "meal"],
            target: RuleTarget::Screen(ScreenId::Recipe),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "risk-prediction",
            keywords: &["風險", "預測", "risk", "prediction", "forecast"],
            target: RuleTarget::Screen(ScreenId::RiskPrediction),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "settings",
            keywords: &["設置", "設定", "字體", "settings", "preferences", "font size"],
            target: RuleTarget::Screen(ScreenId::Settings),
            group: PriorityGroup::Domain,
        },
        IntentRule {
            name: "dashboard",
            keywords: &["主頁", "首頁", "返回", "home", "dashboard", "main page"],
            target: RuleTarget::Screen(ScreenId::Dashboard),
            group: PriorityGroup::Domain,
        },
    ]
}
