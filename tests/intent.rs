//! Intent router tests
//!
//! Priority ordering, determinism, script equivalence, and the serialized
//! action boundary.

use carevoice::{Intent, IntentRouter, ScreenId};

fn navigate(screen: ScreenId) -> Intent {
    Intent::Navigate { screen }
}

#[test]
fn sentiment_wins_over_literal_keywords() {
    let router = IntentRouter::new();

    // "family" would hit the contacts rule, but the joy phrasing wins
    let intent = router.classify("我好開心，同家人傾計");
    assert_eq!(
        intent,
        Intent::OpenAssistant {
            context: "我好開心，同家人傾計".to_string()
        }
    );

    // Loneliness over a literal medication keyword
    let intent = router.classify("I feel alone, I miss my medication sometimes");
    assert!(matches!(intent, Intent::OpenAssistant { .. }));
}

#[test]
fn domain_keywords_navigate() {
    let router = IntentRouter::new();

    assert_eq!(router.classify("blood pressure"), navigate(ScreenId::HealthData));
    assert_eq!(router.classify("記錄血壓"), navigate(ScreenId::HealthData));
    assert_eq!(router.classify("開啟用藥提醒"), navigate(ScreenId::Medication));
    assert_eq!(router.classify("查看健康知識"), navigate(ScreenId::Knowledge));
    assert_eq!(router.classify("打電話畀醫生"), navigate(ScreenId::Contacts));
    assert_eq!(router.classify("查看菜譜"), navigate(ScreenId::Recipe));
    assert_eq!(router.classify("睇下風險預測"), navigate(ScreenId::RiskPrediction));
    assert_eq!(router.classify("打開設置"), navigate(ScreenId::Settings));
    assert_eq!(router.classify("take me home"), navigate(ScreenId::Dashboard));
}

#[test]
fn emergency_phrases_trigger_emergency() {
    let router = IntentRouter::new();

    assert_eq!(router.classify("緊急求助"), Intent::TriggerEmergency);
    assert_eq!(router.classify("sos"), Intent::TriggerEmergency);
    assert_eq!(router.classify("SOS"), Intent::TriggerEmergency);
    assert_eq!(router.classify("救命呀"), Intent::TriggerEmergency);
}

#[test]
fn unmatched_text_defaults_to_dashboard() {
    let router = IntentRouter::new();

    assert_eq!(router.classify(""), navigate(ScreenId::Dashboard));
    assert_eq!(router.classify("今日天氣點樣"), navigate(ScreenId::Dashboard));

    let matched = router.classify_detailed("今日天氣點樣");
    assert!(matched.rule.is_none());
}

#[test]
fn matched_rule_is_reported() {
    let router = IntentRouter::new();

    let matched = router.classify_detailed("記錄血壓");
    assert_eq!(matched.rule.map(|r| r.name), Some("health-data"));

    let matched = router.classify_detailed("我好孤單");
    assert_eq!(matched.rule.map(|r| r.name), Some("loneliness"));
}

#[test]
fn traditional_and_simplified_are_equivalent() {
    let router = IntentRouter::new();

    assert_eq!(router.classify("用藥提醒"), router.classify("用药提醒"));
    assert_eq!(router.classify("查看菜譜"), router.classify("查看菜谱"));
    assert_eq!(router.classify("緊急求助"), router.classify("紧急求助"));
    assert_eq!(router.classify("風險預測"), router.classify("风险预测"));
}

#[test]
fn first_matching_domain_set_wins() {
    let router = IntentRouter::new();

    // Contains both medication and knowledge keywords; medication is listed first
    assert_eq!(router.classify("用藥知識"), navigate(ScreenId::Medication));
}

#[test]
fn classification_is_deterministic() {
    let router = IntentRouter::new();
    let inputs = [
        "記錄血壓",
        "我好開心",
        "sos",
        "",
        "something unmatched entirely",
    ];

    for input in inputs {
        assert_eq!(router.classify(input), router.classify(input));
    }
}

#[test]
fn intents_serialize_as_opaque_action_tokens() {
    let intent = Intent::Navigate {
        screen: ScreenId::HealthData,
    };
    assert_eq!(
        serde_json::to_value(&intent).unwrap(),
        serde_json::json!({"action": "navigate", "screen": "health-data"})
    );

    assert_eq!(
        serde_json::to_value(Intent::TriggerEmergency).unwrap(),
        serde_json::json!({"action": "trigger-emergency"})
    );

    let intent = Intent::OpenAssistant {
        context: "我好孤單".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&intent).unwrap(),
        serde_json::json!({"action": "open-assistant", "context": "我好孤單"})
    );
}
