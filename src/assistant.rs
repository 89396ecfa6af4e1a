//! Canned conversational replies
//!
//! The assistant screen owns real conversation; this module supplies the
//! caring replies spoken when the router hands text over for engagement
//! rather than navigation, and the greetings used when routing a user into
//! the assistant.

use crate::intent::normalize;

/// Greetings spoken on arrival in the assistant
const ARRIVAL_GREETINGS: &[&str] = &[
    "您好呀！有咩可以幫到您？",
    "今日身體感覺點樣？",
    "記得按時食藥呀！",
    "要唔要我提醒您做運動？",
    "今日飲夠水未呀？",
];

/// Deterministic greeting pick; callers vary `seed` (e.g. a visit counter)
#[must_use]
pub fn arrival_greeting(seed: usize) -> &'static str {
    ARRIVAL_GREETINGS[seed % ARRIVAL_GREETINGS.len()]
}

/// Caring reply for free-form context handed over by the intent router
#[must_use]
pub fn caring_reply(context: &str) -> &'static str {
    let text = normalize(context);

    if contains_any(&text, &["孤单", "寂寞", "冇人陪", "lonely", "alone"]) {
        "我喺度陪住您呀。不如同我講下，您今日做咗啲咩？"
    } else if contains_any(&text, &["唔开心", "不开心", "伤心", "难过", "sad", "upset", "miss"]) {
        "聽到您唔開心，我好想幫到您。慢慢講，我喺度聽緊。"
    } else if contains_any(&text, &["开心", "高兴", "快乐", "happy", "glad"]) {
        "聽到您咁開心，我都好開心呀！同我分享多啲啦！"
    } else if contains_any(&text, &["用药", "药物", "食药", "medication", "medicine"]) {
        "記得按時食藥呀！您可以去用藥頁面，睇下今日仲有咩藥要食。"
    } else if contains_any(&text, &["血糖", "血压", "blood sugar", "blood pressure"]) {
        "管理血糖血壓，關鍵係定時測量、控制飲食同適量運動。您可以喺健康數據頁面記錄每日數值，我會幫您追蹤趨勢。"
    } else if contains_any(&text, &["紧急", "求助", "救命", "emergency", "help"]) {
        "如果情況緊急，請即刻撳紅色緊急求助掣，系統會立即通知您嘅家人同醫護人員。"
    } else if contains_any(&text, &["饮食", "食物", "食咩", "diet", "food"]) {
        "健康飲食建議：多菜少油鹽糖，揀全穀類食物，每日飲六至八杯水。"
    } else {
        "謝謝您同我傾偈！如果想要更專業嘅建議，我可以幫您聯絡醫生，或者一齊睇下健康知識。"
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loneliness_gets_company() {
        let reply = caring_reply("我好孤單，屋企得我一個");
        assert!(reply.contains("陪住您"));
    }

    #[test]
    fn medication_context_points_at_reminders() {
        let reply = caring_reply("I feel fine but sometimes forget my medication");
        assert!(reply.contains("用藥"));
    }

    #[test]
    fn joy_is_shared() {
        let reply = caring_reply("我好開心，同家人傾計");
        assert!(reply.contains("開心"));
    }

    #[test]
    fn unknown_context_gets_fallback() {
        let reply = caring_reply("天氣點樣");
        assert!(reply.contains("傾偈"));
    }

    #[test]
    fn greeting_is_deterministic_and_cycles() {
        assert_eq!(arrival_greeting(0), arrival_greeting(ARRIVAL_GREETINGS.len()));
        assert_ne!(arrival_greeting(0), arrival_greeting(1));
    }
}
