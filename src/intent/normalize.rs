//! Input normalization for keyword matching

/// Normalize text for rule matching: Unicode lowercase plus a
/// Traditional→Simplified Chinese character fold, so `用藥` and `用药` (or
/// `BLOOD PRESSURE` and `blood pressure`) hit the same keyword sets.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_traditional)
        .collect()
}

/// Traditional→Simplified fold covering the rule vocabulary and its common
/// neighbours. Characters shared by both scripts pass through.
const fn fold_traditional(c: char) -> char {
    match c {
        '藥' => '药',
        '壓' => '压',
        '數' => '数',
        '據' => '据',
        '識' => '识',
        '緊' => '紧',
        '醫' => '医',
        '電' => '电',
        '話' => '话',
        '風' => '风',
        '險' => '险',
        '預' => '预',
        '測' => '测',
        '譜' => '谱',
        '設' => '设',
        '頁' => '页',
        '聯' => '联',
        '絡' => '络',
        '體' => '体',
        '單' => '单',
        '獨' => '独',
        '傷' => '伤',
        '難' => '难',
        '過' => '过',
        '開' => '开',
        '啟' => '启',
        '興' => '兴',
        '樂' => '乐',
        '驚' => '惊',
        '擔' => '担',
        '煩' => '烦',
        '惱' => '恼',
        '問' => '问',
        '診' => '诊',
        '記' => '记',
        '錄' => '录',
        '飲' => '饮',
        '飯' => '饭',
        '幫' => '帮',
        '講' => '讲',
        '聽' => '听',
        '運' => '运',
        '動' => '动',
        '護' => '护',
        '師' => '师',
        '務' => '务',
        '愛' => '爱',
        '親' => '亲',
        '歡' => '欢',
        '個' => '个',
        '們' => '们',
        '頭' => '头',
        '熱' => '热',
        '腦' => '脑',
        '臟' => '脏',
        '鐘' => '钟',
        '時' => '时',
        '現' => '现',
        '發' => '发',
        '買' => '买',
        '貼' => '贴',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_traditional_to_simplified() {
        assert_eq!(normalize("用藥提醒"), "用药提醒");
        assert_eq!(normalize("記錄血壓"), "记录血压");
        assert_eq!(normalize("緊急求助"), "紧急求助");
    }

    #[test]
    fn simplified_passes_through() {
        assert_eq!(normalize("用药提醒"), "用药提醒");
    }

    #[test]
    fn lowercases_latin_text() {
        assert_eq!(normalize("BLOOD Pressure"), "blood pressure");
        assert_eq!(normalize("SOS"), "sos");
    }

    #[test]
    fn mixed_script_input() {
        assert_eq!(normalize("睇下AI風險預測"), "睇下ai风险预测");
    }
}
