/*!
 * Deterministic post-processing for translated titles.
 *
 * Raw model output passes through five ordered correction passes:
 * glossary terms, timezone consistency, verb sense for literal "have"
 * renderings, cultural-context substitutions, and month-name
 * localization. Every pass is total: on no match the text falls
 * through unchanged.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Known mistranslations of proper nouns and fixed political/financial
/// terms, replaced wherever they occur. Keys are disjoint; more specific
/// forms are listed before shorter ones within a family.
static GLOSSARY_CORRECTIONS: &[(&str, &str)] = &[
    // People
    ("엘론 머스크", "일론 머스크"),
    ("엘론이", "일론이"),
    ("엘론의", "일론의"),
    ("엘론은", "일론은"),
    ("반스", "밴스"),
    ("젤렌스끼", "젤렌스키"),
    ("습근평", "시진핑"),
    ("주커버그", "저커버그"),
    ("알트만", "올트먼"),
    ("네탄야후", "네타냐후"),
    ("매크롱", "마크롱"),
    // Politics and society
    ("행정 명령", "행정명령"),
    ("경기 침체", "경기침체"),
    ("아카데미상", "오스카상"),
    ("아카데미 시상식", "오스카 시상식"),
    ("슈퍼 볼", "슈퍼볼"),
    // Finance
    ("연방준비", "연준"),
    ("이자율", "금리"),
    ("에어드롭", "에어드랍"),
];

/// Idioms and domain terms a literal translation garbles.
static CULTURAL_CONTEXT: &[(&str, &str)] = &[
    // Chinese cultural events
    ("봄 축제 갈라", "CCTV 춘완(춘절 갈라쇼)"),
    ("춘제 갈라", "CCTV 춘완(춘절 갈라쇼)"),
    ("스프링 페스티벌 갈라", "CCTV 춘완(춘절 갈라쇼)"),
    ("봄축제 갈라", "CCTV 춘완(춘절 갈라쇼)"),
    // Combat sports
    ("거리를 두고 갈까", "풀라운드까지 갈까"),
    ("거리가 끝날까", "풀라운드까지 갈까"),
    ("거리를 두고 진행될까", "풀라운드까지 갈까"),
    ("거리로 갈까", "풀라운드까지 갈까"),
    ("싸움이 KO", "경기가 KO"),
    ("싸움이 TKO", "경기가 TKO"),
    // Esports terms, unified to the broadcast vocabulary
    ("첫 번째 킬", "퍼스트 블러드"),
    ("첫 번째 피가 나올까", "퍼스트 블러드가 나올까"),
    ("첫 번째 피를 흘릴까", "퍼스트 블러드가 나올까"),
    ("첫 피를 흘릴까", "퍼스트 블러드가 나올까"),
    ("첫 피가 날까", "퍼스트 블러드가 나올까"),
    ("첫 킬", "퍼스트 블러드"),
];

/// English month names mapped to Korean numeric months.
static MONTH_MAP: &[(&str, &str)] = &[
    ("January", "1월"),
    ("February", "2월"),
    ("March", "3월"),
    ("April", "4월"),
    ("May", "5월"),
    ("June", "6월"),
    ("July", "7월"),
    ("August", "8월"),
    ("September", "9월"),
    ("October", "10월"),
    ("November", "11월"),
    ("December", "12월"),
];

/// Time token followed by a timezone abbreviation in the source title.
static TIMEZONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}(?::\d{2})?(?:AM|PM)?)\s+(ET|PT|EST|PST|UTC|GMT)\b").unwrap()
});

/// Korean time expressions a timezone token can be injected after.
/// Checked in order; `{tz}` is substituted before the replacement runs.
static TIME_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(오전|오후)\s*(\d{1,2})시에").unwrap(),
            "${1} ${2}시 {tz}에",
        ),
        (
            Regex::new(r"(오전|오후)\s*(\d{1,2})시\s*(\d{1,2})분에").unwrap(),
            "${1} ${2}시 ${3}분 {tz}에",
        ),
        (Regex::new(r"자정에").unwrap(), "자정 {tz}에"),
        (Regex::new(r"정오에").unwrap(), "정오 {tz}에"),
    ]
});

/// Context rules for literal "have" renderings, in priority order:
/// ranking contexts, then performances, then audience metrics.
/// The paired suffix replaces the object marker and verb together.
static HAVE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // Rankings: "가질까" -> "차지할까"
        (
            Regex::new(r"(최고의|최고|1위|2위|3위|#\d+위|#\d+).*을 가질까").unwrap(),
            "을 차지할까",
        ),
        (
            Regex::new(r"(최고의|최고|1위|2위|3위|#\d+위|#\d+).*를 가질까").unwrap(),
            "를 차지할까",
        ),
        (Regex::new(r"세 번째로 좋은.*을 가질까").unwrap(), "을 차지할까"),
        (Regex::new(r"세 번째로 좋은.*를 가질까").unwrap(), "를 차지할까"),
        (Regex::new(r"두 번째로 좋은.*을 가질까").unwrap(), "을 차지할까"),
        (Regex::new(r"두 번째로 좋은.*를 가질까").unwrap(), "를 차지할까"),
        // Performances: "가질까" -> "선보일까"
        (
            Regex::new(r"(댄서|공연|로봇|퍼포먼스).*를 가질까").unwrap(),
            "를 선보일까",
        ),
        (
            Regex::new(r"(댄서|공연|로봇|퍼포먼스).*을 가질까").unwrap(),
            "을 선보일까",
        ),
        // Audience metrics: "가질까" -> "기록할까"
        (
            Regex::new(r"(청취자|조회수|팔로워|시청자|구독자).*를 가질까").unwrap(),
            "를 기록할까",
        ),
        (
            Regex::new(r"(청취자|조회수|팔로워|시청자|구독자).*을 가질까").unwrap(),
            "을 기록할까",
        ),
    ]
});

/// Object marker plus the literal verb, replaced once a rule matches.
static HAVE_OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[을를] 가질까").unwrap());

/// Run the full correction pipeline over a raw translation.
///
/// Pass order is significant and fixed: glossary, timezone, verb sense,
/// cultural context, month names. The untouched original is only read by
/// the timezone pass.
pub fn correct(original: &str, translated: &str) -> String {
    let result = apply_glossary_corrections(translated);
    let result = fix_timezone_consistency(original, &result);
    let result = fix_have_translations(&result);
    let result = apply_cultural_context(&result);
    fix_english_months(&result)
}

/// Replace known glossary mistranslations wherever they occur.
pub fn apply_glossary_corrections(text: &str) -> String {
    let mut result = text.to_string();
    for (wrong, right) in GLOSSARY_CORRECTIONS {
        if result.contains(wrong) {
            result = result.replace(wrong, right);
        }
    }
    result
}

/// Inject a timezone abbreviation the model dropped.
///
/// Best effort: when no Korean time expression matches, the text is
/// returned unchanged. When the token is already present the output is
/// byte-identical to the input.
pub fn fix_timezone_consistency(original: &str, translated: &str) -> String {
    let Some(caps) = TIMEZONE_RE.captures(original) else {
        return translated.to_string();
    };

    let timezone = caps[2].to_uppercase();

    if translated.contains(&timezone) {
        return translated.to_string();
    }

    for (pattern, template) in TIME_PATTERNS.iter() {
        if pattern.is_match(translated) {
            let replacement = template.replace("{tz}", &timezone);
            return pattern.replace_all(translated, replacement.as_str()).into_owned();
        }
    }

    translated.to_string()
}

/// Correct a literal "have" rendering by surrounding context.
///
/// Only the first matching rule applies; scanning stops after it.
pub fn fix_have_translations(text: &str) -> String {
    if !text.contains("가질까") {
        return text.to_string();
    }

    for (pattern, suffix) in HAVE_RULES.iter() {
        if pattern.is_match(text) {
            return HAVE_OBJECT_RE.replace_all(text, *suffix).into_owned();
        }
    }

    text.to_string()
}

/// Replace idioms a literal translation garbles.
pub fn apply_cultural_context(text: &str) -> String {
    let mut result = text.to_string();
    for (wrong, right) in CULTURAL_CONTEXT {
        if result.contains(wrong) {
            result = result.replace(wrong, right);
        }
    }
    result
}

/// Replace English month names with Korean numeric months.
///
/// Exact, case-sensitive substring match; no other date reformatting.
pub fn fix_english_months(text: &str) -> String {
    let mut result = text.to_string();
    for (english, korean) in MONTH_MAP {
        if result.contains(english) {
            result = result.replace(english, korean);
        }
    }
    result
}
