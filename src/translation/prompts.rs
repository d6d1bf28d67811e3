/*!
 * Prompt templates for title translation.
 *
 * Prompts live in an id-keyed JSON library so operators can tune the
 * persona without touching code. A missing file or missing section
 * falls back to the built-in default prompt; that fallback is the
 * documented default behavior, not an error.
 */

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

/// Section id of the translation system prompt.
pub const TRANSLATION_SYSTEM: &str = "translation_system";

/// The default persona for prediction-market title translation.
pub const DEFAULT_TRANSLATION_PROMPT: &str = "당신은 Polymarket 예측 시장 제목을 한국어로 번역하는 전문가입니다.\n\
반말로 번역하세요 (~할까?, ~될까?). 날짜는 한글로 (February 11 → 2월 11일).\n\
시간대는 반드시 유지 (4AM ET → 오전 4시 ET). 번호와 함께 출력하세요.";

/// House rules appended to every system prompt, tuned against observed
/// model mistakes (politeness drift, dropped timezones, literal "have").
const HOUSE_RULES: &str = "추가 규칙:\n\
1. 반드시 반말로 번역 (~할까, ~될까, ~인가)\n\
2. 절대 존댓말 사용 금지 (~할까요, ~될까요 ❌)\n\
3. 시간대 표기 필수: ET, PT 등은 반드시 유지 (4AM ET → 오전 4시 ET ✅)\n\
4. \"have\"를 \"가지다\"로 직역 금지. 문맥에 맞게 \"차지할까/선보일까/기록할까\" 사용\n\
5. 모든 제목에서 일관성 유지";

/// An id-keyed library of prompt sections.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    sections: HashMap<String, String>,
}

impl PromptLibrary {
    /// Create an empty library; every lookup falls back to defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a library from a JSON file of `{"section_id": "text"}`.
    ///
    /// An absent file is normal (defaults apply); an unreadable or
    /// malformed file is reported and also falls back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            debug!("Prompt file {:?} not found, using built-in prompts", path);
            return Self::empty();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read prompt file {:?}: {}", path, e);
                return Self::empty();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(sections) => Self { sections },
            Err(e) => {
                warn!("Failed to parse prompt file {:?}: {}", path, e);
                Self::empty()
            }
        }
    }

    /// Create a library from in-memory sections.
    pub fn from_sections(sections: HashMap<String, String>) -> Self {
        Self { sections }
    }

    /// Look up a section by id.
    pub fn section(&self, id: &str) -> Option<&str> {
        self.sections.get(id).map(String::as_str)
    }

    /// Build the full system prompt: persona section (or the built-in
    /// default) with the house rules appended.
    pub fn system_prompt(&self) -> String {
        let persona = self
            .section(TRANSLATION_SYSTEM)
            .unwrap_or(DEFAULT_TRANSLATION_PROMPT);

        format!("{}\n\n---\n{}", persona, HOUSE_RULES)
    }
}
