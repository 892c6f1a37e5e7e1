//! Unicode script detection and per-script heuristic rule sets.
//!
//! Heading and sentence heuristics differ across writing systems: Latin text
//! signals headings through capitalization and low stop-word density, while
//! Japanese signals prose through particle density and clause commas. Each
//! supported script carries its own [`ScriptRules`] variant so the classifier
//! never branches on script names directly; adding a script means adding a
//! table entry here.

/// A detected writing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Japanese,
    Chinese,
    Korean,
    Arabic,
    Cyrillic,
    Devanagari,
    Thai,
}

/// Inclusive codepoint ranges per script, checked in declaration order.
///
/// Kana ranges are listed before the shared CJK ideograph block so Japanese
/// text containing kanji still resolves to Japanese when any kana is present.
const SCRIPT_RANGES: &[(Script, &[(u32, u32)])] = &[
    (
        Script::Japanese,
        &[(0x3040, 0x309F), (0x30A0, 0x30FF), (0x31F0, 0x31FF)],
    ),
    (
        Script::Chinese,
        &[(0x4E00, 0x9FFF), (0x3400, 0x4DBF), (0x20000, 0x2A6DF)],
    ),
    (
        Script::Korean,
        &[(0xAC00, 0xD7AF), (0x1100, 0x11FF), (0x3130, 0x318F)],
    ),
    (
        Script::Arabic,
        &[(0x0600, 0x06FF), (0x0750, 0x077F), (0x08A0, 0x08FF)],
    ),
    (Script::Cyrillic, &[(0x0400, 0x04FF), (0x0500, 0x052F)]),
    (Script::Devanagari, &[(0x0900, 0x097F)]),
    (Script::Thai, &[(0x0E00, 0x0E7F)]),
    (
        Script::Latin,
        &[(0x0041, 0x005A), (0x0061, 0x007A), (0x00C0, 0x024F)],
    ),
];

impl Script {
    /// Detect the dominant script of a text by codepoint-range counting.
    ///
    /// Falls back to Latin for empty or script-less text (digits, punctuation).
    pub fn detect(text: &str) -> Script {
        let mut counts: [(Script, usize); 8] = [
            (Script::Japanese, 0),
            (Script::Chinese, 0),
            (Script::Korean, 0),
            (Script::Arabic, 0),
            (Script::Cyrillic, 0),
            (Script::Devanagari, 0),
            (Script::Thai, 0),
            (Script::Latin, 0),
        ];

        for ch in text.chars() {
            let code = ch as u32;
            for (script, ranges) in SCRIPT_RANGES {
                if ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&code)) {
                    if let Some(entry) = counts.iter_mut().find(|(s, _)| s == script) {
                        entry.1 += 1;
                    }
                    break;
                }
            }
        }

        counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .max_by_key(|(_, n)| *n)
            .map(|(s, _)| *s)
            .unwrap_or(Script::Latin)
    }

    /// Rule table for this script.
    pub fn rules(self) -> &'static ScriptRules {
        match self {
            Script::Latin => &LATIN,
            Script::Japanese => &JAPANESE,
            Script::Chinese => &CHINESE,
            Script::Korean => &KOREAN,
            Script::Arabic => &ARABIC,
            Script::Cyrillic => &CYRILLIC,
            Script::Devanagari => &DEVANAGARI,
            Script::Thai => &THAI,
        }
    }
}

/// Per-script heuristic parameters.
///
/// `stop_words` are function words whose density marks running prose.
/// `sentence_suffixes` are terminal markers (punctuation or copula endings)
/// that disqualify a line as a heading when it ends with one.
/// `clause_separators` are mid-sentence punctuation whose mere presence marks
/// prose in scripts that do not use them in titles.
pub struct ScriptRules {
    pub script: Script,
    pub stop_words: &'static [&'static str],
    pub sentence_suffixes: &'static [&'static str],
    pub sentence_terminals: &'static [char],
    pub clause_separators: &'static [char],
    pub max_heading_chars: usize,
    pub word_spaced: bool,
}

impl ScriptRules {
    /// Fraction of the line made of stop words, in `[0,1]`.
    ///
    /// Word-spaced scripts count whole tokens; unspaced scripts count stop
    /// characters against total characters.
    pub fn stop_word_ratio(&self, text: &str) -> f32 {
        if self.word_spaced {
            let words: Vec<&str> = text.split_whitespace().collect();
            if words.is_empty() {
                return 0.0;
            }
            let hits = words
                .iter()
                .filter(|w| {
                    let lower = w.to_lowercase();
                    let trimmed = lower.trim_matches(|c: char| !c.is_alphanumeric());
                    self.stop_words.contains(&trimmed)
                })
                .count();
            hits as f32 / words.len() as f32
        } else {
            let total = text.chars().count();
            if total == 0 {
                return 0.0;
            }
            let hits = text
                .chars()
                .filter(|c| {
                    let mut buf = [0u8; 4];
                    self.stop_words.contains(&&*c.encode_utf8(&mut buf))
                })
                .count();
            hits as f32 / total as f32
        }
    }

    /// Whether the line ends with a sentence-terminal marker for this script.
    pub fn ends_as_sentence(&self, text: &str) -> bool {
        self.sentence_suffixes.iter().any(|s| text.ends_with(s))
    }

    /// Whether the line contains clause punctuation that marks prose.
    pub fn has_clause_punctuation(&self, text: &str) -> bool {
        text.chars().any(|c| self.clause_separators.contains(&c))
    }
}

static LATIN: ScriptRules = ScriptRules {
    script: Script::Latin,
    stop_words: &[
        "the", "and", "or", "but", "if", "when", "where", "how", "what", "is", "a", "an", "in",
        "for", "to", "of", "with", "from", "on", "at", "by", "as", "that", "this",
    ],
    sentence_suffixes: &[".", "!", "?", ";", ":", ","],
    sentence_terminals: &['.', '!', '?'],
    clause_separators: &[],
    max_heading_chars: 100,
    word_spaced: true,
};

static JAPANESE: ScriptRules = ScriptRules {
    script: Script::Japanese,
    stop_words: &[
        "は", "が", "を", "に", "へ", "と", "の", "で", "から", "まで", "より",
    ],
    sentence_suffixes: &[
        "。", "？", "！", "です", "ます", "である", "だ", "という", "ことが", "ために", "として",
    ],
    sentence_terminals: &['。', '？', '！'],
    clause_separators: &['、'],
    max_heading_chars: 50,
    word_spaced: false,
};

static CHINESE: ScriptRules = ScriptRules {
    script: Script::Chinese,
    stop_words: &[
        "的", "了", "是", "在", "有", "和", "或", "但", "当", "什", "么",
    ],
    sentence_suffixes: &["。", "？", "！", "：", "；"],
    sentence_terminals: &['。', '？', '！'],
    clause_separators: &['，', '；'],
    max_heading_chars: 50,
    word_spaced: false,
};

static KOREAN: ScriptRules = ScriptRules {
    script: Script::Korean,
    stop_words: &[
        "은", "는", "이", "가", "을", "를", "에", "에서", "로", "와", "과", "하다", "이다", "있다",
    ],
    sentence_suffixes: &["다", "요", "니다", "습니다", ".", "?", "!"],
    sentence_terminals: &['.', '?', '!', '。'],
    clause_separators: &[],
    max_heading_chars: 60,
    word_spaced: true,
};

static ARABIC: ScriptRules = ScriptRules {
    script: Script::Arabic,
    stop_words: &[
        "في", "من", "إلى", "على", "عن", "مع", "هذا", "هذه", "ذلك", "التي", "الذي",
    ],
    sentence_suffixes: &[".", "؟", "!", "؛"],
    sentence_terminals: &['.', '؟', '!'],
    clause_separators: &['،'],
    max_heading_chars: 100,
    word_spaced: true,
};

static CYRILLIC: ScriptRules = ScriptRules {
    script: Script::Cyrillic,
    stop_words: &[
        "и", "в", "на", "с", "по", "для", "от", "до", "из", "что", "как", "где", "когда",
    ],
    sentence_suffixes: &[".", "!", "?", ";", ":"],
    sentence_terminals: &['.', '!', '?'],
    clause_separators: &[],
    max_heading_chars: 100,
    word_spaced: true,
};

static DEVANAGARI: ScriptRules = ScriptRules {
    script: Script::Devanagari,
    stop_words: &[
        "और", "में", "से", "को", "का", "की", "के", "है", "हैं", "था", "थे", "होगा",
    ],
    sentence_suffixes: &["।", "॥", ".", "?", "!"],
    sentence_terminals: &['।', '॥', '.', '?', '!'],
    clause_separators: &[],
    max_heading_chars: 100,
    word_spaced: true,
};

static THAI: ScriptRules = ScriptRules {
    script: Script::Thai,
    stop_words: &[
        "และ", "ใน", "ของ", "ที่", "จาก", "ไป", "มา", "ได้", "เป็น", "อยู่", "แล้ว",
    ],
    sentence_suffixes: &[".", "?", "!", "๚", "๛"],
    sentence_terminals: &['.', '?', '!'],
    clause_separators: &[],
    max_heading_chars: 80,
    word_spaced: false,
};
