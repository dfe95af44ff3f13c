use std::sync::LazyLock;

use regex::Regex;

/// Leading part-of-speech tokens such as `vt.`, `adj.` or `v.&n.`, followed by the
/// translation. Group 1 is the tag run, group 2 the rest of the cell.
static POS_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:[A-Za-z]{1,6}\.\s*(?:[&/,，]\s*)?)+)(?s)(.*)$")
        .expect("part-of-speech pattern is valid")
});

/// A cell consisting only of part-of-speech tokens.
static POS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z]{1,6}\.\s*(?:[&/,，]\s*)?)+$").expect("part-of-speech pattern is valid")
});

static HAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Han}").expect("Han pattern is valid"));

/// Header rows are looked for among this many leading non-blank rows.
const HEADER_SCAN_ROWS: usize = 5;

const MAX_ENGLISH_CHARS: usize = 100;
const MAX_CHINESE_CHARS: usize = 500;
const MAX_POS_CHARS: usize = 50;
const MAX_IPA_CHARS: usize = 100;

const ENGLISH_HEADERS: &[&str] = &["english", "word", "单词", "英文", "英文单词"];
const CHINESE_HEADERS: &[&str] = &["chinese", "meaning", "translation", "释义", "中文", "词义", "中文释义"];
const POS_HEADERS: &[&str] = &["pos", "part of speech", "词性"];
const IPA_HEADERS: &[&str] = &["ipa", "phonetic", "音标"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWord {
    pub english: String,
    pub chinese: String,
    pub pos: String,
    pub ipa: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColumns {
    pub english: usize,
    pub chinese: usize,
    pub pos: Option<usize>,
    pub ipa: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A header row named the columns.
    Headed(HeaderColumns),
    /// No header; cells are classified by content.
    Positional,
}

#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub layout: Layout,
    pub words: Vec<ParsedWord>,
    /// Non-blank rows that did not yield a word, header row excluded.
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct RawFields<'a> {
    english: &'a str,
    meaning: &'a str,
    pos: &'a str,
    ipa: &'a str,
}

/// Turns raw spreadsheet rows into vocabulary entries.
///
/// Fully blank rows are ignored. Every other row either yields a word or is
/// counted in [`ParsedSheet::skipped`].
pub fn parse_rows(rows: Vec<Vec<String>>) -> ParsedSheet {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    let header = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(index, row)| HeaderColumns::detect(row).map(|columns| (index, columns)));

    let (layout, data_start, mut skipped) = match header {
        // Title rows above the header count as skipped
        Some((index, columns)) => (Layout::Headed(columns), index + 1, index),
        None => (Layout::Positional, 0, 0),
    };

    let mut words = Vec::new();
    for row in &rows[data_start..] {
        let fields = match layout {
            Layout::Headed(columns) => columns.fields(row),
            Layout::Positional => positional_fields(row),
        };

        match build_word(&fields) {
            Some(word) => words.push(word),
            None => skipped += 1,
        }
    }

    ParsedSheet { layout, words, skipped }
}

/// Splits a meaning cell into its part-of-speech prefix and the translation.
///
/// `vt.离弃，放弃` becomes `("vt.", "离弃，放弃")`; a cell without a prefix is
/// returned whole as the translation.
pub fn split_meaning(cell: &str) -> (String, String) {
    let cell = cell.trim();

    match POS_PREFIX.captures(cell) {
        Some(caps) => {
            let pos: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
            let pos = pos.trim_end_matches(&['&', '/', ',', '，'][..]).to_string();
            (pos, caps[2].trim().to_string())
        }
        None => (String::new(), cell.to_string()),
    }
}

/// Whether the text contains any Chinese (Han) character.
pub fn contains_han(text: &str) -> bool {
    HAN.is_match(text)
}

fn looks_phonetic(cell: &str) -> bool {
    let cell = cell.trim();
    let wrapped = |open: char, close: char| {
        cell.chars().count() > 2 && cell.starts_with(open) && cell.ends_with(close)
    };
    wrapped('/', '/') || wrapped('[', ']')
}

fn looks_like_pos(cell: &str) -> bool {
    POS_ONLY.is_match(cell.trim())
}

impl HeaderColumns {
    fn detect(row: &[String]) -> Option<Self> {
        let find = |names: &[&str]| {
            row.iter().position(|cell| {
                let cell = cell.trim().to_lowercase();
                names.iter().any(|name| *name == cell)
            })
        };

        let english = find(ENGLISH_HEADERS)?;
        let chinese = find(CHINESE_HEADERS)?;
        if english == chinese {
            return None;
        }

        Some(HeaderColumns {
            english,
            chinese,
            pos: find(POS_HEADERS),
            ipa: find(IPA_HEADERS),
        })
    }

    fn fields<'a>(&self, row: &'a [String]) -> RawFields<'a> {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(|c| c.trim())
                .unwrap_or("")
        };

        RawFields {
            english: cell(Some(self.english)),
            meaning: cell(Some(self.chinese)),
            pos: cell(self.pos),
            ipa: cell(self.ipa),
        }
    }
}

/// Column 0 is the word; the other cells are recognized by what they contain.
fn positional_fields(row: &[String]) -> RawFields<'_> {
    let mut fields = RawFields {
        english: row.first().map(|c| c.trim()).unwrap_or(""),
        ..RawFields::default()
    };

    let mut fallback_meaning = "";
    for cell in row.iter().skip(1).map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if looks_phonetic(cell) {
            if fields.ipa.is_empty() {
                fields.ipa = cell;
            }
        } else if contains_han(cell) {
            if fields.meaning.is_empty() {
                fields.meaning = cell;
            }
        } else if looks_like_pos(cell) {
            if fields.pos.is_empty() {
                fields.pos = cell;
            }
        } else if fallback_meaning.is_empty() {
            fallback_meaning = cell;
        }
    }

    if fields.meaning.is_empty() {
        fields.meaning = fallback_meaning;
    }

    fields
}

fn build_word(fields: &RawFields<'_>) -> Option<ParsedWord> {
    let english = fields.english.split_whitespace().collect::<Vec<_>>().join(" ");

    if english.is_empty()
        || contains_han(&english)
        || !english.chars().any(|c| c.is_ascii_alphabetic())
        || english.chars().count() > MAX_ENGLISH_CHARS
    {
        return None;
    }

    let (split_pos, chinese) = split_meaning(fields.meaning);
    if chinese.is_empty() || chinese.chars().count() > MAX_CHINESE_CHARS {
        return None;
    }

    let explicit_pos = fields.pos.trim();
    let pos = if explicit_pos.is_empty() {
        split_pos
    } else {
        explicit_pos.to_string()
    };

    let ipa = fields.ipa.trim();
    if pos.chars().count() > MAX_POS_CHARS || ipa.chars().count() > MAX_IPA_CHARS {
        return None;
    }

    Some(ParsedWord {
        english,
        chinese,
        pos,
        ipa: ipa.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_split_meaning() {
        assert_eq!(split_meaning("vt.离弃，放弃"), ("vt.".to_string(), "离弃，放弃".to_string()));
        assert_eq!(split_meaning("n. 坚持"), ("n.".to_string(), "坚持".to_string()));
        assert_eq!(split_meaning("adj.高效的"), ("adj.".to_string(), "高效的".to_string()));
        assert_eq!(split_meaning("v.&n. 记录"), ("v.&n.".to_string(), "记录".to_string()));
        assert_eq!(split_meaning("n./v. 计划"), ("n./v.".to_string(), "计划".to_string()));
        assert_eq!(split_meaning("v. & n. 记录"), ("v.&n.".to_string(), "记录".to_string()));
        assert_eq!(split_meaning("  坚持  "), (String::new(), "坚持".to_string()));
        assert_eq!(split_meaning(""), (String::new(), String::new()));
    }

    #[test]
    fn test_split_meaning_keeps_later_senses() {
        let (pos, chinese) = split_meaning("n.效率；v.提高效率");
        assert_eq!(pos, "n.");
        assert_eq!(chinese, "效率；v.提高效率");
    }

    #[test]
    fn test_split_meaning_only_tag() {
        assert_eq!(split_meaning("adv."), ("adv.".to_string(), String::new()));
    }

    #[test]
    fn test_contains_han() {
        assert!(contains_han("单词"));
        assert!(contains_han("word词"));
        assert!(!contains_han("persistence"));
        assert!(!contains_han("/pəˈsɪstəns/"));
        assert!(!contains_han("，"));
    }

    #[test]
    fn test_looks_phonetic() {
        assert!(looks_phonetic("/ɪˈfɪʃnt/"));
        assert!(looks_phonetic("[ˈstrætədʒi]"));
        assert!(!looks_phonetic("/"));
        assert!(!looks_phonetic("//"));
        assert!(!looks_phonetic("strategy"));
    }

    #[test]
    fn test_title_row_above_header_is_skipped() {
        let sheet = parse_rows(rows(&[
            &["考研词汇表"],
            &["单词", "音标", "释义"],
            &["abandon", "/əˈbændən/", "vt.离弃，放弃"],
            &["efficient", "/ɪˈfɪʃnt/", "adj.高效的"],
        ]));

        assert_eq!(sheet.layout, Layout::Headed(HeaderColumns {
            english: 0,
            chinese: 2,
            pos: None,
            ipa: Some(1),
        }));
        assert_eq!(sheet.skipped, 1);
        assert_eq!(sheet.words.len(), 2);
        assert_eq!(sheet.words[0], ParsedWord {
            english: "abandon".to_string(),
            chinese: "离弃，放弃".to_string(),
            pos: "vt.".to_string(),
            ipa: "/əˈbændən/".to_string(),
        });
    }

    #[test]
    fn test_positional_sheet_without_header() {
        let sheet = parse_rows(rows(&[
            &["单词表 Unit 1", ""],
            &["abandon", "vt.离弃，放弃"],
            &["", "n.无主词"],
            &["123", "数字"],
            &["strategy", "n.", "策略", "[ˈstrætədʒi]"],
            &["", ""],
        ]));

        assert_eq!(sheet.layout, Layout::Positional);
        assert_eq!(sheet.words.len(), 2);
        // Title row, empty English cell and the numeric row; the blank row is ignored
        assert_eq!(sheet.skipped, 3);

        let strategy = &sheet.words[1];
        assert_eq!(strategy.english, "strategy");
        assert_eq!(strategy.pos, "n.");
        assert_eq!(strategy.chinese, "策略");
        assert_eq!(strategy.ipa, "[ˈstrætədʒi]");
    }

    #[test]
    fn test_positional_meaning_fallback() {
        let sheet = parse_rows(rows(&[&["give up", "to stop trying"]]));
        assert_eq!(sheet.words.len(), 1);
        assert_eq!(sheet.words[0].chinese, "to stop trying");
    }

    #[test]
    fn test_headed_sheet_with_english_headers() {
        let sheet = parse_rows(rows(&[
            &["ipa", "English", "Chinese", "POS"],
            &["/pəˈsɪstəns/", "persistence", "坚持", "n."],
            &["", "innovation", "n.创新", ""],
            &["", "efficient", "高效的", "adj."],
        ]));

        assert!(matches!(sheet.layout, Layout::Headed(_)));
        assert_eq!(sheet.skipped, 0);
        assert_eq!(sheet.words.len(), 3);
        assert_eq!(sheet.words[0].ipa, "/pəˈsɪstəns/");
        assert_eq!(sheet.words[0].pos, "n.");
        // Split-off prefix is used when the POS column is empty
        assert_eq!(sheet.words[1].pos, "n.");
        assert_eq!(sheet.words[1].chinese, "创新");
        assert_eq!(sheet.words[2].pos, "adj.");
    }

    #[test]
    fn test_explicit_pos_wins_over_prefix() {
        let sheet = parse_rows(rows(&[
            &["word", "meaning", "pos"],
            &["record", "n.记录", "v."],
        ]));
        assert_eq!(sheet.words[0].pos, "v.");
        assert_eq!(sheet.words[0].chinese, "记录");
    }

    #[test]
    fn test_headed_sheet_short_rows() {
        let sheet = parse_rows(rows(&[
            &["english", "chinese"],
            &["lonely"],
            &["strategy", "策略"],
        ]));
        assert_eq!(sheet.words.len(), 1);
        assert_eq!(sheet.skipped, 1);
    }

    #[test]
    fn test_english_whitespace_is_collapsed() {
        let sheet = parse_rows(rows(&[&["  give   up ", "放弃"]]));
        assert_eq!(sheet.words[0].english, "give up");
    }

    #[test]
    fn test_overlong_english_is_skipped() {
        let long = "a".repeat(MAX_ENGLISH_CHARS + 1);
        let sheet = parse_rows(vec![vec![long, "长".to_string()]]);
        assert!(sheet.words.is_empty());
        assert_eq!(sheet.skipped, 1);
    }

    #[test]
    fn test_overlong_ipa_is_skipped() {
        let long_ipa = format!("/{}/", "ə".repeat(MAX_IPA_CHARS));
        let sheet = parse_rows(rows(&[
            &["单词", "音标", "释义"],
            &["abandon", long_ipa.as_str(), "vt.离弃，放弃"],
            &["efficient", "/ɪˈfɪʃnt/", "adj.高效的"],
        ]));

        assert_eq!(sheet.words.len(), 1);
        assert_eq!(sheet.words[0].english, "efficient");
        assert_eq!(sheet.skipped, 1);
    }

    #[test]
    fn test_overlong_pos_is_skipped() {
        // 26 single-letter tags split off as a 52 character prefix
        let tags: String = ('a'..='z').map(|c| format!("{}.", c)).collect();
        let meaning = format!("{} 字", tags);
        let (pos, _) = split_meaning(&meaning);
        assert!(pos.chars().count() > MAX_POS_CHARS);

        let long_pos = "n.".repeat(26);
        let sheet = parse_rows(rows(&[
            &["word", "meaning", "pos"],
            &["alphabet", meaning.as_str(), ""],
            &["record", "记录", long_pos.as_str()],
            &["strategy", "n.策略", ""],
        ]));

        assert_eq!(sheet.words.len(), 1);
        assert_eq!(sheet.words[0].english, "strategy");
        assert_eq!(sheet.skipped, 2);
    }

    #[test]
    fn test_field_limits_are_inclusive() {
        let ipa = format!("/{}/", "ə".repeat(MAX_IPA_CHARS - 2));
        let pos = "v.".repeat(MAX_POS_CHARS / 2);
        let sheet = parse_rows(rows(&[
            &["word", "meaning", "pos", "ipa"],
            &["record", "记录", pos.as_str(), ipa.as_str()],
        ]));

        assert_eq!(sheet.words.len(), 1);
        assert_eq!(sheet.words[0].ipa.chars().count(), MAX_IPA_CHARS);
        assert_eq!(sheet.words[0].pos.chars().count(), MAX_POS_CHARS);
    }

    #[test]
    fn test_header_detection_requires_distinct_columns() {
        assert!(HeaderColumns::detect(&["word".to_string()]).is_none());
        assert!(HeaderColumns::detect(&["单词".to_string(), "释义".to_string()]).is_some());
    }
}
