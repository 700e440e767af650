//! 题目解析 - 选项定位、题型分类、答案关联
//!
//! 选项字母在版面重建后的文本里没有统一形态，这里用
//! 一组候选模式按固定优先级竞争（见 `OptionPatterns`），
//! 另外先行判断排序题：小写条目在前、大写选项在后的
//! 题型选项提取规则不同，且从不关联篇章。

use super::answer_key::AnswerKey;
use super::ExamExtractor;
use crate::models::{Question, QuestionTag};
use regex::Regex;
use std::collections::BTreeMap;

/// 选项定位候选模式
///
/// 优先级规则（按序评估，作为数据保留便于单测）：
/// 1. 首选行首模式 `newline`；
/// 2. 粗体内联模式（`bold_spaced` + `bold_tight` 合并）
///    找到的匹配数严格更多时改用它；
/// 3. 裸词边界模式恰好命中 4 个而当前选择不足 4 个时
///    改用裸模式。
pub(crate) struct OptionPatterns {
    /// 行首 `A. ` 形态
    newline: Regex,
    /// 粗体包裹、带空白 `<b> A. </b>`
    bold_spaced: Regex,
    /// 粗体紧贴 `<b>A.</b>`
    bold_tight: Regex,
    /// 裸 `A. ` 词边界形态
    bare: Regex,
    /// 排序题检测用：空白或行首引导的大写字母
    upper_lead: Regex,
}

impl OptionPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            newline: Regex::new(r"\n\s*([A-D])\.\s+")?,
            bold_spaced: Regex::new(r"<b>\s*([A-D])\.\s*</b>")?,
            bold_tight: Regex::new(r"<b>([A-D])\.</b>")?,
            bare: Regex::new(r"\b([A-D])\.\s+")?,
            upper_lead: Regex::new(r"(?:^|\s)([A-D])\.\s+")?,
        })
    }
}

/// 题型分类与选项清理用的正则集合
pub(crate) struct ClassifyPatterns {
    /// 编号填空占位（完形填空）
    cloze: Regex,
    /// 阅读理解提示语
    reading: Regex,
    /// 排序题的小写条目标记
    lowercase_item: Regex,
    /// 选项尾部的粗体残留
    trailing_markup: Regex,
    /// 选项头部的粗体残留
    leading_markup: Regex,
    /// 选项尾部的单字母短横后缀
    tail_dash: Regex,
    /// 排序题选项尾部的粗体残留
    ord_trailing_bold: Regex,
    /// 排序题选项头部的粗体残留
    ord_leading_bold: Regex,
    /// 排序题选项尾部的短横加粗体残留
    ord_tail_dash: Regex,
}

impl ClassifyPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            cloze: Regex::new(r"\(\s*\d+\s*\)\s*_{2,}")?,
            reading: Regex::new(
                r"(?i)(according to|which of the following|the word|the phrase|best summarises?|TRUE according|NOT mentioned|refers to|could be best replaced|best paraphrases?|in which paragraph|where in paragraph)",
            )?,
            lowercase_item: Regex::new(r"\b[a-e]\s*-")?,
            trailing_markup: Regex::new(r"(</?b>|\s)+$")?,
            leading_markup: Regex::new(r"^(</?b>|\s)+")?,
            tail_dash: Regex::new(r"\s*[–-]\s*[a-e]$")?,
            ord_trailing_bold: Regex::new(r"</?b>\s*$")?,
            ord_leading_bold: Regex::new(r"^\s*</?b>\s*")?,
            ord_tail_dash: Regex::new(r"\s*[–-]\s*[a-e]\s*<b>\s*$")?,
        })
    }
}

/// 一次选项字母命中：整体匹配范围加捕获的字母
#[derive(Debug, Clone, Copy)]
struct OptionMatch {
    start: usize,
    end: usize,
    letter: char,
}

/// 收集某个模式在文本中的全部命中
fn collect_matches(re: &Regex, text: &str) -> Vec<OptionMatch> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?.as_str().chars().next()?;
            Some(OptionMatch {
                start: whole.start(),
                end: whole.end(),
                letter,
            })
        })
        .collect()
}

/// 在相邻的不同字母之间切出选项原文
///
/// 连续重复的字母视为同一选项被再次引用，跳过；
/// 终点取下一个不同字母的起点，最后一个选项到文本末尾。
fn option_spans<'a>(text: &'a str, matches: &[OptionMatch]) -> Vec<(char, &'a str)> {
    let mut spans = Vec::new();
    let mut last_letter: Option<char> = None;

    for (idx, m) in matches.iter().enumerate() {
        if Some(m.letter) == last_letter {
            continue;
        }
        last_letter = Some(m.letter);

        let mut end = text.len();
        for next in &matches[idx + 1..] {
            if next.letter != m.letter {
                end = next.start;
                break;
            }
        }

        spans.push((m.letter, &text[m.end..end]));
    }

    spans
}

impl ExamExtractor {
    /// 解析单个题目块
    ///
    /// 先判断是否为排序题；常规题按优先级选出选项模式，
    /// 命中不足 3 个时降级为无选项记录（保留传入的篇章
    /// 关联，不打标签）。
    pub fn parse_question(
        &self,
        question_number: u32,
        text: &str,
        answers: &AnswerKey,
        pass_id: Option<&str>,
    ) -> Question {
        // 排序题检测：合并三种大写形态，按位置排序
        let mut uppercase = collect_matches(&self.options.bold_spaced, text);
        uppercase.extend(collect_matches(&self.options.bold_tight, text));
        uppercase.extend(collect_matches(&self.options.upper_lead, text));
        uppercase.sort_by_key(|m| m.start);

        if let Some(first) = uppercase.first() {
            let lowercase_items = self
                .classify
                .lowercase_item
                .find_iter(&text[..first.start])
                .count();
            if lowercase_items >= 3 && uppercase.len() >= 3 {
                return self.parse_ordering_question(question_number, text, &uppercase, answers);
            }
        }

        // 常规题：候选模式按优先级竞争
        let newline = collect_matches(&self.options.newline, text);
        let mut inline = collect_matches(&self.options.bold_spaced, text);
        inline.extend(collect_matches(&self.options.bold_tight, text));
        inline.sort_by_key(|m| m.start);
        let bare = collect_matches(&self.options.bare, text);

        let mut opts = newline;
        if inline.len() > opts.len() {
            opts = inline;
        }
        if bare.len() == 4 && opts.len() < 4 {
            opts = bare;
        }

        if opts.len() < 3 {
            // 选项缺失：降级为无选项记录
            return Question {
                question_number,
                question_text: self.to_br_lines(text),
                options: BTreeMap::new(),
                answer: answers.resolve(question_number),
                passage_related: pass_id.map(String::from),
                tags: Vec::new(),
            };
        }

        let stem = text[..opts[0].start].trim();
        let tags = self.classify_stem(stem);

        let mut options = BTreeMap::new();
        for (letter, span) in option_spans(text, &opts) {
            options.insert(letter, self.clean_option_text(span));
            if options.len() == 4 {
                break;
            }
        }

        Question {
            question_number,
            question_text: self.to_br_lines(stem),
            options,
            answer: answers.resolve(question_number),
            passage_related: pass_id.map(String::from),
            tags,
        }
    }

    /// 题干分类：编号空格优先于阅读提示语
    fn classify_stem(&self, stem: &str) -> Vec<QuestionTag> {
        let plain = self.strip_bold(stem);
        if self.classify.cloze.is_match(&plain) {
            vec![QuestionTag::Cloze]
        } else if self.classify.reading.is_match(&plain) {
            vec![QuestionTag::Reading]
        } else {
            Vec::new()
        }
    }

    /// 解析排序题
    ///
    /// 题干是首个大写选项之前的全部内容；选项在不同
    /// 大写字母之间切分。排序题永不关联篇章、永不打标签。
    fn parse_ordering_question(
        &self,
        question_number: u32,
        text: &str,
        uppercase: &[OptionMatch],
        answers: &AnswerKey,
    ) -> Question {
        let stem_end = uppercase.first().map_or(0, |m| m.start);
        let stem = text[..stem_end].trim();

        let mut options = BTreeMap::new();
        for (letter, span) in option_spans(text, uppercase) {
            options.insert(letter, self.clean_ordering_option_text(span));
            if options.len() == 4 {
                break;
            }
        }

        Question {
            question_number,
            question_text: self.to_br_lines(stem),
            options,
            answer: answers.resolve(question_number),
            passage_related: None,
            tags: Vec::new(),
        }
    }

    /// 常规选项文本清理
    fn clean_option_text(&self, span: &str) -> String {
        let text = self.clean_text(span.trim());
        // 截断到首个空行
        let text = match text.find("\n\n") {
            Some(pos) => text[..pos].trim().to_string(),
            None => text,
        };
        let text = self.classify.trailing_markup.replace_all(&text, "");
        let text = self.classify.leading_markup.replace_all(&text, "");
        let text = self.classify.tail_dash.replace_all(&text, "");
        text.trim().to_string()
    }

    /// 排序题选项文本清理
    fn clean_ordering_option_text(&self, span: &str) -> String {
        let text = self.clean_text(span.trim());
        let text = self.classify.ord_trailing_bold.replace_all(&text, "");
        let text = self.classify.ord_leading_bold.replace_all(&text, "");
        let text = self.classify.ord_tail_dash.replace_all(&text, "").to_string();
        let text = match text.find("\n\n") {
            Some(pos) => &text[..pos],
            None => text.as_str(),
        };
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::{AnswerKey, ExamExtractor};
    use crate::models::QuestionTag;

    fn extractor() -> ExamExtractor {
        ExamExtractor::new().expect("模式编译失败")
    }

    fn empty_key() -> AnswerKey {
        AnswerKey::default()
    }

    #[test]
    fn test_regular_question_four_options() {
        let e = extractor();
        let text = "What is the capital of France?\nA. London\nB. Paris\nC. Rome\nD. Berlin";
        let q = e.parse_question(1, text, &empty_key(), None);

        assert_eq!(q.question_text, "What is the capital of France?");
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[&'B'], "Paris");
        assert_eq!(
            q.options.keys().copied().collect::<Vec<_>>(),
            vec!['A', 'B', 'C', 'D']
        );
        assert_eq!(q.answer, "");
    }

    #[test]
    fn test_answer_resolved_from_key() {
        let e = extractor();
        let key = e.parse_answer_key("7. C");
        let text = "Pick one.\nA. x\nB. y\nC. z\nD. w";
        let q = e.parse_question(7, text, &key, None);
        assert_eq!(q.answer, "C");
    }

    #[test]
    fn test_degenerate_question_keeps_passage() {
        let e = extractor();
        let q = e.parse_question(3, "Describe your weekend in writing.", &empty_key(), Some("passage_1"));

        assert!(q.options.is_empty());
        assert_eq!(q.passage_related.as_deref(), Some("passage_1"));
        assert!(q.tags.is_empty());
    }

    #[test]
    fn test_reading_tag_from_cue_phrase() {
        let e = extractor();
        let text = "According to the passage, what happened first?\nA. a\nB. b\nC. c\nD. d";
        let q = e.parse_question(2, text, &empty_key(), Some("passage_1"));

        assert_eq!(q.tags, vec![QuestionTag::Reading]);
        assert_eq!(q.passage_related.as_deref(), Some("passage_1"));
    }

    #[test]
    fn test_cloze_tag_beats_reading_cue() {
        let e = extractor();
        let text = "Choose the word for blank (9) ______ according to the text.\nA. in\nB. on\nC. at\nD. of";
        let q = e.parse_question(9, text, &empty_key(), None);

        assert_eq!(q.tags, vec![QuestionTag::Cloze]);
    }

    #[test]
    fn test_bold_inline_pattern_preferred_when_more_matches() {
        let e = extractor();
        // 行首形态没有命中，粗体内联有 4 个
        let text = "Mark the stressed syllable.<b>A.</b> apple <b>B.</b> banana\n<b>C.</b> cherry\n<b>D.</b> mango";
        let q = e.parse_question(4, text, &empty_key(), None);

        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[&'A'], "apple");
        assert_eq!(q.options[&'D'], "mango");
    }

    #[test]
    fn test_bare_pattern_used_when_exactly_four() {
        let e = extractor();
        // 没有行首形态也没有粗体形态，裸形态恰好 4 个
        let text = "Pick the odd one out. A. cat B. dog C. tree D. horse";
        let q = e.parse_question(5, text, &empty_key(), None);

        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[&'C'], "tree");
    }

    #[test]
    fn test_ordering_question_detected() {
        let e = extractor();
        let text = "Put the events in the correct order.\na- went home\nb- ate dinner\nc- fell asleep\nA. a-b-c\nB. b-a-c\nC. c-b-a\nD. a-c-b";
        let q = e.parse_question(6, text, &empty_key(), Some("passage_2"));

        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[&'A'], "a-b-c");
        // 排序题永不关联篇章、永不打标签
        assert_eq!(q.passage_related, None);
        assert!(q.tags.is_empty());
        assert!(q.question_text.contains("a- went home"));
    }

    #[test]
    fn test_ordering_requires_three_lowercase_items() {
        let e = extractor();
        // 只有两个小写条目，按常规题处理
        let text = "Order these.\na- first\nb- second\nA. ab\nB. ba\nC. aa\nD. bb";
        let q = e.parse_question(8, text, &empty_key(), Some("passage_1"));

        assert_eq!(q.passage_related.as_deref(), Some("passage_1"));
        assert_eq!(q.options.len(), 4);
    }

    #[test]
    fn test_duplicate_consecutive_letters_skipped() {
        let e = extractor();
        let text = "Choose.\nA. first\nA. repeated\nB. second\nC. third\nD. fourth";
        let q = e.parse_question(10, text, &empty_key(), None);

        assert_eq!(q.options.len(), 4);
        // 重复的 A 被视为同一选项的再次引用，文本到下一个不同字母为止
        assert_eq!(q.options[&'A'], "first\nA. repeated");
    }

    #[test]
    fn test_option_truncated_at_blank_line() {
        let e = extractor();
        let text = "Question stem?\nA. alpha\nB. beta\nC. gamma\nD. delta\n\nRead the following text.";
        let q = e.parse_question(11, text, &empty_key(), None);

        assert_eq!(q.options[&'D'], "delta");
    }

    #[test]
    fn test_option_trailing_dash_suffix_stripped() {
        let e = extractor();
        let text = "Stem?\nA. one\nB. two\nC. three\nD. four - a";
        let q = e.parse_question(12, text, &empty_key(), None);

        assert_eq!(q.options[&'D'], "four");
    }

    #[test]
    fn test_option_count_invariant() {
        let e = extractor();
        let text = "Stem?\nA. one\nB. two\nC. three";
        let q = e.parse_question(13, text, &empty_key(), None);

        assert!(q.options.len() >= 3 && q.options.len() <= 4);
        assert!(q.options.keys().all(|l| ('A'..='D').contains(l)));
    }
}
