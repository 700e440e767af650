//! 试卷分段 - 前言、题目块与篇章边界
//!
//! 文档没有权威语法可依，分段完全依赖布局与词汇线索：
//! `Question N.` 标记切出题目块，篇章引导语决定篇章边界。
//! 扫描状态（当前活跃篇章、篇章计数）作为局部变量沿循环
//! 显式传递，不放在模块级状态里。

use super::answer_key::AnswerKey;
use super::ExamExtractor;
use crate::models::{Passage, Question};
use regex::Regex;

/// 分段用的正则集合
pub(crate) struct SegmentPatterns {
    /// 答案区起点 `Answer(s):`
    pub(crate) answer_split: Regex,
    /// 题目块标记 `Question N.` / `Question N:`
    question_marker: Regex,
    /// 篇章引导语（"Read the following ... and mark ..."）
    passage_intro: Regex,
    /// 行首 `A. ` 选项引导（篇章内容片段的切分点）
    option_lead: Regex,
    /// 疑问句 / 题干起始词（此类文本不是篇章内容）
    stem_lead: Regex,
}

impl SegmentPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            answer_split: Regex::new(r"(?i)Answers?\s*:")?,
            question_marker: Regex::new(r"(?i)Question\s+(\d+)[.:]")?,
            passage_intro: Regex::new(
                r"(?i)Read\s+the\s+following\s+(?:leaflet|passage|advertisement|passage\s+about)[^.]*\s+and\s+mark[^.]+\.",
            )?,
            option_lead: Regex::new(r"\n\s*A\.\s+")?,
            stem_lead: Regex::new(r"(?i)^(Which|What|The\s+(word|phrase)|According|Where|In\s+which)")?,
        })
    }
}

impl ExamExtractor {
    /// 把正文切成前言和按题号排列的题目块
    fn split_blocks<'a>(&self, content: &'a str) -> (&'a str, Vec<(u32, &'a str)>) {
        // (题号, 标记起点, 标记终点)
        let mut markers: Vec<(u32, usize, usize)> = Vec::new();
        for caps in self.segment.question_marker.captures_iter(content) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let number = match caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                Some(n) => n,
                None => continue,
            };
            markers.push((number, whole.start(), whole.end()));
        }

        let preamble = match markers.first() {
            Some(&(_, start, _)) => &content[..start],
            None => content,
        };

        let mut blocks = Vec::new();
        for (idx, &(number, _, end)) in markers.iter().enumerate() {
            let block_end = markers
                .get(idx + 1)
                .map_or(content.len(), |&(_, next_start, _)| next_start);
            blocks.push((number, &content[end..block_end]));
        }

        (preamble, blocks)
    }

    /// 分段主循环
    ///
    /// 篇章检测优先于常规题解析：一个块最多产出一道
    /// 引导语之前的独立题目加一个新篇章。
    pub(crate) fn segment_content(
        &self,
        content: &str,
        answers: &AnswerKey,
    ) -> (Vec<Passage>, Vec<Question>) {
        let (preamble, blocks) = self.split_blocks(content);

        let mut passages: Vec<Passage> = Vec::new();
        let mut questions: Vec<Question> = Vec::new();
        let mut current_pass: Option<String> = None;
        let mut pass_num: u32 = 0;

        // 前言：命中引导语则创建 1 号篇章，覆盖从第 1 题开始
        let preamble = preamble.trim();
        if !preamble.is_empty() {
            if let Some(m) = self.segment.passage_intro.find(preamble) {
                pass_num += 1;
                let passage_id = format!("passage_{}", pass_num);
                current_pass = Some(passage_id.clone());
                passages.push(Passage::new(
                    passage_id,
                    self.to_br_lines(m.as_str()),
                    preamble[m.end()..].trim().to_string(),
                    1,
                ));
            }
        }

        for (question_number, block) in blocks {
            let block = block.trim();

            if let Some(m) = self.segment.passage_intro.find(block) {
                // 引导语之前的部分是不属于任何篇章的独立题目
                let before = block[..m.start()].trim();
                questions.push(self.parse_question(question_number, before, answers, None));

                // 新篇章从下一题开始，当前题号已被上面的独立题目占用
                pass_num += 1;
                let passage_id = format!("passage_{}", pass_num);
                current_pass = Some(passage_id.clone());
                passages.push(Passage::new(
                    passage_id,
                    self.to_br_lines(m.as_str()),
                    block[m.end()..].trim().to_string(),
                    question_number + 1,
                ));
            } else {
                // 常规题：选项之前的文本可能是篇章内容片段
                if let Some(pass_id) = current_pass.as_deref() {
                    if let Some(opt) = self.segment.option_lead.find(block) {
                        let before = block[..opt.start()].trim();
                        if before.chars().count() > 30 && !self.segment.stem_lead.is_match(before) {
                            if let Some(passage) =
                                passages.iter_mut().find(|p| p.passage_id == pass_id)
                            {
                                passage.parts.push(before.to_string());
                            }
                        }
                    }
                }

                questions.push(self.parse_question(
                    question_number,
                    block,
                    answers,
                    current_pass.as_deref(),
                ));
            }
        }

        (passages, questions)
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::ExamExtractor;

    fn extractor() -> ExamExtractor {
        ExamExtractor::new().expect("模式编译失败")
    }

    const INTRO: &str = "Read the following passage and mark the letter A, B, C or D to indicate the correct answer.";

    #[test]
    fn test_preamble_creates_first_passage() {
        let e = extractor();
        let content = format!(
            "{INTRO}\nThe sun is a star at the center of our planetary system.\n\nQuestion 1. According to the passage, the sun is a star?\nA. yes\nB. no\nC. maybe\nD. unsure"
        );
        let key = e.parse_answer_key("");
        let (passages, questions) = e.segment_content(&content, &key);

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].passage_id, "passage_1");
        assert_eq!(passages[0].q_start, Some(1));
        assert!(passages[0].instruction.starts_with("Read the following passage"));
        assert!(passages[0].parts[0].contains("The sun is a star"));

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].passage_related.as_deref(), Some("passage_1"));
    }

    #[test]
    fn test_no_intro_means_no_passage() {
        let e = extractor();
        let content = "Choose the best answer.\n\nQuestion 1. Pick one.\nA. a\nB. b\nC. c\nD. d";
        let key = e.parse_answer_key("");
        let (passages, questions) = e.segment_content(content, &key);

        assert!(passages.is_empty());
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].passage_related, None);
    }

    #[test]
    fn test_intro_inside_block_splits_question_and_passage() {
        let e = extractor();
        let content = format!(
            "Question 4. The word happy is closest in meaning to?\nA. sad\nB. glad\nC. mad\nD. bad\n{INTRO}\nBig sale this weekend at the city mall with many discounts."
        );
        let key = e.parse_answer_key("");
        let (passages, questions) = e.segment_content(&content, &key);

        // 引导语之前是独立题目，不属于任何篇章
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_number, 4);
        assert_eq!(questions[0].passage_related, None);
        assert_eq!(questions[0].options.len(), 4);

        // 新篇章从下一题开始
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].q_start, Some(5));
        assert!(passages[0].parts[0].contains("Big sale this weekend"));
    }

    #[test]
    fn test_passage_fragment_appended_from_block() {
        let e = extractor();
        let content = format!(
            "{INTRO}\nFirst paragraph of the passage text goes right here.\n\nQuestion 1. Second paragraph of the passage continues the story a bit longer.\nA. a\nB. b\nC. c\nD. d"
        );
        let key = e.parse_answer_key("");
        let (passages, _questions) = e.segment_content(&content, &key);

        assert_eq!(passages[0].parts.len(), 2);
        assert!(passages[0].parts[1].starts_with("Second paragraph"));
    }

    #[test]
    fn test_stem_like_text_not_appended_as_fragment() {
        let e = extractor();
        let content = format!(
            "{INTRO}\nPassage body text that is long enough to count as content.\n\nQuestion 1. Which of the following is TRUE according to the passage?\nA. a\nB. b\nC. c\nD. d"
        );
        let key = e.parse_answer_key("");
        let (passages, questions) = e.segment_content(&content, &key);

        // 疑问词开头的文本是题干，不并入篇章内容
        assert_eq!(passages[0].parts.len(), 1);
        assert_eq!(questions[0].passage_related.as_deref(), Some("passage_1"));
    }

    #[test]
    fn test_short_fragment_not_appended() {
        let e = extractor();
        let content = format!(
            "{INTRO}\nPassage body.\n\nQuestion 1. Too short\nA. a\nB. b\nC. c\nD. d"
        );
        let key = e.parse_answer_key("");
        let (passages, _questions) = e.segment_content(&content, &key);

        assert_eq!(passages[0].parts.len(), 1);
    }
}
