//! 答案表 - 文档尾部答案区的解析与查询

use super::ExamExtractor;
use regex::Regex;
use std::collections::HashMap;

/// 答案区解析用的正则集合
pub(crate) struct KeyPatterns {
    /// `题号. 字母` 条目
    entry: Regex,
}

impl KeyPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            entry: Regex::new(r"(\d+)\.\s*([A-D])")?,
        })
    }
}

/// 答案表：题号到答案字母的只读映射
///
/// 构建一次后不再修改；重复题号按后出现的为准。
#[derive(Debug, Default, Clone)]
pub struct AnswerKey {
    answers: HashMap<u32, String>,
}

impl AnswerKey {
    /// 查询某题答案，缺失时返回空串
    pub fn resolve(&self, question_number: u32) -> String {
        self.answers.get(&question_number).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl ExamExtractor {
    /// 从答案区文本构建答案表
    pub fn parse_answer_key(&self, answer_text: &str) -> AnswerKey {
        let mut answers = HashMap::new();

        for caps in self.key.entry.captures_iter(answer_text) {
            let number = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let letter = caps.get(2).map(|m| m.as_str().to_string());
            if let (Some(number), Some(letter)) = (number, letter) {
                answers.insert(number, letter);
            }
        }

        AnswerKey { answers }
    }
}
