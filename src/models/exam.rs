use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 题目分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionTag {
    /// 完形填空（题干带编号空格）
    Cloze,
    /// 阅读理解（题干带阅读提示语）
    Reading,
}

impl QuestionTag {
    /// 获取标签名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionTag::Cloze => "cloze",
            QuestionTag::Reading => "reading",
        }
    }
}

/// 阅读篇章
///
/// 分段扫描期间先收集 `parts` 片段并记录起始题号，
/// 全部题目处理完后统一渲染为 `content`（见 extract 模块），
/// 对外只序列化 passage_id / instruction / content 三个字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub passage_id: String,
    pub instruction: String,
    #[serde(default)]
    pub content: String,
    /// 渲染前的内容片段（中间状态）
    #[serde(skip)]
    pub(crate) parts: Vec<String>,
    /// 篇章覆盖的起始题号（中间状态，终止题号由后处理推导）
    #[serde(skip)]
    pub(crate) q_start: Option<u32>,
}

impl Passage {
    pub(crate) fn new(passage_id: String, instruction: String, first_part: String, q_start: u32) -> Self {
        Self {
            passage_id,
            instruction,
            content: String::new(),
            parts: vec![first_part],
            q_start: Some(q_start),
        }
    }
}

/// 单道选择题
///
/// 两阶段构建：分段扫描先产出临时记录，边界修正
/// 后处理只会改写 `passage_related` 和已有的 `tags` 关联，
/// 其余字段在解析后不再变动。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question_number: u32,
    pub question_text: String,
    /// 选项映射（字母 A-D，完整解析时恰好按 A,B,C,D 顺序）
    pub options: BTreeMap<char, String>,
    /// 正确答案字母，答案表缺失时为空串
    pub answer: String,
    /// 关联篇章 ID（无篇章时为 None）
    pub passage_related: Option<String>,
    pub tags: Vec<QuestionTag>,
}

/// 提取结果：篇章列表 + 题目列表
///
/// 引擎返回后不再持有任何内部状态，消费方可以自由移动。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamData {
    pub passages: Vec<Passage>,
    pub questions: Vec<Question>,
}

impl ExamData {
    /// 汇总提取统计（降级情况通过计数可见）
    pub fn stats(&self) -> ExtractStats {
        ExtractStats {
            passages: self.passages.len(),
            questions: self.questions.len(),
            tagged: self.questions.iter().filter(|q| !q.tags.is_empty()).count(),
            no_options: self.questions.iter().filter(|q| q.options.is_empty()).count(),
        }
    }
}

/// 提取统计
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractStats {
    /// 篇章数量
    pub passages: usize,
    /// 题目数量
    pub questions: usize,
    /// 带分类标签的题目数量
    pub tagged: usize,
    /// 未识别出选项的题目数量
    pub no_options: usize,
}
