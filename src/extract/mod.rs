//! 提取引擎 - 能力层
//!
//! 从定位字符到结构化试卷的完整流水线：
//!
//! 1. `layout` - 版面重建（字符聚类成行、段落和粗体span）
//! 2. `clean` - 文本清理（去水印、归一空白）
//! 3. `segment` - 试卷分段（前言 / 题目块 / 答案区 / 篇章边界）
//! 4. `question` - 题目解析（选项定位、题型分类、答案关联）
//! 5. `render` + 篇章收尾 - 片段合并与段落渲染
//! 6. `boundary` - 篇章末题关联的二次校正
//!
//! 引擎单线程同步运行，对同一输入是幂等的；内容异常
//! 一律降级（空选项、零篇章、空答案表），不向调用方抛错。
//! 所有正则模式在 [`ExamExtractor::new`] 里编译一次。

pub mod answer_key;
pub mod boundary;
pub mod clean;
pub mod layout;
pub mod markup;
pub mod question;
pub mod render;
pub mod segment;

pub use answer_key::AnswerKey;

use crate::error::AppResult;
use crate::models::{ExamData, ExamDocument};

/// 试卷提取引擎
///
/// 持有全部编译好的正则模式，可跨文档复用；
/// 自身无可变状态，`&self` 即可完成整次提取。
pub struct ExamExtractor {
    pub(crate) clean: clean::CleanPatterns,
    pub(crate) markup: markup::MarkupPatterns,
    pub(crate) render: render::RenderPatterns,
    pub(crate) segment: segment::SegmentPatterns,
    pub(crate) key: answer_key::KeyPatterns,
    pub(crate) options: question::OptionPatterns,
    pub(crate) classify: question::ClassifyPatterns,
}

impl ExamExtractor {
    /// 编译全部模式，构建引擎
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            clean: clean::CleanPatterns::compile()?,
            markup: markup::MarkupPatterns::compile()?,
            render: render::RenderPatterns::compile()?,
            segment: segment::SegmentPatterns::compile()?,
            key: answer_key::KeyPatterns::compile()?,
            options: question::OptionPatterns::compile()?,
            classify: question::ClassifyPatterns::compile()?,
        })
    }

    /// 提取一份文档
    ///
    /// 逐页重建并清理文本，页间以空行衔接，然后走
    /// [`extract_from_text`](Self::extract_from_text)。
    pub fn extract(&self, document: &ExamDocument) -> ExamData {
        let mut full_text = String::new();
        for page in &document.pages {
            let text = layout::reconstruct_page(page);
            let text = self.clean_text(&text);
            full_text.push_str(&text);
            full_text.push_str("\n\n");
        }
        self.extract_from_text(&full_text)
    }

    /// 从已重建的标注文本提取试卷结构
    ///
    /// 答案区解析和篇章区间推导都需要完整文本，
    /// 因此入参是整份文档而不是流。
    pub fn extract_from_text(&self, full_text: &str) -> ExamData {
        // 答案区切分：首个 `Answer(s):` 之后都算答案区
        let (content, answer_text) = match self.segment.answer_split.find(full_text) {
            Some(m) => (&full_text[..m.start()], &full_text[m.start()..]),
            None => (full_text, ""),
        };

        let answers = self.parse_answer_key(answer_text);

        // 阶段一：分段扫描，产出临时记录
        let (mut passages, mut questions) = self.segment_content(content, &answers);

        // 阶段二：全量修正篇章关联
        boundary::fix_passage_links(&passages, &mut questions);

        // 篇章收尾：合并片段并渲染为段落标记
        self.finalize_passages(&mut passages);

        ExamData {
            passages,
            questions,
        }
    }

    /// 合并篇章片段并渲染内容
    ///
    /// 编号填空占位行在渲染前剔除；渲染后丢弃中间状态。
    fn finalize_passages(&self, passages: &mut [crate::models::Passage]) {
        for passage in passages.iter_mut() {
            let combined = passage.parts.join("\n\n");
            let combined = self.render.blank_line.replace_all(&combined, "");
            passage.content = self.to_html_paragraphs(&combined);
            passage.parts.clear();
            passage.q_start = None;
        }
    }
}
