//! 粗体标记平衡与剥离
//!
//! 版面重建输出的 `<b>`/`</b>` 是普通子串，切块之后
//! 很容易出现半开半闭的span。所有修复都集中在这里，
//! 其他模块不做零散的字符串修补。

use super::ExamExtractor;
use regex::Regex;

/// 标记处理用的正则集合
pub(crate) struct MarkupPatterns {
    /// 空的粗体span
    empty_span: Regex,
    /// 连续的重复开标记
    doubled_open: Regex,
    /// 连续的重复闭标记
    doubled_close: Regex,
    /// 粗体标记本体
    bold_tag: Regex,
    /// 任意标记（行渲染判定用）
    pub(crate) html_tag: Regex,
    /// 段落内相邻span的接缝
    pub(crate) seam: Regex,
    /// 行渲染里相邻span的接缝（允许无空格）
    pub(crate) seam_tight: Regex,
}

impl MarkupPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            empty_span: Regex::new(r"<b>\s*</b>")?,
            doubled_open: Regex::new(r"<b>(<b>)+")?,
            doubled_close: Regex::new(r"(</b>)+</b>")?,
            bold_tag: Regex::new(r"</?b>")?,
            html_tag: Regex::new(r"<[^>]*>")?,
            seam: Regex::new(r"</b>\s+<b>")?,
            seam_tight: Regex::new(r"</b>\s*<b>")?,
        })
    }
}

impl ExamExtractor {
    /// 修复粗体标记
    ///
    /// 不变量：输出中开闭标记数量相等，且不含空span。
    /// 先折叠重复标记，再按计数补齐缺口，最后循环清掉
    /// 折叠后暴露出来的空span（每次删除一开一闭，平衡保持）。
    pub fn balance_bold(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = self.markup.doubled_open.replace_all(text, "<b>");
        let mut text = self.markup.doubled_close.replace_all(&text, "</b>").to_string();

        let opens = text.matches("<b>").count();
        let closes = text.matches("</b>").count();
        if opens > closes {
            text.push_str(&"</b>".repeat(opens - closes));
        } else if closes > opens {
            text = format!("{}{}", "<b>".repeat(closes - opens), text);
        }

        loop {
            let cleaned = self.markup.empty_span.replace_all(&text, "").to_string();
            if cleaned == text {
                break;
            }
            text = cleaned;
        }

        text.trim().to_string()
    }

    /// 剥离粗体标记（分类判定前使用）
    pub fn strip_bold(&self, text: &str) -> String {
        self.markup.bold_tag.replace_all(text, "").to_string()
    }
}
