//! 文本清理 - 去水印、归一空白
//!
//! 清理是幂等的：对已清理文本再次调用结果不变。

use super::ExamExtractor;
use regex::Regex;

/// 清理用的正则集合
pub(crate) struct CleanPatterns {
    /// 来源固定水印
    watermark: Regex,
    /// 连续空格 / 制表符
    hspace: Regex,
    /// 换行两侧的空格
    newline_pad: Regex,
    /// 超过两个的连续换行
    blank_runs: Regex,
}

impl CleanPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            watermark: Regex::new(r"TAILIEUDIEUKY\s*©\s*2025")?,
            hspace: Regex::new(r"[ \t]+")?,
            newline_pad: Regex::new(r" *\n *")?,
            blank_runs: Regex::new(r"\n{3,}")?,
        })
    }
}

impl ExamExtractor {
    /// 去除水印并归一空白
    ///
    /// 保留换行结构：空格制表符压成单个空格，换行两侧
    /// 不留空格，连续空行最多保留一个。
    pub fn clean_text(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let text = self.clean.watermark.replace_all(text, "");
        let text = self.clean.hspace.replace_all(&text, " ");
        let text = self.clean.newline_pad.replace_all(&text, "\n");
        let text = self.clean.blank_runs.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}
