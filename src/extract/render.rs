//! 文本渲染 - 段落标记与行合并
//!
//! 篇章正文渲染成 `<p>` 段落，题干和排序题选项渲染成
//! `<br>` 连接的逻辑行。

use super::ExamExtractor;
use regex::Regex;

/// 渲染用的正则集合
pub(crate) struct RenderPatterns {
    /// 引用来源行（Adapted / Source / By ...）
    citation: Regex,
    /// 段内多余空白
    multi_ws: Regex,
    /// 新逻辑行的行首标记
    new_item: Regex,
    /// 编号填空占位行（篇章渲染前剔除）
    pub(crate) blank_line: Regex,
}

impl RenderPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            citation: Regex::new(r"(?i)^\(?(Adapted|Source|By\s)")?,
            multi_ws: Regex::new(r"\s+")?,
            new_item: Regex::new(r"^([a-e]\s*-|[A-D]\.|Question\s+\d+|\d+\.)")?,
            blank_line: Regex::new(r"\([0-9]+\)\s*_{2,}[^\n]*")?,
        })
    }
}

impl ExamExtractor {
    /// 渲染为 `<p>` 段落标记
    ///
    /// 按空行分段，段内换行折成空格，逐段平衡粗体，
    /// 过短的段落丢弃；引用来源行使用单独的样式类。
    pub fn to_html_paragraphs(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut result = Vec::new();

        for para in text.split("\n\n") {
            let p = para.replace('\n', " ");
            let p = self.render.multi_ws.replace_all(&p, " ");
            let p = self.balance_bold(p.trim());
            // 相邻span合并
            let p = self.markup.seam.replace_all(&p, " ").to_string();

            if p.chars().count() < 5 {
                continue;
            }

            if self.render.citation.is_match(&p) {
                result.push(format!(
                    r#"<p class="text-right italic text-sm text-gray-500">{}</p>"#,
                    p
                ));
            } else {
                result.push(format!(r#"<p class="mb-4 text-justify">{}</p>"#, p));
            }
        }

        result.join("\n")
    }

    /// 渲染为 `<br>` 连接的逻辑行
    ///
    /// 行首是小写字母短横（a- b- ...）、大写选项字母、
    /// Question 编号或数字列表时视为新行，否则并入上一行。
    pub fn to_br_lines(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut result: Vec<String> = Vec::new();

        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let pure = self.markup.html_tag.replace_all(line, "");
            if self.render.new_item.is_match(&pure) || result.is_empty() {
                result.push(line.to_string());
            } else if let Some(last) = result.last_mut() {
                last.push(' ');
                last.push_str(line);
            }
        }

        let joined = self.balance_bold(&result.join("<br>"));
        self.markup.seam_tight.replace_all(&joined, " ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::ExamExtractor;

    fn extractor() -> ExamExtractor {
        ExamExtractor::new().expect("模式编译失败")
    }

    #[test]
    fn test_paragraphs_basic() {
        let e = extractor();
        let html = e.to_html_paragraphs("First paragraph\nsame line.\n\nSecond paragraph.");
        assert_eq!(
            html,
            "<p class=\"mb-4 text-justify\">First paragraph same line.</p>\n\
             <p class=\"mb-4 text-justify\">Second paragraph.</p>"
        );
    }

    #[test]
    fn test_citation_paragraph_styled() {
        let e = extractor();
        let html = e.to_html_paragraphs("Body text here.\n\nAdapted from a science magazine");
        assert!(html.contains("text-right italic text-sm text-gray-500"));
        assert!(html.contains("Adapted from a science magazine"));
    }

    #[test]
    fn test_short_paragraph_dropped() {
        let e = extractor();
        assert_eq!(e.to_html_paragraphs("ab\n\nA real paragraph."), "<p class=\"mb-4 text-justify\">A real paragraph.</p>");
    }

    #[test]
    fn test_paragraph_bold_balanced() {
        let e = extractor();
        let html = e.to_html_paragraphs("<b>Title paragraph without close");
        assert_eq!(html.matches("<b>").count(), html.matches("</b>").count());
    }

    #[test]
    fn test_adjacent_spans_merged() {
        let e = extractor();
        let html = e.to_html_paragraphs("<b>one</b> <b>two</b> words");
        assert!(html.contains("<b>one two</b>"), "相邻span应合并: {html}");
    }

    #[test]
    fn test_br_lines_continuation() {
        let e = extractor();
        let out = e.to_br_lines("The sentence starts here\nand continues on this line");
        assert_eq!(out, "The sentence starts here and continues on this line");
    }

    #[test]
    fn test_br_lines_item_starts() {
        let e = extractor();
        let out = e.to_br_lines("Put the steps in order.\na- wake up\nb- eat\nA. a-b\nB. b-a");
        assert_eq!(out, "Put the steps in order.<br>a- wake up<br>b- eat<br>A. a-b<br>B. b-a");
    }

    #[test]
    fn test_br_lines_question_marker_is_new_item() {
        let e = extractor();
        let out = e.to_br_lines("intro line\nQuestion 12 follows here");
        assert_eq!(out, "intro line<br>Question 12 follows here");
    }
}
