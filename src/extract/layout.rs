//! 版面重建 - 把定位字符还原为带粗体标记的文本
//!
//! 提取能力给出的字符顺序是扫描顺序而不是阅读顺序，
//! 这里按（纵坐标取一位小数，横坐标）排序来近似阅读顺序，
//! 再根据纵向间距推断换行和分段。

use crate::models::CharRecord;

/// 段落间距阈值（坐标单位）
const PARAGRAPH_GAP: f64 = 15.0;
/// 行间距阈值
const LINE_GAP: f64 = 3.0;

/// 纵坐标取一位小数，抵消坐标抖动
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 重建单页文本
///
/// 粗体span保证与文本单调对齐且不嵌套：换行前先闭合，
/// 输入结束时闭合所有未关闭的标记。
pub fn reconstruct_page(chars: &[CharRecord]) -> String {
    if chars.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&CharRecord> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        round1(a.vertical_position)
            .total_cmp(&round1(b.vertical_position))
            .then(a.horizontal_position.total_cmp(&b.horizontal_position))
    });

    let mut output = String::new();
    let mut is_bold = false;
    let mut prev_y: Option<f64> = None;

    for ch in sorted {
        let y = round1(ch.vertical_position);

        // 根据纵向间距插入换行
        if let Some(prev) = prev_y {
            let diff = (y - prev).abs();
            if diff > PARAGRAPH_GAP {
                if is_bold {
                    output.push_str("</b>");
                    is_bold = false;
                }
                output.push_str("\n\n");
            } else if diff > LINE_GAP {
                if is_bold {
                    output.push_str("</b>");
                    is_bold = false;
                }
                output.push('\n');
            }
        }

        prev_y = Some(y);

        // 粗体状态切换
        let char_bold = ch.is_bold();
        if char_bold && !is_bold {
            output.push_str("<b>");
            is_bold = true;
        } else if !char_bold && is_bold {
            output.push_str("</b>");
            is_bold = false;
        }

        output.push_str(&ch.text);
    }

    if is_bold {
        output.push_str("</b>");
    }

    output
}
