use serde::{Deserialize, Serialize};

/// 单个定位字符记录
///
/// 外部文本提取能力按页输出的最小单位：字符内容加上
/// 页面坐标和字体名称。坐标单位与来源保持一致，纵向
/// 数值越大表示越靠下。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharRecord {
    pub text: String,
    pub vertical_position: f64,
    pub horizontal_position: f64,
    #[serde(default)]
    pub font_name: String,
}

impl CharRecord {
    /// 字体是否为粗体（字体名包含 bold / heavy，不区分大小写）
    pub fn is_bold(&self) -> bool {
        let font = self.font_name.to_lowercase();
        font.contains("bold") || font.contains("heavy")
    }
}

/// 一份待提取的文档：按页组织的字符记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDocument {
    pub name: String,
    pub pages: Vec<Vec<CharRecord>>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ExamDocument {
    /// 文档中的字符总数（用于日志）
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.len()).sum()
    }
}
