use crate::models::chars::ExamDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 JSON 文件加载数据并转换为 ExamDocument 对象
///
/// 文件由外部文本提取能力生成，每份文档一个文件，
/// 内容为 `{name, pages: [[字符记录, ...], ...]}`。
pub async fn load_json_to_document(json_file_path: &Path) -> Result<ExamDocument> {
    let content = fs::read_to_string(json_file_path)
        .await
        .with_context(|| format!("无法读取JSON文件: {}", json_file_path.display()))?;

    let mut document: ExamDocument = serde_json::from_str(&content)
        .with_context(|| format!("无法解析JSON文件: {}", json_file_path.display()))?;

    // 设置文件路径
    document.file_path = Some(json_file_path.to_string_lossy().to_string());

    Ok(document)
}

/// 从文件夹中加载所有 JSON 文件并转换为 ExamDocument 对象列表
pub async fn load_all_json_files(folder_path: &str) -> Result<Vec<ExamDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_json_to_document(&path).await {
                Ok(document) => {
                    tracing::info!(
                        "成功加载 {} 页, {} 个字符",
                        document.pages.len(),
                        document.char_count()
                    );
                    documents.push(document);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(documents)
}
