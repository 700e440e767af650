//! 单文档处理器
//!
//! 对一份已加载的字符文档跑完整提取流程并落盘结果。
//! 内容层面的异常在引擎内部降级，这里只关心 IO 失败。

use crate::config::Config;
use crate::error::AppError;
use crate::extract::ExamExtractor;
use crate::models::ExamDocument;
use anyhow::Result;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 处理单个文档
///
/// # 参数
/// - `extractor`: 提取引擎
/// - `document`: 文档数据
/// - `doc_index`: 文档索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回是否产出了有效题目（true=有题目，false=整卷降级为空）
pub async fn process_document(
    extractor: &ExamExtractor,
    document: ExamDocument,
    doc_index: usize,
    config: &Config,
) -> Result<bool> {
    log_document_start(doc_index, &document);

    // 提取是同步纯计算，无需挂起
    let data = extractor.extract(&document);
    let stats = data.stats();

    info!(
        "[文档 {}] ✅ 提取完成: {} 个篇章, {} 道题目 (带标签 {}, 无选项 {})",
        doc_index, stats.passages, stats.questions, stats.tagged, stats.no_options
    );

    if config.verbose_logging {
        for question in &data.questions {
            info!(
                "[文档 {}]   题 {} 选项 {} 答案 '{}' 篇章 {:?}",
                doc_index,
                question.question_number,
                question.options.len(),
                question.answer,
                question.passage_related
            );
        }
    }

    // 落盘：每份输入对应一个 .exam.json
    let output_path = output_path_for(&document, config);
    let json = serde_json::to_string_pretty(&data)
        .map_err(|e| AppError::json_parse_failed(output_path.display().to_string(), e))?;
    fs::write(&output_path, json)
        .await
        .map_err(|e| AppError::file_write_failed(output_path.display().to_string(), e))?;

    info!("[文档 {}] 💾 已写入: {}", doc_index, output_path.display());

    if stats.questions == 0 {
        warn!("[文档 {}] ⚠️ 没有识别出任何题目，输出为空结构", doc_index);
        return Ok(false);
    }

    Ok(true)
}

/// 推导输出文件路径：输入文件名去扩展名 + `.exam.json`
fn output_path_for(document: &ExamDocument, config: &Config) -> std::path::PathBuf {
    let stem = document
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).file_stem().map(|s| s.to_string_lossy().to_string()))
        .unwrap_or_else(|| document.name.clone());

    Path::new(&config.output_folder).join(format!("{}.exam.json", stem))
}

// ========== 日志辅助函数 ==========

fn log_document_start(doc_index: usize, document: &ExamDocument) {
    info!("[文档 {}] 开始处理", doc_index);
    info!("[文档 {}] 名称: {}", doc_index, document.name);
    info!(
        "[文档 {}] 页数: {}, 字符数: {}",
        doc_index,
        document.pages.len(),
        document.char_count()
    );
}
