//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志、准备输出目录、编译提取引擎
//! 2. **批量加载**：扫描并加载所有待处理的字符文档
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节，向下委托 document_processor
//! - **引擎共享**：模式表编译一次，以 Arc 在任务间共享

use crate::config::Config;
use crate::extract::ExamExtractor;
use crate::models::{load_all_json_files, ExamDocument};
use crate::orchestrator::document_processor;
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    extractor: Arc<ExamExtractor>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 准备输出目录
        tokio::fs::create_dir_all(&config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", config.output_folder))?;

        // 编译提取引擎（模式表只编译一次）
        let extractor = Arc::new(ExamExtractor::new().context("提取引擎初始化失败")?);

        Ok(Self { config, extractor })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的文档
        let all_documents = self.load_documents().await?;

        if all_documents.is_empty() {
            warn!("⚠️ 没有找到待处理的JSON文件，程序结束");
            return Ok(());
        }

        let total_documents = all_documents.len();
        log_documents_loaded(total_documents, self.config.max_concurrent_documents);

        // 处理所有文档
        let stats = self.process_all_documents(all_documents).await?;

        // 输出最终统计
        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 加载文档
    async fn load_documents(&self) -> Result<Vec<ExamDocument>> {
        info!("\n📁 正在扫描待处理的文档...");
        load_all_json_files(&self.config.input_folder).await
    }

    /// 处理所有文档
    async fn process_all_documents(
        &self,
        all_documents: Vec<ExamDocument>,
    ) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents));
        let total_documents = all_documents.len();
        let mut stats = ProcessingStats {
            total: total_documents,
            ..Default::default()
        };

        let batch_size = self.config.max_concurrent_documents;
        let total_batches = total_documents.div_ceil(batch_size);

        // 分批处理
        for (batch_idx, batch) in all_documents.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            log_batch_start(
                batch_idx + 1,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total_documents,
            );

            // 处理本批
            let batch_result = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            log_batch_complete(batch_idx + 1, &batch_result);
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_documents: &[ExamDocument],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, document) in batch_documents.iter().enumerate() {
            let doc_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            // 引擎无可变状态，Arc 克隆即可安全共享
            let extractor = self.extractor.clone();
            let document_clone = document.clone();
            let config_clone = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match document_processor::process_document(
                    &extractor,
                    document_clone,
                    doc_index,
                    &config_clone,
                )
                .await
                {
                    Ok(has_questions) => Ok(has_questions),
                    Err(e) => {
                        error!("[文档 {}] ❌ 处理过程中发生错误: {}", doc_index, e);
                        Err(e)
                    }
                }
            });
            batch_handles.push((doc_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();

        for (doc_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(true)) => {
                    result.success += 1;
                }
                Ok(Ok(false)) | Ok(Err(_)) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", doc_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}

// ========== 日志辅助函数 ==========

fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n试卷提取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量试卷提取模式");
    info!("📊 最大并发数: {}", config.max_concurrent_documents);
    info!("📂 输入目录: {}", config.input_folder);
    info!("{}", "=".repeat(60));
}

fn log_documents_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的文档", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
    info!("💡 每批完成后再开始下一批\n");
}

fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批文档: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(batch_num: usize, result: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 成功 {}/{}",
        batch_num,
        result.success,
        result.success + result.failed
    );
    info!("{}", "─".repeat(60));
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败或降级: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
