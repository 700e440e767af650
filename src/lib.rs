//! # Exam PDF Convert
//!
//! 把外部提取能力输出的定位字符流转换为结构化英语试卷
//! （阅读篇章 + 选择题）的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用三层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 输入输出数据结构与文档加载器
//! - `CharRecord` / `ExamDocument` - 外部提取能力的字符契约
//! - `Passage` / `Question` / `ExamData` - 对外的试卷结构
//!
//! ### ② 能力层（Extract）
//! - `extract/` - 提取引擎，只处理单份文档，同步纯计算
//! - 版面重建 → 清理 → 分段 → 题目解析 → 篇章渲染 → 边界修正
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//! - `orchestrator/document_processor` - 单个文档处理器，落盘结果
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod orchestrator;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extract::{AnswerKey, ExamExtractor};
pub use models::{
    load_all_json_files, load_json_to_document, CharRecord, ExamData, ExamDocument, ExtractStats,
    Passage, Question, QuestionTag,
};
pub use orchestrator::{process_document, App};
