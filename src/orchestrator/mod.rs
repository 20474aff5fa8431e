//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责并发调度和结果汇总，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 全量字母处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 控制同时处理的字母数（Semaphore）
//! - 持有浏览器会话
//! - 汇总所有字母的结果并导出一次
//!
//! ### `letter_processor` - 单个字母处理器
//! - 翻页提取本字母的公司链接
//! - 启动固定数量的工作任务，每个独占一个标签页
//! - 按完成顺序收集公司结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<DirectoryLetter>)
//!     ↓
//! letter_processor (处理 Vec<公司 URL>)
//!     ↓
//! workflow::CompanyFlow (处理单家公司)
//!     ↓
//! services (能力层：link_extractor / company_checker / report_writer)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管全量，letter_processor 管单个字母
//! 2. **资源隔离**：只有编排层打开和关闭标签页
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod letter_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use letter_processor::process_letter;
