//! Booking Engine - 预约向导核心
//!
//! # 架构概述
//!
//! 驱动多步骤预约向导 (services → datetime → barber → details)，
//! 并在选择服务时计算套餐折扣：
//!
//! - **定价** (`pricing`): 折扣档位解析与套餐重新定价
//! - **选择** (`selection`): 已选服务存储与删除级联规则
//! - **套餐** (`package`): 套餐构建与提交同步
//! - **重试** (`retry`): 有界重试执行器
//! - **向导** (`wizard`): 步骤校验与状态机
//!
//! # 模块结构
//!
//! ```text
//! booking-engine/src/
//! ├── core/          # 配置、错误
//! ├── pricing/       # 折扣引擎
//! ├── selection/     # 选择存储、删除策略
//! ├── package/       # 套餐构建、同步
//! ├── retry.rs       # 重试执行器
//! ├── wizard/        # 步骤控制器
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod package;
pub mod pricing;
pub mod retry;
pub mod selection;
pub mod utils;
pub mod wizard;

// Re-export 公共类型
pub use crate::core::{BookingError, Config, Result};
pub use package::{PackageBuilder, PackageComposition, PackageOffer, PackageReconciler};
pub use pricing::{PackageDiscountEngine, resolve_discount_percentage};
pub use retry::{RetryPolicy, execute_with_retry};
pub use selection::{RemovalOutcome, SelectionBackend, SelectionStore, ServiceRemovalPolicy};
pub use wizard::{
    BookingStepController, Collaborators, Detour, StepValidationGate, Transition, WizardState,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_from_config, init_logger_with_file};

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_from_config(&config);
    config
}
