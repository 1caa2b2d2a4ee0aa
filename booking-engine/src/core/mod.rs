//! 核心模块 - 配置与错误定义
//!
//! - [`Config`] - 引擎配置
//! - [`BookingError`] - 引擎错误

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{BookingError, Result};
