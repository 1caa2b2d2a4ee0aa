//! 用户提示消息类型定义
//!
//! 预约流程只决定"显示哪条提示"，具体文案与渲染由 UI 层根据
//! [`NoticeKey`] 做本地化。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ErrorCode;

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// 本地化提示键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKey {
    /// services 步骤：未选择任何服务
    SelectAtLeastOneService,
    /// datetime 步骤：未选择日期
    SelectDate,
    /// barber 步骤：未选择理发师
    SelectBarber,
    /// barber 步骤：未选择时间段
    SelectTimeSlot,
    /// details 步骤：表单无效
    CompleteCustomerDetails,
    /// 套餐已应用
    PackageApplied,
    /// 套餐提交最终失败
    PackageCommitFailed,
    /// 套餐更新仍在进行
    PackageUpdateInProgress,
    /// 超出套餐可选服务数量
    MaxServicesReached,
    /// 加购服务已添加
    UpsellAdded,
    /// 通用错误
    GenericError,
}

impl NoticeKey {
    /// i18n 键
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKey::SelectAtLeastOneService => "booking.errors.select_service",
            NoticeKey::SelectDate => "booking.errors.select_date",
            NoticeKey::SelectBarber => "booking.errors.select_barber",
            NoticeKey::SelectTimeSlot => "booking.errors.select_time",
            NoticeKey::CompleteCustomerDetails => "booking.errors.complete_details",
            NoticeKey::PackageApplied => "booking.package.applied",
            NoticeKey::PackageCommitFailed => "booking.package.commit_failed",
            NoticeKey::PackageUpdateInProgress => "booking.package.in_progress",
            NoticeKey::MaxServicesReached => "booking.package.max_services",
            NoticeKey::UpsellAdded => "booking.upsell.added",
            NoticeKey::GenericError => "common.errors.generic",
        }
    }

    /// 默认级别
    pub fn level(&self) -> NoticeLevel {
        match self {
            NoticeKey::PackageApplied | NoticeKey::UpsellAdded => NoticeLevel::Success,
            NoticeKey::PackageUpdateInProgress => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        }
    }

    /// 错误码对应的提示键
    pub fn for_error(code: ErrorCode) -> Self {
        match code {
            ErrorCode::SelectionEmpty => NoticeKey::SelectAtLeastOneService,
            ErrorCode::MaxServicesExceeded => NoticeKey::MaxServicesReached,
            ErrorCode::ReconciliationInProgress => NoticeKey::PackageUpdateInProgress,
            ErrorCode::PackageCommitFailed => NoticeKey::PackageCommitFailed,
            _ => NoticeKey::GenericError,
        }
    }
}

impl fmt::Display for NoticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 发送给通知组件的提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub key: NoticeKey,
}

impl Notice {
    /// 使用键的默认级别创建提示
    pub fn new(key: NoticeKey) -> Self {
        Self {
            level: key.level(),
            key,
        }
    }

    pub fn error(key: NoticeKey) -> Self {
        Self {
            level: NoticeLevel::Error,
            key,
        }
    }
}

impl From<NoticeKey> for Notice {
    fn from(key: NoticeKey) -> Self {
        Self::new(key)
    }
}
