//! Upload Context - Aggregate Root

use std::fmt;

use uuid::Uuid;

use super::{RelayError, RelayErrorKind};

/// 转发阶段
///
/// Received → Extracted → UploadedToDevice → (AwaitingDeviceReady → CommandsSent →) Completed
/// 任意非终态都可进入 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    Extracted,
    UploadedToDevice,
    AwaitingDeviceReady,
    CommandsSent,
    Completed,
    Failed(RelayErrorKind),
}

impl RelayStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    pub fn can_advance_to(&self, next: RelayStage) -> bool {
        use RelayStage::*;

        match (*self, next) {
            (from, Failed(_)) => !from.is_terminal(),
            (Received, Extracted)
            | (Extracted, UploadedToDevice)
            | (UploadedToDevice, AwaitingDeviceReady)
            | (UploadedToDevice, Completed)
            | (AwaitingDeviceReady, CommandsSent)
            | (CommandsSent, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::Extracted => write!(f, "extracted"),
            Self::UploadedToDevice => write!(f, "uploaded_to_device"),
            Self::AwaitingDeviceReady => write!(f, "awaiting_device_ready"),
            Self::CommandsSent => write!(f, "commands_sent"),
            Self::Completed => write!(f, "completed"),
            Self::Failed(kind) => write!(f, "failed({:?})", kind),
        }
    }
}

/// RelayJob 聚合根
///
/// 不变量:
/// - 每个上传请求一个 RelayJob，不跨请求共享
/// - 只能按状态机定义的顺序推进，终态后不可再变化
/// - 不重试：任何失败都是终态
#[derive(Debug, Clone)]
pub struct RelayJob {
    id: Uuid,
    stage: RelayStage,
}

impl RelayJob {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: RelayStage::Received,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> RelayStage {
        self.stage
    }

    /// 推进到下一阶段
    pub fn advance(&mut self, next: RelayStage) -> Result<(), RelayError> {
        if !self.stage.can_advance_to(next) {
            return Err(RelayError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }

        tracing::debug!(
            request_id = %self.id,
            from = %self.stage,
            to = %next,
            "Relay stage changed"
        );
        self.stage = next;
        Ok(())
    }

    /// 标记失败（已处于终态时保持不变）
    pub fn fail(&mut self, error: &RelayError) {
        let next = RelayStage::Failed(error.kind());
        if self.stage.can_advance_to(next) {
            tracing::debug!(
                request_id = %self.id,
                from = %self.stage,
                error = %error,
                "Relay failed"
            );
            self.stage = next;
        }
    }
}

impl Default for RelayJob {
    fn default() -> Self {
        Self::new()
    }
}
