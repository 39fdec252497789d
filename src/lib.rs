//! mksproxy - OctoPrint 上传接口到 MKS 打印机控制器的转发代理
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Upload Context: 上传转发任务及其状态机
//! - Device Context: 设备地址与命令
//!
//! 应用层 (application/):
//! - Ports: 端口定义（DeviceUpload, JobControl）
//! - Commands: 转发命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: OctoPrint 兼容 API
//! - Adapters: MKS 上传客户端、命令通道、上传缓冲

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
