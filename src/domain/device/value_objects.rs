//! Device Context - Value Objects

use std::fmt;
use std::str::FromStr;

use super::AddressError;

/// MKS 固件命令端口
pub const DEFAULT_COMMAND_PORT: u16 = 8080;

/// 设备地址
///
/// 不变量:
/// - HTTP 上传端点与 TCP 命令端点使用同一主机，仅传输层与端口不同
/// - 启动后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    host: String,
    http_port: Option<u16>,
    command_port: u16,
}

impl DeviceAddress {
    pub fn new(host: impl Into<String>) -> Result<Self, AddressError> {
        let host = host.into();
        validate_host(&host)?;
        Ok(Self {
            host,
            http_port: None,
            command_port: DEFAULT_COMMAND_PORT,
        })
    }

    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = Some(port);
        self
    }

    pub fn with_command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn http_port(&self) -> Option<u16> {
        self.http_port
    }

    pub fn command_port(&self) -> u16 {
        self.command_port
    }

    /// IPv6 字面量在 URL/socket 地址中需要方括号
    fn bracketed_host(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    /// HTTP authority 部分（host 或 host:port）
    pub fn authority(&self) -> String {
        match self.http_port {
            Some(port) => format!("{}:{}", self.bracketed_host(), port),
            None => self.bracketed_host(),
        }
    }

    /// 设备上传 URL
    ///
    /// `http://<host>/upload?X-Filename=<filename>`，文件名做百分号编码
    pub fn upload_url(&self, filename: &str) -> String {
        format!(
            "http://{}/upload?X-Filename={}",
            self.authority(),
            urlencoding::encode(filename)
        )
    }

    /// TCP 命令端点（host:command_port）
    pub fn command_endpoint(&self) -> String {
        format!("{}:{}", self.bracketed_host(), self.command_port)
    }
}

fn validate_host(host: &str) -> Result<(), AddressError> {
    if host.is_empty() {
        return Err(AddressError::Empty);
    }
    if host
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '[' | ']'))
    {
        return Err(AddressError::InvalidHost(host.to_string()));
    }
    Ok(())
}

fn parse_port(port: &str) -> Result<u16, AddressError> {
    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(AddressError::InvalidPort(port.to_string())),
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressError;

    /// 支持 `host`、`host:port`、`[v6]`、`[v6]:port` 与裸 IPv6 字面量
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| AddressError::InvalidHost(s.to_string()))?;
            let address = Self::new(host)?;
            return match tail {
                "" => Ok(address),
                _ => {
                    let port = tail
                        .strip_prefix(':')
                        .ok_or_else(|| AddressError::InvalidHost(s.to_string()))?;
                    Ok(address.with_http_port(parse_port(port)?))
                }
            };
        }

        // 多个冒号只可能是未加括号的 IPv6 地址
        if s.matches(':').count() > 1 {
            return Self::new(s);
        }

        match s.split_once(':') {
            Some((host, port)) => Ok(Self::new(host)?.with_http_port(parse_port(port)?)),
            None => Self::new(s),
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority())
    }
}

/// MKS 命令（行协议，CRLF 结尾）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MksCommand {
    /// M23 - 选择 SD 卡上的文件
    SelectFile(String),
    /// M24 - 开始/恢复打印
    StartPrint,
}

impl MksCommand {
    pub fn to_line(&self) -> String {
        match self {
            Self::SelectFile(filename) => format!("M23 {}\r\n", filename),
            Self::StartPrint => "M24\r\n".to_string(),
        }
    }
}
