//! Mock MKS Device - 测试用的模拟打印机控制器
//!
//! 同一主机上同时提供 HTTP 上传端点和 TCP 命令端口，记录收到的所有内容

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode, Uri},
    routing::post,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::domain::device::DeviceAddress;

/// 模拟设备的行为
#[derive(Debug, Clone)]
pub(crate) struct MockDeviceBehavior {
    /// 上传接口返回的状态码
    pub upload_status: u16,
    /// 收到 M24 后立即回复的内容，None 表示直接断开
    pub command_reply: Option<Vec<u8>>,
    /// 延迟后追加的回复
    pub late_reply: Option<(Duration, Vec<u8>)>,
}

impl Default for MockDeviceBehavior {
    fn default() -> Self {
        Self {
            upload_status: 200,
            command_reply: Some(b"ok\r\n".to_vec()),
            late_reply: None,
        }
    }
}

/// 设备收到的一次上传请求
#[derive(Debug, Clone)]
pub(crate) struct CapturedUpload {
    pub raw_query: Option<String>,
    pub query_filename: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// multipart 中的文件部分
#[derive(Debug, Clone)]
pub(crate) struct FilePart {
    pub field_name: String,
    pub filename: String,
    pub data: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let marker = format!("; {}=\"", key);
    let start = headers.find(&marker)? + marker.len();
    let len = headers[start..].find('"')?;
    Some(headers[start..start + len].to_string())
}

impl CapturedUpload {
    /// 解析单个文件部分（设备请求不带 boundary 头，从正文首行取得）
    pub fn file_part(&self) -> Option<FilePart> {
        let body = &self.body;
        let delimiter_end = find(body, b"\r\n")?;
        let delimiter = &body[..delimiter_end];

        let headers_start = delimiter_end + 2;
        let headers_end = headers_start + find(&body[headers_start..], b"\r\n\r\n")?;
        let headers = std::str::from_utf8(&body[headers_start..headers_end]).ok()?;

        let data_start = headers_end + 4;
        let mut closing = b"\r\n".to_vec();
        closing.extend_from_slice(delimiter);
        let data_end = data_start + rfind(&body[data_start..], &closing)?;

        Some(FilePart {
            field_name: disposition_param(headers, "name")?,
            filename: disposition_param(headers, "filename")?,
            data: body[data_start..data_end].to_vec(),
        })
    }
}

#[derive(Clone)]
struct UploadState {
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
    status: StatusCode,
}

async fn handle_upload(
    State(state): State<UploadState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let raw_query = uri.query().map(str::to_string);
    let query_filename = raw_query
        .as_deref()
        .and_then(|q| q.strip_prefix("X-Filename="))
        .map(|v| {
            urlencoding::decode(v)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| v.to_string())
        });
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.uploads.lock().unwrap().push(CapturedUpload {
        raw_query,
        query_filename,
        content_type,
        body: body.to_vec(),
    });

    (state.status, "{\"err\":0}")
}

/// 模拟设备
pub(crate) struct MockDevice {
    http_port: u16,
    command_port: u16,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
    commands: Arc<Mutex<Vec<Vec<u8>>>>,
    command_connections: Arc<AtomicUsize>,
}

impl MockDevice {
    pub async fn start(behavior: MockDeviceBehavior) -> Self {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let commands = Arc::new(Mutex::new(Vec::new()));
        let command_connections = Arc::new(AtomicUsize::new(0));

        let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let http_port = http_listener.local_addr().unwrap().port();
        let app = Router::new()
            .route("/upload", post(handle_upload))
            .layer(DefaultBodyLimit::disable())
            .with_state(UploadState {
                uploads: uploads.clone(),
                status: StatusCode::from_u16(behavior.upload_status).unwrap(),
            });
        tokio::spawn(async move {
            axum::serve(http_listener, app).await.unwrap();
        });

        let command_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let command_port = command_listener.local_addr().unwrap().port();
        tokio::spawn(serve_commands(
            command_listener,
            commands.clone(),
            command_connections.clone(),
            behavior,
        ));

        Self {
            http_port,
            command_port,
            uploads,
            commands,
            command_connections,
        }
    }

    pub fn address(&self) -> DeviceAddress {
        DeviceAddress::new("127.0.0.1")
            .unwrap()
            .with_http_port(self.http_port)
            .with_command_port(self.command_port)
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn command_port(&self) -> u16 {
        self.command_port
    }

    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.commands.lock().unwrap().clone()
    }

    pub fn command_connections(&self) -> usize {
        self.command_connections.load(Ordering::SeqCst)
    }
}

async fn serve_commands(
    listener: TcpListener,
    commands: Arc<Mutex<Vec<Vec<u8>>>>,
    connections: Arc<AtomicUsize>,
    behavior: MockDeviceBehavior,
) {
    while let Ok((mut socket, _)) = listener.accept().await {
        connections.fetch_add(1, Ordering::SeqCst);
        let commands = commands.clone();
        let behavior = behavior.clone();

        tokio::spawn(async move {
            // 先收齐两条命令再回复
            let mut received = Vec::new();
            let mut buf = [0u8; 256];
            while !received.ends_with(b"M24\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => received.extend_from_slice(&buf[..n]),
                }
            }
            commands.lock().unwrap().push(received);

            if let Some(reply) = &behavior.command_reply {
                let _ = socket.write_all(reply).await;
            }
            if let Some((delay, reply)) = &behavior.late_reply {
                tokio::time::sleep(*delay).await;
                let _ = socket.write_all(reply).await;
            }
        });
    }
}

/// 返回一个当前没有监听的本地端口
pub(crate) fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
