//! mksproxy - 让切片软件把 MKS 控制器当作 OctoPrint 使用
//!
//! 用法: `mksproxy <printer-host> [--config <path>]`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use mksproxy::application::RelayUploadHandler;
use mksproxy::config::{load_config, print_config, ConfigOverrides};
use mksproxy::infrastructure::adapters::{
    MksCommandClient, MksCommandClientConfig, MksHttpUploader, MksHttpUploaderConfig,
};
use mksproxy::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "OctoPrint upload proxy for MKS printer controllers")]
struct Args {
    /// 打印机主机（host 或 host:port）
    printer_host: String,

    /// 配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 加载配置（优先级：命令行 / LISTEN > 环境变量 > 配置文件 > 默认值）
    let overrides = ConfigOverrides {
        device_host: Some(args.printer_host),
        config_path: args.config,
    };
    let config =
        load_config(&overrides).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},mksproxy={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("mksproxy - OctoPrint upload proxy");
    print_config(&config);

    let address = config
        .device
        .address()
        .map_err(|e| anyhow::anyhow!("Invalid printer host: {}", e))?;

    // 设备适配器
    let uploader = MksHttpUploader::new(
        MksHttpUploaderConfig::new(address.clone())
            .with_timeout(config.device.upload_timeout())
            .with_status_policy(config.device.status_policy),
    )?;
    let command_client = MksCommandClient::new(
        MksCommandClientConfig::new(address)
            .with_capture(config.device.response_capture)
            .with_idle_timeout(config.device.response_idle())
            .with_max_response_bytes(config.device.response_max_bytes),
    );

    let relay_handler = RelayUploadHandler::new(
        Arc::new(uploader),
        Arc::new(command_client),
        config.device.start_delay(),
    );

    let state = AppState::new(relay_handler, config.upload.clone());
    let server_config = ServerConfig::new(config.server.listen.clone(), config.upload.max_file_size);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
