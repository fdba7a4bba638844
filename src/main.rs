//! Rousui - 漏水音判定服务
//!
//! 启动表单页面与 JSON API，把上传的音频交给 Gemini 判定

use std::sync::Arc;

use rousui::application::GenerativeModelPort;
use rousui::config::{load_config, print_config, AppConfig};
use rousui::infrastructure::adapters::{FakeGeminiClient, GeminiClient, GeminiClientConfig};
use rousui::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},rousui={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_model(config: &AppConfig) -> anyhow::Result<Arc<dyn GenerativeModelPort>> {
    let aliases = config.gemini.alias_table();

    if config.gemini.fake {
        return Ok(Arc::new(FakeGeminiClient::with_defaults().with_aliases(aliases)));
    }

    let client_config = GeminiClientConfig::new(config.gemini.base_url.clone())
        .with_timeout(config.gemini.timeout_secs)
        .with_aliases(aliases);
    Ok(Arc::new(GeminiClient::new(client_config)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Rousui - 漏水音判定サービス");
    print_config(&config);

    let model = build_model(&config)?;
    let settings = config.analysis_settings()?;
    let state = AppState::new(model, settings, config.gemini.models.clone());

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_file_size(config.limits.max_file_size);
    let server = HttpServer::new(server_config, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
