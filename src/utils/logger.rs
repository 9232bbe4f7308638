use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(level),
        None if verbose => EnvFilter::new("placement_predictor=debug,info"),
        None => EnvFilter::new("placement_predictor=info"),
    })
}

/// 日誌一律寫到 stderr；stdout 留給批次輸出
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 部署在日誌收集器後面時使用 JSON 格式
        )
        .init();
}
