use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// 请求日志中间件
/// 记录每个HTTP请求的IP地址、方法、路径、状态码和响应时间
pub async fn request_logger(addr: Option<ConnectInfo<SocketAddr>>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // 测试环境下没有底层TCP连接，拿不到对端地址
    let client_ip = addr
        .map(|ConnectInfo(a)| a.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        "📍 API请求 - IP: {} | {} {} | 状态: {} | 耗时: {:.2}ms",
        client_ip,
        method,
        path,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}
