use crate::adapters::http::request::{read_request_body, read_request_head};
use crate::adapters::http::response::{write_http_response, HttpResponse};
use crate::adapters::http::routes::{dispatch, error_response, rejection_response};
use crate::core::predictor::Predictor;
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::net::{TcpListener, TcpStream};

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpServer {
    predictor: Arc<Predictor>,
    max_body_bytes: usize,
    read_timeout: Duration,
}

impl HttpServer {
    pub fn new(predictor: Predictor, max_body_bytes: usize) -> Self {
        Self {
            predictor: Arc::new(predictor),
            max_body_bytes,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// 整個請求（標頭與本文）必須在此時限內送達
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub async fn bind(addr: &str) -> Result<TcpListener> {
        Ok(TcpListener::bind(addr).await?)
    }

    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// 每個連線一個 task；`shutdown` 完成後停止接受新連線
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "🚀 Placement predictor listening on http://{} (backend: {})",
            listener.local_addr()?,
            self.predictor.backend_name()
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let server = self.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream).await {
                                tracing::warn!("⚠️ Connection from {} failed: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => tracing::warn!("⚠️ Accept error: {}", e),
                },
            }
        }

        Ok(())
    }

    async fn handle_connection(&self, mut stream: TcpStream) -> Result<()> {
        let started = Instant::now();
        let (read_half, mut write_half) = stream.split();
        let mut reader = BufReader::new(read_half);

        let (method, path, response) =
            match tokio::time::timeout(self.read_timeout, self.read_and_dispatch(&mut reader))
                .await
            {
                Ok(Some(handled)) => handled,
                Ok(None) => return Ok(()),
                Err(_) => {
                    tracing::debug!("Request not received within {:?}", self.read_timeout);
                    (
                        "-".to_string(),
                        "-".to_string(),
                        HttpResponse::json_error(408, "Request timed out"),
                    )
                }
            };

        write_http_response(&mut write_half, &response).await?;

        tracing::info!(
            "{} {} -> {} ({:?})",
            method,
            path,
            response.status,
            started.elapsed()
        );
        Ok(())
    }

    /// 讀取並路由一個請求；連線未送出任何資料即關閉時回傳 `None`
    async fn read_and_dispatch<R>(&self, reader: &mut R) -> Option<(String, String, HttpResponse)>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut request = match read_request_head(reader).await {
            Ok(Some(request)) => request,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("Malformed request: {}", e);
                return Some(("-".to_string(), "-".to_string(), error_response(&e)));
            }
        };

        let response = match read_request_body(reader, &mut request, self.max_body_bytes).await {
            Ok(()) => dispatch(&self.predictor, &request),
            Err(e) => {
                tracing::debug!("Rejected request body: {}", e);
                rejection_response(&self.predictor, &request, &e)
            }
        };
        Some((request.method, request.path, response))
    }
}
