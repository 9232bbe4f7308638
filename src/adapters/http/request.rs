use crate::utils::error::{PredictorError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

const MAX_HEADER_LINES: usize = 100;
/// 請求行與每一行標頭的長度上限
pub const MAX_LINE_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub content_length: usize,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// 解析 application/x-www-form-urlencoded 內容
    pub fn form_fields(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(&self.body)
            .into_owned()
            .collect()
    }
}

fn malformed(reason: &str) -> PredictorError {
    PredictorError::invalid_input("request", reason)
}

/// 讀取一行（不含行尾），超過 `MAX_LINE_BYTES` 或非 UTF-8 視為格式錯誤
async fn read_line_capped<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = AsyncReadExt::take(&mut *reader, MAX_LINE_BYTES as u64)
        .read_until(b'\n', &mut buf)
        .await?;
    if read == 0 {
        return Ok(None);
    }
    if !buf.ends_with(b"\n") && read >= MAX_LINE_BYTES {
        return Err(malformed("request line or header too long"));
    }

    let line = String::from_utf8(buf).map_err(|_| malformed("request head is not valid UTF-8"))?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// 讀取請求行與標頭，本文留給 `read_request_body`；
/// 連線在送出任何資料前關閉時回傳 `None`
pub async fn read_request_head<R>(reader: &mut R) -> Result<Option<HttpRequest>>
where
    R: AsyncBufRead + Unpin,
{
    let first = match read_line_capped(reader).await? {
        Some(line) if !line.is_empty() => line,
        _ => return Ok(None),
    };

    let mut parts = first.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| malformed("invalid http request line (missing method)"))?;
    let target = parts
        .next()
        .ok_or_else(|| malformed("invalid http request line (missing path)"))?;
    // 查詢字串不參與路由
    let path = target.split_once('?').map_or(target, |(path, _)| path);

    let mut content_length = 0usize;
    let mut terminated = false;
    for _ in 0..MAX_HEADER_LINES {
        let Some(header) = read_line_capped(reader).await? else {
            terminated = true;
            break;
        };
        if header.is_empty() {
            terminated = true;
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed("invalid content-length header"))?;
            }
        }
    }
    if !terminated {
        return Err(malformed("too many header lines"));
    }

    Ok(Some(HttpRequest {
        method: method.to_ascii_uppercase(),
        path: path.to_string(),
        content_length,
        body: Vec::new(),
    }))
}

/// 依 Content-Length 讀取本文；超過上限時不讀取，直接回報 413
pub async fn read_request_body<R>(
    reader: &mut R,
    request: &mut HttpRequest,
    max_body_bytes: usize,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if request.content_length > max_body_bytes {
        return Err(PredictorError::PayloadTooLarge {
            limit: max_body_bytes,
        });
    }

    let mut body = vec![0_u8; request.content_length];
    if !body.is_empty() {
        reader.read_exact(&mut body).await.map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => malformed("request body shorter than content-length"),
            _ => PredictorError::IoError(e),
        })?;
    }
    request.body = body;
    Ok(())
}
