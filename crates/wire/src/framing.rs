// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-Length-prefixed framing over an async byte stream.
//!
//! Each message is `Content-Length: <decimal>\r\n\r\n` followed by exactly
//! that many bytes of UTF-8 JSON. A missing or non-numeric `Content-Length`
//! is a protocol error that must close the connection; frames larger than
//! `max_frame_bytes` are rejected before the buffer is even read.

use crate::envelope::{Request, Response};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed before a full frame was read")]
    Eof,
    #[error("missing or non-numeric Content-Length header")]
    MalformedHeader,
    #[error("frame of {size} bytes exceeds the {cap} byte cap")]
    FrameTooLarge { size: usize, cap: usize },
    #[error("frame body is not valid UTF-8")]
    InvalidUtf8,
    #[error("frame body is not a valid JSON-RPC message: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read one raw frame's payload bytes.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_frame_bytes: usize,
) -> Result<Vec<u8>, ProtocolError> {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Err(ProtocolError::Eof);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some(value) = trimmed
            .split_once(':')
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim())
        {
            content_length = Some(value.parse().map_err(|_| ProtocolError::MalformedHeader)?);
        }
    }

    let len = content_length.ok_or(ProtocolError::MalformedHeader)?;
    if len > max_frame_bytes {
        return Err(ProtocolError::FrameTooLarge { size: len, cap: max_frame_bytes });
    }

    let mut body = vec![0u8; len];
    tokio::io::AsyncReadExt::read_exact(reader, &mut body).await?;
    Ok(body)
}

/// Write one raw frame.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(value).map_err(ProtocolError::Decode)
}

pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
}

/// Read and decode one [`Request`] frame.
pub async fn read_request<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_frame_bytes: usize,
) -> Result<Request, ProtocolError> {
    let body = read_message(reader, max_frame_bytes).await?;
    std::str::from_utf8(&body).map_err(|_| ProtocolError::InvalidUtf8)?;
    decode(&body)
}

/// Encode and write one [`Response`] frame.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
) -> Result<(), ProtocolError> {
    let body = encode(response)?;
    write_message(writer, &body).await
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
