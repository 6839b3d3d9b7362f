//! WebSocket adapter for the streaming file calls
//!
//! Each client text frame carries one `FileRecord` as JSON and each server
//! text frame carries the matching result, in the same order. A close frame
//! from the client ends the input. When the call fails the socket is closed
//! with code 1011 and the error text as the reason.

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use dockhand_core::{CoreError, FileRecord, FileSync, Result, ResultSink};
use futures::stream::{BoxStream, SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;

/// Longest close reason a control frame can carry
const MAX_CLOSE_REASON: usize = 123;

pub async fn send_files(socket: WebSocket, files: Arc<FileSync>) {
    let (sender, receiver) = socket.split();
    let mut sink = JsonSink { sender };
    let outcome = files.send_files(records(receiver), &mut sink).await;
    sink.finish("Send", outcome).await;
}

pub async fn compare_files(socket: WebSocket, files: Arc<FileSync>) {
    let (sender, receiver) = socket.split();
    let mut sink = JsonSink { sender };
    let outcome = files.compare_files(records(receiver), &mut sink).await;
    sink.finish("Compare", outcome).await;
}

/// Inbound frames as file records, ending at the client's close frame
fn records(receiver: SplitStream<WebSocket>) -> BoxStream<'static, Result<FileRecord>> {
    futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            let message = match receiver.next().await {
                Some(message) => message,
                None => return None,
            };
            let record = match message {
                Ok(Message::Text(text)) => parse_record(text.as_str().as_bytes()),
                Ok(Message::Binary(bytes)) => parse_record(&bytes),
                Ok(Message::Close(_)) => return None,
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Err(e) => Err(CoreError::Stream(e.to_string())),
            };
            return Some((record, receiver));
        }
    })
    .boxed()
}

fn parse_record(payload: &[u8]) -> Result<FileRecord> {
    serde_json::from_slice(payload)
        .map_err(|e| CoreError::Stream(format!("invalid file record: {}", e)))
}

/// Outbound half of the socket, one JSON text frame per result
struct JsonSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait::async_trait]
impl<T: Serialize + Send + 'static> ResultSink<T> for JsonSink {
    async fn send(&mut self, item: T) -> Result<()> {
        let text = serde_json::to_string(&item)
            .map_err(|e| CoreError::Stream(format!("failed to encode result: {}", e)))?;
        self.sender
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| CoreError::Stream(e.to_string()))
    }
}

impl JsonSink {
    /// Close the socket, reporting a failed call in the close frame
    async fn finish(mut self, call: &str, outcome: Result<usize>) {
        let frame = match outcome {
            Ok(count) => {
                tracing::debug!("{} stream closed after {} record(s)", call, count);
                CloseFrame {
                    code: close_code::NORMAL,
                    reason: "".into(),
                }
            }
            Err(e) => {
                tracing::warn!("{} stream aborted: {}", call, e);
                CloseFrame {
                    code: close_code::ERROR,
                    reason: close_reason(&e.to_string()).into(),
                }
            }
        };

        // The client may already be gone
        if let Err(e) = self.sender.send(Message::Close(Some(frame))).await {
            tracing::debug!("{} stream close not delivered: {}", call, e);
        }
    }
}

fn close_reason(message: &str) -> String {
    if message.len() <= MAX_CLOSE_REASON {
        return message.to_string();
    }
    let mut end = MAX_CLOSE_REASON;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message[..end].to_string()
}
