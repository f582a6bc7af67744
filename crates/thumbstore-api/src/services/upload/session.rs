//! Per-request multipart decode session
//!
//! A [`DecodeSession`] pushes body chunks into a [`multer::Multipart`] decoder and drives it
//! only as far as the bytes received so far allow. Completed file parts come back out of
//! [`DecodeSession::offer`] as hidden staged files, ready to be published once the body is
//! known to be complete. The session is an owned value, so every way a request can end
//! (success, decode error, client disconnect dropping the handler future) drops it and with it
//! every staged file that was never handed out.

use crate::services::upload::types::{PartState, UploadPart};
use bytes::Bytes;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::task::noop_waker_ref;
use futures::StreamExt;
use multer::{Field, Multipart};
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use thumbstore_core::AppError;
use thumbstore_storage::Storage;

/// Outcome of one decode attempt
#[derive(Debug)]
pub enum Decoded {
    /// A file part was fully received
    Produced(UploadPart),
    /// Nothing more can be decided until the next chunk arrives
    NeedMoreInput,
    /// The body is malformed or the part could not be staged
    Failed(AppError),
}

/// What the decoder could tell from the buffered input
enum Progress {
    FieldStart(Field<'static>),
    Data(Bytes),
    FieldEnd,
    Pending,
    End,
}

/// Extract the boundary from a request `Content-Type` value.
pub fn boundary_from_content_type(content_type: Option<&str>) -> Result<String, AppError> {
    let content_type =
        content_type.ok_or_else(|| AppError::NotMultipart("no Content-Type".to_string()))?;
    multer::parse_boundary(content_type)
        .map_err(|e| AppError::NotMultipart(format!("{}: {}", content_type, e)))
}

pub struct DecodeSession {
    feed: Option<UnboundedSender<Result<Bytes, Infallible>>>,
    multipart: Multipart<'static>,
    storage: Arc<dyn Storage>,
    field: Option<Field<'static>>,
    current: Option<UploadPart>,
    fields_seen: usize,
    parts_completed: usize,
    bytes_offered: u64,
    ended: bool,
}

impl DecodeSession {
    pub fn new(boundary: &str, storage: Arc<dyn Storage>) -> Self {
        let (feed, body) = mpsc::unbounded();
        DecodeSession {
            feed: Some(feed),
            multipart: Multipart::new(body, boundary),
            storage,
            field: None,
            current: None,
            fields_seen: 0,
            parts_completed: 0,
            bytes_offered: 0,
            ended: false,
        }
    }

    /// Start a session for a request with the given `Content-Type`.
    pub fn from_content_type(
        content_type: Option<&str>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, AppError> {
        let boundary = boundary_from_content_type(content_type)?;
        Ok(Self::new(&boundary, storage))
    }

    /// Feed the next body chunk and return every file part it completed, in order.
    pub async fn offer(&mut self, chunk: Bytes) -> Result<Vec<UploadPart>, AppError> {
        self.bytes_offered += chunk.len() as u64;
        if !self.ended {
            let feed = self
                .feed
                .as_ref()
                .ok_or_else(|| AppError::Internal("chunk offered after finish".to_string()))?;
            feed.unbounded_send(Ok(chunk))
                .map_err(|e| AppError::Internal(format!("Multipart decoder closed: {}", e)))?;
        }
        self.drain().await
    }

    /// Signal the end of the body and return any file parts completed by it.
    ///
    /// Fails if a part was still being received or if the body never contained a delimiter.
    /// The session is consumed either way.
    pub async fn finish(mut self) -> Result<Vec<UploadPart>, AppError> {
        self.feed = None;
        let completed = self.drain().await?;

        if !self.ended {
            return Err(AppError::TruncatedUpload(format!(
                "body ended after {} bytes before the closing delimiter",
                self.bytes_offered
            )));
        }

        tracing::debug!(
            parts = self.parts_completed,
            bytes = self.bytes_offered,
            "Multipart body fully decoded"
        );
        Ok(completed)
    }

    async fn drain(&mut self) -> Result<Vec<UploadPart>, AppError> {
        let mut completed = Vec::new();
        loop {
            match self.decode_next().await {
                Decoded::Produced(part) => completed.push(part),
                Decoded::NeedMoreInput => return Ok(completed),
                Decoded::Failed(err) => return Err(err),
            }
        }
    }

    async fn decode_next(&mut self) -> Decoded {
        loop {
            let progress = match self.poll_progress() {
                Ok(progress) => progress,
                Err(err) => return Decoded::Failed(self.classify(err)),
            };

            match progress {
                Progress::FieldStart(field) => {
                    if let Err(err) = self.start_part(field).await {
                        return Decoded::Failed(err);
                    }
                }
                Progress::Data(bytes) => {
                    if let Some(part) = self.current.as_mut() {
                        if let Err(e) = part.content.write_chunk(&bytes).await {
                            return Decoded::Failed(AppError::Persistence(format!(
                                "Failed to write staged upload: {}",
                                e
                            )));
                        }
                    }
                }
                Progress::FieldEnd => {
                    if let Some(mut part) = self.current.take() {
                        part.state = PartState::Completed;
                        self.parts_completed += 1;
                        tracing::debug!(
                            field = %part.field_name,
                            filename = %part.filename,
                            size_bytes = part.size(),
                            "Upload part received"
                        );
                        return Decoded::Produced(part);
                    }
                }
                Progress::Pending | Progress::End => return Decoded::NeedMoreInput,
            }
        }
    }

    /// Poll the decoder once without waiting. Input only arrives through `offer`, so a pending
    /// poll means the buffered bytes are exhausted and there is nothing to wake.
    fn poll_progress(&mut self) -> Result<Progress, multer::Error> {
        let mut cx = Context::from_waker(noop_waker_ref());

        if let Some(field) = self.field.as_mut() {
            return match field.poll_next_unpin(&mut cx) {
                Poll::Pending => Ok(Progress::Pending),
                Poll::Ready(Some(Ok(bytes))) => Ok(Progress::Data(bytes)),
                Poll::Ready(Some(Err(err))) => Err(err),
                Poll::Ready(None) => {
                    self.field = None;
                    Ok(Progress::FieldEnd)
                }
            };
        }

        if self.ended {
            return Ok(Progress::End);
        }

        match self.multipart.poll_next_field(&mut cx) {
            Poll::Pending => Ok(Progress::Pending),
            Poll::Ready(Ok(Some(field))) => {
                self.fields_seen += 1;
                Ok(Progress::FieldStart(field))
            }
            Poll::Ready(Ok(None)) => {
                self.ended = true;
                Ok(Progress::End)
            }
            Poll::Ready(Err(err)) => Err(err),
        }
    }

    async fn start_part(&mut self, field: Field<'static>) -> Result<(), AppError> {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Dropping the field lets the decoder skip the rest of its body.
            tracing::debug!(field = ?field.name(), "Skipping non-file form field");
            return Ok(());
        };

        let content = self
            .storage
            .stage()
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        self.current = Some(UploadPart {
            field_name: field.name().unwrap_or_default().to_string(),
            filename,
            content_type: field.content_type().map(|mime| mime.to_string()),
            state: PartState::InProgress,
            content,
        });
        self.field = Some(field);
        Ok(())
    }

    fn classify(&self, err: multer::Error) -> AppError {
        let message = err.to_string();
        match err {
            multer::Error::NoMultipart
            | multer::Error::NoBoundary
            | multer::Error::DecodeContentType(_) => AppError::NotMultipart(message),
            multer::Error::IncompleteStream if self.fields_seen == 0 => AppError::MalformedMultipart(
                format!("body contains no boundary delimiter: {}", message),
            ),
            multer::Error::IncompleteStream
            | multer::Error::IncompleteFieldData { .. }
            | multer::Error::IncompleteHeaders
            | multer::Error::StreamReadFailed(_) => AppError::TruncatedUpload(format!(
                "{} after {} bytes",
                message, self.bytes_offered
            )),
            _ => AppError::MalformedMultipart(message),
        }
    }
}

impl Drop for DecodeSession {
    fn drop(&mut self) {
        if let Some(part) = self.current.take() {
            tracing::debug!(
                filename = %part.filename,
                size_bytes = part.size(),
                "Discarding incomplete upload part"
            );
        }
    }
}
