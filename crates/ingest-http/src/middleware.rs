//! Upload middleware.
//!
//! Runs before a handler: collects the body of a multipart request under the
//! configured limit, extracts the configured file, and attaches it to the
//! request as a [`ParsedFile`] extension. Requests that are not
//! `multipart/form-data` pass straight through with no file attached.
//!
//! ```ignore
//! let uploads = UploadMiddleware::new(Preset::Image.config());
//! let response = uploads
//!     .handle(request, |mut req| async move {
//!         match req.take_upload() {
//!             Some(upload) => store(upload).await,
//!             None => Response::new(StatusCode::BAD_REQUEST),
//!         }
//!     })
//!     .await;
//! ```

use std::future::Future;

use ingest_core::{Boundary, IngestError, ParsedFile, UploadConfig, extract, is_multipart, require_file};
use tracing::{debug, warn};

use crate::collector::{check_content_length, collect_stream_with_hint, parse_content_length};
use crate::request::{Body, Request};
use crate::response::Response;

/// Extracts one uploaded file per request.
#[derive(Debug, Clone)]
pub struct UploadMiddleware {
    config: UploadConfig,
    require_file: bool,
}

impl UploadMiddleware {
    /// Create a middleware for the given configuration.
    #[must_use]
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            require_file: false,
        }
    }

    /// Fail multipart requests that carry no matching file with a 400
    /// instead of passing them on without an upload.
    #[must_use]
    pub fn require_file(mut self, required: bool) -> Self {
        self.require_file = required;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Collect and parse the request body.
    ///
    /// Returns `Ok(None)` for non-multipart requests and for multipart
    /// requests without a matching file (unless a file is required). The
    /// body is consumed only when the request is multipart.
    pub async fn ingest(&self, req: &mut Request) -> Result<Option<ParsedFile>, IngestError> {
        let Some(content_type) = req.headers().get("content-type") else {
            return Ok(None);
        };
        let content_type = String::from_utf8_lossy(content_type);
        if !is_multipart(&content_type) {
            return Ok(None);
        }
        let boundary = Boundary::from_content_type(&content_type)?;

        let max = self.config.get_max_file_size();
        let declared = req
            .headers()
            .get("content-length")
            .and_then(parse_content_length);
        check_content_length(declared, max)?;

        let body = match req.take_body() {
            Body::Empty => Vec::new(),
            Body::Bytes(bytes) => bytes,
            Body::Stream(stream) => collect_stream_with_hint(stream, max, declared).await?,
        };

        let file = extract(&body, &boundary, &self.config)?;
        if self.require_file {
            require_file(file, &self.config).map(Some)
        } else {
            Ok(file)
        }
    }

    /// Run the middleware around `next`.
    ///
    /// On success the file (if any) is attached to the request and `next`
    /// is called. On failure `next` is not called and the error response is
    /// returned instead.
    pub async fn handle<F, Fut>(&self, mut req: Request, next: F) -> Response
    where
        F: FnOnce(Request) -> Fut,
        Fut: Future<Output = Response>,
    {
        match self.ingest(&mut req).await {
            Ok(Some(file)) => {
                debug!(
                    path = req.path(),
                    filename = file.original_name(),
                    size = file.size(),
                    "upload attached to request"
                );
                req.insert_extension(file);
                next(req).await
            }
            Ok(None) => next(req).await,
            Err(err) => {
                warn!(
                    path = req.path(),
                    kind = %err.kind(),
                    status = err.status_code(),
                    error = %err,
                    "upload rejected"
                );
                Response::from_error(&err)
            }
        }
    }
}
