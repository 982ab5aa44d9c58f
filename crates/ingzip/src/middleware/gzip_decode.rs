//! Request side gzip decoding.
//!
//! [`GzipDecodeDecorator`] wraps a handler into a [`GzipDecodeHandler`]. For every request
//! declaring `Content-Encoding: gzip`, the body is buffered, decoded, and handed to the
//! inner handler as plaintext with `Content-Encoding` and `Content-Length` removed.
//!
//! Decoding is fail-open: a body that cannot be read or decoded never turns into an error
//! response. The request goes on to the inner handler as if nothing had been declared,
//! carrying the original bytes whenever they could be buffered.

use crate::body::{OptionReqBody, ReqBody};
use crate::decoder::GzipDecoder;
use crate::decorator::{Decorator, DecoratorExt};
use crate::handler::Handler;
use async_trait::async_trait;
use http::header::{CONTENT_ENCODING, CONTENT_LENGTH, SEC_WEBSOCKET_KEY};
use http::{HeaderMap, Request, Response};
use http_body_util::BodyExt;
use tower_layer::Layer;
use tracing::{debug, trace, warn};

const ENCODING_GZIP: &str = "gzip";

/// Creates [`GzipDecodeHandler`]s, and holds the decoding options they share.
#[derive(Debug, Default, Clone, Copy)]
pub struct GzipDecodeDecorator {
    decoder: GzipDecoder,
}

impl GzipDecodeDecorator {
    pub fn new() -> Self {
        Self { decoder: GzipDecoder::new() }
    }

    pub fn builder() -> GzipDecodeDecoratorBuilder {
        GzipDecodeDecoratorBuilder::new()
    }

    /// Rewrites `req` so that its body is no longer gzip encoded.
    ///
    /// Returns the request to forward: either `req` untouched, or `req` with a decoded
    /// body and without `Content-Encoding` / `Content-Length`. Failures are absorbed:
    /// - a body that fails to read is forwarded as an exhausted body
    /// - bytes that are not valid gzip are forwarded as a fresh body over the same bytes
    pub async fn decode_request(&self, req: Request<OptionReqBody>) -> Request<OptionReqBody> {
        if !is_gzip_encoded(req.headers()) {
            return req;
        }

        // websocket handshakes never carry a compressed body
        if is_websocket_handshake(req.headers()) {
            trace!("skip gzip decoding for websocket handshake");
            return req;
        }

        let (mut parts, mut body) = req.into_parts();

        let Some(req_body) = body.take() else {
            trace!("skip gzip decoding, request has no body");
            return Request::from_parts(parts, body);
        };

        let raw = match req_body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("failed to read gzip encoded request body, forward exhausted body: {}", e);
                return Request::from_parts(parts, ReqBody::empty().into());
            }
        };

        match self.decoder.decode(&raw) {
            Ok(decoded) => {
                debug!(encoded_len = raw.len(), decoded_len = decoded.len(), "decoded gzip request body");
                parts.headers.remove(CONTENT_LENGTH);
                parts.headers.remove(CONTENT_ENCODING);
                Request::from_parts(parts, ReqBody::once(decoded).into())
            }
            Err(e) => {
                debug!(encoded_len = raw.len(), "failed to decode gzip request body, forward raw body: {}", e);
                Request::from_parts(parts, ReqBody::once(raw).into())
            }
        }
    }
}

fn is_gzip_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .is_some_and(|value| value.as_bytes().windows(ENCODING_GZIP.len()).any(|token| token == ENCODING_GZIP.as_bytes()))
}

fn is_websocket_handshake(headers: &HeaderMap) -> bool {
    headers.get(SEC_WEBSOCKET_KEY).is_some_and(|key| !key.is_empty())
}

#[derive(Debug, Default)]
pub struct GzipDecodeDecoratorBuilder {
    max_decoded_len: Option<usize>,
}

impl GzipDecodeDecoratorBuilder {
    fn new() -> Self {
        Self { max_decoded_len: None }
    }

    /// Bounds the size of a decoded body.
    ///
    /// A body decoding to more than `max_decoded_len` bytes is forwarded still encoded.
    #[must_use]
    pub fn max_decoded_len(mut self, max_decoded_len: usize) -> Self {
        self.max_decoded_len = Some(max_decoded_len);
        self
    }

    pub fn build(self) -> GzipDecodeDecorator {
        let decoder = match self.max_decoded_len {
            Some(limit) => GzipDecoder::with_max_decoded_len(limit),
            None => GzipDecoder::new(),
        };
        GzipDecodeDecorator { decoder }
    }
}

impl<H: Handler<OptionReqBody>> Decorator<H> for GzipDecodeDecorator {
    type Out = GzipDecodeHandler<H>;

    fn decorate(&self, raw: H) -> Self::Out {
        GzipDecodeHandler { handler: raw, decorator: *self }
    }
}

impl DecoratorExt for GzipDecodeDecorator {}

impl<H> Layer<H> for GzipDecodeDecorator {
    type Service = GzipDecodeHandler<H>;

    fn layer(&self, inner: H) -> Self::Service {
        GzipDecodeHandler { handler: inner, decorator: *self }
    }
}

/// A handler decoding gzip request bodies before calling the inner handler.
#[derive(Debug, Clone)]
pub struct GzipDecodeHandler<H> {
    handler: H,
    decorator: GzipDecodeDecorator,
}

impl<H> GzipDecodeHandler<H> {
    pub fn inner(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<H> Handler<OptionReqBody> for GzipDecodeHandler<H>
where
    H: Handler<OptionReqBody>,
{
    type RespBody = H::RespBody;
    type Error = H::Error;

    async fn call(&self, req: Request<OptionReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        let req = self.decorator.decode_request(req).await;
        self.handler.call(req).await
    }
}
