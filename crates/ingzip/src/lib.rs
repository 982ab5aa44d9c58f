//! Request side gzip decoding for async HTTP handler chains
//!
//! This crate provides a middleware that transparently decompresses gzip encoded request
//! bodies before they reach the next handler, so handlers further down the chain always
//! see plaintext.
//!
//! # Features
//!
//! - Detects `Content-Encoding: gzip` requests and decodes their body (multi-member aware)
//! - Removes the now stale `Content-Encoding` and `Content-Length` headers
//! - Leaves websocket handshakes untouched
//! - Fail-open: unreadable or undecodable bodies are forwarded instead of rejected
//! - Composes with other decorators, or as a [`tower_layer::Layer`]
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::{BodyExt, Full};
//! use micro_ingzip::{BodyError, Decorator, GzipDecodeDecorator, Handler, OptionReqBody, make_handler};
//!
//! async fn echo(req: Request<OptionReqBody>) -> Result<Response<Full<Bytes>>, BodyError> {
//!     let body = req.into_body().collect().await?.to_bytes();
//!     Ok(Response::new(Full::new(body)))
//! }
//!
//! # async fn run(req: Request<OptionReqBody>) {
//! let handler = GzipDecodeDecorator::new().decorate(make_handler(echo));
//! let resp = handler.call(req).await.unwrap();
//! # }
//! ```

mod body;
mod decoder;
mod error;

pub mod decorator;
pub mod handler;
pub mod middleware;

pub use body::{OptionReqBody, ReqBody};
pub use decoder::GzipDecoder;
pub use decorator::{Decorator, DecoratorExt};
pub use error::{BodyError, DecodeError};
pub use handler::{Handler, HandlerFn, make_handler};
pub use middleware::{GzipDecodeDecorator, GzipDecodeDecoratorBuilder, GzipDecodeHandler};
