//! Request body types seen by handlers in the chain.
//!
//! - [`ReqBody`]: a readable [`http_body::Body`] of [`Bytes`], either a buffered chunk or a boxed stream
//! - [`OptionReqBody`]: the body slot of a request, which may hold no body at all

use crate::error::BodyError;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body::Body as HttpBody;
use http_body::{Frame, SizeHint};
use http_body_util::StreamBody;
use http_body_util::combinators::UnsyncBoxBody;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

pub struct ReqBody {
    inner: Kind,
}

enum Kind {
    Once(Option<Bytes>),
    Stream(UnsyncBoxBody<Bytes, BodyError>),
}

impl ReqBody {
    pub fn empty() -> Self {
        Self { inner: Kind::Once(None) }
    }

    /// A body which yields `bytes` as a single data frame.
    pub fn once(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::empty()
        } else {
            Self { inner: Kind::Once(Some(bytes)) }
        }
    }

    pub fn stream<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes, Error = BodyError> + Send + 'static,
    {
        Self { inner: Kind::Stream(UnsyncBoxBody::new(body)) }
    }

    /// Builds a streaming body from a stream of data chunks.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BodyError> + 'static,
    {
        Self::stream(StreamBody::new(stream.map_ok(Frame::data).map_err(Into::<BodyError>::into)))
    }
}

impl fmt::Debug for ReqBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Kind::Once(bytes) => f.debug_tuple("ReqBody::Once").field(bytes).finish(),
            Kind::Stream(_) => f.write_str("ReqBody::Stream"),
        }
    }
}

impl From<Bytes> for ReqBody {
    fn from(bytes: Bytes) -> Self {
        Self::once(bytes)
    }
}

impl From<Vec<u8>> for ReqBody {
    fn from(value: Vec<u8>) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<String> for ReqBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for ReqBody {
    fn from(value: &'static str) -> Self {
        Self::once(Bytes::from_static(value.as_bytes()))
    }
}

impl HttpBody for ReqBody {
    type Data = Bytes;
    type Error = BodyError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let kind = &mut self.get_mut().inner;
        match kind {
            Kind::Once(option_bytes) => Poll::Ready(option_bytes.take().map(|bytes| Ok(Frame::data(bytes)))),
            Kind::Stream(box_body) => Pin::new(box_body).poll_frame(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Kind::Once(option_bytes) => option_bytes.is_none(),
            Kind::Stream(box_body) => box_body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Kind::Once(None) => SizeHint::with_exact(0),
            Kind::Once(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Kind::Stream(box_body) => box_body.size_hint(),
        }
    }
}

/// The body slot of a request.
///
/// A request built without a body (`GET` without payload, for example) carries
/// [`OptionReqBody::none`]; reading it behaves like reading an empty body.
#[derive(Debug, Default)]
pub struct OptionReqBody {
    inner: Option<ReqBody>,
}

impl OptionReqBody {
    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    pub fn is_some(&self) -> bool {
        self.inner.is_some()
    }

    /// Takes the body out of the slot, leaving it empty.
    pub fn take(&mut self) -> Option<ReqBody> {
        self.inner.take()
    }

    /// Puts `body` into the slot, returning the previous one if any.
    pub fn replace(&mut self, body: ReqBody) -> Option<ReqBody> {
        self.inner.replace(body)
    }

    pub fn into_inner(self) -> Option<ReqBody> {
        self.inner
    }
}

impl From<ReqBody> for OptionReqBody {
    fn from(body: ReqBody) -> Self {
        Self { inner: Some(body) }
    }
}

impl From<Option<ReqBody>> for OptionReqBody {
    fn from(inner: Option<ReqBody>) -> Self {
        Self { inner }
    }
}

impl From<Bytes> for OptionReqBody {
    fn from(bytes: Bytes) -> Self {
        ReqBody::from(bytes).into()
    }
}

impl From<Vec<u8>> for OptionReqBody {
    fn from(value: Vec<u8>) -> Self {
        ReqBody::from(value).into()
    }
}

impl From<&'static str> for OptionReqBody {
    fn from(value: &'static str) -> Self {
        ReqBody::from(value).into()
    }
}

impl HttpBody for OptionReqBody {
    type Data = Bytes;
    type Error = BodyError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.get_mut().inner {
            Some(body) => Pin::new(body).poll_frame(cx),
            None => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.as_ref().is_none_or(HttpBody::is_end_stream)
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.as_ref().map_or_else(|| SizeHint::with_exact(0), HttpBody::size_hint)
    }
}

#[cfg(test)]
mod tests {
    use crate::body::{OptionReqBody, ReqBody};
    use crate::error::BodyError;
    use bytes::Bytes;
    use http_body::Body as HttpBody;
    use http_body_util::BodyExt;
    use std::io;

    fn check_send<T: Send>() {}

    #[test]
    fn is_send() {
        check_send::<ReqBody>();
        check_send::<OptionReqBody>();
    }

    #[tokio::test]
    async fn test_once_body() {
        let mut body = ReqBody::from("Hello world");

        assert_eq!(body.size_hint().exact(), Some(11));
        assert!(!body.is_end_stream());

        let bytes = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(bytes, Bytes::from("Hello world"));

        assert!(body.is_end_stream());
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_once_body() {
        let mut body = ReqBody::once(Bytes::new());

        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_body() {
        let chunks: Vec<Result<Bytes, io::Error>> =
            vec![Ok(Bytes::from_static(b"Foo")), Ok(Bytes::from_static(b"bar ")), Ok(Bytes::from_static(b"Wibble"))];
        let body = ReqBody::from_stream(futures::stream::iter(chunks));

        assert!(body.size_hint().exact().is_none());

        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected, Bytes::from_static(b"Foobar Wibble"));
    }

    #[tokio::test]
    async fn test_stream_body_error() {
        let chunks: Vec<Result<Bytes, BodyError>> =
            vec![Ok(Bytes::from_static(b"Foo")), Err(BodyError::invalid_body("connection reset"))];
        let body = ReqBody::from_stream(futures::stream::iter(chunks));

        let result = body.collect().await;
        assert!(matches!(result, Err(BodyError::InvalidBody { .. })));
    }

    #[tokio::test]
    async fn test_none_body() {
        let mut body = OptionReqBody::none();

        assert!(body.is_none());
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_take_and_replace() {
        let mut body = OptionReqBody::from("first");

        let first = body.take().unwrap();
        assert!(body.is_none());
        assert_eq!(first.collect().await.unwrap().to_bytes(), Bytes::from_static(b"first"));

        assert!(body.replace(ReqBody::from("second")).is_none());
        assert!(body.is_some());
        assert_eq!(body.collect().await.unwrap().to_bytes(), Bytes::from_static(b"second"));
    }
}
