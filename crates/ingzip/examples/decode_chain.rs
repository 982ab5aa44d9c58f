use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use http::header::CONTENT_ENCODING;
use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full};
use micro_ingzip::{BodyError, Decorator, GzipDecodeDecorator, Handler, OptionReqBody, make_handler};
use std::error::Error;
use std::io::Write;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

async fn echo(req: Request<OptionReqBody>) -> Result<Response<Full<Bytes>>, BodyError> {
    let body = req.into_body().collect().await?.to_bytes();
    Ok(Response::new(Full::new(body)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let handler = GzipDecodeDecorator::builder().max_decoded_len(1024 * 1024).build().decorate(make_handler(echo));

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"hello world")?;
    let compressed = encoder.finish()?;

    for body in [compressed, b"not gzip at all".to_vec()] {
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://127.0.0.1:3000/echo")
            .header(CONTENT_ENCODING, "gzip")
            .body(OptionReqBody::from(body))?;

        let resp = handler.call(req).await?;
        let body = resp.into_body().collect().await?.to_bytes();
        info!(body = ?body, "handler responded");
    }

    Ok(())
}
