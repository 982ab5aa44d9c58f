mod gzip_decode;

pub use gzip_decode::{GzipDecodeDecorator, GzipDecodeDecoratorBuilder, GzipDecodeHandler};
