//! Response body type
//!
//! Small bodies (error pages, listings) are held in memory; files are read
//! in fixed-size chunks as the connection drains them.

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Read size for streamed files
pub const CHUNK_SIZE: usize = 64 * 1024;

pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream an open file from its current position to EOF
pub fn file(file: File) -> ResponseBody {
    StreamBody::new(stream::try_unfold(file, next_chunk)).boxed_unsync()
}

async fn next_chunk(mut file: File) -> io::Result<Option<(Frame<Bytes>, File)>> {
    let mut buf = vec![0; CHUNK_SIZE];
    let n = file.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some((Frame::data(Bytes::from(buf)), file)))
}
