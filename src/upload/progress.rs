use std::convert::Infallible;
use std::sync::mpsc::Sender;

use futures::stream::{self, Stream, StreamExt};

use crate::upload::types::UploadEvent;

const CHUNK_SIZE: usize = 64 * 1024;

/// Turns the file bytes into a chunked body stream that reports each chunk
/// over the event channel. An empty file yields an empty stream, so a
/// transfer with nothing to count never produces progress events.
pub fn chunked(bytes: Vec<u8>, events: Sender<UploadEvent>) -> impl Stream<Item = Result<Vec<u8>, Infallible>> {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;

    stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        let _ = events.send(UploadEvent::Progress { sent, total });
        Ok(chunk)
    })
}
