//! Serving stored audio files with single byte-range support.
//!
//! The body is a lazy stream over an open file handle. The handle lives
//! inside the stream, so it is closed when the stream is exhausted or
//! dropped, including when a client disconnects mid-transfer.

use std::io::{ErrorKind, SeekFrom};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::domain::byte_range::ByteRange;
use crate::domain::errors::{RangeError, StreamError};

// Read size for each body chunk.
pub const CHUNK_SIZE: usize = 8192;
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// What to do with a `Range` header that does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedRangePolicy {
    /// Answer 416.
    #[default]
    Reject,
    /// Ignore the header and serve the whole file.
    ServeFull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamStatus {
    Full,
    Partial(ByteRange),
}

pub type AudioBody = ReaderStream<Take<File>>;

pub struct AudioStream {
    pub status: StreamStatus,
    pub file_size: u64,
    pub body: AudioBody,
}

impl AudioStream {
    pub fn content_length(&self) -> u64 {
        match self.status {
            StreamStatus::Full => self.file_size,
            StreamStatus::Partial(range) => range.content_length(),
        }
    }

    pub fn content_range(&self) -> Option<String> {
        match self.status {
            StreamStatus::Full => None,
            StreamStatus::Partial(range) => Some(range.content_range(self.file_size)),
        }
    }
}

// Audio streaming use case; the path is trusted and resolved by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamAudioUseCase {
    pub malformed_range: MalformedRangePolicy,
}

impl StreamAudioUseCase {
    pub async fn execute(
        &self,
        path: &Path,
        range_header: Option<&str>,
    ) -> Result<AudioStream, StreamError> {
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StreamError::NotFound),
            Err(err) => return Err(err.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StreamError::NotFound);
        }
        let file_size = metadata.len();

        let range = match range_header.map(|header| ByteRange::parse(header, file_size)) {
            None => None,
            Some(Ok(range)) => Some(range),
            Some(Err(RangeError::Malformed))
                if self.malformed_range == MalformedRangePolicy::ServeFull =>
            {
                debug!(path = %path.display(), "ignoring malformed range header");
                None
            }
            Some(Err(RangeError::Malformed)) => {
                return Err(StreamError::MalformedRange { file_size });
            }
            Some(Err(RangeError::Unsatisfiable)) => {
                return Err(StreamError::UnsatisfiableRange { file_size });
            }
        };

        let (status, length) = match range {
            Some(range) => {
                file.seek(SeekFrom::Start(range.start)).await?;
                (StreamStatus::Partial(range), range.content_length())
            }
            None => (StreamStatus::Full, file_size),
        };

        Ok(AudioStream {
            status,
            file_size,
            body: ReaderStream::with_capacity(file.take(length), CHUNK_SIZE),
        })
    }
}
