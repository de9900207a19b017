use chrono::{DateTime, Utc};
use tracing::debug;

/// File name given to every finalized recording, matching what the backend's
/// `/stt` endpoint expects to receive.
pub const ARTIFACT_FILE_NAME: &str = "recording.wav";

/// Mime type attached to the finalized recording.
pub const ARTIFACT_MIME: &str = "audio/wav";

/// One opaque binary segment emitted by the capture device while recording
/// is active. Chunks are immutable once emitted and ordered by emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub data: Vec<u8>,
}

impl AudioChunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Owns the ordered chunk sequence for one record→stop cycle.
///
/// Transient: created on start, consumed by `finish` once the device has
/// flushed its final chunk. Zero-size chunks are discarded on push;
/// non-zero chunks are kept in emission order.
#[derive(Debug)]
pub struct RecordingSession {
    /// Monotonically increasing session sequence number, for log
    /// correlation and stale-session detection.
    pub seq: u64,
    pub started_at: DateTime<Utc>,
    chunks: Vec<AudioChunk>,
}

impl RecordingSession {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            started_at: Utc::now(),
            chunks: Vec::new(),
        }
    }

    /// Append a chunk. Zero-size chunks carry no audio and are dropped.
    pub fn push(&mut self, chunk: AudioChunk) {
        if chunk.is_empty() {
            debug!(seq = self.seq, "discarding zero-size audio chunk");
            return;
        }
        self.chunks.push(chunk);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Finalize the session into one artifact: the exact concatenation of
    /// the kept chunks in emission order.
    pub fn finish(self) -> AudioArtifact {
        let total: usize = self.chunks.iter().map(AudioChunk::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in &self.chunks {
            bytes.extend_from_slice(&chunk.data);
        }

        AudioArtifact {
            file_name: ARTIFACT_FILE_NAME.to_string(),
            mime_type: ARTIFACT_MIME.to_string(),
            bytes,
        }
    }
}

/// The finalized, named, typed recording produced at stop time.
///
/// Immutable; owned exclusively by the caller that requests transcription.
/// Only constructible by finishing a stopped [`RecordingSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AudioArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
