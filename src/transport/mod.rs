pub mod source;
pub mod client;

pub use source::{ByteStreamSource, ChunkSource, FileChunkSource, HttpChunkSource, DEFAULT_REPLAY_CHUNK_SIZE};
pub use client::{AnalysisClient, DEFAULT_BASE_URL};
