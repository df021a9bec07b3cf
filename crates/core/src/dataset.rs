//! Input dataset handle.

use serde::{Deserialize, Serialize};

use crate::error::FrameResult;
use crate::frame::Frame;

/// The caller's input rows, either as one frame or as row chunks coming from
/// a pre-split source (files, batches, upstream partitions).
///
/// Chunk boundaries carry no meaning: rows of one series may be spread over
/// several chunks. All chunks share the columns of the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Frame(Frame),
    Chunks(Vec<Frame>),
}

impl Dataset {
    pub fn column_names(&self) -> Vec<&str> {
        match self {
            Dataset::Frame(frame) => frame.column_names(),
            Dataset::Chunks(chunks) => chunks.first().map(Frame::column_names).unwrap_or_default(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names().contains(&name)
    }

    pub fn num_rows(&self) -> usize {
        match self {
            Dataset::Frame(frame) => frame.num_rows(),
            Dataset::Chunks(chunks) => chunks.iter().map(Frame::num_rows).sum(),
        }
    }

    pub fn num_chunks(&self) -> usize {
        match self {
            Dataset::Frame(_) => 1,
            Dataset::Chunks(chunks) => chunks.len(),
        }
    }

    /// Collapse into a single frame.
    pub fn into_frame(self) -> FrameResult<Frame> {
        match self {
            Dataset::Frame(frame) => Ok(frame),
            Dataset::Chunks(chunks) => Frame::concat(chunks),
        }
    }
}

impl From<Frame> for Dataset {
    fn from(frame: Frame) -> Self {
        Dataset::Frame(frame)
    }
}

impl From<Vec<Frame>> for Dataset {
    fn from(chunks: Vec<Frame>) -> Self {
        Dataset::Chunks(chunks)
    }
}
