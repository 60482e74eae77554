//! Input collaborators that supply sample lines.

use std::sync::{Arc, Mutex, PoisonError};

/// Something that holds the latest line of samples.
///
/// Producers overwrite the buffer between reads; a read copies whatever is
/// there at that moment.
pub trait SampleSource: Send + Sync {
    /// Copy the current samples into `out`, replacing its contents.
    fn read_into(&self, out: &mut Vec<f32>);

    /// Number of samples in each line.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fixed-length sample buffer shared between a producer and a renderer.
#[derive(Debug, Clone)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<f32>>>,
    len: usize,
}

impl SharedBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(vec![0.0; len])),
            len,
        }
    }

    /// Overwrite the buffer. Extra samples are dropped, missing ones zeroed.
    pub fn write(&self, samples: &[f32]) {
        let mut buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let n = samples.len().min(self.len);
        buffer[..n].copy_from_slice(&samples[..n]);
        buffer[n..].iter_mut().for_each(|s| *s = 0.0);
    }
}

impl SampleSource for SharedBuffer {
    fn read_into(&self, out: &mut Vec<f32>) {
        let buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        out.clear();
        out.extend_from_slice(&buffer);
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_are_visible_to_clones() {
        let buffer = SharedBuffer::new(4);
        let reader = buffer.clone();
        buffer.write(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut out = Vec::new();
        reader.read_into(&mut out);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);

        buffer.write(&[9.0]);
        reader.read_into(&mut out);
        assert_eq!(out, vec![9.0, 0.0, 0.0, 0.0]);
        assert_eq!(reader.len(), 4);
        assert!(!reader.is_empty());
    }
}
