//! Command stream: a batched pair of arrays (vertex data, render states)
//! that flushes once either array would exceed its configured limit.
//!
//! Grounded on the teacher's `MAX_CACHED_SHAPES` cap (`renderer.rs`) and its
//! `decide_buffer_sizing` reallocate-or-reuse decision (`renderer/types.rs`)
//! — generalized from "grow a GPU buffer" to "flush a CPU-side batch",
//! since this layer sits above the backend and shouldn't know about wgpu
//! buffer handles at all.

use super::record::RenderState;
use crate::path::PathVertex;

/// Default cap carried over from the teacher's `MAX_CACHED_SHAPES`.
pub const DEFAULT_BATCH_LIMIT: usize = 1024;

/// Decides whether the stream should flush before accepting one more
/// command of `incoming_vertex_count` vertices. Pure function, same shape
/// as `decide_buffer_sizing`, so it can be unit-tested without a stream
/// instance.
pub fn should_flush(current_commands: usize, current_vertices: usize, incoming_vertex_count: usize, limit: usize) -> bool {
    current_commands + 1 > limit || current_vertices + incoming_vertex_count > limit * 4
}

/// Accumulates render states and their vertex data into two parallel
/// arrays, flushing to the backend once a limit is hit.
pub struct CommandStream {
    limit: usize,
    vertices: Vec<PathVertex>,
    indices: Vec<u32>,
    states: Vec<RenderState>,
    /// `states[i]` owns indices in `indices[command_ranges[i]]`.
    command_ranges: Vec<(u32, u32)>,
}

impl CommandStream {
    pub fn new(limit: usize) -> Self {
        CommandStream {
            limit,
            vertices: Vec::new(),
            indices: Vec::new(),
            states: Vec::new(),
            command_ranges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Appends one command's geometry and state. Returns `true` if the
    /// caller should flush immediately after this push (the stream just
    /// reached its limit), `false` if more commands can still be batched.
    pub fn push(&mut self, state: RenderState, vertices: &[PathVertex], indices: &[u16]) -> bool {
        let base = self.vertices.len() as u32;
        let index_start = self.indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|&i| base + i as u32));
        let index_end = self.indices.len() as u32;
        self.command_ranges.push((index_start, index_end));
        self.states.push(state);

        should_flush(self.states.len(), self.vertices.len(), 0, self.limit)
    }

    pub fn vertices(&self) -> &[PathVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn states(&self) -> &[RenderState] {
        &self.states
    }

    pub fn command_range(&self, command_index: usize) -> (u32, u32) {
        self.command_ranges[command_index]
    }

    /// Drains all batched state, leaving the stream empty and ready for the
    /// next frame/batch.
    pub fn flush(&mut self) -> (Vec<PathVertex>, Vec<u32>, Vec<RenderState>) {
        self.command_ranges.clear();
        (
            std::mem::take(&mut self.vertices),
            std::mem::take(&mut self.indices),
            std::mem::take(&mut self.states),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_flush_triggers_on_command_limit() {
        assert!(should_flush(10, 0, 0, 10));
        assert!(!should_flush(5, 0, 0, 10));
    }

    #[test]
    fn should_flush_triggers_on_vertex_limit() {
        assert!(should_flush(0, 39, 2, 10));
        assert!(!should_flush(0, 0, 2, 10));
    }

    #[test]
    fn push_reports_flush_needed_once_limit_reached() {
        let mut stream = CommandStream::new(2);
        let v = PathVertex { position: [0.0, 0.0], color: [0.0, 0.0, 0.0, 1.0] };
        assert!(!stream.push(RenderState::default(), &[v], &[]));
        assert!(stream.push(RenderState::default(), &[v], &[]));
    }

    #[test]
    fn flush_drains_and_resets_the_stream() {
        let mut stream = CommandStream::new(10);
        let v = PathVertex { position: [0.0, 0.0], color: [0.0, 0.0, 0.0, 1.0] };
        stream.push(RenderState::default(), &[v], &[0]);
        let (verts, idx, states) = stream.flush();
        assert_eq!(verts.len(), 1);
        assert_eq!(idx.len(), 1);
        assert_eq!(states.len(), 1);
        assert!(stream.is_empty());
    }
}
