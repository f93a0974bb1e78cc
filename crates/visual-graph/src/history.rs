//! Edit history for the graph engine
//!
//! A checkpoint is the project document as zstd-compressed JSON, tagged
//! with the mutation that produced it. The first checkpoint is the
//! baseline the history was opened on. A mutation that leaves the document
//! byte-for-byte unchanged records nothing, so an empty property merge
//! does not cost an undo step.

use crate::error::{GraphError, Result};
use crate::events::EventKind;
use crate::types::VisualProject;

const ZSTD_LEVEL: i32 = 3;

/// One recorded project state
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Mutation that produced this state; `ProjectLoaded` for the baseline
    pub cause: EventKind,
    pub node_count: usize,
    pub edge_count: usize,
    document: Vec<u8>,
}

impl Checkpoint {
    fn capture(project: &VisualProject, cause: EventKind) -> Result<Self> {
        let json = serde_json::to_vec(project)?;
        let document = zstd::encode_all(&json[..], ZSTD_LEVEL)
            .map_err(|e| GraphError::Compression(e.to_string()))?;
        Ok(Self {
            cause,
            node_count: project.nodes.len(),
            edge_count: project.edges.len(),
            document,
        })
    }

    fn restore(&self) -> Result<VisualProject> {
        let json = zstd::decode_all(&self.document[..])
            .map_err(|e| GraphError::Compression(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }

    pub fn compressed_len(&self) -> usize {
        self.document.len()
    }
}

/// A project state handed back by [`EditHistory::undo`] or [`EditHistory::redo`]
#[derive(Debug)]
pub struct Restored {
    pub project: VisualProject,
    /// The mutation that was reverted or re-applied
    pub mutation: EventKind,
}

/// Linear undo/redo history over project checkpoints
#[derive(Debug)]
pub struct EditHistory {
    /// Oldest first; `checkpoints[position]` matches the live project
    checkpoints: Vec<Checkpoint>,
    position: usize,
    depth: usize,
}

impl EditHistory {
    /// Open a history on `project`, keeping at most `depth` undo steps
    pub fn new(project: &VisualProject, depth: usize) -> Result<Self> {
        Ok(Self {
            checkpoints: vec![Checkpoint::capture(project, EventKind::ProjectLoaded)?],
            position: 0,
            depth: depth.max(1),
        })
    }

    /// Drop every step and start over from `project`
    pub fn reset(&mut self, project: &VisualProject) -> Result<()> {
        let baseline = Checkpoint::capture(project, EventKind::ProjectLoaded)?;
        self.checkpoints.clear();
        self.checkpoints.push(baseline);
        self.position = 0;
        Ok(())
    }

    /// Record the state after `cause`; returns false when nothing changed
    ///
    /// Recording after an undo discards the redo steps.
    pub fn record(&mut self, project: &VisualProject, cause: EventKind) -> Result<bool> {
        let checkpoint = Checkpoint::capture(project, cause)?;
        if self
            .checkpoints
            .get(self.position)
            .is_some_and(|current| current.document == checkpoint.document)
        {
            return Ok(false);
        }

        self.checkpoints.truncate(self.position + 1);
        self.checkpoints.push(checkpoint);
        let excess = self.checkpoints.len().saturating_sub(self.depth + 1);
        self.checkpoints.drain(..excess);
        self.position = self.checkpoints.len() - 1;
        Ok(true)
    }

    /// Step back; `None` at the oldest checkpoint
    pub fn undo(&mut self) -> Result<Option<Restored>> {
        let Some(mutation) = self.next_undo() else {
            return Ok(None);
        };
        let project = self.checkpoints[self.position - 1].restore()?;
        self.position -= 1;
        Ok(Some(Restored { project, mutation }))
    }

    /// Step forward; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Result<Option<Restored>> {
        let Some(next) = self.checkpoints.get(self.position + 1) else {
            return Ok(None);
        };
        let restored = Restored {
            project: next.restore()?,
            mutation: next.cause,
        };
        self.position += 1;
        Ok(Some(restored))
    }

    /// Mutation the next undo would revert
    pub fn next_undo(&self) -> Option<EventKind> {
        (self.position > 0).then(|| self.checkpoints[self.position].cause)
    }

    /// Mutation the next redo would re-apply
    pub fn next_redo(&self) -> Option<EventKind> {
        self.checkpoints.get(self.position + 1).map(|c| c.cause)
    }

    pub fn undo_steps(&self) -> usize {
        self.position
    }

    pub fn redo_steps(&self) -> usize {
        self.checkpoints.len() - self.position - 1
    }

    /// The checkpoint matching the live project
    pub fn current(&self) -> &Checkpoint {
        &self.checkpoints[self.position]
    }

    /// Compressed bytes held across all checkpoints
    pub fn compressed_size(&self) -> usize {
        self.checkpoints.iter().map(Checkpoint::compressed_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeRegistry;
    use crate::types::{Edge, EdgeKind, Position};

    fn project() -> VisualProject {
        let mut project = VisualProject::new("History");
        project.id = "fixed".to_string();
        project
    }

    fn with_node(mut project: VisualProject, id: &str) -> VisualProject {
        let registry = NodeRegistry::with_builtins();
        let button = registry.get("button").unwrap();
        project.nodes.push(button.instantiate(id.to_string(), Position::new(0.0, 0.0)));
        project
    }

    fn with_edge(mut project: VisualProject, from: &str, to: &str) -> VisualProject {
        project.edges.push(Edge {
            id: format!("{}-{}", from, to),
            source_node_id: from.to_string(),
            source_port_id: "click".to_string(),
            target_node_id: to.to_string(),
            target_port_id: "trigger".to_string(),
            kind: EdgeKind::Event,
        });
        project
    }

    #[test]
    fn test_checkpoints_carry_their_mutation() {
        let base = project();
        let one = with_node(base.clone(), "a");
        let two = with_node(one.clone(), "b");
        let linked = with_edge(two.clone(), "a", "b");

        let mut history = EditHistory::new(&base, 10).unwrap();
        assert_eq!(history.next_undo(), None);
        assert!(history.record(&one, EventKind::NodeAdded).unwrap());
        assert!(history.record(&two, EventKind::NodeAdded).unwrap());
        assert!(history.record(&linked, EventKind::EdgeAdded).unwrap());
        assert_eq!(history.current().edge_count, 1);

        assert_eq!(history.next_undo(), Some(EventKind::EdgeAdded));
        let restored = history.undo().unwrap().unwrap();
        assert_eq!(restored.mutation, EventKind::EdgeAdded);
        assert!(restored.project.edges.is_empty());
        assert_eq!(restored.project.nodes.len(), 2);

        assert_eq!(history.next_redo(), Some(EventKind::EdgeAdded));
        let redone = history.redo().unwrap().unwrap();
        assert_eq!(redone.project.edges.len(), 1);
        assert!(history.redo().unwrap().is_none());
    }

    #[test]
    fn test_unchanged_document_is_not_recorded() {
        let base = project();
        let mut history = EditHistory::new(&base, 10).unwrap();

        assert!(!history.record(&base, EventKind::NodeUpdated).unwrap());
        assert_eq!(history.undo_steps(), 0);

        let one = with_node(base, "a");
        assert!(history.record(&one, EventKind::NodeAdded).unwrap());
        assert!(!history.record(&one, EventKind::NodeUpdated).unwrap());
        assert_eq!(history.undo_steps(), 1);
        assert_eq!(history.next_undo(), Some(EventKind::NodeAdded));
    }

    #[test]
    fn test_new_edit_discards_redo_steps() {
        let base = project();
        let one = with_node(base.clone(), "a");
        let other = with_node(base.clone(), "z");

        let mut history = EditHistory::new(&base, 10).unwrap();
        history.record(&one, EventKind::NodeAdded).unwrap();
        history.undo().unwrap();
        assert_eq!(history.redo_steps(), 1);

        history.record(&other, EventKind::NodeAdded).unwrap();
        assert_eq!(history.redo_steps(), 0);
        let restored = history.undo().unwrap().unwrap();
        assert!(restored.project.nodes.is_empty());
    }

    #[test]
    fn test_depth_limits_undo_steps() {
        let mut history = EditHistory::new(&project(), 2).unwrap();
        let mut current = project();
        for id in ["a", "b", "c", "d"] {
            current = with_node(current, id);
            history.record(&current, EventKind::NodeAdded).unwrap();
        }

        assert_eq!(history.undo_steps(), 2);
        assert_eq!(history.undo().unwrap().unwrap().project.nodes.len(), 3);
        assert_eq!(history.undo().unwrap().unwrap().project.nodes.len(), 2);
        assert!(history.undo().unwrap().is_none());
        assert!(history.compressed_size() > 0);
    }

    #[test]
    fn test_reset_starts_from_loaded_project() {
        let mut history = EditHistory::new(&project(), 10).unwrap();
        history.record(&with_node(project(), "a"), EventKind::NodeAdded).unwrap();

        let loaded = with_node(with_node(project(), "x"), "y");
        history.reset(&loaded).unwrap();
        assert_eq!(history.undo_steps(), 0);
        assert_eq!(history.current().cause, EventKind::ProjectLoaded);
        assert_eq!(history.current().node_count, 2);
    }
}
