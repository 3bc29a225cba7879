use super::Simulation;
use crate::graph::Point;

/// Pointer-drag state machine: IDLE → DRAGGING → IDLE, one controller per
/// active pointer. Multiple controllers over the same simulation are
/// independent; the simulation itself counts active drags so the alpha target
/// is raised by the first drag and released by the last (d3's `event.active`
/// bookkeeping).
///
/// The controller never touches force internals: it only pins/unpins the
/// node's fixed position and nudges the alpha target. Apply calls between
/// steps, never during one.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<usize>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Starts a drag on `node_id`, fixing it at the pointer. Returns false
    /// (and stays IDLE) when the id is unknown or this controller is already
    /// mid-drag.
    pub fn begin_drag(&mut self, sim: &mut Simulation, node_id: &str, pointer: Point) -> bool {
        if self.dragging.is_some() {
            return false;
        }
        let Some(idx) = sim.node_index(node_id) else {
            return false;
        };
        sim.begin_pin(idx, pointer);
        self.dragging = Some(idx);
        true
    }

    /// Moves the fixed position to the new pointer location. No-op when IDLE.
    pub fn update_drag(&mut self, sim: &mut Simulation, pointer: Point) {
        if let Some(idx) = self.dragging {
            sim.move_pin(idx, pointer);
        }
    }

    /// Releases the node back to velocity-driven motion and lets alpha resume
    /// its normal decay once no drags remain active.
    pub fn end_drag(&mut self, sim: &mut Simulation) {
        if let Some(idx) = self.dragging.take() {
            sim.end_pin(idx);
        }
    }
}
