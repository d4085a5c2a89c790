use crate::annotate::command::DrawCommand;

/// Committed commands in draw order plus the undone ones, most recent last.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    done: Vec<DrawCommand>,
    undone: Vec<DrawCommand>,
}

impl History {
    pub fn push(&mut self, command: DrawCommand) {
        self.done.push(command);
        self.undone.clear();
    }

    /// Moves the newest committed command to the redo stack.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.done.pop() else {
            return false;
        };
        self.undone.push(command);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(command) = self.undone.pop() else {
            return false;
        };
        self.done.push(command);
        true
    }

    pub fn reset(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    pub fn done(&self) -> &[DrawCommand] {
        &self.done
    }

    pub fn undone(&self) -> &[DrawCommand] {
        &self.undone
    }

    pub fn undo_len(&self) -> usize {
        self.done.len()
    }

    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }
}
