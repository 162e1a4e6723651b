use std::{cell::RefCell, fmt::Display, path::PathBuf, rc::Rc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub function_name: String,
    pub file_path: Option<PathBuf>,
    /// Position of the call site.
    pub line: u32,
    pub column: u32,
}

impl Display for CallFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = self.file_path.as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<eingabe>".to_string());

        write!(f, "bei {} ({}:{}:{})", self.function_name, file, self.line, self.column)
    }
}

/// Active function invocations, innermost last.
#[derive(Debug, Default, Clone)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: CallFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Snapshot of the stack, innermost frame first.
    pub fn get_stack_trace(&self) -> Vec<CallFrame> {
        self.frames.iter().rev().cloned().collect()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Keeps one frame on the stack for as long as it lives.
pub struct FrameGuard {
    stack: Rc<RefCell<CallStack>>,
}

impl FrameGuard {
    pub fn enter(stack: &Rc<RefCell<CallStack>>, frame: CallFrame) -> Self {
        stack.borrow_mut().push(frame);

        Self { stack: Rc::clone(stack) }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
