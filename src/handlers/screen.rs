use std::sync::Mutex;

/// Where views and messages end up
pub trait Screen: Send + Sync {
    /// Replace the current view
    fn show(&self, view: &str);
    /// Success or informational message
    fn notify(&self, message: &str);
    /// Failure message; the current view stays as it was
    fn error(&self, message: &str);
}

/// Standard output for views and messages, standard error for failures
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalScreen;

impl Screen for TerminalScreen {
    fn show(&self, view: &str) {
        println!("{view}");
    }

    fn notify(&self, message: &str) {
        println!("{message}");
        println!();
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    View(String),
    Notice(String),
    Error(String),
}

/// Keeps every frame in memory; for tests and embedders
#[derive(Debug, Default)]
pub struct RecordingScreen {
    frames: Mutex<Vec<Frame>>,
}

impl RecordingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.lock().clone()
    }

    /// Most recent view, if any
    pub fn current_view(&self) -> Option<String> {
        self.lock().iter().rev().find_map(|f| match f {
            Frame::View(v) => Some(v.clone()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|f| match f {
                Frame::Error(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, frame: Frame) {
        self.lock().push(frame);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Screen for RecordingScreen {
    fn show(&self, view: &str) {
        self.push(Frame::View(view.to_string()));
    }

    fn notify(&self, message: &str) {
        self.push(Frame::Notice(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Frame::Error(message.to_string()));
    }
}
