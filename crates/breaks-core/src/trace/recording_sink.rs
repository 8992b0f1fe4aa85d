use crate::trace::{TStateEvent, TraceSink, VideoEvent};

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub t_states: Vec<TStateEvent>,
    pub video: Vec<VideoEvent>,
}

impl RecordingSink {
    pub fn clear(&mut self) {
        self.t_states.clear();
        self.video.clear();
    }
}

impl TraceSink for RecordingSink {
    fn on_t_state(&mut self, event: &TStateEvent) {
        self.t_states.push(*event);
    }

    fn on_video_step(&mut self, event: &VideoEvent) {
        self.video.push(*event);
    }
}
