use crate::trace::{TStateEvent, TraceSink, VideoEvent};

/// Forwards every event to `tracing` at TRACE level under the
/// `breaks::trace` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn on_t_state(&mut self, event: &TStateEvent) {
        tracing::trace!(
            target: "breaks::trace",
            phi1 = event.phi1,
            phi2 = event.phi2,
            rdy = event.rdy,
            sync = event.sync,
            t = format_args!("{:04b}", event.code),
            "t-state"
        );
    }

    fn on_video_step(&mut self, event: &VideoEvent) {
        tracing::trace!(
            target: "breaks::trace",
            clk = event.clk,
            pclk = event.pclk,
            h = event.h,
            v = event.v,
            hsel = format_args!("{:#08x}", event.hsel),
            vsel = format_args!("{:#05x}", event.vsel),
            clip_o = event.clip_o,
            clip_b = event.clip_b,
            zhpos = event.zhpos,
            "h/v"
        );
    }
}
