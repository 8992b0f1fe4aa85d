//! Gate-level simulation of the 6502 T-state sequencer and the 2C02 H/V
//! timing network.
//!
//! Every chip is a caller-owned context struct. The step functions advance it
//! by exactly one half-cycle of its clock and keep no state of their own:
//!
//! ```
//! use breaks_core::{PpuContext, advance_video_timing};
//!
//! let mut ppu = PpuContext::new();
//! ppu.pad.n_res = 1;
//! for _ in 0..16 {
//!     advance_video_timing(&mut ppu);
//!     ppu.pad.clk ^= 1;
//! }
//! assert_eq!(ppu.h_position(), 2);
//! ```

pub mod cpu;
pub mod error;
pub mod logic;
pub mod ppu;
pub mod state;
pub mod trace;

pub use cpu::{CpuContext, advance_t_state, advance_t_state_traced, latch_instruction_register};
pub use error::Error;
pub use logic::Signal;
pub use ppu::{Mask, PpuContext, advance_video_timing, advance_video_timing_traced};
pub use trace::{RecordingSink, TStateEvent, TraceHub, TraceSink, TracingSink, VideoEvent};

#[cfg(test)]
mod tests {
    use ctor::ctor;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    #[ctor]
    fn init_tracing() {
        let subscriber = FmtSubscriber::builder()
            .with_file(true)
            .with_line_number(true)
            .with_max_level(Level::DEBUG)
            .pretty()
            .finish();
        tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
    }
}
