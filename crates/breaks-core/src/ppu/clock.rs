//! Reset stage, clock distribution and the pixel clock divider.

use crate::logic::not;
use crate::ppu::PpuContext;

/// Reset pad inversion and the register-clear flip-flop.
///
/// `rc` reads the flip-flop as it was left by the previous call, so a change
/// on the pad shows up on `rc` one half-cycle after it shows up on `res`.
pub(crate) fn reset(ppu: &mut PpuContext) {
    ppu.ctrl.res = not(ppu.pad.n_res);
    ppu.ctrl.rc = not(ppu.latch.ff_reset) & not(ppu.ctrl.res);
    ppu.latch.ff_reset = not(ppu.ctrl.rc) & not(ppu.ctrl.rescl);
}

pub(crate) fn distribute(ppu: &mut PpuContext) {
    ppu.ctrl.n_clk = not(ppu.pad.clk);
}

/// CLK/4 pixel clock.
///
/// Two master/slave pairs: latches 0 and 2 load while CLK is high, 1 and 3
/// while it is low. Latch 0 is fed back from the previous pixel clock and is
/// held low during reset, which parks the pixel clock low.
pub(crate) fn pixel_clock(ppu: &mut PpuContext) {
    let ff = &mut ppu.latch.pclk;
    if ppu.pad.clk == 1 {
        ff[0] = not(ppu.ctrl.pclk) & not(ppu.ctrl.res);
        ff[2] = not(ff[1]);
    }
    if ppu.ctrl.n_clk == 1 {
        ff[1] = not(ff[0]);
        ff[3] = not(ff[2]);
    }
    ppu.ctrl.pclk = not(ff[3]);
    ppu.ctrl.n_pclk = not(ppu.ctrl.pclk);
}
