//! Clock schedule for one CPU and one PPU sharing a master clock.

use breaks_core::logic::checked_signal;
use breaks_core::state::{SaveState, Snapshot, SnapshotMeta};
use breaks_core::{
    CpuContext, Mask, PpuContext, Signal, TraceHub, TracingSink, advance_t_state_traced,
    advance_video_timing_traced, latch_instruction_register,
};
use tracing::{debug, info};

use crate::config::{DriverConfig, TraceMode};
use crate::error::RuntimeError;
use crate::replay::ReplayLog;
use crate::stimulus::Script;

/// Pads a stimulus source may drive. nRES goes to both chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pads {
    pub n_res: u8,
    pub rdy: u8,
    pub sync: u8,
}

/// Owns both contexts and advances them on a shared master clock.
///
/// One [`Driver::step`] is one master half-cycle: the PPU is evaluated and its
/// clock pad toggled. Every `cpu_divider` steps the CPU PHI0 pad toggles and
/// the CPU is evaluated once.
#[derive(Debug)]
pub struct Driver {
    config: DriverConfig,
    cpu: CpuContext,
    ppu: PpuContext,
    hub: TraceHub,
    replay: Option<ReplayLog>,
    /// Master half-cycles since construction.
    tick: u64,
    /// Master half-cycles since the last PHI0 toggle.
    divider: u32,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let mut hub = TraceHub::new();
        if config.trace == TraceMode::Tracing {
            hub.add(TracingSink);
        }
        let mut ppu = PpuContext::new();
        ppu.write_mask(config.mask);

        Ok(Self {
            replay: config.record_replay.then(ReplayLog::new),
            config,
            cpu: CpuContext::new(),
            ppu,
            hub,
            tick: 0,
            divider: 0,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn cpu(&self) -> &CpuContext {
        &self.cpu
    }

    pub fn ppu(&self) -> &PpuContext {
        &self.ppu
    }

    /// Direct access for control lines no script drives (predecode bus,
    /// fetch, counter clears).
    pub fn cpu_mut(&mut self) -> &mut CpuContext {
        &mut self.cpu
    }

    pub fn ppu_mut(&mut self) -> &mut PpuContext {
        &mut self.ppu
    }

    pub fn hub(&self) -> &TraceHub {
        &self.hub
    }

    pub fn hub_mut(&mut self) -> &mut TraceHub {
        &mut self.hub
    }

    pub fn replay(&self) -> Option<&ReplayLog> {
        self.replay.as_ref()
    }

    pub fn take_replay(&mut self) -> Option<ReplayLog> {
        self.replay.take()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn step(&mut self) -> Result<(), RuntimeError> {
        advance_video_timing_traced(&mut self.ppu, &mut self.hub);
        self.ppu.pad.clk ^= 1;

        self.divider += 1;
        if self.divider >= self.config.cpu_divider {
            self.divider = 0;
            self.cpu.pad.phi0 ^= 1;
            advance_t_state_traced(&mut self.cpu, &mut self.hub);
            latch_instruction_register(&mut self.cpu);
        }
        self.tick += 1;

        if let Some(log) = self.replay.as_mut() {
            let image = breaks_core::state::encode(&(self.cpu, self.ppu))?;
            log.record(&image)?;
        }
        Ok(())
    }

    pub fn run(&mut self, half_cycles: u64) -> Result<(), RuntimeError> {
        for _ in 0..half_cycles {
            self.step()?;
        }
        Ok(())
    }

    /// Holds nRES low for `reset_half_cycles`, then pulses HC/VC through one
    /// pixel clock period so both counters restart from zero.
    ///
    /// Leaves READY high and SYNC low.
    pub fn power_on_reset(&mut self) -> Result<(), RuntimeError> {
        info!(
            tick = self.tick,
            half_cycles = self.config.reset_half_cycles,
            "power-on reset"
        );
        self.set_pads(Pads {
            n_res: 0,
            rdy: 1,
            sync: 0,
        })?;
        self.run(u64::from(self.config.reset_half_cycles))?;
        self.set_pads(Pads {
            n_res: 1,
            rdy: 1,
            sync: 0,
        })?;

        self.ppu.ctrl.hc = 1;
        self.ppu.ctrl.vc = 1;
        self.run_while_pclk(0)?;
        self.run_while_pclk(1)?;
        self.ppu.ctrl.hc = 0;
        self.ppu.ctrl.vc = 0;
        debug!(tick = self.tick, "counters cleared");
        Ok(())
    }

    /// Steps until the pixel clock leaves `level`. The divider always toggles
    /// within eight steps once reset is released.
    fn run_while_pclk(&mut self, level: Signal) -> Result<(), RuntimeError> {
        while self.ppu.ctrl.pclk == level {
            self.step()?;
        }
        Ok(())
    }

    /// Drives the external pads, rejecting anything but 0 or 1.
    pub fn set_pads(&mut self, pads: Pads) -> Result<(), RuntimeError> {
        let n_res = checked_signal("nRES", pads.n_res)?;
        let rdy = checked_signal("RDY", pads.rdy)?;
        let sync = checked_signal("SYNC", pads.sync)?;

        self.cpu.pad.n_res = n_res;
        self.ppu.pad.n_res = n_res;
        self.cpu.pad.rdy = rdy;
        self.cpu.pad.sync = sync;
        Ok(())
    }

    pub fn apply_mask(&mut self, mask: Mask) {
        self.config.mask = mask;
        self.ppu.write_mask(mask);
    }

    /// Runs every record of `script` in order.
    pub fn play(&mut self, script: &Script) -> Result<(), RuntimeError> {
        debug!(
            records = script.records.len(),
            half_cycles = script.total_half_cycles(),
            "playing script"
        );
        for record in &script.records {
            self.set_pads(record.pads())?;
            let mask = record.mask(self.config.mask);
            self.apply_mask(mask);
            self.run(u64::from(record.count))?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> (Snapshot<CpuContext>, Snapshot<PpuContext>) {
        let meta = SnapshotMeta::at(self.tick);
        let Ok(cpu) = self.cpu.save_full(meta.clone());
        let Ok(ppu) = self.ppu.save_full(meta);
        (cpu, ppu)
    }

    /// Restores both contexts and the tick. The divider phase is derived from
    /// the tick, so the CPU schedule lines up with the run that was saved.
    ///
    /// A replay log is cut back to the restored tick. If the snapshot lies
    /// past the end of the log, the log restarts empty.
    pub fn restore(
        &mut self,
        cpu: &Snapshot<CpuContext>,
        ppu: &Snapshot<PpuContext>,
    ) -> Result<(), RuntimeError> {
        let Ok(()) = self.cpu.load_full(cpu);
        let Ok(()) = self.ppu.load_full(ppu);
        self.tick = cpu.meta.tick;
        self.divider = (self.tick % u64::from(self.config.cpu_divider)) as u32;

        if let Some(log) = self.replay.as_mut() {
            match usize::try_from(self.tick) {
                Ok(steps) if steps <= log.len() => log.truncate(steps)?,
                _ => {
                    debug!(
                        tick = self.tick,
                        steps = log.len(),
                        "snapshot past replay log, restarting it"
                    );
                    log.clear();
                }
            }
        }
        debug!(tick = self.tick, "restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use breaks_core::RecordingSink;
    use breaks_core::cpu::JOHNSON_SEQUENCE;

    use super::*;

    fn driver() -> Driver {
        Driver::new(DriverConfig::default()).unwrap()
    }

    #[test]
    fn reset_leaves_both_counters_at_zero() {
        let mut d = driver();
        d.power_on_reset().unwrap();
        assert_eq!((d.ppu().h_position(), d.ppu().v_position()), (0, 0));
        assert_eq!(d.ppu().ctrl.pclk, 0);
        assert_eq!((d.ppu().ctrl.hc, d.ppu().ctrl.vc), (0, 0));

        for k in 1..=40 {
            d.run(8).unwrap();
            assert_eq!(d.ppu().h_position(), k);
        }
    }

    #[test]
    fn cpu_phase_follows_the_divider() {
        let mut d = driver();
        d.run(5).unwrap();
        assert_eq!(d.cpu().pad.phi0, 0);
        d.run(1).unwrap();
        assert_eq!(d.cpu().pad.phi0, 1);
        assert_eq!(d.cpu().ctrl.phi2, 1);
        d.run(6).unwrap();
        assert_eq!(d.cpu().ctrl.phi1, 1);
        assert_eq!(d.tick(), 12);
    }

    #[test]
    fn sequencer_free_runs_after_reset() {
        let mut d = driver();
        d.power_on_reset().unwrap();
        for _ in 0..64 {
            d.run(12).unwrap();
            assert!(JOHNSON_SEQUENCE.contains(&d.cpu().t_state()));
        }
    }

    #[test]
    fn bad_pad_values_are_rejected() {
        let mut d = driver();
        let err = d
            .set_pads(Pads {
                n_res: 1,
                rdy: 2,
                sync: 0,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Core(breaks_core::Error::InvalidSignal { pad: "RDY", value: 2 })
        ));
        assert_eq!(d.cpu().pad.n_res, 0);
    }

    #[test]
    fn mask_reaches_the_clip_controls() {
        let mut d = driver();
        d.apply_mask(Mask::SHOW_SPRITES_LEFT);
        assert_eq!((d.ppu().ctrl.obclip, d.ppu().ctrl.bgclip), (1, 0));
        assert_eq!(d.config().mask, Mask::SHOW_SPRITES_LEFT);
    }

    #[test]
    fn sinks_see_every_step() {
        let mut d = driver();
        d.hub_mut().add(RecordingSink::default());
        d.run(24).unwrap();
        let recording = d.hub().layer::<RecordingSink>().unwrap();
        assert_eq!(recording.video.len(), 24);
        assert_eq!(recording.t_states.len(), 4);
    }

    #[test]
    fn restore_rewinds_tick_and_contexts() {
        let mut d = driver();
        d.power_on_reset().unwrap();
        d.run(241).unwrap();
        let (cpu, ppu) = d.snapshot();
        d.run(600).unwrap();
        let after = (*d.cpu(), *d.ppu());

        d.restore(&cpu, &ppu).unwrap();
        assert_eq!(d.tick(), cpu.meta.tick);
        d.run(600).unwrap();
        assert_eq!((*d.cpu(), *d.ppu()), after);
    }
}
