//! Opt-in observation of step results.
//!
//! The step functions themselves never print or log. Callers that want to see
//! what happened pass a [`TraceSink`] to the `*_traced` entry points; a
//! [`TraceHub`] fans one event out to several sinks.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::Debug,
};

use crate::{
    cpu::CpuContext,
    logic::{Signal, pack},
    ppu::{H_SELECT_COUNT, PpuContext},
};

pub mod recording_sink;
pub mod tracing_sink;

pub use recording_sink::RecordingSink;
pub use tracing_sink::TracingSink;

/// Snapshot of the sequencer after one half-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TStateEvent {
    pub phi1: Signal,
    pub phi2: Signal,
    pub rdy: Signal,
    pub sync: Signal,
    pub code: u8,
}

impl TStateEvent {
    pub fn capture(cpu: &CpuContext) -> Self {
        Self {
            phi1: cpu.ctrl.phi1,
            phi2: cpu.ctrl.phi2,
            rdy: cpu.pad.rdy,
            sync: cpu.pad.sync,
            code: cpu.t_state(),
        }
    }
}

/// Position and decoder outputs after one video half-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoEvent {
    pub clk: Signal,
    pub pclk: Signal,
    pub h: u16,
    pub v: u16,
    /// H-select outputs, bit `i` = formula `i`.
    pub hsel: u32,
    /// V-select outputs, bit `i` = formula `i`.
    pub vsel: u16,
    pub clip_o: Signal,
    pub clip_b: Signal,
    pub zhpos: Signal,
}

impl VideoEvent {
    pub fn capture(ppu: &PpuContext) -> Self {
        Self {
            clk: ppu.pad.clk,
            pclk: ppu.ctrl.pclk,
            h: pack(&ppu.bus.h) as u16,
            v: pack(&ppu.bus.v) as u16,
            hsel: pack(&ppu.bus.hsel),
            vsel: pack(&ppu.bus.vsel) as u16,
            clip_o: ppu.ctrl.clip_o,
            clip_b: ppu.ctrl.clip_b,
            zhpos: ppu.ctrl.zhpos,
        }
    }

    /// Indices of asserted H-select formulas.
    pub fn asserted_h(&self) -> impl Iterator<Item = usize> + '_ {
        (0..H_SELECT_COUNT).filter(|i| self.hsel & (1 << i) != 0)
    }
}

pub trait TraceSink: Any + Send + Debug + 'static {
    fn on_t_state(&mut self, _event: &TStateEvent) {}

    fn on_video_step(&mut self, _event: &VideoEvent) {}
}

/// A set of sinks, at most one per concrete type.
#[derive(Debug, Default)]
pub struct TraceHub {
    layers: HashMap<TypeId, Box<dyn TraceSink>>,
}

impl TraceHub {
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
        }
    }

    /// Installs `sink`, returning the previous sink of the same type.
    pub fn add<S>(&mut self, sink: S) -> Option<Box<dyn TraceSink>>
    where
        S: TraceSink,
    {
        self.layers.insert(TypeId::of::<S>(), Box::new(sink))
    }

    pub fn remove<S>(&mut self) -> Option<Box<dyn TraceSink>>
    where
        S: TraceSink,
    {
        self.layers.remove(&TypeId::of::<S>())
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer<S: TraceSink>(&self) -> Option<&S> {
        let layer = self.layers.get(&TypeId::of::<S>())?;
        (layer.as_ref() as &dyn Any).downcast_ref::<S>()
    }

    pub fn layer_mut<S: TraceSink>(&mut self) -> Option<&mut S> {
        let layer = self.layers.get_mut(&TypeId::of::<S>())?;
        (layer.as_mut() as &mut dyn Any).downcast_mut::<S>()
    }
}

impl TraceSink for TraceHub {
    fn on_t_state(&mut self, event: &TStateEvent) {
        for sink in self.layers.values_mut() {
            sink.on_t_state(event);
        }
    }

    fn on_video_step(&mut self, event: &VideoEvent) {
        for sink in self.layers.values_mut() {
            sink.on_video_step(event);
        }
    }
}
