use std::convert::Infallible;

use crate::cpu::CpuContext;
use crate::state::{SaveState, Snapshot, SnapshotMeta};

impl SaveState for CpuContext {
    type Full = CpuContext;
    type Error = Infallible;
    type Meta = SnapshotMeta;

    fn save_full(&self, meta: Self::Meta) -> Result<Snapshot<Self::Full, Self::Meta>, Self::Error> {
        Ok(Snapshot { meta, data: *self })
    }

    fn load_full(
        &mut self,
        snapshot: &Snapshot<Self::Full, Self::Meta>,
    ) -> Result<(), Self::Error> {
        *self = snapshot.data;
        Ok(())
    }
}
