use anyhow::Result;
use breaks_runtime::{Driver, DriverConfig, Script, StimulusFlags, StimulusRecord};
use proptest::prelude::*;

fn recording_driver() -> Result<Driver> {
    Ok(Driver::new(DriverConfig {
        record_replay: true,
        ..DriverConfig::default()
    })?)
}

fn record_strategy() -> impl Strategy<Value = StimulusRecord> {
    (0u8..32, 1u32..40).prop_map(|(bits, count)| StimulusRecord {
        flags: StimulusFlags::from_bits_truncate(bits),
        count,
    })
}

fn run(script: &Script) -> Result<Driver> {
    let mut driver = recording_driver()?;
    driver.power_on_reset()?;
    driver.play(script)?;
    Ok(driver)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn same_script_same_trace(records in prop::collection::vec(record_strategy(), 1..24)) {
        let script = Script { comments: Vec::new(), records };
        let a = run(&script).unwrap();
        let b = run(&script).unwrap();

        let (log_a, log_b) = (a.replay().unwrap(), b.replay().unwrap());
        prop_assert_eq!(log_a.len() as u64, a.tick());
        prop_assert_eq!(log_a.digest(), log_b.digest());
        prop_assert_eq!(log_a.first_divergence(log_b).unwrap(), None);
        prop_assert_eq!(a.cpu(), b.cpu());
        prop_assert_eq!(a.ppu(), b.ppu());
    }

    #[test]
    fn text_form_drives_the_same_run(records in prop::collection::vec(record_strategy(), 1..12)) {
        let script = Script { comments: vec!["generated".into()], records };
        let reparsed = Script::parse_str(&script.to_string()).unwrap();
        let a = run(&script).unwrap();
        let b = run(&reparsed).unwrap();
        prop_assert_eq!(a.ppu(), b.ppu());
        prop_assert_eq!(a.cpu(), b.cpu());
    }
}

#[test]
fn a_late_sync_pulse_is_found_by_divergence() -> Result<()> {
    let base = "version 1\n|NY...|600|\n|NY...|1|\n|NY...|200|\n";
    let pulsed = "version 1\n|NY...|600|\n|NYS..|1|\n|NY...|200|\n";

    let a = run(&Script::parse_str(base)?)?;
    let b = run(&Script::parse_str(pulsed)?)?;
    let reset_len = (a.tick() - 801) as usize;

    let (log_a, log_b) = (a.replay().unwrap(), b.replay().unwrap());
    let divergence = log_a
        .first_divergence(log_b)?
        .expect("SYNC should change the CPU context");
    assert_eq!(divergence.step, reset_len + 600);

    let (cpu_a, _) = log_a.state_at(divergence.step)?.expect("step recorded");
    let (cpu_b, _) = log_b.state_at(divergence.step)?.expect("step recorded");
    assert_ne!(cpu_a.pad.sync, cpu_b.pad.sync);
    Ok(())
}

#[test]
fn restoring_rewinds_the_replay_log() -> Result<()> {
    let mut branched = recording_driver()?;
    branched.power_on_reset()?;
    branched.run(100)?;
    let (cpu, ppu) = branched.snapshot();
    branched.run(50)?;
    branched.restore(&cpu, &ppu)?;
    assert_eq!(branched.replay().unwrap().len() as u64, branched.tick());
    branched.run(50)?;

    let mut straight = recording_driver()?;
    straight.power_on_reset()?;
    straight.run(150)?;

    let (log_a, log_b) = (branched.replay().unwrap(), straight.replay().unwrap());
    assert_eq!(branched.tick(), straight.tick());
    assert_eq!(log_a.len() as u64, branched.tick());
    assert_eq!(log_a.digest(), log_b.digest());
    assert_eq!(log_a.first_divergence(log_b)?, None);

    let last = log_a.len() - 1;
    let (cpu_a, ppu_a) = log_a.state_at(last)?.expect("step recorded");
    assert_eq!((&cpu_a, &ppu_a), (branched.cpu(), branched.ppu()));
    Ok(())
}
