use anyhow::Result;
use breaks_core::cpu::{JOHNSON_SEQUENCE, RESET_CODE};
use breaks_core::{Mask, RecordingSink};
use breaks_runtime::{Driver, DriverConfig, Script};

const SCRIPT: &str = "version 1
comment reset held, then one line with the left column shown
|.Y...|64|
|NY.OB|2728|
";

#[test]
fn script_resets_and_counts_a_line() -> Result<()> {
    let mut driver = Driver::new(DriverConfig::default())?;
    driver.hub_mut().add(RecordingSink::default());
    driver.play(&Script::parse_str(SCRIPT)?)?;

    assert_eq!(driver.tick(), 64 + 2728);
    assert!(driver.config().mask.shows_left_column());
    assert_eq!((driver.ppu().ctrl.clip_o, driver.ppu().ctrl.clip_b), (0, 0));

    let recording = driver
        .hub()
        .layer::<RecordingSink>()
        .expect("sink installed");
    assert_eq!(recording.video.len(), 64 + 2728);

    // Held in reset, the buses read zero and the sequencer sits on 1111.
    assert!(recording.video[..64].iter().all(|e| e.h == 0 && e.v == 0));
    let in_reset = recording
        .t_states
        .iter()
        .filter(|e| e.phi2 == 1)
        .take(4)
        .all(|e| e.code == RESET_CODE);
    assert!(in_reset);

    // After release the sequencer free-runs inside the Johnson orbit.
    assert!(
        recording
            .t_states
            .iter()
            .all(|e| JOHNSON_SEQUENCE.contains(&e.code))
    );
    Ok(())
}

#[test]
fn power_on_reset_then_one_frame_of_lines() -> Result<()> {
    let mut driver = Driver::new(DriverConfig {
        mask: Mask::SHOW_BACKGROUND,
        ..DriverConfig::default()
    })?;
    driver.power_on_reset()?;
    let start = driver.tick();

    // Without an external line clear the 9-bit counter wraps at 512 dots.
    driver.run(8 * 340)?;
    assert_eq!(driver.ppu().h_position(), 340);
    assert_eq!(driver.ppu().ctrl.vin, 1);
    driver.run(8)?;
    assert_eq!(driver.ppu().v_position(), 1);
    assert_eq!(driver.tick() - start, 8 * 341);
    Ok(())
}
