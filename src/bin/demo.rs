//! Drives the dummy strand through a short scripted show.
//!
//! Runs the scheduler on its own thread, sends a few commands and logs the
//! queue state while the show plays.

use std::path::PathBuf;
use std::thread;

use clap::Parser;
use log::{info, warn};
use myrtio_light_compositor::{
    BlendMode, Color, CommandSender, Duration, DummyOutput, FlashAnimation, LevelMeterAnimation,
    OutputDevice, PixelRange, QueueTarget, Scheduler, SchedulerConfig, SchedulerThread,
    SimpleFadeAnimation, command_channel,
};

const FLASH_OVERLAY: &str = "flash";
const METER_OVERLAY: &str = "meter";

#[derive(Parser)]
#[command(name = "compositor-demo", about = "Play a scripted light show on a dummy strand")]
struct Args {
    /// JSON file with scheduler settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seconds to let every step of the show run
    #[arg(long, default_value_t = 2)]
    step_seconds: u64,
    /// Number of flashes shown by the overlay
    #[arg(long, default_value_t = 3)]
    flashes: u32,
    /// Disable cross-fades between commanded frames
    #[arg(long)]
    no_fading: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<SchedulerConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SchedulerConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    info!("loaded scheduler settings from {}", path.display());
    Ok(config)
}

fn log_status(commands: &CommandSender, target: QueueTarget) {
    match commands.query(target.clone()) {
        Ok(Some(status)) => info!(
            "{target}: animation={:?} mode={} pending={} lit={}",
            status.animation, status.blend_mode, status.pending_frames, status.has_effect
        ),
        Ok(None) => info!("{target}: not present"),
        Err(err) => warn!("status query for {target} failed: {err}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if args.no_fading {
        config.fading_enabled = false;
    }
    let step = std::time::Duration::from_secs(args.step_seconds);

    let output = DummyOutput::new()?.paced(true);
    let device = output.configuration();
    let light_count = device.light_count();

    let (commands, receiver) = command_channel();
    let scheduler = Scheduler::new(output, config, receiver)?;
    let show = SchedulerThread::spawn(scheduler)?;

    info!("filling the strand");
    commands.fill(QueueTarget::Base, Color::AMBIENT)?;
    commands.set_pixel_range(
        QueueTarget::Base,
        PixelRange::new(0, light_count / 2),
        Color::AZURE,
    )?;
    thread::sleep(step);
    log_status(&commands, QueueTarget::Base);

    info!("starting the color fade");
    commands.play_animation(
        QueueTarget::Base,
        Box::new(SimpleFadeAnimation::new(device.clone())?),
    )?;
    thread::sleep(step);

    info!("flashing an overlay");
    commands.create_overlay(FLASH_OVERLAY, BlendMode::Replace)?;
    commands.play_animation(
        QueueTarget::overlay(FLASH_OVERLAY),
        Box::new(FlashAnimation::new(
            light_count,
            Color::WHITE,
            args.flashes,
            Duration::from_millis(150),
        )?),
    )?;
    thread::sleep(step);
    info!("overlays after flashing: {:?}", commands.list_overlays()?);

    info!("adding a level meter");
    commands.create_overlay(METER_OVERLAY, BlendMode::Sum)?;
    commands.play_animation(
        QueueTarget::overlay(METER_OVERLAY),
        Box::new(LevelMeterAnimation::new(device, Color::ORANGE)?),
    )?;
    thread::sleep(step);
    log_status(&commands, QueueTarget::overlay(METER_OVERLAY));

    commands.clear_overlays()?;
    commands.stop_animation(QueueTarget::Base)?;
    show.stop()?;
    Ok(())
}
