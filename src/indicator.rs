//! Recording indicator.
//!
//! A small tray badge that reflects live recording state: grey while every
//! watched source is muted, an alert color while any of them is open. The
//! indicator runs on its own thread with its own `tao` event loop and polls
//! the audio server on a fixed cadence; it is fully independent of the
//! trigger state machine and the application runs unchanged without it.

use std::sync::LazyLock;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::warn;
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
#[cfg(target_os = "linux")]
use tao::platform::unix::EventLoopBuilderExtUnix;
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::pulse::PulseClient;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const BADGE_SIZE: u32 = 32;

const IDLE_COLOR: (u8, u8, u8) = (142, 142, 147);
const RECORDING_COLORS: [(u8, u8, u8); 3] = [
    (0xc4, 0x18, 0x1a),
    (0xf9, 0xdf, 0x74),
    (0xea, 0x2b, 0x1f),
];

static IDLE_BADGE: LazyLock<Icon> = LazyLock::new(|| badge(IDLE_COLOR));
static RECORDING_BADGES: LazyLock<Vec<Icon>> =
    LazyLock::new(|| RECORDING_COLORS.iter().map(|&color| badge(color)).collect());

/// Starts the indicator on a dedicated thread.
///
/// The thread never joins; it dies with the process once the main loop has
/// finished its shutdown sequence.
pub fn spawn(pulse: PulseClient) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("indicator".to_string())
        .spawn(move || run(pulse))
}

fn run(pulse: PulseClient) -> ! {
    #[cfg(target_os = "linux")]
    let event_loop = EventLoopBuilder::new().with_any_thread(true).build();
    #[cfg(not(target_os = "linux"))]
    let event_loop = EventLoopBuilder::new().build();

    let mut tray: Option<TrayIcon> = None;
    let mut was_active = false;
    let mut palette = 0usize;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(Instant::now() + REFRESH_INTERVAL);

        match event {
            Event::NewEvents(StartCause::Init) => {
                match TrayIconBuilder::new()
                    .with_tooltip("pulsetalk recording indicator")
                    .with_icon(IDLE_BADGE.clone())
                    .build()
                {
                    Ok(built) => tray = Some(built),
                    Err(err) => warn!("Cannot create recording indicator: {err}"),
                }
            }
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                // A backend hiccup renders as inactive rather than stale.
                let active = match pulse.all_muted() {
                    Ok(muted) => !muted,
                    Err(err) => {
                        warn!("Indicator status check failed: {err}");
                        false
                    }
                };
                if let Some(tray) = &tray {
                    if active {
                        // New alert color on every refresh while recording.
                        palette = (palette + 1) % RECORDING_BADGES.len();
                        set_icon(tray, RECORDING_BADGES[palette].clone());
                    } else if was_active {
                        set_icon(tray, IDLE_BADGE.clone());
                    }
                }
                was_active = active;
            }
            _ => {}
        }
    })
}

fn set_icon(tray: &TrayIcon, icon: Icon) {
    if let Err(err) = tray.set_icon(Some(icon)) {
        warn!("Cannot update recording indicator: {err}");
    }
}

fn badge(color: (u8, u8, u8)) -> Icon {
    Icon::from_rgba(badge_rgba(color), BADGE_SIZE, BADGE_SIZE)
        .expect("badge buffer dimensions are fixed")
}

/// A filled circle on a transparent background.
fn badge_rgba((r, g, b): (u8, u8, u8)) -> Vec<u8> {
    let size = BADGE_SIZE as i32;
    let center = (size - 1) as f32 / 2.0;
    let radius = center - 1.0;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = dx * dx + dy * dy <= radius * radius;
            rgba.extend_from_slice(&[r, g, b, if inside { 255 } else { 0 }]);
        }
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_buffer_has_expected_size() {
        let rgba = badge_rgba(IDLE_COLOR);
        assert_eq!(rgba.len(), (BADGE_SIZE * BADGE_SIZE * 4) as usize);
    }

    #[test]
    fn badge_center_is_opaque_and_colored() {
        let (r, g, b) = RECORDING_COLORS[0];
        let rgba = badge_rgba(RECORDING_COLORS[0]);
        let center = (BADGE_SIZE / 2 * BADGE_SIZE + BADGE_SIZE / 2) as usize * 4;
        assert_eq!(&rgba[center..center + 4], &[r, g, b, 255]);
    }

    #[test]
    fn badge_corners_are_transparent() {
        let rgba = badge_rgba(IDLE_COLOR);
        assert_eq!(rgba[3], 0);
        assert_eq!(*rgba.last().unwrap(), 0);
    }
}
