//! Main application logic.
//!
//! Wires the input hook, the trigger state machine and the PulseAudio client
//! together, and owns the run loop and the shutdown sequence. Events are
//! delivered through a single channel and processed one at a time, so the
//! state machine never sees overlapping calls.

use anyhow::Result;
use log::{Level, debug, error, info, warn};
use notify_rust::Notification;
use rdev::listen;
use tokio::sync::mpsc::unbounded_channel;

use crate::config::Config;
use crate::event::{EventKind, NormalizedEvent, normalize};
use crate::indicator;
use crate::pulse::PulseClient;
use crate::trigger::{Transition, TriggerMachine};

pub struct App {
    machine: TriggerMachine,
    pulse: PulseClient,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        debug!("Starting version {}", env!("CARGO_PKG_VERSION"));
        let machine = TriggerMachine::new(config.event_codes.iter().cloned(), config.lock_mode);
        let pulse = PulseClient::new(config.sources.clone());
        Self {
            machine,
            pulse,
            config,
        }
    }

    /// Runs until interrupted.
    ///
    /// Every run is bracketed: [`Self::mute_on_start`] is the first
    /// mute-related call and [`Self::unmute_on_exit`] the last, whatever
    /// recording state the loop ends in.
    pub async fn run(&mut self) -> Result<()> {
        self.mute_on_start();

        if !self.config.no_indicator {
            let _indicator = indicator::spawn(self.pulse.clone())?;
        }

        let (schan, mut rchan) = unbounded_channel();
        let listener = tokio::task::spawn_blocking(move || {
            if let Err(err) = listen(move |event| {
                if let Err(err) = schan.send(event) {
                    error!("Could not send event: {err:?}");
                }
            }) {
                error!("Could not listen for events: {err:?}");
            }
        });

        for (level, message) in self.startup_prompts() {
            log::log!(level, "{message}");
        }

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                maybe_event = rchan.recv() => match maybe_event {
                    Some(event) => self.handle_raw(&event),
                    None => break,
                },
            }
        }

        // Stop the watch before the final unmute so no event processed
        // after this point can change mute state again.
        rchan.close();
        listener.abort();

        self.unmute_on_exit();
        Ok(())
    }

    /// Force-mutes every eligible source so the run starts from a silent
    /// baseline, whatever state the server was left in.
    fn mute_on_start(&self) {
        if let Err(err) = self.pulse.mute_all() {
            warn!("{err}");
        }
    }

    /// Force-unmutes every eligible source on the way out, whether or not
    /// recording was active when the interrupt arrived.
    fn unmute_on_exit(&self) {
        if let Err(err) = self.pulse.unmute_all() {
            warn!("{err}");
        }
        debug!("terminated.");
    }

    /// The lines printed once at startup, in order, describing how to exit
    /// and the current binding state.
    fn startup_prompts(&self) -> Vec<(Level, String)> {
        let mut prompts = vec![(Level::Info, "> Press CTRL + C to exit...".to_string())];
        if self.machine.binding().is_empty() {
            prompts.push((
                Level::Debug,
                "!!! Key binding not yet configured !".to_string(),
            ));
            prompts.push((Level::Info, "> Press key/mouse to bind :".to_string()));
        } else {
            let mut codes: Vec<_> = self.machine.binding().iter().cloned().collect();
            codes.sort();
            prompts.push((
                Level::Info,
                format!("Configured bind(s) : {}", codes.join(", ")),
            ));
        }
        prompts
    }

    fn handle_raw(&mut self, event: &rdev::Event) {
        match normalize(&event.event_type) {
            Ok(Some(event)) => self.handle_event(&event),
            Ok(None) => {}
            Err(err) => warn!("{err}"),
        }
    }

    fn handle_event(&mut self, event: &NormalizedEvent) {
        debug!("Event detected : {}", event.code);
        if let Some(transition) = self.machine.handle(event) {
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Bound { kind, code } => {
                info!("Binded {kind} event : '{code}'.");
                self.notify_bound(kind, &code);
            }
            Transition::Start => {
                if let Err(err) = self.pulse.unmute_all() {
                    warn!("{err}");
                }
            }
            Transition::Stop => {
                if let Err(err) = self.pulse.mute_all() {
                    warn!("{err}");
                }
            }
        }
    }

    fn notify_bound(&self, kind: EventKind, code: &str) {
        if let Err(err) = Notification::new()
            .summary(&format!("pulsetalk: bound {kind} trigger"))
            .body(&format!("'{code}' now toggles recording"))
            .icon("audio-input-microphone")
            .show()
        {
            error!("Cannot show notification: {err}");
        }
    }
}
