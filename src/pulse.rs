//! PulseAudio client.
//!
//! Thin adapter over `pactl`. The source list is queried fresh on every
//! call, so capture devices added or removed mid-run are picked up
//! automatically. Monitor pseudo-sources are never touched, and an optional
//! allow-list restricts every operation to the named sources.

use std::path::PathBuf;
use std::process::Command;

use log::{info, warn};
use serde::Deserialize;

use crate::error::Error;

/// One capture source as reported by the audio server.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceInfo {
    pub index: u32,
    pub name: String,
    pub mute: bool,
}

impl SourceInfo {
    /// Monitor pseudo-sources mirror an output and are never muted here.
    pub fn is_monitor(&self) -> bool {
        self.name.ends_with(".monitor")
    }
}

/// Client for listing and muting PulseAudio capture sources.
#[derive(Debug, Clone)]
pub struct PulseClient {
    allowed: Option<Vec<String>>,
    pactl: PathBuf,
}

impl PulseClient {
    /// Creates a client, optionally restricted to the given source names.
    pub fn new(allowed: Option<Vec<String>>) -> Self {
        Self::with_command("pactl", allowed)
    }

    /// Creates a client driving a specific `pactl` binary instead of the
    /// one on `PATH`.
    pub fn with_command(pactl: impl Into<PathBuf>, allowed: Option<Vec<String>>) -> Self {
        Self {
            allowed,
            pactl: pactl.into(),
        }
    }

    /// Lists all capture sources currently known to the server.
    pub fn list_sources(&self) -> Result<Vec<SourceInfo>, Error> {
        let output = Command::new(&self.pactl)
            .args(["--format=json", "list", "sources"])
            .output()
            .map_err(|err| Error::AudioBackend(format!("cannot run pactl: {err}")))?;
        if !output.status.success() {
            return Err(Error::AudioBackend(format!(
                "pactl list sources failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let sources = serde_json::from_slice(&output.stdout)?;
        Ok(sources)
    }

    pub(crate) fn is_eligible(&self, source: &SourceInfo) -> bool {
        if source.is_monitor() {
            return false;
        }
        match &self.allowed {
            Some(allowed) => allowed.iter().any(|name| *name == source.name),
            None => true,
        }
    }

    /// Mutes or unmutes every eligible source.
    ///
    /// Muting an already muted source is a no-op on the server side, so the
    /// call is safe to repeat. A failure on one source is logged and the
    /// remaining sources are still attempted.
    pub fn set_mute_all(&self, mute: bool) -> Result<(), Error> {
        if mute {
            info!("Do source(s) MUTE :");
        } else {
            info!("Do source(s) UNMUTE :");
        }
        for source in self.list_sources()? {
            if !self.is_eligible(&source) {
                continue;
            }
            match self.set_mute(&source.name, mute) {
                Ok(()) => info!("- {} (index {})", source.name, source.index),
                Err(err) => warn!("Cannot change mute state of {}: {err}", source.name),
            }
        }
        Ok(())
    }

    pub fn mute_all(&self) -> Result<(), Error> {
        self.set_mute_all(true)
    }

    pub fn unmute_all(&self) -> Result<(), Error> {
        self.set_mute_all(false)
    }

    /// Sets the mute state of a single source by name.
    pub fn set_mute(&self, name: &str, mute: bool) -> Result<(), Error> {
        let output = Command::new(&self.pactl)
            .args(["set-source-mute", name, if mute { "1" } else { "0" }])
            .output()
            .map_err(|err| Error::AudioBackend(format!("cannot run pactl: {err}")))?;
        if !output.status.success() {
            return Err(Error::AudioBackend(format!(
                "set-source-mute {name} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    /// Returns true when every eligible source is muted.
    pub fn all_muted(&self) -> Result<bool, Error> {
        Ok(self.all_muted_in(&self.list_sources()?))
    }

    pub(crate) fn all_muted_in(&self, sources: &[SourceInfo]) -> bool {
        sources
            .iter()
            .filter(|source| self.is_eligible(source))
            .all(|source| source.mute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, mute: bool) -> SourceInfo {
        SourceInfo {
            index: 0,
            name: name.to_string(),
            mute,
        }
    }

    #[test]
    fn parses_pactl_json() {
        // Trimmed-down capture of `pactl --format=json list sources`;
        // unknown fields are ignored.
        let payload = r#"[
            {
                "index": 55,
                "state": "SUSPENDED",
                "name": "alsa_input.pci-0000_00_1f.3.analog-stereo",
                "description": "Built-in Audio Analog Stereo",
                "driver": "PipeWire",
                "mute": true,
                "volume": {"front-left": {"value": 65536, "value_percent": "100%", "db": "0.00 dB"}}
            },
            {
                "index": 56,
                "state": "IDLE",
                "name": "alsa_output.pci-0000_00_1f.3.analog-stereo.monitor",
                "description": "Monitor of Built-in Audio Analog Stereo",
                "driver": "PipeWire",
                "mute": false
            }
        ]"#;
        let sources: Vec<SourceInfo> = serde_json::from_str(payload).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].index, 55);
        assert_eq!(sources[0].name, "alsa_input.pci-0000_00_1f.3.analog-stereo");
        assert!(sources[0].mute);
        assert!(!sources[0].is_monitor());
        assert!(sources[1].is_monitor());
    }

    #[test]
    fn monitors_are_never_eligible() {
        let client = PulseClient::new(None);
        assert!(!client.is_eligible(&source("alsa_output.foo.monitor", false)));
        assert!(client.is_eligible(&source("alsa_input.foo", false)));
    }

    #[test]
    fn allow_list_restricts_eligibility() {
        let client = PulseClient::new(Some(vec!["alsa_input.usb_mic".to_string()]));
        assert!(client.is_eligible(&source("alsa_input.usb_mic", false)));
        assert!(!client.is_eligible(&source("alsa_input.other", false)));
        // Allow-listed monitors are still excluded.
        assert!(!client.is_eligible(&source("alsa_input.usb_mic.monitor", false)));
    }

    #[test]
    fn absent_allow_list_means_all_sources() {
        let client = PulseClient::new(None);
        assert!(client.is_eligible(&source("anything_goes", true)));
    }

    #[test]
    fn all_muted_ignores_monitors() {
        let client = PulseClient::new(None);
        // The unmuted monitor must not count as "recording".
        let sources = vec![
            source("alsa_input.mic", true),
            source("alsa_output.speakers.monitor", false),
        ];
        assert!(client.all_muted_in(&sources));
    }

    #[test]
    fn one_unmuted_source_reads_as_recording() {
        let client = PulseClient::new(None);
        let sources = vec![source("alsa_input.mic", true), source("alsa_input.cam", false)];
        assert!(!client.all_muted_in(&sources));
    }

    #[test]
    fn all_muted_respects_allow_list() {
        let client = PulseClient::new(Some(vec!["alsa_input.mic".to_string()]));
        // The unmuted source outside the allow-list is not ours to watch.
        let sources = vec![source("alsa_input.mic", true), source("alsa_input.cam", false)];
        assert!(client.all_muted_in(&sources));
    }

    #[test]
    fn no_sources_counts_as_muted() {
        let client = PulseClient::new(None);
        assert!(client.all_muted_in(&[]));
    }
}
