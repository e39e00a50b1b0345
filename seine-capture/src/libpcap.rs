//! libpcap implementation of the capture binding contract

use pcap::{Active, Capture, Inactive, Linktype};
use tracing::{debug, warn};

use seine_core::{ActivationFailure, Error, Result};

use crate::binding::{CaptureBinding, CaptureConfig, Frame};
use crate::interface::get_interface;

/// Capture handle backed by libpcap.
///
/// The pcap crate only accepts filters on activated captures, so the
/// filter expression is compile-checked at install time and attached to
/// the live capture during activation.
pub struct PcapHandle {
    device: String,
    config: CaptureConfig,
    filter: Option<String>,
    state: HandleState,
}

enum HandleState {
    Inactive(Capture<Inactive>),
    Active(Capture<Active>),
    Closed,
}

impl PcapHandle {
    /// Device this handle captures on
    pub fn device(&self) -> &str {
        &self.device
    }

    fn build(device: &str, config: &CaptureConfig) -> Result<Capture<Inactive>> {
        let mut capture = Capture::from_device(device)
            .map_err(|e| Error::device_open(device, e.to_string()))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .timeout(config.timeout_ms)
            .immediate_mode(config.immediate_mode);

        if config.buffer_size > 0 {
            capture = capture.buffer_size(config.buffer_size);
        }

        Ok(capture)
    }
}

/// The production capture binding, backed by the system libpcap
#[derive(Debug, Default)]
pub struct PcapBinding;

impl PcapBinding {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBinding for PcapBinding {
    type Handle = PcapHandle;

    fn open(&self, device: &str, config: &CaptureConfig) -> Result<PcapHandle> {
        // libpcap defers most device checks to activation; validating the
        // name here keeps unknown devices a create-time failure.
        get_interface(device).map_err(|e| Error::device_open(device, e.to_string()))?;

        let capture = PcapHandle::build(device, config)?;
        debug!(device, "opened capture handle");

        Ok(PcapHandle {
            device: device.to_string(),
            config: config.clone(),
            filter: None,
            state: HandleState::Inactive(capture),
        })
    }

    fn set_snaplen(&self, handle: &mut PcapHandle, snaplen: i32) -> Result<()> {
        match std::mem::replace(&mut handle.state, HandleState::Closed) {
            HandleState::Inactive(capture) => {
                handle.state = HandleState::Inactive(capture.snaplen(snaplen));
                handle.config.snaplen = snaplen;
                Ok(())
            }
            other => {
                handle.state = other;
                Err(Error::CaptureSize {
                    snaplen,
                    cause: "capture size can only be set before activation".to_string(),
                })
            }
        }
    }

    fn install_filter(&self, handle: &mut PcapHandle, filter: &str) -> Result<()> {
        // Compile against a dead capture so a bad expression fails now,
        // not at activation.
        let mut probe = Capture::dead(Linktype::ETHERNET).map_err(|e| Error::FilterCompile {
            filter: filter.to_string(),
            cause: e.to_string(),
        })?;
        probe.filter(filter, true).map_err(|e| Error::FilterCompile {
            filter: filter.to_string(),
            cause: e.to_string(),
        })?;

        // On a live handle attach directly; otherwise the expression is
        // staged and attached during activation.
        if let HandleState::Active(capture) = &mut handle.state {
            capture.filter(filter, true).map_err(|e| Error::FilterInstall {
                filter: filter.to_string(),
                cause: e.to_string(),
            })?;
        }

        handle.filter = Some(filter.to_string());
        debug!(device = %handle.device, filter, "capture filter installed");
        Ok(())
    }

    fn activate(&self, handle: &mut PcapHandle) -> Result<()> {
        let capture = match std::mem::replace(&mut handle.state, HandleState::Closed) {
            HandleState::Inactive(capture) => capture,
            HandleState::Active(capture) => {
                handle.state = HandleState::Active(capture);
                return Err(Error::activation(
                    handle.device.as_str(),
                    ActivationFailure::AlreadyActivated,
                ));
            }
            HandleState::Closed => {
                return Err(Error::activation(
                    handle.device.as_str(),
                    ActivationFailure::Generic("capture handle is closed".to_string()),
                ));
            }
        };

        let mut active = match capture.open() {
            Ok(active) => active,
            Err(e) => {
                // pcap consumes the handle on a failed open; rebuild it so
                // the session stays in its created state and can be retried.
                match PcapHandle::build(&handle.device, &handle.config) {
                    Ok(rebuilt) => handle.state = HandleState::Inactive(rebuilt),
                    Err(rebuild_err) => {
                        warn!(device = %handle.device, error = %rebuild_err,
                              "could not reopen capture handle after failed activation");
                    }
                }
                return Err(Error::activation(
                    handle.device.as_str(),
                    classify_activation(&e.to_string()),
                ));
            }
        };

        if let Some(filter) = &handle.filter {
            if let Err(e) = active.filter(filter, true) {
                let filter = filter.clone();
                match PcapHandle::build(&handle.device, &handle.config) {
                    Ok(rebuilt) => handle.state = HandleState::Inactive(rebuilt),
                    Err(rebuild_err) => {
                        warn!(device = %handle.device, error = %rebuild_err,
                              "could not reopen capture handle after failed filter install");
                    }
                }
                return Err(Error::FilterInstall {
                    filter,
                    cause: e.to_string(),
                });
            }
        }

        handle.state = HandleState::Active(active);
        debug!(device = %handle.device, "capture handle activated");
        Ok(())
    }

    fn poll(&self, handle: &mut PcapHandle) -> Result<Option<Frame>> {
        let capture = match &mut handle.state {
            HandleState::Active(capture) => capture,
            _ => {
                return Err(Error::capture_loop(
                    handle.device.as_str(),
                    "capture handle is not activated",
                ))
            }
        };

        match capture.next_packet() {
            Ok(packet) => Ok(Some(Frame {
                caplen: packet.header.caplen,
                wire_len: packet.header.len,
                data: packet.data.to_vec(),
            })),
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(Error::capture_loop(handle.device.as_str(), e.to_string())),
        }
    }

    fn close(&self, handle: PcapHandle) {
        debug!(device = %handle.device, "closing capture handle");
        drop(handle);
    }
}

/// Classify libpcap activation diagnostics into the failure taxonomy.
///
/// libpcap reports activation failures through a fixed set of error and
/// warning codes; the pcap crate flattens them into message text, so the
/// classification keys on the canonical diagnostic strings.
fn classify_activation(cause: &str) -> ActivationFailure {
    let lower = cause.to_ascii_lowercase();

    if lower.contains("promiscuous") && lower.contains("not supported") {
        ActivationFailure::PromiscuousNotSupported(cause.to_string())
    } else if lower.contains("no such device") {
        ActivationFailure::NoSuchDevice(cause.to_string())
    } else if lower.contains("already activated") {
        ActivationFailure::AlreadyActivated
    } else if lower.contains("promiscuous") && lower.contains("permission") {
        ActivationFailure::PromiscuousPermissionDenied(cause.to_string())
    } else if lower.contains("permission denied") || lower.contains("don't have permission") {
        ActivationFailure::PermissionDenied(cause.to_string())
    } else if lower.contains("not up") || lower.contains("is down") {
        ActivationFailure::NotUp(cause.to_string())
    } else {
        ActivationFailure::Generic(cause.to_string())
    }
}
