//! DCS gateway boundary.
//!
//! The real plant would receive OPC/Modbus writes here; this system only
//! ever talks to a mock.

use std::sync::Mutex;

use pts_core::EquipmentTag;

/// Command channel towards the distributed control system.
pub trait DcsGateway: Send + Sync {
    fn enable(&self, tag: &EquipmentTag);
    fn disable(&self, tag: &EquipmentTag);
}

/// Mock gateway: logs the command the real gateway would send.
#[derive(Debug, Default)]
pub struct LoggingDcsGateway;

impl LoggingDcsGateway {
    pub fn new() -> Self {
        Self
    }
}

impl DcsGateway for LoggingDcsGateway {
    fn enable(&self, tag: &EquipmentTag) {
        tracing::info!(tag = %tag, setpoint = 1, "sending OPC/Modbus enable command");
    }

    fn disable(&self, tag: &EquipmentTag) {
        tracing::info!(tag = %tag, setpoint = 0, "sending OPC/Modbus disable command");
    }
}

/// A DCS command as observed by [`RecordingDcsGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DcsCommand {
    Enable(EquipmentTag),
    Disable(EquipmentTag),
}

/// Gateway that records every command, for tests asserting side effects.
#[derive(Debug, Default)]
pub struct RecordingDcsGateway {
    commands: Mutex<Vec<DcsCommand>>,
}

impl RecordingDcsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<DcsCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl DcsGateway for RecordingDcsGateway {
    fn enable(&self, tag: &EquipmentTag) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(DcsCommand::Enable(tag.clone()));
        }
    }

    fn disable(&self, tag: &EquipmentTag) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(DcsCommand::Disable(tag.clone()));
        }
    }
}
