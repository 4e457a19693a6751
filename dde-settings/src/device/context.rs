//! Explicit runtime context for the device bridge.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;
use zbus::Connection;

use crate::device::backend::SettingsBackend;
use crate::Result;

/// The session bus connection and settings store the bridge operates on.
///
/// Created once by the caller and handed to [`ExtDevBridge::publish`];
/// nothing in this crate holds process-wide connection state.
///
/// [`ExtDevBridge::publish`]: crate::ExtDevBridge::publish
#[derive(Clone)]
pub struct ExtDevContext {
    conn: Connection,
    backend: Arc<dyn SettingsBackend>,
}

impl ExtDevContext {
    /// Wraps an existing connection.
    pub fn new(conn: Connection, backend: Arc<dyn SettingsBackend>) -> Self {
        Self { conn, backend }
    }

    /// Connects to the session bus.
    pub async fn session(backend: Arc<dyn SettingsBackend>) -> Result<Self> {
        let conn = Connection::session().await?;
        debug!("Connected to session bus as {:?}", conn.unique_name());
        Ok(Self::new(conn, backend))
    }

    /// Connects to the bus at `address`, e.g. `unix:path=/run/user/1000/bus`.
    pub async fn with_address(address: &str, backend: Arc<dyn SettingsBackend>) -> Result<Self> {
        let conn = zbus::connection::Builder::address(address)?
            .build()
            .await?;
        debug!("Connected to {address}");
        Ok(Self::new(conn, backend))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn backend(&self) -> &Arc<dyn SettingsBackend> {
        &self.backend
    }
}

impl Debug for ExtDevContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtDevContext")
            .field("conn", &self.conn)
            .finish_non_exhaustive()
    }
}
