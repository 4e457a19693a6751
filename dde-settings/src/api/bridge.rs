//! Publication of the ExtDevManager objects on the session bus.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use zbus::Connection;
use zbus::object_server::Interface;

use crate::api::models::{DeviceId, SettingsError};
use crate::device::{
    DeviceEntry, ExtDevContext, ExtDevManager, KeyboardEntry, MouseEntry, SettingsBackend,
    TouchPadEntry,
};
use crate::types::constants::ext_dev;
use crate::Result;

/// A settings key changed; `property` of `device` must be re-announced.
#[derive(Debug, Clone, Copy)]
struct PropertyChange {
    device: DeviceId,
    property: &'static str,
}

/// An object registered by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Published {
    Manager,
    Device(DeviceId),
}

impl Published {
    const ALL: [Published; 4] = [
        Published::Manager,
        Published::Device(DeviceId::Keyboard),
        Published::Device(DeviceId::Mouse),
        Published::Device(DeviceId::TouchPad),
    ];

    fn path(self) -> String {
        match self {
            Self::Manager => ext_dev::PATH.to_string(),
            Self::Device(device) => device.object_path(),
        }
    }
}

/// The published device settings service.
///
/// Owns the registered objects, the `com.deepin.daemon.ExtDevManager` bus
/// name and the task forwarding settings changes as `PropertiesChanged`.
///
/// ```no_run
/// use std::sync::Arc;
/// use dde_settings::ExtDevBridge;
/// use dde_settings::device::GioSettingsBackend;
///
/// # async fn example() -> dde_settings::Result<()> {
/// let backend = Arc::new(GioSettingsBackend::for_devices()?);
/// let bridge = ExtDevBridge::init(backend).await?;
/// // ... serve until asked to stop
/// bridge.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtDevBridge {
    ctx: ExtDevContext,
    forwarder: JoinHandle<()>,
    owns_name: bool,
}

impl ExtDevBridge {
    /// Connects to the session bus and publishes every device entry.
    pub async fn init(backend: Arc<dyn SettingsBackend>) -> Result<Self> {
        let ctx = ExtDevContext::session(backend).await?;
        Self::publish(ctx).await
    }

    /// Publishes the manager and device entries on `ctx`'s connection and
    /// requests the service name.
    ///
    /// # Errors
    ///
    /// On any failure the objects registered by this call are removed again
    /// and the error is returned. Objects registered earlier by someone else
    /// are left alone.
    pub async fn publish(ctx: ExtDevContext) -> Result<Self> {
        let mut bridge = Self::publish_objects(ctx).await?;

        if let Err(e) = bridge.connection().request_name(ext_dev::SERVICE).await {
            warn!("Requesting {} failed: {e}", ext_dev::SERVICE);
            bridge.forwarder.abort();
            unregister(bridge.connection(), &Published::ALL).await;
            return Err(e.into());
        }
        bridge.owns_name = true;

        info!(
            "Published {} on {:?}",
            ext_dev::SERVICE,
            bridge.connection().unique_name()
        );
        Ok(bridge)
    }

    /// Registers the objects and starts change forwarding, without a name.
    async fn publish_objects(ctx: ExtDevContext) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let backend = ctx.backend();
        let keyboard = KeyboardEntry::new(backend);
        let mouse = MouseEntry::new(backend);
        let touchpad = TouchPadEntry::new(backend);

        watch_entry(backend, &keyboard, &tx)?;
        watch_entry(backend, &mouse, &tx)?;
        watch_entry(backend, &touchpad, &tx)?;

        let conn = ctx.connection();
        let mut registered = Vec::with_capacity(Published::ALL.len());
        if let Err(e) = register_all(conn, &mut registered, keyboard, mouse, touchpad).await {
            warn!("Publishing ExtDevManager failed: {e}");
            unregister(conn, &registered).await;
            return Err(e);
        }

        let forwarder = tokio::spawn(forward_changes(conn.clone(), rx));
        Ok(Self {
            ctx,
            forwarder,
            owns_name: false,
        })
    }

    pub fn connection(&self) -> &Connection {
        self.ctx.connection()
    }

    pub fn context(&self) -> &ExtDevContext {
        &self.ctx
    }

    /// Releases the service name and removes every published object.
    ///
    /// Backend watches stay installed but no longer reach the bus.
    pub async fn shutdown(self) -> Result<()> {
        self.forwarder.abort();
        let conn = self.ctx.connection();
        let released = if self.owns_name {
            conn.release_name(ext_dev::SERVICE).await.map(|_| ())
        } else {
            Ok(())
        };
        unregister(conn, &Published::ALL).await;
        released?;
        info!("Shut down {}", ext_dev::SERVICE);
        Ok(())
    }
}

async fn register_all(
    conn: &Connection,
    registered: &mut Vec<Published>,
    keyboard: KeyboardEntry,
    mouse: MouseEntry,
    touchpad: TouchPadEntry,
) -> Result<()> {
    let manager = ExtDevManager::new(&DeviceId::ALL);
    register(conn, Published::Manager, manager, registered).await?;
    register(conn, Published::Device(DeviceId::Keyboard), keyboard, registered).await?;
    register(conn, Published::Device(DeviceId::Mouse), mouse, registered).await?;
    register(conn, Published::Device(DeviceId::TouchPad), touchpad, registered).await?;
    Ok(())
}

async fn register<I: Interface>(
    conn: &Connection,
    object: Published,
    iface: I,
    registered: &mut Vec<Published>,
) -> Result<()> {
    let path = object.path();
    let added = conn.object_server().at(path.as_str(), iface).await?;
    if !added {
        return Err(SettingsError::Dbus(zbus::Error::Failure(format!(
            "{} already registered at {path}",
            I::name()
        ))));
    }
    registered.push(object);
    debug!("Registered {} at {path}", I::name());
    Ok(())
}

async fn unregister(conn: &Connection, objects: &[Published]) {
    let server = conn.object_server();
    for &object in objects {
        let path = object.path();
        let removed = match object {
            Published::Manager => server.remove::<ExtDevManager, _>(path.as_str()).await,
            Published::Device(DeviceId::Keyboard) => {
                server.remove::<KeyboardEntry, _>(path.as_str()).await
            }
            Published::Device(DeviceId::Mouse) => {
                server.remove::<MouseEntry, _>(path.as_str()).await
            }
            Published::Device(DeviceId::TouchPad) => {
                server.remove::<TouchPadEntry, _>(path.as_str()).await
            }
        };
        match removed {
            Ok(_) => debug!("Unregistered {path}"),
            Err(e) => warn!("Failed to unregister {path}: {e}"),
        }
    }
}

fn watch_entry<E: DeviceEntry>(
    backend: &Arc<dyn SettingsBackend>,
    entry: &E,
    tx: &UnboundedSender<PropertyChange>,
) -> Result<()> {
    for binding in entry.bindings() {
        let spec = *binding.spec();
        let tx = tx.clone();
        backend.watch(
            spec.schema,
            spec.key,
            Box::new(move || {
                let change = PropertyChange {
                    device: E::DEVICE,
                    property: spec.name,
                };
                // Fails only once the bridge is shut down.
                let _ = tx.send(change);
            }),
        )?;
    }
    Ok(())
}

async fn forward_changes(conn: Connection, mut rx: UnboundedReceiver<PropertyChange>) {
    while let Some(change) = rx.recv().await {
        let result = match change.device {
            DeviceId::Keyboard => forward_change::<KeyboardEntry>(&conn, change.property).await,
            DeviceId::Mouse => forward_change::<MouseEntry>(&conn, change.property).await,
            DeviceId::TouchPad => forward_change::<TouchPadEntry>(&conn, change.property).await,
        };
        if let Err(e) = result {
            warn!("Failed to announce {}.{}: {e}", change.device, change.property);
        }
    }
    debug!("Change forwarding stopped");
}

async fn forward_change<E: DeviceEntry>(conn: &Connection, property: &str) -> zbus::Result<()> {
    let iface = conn
        .object_server()
        .interface::<_, E>(E::DEVICE.object_path())
        .await?;
    let entry = iface.get().await;
    entry
        .emit_property_changed(property, iface.signal_emitter())
        .await
}
