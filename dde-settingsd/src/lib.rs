pub mod file_lock;

use anyhow::Context;
use clap::{ArgAction, Parser};
use dde_settings::ExtDevBridge;
use dde_settings::device::{ExtDevContext, GioSettingsBackend, MemorySettings, SettingsBackend};
use log::{info, warn};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};

use crate::file_lock::acquire_daemon_lock;

#[derive(Parser, Debug)]
#[command(name = "dde-settingsd")]
#[command(disable_version_flag = true)]
#[command(version)]
struct Args {
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,

    /// Bus to publish on instead of the session bus.
    #[arg(long, env = "DDE_SETTINGSD_BUS_ADDRESS")]
    bus_address: Option<String>,

    /// Log filter, overridden by RUST_LOG.
    #[arg(long, env = "DDE_SETTINGSD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Serve from an in-process store seeded with defaults instead of GSettings.
    #[arg(long, env = "DDE_SETTINGSD_MEMORY_BACKEND")]
    memory_backend: bool,
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.version {
        println!("dde-settingsd {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let _lock = acquire_daemon_lock()?;

    let backend: Arc<dyn SettingsBackend> = if args.memory_backend {
        info!("Using in-memory settings store");
        Arc::new(MemorySettings::with_device_defaults())
    } else {
        Arc::new(GioSettingsBackend::for_devices().context("GSettings schemas unavailable")?)
    };

    // GSettings change signals are dispatched on the default main context
    let main_loop = glib::MainLoop::new(None, false);
    let glib_thread = {
        let main_loop = main_loop.clone();
        std::thread::Builder::new()
            .name("glib-main".into())
            .spawn(move || main_loop.run())
            .context("Failed to start GLib main loop")?
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(serve(args.bus_address, backend));

    main_loop.quit();
    if glib_thread.join().is_err() {
        warn!("GLib main loop thread panicked");
    }
    result
}

async fn serve(
    bus_address: Option<String>,
    backend: Arc<dyn SettingsBackend>,
) -> anyhow::Result<()> {
    let ctx = match bus_address {
        Some(address) => ExtDevContext::with_address(&address, backend)
            .await
            .with_context(|| format!("Failed to connect to {address}"))?,
        None => ExtDevContext::session(backend)
            .await
            .context("Failed to connect to the session bus")?,
    };

    let bridge = ExtDevBridge::publish(ctx)
        .await
        .context("Failed to publish ExtDevManager")?;

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }

    info!("Shutting down");
    bridge.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["dde-settingsd"]).unwrap();
        assert!(!args.version);
        assert!(!args.memory_backend);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn flags() {
        let args = Args::try_parse_from([
            "dde-settingsd",
            "--memory-backend",
            "--bus-address",
            "unix:path=/tmp/bus",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(args.memory_backend);
        assert_eq!(args.bus_address.as_deref(), Some("unix:path=/tmp/bus"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn short_version_flag() {
        let args = Args::try_parse_from(["dde-settingsd", "-V"]).unwrap();
        assert!(args.version);
    }
}
