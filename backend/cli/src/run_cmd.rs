//! `cyborg run`: connect and route commands until the transport ends.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use cyborg_commands::Router;
use cyborg_config::TransportKind;
use cyborg_core::AgentInfo;
use cyborg_hooks::{HookPipeline, LoggingHook};
use tracing::{error, info, warn};

use crate::wiring;

pub async fn run(config_path: &Path, console: bool) -> Result<()> {
    let mut config = cyborg_config::load_resolved(config_path).await?;
    let kind = wiring::transport_kind(&config, console);
    if kind == TransportKind::Console {
        config.transport = Some(TransportKind::Console);
    }

    logging::init_logger(config.log_dir().map(Path::new), config.log_level())?;
    cyborg_config::check(&config)?;
    info!(config = %config_path.display(), transport = %kind, "Starting Cyborg");

    let hooks = HookPipeline::default();
    hooks
        .registry
        .register(Arc::new(LoggingHook::new(config.log_prefix())))
        .await;

    let router = Router::new(
        wiring::router_config(&config),
        wiring::build_loader(&config),
        wiring::build_transport(&config, kind),
        hooks,
        AgentInfo::default(),
    );

    let report = router.load_all_modules().await;
    for (module, reason) in &report.failed {
        error!(module = %module, "Module failed to load: {}", reason);
    }
    info!(loaded = ?report.loaded, failed = report.failed.len(), "Modules loaded");

    tokio::select! {
        result = router.connect() => {
            if let Err(e) = &result {
                error!("Transport stopped: {:#}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; shutting down");
            Ok(())
        }
    }
}
