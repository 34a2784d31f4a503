//! Builds runtime components from a prepared config.

use std::sync::Arc;
use std::time::Duration;

use cyborg_channels::{ConsoleTransport, DiscordTransport};
use cyborg_commands::{core_bundle, RouterConfig};
use cyborg_config::{CyborgConfig, TransportKind};
use cyborg_core::Transport;
use cyborg_plugins::{CompositeLoader, ManifestLoader, ModuleLoader, StaticLoader};

/// Name of the compiled-in management bundle.
pub const CORE_MODULE: &str = "core";

/// Compiled-in bundles first, so they shadow same-named manifests.
pub fn build_loader(config: &CyborgConfig) -> Arc<dyn ModuleLoader> {
    let builtin = StaticLoader::new().with_bundle(CORE_MODULE, core_bundle);
    let manifests = ManifestLoader::new(config.module_directory());
    Arc::new(CompositeLoader::new(vec![Arc::new(builtin), Arc::new(manifests)]))
}

pub fn router_config(config: &CyborgConfig) -> RouterConfig {
    RouterConfig {
        command_prefix: config.command_prefix().to_string(),
        authorized_sender_id: config.authorized_sender_id,
        handler_timeout: Some(Duration::from_secs(config.handler_timeout_secs())),
        log_prefix: config.log_prefix().to_string(),
    }
}

pub fn transport_kind(config: &CyborgConfig, force_console: bool) -> TransportKind {
    if force_console {
        TransportKind::Console
    } else {
        config.transport()
    }
}

pub fn build_transport(config: &CyborgConfig, kind: TransportKind) -> Arc<dyn Transport> {
    match kind {
        TransportKind::Discord => Arc::new(DiscordTransport::new(
            config.auth_token.clone().unwrap_or_default(),
        )),
        TransportKind::Console => Arc::new(ConsoleTransport::stdio(config.authorized_sender_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyborg_config::apply_all_defaults;

    #[test]
    fn router_config_uses_effective_values() {
        let cfg = apply_all_defaults(CyborgConfig {
            authorized_sender_id: 9,
            handler_timeout_secs: Some(5),
            ..Default::default()
        });
        let rc = router_config(&cfg);
        assert_eq!(rc.command_prefix, "//");
        assert_eq!(rc.authorized_sender_id, 9);
        assert_eq!(rc.handler_timeout, Some(Duration::from_secs(5)));
        assert_eq!(rc.log_prefix, "Medjed.Cyborg");
    }

    #[test]
    fn console_flag_overrides_transport() {
        let cfg = CyborgConfig::default();
        assert_eq!(transport_kind(&cfg, false), TransportKind::Discord);
        assert_eq!(transport_kind(&cfg, true), TransportKind::Console);
    }

    #[tokio::test]
    async fn loader_serves_core_bundle_without_module_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CyborgConfig {
            module_directory: Some(dir.path().join("absent").display().to_string()),
            ..Default::default()
        };
        let loader = build_loader(&cfg);
        assert!(loader.source_exists(CORE_MODULE).await);
        assert!(!loader.source_exists("greet").await);
    }
}
