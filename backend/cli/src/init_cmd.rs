//! `cyborg init`: write a starter config and an example module.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cyborg_config::{
    anchor_paths, apply_all_defaults, config_base_dir, write_config, CyborgConfig, TransportKind,
};

use crate::terminal_output::{note_info, note_success};

const EXAMPLE_MODULE: &str = r#"description: Greeting commands
exports:
  cmd_hello: { reply: "hello, {sender}!" }
  cmd_echo: { acceptsArgs: true, reply: "{args}" }
  cmd_uptime: { exec: uptime }
"#;

pub fn starter_config() -> CyborgConfig {
    apply_all_defaults(CyborgConfig {
        auth_token: Some("${DISCORD_TOKEN}".to_string()),
        transport: Some(TransportKind::Discord),
        ..Default::default()
    })
}

pub async fn run(config_path: &Path, force: bool) -> Result<()> {
    if !force && tokio::fs::try_exists(config_path).await.unwrap_or(false) {
        bail!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        );
    }

    let config = starter_config();
    write_config(&config, config_path).await?;
    note_success(&format!("Wrote {}", config_path.display()));

    let anchored = anchor_paths(config, config_base_dir(config_path));
    let module_dir = Path::new(anchored.module_directory());
    let example = module_dir.join("greet.yaml");
    if !tokio::fs::try_exists(&example).await.unwrap_or(false) {
        tokio::fs::create_dir_all(module_dir)
            .await
            .with_context(|| format!("cannot create {}", module_dir.display()))?;
        tokio::fs::write(&example, EXAMPLE_MODULE)
            .await
            .with_context(|| format!("cannot write {}", example.display()))?;
        note_success(&format!("Wrote {}", example.display()));
    }

    note_info("Set DISCORD_TOKEN and authorizedSenderId, then run `cyborg run`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::build_loader;
    use cyborg_plugins::{ModuleLoader, ModuleManifest};
    use std::collections::HashMap;

    #[test]
    fn example_module_is_valid() {
        let manifest = ModuleManifest::parse(EXAMPLE_MODULE).unwrap();
        manifest.validate().unwrap();
        assert_eq!(manifest.exports.len(), 3);
    }

    #[tokio::test]
    async fn writes_config_and_module_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cyborg.yaml");
        run(&path, false).await.unwrap();

        let written = cyborg_config::load_config(&path).await.unwrap();
        assert_eq!(written, starter_config());
        assert!(dir.path().join("modules").join("greet.yaml").exists());

        assert!(run(&path, false).await.is_err());
        run(&path, true).await.unwrap();
    }

    #[tokio::test]
    async fn loader_finds_example_module_after_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("cyborg.yaml");
        run(&path, false).await.unwrap();

        let env = HashMap::from([("DISCORD_TOKEN".to_string(), "token".to_string())]);
        let config = cyborg_config::load_resolved_with(&path, &env).await.unwrap();
        let loader = build_loader(&config);
        assert!(loader.source_exists("greet").await);
        assert!(loader.discover().await.unwrap().contains(&"greet".to_string()));
    }
}
