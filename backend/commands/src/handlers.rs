/// The built-in `core` bundle: liveness and module management from chat.
///
/// These handlers mutate the registry from inside a dispatch, which works
/// because the dispatcher holds no registry lock while a handler runs.
use anyhow::Result;
use cyborg_core::{BatchReport, Context, InboundMessage, COLOUR_ERROR, COLOUR_NEUTRAL, COLOUR_OK};
use cyborg_plugins::{handler, variadic, ModuleExports};

/// Argument meaning "every module".
pub const ALL_MODULES: &str = "*";

pub fn core_bundle() -> ModuleExports {
    ModuleExports::new()
        .with_description("Built-in module management")
        .command("ping", handler(|ctx, msg, _| async move { ping(&ctx, &msg).await }))
        .command("modules", handler(|ctx, msg, _| async move { list_modules(&ctx, &msg).await }))
        .command("load", variadic(|ctx, msg, args| async move { load(&ctx, &msg, &args).await }))
        .command("unload", variadic(|ctx, msg, args| async move { unload(&ctx, &msg, &args).await }))
        .command("reload", variadic(|ctx, msg, args| async move { reload(&ctx, &msg, &args).await }))
}

async fn ping(ctx: &Context, msg: &InboundMessage) -> Result<()> {
    ctx.reply(msg, "pong", COLOUR_NEUTRAL).await
}

async fn list_modules(ctx: &Context, msg: &InboundMessage) -> Result<()> {
    let modules = ctx.modules().modules().await;
    if modules.is_empty() {
        return ctx.reply(msg, "no modules loaded", COLOUR_NEUTRAL).await;
    }
    let lines: Vec<String> = modules
        .iter()
        .map(|m| format!("**{}** ({}): {}", m.name, m.source, m.commands.join(", ")))
        .collect();
    ctx.reply(msg, lines.join("\n"), COLOUR_NEUTRAL).await
}

fn require_names(args: &[String]) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("expected one or more module names, or `{ALL_MODULES}`");
    }
    Ok(())
}

async fn report_batch(ctx: &Context, msg: &InboundMessage, report: &BatchReport) -> Result<()> {
    let colour = if report.is_clean() { COLOUR_OK } else { COLOUR_ERROR };
    ctx.reply(msg, report.summary(), colour).await
}

async fn load(ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
    require_names(args)?;
    if args.iter().any(|a| a == ALL_MODULES) {
        let report = ctx.modules().load_all().await;
        return report_batch(ctx, msg, &report).await;
    }
    for name in args {
        ctx.modules().load(name).await?;
        ctx.reply(msg, format!("loaded `{name}`"), COLOUR_OK).await?;
    }
    Ok(())
}

async fn unload(ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
    require_names(args)?;
    if args.iter().any(|a| a == ALL_MODULES) {
        ctx.modules().unload_all().await;
        return ctx.reply(msg, "unloaded all modules", COLOUR_OK).await;
    }
    for name in args {
        ctx.modules().unload(name).await?;
        ctx.reply(msg, format!("unloaded `{name}`"), COLOUR_OK).await?;
    }
    Ok(())
}

async fn reload(ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
    require_names(args)?;
    if args.iter().any(|a| a == ALL_MODULES) {
        let report = ctx.modules().reload_all().await;
        return report_batch(ctx, msg, &report).await;
    }
    for name in args {
        ctx.modules().reload(name).await?;
        ctx.reply(msg, format!("reloaded `{name}`"), COLOUR_OK).await?;
    }
    Ok(())
}
