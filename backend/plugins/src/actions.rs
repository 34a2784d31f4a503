//! Handlers built from manifest entries.

use std::process::Stdio;
use std::sync::LazyLock;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use cyborg_core::{CommandHandler, Context, InboundMessage, COLOUR_NEUTRAL};
use regex::Regex;
use tokio::process::Command;
use tracing::info;

/// Longest stdout excerpt sent back in a reply.
const MAX_OUTPUT_CHARS: usize = 1900;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(args|sender|arg(\d+))\}").unwrap());

/// Replies with a rendered template.
pub struct ReplyAction {
    pub template: String,
    pub accepts_args: bool,
    pub colour: u32,
}

#[async_trait]
impl CommandHandler for ReplyAction {
    fn accepts_args(&self) -> bool {
        self.accepts_args
    }

    async fn call(&self, ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
        let text = render(&self.template, args, &msg.sender_name)?;
        ctx.reply(msg, text, self.colour).await
    }
}

/// Runs a host program and replies with its stdout.
pub struct ExecAction {
    pub program: String,
    pub base_args: Vec<String>,
    pub accepts_args: bool,
}

#[async_trait]
impl CommandHandler for ExecAction {
    fn accepts_args(&self) -> bool {
        self.accepts_args
    }

    async fn call(&self, ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(program = %self.program, args = ?args, "Executing module program");

        let output = cmd
            .output()
            .await
            .with_context(|| format!("cannot start `{}`", self.program))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            bail!("`{}` exited with {}: {}", self.program, code, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        ctx.reply(msg, format_output(&stdout), COLOUR_NEUTRAL).await
    }
}

/// Expand `{args}`, `{argN}` and `{sender}` in a reply template.
pub fn render(template: &str, args: &[String], sender: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        match (&caps[1], caps.get(2)) {
            ("args", _) => out.push_str(&args.join(" ")),
            ("sender", _) => out.push_str(sender),
            (_, Some(index)) => {
                let i: usize = index.as_str().parse()?;
                match args.get(i) {
                    Some(value) => out.push_str(value),
                    None => bail!("missing argument {}", i),
                }
            }
            _ => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

fn format_output(stdout: &str) -> String {
    let trimmed = stdout.trim_end();
    if trimmed.is_empty() {
        return "(no output)".to_string();
    }
    let excerpt: String = trimmed.chars().take(MAX_OUTPUT_CHARS).collect();
    let ellipsis = if excerpt.len() < trimmed.len() { "\n..." } else { "" };
    format!("```\n{excerpt}{ellipsis}\n```")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    pub use cyborg_core::testing::RecordingTransport;
    use cyborg_core::{AgentInfo, BatchReport, Context, CyborgError, ModuleControl, ModuleSummary};

    pub struct NoModules;

    #[async_trait]
    impl ModuleControl for NoModules {
        async fn modules(&self) -> Vec<ModuleSummary> {
            Vec::new()
        }
        async fn load(&self, name: &str) -> Result<(), CyborgError> {
            Err(CyborgError::module_load(name, "not supported"))
        }
        async fn load_all(&self) -> BatchReport {
            BatchReport::default()
        }
        async fn unload(&self, name: &str) -> Result<(), CyborgError> {
            Err(CyborgError::ModuleNotFound(name.to_string()))
        }
        async fn unload_all(&self) {}
        async fn reload(&self, name: &str) -> Result<(), CyborgError> {
            Err(CyborgError::ModuleNotFound(name.to_string()))
        }
        async fn reload_all(&self) -> BatchReport {
            BatchReport::default()
        }
    }

    pub fn context() -> (Context, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let ctx = Context::new(transport.clone(), Arc::new(NoModules), AgentInfo::default());
        (ctx, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::context;
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_expands_placeholders() {
        let out = render("{sender}: {arg1} then {arg0} ({args})", &args(&["a", "b"]), "op").unwrap();
        assert_eq!(out, "op: b then a (a b)");
    }

    #[test]
    fn render_missing_positional_fails() {
        let err = render("{arg2}", &args(&["a"]), "op").unwrap_err();
        assert_eq!(err.to_string(), "missing argument 2");
    }

    #[test]
    fn render_leaves_unknown_braces() {
        assert_eq!(render("{nope} {}", &[], "op").unwrap(), "{nope} {}");
    }

    #[test]
    fn long_output_is_truncated() {
        let long = "x".repeat(MAX_OUTPUT_CHARS + 10);
        let out = format_output(&long);
        assert!(out.ends_with("\n...\n```"));
        assert_eq!(format_output("  \n"), "(no output)");
    }

    #[tokio::test]
    async fn reply_action_sends_rendered_text() {
        let (ctx, transport) = context();
        let action = ReplyAction {
            template: "hi {arg0}".into(),
            accepts_args: true,
            colour: 0x123456,
        };
        let msg = InboundMessage::new("1", "chan", 7, "op", "//g.hi bob");
        action.call(&ctx, &msg, &args(&["bob"])).await.unwrap();

        let sent = transport.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "chan");
        assert_eq!(sent[0].1.description, "hi bob");
        assert_eq!(sent[0].1.colour, 0x123456);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exec_action_replies_with_stdout() {
        let (ctx, transport) = context();
        let action = ExecAction {
            program: "echo".into(),
            base_args: args(&["hello"]),
            accepts_args: true,
        };
        let msg = InboundMessage::new("1", "chan", 7, "op", "//sys.echo world");
        action.call(&ctx, &msg, &args(&["world"])).await.unwrap();

        let sent = transport.sent.lock().await;
        assert_eq!(sent[0].1.description, "```\nhello world\n```");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exec_action_fails_on_nonzero_exit() {
        let (ctx, transport) = context();
        let action = ExecAction {
            program: "false".into(),
            base_args: vec![],
            accepts_args: false,
        };
        let msg = InboundMessage::new("1", "chan", 7, "op", "//sys.fail");
        let err = action.call(&ctx, &msg, &[]).await.unwrap_err();
        assert!(err.to_string().contains("exited with 1"));
        assert!(transport.sent.lock().await.is_empty());
    }
}
