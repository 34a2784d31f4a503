use serde::{Deserialize, Serialize};

/// Embed colour used for failures.
pub const COLOUR_ERROR: u32 = 0xBB0000;
/// Embed colour used for successful lifecycle operations.
pub const COLOUR_OK: u32 = 0x00BB00;
/// Neutral embed colour.
pub const COLOUR_NEUTRAL: u32 = 0x000000;

/// Identity stamped into the footer of every reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub version: String,
}

impl Default for AgentInfo {
    fn default() -> Self {
        Self {
            name: "Medjed.Cyborg".to_string(),
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AgentInfo {
    pub fn footer(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Build a styled reply carrying this agent's footer.
    pub fn build_reply(&self, text: impl Into<String>, colour: u32) -> ReplyPayload {
        ReplyPayload {
            kind: "rich".to_string(),
            description: text.into(),
            colour,
            footer: self.footer(),
        }
    }
}

/// A styled reply, rendered by the transport (an embed on Discord).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub colour: u32,
    pub footer: String,
}

/// Snapshot of one loaded module, for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub name: String,
    pub source: String,
    pub commands: Vec<String>,
}

/// Outcome of a batch load or reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub loaded: Vec<String>,
    /// Names skipped because their source no longer exists.
    pub skipped: Vec<String>,
    /// `(module, reason)` for every load that failed.
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut out = format!("loaded {} module(s)", self.loaded.len());
        if !self.skipped.is_empty() {
            out.push_str(&format!(", skipped {}", self.skipped.join(", ")));
        }
        if !self.failed.is_empty() {
            let names: Vec<&str> = self.failed.iter().map(|(n, _)| n.as_str()).collect();
            out.push_str(&format!(", failed {}", names.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_carries_footer() {
        let agent = AgentInfo {
            name: "Medjed.Cyborg".into(),
            version: "v1.0.0".into(),
        };
        let reply = agent.build_reply("hi", COLOUR_ERROR);
        assert_eq!(reply.footer, "Medjed.Cyborg v1.0.0");
        assert_eq!(reply.kind, "rich");
        assert_eq!(reply.colour, 0xBB0000);
    }

    #[test]
    fn batch_summary_lists_problems() {
        let report = BatchReport {
            loaded: vec!["a".into()],
            skipped: vec!["b".into()],
            failed: vec![("c".into(), "bad yaml".into())],
        };
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "loaded 1 module(s), skipped b, failed c");
    }
}
