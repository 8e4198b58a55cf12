//! Everything the player reads
//!
//! The simulation only deals in typed messages and rules; this module turns
//! them into text for the chosen locale.

use serde::{Deserialize, Serialize};

use crate::sim::{ChaosBand, Epilogue, Message, Rule};

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Some(Locale::Zh),
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            _ => None,
        }
    }
}

pub fn title(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "无序之海",
        Locale::En => "SEA OF DISORDER",
    }
}

pub fn intro_text(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "尝试在混乱中建立秩序。\n但请记住，任何分类都是一种偏见。",
        Locale::En => "Try to build order out of chaos.\nBut remember: every classification is a bias.",
    }
}

pub fn tutorial_text(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "根据屏幕上方的指令，将符合条件的实体拖拽至屏幕顶部进行归档。\n达到 200 分后，寻找异常实体以稳定现实。",
        Locale::En => "Follow the directive above and drag matching entities to the top of the screen to archive them.\nAfter 200 points, find the anomaly to stabilize reality.",
    }
}

pub fn archive_zone_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "秩序归档区",
        Locale::En => "ORDER ARCHIVE",
    }
}

pub fn message_text(message: Message, locale: Locale) -> &'static str {
    match (message, locale) {
        (Message::Welcome, Locale::Zh) => "构建秩序",
        (Message::Welcome, Locale::En) => "Build order",
        (Message::RuleShifting, Locale::Zh) => "规则变动中...",
        (Message::RuleShifting, Locale::En) => "Rules shifting...",
        (Message::Anomaly, Locale::Zh) => "警告：检测到无法归类的异常",
        (Message::Anomaly, Locale::En) => "Warning: unclassifiable anomaly detected",
        (Message::Verified, Locale::Zh) => "秩序验证通过",
        (Message::Verified, Locale::En) => "Order verified",
        (Message::Invalid, Locale::Zh) => "无效实体",
        (Message::Invalid, Locale::En) => "Invalid entity",
    }
}

pub fn rule_text(rule: Rule, locale: Locale) -> &'static str {
    match (rule, locale) {
        (Rule::CollectRed, Locale::Zh) => "收集：红色实体",
        (Rule::CollectRed, Locale::En) => "Collect: red entities",
        (Rule::CollectBlue, Locale::Zh) => "收集：蓝色实体",
        (Rule::CollectBlue, Locale::En) => "Collect: blue entities",
        (Rule::CollectRound, Locale::Zh) => "收集：圆形物质",
        (Rule::CollectRound, Locale::En) => "Collect: round matter",
        (Rule::CollectSharp, Locale::Zh) => "收集：尖锐物质",
        (Rule::CollectSharp, Locale::En) => "Collect: sharp matter",
        (Rule::Soul, Locale::Zh) => "错误：无法分类意图",
        (Rule::Soul, Locale::En) => "Error: intent cannot be classified",
    }
}

/// HUD color class for the chaos meter
pub fn chaos_css_class(band: ChaosBand) -> &'static str {
    match band {
        ChaosBand::Calm => "chaos-calm",
        ChaosBand::Unstable => "chaos-unstable",
        ChaosBand::Critical => "chaos-critical",
    }
}

pub fn naming_prompt(locale: Locale) -> (&'static str, &'static str) {
    match locale {
        Locale::Zh => ("世界归于静止，唯有它存在。", "你想给它一个名字吗？"),
        Locale::En => (
            "The world falls still. Only it remains.",
            "Would you like to give it a name?",
        ),
    }
}

/// Lines of the epilogue, chosen only by the branch
pub fn epilogue_lines(epilogue: &Epilogue, locale: Locale) -> Vec<String> {
    match (epilogue, locale) {
        (Epilogue::Named(name), Locale::Zh) => vec![
            "秩序，不曾存在。".to_string(),
            format!("秩序，从你说出 {name} 的那一刻开始存在。"),
        ],
        (Epilogue::Named(name), Locale::En) => vec![
            "Order never existed.".to_string(),
            format!("Order began the moment you said {name}."),
        ],
        (Epilogue::Refused, Locale::Zh) => vec![
            "你拒绝了强加定义的诱惑。".to_string(),
            "在没有任何名字的注视下，它依然存在。".to_string(),
            "未被定义的，或许才是最真实的。".to_string(),
        ],
        (Epilogue::Refused, Locale::En) => vec![
            "You refused the temptation to impose a definition.".to_string(),
            "Unwatched by any name, it still exists.".to_string(),
            "What remains undefined may be the most real.".to_string(),
        ],
    }
}

pub fn restart_label(epilogue: &Epilogue, locale: Locale) -> &'static str {
    match (epilogue, locale) {
        (Epilogue::Named(_), Locale::Zh) => "再次尝试构建",
        (Epilogue::Refused, Locale::Zh) => "再次尝试",
        (_, Locale::En) => "Try again",
    }
}
