//! **CommandRouter**: maps one utterance to one action using an ordered,
//! per-language rule table. The first matching rule wins; unmatched input goes to
//! the conversational fallback.
//!
//! Rules are data ([`RuleSpec`]) compiled once into a [`RuleTable`]. A rule fires on
//! its trigger (substring, whole word or pattern); its optional capture pattern is
//! only used afterwards to pull arguments out of the utterance.

mod handlers;
mod replies;
mod rules;

use crate::context::AssistantContext;
use crate::error::CoreResult;
use crate::language::Language;
use regex::Regex;
use tracing::debug;

pub use rules::{ENGLISH_RULES, FRENCH_RULES};

/// Everything the router knows how to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Update,
    Diagnose,
    Remind,
    Email,
    ImageSearch,
    WebSearch,
    SystemInfo,
    OpenSite,
    SwitchLanguage,
    Joke,
    Discuss,
    Incognito,
    WipeHistory,
    Help,
    Greeting,
    Thanks,
    HowAreYou,
    Exit,
    Time,
    Date,
    Weather,
    News,
}

/// How a rule recognizes its utterances (input is already trimmed and lower-cased).
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any of these substrings.
    Any(&'static [&'static str]),
    /// Any of these as a whole word.
    Words(&'static [&'static str]),
    /// A regular expression.
    Pattern(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub action: Action,
    pub trigger: Trigger,
    /// Pattern whose groups are handed to the handler as arguments.
    pub capture: Option<&'static str>,
}

impl RuleSpec {
    pub const fn new(action: Action, trigger: Trigger) -> Self {
        Self {
            action,
            trigger,
            capture: None,
        }
    }

    pub const fn capturing(action: Action, trigger: Trigger, capture: &'static str) -> Self {
        Self {
            action,
            trigger,
            capture: Some(capture),
        }
    }
}

enum CompiledTrigger {
    Any(&'static [&'static str]),
    Words(&'static [&'static str]),
    Pattern(Regex),
}

impl CompiledTrigger {
    fn matches(&self, cmd: &str) -> bool {
        match self {
            Self::Any(needles) => needles.iter().any(|n| cmd.contains(n)),
            Self::Words(words) => cmd
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| !w.is_empty() && words.contains(&w)),
            Self::Pattern(re) => re.is_match(cmd),
        }
    }
}

struct CompiledRule {
    action: Action,
    trigger: CompiledTrigger,
    capture: Option<Regex>,
}

/// An ordered, compiled rule list.
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    pub fn compile(specs: &[RuleSpec]) -> CoreResult<Self> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            let trigger = match spec.trigger {
                Trigger::Any(n) => CompiledTrigger::Any(n),
                Trigger::Words(w) => CompiledTrigger::Words(w),
                Trigger::Pattern(p) => CompiledTrigger::Pattern(Regex::new(p)?),
            };
            let capture = spec.capture.map(Regex::new).transpose()?;
            rules.push(CompiledRule {
                action: spec.action,
                trigger,
                capture,
            });
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule matching `cmd`, with its captured arguments
    /// (`None` when the rule has no capture pattern or the pattern did not match).
    pub fn classify(&self, cmd: &str) -> Option<(Action, Option<Vec<String>>)> {
        let rule = self.rules.iter().find(|r| r.trigger.matches(cmd))?;
        let args = rule.capture.as_ref().and_then(|re| {
            re.captures(cmd).map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().trim().to_string()).unwrap_or_default())
                    .collect()
            })
        });
        Some((rule.action, args))
    }
}

/// Result of routing one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub response: String,
    /// `false` for empty input and for the conversational fallback.
    pub handled: bool,
    /// `false` once the user has asked the assistant to stop.
    pub continue_running: bool,
    /// Session language requested by the user; the caller applies it.
    pub language_switch: Option<Language>,
}

impl RouteOutcome {
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            handled: true,
            continue_running: true,
            language_switch: None,
        }
    }

    fn unhandled(response: impl Into<String>) -> Self {
        Self {
            handled: false,
            ..Self::reply(response)
        }
    }

    fn farewell(response: impl Into<String>) -> Self {
        Self {
            continue_running: false,
            ..Self::reply(response)
        }
    }

    fn switch_to(lang: Language, response: impl Into<String>) -> Self {
        Self {
            language_switch: Some(lang),
            ..Self::reply(response)
        }
    }
}

pub struct CommandRouter {
    ctx: AssistantContext,
    english: RuleTable,
    french: RuleTable,
}

impl CommandRouter {
    pub fn new(ctx: AssistantContext) -> CoreResult<Self> {
        Ok(Self {
            ctx,
            english: RuleTable::compile(ENGLISH_RULES)?,
            french: RuleTable::compile(FRENCH_RULES)?,
        })
    }

    pub fn context(&self) -> &AssistantContext {
        &self.ctx
    }

    /// French has its own table; every other language is routed with the English one.
    pub fn table_for(&self, lang: Language) -> &RuleTable {
        match lang {
            Language::French => &self.french,
            _ => &self.english,
        }
    }

    /// Which action `text` would trigger in `lang`, without running it.
    pub fn classify(&self, text: &str, lang: Language) -> Option<Action> {
        let cmd = text.trim().to_lowercase();
        self.table_for(lang).classify(&cmd).map(|(action, _)| action)
    }

    pub async fn route(&self, text: &str, lang: Language) -> RouteOutcome {
        let cmd = text.trim().to_lowercase();
        if cmd.is_empty() {
            return RouteOutcome::unhandled(String::new());
        }
        match self.table_for(lang).classify(&cmd) {
            Some((action, args)) => {
                debug!(target: "raki::router", ?action, lang = lang.code(), "rule matched");
                self.handle(action, args, &cmd, lang).await
            }
            None => {
                debug!(target: "raki::router", lang = lang.code(), "no rule matched; conversational fallback");
                self.fallback(&cmd, lang).await
            }
        }
    }
}
