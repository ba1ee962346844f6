//! Rule tables. Order matters: the first matching rule wins.

use super::{Action, RuleSpec, Trigger};

pub const ENGLISH_RULES: &[RuleSpec] = &[
    RuleSpec::new(Action::Help, Trigger::Any(&["help", "what can you do"])),
    RuleSpec::capturing(Action::Install, Trigger::Any(&["install"]), r"\b(?:re)?install (.+)"),
    RuleSpec::new(Action::Update, Trigger::Any(&["update", "upgrade"])),
    RuleSpec::new(Action::Diagnose, Trigger::Any(&["diagnos", "health check"])),
    RuleSpec::capturing(
        Action::Remind,
        Trigger::Any(&["remind"]),
        r"remind me (?:to )?(.+) (at|in) (.+)",
    ),
    RuleSpec::capturing(
        Action::Email,
        Trigger::Any(&["email"]),
        r"email (?:to )?(\S+) (?:about |saying )?(.+)",
    ),
    RuleSpec::capturing(
        Action::ImageSearch,
        Trigger::Any(&["image search", "search images", "search for images", "images of", "pictures of"]),
        r"(?:image search(?: for)?|search (?:for )?images(?: of)?|images of|pictures of) (.+)",
    ),
    RuleSpec::capturing(
        Action::WebSearch,
        Trigger::Any(&["research", "search web", "search the web", "web search", "look up"]),
        r"(?:research|search (?:the )?web(?: for)?|web search(?: for)?|look up) (.+)",
    ),
    RuleSpec::new(
        Action::SystemInfo,
        Trigger::Any(&["system info", "system status"]),
    ),
    RuleSpec::capturing(Action::OpenSite, Trigger::Words(&["open"]), r"\bopen (?:the )?(?:website )?(.+)"),
    RuleSpec::new(Action::SwitchLanguage, Trigger::Words(&["language", "speak"])),
    RuleSpec::new(Action::Joke, Trigger::Words(&["joke", "jokes", "funny"])),
    RuleSpec::capturing(
        Action::Discuss,
        Trigger::Any(&["discuss", "talk about", "tell me about"]),
        r"(?:discuss|talk about|tell me about) (.+)",
    ),
    RuleSpec::new(Action::Incognito, Trigger::Any(&["incognito", "private mode", "privacy mode"])),
    RuleSpec::new(Action::WipeHistory, Trigger::Any(&["wipe history", "clear data"])),
    RuleSpec::new(Action::Greeting, Trigger::Words(&["hello", "hi", "hey", "greetings"])),
    RuleSpec::new(Action::Thanks, Trigger::Any(&["thank", "appreciate"])),
    RuleSpec::new(Action::HowAreYou, Trigger::Any(&["how are you", "how's it going"])),
    RuleSpec::new(
        Action::Exit,
        Trigger::Words(&["exit", "stop", "sleep", "goodbye", "bye", "quit"]),
    ),
    RuleSpec::new(Action::Weather, Trigger::Words(&["weather", "forecast"])),
    RuleSpec::new(Action::News, Trigger::Words(&["news", "headlines"])),
    RuleSpec::new(Action::Time, Trigger::Words(&["time"])),
    RuleSpec::new(Action::Date, Trigger::Pattern(r"\bdate\b|what day")),
];

pub const FRENCH_RULES: &[RuleSpec] = &[
    RuleSpec::new(Action::Help, Trigger::Pattern(r"\baide\b|que (?:sais|peux)-tu faire")),
    RuleSpec::capturing(
        Action::Install,
        Trigger::Any(&["install"]),
        r"\b(?:ré|re)?install(?:e|er)? (.+)",
    ),
    RuleSpec::new(
        Action::Update,
        Trigger::Any(&["mise à jour", "mettre à jour", "mets à jour", "update", "upgrade"]),
    ),
    RuleSpec::new(Action::Diagnose, Trigger::Any(&["diagnos"])),
    RuleSpec::capturing(
        Action::Remind,
        Trigger::Any(&["rappel"]),
        r"rappelle-moi (?:de |d')?(.+) (à|dans) (.+)",
    ),
    RuleSpec::capturing(
        Action::Email,
        Trigger::Any(&["courriel", "e-mail", "email"]),
        r"(?:courriel|e-mail|email) (?:à )?(\S+) (?:(?:à propos de|au sujet de|pour dire) )?(.+)",
    ),
    RuleSpec::capturing(
        Action::ImageSearch,
        Trigger::Any(&["recherche d'images", "cherche des images", "images de", "photos de"]),
        r"(?:images|photos) (?:de |d')(.+)",
    ),
    RuleSpec::capturing(
        Action::WebSearch,
        Trigger::Any(&["recherche", "cherche sur le web"]),
        r"(?:recherche(?: web)?|cherche sur le web)(?: sur| de)? (.+)",
    ),
    RuleSpec::new(
        Action::SystemInfo,
        Trigger::Any(&["info système", "infos système", "état du système", "system info"]),
    ),
    RuleSpec::capturing(
        Action::OpenSite,
        Trigger::Words(&["ouvre", "ouvrir"]),
        r"\bouvr(?:e|ir) (?:le site )?(.+)",
    ),
    RuleSpec::new(
        Action::SwitchLanguage,
        Trigger::Pattern(
            r"\blangue\b|\bparlez? (?:en )?(?:anglais|français|francais|amharique|oromo|tigrigna|chinois)",
        ),
    ),
    RuleSpec::new(Action::Joke, Trigger::Any(&["blague", "plaisanterie"])),
    RuleSpec::capturing(
        Action::Discuss,
        Trigger::Any(&["parle-moi de", "parlons de", "discutons de", "discuter de"]),
        r"(?:parle-moi de|parlons de|discutons de|discuter de) (.+)",
    ),
    RuleSpec::new(
        Action::Incognito,
        Trigger::Any(&["incognito", "navigation privée", "mode privé"]),
    ),
    RuleSpec::new(
        Action::WipeHistory,
        Trigger::Any(&["efface l'historique", "effacer l'historique", "supprime mes données", "oublie tout"]),
    ),
    RuleSpec::new(Action::Greeting, Trigger::Words(&["bonjour", "salut", "bonsoir", "coucou"])),
    RuleSpec::new(Action::Thanks, Trigger::Any(&["merci"])),
    RuleSpec::new(
        Action::HowAreYou,
        Trigger::Any(&["comment vas-tu", "comment allez-vous", "ça va"]),
    ),
    RuleSpec::new(
        Action::Exit,
        Trigger::Words(&["quitter", "quitte", "arrête", "arrete", "dors", "revoir", "stop"]),
    ),
    RuleSpec::new(Action::Weather, Trigger::Any(&["météo", "meteo"])),
    RuleSpec::new(Action::News, Trigger::Words(&["actualités", "nouvelles", "infos"])),
    RuleSpec::new(Action::Time, Trigger::Words(&["heure"])),
    RuleSpec::new(Action::Date, Trigger::Pattern(r"\bdate\b|quel jour")),
];
