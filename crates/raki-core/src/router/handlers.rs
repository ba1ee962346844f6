use super::replies::{self, tr};
use super::{Action, CommandRouter, RouteOutcome};
use crate::conversation::recurring_topic;
use crate::health::{diagnose, summarize_issues, system_summary};
use crate::language::Language;
use crate::reminders::parse_due_time;
use crate::services::{OutgoingEmail, ServiceError};
use chrono::{Local, Utc};
use tracing::{info, warn};

/// Exchanges (besides the current utterance) scanned for a recurring topic.
const FALLBACK_CONTEXT: usize = 5;

/// Any of these turns incognito on; otherwise the command turns it off.
const INCOGNITO_ON_WORDS: &[&str] = &["on", "enable", "activate", "active", "activer", "activé"];

const UPDATE_COMMAND: &str = "sudo apt update && sudo apt upgrade -y";

/// Debian package names plus the `name=version` / `name:arch` forms apt accepts.
fn is_package_name(word: &str) -> bool {
    !word.is_empty()
        && !word.starts_with('-')
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | ':' | '='))
}

fn with_scheme(site: &str) -> String {
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}

fn first_sentences(text: &str, n: usize) -> String {
    let mut out = String::new();
    for (count, sentence) in text.split_inclusive(". ").enumerate() {
        if count == n {
            break;
        }
        out.push_str(sentence);
    }
    out.trim().to_string()
}

fn arg(args: &[String], i: usize) -> &str {
    args.get(i).map(String::as_str).unwrap_or_default()
}

impl CommandRouter {
    pub(super) async fn handle(
        &self,
        action: Action,
        args: Option<Vec<String>>,
        cmd: &str,
        lang: Language,
    ) -> RouteOutcome {
        match action {
            Action::Install => self.install(args, lang).await,
            Action::Update => self.update(lang).await,
            Action::Diagnose => self.diagnose(lang).await,
            Action::Remind => self.remind(args, lang).await,
            Action::Email => self.email(args, lang).await,
            Action::ImageSearch => self.image_search(args, lang).await,
            Action::WebSearch => self.web_search(args, lang).await,
            Action::SystemInfo => {
                let sample = self.ctx.services.metrics.sample().await;
                RouteOutcome::reply(format!(
                    "{} {}",
                    tr(lang, "Here's your system information:", "Voici les informations de votre système :"),
                    system_summary(&sample)
                ))
            }
            Action::OpenSite => self.open_site(args, lang).await,
            Action::SwitchLanguage => switch_language(cmd, lang),
            Action::Joke => RouteOutcome::reply(replies::joke(lang)),
            Action::Discuss => self.discuss(args, lang).await,
            Action::Incognito => self.incognito(cmd, lang),
            Action::WipeHistory => self.wipe(lang).await,
            Action::Help => RouteOutcome::reply(replies::help(lang)),
            Action::Greeting => RouteOutcome::reply(replies::greeting(lang)),
            Action::Thanks => RouteOutcome::reply(replies::thanks(lang)),
            Action::HowAreYou => RouteOutcome::reply(replies::how_are_you(lang)),
            Action::Exit => RouteOutcome::farewell(replies::farewell(lang)),
            Action::Time => {
                let now = Local::now();
                RouteOutcome::reply(match lang {
                    Language::French => format!("Il est {}.", now.format("%H:%M")),
                    _ => format!("The current time is {}.", now.format("%I:%M %p")),
                })
            }
            Action::Date => {
                let now = Local::now();
                RouteOutcome::reply(match lang {
                    Language::French => format!("Nous sommes le {}.", now.format("%d/%m/%Y")),
                    _ => format!("Today is {}.", now.format("%A, %B %d, %Y")),
                })
            }
            Action::Weather => RouteOutcome::reply(tr(
                lang,
                "I'd be happy to check the weather. Where are you located?",
                "Je peux vérifier la météo. Où êtes-vous situé ?",
            )),
            Action::News => RouteOutcome::reply(tr(
                lang,
                "I can fetch the latest news. What category interests you?",
                "Je peux chercher les dernières actualités. Quelle catégorie vous intéresse ?",
            )),
        }
    }

    async fn install(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "Which package would you like me to install?",
                "Quel paquet voulez-vous que j'installe ?",
            ));
        };
        let package = arg(&args, 0);
        if !package.split_whitespace().all(is_package_name) {
            return RouteOutcome::reply(tr(
                lang,
                "That doesn't look like a package name I can install.",
                "Cela ne ressemble pas à un nom de paquet que je peux installer.",
            ));
        }
        let command = format!("sudo apt install {} -y", package);
        match self.ctx.services.shell.run(&command).await {
            Ok(_) => {
                info!(target: "raki::router", package, "package installed");
                RouteOutcome::reply(match lang {
                    Language::French => format!("J'ai installé {} avec succès.", package),
                    _ => format!("I've successfully installed {} for you.", package),
                })
            }
            Err(ServiceError::NotAllowed(_)) => not_allowed(lang),
            Err(e) => {
                warn!(target: "raki::router", package, error = %e, "install failed");
                RouteOutcome::reply(match lang {
                    Language::French => format!("Je n'ai pas pu installer {}.", package),
                    _ => format!("I had some trouble installing {}.", package),
                })
            }
        }
    }

    async fn update(&self, lang: Language) -> RouteOutcome {
        match self.ctx.services.shell.run(UPDATE_COMMAND).await {
            Ok(_) => RouteOutcome::reply(tr(
                lang,
                "Your system has been updated successfully.",
                "Votre système a été mis à jour avec succès.",
            )),
            Err(ServiceError::NotAllowed(_)) => not_allowed(lang),
            Err(e) => {
                warn!(target: "raki::router", error = %e, "system update failed");
                RouteOutcome::reply(tr(
                    lang,
                    "I ran into a problem while updating your system.",
                    "J'ai rencontré un problème pendant la mise à jour du système.",
                ))
            }
        }
    }

    async fn diagnose(&self, lang: Language) -> RouteOutcome {
        let sample = self.ctx.services.metrics.sample().await;
        let issues = diagnose(&sample, &self.ctx.thresholds);
        if issues.is_empty() {
            return RouteOutcome::reply(tr(
                lang,
                "Everything looks great! Your system is running smoothly.",
                "Tout va bien ! Votre système fonctionne parfaitement.",
            ));
        }
        let summary = summarize_issues(&issues);
        RouteOutcome::reply(match lang {
            Language::French => format!(
                "J'ai trouvé quelques points à surveiller : {}. Voulez-vous que j'essaie de les corriger ?",
                summary
            ),
            _ => format!(
                "I found a few things that need attention: {}. Would you like me to try fixing these?",
                summary
            ),
        })
    }

    async fn remind(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "Sure, I can set a reminder. What should I remind you about, and when?",
                "Bien sûr. De quoi dois-je vous rappeler, et quand ?",
            ));
        };
        let (text, connector, when) = (arg(&args, 0), arg(&args, 1), arg(&args, 2));
        let now = Local::now();
        let due = parse_due_time(&format!("{} {}", connector, when), &now);
        self.ctx
            .reminders
            .add(text, due.with_timezone(&Utc), now.with_timezone(&Utc))
            .await;
        RouteOutcome::reply(match lang {
            Language::French => format!("D'accord, je vous rappellerai {} à {}.", text, due.format("%H:%M")),
            _ => format!("Okay, I'll remind you about {} at {}.", text, due.format("%H:%M")),
        })
    }

    async fn email(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "Who should I email, and what should it say?",
                "À qui dois-je écrire, et que dois-je dire ?",
            ));
        };
        let (to, body) = (arg(&args, 0), arg(&args, 1));
        let question = tr(lang, "What should the subject be?", "Quel est l'objet du message ?");
        let subject = match self.ctx.voice.ask(question, lang.code()).await {
            Ok(Some(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Ok(_) => tr(lang, "No subject", "Sans objet").to_string(),
            Err(e) => {
                warn!(target: "raki::router", error = %e, "could not hear the email subject");
                tr(lang, "No subject", "Sans objet").to_string()
            }
        };
        let email = OutgoingEmail {
            to: to.to_string(),
            subject,
            body: body.to_string(),
        };
        match self.ctx.services.mailer.send(&email).await {
            Ok(()) => {
                info!(target: "raki::router", "email sent");
                RouteOutcome::reply(match lang {
                    Language::French => format!("Courriel envoyé à {}.", to),
                    _ => format!("Email sent to {} successfully.", to),
                })
            }
            Err(e) => {
                warn!(target: "raki::router", error = %e, "email failed");
                RouteOutcome::reply(tr(
                    lang,
                    "I had trouble sending that email. Please check your email configuration.",
                    "Je n'ai pas pu envoyer ce courriel. Vérifiez votre configuration de messagerie.",
                ))
            }
        }
    }

    async fn image_search(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "What images would you like me to find?",
                "Quelles images voulez-vous que je cherche ?",
            ));
        };
        let term = arg(&args, 0);
        let url = format!(
            "https://duckduckgo.com/?q={}&iax=images&ia=images",
            urlencoding::encode(term)
        );
        match self.ctx.services.browser.open(&url).await {
            Ok(()) => RouteOutcome::reply(match lang {
                Language::French => format!("Voici des images de {}.", term),
                _ => format!("Here are images of {}.", term),
            }),
            Err(e) => {
                warn!(target: "raki::router", error = %e, "image search failed");
                RouteOutcome::reply(match lang {
                    Language::French => format!("Je n'ai pas pu afficher les images de {}.", term),
                    _ => format!("Sorry, I couldn't open image results for {}.", term),
                })
            }
        }
    }

    async fn web_search(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "What would you like me to research?",
                "Que voulez-vous que je recherche ?",
            ));
        };
        let topic = arg(&args, 0);
        match self.ctx.services.search.search(topic, lang.code()).await {
            Ok(hits) => match hits.first() {
                Some(top) => {
                    let detail = if top.snippet.is_empty() { &top.title } else { &top.snippet };
                    RouteOutcome::reply(match lang {
                        Language::French => format!("Voici ce que j'ai trouvé sur {} : {}", topic, detail),
                        _ => format!("Here's what I found about {}: {}", topic, detail),
                    })
                }
                None => RouteOutcome::reply(match lang {
                    Language::French => format!("Je n'ai rien trouvé sur {}.", topic),
                    _ => format!("I couldn't find anything about {}.", topic),
                }),
            },
            Err(e) => {
                warn!(target: "raki::router", error = %e, "web search failed");
                RouteOutcome::reply(tr(
                    lang,
                    "I couldn't reach the search service right now.",
                    "Je ne peux pas joindre le service de recherche pour le moment.",
                ))
            }
        }
    }

    async fn open_site(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "Which website would you like me to open?",
                "Quel site voulez-vous que j'ouvre ?",
            ));
        };
        let site = arg(&args, 0);
        match self.ctx.services.browser.open(&with_scheme(site)).await {
            Ok(()) => RouteOutcome::reply(match lang {
                Language::French => format!("J'ouvre {} dans votre navigateur.", site),
                _ => format!("Opening {} in your browser now.", site),
            }),
            Err(e) => {
                warn!(target: "raki::router", error = %e, "browser open failed");
                RouteOutcome::reply(match lang {
                    Language::French => format!("Désolé, je n'ai pas pu ouvrir {}.", site),
                    _ => format!("Sorry, I couldn't open {}.", site),
                })
            }
        }
    }

    async fn discuss(&self, args: Option<Vec<String>>, lang: Language) -> RouteOutcome {
        let Some(args) = args else {
            return RouteOutcome::reply(tr(
                lang,
                "What would you like to talk about?",
                "De quoi voulez-vous parler ?",
            ));
        };
        let topic = arg(&args, 0);
        let summary = match self.ctx.services.search.summarize(topic, lang.code()).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(target: "raki::router", error = %e, "topic summary unavailable");
                None
            }
        };
        RouteOutcome::reply(match (summary, lang) {
            (Some(s), Language::French) => format!(
                "Parlons de {}. {} Qu'aimeriez-vous savoir ?",
                topic,
                first_sentences(&s, 2)
            ),
            (Some(s), _) => format!(
                "Let's talk about {}. {} What would you like to know?",
                topic,
                first_sentences(&s, 2)
            ),
            (None, Language::French) => format!(
                "J'aimerais beaucoup parler de {}. Qu'est-ce qui vous intéresse le plus ?",
                topic
            ),
            (None, _) => format!(
                "I'd love to talk about {}. What interests you most about it?",
                topic
            ),
        })
    }

    fn incognito(&self, cmd: &str, lang: Language) -> RouteOutcome {
        let enable = cmd
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| INCOGNITO_ON_WORDS.contains(&w));
        self.ctx.privacy.set(enable);
        RouteOutcome::reply(match (enable, lang) {
            (true, Language::French) => {
                "Mode incognito activé. Je ne conserverai aucune donnée personnelle pendant cette session."
            }
            (true, _) => "Incognito mode enabled. I won't store any personal data during this session.",
            (false, Language::French) => "Mode incognito désactivé. Je me souviendrai à nouveau de nos conversations.",
            (false, _) => "Incognito mode disabled. I'll remember our conversations again.",
        })
    }

    async fn wipe(&self, lang: Language) -> RouteOutcome {
        match self.ctx.wipe_history().await {
            Ok(removed) => {
                info!(target: "raki::router", removed, "personal data wiped");
                RouteOutcome::reply(tr(
                    lang,
                    "All personal data has been securely erased.",
                    "Toutes vos données personnelles ont été effacées.",
                ))
            }
            Err(e) => {
                warn!(target: "raki::router", error = %e, "wipe failed");
                RouteOutcome::reply(tr(
                    lang,
                    "I encountered an issue while wiping data. Please try again.",
                    "J'ai rencontré un problème pendant l'effacement. Veuillez réessayer.",
                ))
            }
        }
    }

    /// No rule matched: mention a topic the user keeps returning to, or ask them to rephrase.
    pub(super) async fn fallback(&self, cmd: &str, lang: Language) -> RouteOutcome {
        let recent = self.ctx.conversation.recent(FALLBACK_CONTEXT).await;
        let texts = recent
            .iter()
            .map(|e| e.user_text.as_str())
            .chain(std::iter::once(cmd));
        let response = match recurring_topic(texts) {
            Some(topic) => match lang {
                Language::French => format!(
                    "Nous revenons souvent sur « {} ». Voulez-vous m'en dire plus ?",
                    topic
                ),
                _ => format!(
                    "We keep coming back to {}. Would you like to tell me more about it?",
                    topic
                ),
            },
            None => replies::not_understood(lang).to_string(),
        };
        RouteOutcome::unhandled(response)
    }
}

fn not_allowed(lang: Language) -> RouteOutcome {
    RouteOutcome::reply(tr(
        lang,
        "For security reasons, I can't execute that command.",
        "Pour des raisons de sécurité, je ne peux pas exécuter cette commande.",
    ))
}

fn switch_language(cmd: &str, lang: Language) -> RouteOutcome {
    match Language::find_named(cmd) {
        Some(Language::French) => RouteOutcome::switch_to(
            Language::French,
            "Je parle maintenant français. Comment puis-je vous aider ?",
        ),
        Some(target) => RouteOutcome::switch_to(
            target,
            format!("Switched to {}. How can I assist you?", target.name()),
        ),
        None => RouteOutcome::reply(tr(
            lang,
            "Which language would you like me to use? I support English, French, Amharic, Oromo, Tigrigna, and Chinese.",
            "Quelle langue voulez-vous que j'utilise ? Je parle anglais, français, amharique, oromo, tigrigna et chinois.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_names() {
        assert!(is_package_name("vlc"));
        assert!(is_package_name("libssl-dev"));
        assert!(is_package_name("g++"));
        assert!(!is_package_name("vlc;"));
        assert!(!is_package_name("--purge"));
        assert!(!is_package_name("$(reboot)"));
    }

    #[test]
    fn sites_get_https() {
        assert_eq!(with_scheme("example.com"), "https://example.com");
        assert_eq!(with_scheme("http://example.com"), "http://example.com");
    }

    #[test]
    fn summary_is_cut_to_sentences() {
        assert_eq!(
            first_sentences("Rust is a language. It is fast. It is safe.", 2),
            "Rust is a language. It is fast."
        );
    }

    #[test]
    fn language_switch_names_target() {
        let outcome = switch_language("speak french", Language::English);
        assert_eq!(outcome.language_switch, Some(Language::French));
        assert!(outcome.handled);
        let outcome = switch_language("change language", Language::English);
        assert_eq!(outcome.language_switch, None);
    }
}
