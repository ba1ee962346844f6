//! Canned replies. French has its own wording; every other language uses English.

use crate::language::Language;
use rand::seq::SliceRandom;

/// Picks the French or English variant.
pub(super) fn tr<'a>(lang: Language, en: &'a str, fr: &'a str) -> &'a str {
    match lang {
        Language::French => fr,
        _ => en,
    }
}

fn pick(options: &[&str]) -> String {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

fn pick_for(lang: Language, en: &[&str], fr: &[&str]) -> String {
    match lang {
        Language::French => pick(fr),
        _ => pick(en),
    }
}

pub(super) fn joke(lang: Language) -> String {
    pick_for(
        lang,
        &[
            "Why don't programmers like nature? It has too many bugs.",
            "Why did the computer go to the doctor? Because it had a virus!",
            "What do you call a computer that sings? A Dell!",
            "Why was the JavaScript developer sad? Because he didn't Node how to Express himself!",
            "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
        ],
        &[
            "Pourquoi les programmeurs n'aiment pas la nature ? Il y a trop de bugs.",
            "Pourquoi l'ordinateur est allé chez le médecin ? Parce qu'il avait un virus !",
            "Combien de programmeurs faut-il pour changer une ampoule ? Aucun, c'est un problème matériel.",
        ],
    )
}

pub(super) fn greeting(lang: Language) -> String {
    pick_for(
        lang,
        &[
            "Hello! How can I help you today?",
            "Hi there! What can I do for you?",
            "Hey! Ready when you are.",
        ],
        &[
            "Bonjour ! Comment puis-je vous aider aujourd'hui ?",
            "Salut ! Que puis-je faire pour vous ?",
        ],
    )
}

pub(super) fn thanks(lang: Language) -> String {
    pick_for(
        lang,
        &[
            "You're welcome!",
            "Happy to help!",
            "Anytime!",
        ],
        &["Avec plaisir !", "De rien !", "Je vous en prie !"],
    )
}

pub(super) fn how_are_you(lang: Language) -> String {
    pick_for(
        lang,
        &[
            "I'm doing great, thanks for asking! How about you?",
            "All systems running smoothly. How are you?",
        ],
        &[
            "Je vais très bien, merci ! Et vous ?",
            "Tous mes systèmes fonctionnent parfaitement. Et vous ?",
        ],
    )
}

pub(super) fn farewell(lang: Language) -> String {
    pick_for(
        lang,
        &[
            "Goodbye! Have a wonderful day.",
            "See you later! Take care.",
            "Going to sleep now. Call me whenever you need me.",
        ],
        &["Au revoir ! Passez une excellente journée.", "À bientôt ! Prenez soin de vous."],
    )
}

pub(super) fn help(lang: Language) -> &'static str {
    tr(
        lang,
        "I can install software, update your system, run diagnostics, set reminders, send emails, \
         search the web and images, report system information, open websites, tell jokes, discuss topics, \
         switch languages, and manage privacy with incognito mode or by wiping your history. What would you like to do?",
        "Je peux installer des logiciels, mettre à jour le système, faire un diagnostic, créer des rappels, \
         envoyer des courriels, chercher sur le web et des images, donner les informations système, ouvrir des sites, \
         raconter des blagues, discuter d'un sujet, changer de langue, et protéger votre vie privée avec le mode \
         incognito ou l'effacement de l'historique. Que voulez-vous faire ?",
    )
}

/// Generic acknowledgment when nothing matched and no topic recurs.
pub(super) fn not_understood(lang: Language) -> &'static str {
    tr(
        lang,
        "I'm not sure I understood that. Could you rephrase, or ask what I can do?",
        "Je ne suis pas sûr d'avoir compris. Pouvez-vous reformuler, ou me demander ce que je sais faire ?",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_french_languages_use_english_text() {
        assert_eq!(tr(Language::Amharic, "en", "fr"), "en");
        assert_eq!(tr(Language::French, "en", "fr"), "fr");
        assert!(!joke(Language::Chinese).is_empty());
        assert!(!farewell(Language::French).is_empty());
    }
}
