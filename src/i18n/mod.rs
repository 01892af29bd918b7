// src/i18n/mod.rs  -  Multi-language string tables
use std::collections::HashMap;

/// All user-visible strings referenced by key
pub trait Lang: Send + Sync {
    fn get<'a>(&self, key: &'a str) -> &'a str;
    fn name(&self) -> &str;
    /// Voice hint handed to the speech command
    fn voice(&self) -> &str;
}

/// Language codes with a table, in the order the UI cycles through them
pub const LANGUAGES: [&str; 4] = ["en", "de", "fr", "it"];

/// Central i18n registry
pub struct I18n {
    inner: Box<dyn Lang>,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let inner: Box<dyn Lang> = match lang {
            "de" => Box::new(De::new()),
            "fr" => Box::new(Fr::new()),
            "it" => Box::new(It::new()),
            _    => Box::new(En::new()),
        };
        Self { inner }
    }
    /// Translation for `key`; unknown keys come back unchanged
    pub fn t<'a>(&self, key: &'a str) -> &'a str { self.inner.get(key) }
    pub fn lang_name(&self) -> &str    { self.inner.name() }
    pub fn voice(&self) -> &str        { self.inner.voice() }
}

// ── Helper macro ──────────────────────────────────────────────────────────────
macro_rules! lang_map {
    ($name:ident, $display:literal, $voice:literal, [ $( $k:literal => $v:literal ),* $(,)? ]) => {
        pub struct $name(HashMap<&'static str, &'static str>);
        impl $name {
            pub fn new() -> Self {
                let mut m = HashMap::new();
                $( m.insert($k, $v); )*
                Self(m)
            }
        }
        impl Lang for $name {
            fn get<'a>(&self, key: &'a str) -> &'a str {
                self.0.get(key).copied().unwrap_or_else(|| {
                    log::debug!("[i18n] missing key {key:?} in {}", $display);
                    key
                })
            }
            fn name(&self) -> &str { $display }
            fn voice(&self) -> &str { $voice }
        }
    };
}
// ── English ───────────────────────────────────────────────────────────────────
lang_map!(En, "English", "en", [
    "app.title"          => "Call Sign Trainer",
    "pre_call_speech"    => "Attention, new call sign",
    "new_round"          => "New round",
    "new_call"           => "Listen for the next call sign",
    "playing"            => "Playing",
    "paused"             => "Paused",
    "solution"           => "Solution",
    "press_start"        => "Press S to start",
    "error_loading"      => "Could not load the call-sign list",
    "test_morse"         => "Test transmission",
    "label.quiz"         => "Quiz",
    "label.history"      => "Solutions",
    "label.status"       => "Status",
    "mode.auto"          => "auto",
    "mode.manual"        => "manual",
    "label.setting"      => "Setting",
    "hint.idle"          => "S = start   A = auto/manual   +/- = speed   Tab = setting   ←/→ = change   Q = quit",
    "hint.auto"          => "S = stop   P = pause/resume   A = manual   +/- = speed   Tab = setting   ←/→ = change   Q = quit",
    "hint.manual"        => "S = stop   N = next   P = pause/resume   A = auto   +/- = speed   Tab = setting   ←/→ = change   Q = quit",
    "setting.wpm"            => "Speed",
    "setting.farnsworth_wpm" => "Farnsworth speed",
    "setting.min_frequency"  => "Lowest tone",
    "setting.max_frequency"  => "Highest tone",
    "setting.noise"          => "Noise",
    "setting.noise_level"    => "Noise level",
    "setting.qsb"            => "QSB depth",
    "setting.qrm"            => "QRM level",
    "setting.repeat_count"   => "Repeats",
    "setting.pause"          => "Pause",
    "setting.call_delay"     => "Call delay",
    "setting.morse_delay"    => "Noise lead-in",
    "setting.solution_delay" => "Solution delay",
    "setting.pre_call"       => "Announcement",
    "setting.category"       => "Call-sign pool",
    "setting.language"       => "Language",
    "setting.auto_mode"      => "Auto mode",
]);

// ── German ────────────────────────────────────────────────────────────────────
lang_map!(De, "Deutsch", "de", [
    "app.title"          => "Rufzeichentrainer",
    "pre_call_speech"    => "Achtung, neues Rufzeichen",
    "new_round"          => "Neue Runde",
    "new_call"           => "Achtung, gleich kommt das nächste Rufzeichen",
    "playing"            => "Wiedergabe",
    "paused"             => "Pausiert",
    "solution"           => "Lösung",
    "press_start"        => "S drücken zum Starten",
    "error_loading"      => "Rufzeichenliste konnte nicht geladen werden",
    "test_morse"         => "Testaussendung",
    "label.quiz"         => "Quiz",
    "label.history"      => "Lösungen",
    "label.status"       => "Status",
    "mode.auto"          => "automatisch",
    "mode.manual"        => "manuell",
    "label.setting"      => "Einstellung",
    "hint.idle"          => "S = Start   A = auto/manuell   +/- = Tempo   Tab = Einstellung   ←/→ = ändern   Q = Ende",
    "hint.auto"          => "S = Stopp   P = Pause/weiter   A = manuell   +/- = Tempo   Tab = Einstellung   ←/→ = ändern   Q = Ende",
    "hint.manual"        => "S = Stopp   N = weiter   P = Pause/weiter   A = auto   +/- = Tempo   Tab = Einstellung   ←/→ = ändern   Q = Ende",
    "setting.wpm"            => "Tempo",
    "setting.farnsworth_wpm" => "Farnsworth-Tempo",
    "setting.min_frequency"  => "Tiefster Ton",
    "setting.max_frequency"  => "Höchster Ton",
    "setting.noise"          => "Rauschen",
    "setting.noise_level"    => "Rauschpegel",
    "setting.qsb"            => "QSB-Tiefe",
    "setting.qrm"            => "QRM-Pegel",
    "setting.repeat_count"   => "Wiederholungen",
    "setting.pause"          => "Pause",
    "setting.call_delay"     => "Verzögerung vor Rufzeichen",
    "setting.morse_delay"    => "Rauschvorlauf",
    "setting.solution_delay" => "Verzögerung vor Lösung",
    "setting.pre_call"       => "Ankündigung",
    "setting.category"       => "Rufzeichenauswahl",
    "setting.language"       => "Sprache",
    "setting.auto_mode"      => "Automatikmodus",
]);

// ── French ────────────────────────────────────────────────────────────────────
lang_map!(Fr, "Français", "fr", [
    "app.title"          => "Entraîneur d'indicatifs",
    "pre_call_speech"    => "Attention, nouvel indicatif",
    "new_round"          => "Nouveau tour",
    "new_call"           => "Écoutez le prochain indicatif",
    "playing"            => "Lecture",
    "paused"             => "En pause",
    "solution"           => "Solution",
    "press_start"        => "Appuyez sur S pour commencer",
    "error_loading"      => "Impossible de charger la liste d'indicatifs",
    "test_morse"         => "Émission de test",
    "label.quiz"         => "Quiz",
    "label.history"      => "Solutions",
    "label.status"       => "Statut",
    "mode.auto"          => "auto",
    "mode.manual"        => "manuel",
    "label.setting"      => "Réglage",
    "hint.idle"          => "S = démarrer   A = auto/manuel   +/- = vitesse   Tab = réglage   ←/→ = modifier   Q = quitter",
    "hint.auto"          => "S = arrêter   P = pause/reprise   A = manuel   +/- = vitesse   Tab = réglage   ←/→ = modifier   Q = quitter",
    "hint.manual"        => "S = arrêter   N = suivant   P = pause/reprise   A = auto   +/- = vitesse   Tab = réglage   ←/→ = modifier   Q = quitter",
    "setting.wpm"            => "Vitesse",
    "setting.farnsworth_wpm" => "Vitesse Farnsworth",
    "setting.min_frequency"  => "Tonalité la plus basse",
    "setting.max_frequency"  => "Tonalité la plus haute",
    "setting.noise"          => "Bruit",
    "setting.noise_level"    => "Niveau de bruit",
    "setting.qsb"            => "Profondeur QSB",
    "setting.qrm"            => "Niveau QRM",
    "setting.repeat_count"   => "Répétitions",
    "setting.pause"          => "Pause entre envois",
    "setting.call_delay"     => "Délai avant l'indicatif",
    "setting.morse_delay"    => "Bruit avant l'envoi",
    "setting.solution_delay" => "Délai avant la solution",
    "setting.pre_call"       => "Annonce",
    "setting.category"       => "Catégorie d'indicatifs",
    "setting.language"       => "Langue",
    "setting.auto_mode"      => "Mode automatique",
]);

// ── Italian ───────────────────────────────────────────────────────────────────
lang_map!(It, "Italiano", "it", [
    "app.title"          => "Allenatore di nominativi",
    "pre_call_speech"    => "Attenzione, nuovo nominativo",
    "new_round"          => "Nuovo turno",
    "new_call"           => "Ascolta il prossimo nominativo",
    "playing"            => "Riproduzione",
    "paused"             => "In pausa",
    "solution"           => "Soluzione",
    "press_start"        => "Premi S per iniziare",
    "error_loading"      => "Impossibile caricare l'elenco dei nominativi",
    "test_morse"         => "Trasmissione di prova",
    "label.quiz"         => "Quiz",
    "label.history"      => "Soluzioni",
    "label.status"       => "Stato",
    "mode.auto"          => "automatico",
    "mode.manual"        => "manuale",
    "label.setting"      => "Impostazione",
    "hint.idle"          => "S = avvia   A = auto/manuale   +/- = velocità   Tab = impostazione   ←/→ = cambia   Q = esci",
    "hint.auto"          => "S = ferma   P = pausa/riprendi   A = manuale   +/- = velocità   Tab = impostazione   ←/→ = cambia   Q = esci",
    "hint.manual"        => "S = ferma   N = avanti   P = pausa/riprendi   A = auto   +/- = velocità   Tab = impostazione   ←/→ = cambia   Q = esci",
    "setting.wpm"            => "Velocità",
    "setting.farnsworth_wpm" => "Velocità Farnsworth",
    "setting.min_frequency"  => "Tono più basso",
    "setting.max_frequency"  => "Tono più alto",
    "setting.noise"          => "Rumore",
    "setting.noise_level"    => "Livello del rumore",
    "setting.qsb"            => "Profondità QSB",
    "setting.qrm"            => "Livello QRM",
    "setting.repeat_count"   => "Ripetizioni",
    "setting.pause"          => "Pausa",
    "setting.call_delay"     => "Ritardo prima del nominativo",
    "setting.morse_delay"    => "Rumore prima dell'invio",
    "setting.solution_delay" => "Ritardo prima della soluzione",
    "setting.pre_call"       => "Annuncio",
    "setting.category"       => "Categoria di nominativi",
    "setting.language"       => "Lingua",
    "setting.auto_mode"      => "Modalità automatica",
]);
