//! UI strings in English and Turkish.
//!
//! Every label the shell draws is looked up through a [`LocaleKey`]. Both
//! tables are exhaustive `match`es on the key, so a key without a string in
//! one of the languages does not compile.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Persisted as `"en"` / `"tr"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::En, Self::Tr];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }

    /// The menu entry that selects this language. Each language names
    /// itself, whatever the UI language is.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Tr => "Türkçe",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleKey {
    File,
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Edit,
    Undo,
    Redo,
    Settings,
    Theme,
    LightTheme,
    DarkTheme,
    Language,
    Help,
    About,
    Line,
    Column,
    TotalLines,
    FileSaved,
    AboutText,
    English,
    Turkish,
    NewFile,
    OpenPrompt,
    SavePrompt,
    Error,
    Info,
    Ok,
}

impl LocaleKey {
    pub const ALL: [Self; 29] = [
        Self::File,
        Self::New,
        Self::Open,
        Self::Save,
        Self::SaveAs,
        Self::Exit,
        Self::Edit,
        Self::Undo,
        Self::Redo,
        Self::Settings,
        Self::Theme,
        Self::LightTheme,
        Self::DarkTheme,
        Self::Language,
        Self::Help,
        Self::About,
        Self::Line,
        Self::Column,
        Self::TotalLines,
        Self::FileSaved,
        Self::AboutText,
        Self::English,
        Self::Turkish,
        Self::NewFile,
        Self::OpenPrompt,
        Self::SavePrompt,
        Self::Error,
        Self::Info,
        Self::Ok,
    ];

    /// The key as written in translation files: `save_as`, `total_lines`...
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::New => "new",
            Self::Open => "open",
            Self::Save => "save",
            Self::SaveAs => "save_as",
            Self::Exit => "exit",
            Self::Edit => "edit",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Settings => "settings",
            Self::Theme => "theme",
            Self::LightTheme => "light_theme",
            Self::DarkTheme => "dark_theme",
            Self::Language => "language",
            Self::Help => "help",
            Self::About => "about",
            Self::Line => "line",
            Self::Column => "column",
            Self::TotalLines => "total_lines",
            Self::FileSaved => "file_saved",
            Self::AboutText => "about_text",
            Self::English => "english",
            Self::Turkish => "turkish",
            Self::NewFile => "new_file",
            Self::OpenPrompt => "open_prompt",
            Self::SavePrompt => "save_prompt",
            Self::Error => "error",
            Self::Info => "info",
            Self::Ok => "ok",
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// The string table for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleMap {
    language: Language,
}

impl LocaleMap {
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Total: every key has a string in every table.
    #[must_use]
    pub const fn get(&self, key: LocaleKey) -> &'static str {
        match self.language {
            Language::En => english(key),
            Language::Tr => turkish(key),
        }
    }
}

static EN: LocaleMap = LocaleMap {
    language: Language::En,
};
static TR: LocaleMap = LocaleMap {
    language: Language::Tr,
};

#[must_use]
pub fn strings_for(language: Language) -> &'static LocaleMap {
    match language {
        Language::En => &EN,
        Language::Tr => &TR,
    }
}

const fn english(key: LocaleKey) -> &'static str {
    match key {
        LocaleKey::File => "File",
        LocaleKey::New => "New",
        LocaleKey::Open => "Open",
        LocaleKey::Save => "Save",
        LocaleKey::SaveAs => "Save As",
        LocaleKey::Exit => "Exit",
        LocaleKey::Edit => "Edit",
        LocaleKey::Undo => "Undo",
        LocaleKey::Redo => "Redo",
        LocaleKey::Settings => "Settings",
        LocaleKey::Theme => "Theme",
        LocaleKey::LightTheme => "Light Theme",
        LocaleKey::DarkTheme => "Dark Theme",
        LocaleKey::Language => "Language",
        LocaleKey::Help => "Help",
        LocaleKey::About => "About",
        LocaleKey::Line => "Line",
        LocaleKey::Column => "Column",
        LocaleKey::TotalLines => "Total Lines",
        LocaleKey::FileSaved => "File saved.",
        LocaleKey::AboutText => "Lumine IDE\n\nVersion 1.0\n\nA modern code editor for bright ideas.",
        LocaleKey::English => "English",
        LocaleKey::Turkish => "Türkçe",
        LocaleKey::NewFile => "New File",
        LocaleKey::OpenPrompt => "Open file:",
        LocaleKey::SavePrompt => "Save as:",
        LocaleKey::Error => "Error",
        LocaleKey::Info => "Info",
        LocaleKey::Ok => "OK",
    }
}

const fn turkish(key: LocaleKey) -> &'static str {
    match key {
        LocaleKey::File => "Dosya",
        LocaleKey::New => "Yeni",
        LocaleKey::Open => "Aç",
        LocaleKey::Save => "Kaydet",
        LocaleKey::SaveAs => "Farklı Kaydet",
        LocaleKey::Exit => "Çıkış",
        LocaleKey::Edit => "Düzenle",
        LocaleKey::Undo => "Geri Al",
        LocaleKey::Redo => "İleri Al",
        LocaleKey::Settings => "Ayarlar",
        LocaleKey::Theme => "Tema",
        LocaleKey::LightTheme => "Açık Tema",
        LocaleKey::DarkTheme => "Koyu Tema",
        LocaleKey::Language => "Dil",
        LocaleKey::Help => "Yardım",
        LocaleKey::About => "Hakkında",
        LocaleKey::Line => "Satır",
        LocaleKey::Column => "Sütun",
        LocaleKey::TotalLines => "Toplam Satır",
        LocaleKey::FileSaved => "Dosya kaydedildi.",
        LocaleKey::AboutText => "Lumine IDE\n\nSürüm 1.0\n\nAydınlık fikirler için modern bir kod editörü.",
        LocaleKey::English => "English",
        LocaleKey::Turkish => "Türkçe",
        LocaleKey::NewFile => "Yeni Dosya",
        LocaleKey::OpenPrompt => "Dosya aç:",
        LocaleKey::SavePrompt => "Farklı kaydet:",
        LocaleKey::Error => "Hata",
        LocaleKey::Info => "Bilgi",
        LocaleKey::Ok => "Tamam",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
