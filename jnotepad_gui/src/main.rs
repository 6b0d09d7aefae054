mod actions;
mod app;
mod clipboard_keys;
mod clock;
mod dialogs;
mod editor_view;
mod labels;
mod status_bar;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use eframe::{egui, NativeOptions};
use jnotepad_core::APP_NAME;
use jnotepad_settings::{
    LocalizationManager, LocalizationProvider, PreferencesStore, DEFAULT_PREFERENCES_PATH,
};
use tracing_subscriber::EnvFilter;

use crate::app::JNotepadApp;

/// Directory scanned for extra or overriding locale files.
const LOCALE_OVERRIDES_DIR: &str = "assets/langs";

#[derive(Debug, Parser)]
#[command(name = "jnotepad", version, about = "Tabbed plain-text editor")]
struct Cli {
    /// Files to open in tabs at startup
    files: Vec<PathBuf>,

    /// UI language (en, de, es, it, hr); defaults to the saved preference
    #[arg(long)]
    lang: Option<String>,

    /// Preferences file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let preferences = PreferencesStore::load_or_default(
        cli.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH)),
    );

    let provider = LocalizationProvider::global();
    match LocalizationManager::load_from_dir(LOCALE_OVERRIDES_DIR) {
        Ok(tables) => provider.replace_tables(tables),
        Err(err) => tracing::warn!(%err, "ignoring locale overrides"),
    }
    let language = cli
        .lang
        .clone()
        .unwrap_or_else(|| preferences.preferences().ui.language.clone());
    if let Err(err) = provider.set_language(&language) {
        tracing::warn!(%err, "falling back to the default UI language");
    }

    let window = &preferences.preferences().window;
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([window.width, window.height]),
        ..Default::default()
    };

    tracing::info!(language = %language, files = cli.files.len(), "starting editor");
    let files = cli.files;
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Box::new(JNotepadApp::new(cc, provider, preferences, files))),
    )
    .map_err(|err| anyhow!("editor window failed: {err}"))
}
