use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eframe::egui;
use egui::{Align, Layout};
use jnotepad_core::StatusInfo;
use jnotepad_settings::{ListenerId, LocalizationParams, Localize};

use crate::clock::Clock;

/// 狀態列：長度、游標位置與時鐘。 / Status bar: document length, caret position and the clock.
///
/// Formatted texts are cached and rebuilt when the caret moves or the UI
/// language changes.
pub struct StatusBar {
    localization: Arc<dyn Localize>,
    listener: ListenerId,
    stale: Arc<AtomicBool>,
    shown: Option<StatusInfo>,
    length_text: String,
    caret_text: String,
    clock: Clock,
}

impl StatusBar {
    /// `repaint` is invoked after every language change.
    pub fn new<F>(localization: Arc<dyn Localize>, repaint: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let stale = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&stale);
        let listener = localization.add_listener(Arc::new(move || {
            flag.store(true, Ordering::Release);
            repaint();
        }));
        Self {
            localization,
            listener,
            stale,
            shown: None,
            length_text: String::new(),
            caret_text: String::new(),
            clock: Clock::new(),
        }
    }

    /// 取得狀態列文字。 / Length and caret texts for `info`.
    pub fn texts(&mut self, info: StatusInfo) -> (&str, &str) {
        let language_changed = self.stale.swap(false, Ordering::AcqRel);
        if language_changed || self.shown != Some(info) {
            let length = info.length.to_string();
            self.length_text = self
                .localization
                .text_with_params("status.length", &LocalizationParams::new(&[length.as_str()]));
            let line = info.line.to_string();
            let column = info.column.to_string();
            let selection = info.selection.to_string();
            self.caret_text = self.localization.text_with_params(
                "status.caret",
                &LocalizationParams::new(&[line.as_str(), column.as_str(), selection.as_str()]),
            );
            self.shown = Some(info);
        }
        (&self.length_text, &self.caret_text)
    }

    pub fn show(&mut self, ctx: &egui::Context, info: StatusInfo) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.columns(3, |columns| {
                    let (length, caret) = self.texts(info);
                    columns[0].label(length);
                    columns[1].label(caret);
                    columns[2].with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.clock.tick());
                    });
                });
            });
    }
}

impl Drop for StatusBar {
    fn drop(&mut self) {
        self.localization.remove_listener(self.listener);
    }
}
