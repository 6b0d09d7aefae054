use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eframe::{egui, App, CreationContext, Frame};
use egui::{Color32, RichText, ViewportCommand};
use jnotepad_core::line_ops::{convert_case, sort_lines, unique_lines};
use jnotepad_core::{
    Clipboard, DocumentStatistics, EditorError, LineCollator, StatusInfo, TabId, TabSet,
};
use jnotepad_settings::{
    FormLocalization, ListenerId, LocalizationParams, LocalizationProvider, Localize,
    PreferencesStore,
};

use crate::actions::{Action, UI_LANGUAGES};
use crate::clipboard_keys;
use crate::clock::CLOCK_REFRESH;
use crate::dialogs::{self, FileFilters, UnsavedChoice};
use crate::editor_view;
use crate::labels::Labels;
use crate::status_bar::StatusBar;

const MODIFIED_COLOR: Color32 = Color32::from_rgb(220, 38, 38);
const SAVED_COLOR: Color32 = Color32::from_rgb(22, 163, 74);

/// 主視窗。 / The editor main window.
pub struct JNotepadApp {
    provider: Arc<LocalizationProvider>,
    localization: Arc<FormLocalization>,
    labels: Labels,
    status_bar: StatusBar,
    tabs: TabSet,
    clipboard: Clipboard,
    collator: LineCollator,
    language_changed: Arc<AtomicBool>,
    language_listener: ListenerId,
    preferences: PreferencesStore,
    /// Tab whose document selection must be pushed into its widget.
    push_caret: Option<TabId>,
    title: String,
    closing: bool,
}

impl JNotepadApp {
    pub fn new(
        cc: &CreationContext<'_>,
        provider: Arc<LocalizationProvider>,
        preferences: PreferencesStore,
        files: Vec<PathBuf>,
    ) -> Self {
        let localization = Arc::new(FormLocalization::new(provider.clone()));
        localization.window_opened();

        let ctx = cc.egui_ctx.clone();
        let status_bar = StatusBar::new(localization.clone(), move || ctx.request_repaint());

        let language_changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&language_changed);
        let language_listener = localization.add_listener(Arc::new(move || {
            flag.store(true, Ordering::Release);
        }));

        let mut app = Self {
            collator: LineCollator::for_language(&localization.language()),
            labels: Labels::new(localization.clone()),
            provider,
            localization,
            status_bar,
            tabs: TabSet::new(),
            clipboard: Clipboard::new(),
            language_changed,
            language_listener,
            preferences,
            push_caret: None,
            title: String::new(),
            closing: false,
        };
        for path in files {
            app.open_path(&path);
        }
        app
    }

    fn text(&self, key: &str) -> String {
        self.localization.text(key)
    }

    fn format(&self, key: &str, values: &[&str]) -> String {
        self.localization
            .text_with_params(key, &LocalizationParams::new(values))
    }

    fn filters(&self) -> (String, String) {
        (self.text("filter.text_files"), self.text("filter.all_files"))
    }

    fn is_enabled(&self, action: Action) -> bool {
        if action.requires_selection() {
            self.tabs
                .active()
                .map_or(false, |tab| tab.buffer().has_selection())
        } else if action.requires_document() {
            self.tabs.active().is_some()
        } else {
            true
        }
    }

    fn refresh_after_language_change(&mut self) {
        if !self.language_changed.swap(false, Ordering::AcqRel) {
            return;
        }
        let language = self.localization.language();
        self.collator = LineCollator::for_language(&language);
        tracing::debug!(%language, "rebuilt line collator");
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let title = self.tabs.window_title(&self.labels.text("tab.new_file"));
        if title != self.title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn take_clipboard_events(ctx: &egui::Context) -> Vec<Action> {
        ctx.input_mut(|input| clipboard_keys::take_clipboard_events(&mut input.events))
    }

    fn take_shortcuts(ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();
        for (action, shortcut) in Action::by_shortcut_priority() {
            if matches!(action, Action::Copy | Action::Cut | Action::Paste) {
                continue;
            }
            if ctx.input_mut(|input| input.consume_shortcut(&shortcut)) {
                actions.push(action);
            }
        }
        actions
    }

    fn execute(&mut self, ctx: &egui::Context, action: Action) {
        if !self.is_enabled(action) {
            return;
        }
        tracing::debug!(?action, "executing action");
        match action {
            Action::New => {
                self.tabs.new_untitled();
            }
            Action::Open => self.open(),
            Action::Save => {
                if let Some(id) = self.tabs.active_id() {
                    self.save(id);
                }
            }
            Action::SaveAs => {
                if let Some(id) = self.tabs.active_id() {
                    self.save_as(id);
                }
            }
            Action::Close => {
                if let Some(id) = self.tabs.active_id() {
                    self.close_tab(id);
                }
            }
            Action::Exit => {
                if self.confirm_exit() {
                    self.shutdown(ctx);
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            }
            Action::Statistics => self.show_statistics(),
            Action::Copy | Action::Cut | Action::Paste => {
                let outcome = clipboard_keys::apply(action, &mut self.tabs, &mut self.clipboard);
                if let Some(text) = outcome.mirror {
                    ctx.output_mut(|output| output.copied_text = text);
                }
                self.after_edit(outcome.edit);
            }
            Action::Case(transform) => {
                let result = self.tabs.active_mut().map(|tab| {
                    (tab.id(), tab.edit(|buffer| convert_case(buffer, transform)))
                });
                self.after_edit(result);
            }
            Action::Sort(order) => {
                let collator = &self.collator;
                let result = self.tabs.active_mut().map(|tab| {
                    (tab.id(), tab.edit(|buffer| sort_lines(buffer, order, collator)))
                });
                self.after_edit(result);
            }
            Action::Unique => {
                let result = self
                    .tabs
                    .active_mut()
                    .map(|tab| (tab.id(), tab.edit(unique_lines)));
                self.after_edit(result);
            }
            Action::Language(language) => self.switch_language(language.code),
        }
    }

    fn after_edit(&mut self, result: Option<(TabId, Result<bool, EditorError>)>) {
        match result {
            Some((id, Ok(_))) => self.push_caret = Some(id),
            Some((_, Err(err))) => tracing::warn!(%err, "edit rejected"),
            None => {}
        }
    }

    fn switch_language(&mut self, code: &str) {
        if let Err(err) = self.provider.set_language(code) {
            tracing::warn!(%err, "cannot switch UI language");
            return;
        }
        if let Err(err) = self
            .preferences
            .update(|prefs| prefs.ui.language = code.to_string())
        {
            tracing::warn!(%err, "failed to persist UI language");
        }
    }

    fn open(&mut self) {
        let (text_files, all_files) = self.filters();
        let filters = FileFilters {
            text_files: &text_files,
            all_files: &all_files,
        };
        if let Some(path) = dialogs::pick_file_to_open(&self.text("dialog.open_file"), &filters) {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        match self.tabs.open(path) {
            Ok(id) => tracing::info!(path = %path.display(), tab = id.0, "opened document"),
            Err(err) => {
                tracing::error!(%err, "failed to open document");
                let display = path.display().to_string();
                dialogs::show_error(
                    &self.text("dialog.error"),
                    &self.format("message.reading_error", &[display.as_str()]),
                );
            }
        }
    }

    /// Saves tab `id`; untitled tabs go through Save As. Returns whether the
    /// document ended up on disk.
    fn save(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tabs.get_mut(id) else {
            return false;
        };
        if tab.path().is_none() {
            return self.save_as(id);
        }
        let result = tab.save();
        self.report_save(result)
    }

    fn save_as(&mut self, id: TabId) -> bool {
        let (text_files, all_files) = self.filters();
        let filters = FileFilters {
            text_files: &text_files,
            all_files: &all_files,
        };
        let current = self
            .tabs
            .get(id)
            .and_then(|tab| tab.path().map(Path::to_path_buf));
        let Some(target) =
            dialogs::pick_save_target(&self.text("dialog.save_file_as"), &filters, current.as_deref())
        else {
            dialogs::show_warning(&self.text("dialog.warning"), &self.text("message.save_cancelled"));
            return false;
        };

        if target.exists()
            && current.as_deref() != Some(target.as_path())
            && !dialogs::confirm_overwrite(
                &self.text("dialog.overwrite"),
                &self.text("message.file_exists"),
            )
        {
            return false;
        }

        let Some(tab) = self.tabs.get_mut(id) else {
            return false;
        };
        let result = tab.save_as(&target);
        self.report_save(result)
    }

    fn report_save(&self, result: Result<(), jnotepad_core::DocumentError>) -> bool {
        match result {
            Ok(()) => {
                dialogs::show_info(&self.text("dialog.info"), &self.text("message.save_success"));
                true
            }
            Err(err) => {
                tracing::error!(%err, "failed to save document");
                dialogs::show_error(&self.text("dialog.error"), &self.text("message.save_failure"));
                false
            }
        }
    }

    /// Asks what to do with unsaved changes in tab `id`. Returns false when
    /// the caller should stop.
    fn resolve_unsaved(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tabs.get(id) else {
            return true;
        };
        if !tab.is_dirty() {
            return true;
        }
        let name = tab.title(&self.labels.text("tab.new_file"));
        self.tabs.activate(id);
        let choice = dialogs::ask_unsaved(
            &self.text("dialog.unsaved"),
            &self.format("message.file_not_saved", &[name.as_str()]),
        );
        match choice {
            UnsavedChoice::Save => self.save(id),
            UnsavedChoice::Discard => true,
            UnsavedChoice::Cancel => false,
        }
    }

    fn close_tab(&mut self, id: TabId) {
        if self.resolve_unsaved(id) {
            if let Some(tab) = self.tabs.remove(id) {
                tracing::debug!(tab = tab.id().0, "closed tab");
            }
        }
    }

    /// Every tab with unsaved changes is asked about, in tab order.
    fn confirm_exit(&mut self) -> bool {
        self.tabs
            .dirty_tabs()
            .into_iter()
            .all(|id| self.resolve_unsaved(id))
    }

    fn shutdown(&mut self, ctx: &egui::Context) {
        self.closing = true;
        self.localization.window_closed();
        if let Some(rect) = ctx.input(|input| input.viewport().inner_rect) {
            let size = rect.size();
            if let Err(err) = self.preferences.update(|prefs| {
                prefs.window.width = size.x;
                prefs.window.height = size.y;
            }) {
                tracing::warn!(%err, "failed to persist window size");
            }
        }
        tracing::info!("editor window closed");
    }

    fn show_statistics(&self) {
        let Some(tab) = self.tabs.active() else {
            return;
        };
        let stats = DocumentStatistics::of(tab.text());
        let counted = |key: &str, count: usize| {
            self.localization
                .text_with_params(key, &LocalizationParams::count_only(count as u64))
        };
        let characters = counted("stat.characters", stats.characters);
        let non_blank = counted("stat.non_blank", stats.non_blank);
        let lines = counted("stat.lines", stats.lines);
        let message = self.format(
            "stat.message",
            &[characters.as_str(), non_blank.as_str(), lines.as_str()],
        );
        dialogs::show_info(&self.labels.name(Action::Statistics), &message);
    }

    fn action_button(&self, ui: &mut egui::Ui, action: Action, pending: &mut Vec<Action>) {
        let mut button = egui::Button::new(self.labels.name(action));
        if let Some(shortcut) = action.shortcut() {
            button = button.shortcut_text(ui.ctx().format_shortcut(&shortcut));
        }
        let response = ui
            .add_enabled(self.is_enabled(action), button)
            .on_hover_text(self.labels.description(action));
        if response.clicked() {
            pending.push(action);
            ui.close_menu();
        }
    }

    fn show_menu_bar(&self, ctx: &egui::Context, pending: &mut Vec<Action>) {
        egui::TopBottomPanel::top("menu_bar")
            .resizable(false)
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button(self.labels.text("menu.file"), |ui| {
                        for action in Action::FILE_MENU {
                            if action == Action::Exit {
                                ui.separator();
                            }
                            self.action_button(ui, action, pending);
                        }
                    });
                    ui.menu_button(self.labels.text("menu.edit"), |ui| {
                        for action in Action::EDIT_MENU {
                            self.action_button(ui, action, pending);
                        }
                    });
                    ui.menu_button(self.labels.text("menu.languages"), |ui| {
                        let current = self.localization.language();
                        for language in UI_LANGUAGES {
                            let action = Action::Language(language);
                            let button = egui::Button::new(self.labels.name(action))
                                .selected(language.code == current);
                            let button = match action.shortcut() {
                                Some(shortcut) => {
                                    button.shortcut_text(ui.ctx().format_shortcut(&shortcut))
                                }
                                None => button,
                            };
                            if ui
                                .add(button)
                                .on_hover_text(self.labels.description(action))
                                .clicked()
                            {
                                pending.push(action);
                                ui.close_menu();
                            }
                        }
                    });
                    ui.menu_button(self.labels.text("menu.tools"), |ui| {
                        for action in Action::CASE_TOOLS {
                            self.action_button(ui, action, pending);
                        }
                        ui.menu_button(self.labels.text("menu.sort"), |ui| {
                            for action in Action::SORT_TOOLS {
                                self.action_button(ui, action, pending);
                            }
                        });
                    });
                });
            });
    }

    fn show_toolbar(&self, ctx: &egui::Context, pending: &mut Vec<Action>) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for action in Action::TOOLBAR {
                        if matches!(action, Action::Copy | Action::Statistics) {
                            ui.separator();
                        }
                        let response = ui
                            .add_enabled(
                                self.is_enabled(action),
                                egui::Button::new(self.labels.name(action)),
                            )
                            .on_hover_text(self.labels.description(action));
                        if response.clicked() {
                            pending.push(action);
                        }
                    }
                })
                .response
                .on_hover_text(self.labels.text("toolbar.title"));
            });
    }

    fn show_tab_strip(&mut self, ctx: &egui::Context, pending_close: &mut Option<TabId>) {
        if self.tabs.is_empty() {
            return;
        }
        let untitled = self.labels.text("tab.new_file");
        let active = self.tabs.active_id();
        let entries: Vec<(TabId, String, bool, Option<String>)> = self
            .tabs
            .iter()
            .map(|tab| (tab.id(), tab.title(&untitled), tab.is_dirty(), tab.tooltip()))
            .collect();

        egui::TopBottomPanel::top("tab_strip")
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::horizontal().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for (id, title, dirty, tooltip) in entries {
                            let color = if dirty { MODIFIED_COLOR } else { SAVED_COLOR };
                            ui.label(RichText::new("●").color(color));
                            let response = ui.selectable_label(active == Some(id), title);
                            let response = match tooltip {
                                Some(path) => response.on_hover_text(path),
                                None => response,
                            };
                            if response.clicked() && active != Some(id) {
                                self.tabs.activate(id);
                                self.push_caret = Some(id);
                            }
                            let close = egui::Button::new(RichText::new("✕").small()).frame(false);
                            if ui
                                .add(close)
                                .on_hover_text(self.labels.name(Action::Close))
                                .clicked()
                            {
                                *pending_close = Some(id);
                            }
                            ui.add_space(6.0);
                        }
                    });
                });
            });
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(tab) = self.tabs.active_mut() else {
                return;
            };
            let push_caret = self.push_caret == Some(tab.id());
            editor_view::show(ui, tab, push_caret);
            if push_caret {
                self.push_caret = None;
            }
        });
    }
}

impl App for JNotepadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if ctx.input(|input| input.viewport().close_requested()) && !self.closing {
            if self.confirm_exit() {
                self.shutdown(ctx);
            } else {
                ctx.send_viewport_cmd(ViewportCommand::CancelClose);
            }
        }

        let mut pending = Self::take_clipboard_events(ctx);
        pending.extend(Self::take_shortcuts(ctx));
        self.refresh_after_language_change();

        self.show_menu_bar(ctx, &mut pending);
        self.show_toolbar(ctx, &mut pending);
        let mut pending_close = None;
        self.show_tab_strip(ctx, &mut pending_close);

        let info = self
            .tabs
            .active()
            .map(|tab| StatusInfo::of(tab.buffer()))
            .unwrap_or_default();
        self.status_bar.show(ctx, info);
        self.show_editor(ctx);

        if let Some(id) = pending_close {
            self.close_tab(id);
        }
        for action in pending {
            self.execute(ctx, action);
        }
        self.refresh_after_language_change();
        self.update_title(ctx);
        ctx.request_repaint_after(CLOCK_REFRESH);
    }
}

impl Drop for JNotepadApp {
    fn drop(&mut self) {
        self.localization.remove_listener(self.language_listener);
    }
}
