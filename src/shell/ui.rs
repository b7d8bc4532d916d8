use egui::{Align2, Color32, RichText};

use super::apology::{ApologyDialog, Choice, DialogState, MessageLength, DIALOG_TITLE};
use super::login::{Credentials, LoginGate};
use super::playlist::Transport;

const ROSE: Color32 = Color32::from_rgb(236, 72, 153);
const PLUM: Color32 = Color32::from_rgb(147, 51, 234);

/// What the host should do after a shell frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    None,
    LoggedIn,
    LoggedOut,
}

/// Immediate-mode overlay over the shell state machines
pub struct ShellUi {
    gate: LoginGate,
    dialog: ApologyDialog,
    transport: Transport,
    username: String,
    password: String,
}

impl ShellUi {
    pub fn new(credentials: Credentials, transport: Transport) -> Self {
        Self {
            gate: LoginGate::new(credentials),
            dialog: ApologyDialog::new(),
            transport,
            username: String::new(),
            password: String::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.gate.is_logged_in()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> ShellEvent {
        if !self.gate.is_logged_in() {
            return self.login_window(ctx);
        }

        let mut event = ShellEvent::None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.3);
                    ui.label(RichText::new("Sorry").size(96.0).strong().color(ROSE));
                    ui.add_space(12.0);
                    if ui.button("Open my message 💌").clicked() {
                        self.dialog.open();
                    }
                    if ui.small_button("Log out").clicked() {
                        self.gate.logout();
                        self.dialog.close();
                        event = ShellEvent::LoggedOut;
                    }
                });
            });

        self.dialog_window(ctx);
        self.transport_panel(ctx);
        event
    }

    fn login_window(&mut self, ctx: &egui::Context) -> ShellEvent {
        let mut event = ShellEvent::None;
        egui::Window::new("Login")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add(egui::TextEdit::singleline(&mut self.username).hint_text("Username"));
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.password)
                        .password(true)
                        .hint_text("Password"),
                );
                if let Some(error) = self.gate.error() {
                    ui.label(RichText::new(error).color(Color32::RED).small());
                }

                let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("Log In").clicked() || submitted)
                    && self.gate.submit(&self.username, &self.password)
                {
                    self.password.clear();
                    event = ShellEvent::LoggedIn;
                }
            });
        event
    }

    fn dialog_window(&mut self, ctx: &egui::Context) {
        let state = self.dialog.state();
        if state == DialogState::Closed {
            return;
        }

        let mut open = true;
        egui::Window::new(RichText::new(DIALOG_TITLE).color(ROSE))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(420.0);
                if let Some(message) = self.dialog.message() {
                    ui.label(RichText::new(message).size(18.0));
                }
                ui.add_space(8.0);

                match state {
                    DialogState::Opened(MessageLength::Long) => {
                        if ui.button("View Short Msg").clicked() {
                            self.dialog.show_short();
                        }
                    }
                    DialogState::Opened(MessageLength::Short) => {
                        ui.horizontal(|ui| {
                            if ui.button("Yes, I forgive you! ❤️").clicked() {
                                self.dialog.answer(Choice::Forgiven);
                            }
                            if ui.button("I can't forgive you 💔").clicked() {
                                self.dialog.answer(Choice::NotForgiven);
                            }
                        });
                    }
                    DialogState::Answered(choice) => {
                        ui.label(RichText::new(choice.media()).monospace().color(PLUM));
                        if ui.button("Close").clicked() {
                            self.dialog.close();
                        }
                    }
                    DialogState::Closed => {}
                }
            });

        if !open {
            self.dialog.close();
        }
    }

    fn transport_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("transport").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("Now Playing: {}", self.transport.current().title))
                        .color(ROSE),
                );
                ui.horizontal(|ui| {
                    if ui.button("⏮").on_hover_text("Previous Song").clicked() {
                        self.transport.previous();
                    }
                    let label = if self.transport.is_playing() { "⏸" } else { "▶" };
                    if ui.button(label).clicked() {
                        self.transport.play_pause();
                    }
                    if ui.button("⏭").on_hover_text("Next Song").clicked() {
                        self.transport.next();
                    }
                });
            });
        });
    }
}
