// src/gui/components/run_bar.rs
//
// Profile field, the SCRAPE HISTORY trigger, resume/reset for a stored run,
// and the status line.

use eframe::egui::{self, widgets::Spinner};

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let running = app.running();

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("Profile:");
        ui.add_enabled(
            !running,
            egui::TextEdit::singleline(&mut app.state.gui.profile_url)
                .desired_width(420.0)
                .font(egui::TextStyle::Monospace),
        );

        let trigger = ui.add_enabled(!running, egui::Button::new("SCRAPE HISTORY"));
        if trigger.clicked() {
            actions::scrape(app, ui.ctx());
        }
    });

    if app.stored_in_progress && !running {
        ui.horizontal(|ui| {
            ui.label(format!("Unfinished run ({} events stored). Resume at:", app.stored_events));
            if app.resume_url.is_empty() {
                app.resume_url = app.state.options.scrape.history_url();
            }
            ui.add(
                egui::TextEdit::singleline(&mut app.resume_url)
                    .desired_width(320.0)
                    .font(egui::TextStyle::Monospace),
            );
            if ui.button("Resume").clicked() {
                actions::resume(app, ui.ctx());
            }
            if ui.button("Discard").on_hover_text("Forget the stored run").clicked() {
                actions::reset(app);
            }
        });
    }

    ui.horizontal(|ui| {
        if running {
            ui.add(Spinner::new());
        }
        ui.label(app.status_text());
    });
    ui.add_space(4.0);
}
