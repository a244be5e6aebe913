// src/gui/components/export_bar.rs

use eframe::egui;

use crate::{
    gui::{actions, app::App},
    model::RatedStatus,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let running = app.running();

    ui.add_enabled_ui(!running, |ui| {
        let scrape = &mut app.state.options.scrape;
        ui.horizontal(|ui| {
            ui.label("Events without a rating marker:");
            let before = scrape.rated_default;
            ui.selectable_value(&mut scrape.rated_default, RatedStatus::No, "No");
            ui.selectable_value(&mut scrape.rated_default, RatedStatus::Unknown, "Unknown");
            if scrape.rated_default != before {
                logf!("UI: rated_default → {}", scrape.rated_default);
            }

            ui.separator();
            ui.label("Delay (ms):");
            ui.add(egui::DragValue::new(&mut scrape.delay_ms).range(0..=30_000).speed(50));
        });

        let export = &mut app.state.options.export;
        let before_meta = export.include_meta;
        ui.checkbox(&mut export.include_meta, "Player info block (# lines)");
        if export.include_meta != before_meta {
            logf!("UI: include_meta → {}", export.include_meta);
        }
    });

    let mut open_folder_clicked = false;
    let mut reload_clicked = false;
    ui.horizontal(|ui| {
        ui.label("Output:");
        if ui
            .add_enabled(
                !running,
                egui::TextEdit::singleline(&mut app.out_path_text).font(egui::TextStyle::Monospace),
            )
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) → {}", app.out_path_text);
        }

        if ui.button("📁").on_hover_text("Open output folder").clicked() {
            open_folder_clicked = true;
        }
        if ui.button("Reload").on_hover_text("Show the file at the output path").clicked() {
            reload_clicked = true;
        }
        ui.checkbox(&mut app.state.gui.show_rating_change, "Rating change");
    });

    // Handle after the borrows end
    if open_folder_clicked {
        actions::apply_out_path(app);
        actions::open_output_folder(app);
    }
    if reload_clicked {
        actions::apply_out_path(app);
        let path = app.state.options.export.out_path();
        actions::load_export(app, &path);
    }
}
