// src/gui/components/history_table.rs
//
// Read-only view of the last export.

use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{csv::HEADERS, gui::app::App, model::MatchOutcome};

fn outcome_color(r: MatchOutcome) -> Option<egui::Color32> {
    match r {
        MatchOutcome::Win => Some(egui::Color32::from_rgb(0x4C, 0xAF, 0x50)),
        MatchOutcome::Loss => Some(egui::Color32::from_rgb(0xDC, 0x61, 0x49)),
        MatchOutcome::Unknown => Some(egui::Color32::from_rgb(0xF0, 0xD2, 0x3C)),
        MatchOutcome::Draw | MatchOutcome::Bye => None,
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if let Some(meta) = &app.meta {
        ui.label(RichText::new(format!(
            "{}  ·  GEM ID {}  ·  Elo {}  ·  {} matches",
            meta.name, meta.gem_id, meta.elo_rating, app.rows.len()
        )).strong());
    }

    if app.rows.is_empty() {
        ui.label("No exported history yet.");
        return;
    }

    let show_rating = app.state.gui.show_rating_change;
    let cols = if show_rating { HEADERS.len() } else { HEADERS.len() - 1 };
    let widths = [220.0, 110.0, 60.0, 80.0, 200.0, 70.0, 90.0];

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .min_scrolled_height(0.0);
    for w in widths.iter().take(cols) {
        table = table.column(Column::initial(*w).resizable(true).clip(true).at_least(30.0));
    }

    table
        .header(22.0, |mut header| {
            for h in HEADERS.iter().take(cols) {
                header.col(|ui| { ui.strong(*h); });
            }
        })
        .body(|body| {
            body.rows(20.0, app.rows.len(), |mut row| {
                let Some(r) = app.rows.get(row.index()) else { return; };
                row.col(|ui| { ui.label(&r.event_name); });
                row.col(|ui| { ui.label(&r.event_date); });
                row.col(|ui| { ui.label(r.rated.as_str()); });
                row.col(|ui| { ui.label(&r.round); });
                row.col(|ui| { ui.label(&r.opponent); });
                row.col(|ui| {
                    let mut rt = RichText::new(r.result.as_str());
                    if let Some(c) = outcome_color(r.result) { rt = rt.color(c); }
                    ui.label(rt);
                });
                if show_rating {
                    row.col(|ui| { ui.label(&r.rating_change); });
                }
            });
        });
}
