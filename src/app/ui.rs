use eframe::egui::{self, Align, RichText};

use super::{SessionStatus, UploaderApp};
use crate::config::DeploymentMode;
use crate::utils::file_size;

const TABLE_HEADERS: [&str; 7] = [
    "Nota",
    "Descrição",
    "Transportadora",
    "Frete",
    "Prazo",
    "Imposto",
    "Alíquota",
];

impl UploaderApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Limpador de Planilhas");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Envie uma planilha .xlsx para limpeza")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_file_picker(ui);

                    ui.add_space(10.0);
                    self.render_options(ui);

                    ui.add_space(20.0);
                    self.render_submit(ui);

                    ui.add_space(20.0);
                    self.render_progress(ui);

                    if self.config.mode == DeploymentMode::Table {
                        ui.add_space(10.0);
                        self.render_table(ui);
                    }

                    if let Some(path) = &self.state.last_saved {
                        ui.add_space(10.0);
                        ui.vertical_centered(|ui| {
                            ui.weak(format!("Último arquivo salvo: {}", path.display()));
                        });
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });
    }

    fn render_file_picker(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📁 Escolher arquivo").clicked() {
                    self.pick_file();
                }
                ui.label(self.state.file_label());
                if let Some(file) = &self.state.selected {
                    ui.weak(file_size::format_size(file.size));
                }
            });
        });
    }

    fn render_options(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Opções de limpeza");
            ui.add_space(5.0);
            ui.checkbox(&mut self.options.minusculo, "Converter para minúsculas");
            ui.checkbox(
                &mut self.options.remover_especiais,
                "Remover caracteres especiais",
            );
            ui.horizontal(|ui| {
                ui.label("Caracteres:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.options.caracteres)
                        .desired_width(ui.available_width())
                        .font(egui::TextStyle::Monospace),
                );
            });
        });
    }

    fn render_submit(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let can_submit = self.state.can_submit() && self.state.selected.is_some();
            ui.add_enabled_ui(can_submit, |ui| {
                let button = egui::Button::new("📤 Enviar").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.submit();
                }
            });
        });
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if !self.state.progress_visible() {
            return;
        }

        ui.group(|ui| {
            if let Some(session) = &self.state.session {
                let status_text = match session.status {
                    SessionStatus::Pending => "📤 Enviando",
                    SessionStatus::Success => "✅ Concluído",
                    SessionStatus::Error => "❌ Falhou",
                };
                ui.label(format!("{}: {}", status_text, session.file_name));
            }

            let fill = if self.state.done_fill() {
                self.config.theme.progress_done
            } else {
                self.config.theme.progress_fill
            };
            let progress_bar = egui::ProgressBar::new(self.state.bar_fraction())
                .animate(false)
                .fill(fill);
            ui.add(progress_bar);

            ui.label(format!("{}%", self.state.percent()));
        });
    }

    fn render_table(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            egui::Grid::new("result_rows")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for column in TABLE_HEADERS {
                        ui.label(RichText::new(column).strong());
                    }
                    ui.end_row();

                    for row in &self.state.rows {
                        ui.label(&row.nota);
                        ui.label(&row.descricao);
                        ui.label(&row.transportadora);
                        ui.label(&row.frete);
                        ui.label(&row.prazo);
                        ui.label(&row.imposto);
                        ui.label(&row.aliquota);
                        ui.end_row();
                    }
                });

            if self.state.rows.is_empty() {
                ui.weak("Nenhum resultado ainda");
            }
        });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let footer_width = 300.0;
            let indent = (ui.available_width() - footer_width) / 2.0;
            ui.add_space(indent);
            ui.scope(|ui| {
                ui.set_width(footer_width);
                ui.horizontal_centered(|ui| {
                    ui.label("Servidor:");
                    if ui.link(self.config.endpoint.as_str()).clicked() {
                        if let Err(err) = open::that(self.config.endpoint.as_str()) {
                            log::warn!("could not open browser: {err}");
                        }
                    }
                });
            });
        });
    }
}
