use planilha_uploader::app::UploaderApp;
use planilha_uploader::config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let app_config = config::load_settings().into_config()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([560.0, 660.0])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Limpador de Planilhas",
        options,
        Box::new(move |_cc| Box::new(UploaderApp::new(app_config))),
    )?;

    Ok(())
}
