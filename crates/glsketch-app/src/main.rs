//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: glsketch <script.json>");
        glsketch_app::ShortcutRegistry::print_all();
        std::process::exit(2);
    };

    log::info!("Starting glsketch");
    match pollster::block_on(glsketch_app::run_script_file(std::path::Path::new(&path))) {
        Ok(file_name) => log::info!("Exported {file_name}"),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
