use clap::Parser;
use stl_tui::tui::state::ViewerSession;
use stl_tui::tui::ui::{run, shutdown, startup};
use tracing::Level;

/// Shaded ASCII viewer for STL and OBJ meshes
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Mesh file to display (.stl or .obj)
    path: std::path::PathBuf,

    /// Initial zoom in percent
    #[arg(long, default_value_t = 100.0)]
    zoom: f32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Warnings and above only, on stderr: the alternate screen owns stdout
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let mut session = ViewerSession::open(&cli.path)?;
    session.set_zoom(cli.zoom);

    startup()?;
    let result = run(session);
    shutdown()?;
    result?;
    Ok(())
}
