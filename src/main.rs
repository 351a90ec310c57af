use std::path::PathBuf;
use std::{env, io};

use sketchpad::app::Sketchpad;
use sketchpad::kernel::services::adapters::{import_project, ConfigService, FilePreviewHost};
use sketchpad::kernel::{Action, AppState};
use sketchpad::models::ResourceStore;

mod logging;

const DEFAULT_OUT_DIR: &str = "preview";

fn usage() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "usage: sketchpad <project_dir> [out_dir]",
    )
}

fn run(project_dir: PathBuf, out_dir: PathBuf) -> io::Result<()> {
    let config = ConfigService::load().into_config();
    let mut resources = ResourceStore::new();
    let imported = import_project(&project_dir, &config, &mut resources)?;
    for path in &imported.skipped {
        tracing::warn!(path = %path.display(), "skipped unsupported file");
    }

    let state = AppState::from_tree(imported.tree, resources, config);
    let host = FilePreviewHost::new(&out_dir);
    let mut app = Sketchpad::new(state, Box::new(host))?;
    app.dispatch(Action::Run)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    println!("{}", out_dir.join("index.html").display());
    Ok(())
}

fn main() -> io::Result<()> {
    let mut args = env::args().skip(1);
    let project_dir = PathBuf::from(args.next().ok_or_else(usage)?);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| project_dir.join(DEFAULT_OUT_DIR));

    let logging = logging::init();
    let result = run(project_dir, out_dir);
    if let Err(e) = &result {
        tracing::error!(error = %e, "sketchpad failed");
        if let Some(guard) = &logging {
            eprintln!("sketchpad: {} (logs: {})", e, guard.log_dir().display());
        }
    }
    result
}
