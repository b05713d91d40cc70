use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the font database used to shape badge labels.
///
/// System fonts are loaded first, then every `.ttf`/`.otf`/`.ttc` file directly inside each of
/// `font_dirs`. Missing or unreadable directories are skipped. The database is immutable once
/// built and shared by every compositing call of a generator.
pub fn build_fontdb(font_dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    for dir in font_dirs {
        load_fonts_from_dir(&mut db, dir);
    }

    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable, skipping");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
        }
    }
}
