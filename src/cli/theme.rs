use super::ui;
use crate::core::theme::{THEMES, Theme, ThemeStore};
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;
use tracing::info;

pub fn render_themes(current: Theme) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell(""), ui::header_cell("Theme")]);
    for theme in THEMES {
        let (icon, label) = theme.display_info();
        let marker = if theme == current { "✓" } else { "" };
        let mut cell = Cell::new(format!("{icon} {label}"));
        if theme == current {
            cell = cell.add_attribute(comfy_table::Attribute::Bold);
        }
        table.add_row(vec![Cell::new(marker), cell]);
    }
    format!("{}\n\n{}", ui::style_text("Themes", ui::StyleType::Title), table)
}

/// Shows the available themes, or switches to `name` and persists it.
pub fn run<P: AsRef<Path>>(theme_path: P, name: Option<&str>) -> Result<()> {
    let store = ThemeStore::open(theme_path);

    let Some(name) = name else {
        println!("{}", render_themes(store.current()));
        return Ok(());
    };

    let theme: Theme = name.parse()?;
    let mut changes = store.subscribe();
    store.set(theme)?;
    if changes.has_changed().unwrap_or(false) {
        let (icon, label) = changes.borrow_and_update().display_info();
        info!("Theme switched to {}", label);
        println!("Theme set to {icon} {label}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_marks_current() {
        let output = render_themes(Theme::Spring);
        assert!(output.contains("🌸 Spring"));
        assert!(output.contains("✓"));
        assert_eq!(output.matches('✓').count(), 1);
    }

    #[test]
    fn test_run_persists_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("theme.yaml");

        run(&path, Some("Winter")).unwrap();
        assert_eq!(ThemeStore::open(&path).current(), Theme::Winter);

        let err = run(&path, Some("monsoon")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid theme: monsoon");
        assert_eq!(ThemeStore::open(&path).current(), Theme::Winter);

        run(&path, None).unwrap();
    }
}
