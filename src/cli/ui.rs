use crate::core::currency::CurrencyRole;
use crate::core::schedule::PaletteRole;
use crate::core::theme::Theme;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for numbers.
pub fn number_cell(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// Colour used for a currency's figures.
pub fn currency_color(role: &CurrencyRole) -> Color {
    match role {
        CurrencyRole::Ringgit => Color::Green,
        CurrencyRole::Yen => Color::Blue,
        CurrencyRole::Tenge => Color::Magenta,
        CurrencyRole::Other(_) => Color::Grey,
    }
}

/// Cell showing an amount in the currency's colour and precision.
pub fn amount_cell(amount: f64, currency: &str) -> Cell {
    let role = CurrencyRole::from(currency);
    number_cell(role.format_amount(amount)).fg(currency_color(&role))
}

/// Terminal colour for a palette slot of the active theme.
pub fn palette_color(theme: Theme, role: PaletteRole) -> Color {
    let (r, g, b) = match (theme, role) {
        (Theme::Autumn, PaletteRole::Background) => (92, 64, 51),
        (Theme::Autumn, PaletteRole::Text) => (250, 235, 215),
        (Theme::Autumn, PaletteRole::Primary) => (214, 104, 41),
        (Theme::Autumn, PaletteRole::Secondary) => (205, 133, 63),
        (Theme::Autumn, PaletteRole::Accent) => (178, 34, 34),
        (Theme::Winter, PaletteRole::Background) => (70, 90, 120),
        (Theme::Winter, PaletteRole::Text) => (230, 240, 250),
        (Theme::Winter, PaletteRole::Primary) => (100, 149, 237),
        (Theme::Winter, PaletteRole::Secondary) => (176, 196, 222),
        (Theme::Winter, PaletteRole::Accent) => (70, 130, 180),
        (Theme::Spring, PaletteRole::Background) => (85, 107, 47),
        (Theme::Spring, PaletteRole::Text) => (250, 245, 250),
        (Theme::Spring, PaletteRole::Primary) => (255, 143, 171),
        (Theme::Spring, PaletteRole::Secondary) => (152, 205, 120),
        (Theme::Spring, PaletteRole::Accent) => (219, 112, 147),
        (Theme::Summer, PaletteRole::Background) => (0, 105, 120),
        (Theme::Summer, PaletteRole::Text) => (255, 250, 230),
        (Theme::Summer, PaletteRole::Primary) => (255, 193, 7),
        (Theme::Summer, PaletteRole::Secondary) => (0, 150, 136),
        (Theme::Summer, PaletteRole::Accent) => (255, 87, 34),
    };
    Color::Rgb { r, g, b }
}

/// Creates a spinner shown while waiting on a remote data source.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
