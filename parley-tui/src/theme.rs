use ratatui::style::{Color, Modifier, Style};

pub trait Theme: Send + Sync {
    fn name(&self) -> &'static str;

    fn background(&self) -> Color;
    fn foreground(&self) -> Color;
    fn foreground_dim(&self) -> Color;

    fn surface(&self) -> Color;
    fn border(&self) -> Color;

    fn accent(&self) -> Color;
    fn user_bubble(&self) -> Color;

    fn warning(&self) -> Color;
    fn error(&self) -> Color;
}

pub struct Dark;

impl Theme for Dark {
    fn name(&self) -> &'static str {
        "dark"
    }

    fn background(&self) -> Color {
        hex_to_color(0x1a1b26)
    }

    fn foreground(&self) -> Color {
        hex_to_color(0xc0caf5)
    }

    fn foreground_dim(&self) -> Color {
        hex_to_color(0x565f89)
    }

    fn surface(&self) -> Color {
        hex_to_color(0x24283b)
    }

    fn border(&self) -> Color {
        hex_to_color(0x414868)
    }

    fn accent(&self) -> Color {
        hex_to_color(0xbb9af7)
    }

    fn user_bubble(&self) -> Color {
        hex_to_color(0x7dcfff)
    }

    fn warning(&self) -> Color {
        hex_to_color(0xe0af68)
    }

    fn error(&self) -> Color {
        hex_to_color(0xf7768e)
    }
}

pub struct Light;

impl Theme for Light {
    fn name(&self) -> &'static str {
        "light"
    }

    fn background(&self) -> Color {
        hex_to_color(0xeff1f5)
    }

    fn foreground(&self) -> Color {
        hex_to_color(0x4c4f69)
    }

    fn foreground_dim(&self) -> Color {
        hex_to_color(0x9ca0b0)
    }

    fn surface(&self) -> Color {
        hex_to_color(0xe6e9ef)
    }

    fn border(&self) -> Color {
        hex_to_color(0xbcc0cc)
    }

    fn accent(&self) -> Color {
        hex_to_color(0x8839ef)
    }

    fn user_bubble(&self) -> Color {
        hex_to_color(0x1e66f5)
    }

    fn warning(&self) -> Color {
        hex_to_color(0xdf8e1d)
    }

    fn error(&self) -> Color {
        hex_to_color(0xd20f39)
    }
}

/// Binary light/dark switch. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn theme(self) -> &'static dyn Theme {
        match self {
            ThemeMode::Dark => &Dark,
            ThemeMode::Light => &Light,
        }
    }
}

pub fn hex_to_color(hex: u32) -> Color {
    let r = ((hex >> 16) & 0xFF) as u8;
    let g = ((hex >> 8) & 0xFF) as u8;
    let b = (hex & 0xFF) as u8;
    Color::Rgb(r, g, b)
}

pub struct ThemedStyles<'a> {
    theme: &'a dyn Theme,
}

impl<'a> ThemedStyles<'a> {
    pub fn new(theme: &'a dyn Theme) -> Self {
        Self { theme }
    }

    pub fn base(&self) -> Style {
        Style::default()
            .bg(self.theme.background())
            .fg(self.theme.foreground())
    }

    pub fn surface(&self) -> Style {
        Style::default()
            .bg(self.theme.surface())
            .fg(self.theme.foreground())
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.theme.border())
    }

    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.theme.foreground_dim())
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.theme.foreground())
    }

    pub fn user(&self) -> Style {
        Style::default()
            .fg(self.theme.user_bubble())
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.theme.warning())
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.theme.error())
    }

    pub fn error_bold(&self) -> Style {
        Style::default()
            .fg(self.theme.error())
            .add_modifier(Modifier::BOLD)
    }

    pub fn keybind(&self) -> Style {
        Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD)
    }
}
