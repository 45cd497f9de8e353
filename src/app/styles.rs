//! Style roles for terminal output.
//!
//! Each logical role maps to an optional `colored::Color`. Coloring is applied
//! only when the caller passes `enabled = true`, so there is no global state.
//!
//! ```
//! use reposcan::app::styles::StyleRole;
//! assert_eq!(StyleRole::Header.paint("Title", false), "Title");
//! assert!(StyleRole::Header.paint("Title", true).starts_with("\x1b[33m"));
//! ```

use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    }
}

style! {
    Header  => Some(Color::Yellow),
    Key     => Some(Color::BrightGreen),
    Value   => None,
    Valid   => Some(Color::Green),
    Invalid => Some(Color::Red),
    Dim     => Some(Color::BrightBlack),
}

impl StyleRole {
    /// Wrap `text` in the role's ANSI color when enabled
    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.color().filter(|_| enabled).and_then(ansi_code) {
            Some(code) => format!("\x1b[{}m{}\x1b[0m", code, text),
            None => text.to_string(),
        }
    }

    /// prettytable style spec (`Fy`, `FG`, ...) for the role's foreground color
    pub fn to_prettytable_spec(self) -> Option<&'static str> {
        let spec = match self.color()? {
            Color::Red => "Fr",
            Color::Green => "Fg",
            Color::Yellow => "Fy",
            Color::Blue => "Fb",
            Color::BrightBlack => "FK",
            Color::BrightGreen => "FG",
            _ => return None,
        };
        Some(spec)
    }
}

fn ansi_code(color: Color) -> Option<&'static str> {
    match color {
        Color::Red => Some("31"),
        Color::Green => Some("32"),
        Color::Yellow => Some("33"),
        Color::Blue => Some("34"),
        Color::BrightBlack => Some("90"),
        Color::BrightGreen => Some("92"),
        _ => None,
    }
}
