use anstyle::{AnsiColor, Effects, Style};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

impl OutputStyle {
    pub(crate) fn for_terminal(is_terminal: bool) -> Self {
        if is_terminal {
            Self::Rich
        } else {
            Self::Plain
        }
    }
}

/// Error line with the full context chain, e.g.
/// `failed building dependency graph: packages: duplicate package name 'lib'`.
pub(crate) fn render_error(style: OutputStyle, err: &anyhow::Error) -> String {
    let message = format!("{err:#}");
    match style {
        OutputStyle::Plain => format!("error: {message}"),
        OutputStyle::Rich => format!("{} {message}", colorize(error_style(), "[ERR]")),
    }
}

fn error_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
