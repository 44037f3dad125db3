use data::config::theme::Colors;
use iced::widget::{button, container};
use iced::{Border, Color};

pub fn chart_background(colors: &Colors) -> container::Style {
    container::Style {
        background: Some(colors.background.into()),
        text_color: Some(colors.text),
        ..Default::default()
    }
}

pub fn reset_button(colors: &Colors, status: button::Status) -> button::Style {
    let text_color = match status {
        button::Status::Hovered => colors.text,
        button::Status::Pressed => colors.text.scale_alpha(0.6),
        button::Status::Active | button::Status::Disabled => colors.text.scale_alpha(0.8),
    };

    button::Style {
        background: None,
        text_color,
        border: Border {
            radius: 2.0.into(),
            color: Color::TRANSPARENT,
            width: 0.0,
        },
        ..Default::default()
    }
}
