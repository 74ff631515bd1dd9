//! The strip controls row
//!
//! Strip color, photo upload, filter and the download button. The row
//! wraps onto several lines when the window is narrow.

use iced::widget::{button, pick_list, row, text, text_input};
use iced::{Alignment, Background, Border, Color, Element, Pixels, Theme};
use iced_aw::{ColorPicker, Wrap};

use crate::color;
use crate::state::filter::StripFilter;
use crate::Message;

/// Current values the controls display
#[derive(Debug, Clone, Copy)]
pub struct ControlValues<'a> {
    pub strip_color: &'a str,
    pub filter: StripFilter,
    pub picker_open: bool,
}

pub fn controls(values: ControlValues<'_>) -> Element<'_, Message> {
    let swatch_color = color::to_iced(values.strip_color);
    let swatch = button(text(""))
        .width(40)
        .height(40)
        .on_press(Message::OpenColorPicker)
        .style(move |_theme: &Theme, _status| button::Style {
            background: Some(Background::Color(swatch_color)),
            border: Border {
                color: Color::from_rgb8(209, 213, 219),
                width: 1.0,
                radius: 20.0.into(),
            },
            ..button::Style::default()
        });

    let picker = ColorPicker::new(
        values.picker_open,
        swatch_color,
        swatch,
        Message::CancelColorPicker,
        Message::StripColorPicked,
    );

    let strip_color = row![
        text("Strip Color"),
        picker,
        text_input("#000000", values.strip_color)
            .on_input(Message::StripColorTyped)
            .width(96),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let upload = row![
        text("Upload Photos"),
        button(text("Choose files...")).on_press(Message::UploadPhotos).padding(8),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let filter = row![
        text("Filter"),
        pick_list(StripFilter::ALL, Some(values.filter), Message::FilterSelected).padding(8),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let download = button(text("Download Strip").color(Color::WHITE))
        .on_press(Message::DownloadStrip)
        .padding([8, 16])
        .style(|_theme: &Theme, status| {
            let shade = match status {
                button::Status::Hovered | button::Status::Pressed => 0.12,
                _ => 0.0,
            };
            button::Style {
                background: Some(Background::Color(Color::from_rgb(shade, shade, shade))),
                text_color: Color::WHITE,
                border: Border {
                    radius: 4.0.into(),
                    ..Border::default()
                },
                ..button::Style::default()
            }
        });

    Wrap::with_elements(vec![
        strip_color.into(),
        upload.into(),
        filter.into(),
        download.into(),
    ])
    .spacing(Pixels(16.0))
    .line_spacing(Pixels(16.0))
    .into()
}
