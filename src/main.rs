use iced::time::Instant;
use iced::widget::{column, container, scrollable, text, text_editor, Column};
use iced::{Alignment, Color, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod color;
mod compose;
mod error;
mod export;
mod photo;
mod state;
mod ui;

use compose::{StripLayout, StripStyle, Typesetter};
use export::DownloadTarget;
use state::data::PhotoStatus;
use state::filter::StripFilter;
use state::strip::PhotoStripState;
use ui::controls::ControlValues;
use ui::fade::FadeIn;

/// The strip as currently mounted in the window
struct MountedStrip {
    /// Snapshot source for exports
    layout: StripLayout,
    /// Rasterized preview shown on screen
    preview: iced::widget::image::Handle,
}

/// Main application state
struct Photobooth {
    state: PhotoStripState,
    style: StripStyle,
    typesetter: Typesetter,
    /// Editor buffer behind the caption
    caption: text_editor::Content,
    mounted: Option<MountedStrip>,
    fade: FadeIn,
    /// Last frame time, drives the fade
    now: Instant,
    color_picker_open: bool,
    /// Last completed download, shown under the strip
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Upload Photos"
    UploadPhotos,
    /// Background decode finished for a selection generation
    PhotosLoaded(u64, Vec<PhotoStatus>),
    OpenColorPicker,
    CancelColorPicker,
    StripColorPicked(Color),
    StripColorTyped(String),
    FilterSelected(StripFilter),
    CaptionEdited(text_editor::Action),
    /// User clicked "Download Strip"
    DownloadStrip,
    /// Background export finished (path of the written file, if any)
    ExportFinished(Result<Option<PathBuf>, String>),
    /// Animation frame while the preview fades in
    Frame(Instant),
}

impl Photobooth {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let style = StripStyle::load();
        let typesetter = Typesetter::system(style.font_size);
        if !typesetter.has_font() {
            log::warn!("⚠️  No system font found, captions will be laid out but not drawn");
        }

        let mut state = PhotoStripState::new();
        state.set_filter(style.filter);
        log::info!("🎞️  Photobooth ready, dated {}", state.captured_date());

        let mut app = Photobooth {
            state,
            style,
            typesetter,
            caption: text_editor::Content::new(),
            mounted: None,
            fade: FadeIn::default(),
            now: Instant::now(),
            color_picker_open: false,
            status: String::new(),
        };
        app.remount();

        (app, Task::none())
    }

    /// Re-derive the layout and preview from the current state
    fn remount(&mut self) {
        let layout = StripLayout::derive(&self.state, &self.style, &self.typesetter);
        let bitmap = compose::rasterize(&layout);
        let (width, height) = bitmap.dimensions();
        let preview = iced::widget::image::Handle::from_rgba(width, height, bitmap.into_raw());

        self.mounted = Some(MountedStrip { layout, preview });
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadPhotos => {
                let extensions = photo::loader::IMAGE_EXTENSIONS;
                let Some(paths) = FileDialog::new()
                    .set_title("Upload Photos")
                    .add_filter("Images", &extensions[..])
                    .pick_files()
                else {
                    // Dialog cancelled: keep the current selection
                    return Task::none();
                };

                let was_empty = self.state.images().is_empty();
                let generation = self.state.select_images(paths.clone());

                if was_empty && !paths.is_empty() {
                    self.now = Instant::now();
                    self.fade.start(self.now);
                }
                self.remount();

                Task::perform(
                    photo::loader::load_photos(paths, self.style.photo_width),
                    move |results| Message::PhotosLoaded(generation, results),
                )
            }
            Message::PhotosLoaded(generation, results) => {
                if self.state.attach_loaded(generation, results) {
                    self.remount();
                }
                Task::none()
            }
            Message::OpenColorPicker => {
                self.color_picker_open = true;
                Task::none()
            }
            Message::CancelColorPicker => {
                self.color_picker_open = false;
                Task::none()
            }
            Message::StripColorPicked(picked) => {
                self.color_picker_open = false;
                self.state.set_strip_color(color::to_hex(picked));
                self.remount();
                Task::none()
            }
            Message::StripColorTyped(value) => {
                self.state.set_strip_color(value);
                self.remount();
                Task::none()
            }
            Message::FilterSelected(filter) => {
                self.state.set_filter(filter);
                self.remount();
                Task::none()
            }
            Message::CaptionEdited(action) => {
                let is_edit = action.is_edit();
                self.caption.perform(action);

                if is_edit {
                    self.state.set_caption(self.caption.text());
                    self.remount();
                }
                Task::none()
            }
            Message::DownloadStrip => {
                let snapshot = self.mounted.as_ref().map(|mounted| mounted.layout.clone());
                let target = DownloadTarget::user_downloads(self.style.file_name.clone());

                Task::perform(
                    async move {
                        export::export_strip(snapshot, target)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::ExportFinished,
                )
            }
            Message::ExportFinished(result) => {
                match result {
                    Ok(Some(path)) => {
                        self.status = format!("Saved {}", path.display());
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Export failures degrade silently for the user
                        log::warn!("⚠️  Export failed: {}", e);
                    }
                }
                Task::none()
            }
            Message::Frame(now) => {
                self.now = now;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let controls = ui::controls::controls(ControlValues {
            strip_color: self.state.strip_color(),
            filter: self.state.filter(),
            picker_open: self.color_picker_open,
        });

        let caption = text_editor(&self.caption)
            .placeholder("Add a vintage description...")
            .on_action(Message::CaptionEdited)
            .height(96);

        let mut content: Column<Message> = column![
            text("Vintage Photobooth").size(36),
            controls,
            container(caption).max_width(512),
            text(format!("Date: {}", self.state.captured_date()))
                .size(18)
                .color(Color::from_rgb8(75, 85, 99)),
        ]
        .spacing(24)
        .padding(24)
        .align_x(Alignment::Center);

        if let Some(mounted) = &self.mounted {
            content = content.push(
                iced::widget::image(mounted.preview.clone()).opacity(self.fade.opacity(self.now)),
            );
        }

        if !self.status.is_empty() {
            content = content.push(text(&self.status).size(14));
        }

        scrollable(container(content).width(Length::Fill).center_x(Length::Fill))
            .height(Length::Fill)
            .into()
    }

    /// Drive animation frames only while the preview is fading in
    fn subscription(&self) -> Subscription<Message> {
        if self.fade.is_running(self.now) {
            iced::window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("vintage_photobooth=info"),
    )
    .init();

    iced::application("Vintage Photobooth", Photobooth::update, Photobooth::view)
        .subscription(Photobooth::subscription)
        .theme(Photobooth::theme)
        .centered()
        .run_with(Photobooth::new)
}
