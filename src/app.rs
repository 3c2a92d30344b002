use std::sync::Arc;

use eframe::CreationContext;
use eframe::egui::{
    self, Align, Button, Color32, ColorImage, Frame, Label, Layout, Margin, Rect, RichText, Sense,
    Stroke, TextureHandle, TextureOptions, ViewportCommand, vec2,
};

use crate::chrome::{WindowChrome, WindowGeometry};
use crate::settings::AppSettings;
use crate::state::{Gallery, PreviewSequence};
use crate::theme::{self, Palette};
use crate::unsplash::PhotoSource;
use crate::worker::{Worker, WorkerEvent};

pub const APP_TITLE: &str = "SplashPaper";
pub const LOADING_TEXT: &str = "Loading wallpapers...";
pub const FETCH_ERROR_TEXT: &str = "Error fetching wallpapers.";
const EMPTY_BATCH_TEXT: &str = "No wallpapers returned.";

const TITLE_BAR_HEIGHT: f32 = 32.0;
const CHROME_BUTTON_SIZE: [f32; 2] = [46.0, 32.0];

/// What the preview pane currently shows.
enum Preview {
    Text(String),
    Image {
        texture: TextureHandle,
        pixels: [usize; 2],
    },
}

pub struct SplashPaperApp {
    settings: AppSettings,
    palette: Palette,
    gallery: Gallery,
    chrome: WindowChrome,
    worker: Worker,
    preview: Preview,
    sequence: PreviewSequence,
    preview_loading: bool,
    /// Pane size in physical pixels as of the last frame.
    pane_bounds: [u32; 2],
    applying: bool,
    status: String,
}

impl SplashPaperApp {
    pub fn new(
        cc: &CreationContext<'_>,
        settings: AppSettings,
        source: Arc<dyn PhotoSource>,
    ) -> Self {
        let system_dark = cc
            .integration_info
            .system_theme
            .map(|theme| theme == eframe::Theme::Dark);
        let palette = Palette::resolve(settings.theme, system_dark);
        theme::apply_theme(&cc.egui_ctx, &palette);

        let app = Self::with_source(cc.egui_ctx.clone(), settings, palette, source);
        app.worker.fetch_batch(app.settings.batch_size);
        app
    }

    fn with_source(
        ctx: egui::Context,
        settings: AppSettings,
        palette: Palette,
        source: Arc<dyn PhotoSource>,
    ) -> Self {
        Self {
            settings,
            palette,
            gallery: Gallery::new(),
            chrome: WindowChrome::new(),
            worker: Worker::new(source, ctx),
            preview: Preview::Text(LOADING_TEXT.to_string()),
            sequence: PreviewSequence::default(),
            preview_loading: false,
            pane_bounds: [0, 0],
            applying: false,
            status: String::new(),
        }
    }

    pub fn show_next(&mut self) {
        if self.gallery.show_next() {
            self.render_current();
        }
    }

    pub fn show_previous(&mut self) {
        if self.gallery.show_previous() {
            self.render_current();
        }
    }

    /// Fetch the preview image of the current photo at the current pane size.
    fn render_current(&mut self) {
        let Some(photo) = self.gallery.current() else {
            return;
        };
        let url = photo.urls.regular.clone();
        log::debug!(
            "rendering photo {} ({}/{})",
            photo.id.as_deref().unwrap_or("?"),
            self.gallery.cursor() + 1,
            self.gallery.len()
        );
        let ticket = self.sequence.issue();
        self.preview_loading = true;
        self.worker.load_preview(ticket, url, self.pane_bounds);
    }

    pub fn apply_current_as_wallpaper(&mut self) {
        if self.applying {
            return;
        }
        let Some(url) = self.gallery.current().map(|photo| photo.urls.full.clone()) else {
            return;
        };
        self.applying = true;
        self.status = "Setting wallpaper...".to_string();
        self.worker
            .apply_wallpaper(url, self.settings.wallpaper_path());
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        let mut events = Vec::new();
        self.worker.drain_events(&mut events);
        for event in events {
            self.handle_event(ctx, event);
        }
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: WorkerEvent) {
        match event {
            WorkerEvent::BatchLoaded(photos) => {
                self.gallery.replace(photos);
                if self.gallery.is_empty() {
                    self.preview = Preview::Text(EMPTY_BATCH_TEXT.to_string());
                } else {
                    self.status = format!("Loaded {} wallpapers.", self.gallery.len());
                    self.render_current();
                }
            }
            WorkerEvent::BatchFailed(error) => {
                self.preview = Preview::Text(FETCH_ERROR_TEXT.to_string());
                self.status = error;
            }
            WorkerEvent::PreviewReady { ticket, image } => {
                if !self.sequence.is_current(ticket) {
                    log::debug!("dropping stale preview #{ticket}");
                    return;
                }
                self.preview_loading = false;
                let pixels = [image.width as usize, image.height as usize];
                let color_image = ColorImage::from_rgba_unmultiplied(pixels, &image.rgba);
                let texture = ctx.load_texture("preview", color_image, TextureOptions::LINEAR);
                self.preview = Preview::Image { texture, pixels };
            }
            WorkerEvent::PreviewFailed { ticket, error } => {
                if !self.sequence.is_current(ticket) {
                    log::debug!("dropping stale preview error #{ticket}");
                    return;
                }
                self.preview_loading = false;
                self.preview = Preview::Text(format!("Error loading image: {error}"));
            }
            WorkerEvent::WallpaperApplied(path) => {
                self.applying = false;
                self.status = "Wallpaper updated.".to_string();
                log::debug!("wallpaper bitmap at {}", path.display());
            }
            WorkerEvent::WallpaperFailed(error) => {
                self.applying = false;
                self.status = format!("Failed to set wallpaper: {error}");
            }
        }
    }

    fn toggle_maximize(&mut self, ctx: &egui::Context) {
        let (outer, inner, monitor) = ctx.input(|i| {
            let viewport = i.viewport();
            (viewport.outer_rect, viewport.inner_rect, viewport.monitor_size)
        });
        let current = outer.zip(inner).map(|(outer, inner)| WindowGeometry {
            position: outer.min,
            size: inner.size(),
        });
        let screen = monitor.unwrap_or_else(|| ctx.screen_rect().size());
        if let Some(geometry) = self.chrome.toggle_maximize(current, screen) {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(geometry.position));
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(geometry.size));
        }
    }

    fn title_bar(&mut self, ctx: &egui::Context) {
        let palette = self.palette;
        let frame = Frame::none()
            .fill(palette.surface)
            .inner_margin(Margin::symmetric(10.0, 0.0));
        egui::TopBottomPanel::top("title_bar")
            .exact_height(TITLE_BAR_HEIGHT)
            .frame(frame)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(RichText::new(APP_TITLE).size(13.0).color(palette.text));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if chrome_button(ui, "🗙", palette.close_hover).clicked() {
                            ctx.send_viewport_cmd(ViewportCommand::Close);
                        }
                        let glyph = self.chrome.toggle_glyph();
                        if chrome_button(ui, glyph, palette.button_hover).clicked() {
                            self.toggle_maximize(ctx);
                        }

                        let grip = ui.allocate_response(ui.available_size(), Sense::click());
                        let pressed = ui.input(|i| i.pointer.primary_pressed());
                        if grip.hovered() && pressed && self.chrome.can_drag() {
                            ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                        }
                    });
                });
            });
    }

    fn control_bar(&mut self, ctx: &egui::Context) {
        let palette = self.palette;
        let frame = Frame::none()
            .fill(palette.surface)
            .stroke(Stroke::new(1.0, palette.border))
            .inner_margin(Margin::same(10.0))
            .outer_margin(Margin {
                left: 10.0,
                right: 10.0,
                top: 0.0,
                bottom: 10.0,
            });
        egui::TopBottomPanel::bottom("controls")
            .frame(frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let nav = vec2(100.0, 32.0);
                    if ui.add(Button::new("Previous").min_size(nav)).clicked() {
                        self.show_previous();
                    }
                    if ui.add(Button::new("Next").min_size(nav)).clicked() {
                        self.show_next();
                    }
                    let apply = Button::new("Set as Wallpaper").min_size(vec2(140.0, 32.0));
                    if ui.add_enabled(!self.applying, apply).clicked() {
                        self.apply_current_as_wallpaper();
                    }
                    if self.applying || self.preview_loading {
                        ui.spinner();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if !self.gallery.is_empty() {
                            ui.label(
                                RichText::new(format!(
                                    "{} / {}",
                                    self.gallery.cursor() + 1,
                                    self.gallery.len()
                                ))
                                .color(palette.text_secondary),
                            );
                        }
                        if let Some(credit) = self.gallery.current().and_then(|p| p.credit()) {
                            ui.label(RichText::new(credit).color(palette.text_secondary));
                        }
                        if !self.status.is_empty() {
                            ui.add(
                                Label::new(
                                    RichText::new(&self.status).color(palette.text_secondary),
                                )
                                .truncate(true),
                            );
                        }
                    });
                });
            });
    }

    fn preview_pane(&mut self, ctx: &egui::Context) {
        let palette = self.palette;
        let frame = Frame::none()
            .fill(palette.background)
            .inner_margin(Margin::same(10.0));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
            ui.painter()
                .rect(rect, 0.0, palette.card, Stroke::new(1.0, palette.border));
            let inner = rect.shrink(1.0);

            let ppp = ctx.pixels_per_point();
            let bounds = [
                (inner.width() * ppp).round().max(0.0) as u32,
                (inner.height() * ppp).round().max(0.0) as u32,
            ];
            if bounds != self.pane_bounds {
                self.pane_bounds = bounds;
                self.render_current();
            }

            match &self.preview {
                Preview::Image { texture, pixels } => {
                    let size = vec2(pixels[0] as f32 / ppp, pixels[1] as f32 / ppp);
                    let target = Rect::from_center_size(inner.center(), size);
                    let response = ui.put(target, egui::Image::new((texture.id(), size)));
                    if let Some(alt) = self
                        .gallery
                        .current()
                        .and_then(|photo| photo.alt_description.as_deref())
                    {
                        response.on_hover_text(alt);
                    }
                }
                Preview::Text(text) => {
                    ui.put(
                        inner,
                        Label::new(RichText::new(text).color(palette.text)).wrap(true),
                    );
                }
            }
        });
    }
}

/// Flat title-bar button that fills with `hover` under the pointer.
fn chrome_button(ui: &mut egui::Ui, glyph: &str, hover: Color32) -> egui::Response {
    ui.scope(|ui| {
        let widgets = &mut ui.visuals_mut().widgets;
        widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
        widgets.inactive.bg_stroke = Stroke::NONE;
        widgets.hovered.weak_bg_fill = hover;
        widgets.hovered.bg_stroke = Stroke::NONE;
        widgets.active.weak_bg_fill = hover;
        widgets.active.bg_stroke = Stroke::NONE;
        ui.add(Button::new(RichText::new(glyph).size(12.0)).min_size(CHROME_BUTTON_SIZE.into()))
    })
    .inner
}

impl eframe::App for SplashPaperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.title_bar(ctx);
        self.control_bar(ctx);
        self.preview_pane(ctx);
    }
}
