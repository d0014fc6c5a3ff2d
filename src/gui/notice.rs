//! Notices
//! Transient toasts and the dismissible API error banner.

use egui::{Color32, RichText};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);
const ERROR_RED: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(40, 167, 69);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Destructive,
}

#[derive(Debug, Clone)]
struct Toast {
    title: String,
    description: String,
    kind: ToastKind,
    expires_at: Instant,
}

/// Stack of short-lived messages in the bottom-right corner.
#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, title: &str, description: &str) {
        self.items.push(Toast {
            title: title.to_string(),
            description: description.to_string(),
            kind,
            expires_at: Instant::now() + TOAST_LIFETIME,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| t.expires_at > now);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                for toast in &self.items {
                    let accent = match toast.kind {
                        ToastKind::Info => SUCCESS_GREEN,
                        ToastKind::Destructive => ERROR_RED,
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.5, accent))
                        .show(ui, |ui| {
                            ui.label(RichText::new(&toast.title).strong().color(accent));
                            ui.label(RichText::new(&toast.description).size(12.0));
                        });
                    ui.add_space(6.0);
                }
            });

        // Keep repainting so expiry is noticed without input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Top-level API error banner. Returns true when the user dismissed it.
pub fn show_error_banner(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::none()
        .fill(ERROR_RED.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, ERROR_RED))
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("APIエラー").strong().color(ERROR_RED));
                    ui.label(message);
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✖").clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    dismissed
}
