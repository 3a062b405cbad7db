//! Main dashboard application
//!
//! A thin eframe shell: polls the background event fetch, mounts the
//! timeline chart once the snapshot arrives, and surfaces the selected
//! event plus fetch diagnostics in a status bar. A fetch failure leaves
//! the UI in the loading-stalled state with the error shown.

use crate::api::FetchBridge;
use crate::chart::EventsChart;
use crate::config::AppConfig;
use crate::types::Event;
use crossbeam_channel::{unbounded, Receiver};

pub struct DashboardApp {
    bridge: Option<FetchBridge>,
    chart: Option<EventsChart>,
    load_error: Option<String>,
    selected_rx: Receiver<Event>,
    selected: Option<Event>,
    config: AppConfig,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, bridge: FetchBridge, config: AppConfig) -> Self {
        if config.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let (_, selected_rx) = unbounded();
        Self {
            bridge: Some(bridge),
            chart: None,
            load_error: None,
            selected_rx,
            selected: None,
            config,
        }
    }

    /// Mount the chart from a fetched snapshot
    fn mount_chart(&mut self, events: Vec<Event>) {
        let (tx, rx) = unbounded();
        self.selected_rx = rx;
        let callback = Box::new(move |event: &Event| {
            let _ = tx.send(event.clone());
        });

        match EventsChart::new(events, Some(callback), self.config.chart.clone()) {
            Ok(chart) => {
                tracing::info!("Timeline mounted with {} events", chart.events().len());
                self.chart = Some(chart);
            }
            Err(e) => {
                tracing::error!("Failed to mount timeline: {}", e);
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn poll_fetch(&mut self) {
        let Some(bridge) = self.bridge.as_ref() else {
            return;
        };
        let Some(result) = bridge.try_recv() else {
            return;
        };
        self.bridge = None;

        match result {
            Ok(events) if events.is_empty() => {
                self.load_error = Some("backend returned no events".to_string());
            }
            Ok(events) => self.mount_chart(events),
            Err(e) => self.load_error = Some(e.to_string()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        while let Ok(event) = self.selected_rx.try_recv() {
            self.selected = Some(event);
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(error) = &self.load_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                } else if let Some(event) = &self.selected {
                    ui.label(format!(
                        "Selected: {} ({})",
                        event.experiment,
                        if event.is_running() { "running" } else { "finished" }
                    ));
                } else {
                    ui.weak("Click an event to inspect it");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(chart) = self.chart.as_mut() {
                chart.show(ui);
            } else if self.load_error.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading events...");
                    });
                });
                // Keep polling the fetch without user input
                ctx.request_repaint_after(std::time::Duration::from_millis(100));
            }
        });
    }
}
