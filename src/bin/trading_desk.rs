// src/bin/trading_desk.rs

use clap::Parser;
use eframe::egui;
use egui::{Color32, RichText, Stroke};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::{error, info};
use stock_tutor::config::CURRENCY;
use stock_tutor::{SessionConfig, TradingSession, from_cents, stocks};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Practice buying stocks against a simulated order book")]
struct Args {
    /// JSON file overriding the session defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,
}

/// The desk owns the session; every widget event turns into one session call.
struct TradingDesk {
    session: TradingSession,
    chosen_ticker: String,
    // The last pick that failed, so it is not retried every frame.
    failed_ticker: Option<String>,
    limit_price: f64,
    volume: u64,
    // Last order outcome and whether it succeeded.
    status: Option<(String, bool)>,
}

impl eframe::App for TradingDesk {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let chosen = Some(self.chosen_ticker.as_str());
        if self.session.selected_instrument() != chosen && self.failed_ticker.as_deref() != chosen {
            self.select(self.chosen_ticker.clone());
        }

        // --- Account sidebar ---
        egui::SidePanel::left("account_panel").min_width(220.0).show(ctx, |ui| {
            ui.heading("ISK account");
            let account = self.session.account();
            ui.label(format!("Account ID: {}", account.id));
            ui.label(format!("Balance: {:.2} {}", account.balance_sek(), CURRENCY));
            ui.separator();

            egui::ComboBox::from_label("Select a stock")
                .selected_text(self.chosen_ticker.clone())
                .show_ui(ui, |ui| {
                    for stock in stocks::universe() {
                        ui.selectable_value(&mut self.chosen_ticker, stock.ticker.clone(), stock.ticker.as_str());
                    }
                });
            ui.separator();

            ui.heading("Portfolio");
            let valuation = self.session.valuation();
            if valuation.rows.is_empty() {
                ui.label("No shares bought yet!");
            } else {
                egui::Grid::new("portfolio_grid").striped(true).show(ui, |ui| {
                    ui.label(RichText::new("Stock").underline());
                    ui.label(RichText::new("Shares").underline());
                    ui.label(RichText::new("Last").underline());
                    ui.label(RichText::new("Value").underline());
                    ui.end_row();
                    for row in &valuation.rows {
                        ui.label(row.instrument.as_str());
                        ui.label(row.shares.to_string());
                        ui.label(format!("{:.2}", row.latest_price));
                        ui.label(format!("{:.2}", row.value));
                        ui.end_row();
                    }
                });
                ui.label(RichText::new(format!("Total value: {:.2} {}", valuation.total, CURRENCY)).strong());
            }
        });

        // --- Order book and order entry ---
        egui::TopBottomPanel::bottom("order_panel")
            .resizable(true)
            .min_height(220.0)
            .show(ctx, |ui| {
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.heading("Order book");
                        self.order_book_grid(ui);
                    });
                    ui.separator();
                    ui.vertical(|ui| {
                        ui.heading("Your order");
                        ui.add(
                            egui::DragValue::new(&mut self.limit_price)
                                .speed(0.01)
                                .clamp_range(0.01..=f64::MAX)
                                .prefix("Price per share: "),
                        );
                        ui.add(
                            egui::DragValue::new(&mut self.volume)
                                .speed(1.0)
                                .clamp_range(1..=u64::MAX)
                                .prefix("Shares: "),
                        );
                        if ui.button("Place order").clicked() {
                            self.place_order();
                        }
                        if let Some((message, ok)) = &self.status {
                            let color = if *ok { Color32::LIGHT_GREEN } else { Color32::LIGHT_RED };
                            ui.label(RichText::new(message.as_str()).color(color));
                        }
                    });
                });
            });

        // --- Price chart ---
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(path) = self.session.price_path() else {
                ui.label("Pick a stock to start.");
                return;
            };
            if let Some(latest) = path.last_price() {
                ui.heading(format!(
                    "{}: latest price {:.2} {}",
                    self.chosen_ticker, latest, CURRENCY
                ));
            }
            let points: Vec<[f64; 2]> = path.points().iter().map(|p| [p.time, p.price]).collect();
            let mut plot = Plot::new("price_path_plot").legend(Legend::default());
            if let Some((lo, hi)) = path.display_range() {
                plot = plot.include_y(lo).include_y(hi);
            }
            plot.show(ui, |plot_ui| {
                let line = Line::new(PlotPoints::new(points))
                    .color(Color32::LIGHT_BLUE)
                    .stroke(Stroke::new(2.0, Color32::LIGHT_BLUE));
                plot_ui.line(line.name("Price"));
            });
        });
    }
}

impl TradingDesk {
    fn select(&mut self, ticker: String) {
        match self.session.select_instrument(&ticker) {
            Ok(latest) => {
                self.limit_price = latest;
                self.failed_ticker = None;
                self.status = None;
            }
            Err(e) => {
                error!("could not select {ticker}: {e}");
                self.status = Some((e.to_string(), false));
                if let Some(current) = self.session.selected_instrument() {
                    self.chosen_ticker = current.to_string();
                }
                self.failed_ticker = Some(ticker);
            }
        }
    }

    fn place_order(&mut self) {
        self.status = Some(match self.session.submit_buy(self.limit_price, self.volume) {
            Ok(report) if report.stopped_by_funds => {
                (format!("{report} (not enough money for the rest)"), true)
            }
            Ok(report) => (report.to_string(), true),
            Err(e) => (e.to_string(), false),
        });
    }

    fn order_book_grid(&self, ui: &mut egui::Ui) {
        let Some(book) = self.session.order_book() else {
            return;
        };
        egui::Grid::new("book_grid").striped(true).show(ui, |ui| {
            ui.label(RichText::new("Bid price").color(Color32::GREEN).underline());
            ui.label(RichText::new("Bid volume").color(Color32::GREEN).underline());
            ui.label(RichText::new("Ask price").color(Color32::RED).underline());
            ui.label(RichText::new("Ask volume").color(Color32::RED).underline());
            ui.end_row();
            let depth = book.bids.len().max(book.asks.len());
            for i in 0..depth {
                match book.bids.get(i) {
                    Some(level) => {
                        ui.label(format!("{:.2}", from_cents(level.price)));
                        ui.label(level.volume.to_string());
                    }
                    None => {
                        ui.label("");
                        ui.label("");
                    }
                }
                match book.asks.get(i) {
                    Some(level) => {
                        ui.label(format!("{:.2}", from_cents(level.price)));
                        ui.label(level.volume.to_string());
                    }
                    None => {
                        ui.label("");
                        ui.label("");
                    }
                }
                ui.end_row();
            }
        });
        if let Some(spread) = book.spread() {
            ui.label(format!("Spread: {:.2} {}", from_cents(spread), CURRENCY));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let session = match args.seed {
        Some(seed) => TradingSession::seeded(config, seed),
        None => TradingSession::new(config),
    };
    info!("starting trading desk for account {}", session.account().id);

    let first_ticker = stocks::get_all_tickers()
        .first()
        .map(|t| t.to_string())
        .unwrap_or_default();
    let mut app_state = TradingDesk {
        session,
        chosen_ticker: first_ticker.clone(),
        failed_ticker: None,
        limit_price: 0.01,
        volume: 1,
        status: None,
    };
    app_state.select(first_ticker);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_title("Stock Trading Tutor"),
        ..Default::default()
    };

    eframe::run_native(
        "Stock Trading Tutor",
        native_options,
        Box::new(|_cc| Box::new(app_state)),
    )?;
    Ok(())
}
