//! Application orchestration.
//!
//! One session per configured chart slot, each pumped by its own task. The
//! main task reads trade/switch commands from stdin and fans them out, so
//! the whole client can be driven interactively or from a piped script.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::surface::{LogNotices, TraceChart};
use chartsync_api::TradeClient;
use chartsync_controller::{ControllerError, Session, TradeIntent};
use chartsync_core::PLACEHOLDER_SYMBOL;
use chartsync_feed::FeedEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A command addressed to one chart slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCommand {
    Trade(TradeIntent),
    Switch(String),
    Reset,
    Resize(u32, u32),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Slot { slot: usize, cmd: SlotCommand },
    Quit,
}

/// Parse one input line.
///
/// Grammar (trailing slot index defaults to 0):
/// `buy open|high|limit|highlow [slot]`, `sell [slot]`,
/// `switch <symbol> [slot]`, `reset [slot]`, `resize <w> <h> [slot]`,
/// `quit`.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let parse_slot = |token: Option<&&str>| -> Result<usize, String> {
        match token {
            None => Ok(0),
            Some(t) => t.parse().map_err(|_| format!("bad slot index `{t}`")),
        }
    };

    match tokens.as_slice() {
        [] => Err("empty command".to_string()),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        ["buy", kind, rest @ ..] => {
            let intent = match *kind {
                "open" => TradeIntent::OpenStop,
                "high" => TradeIntent::HighStop,
                "limit" => TradeIntent::LimitBuy,
                "highlow" => TradeIntent::HighLowBuy,
                other => return Err(format!("unknown buy kind `{other}`")),
            };
            Ok(Command::Slot {
                slot: parse_slot(rest.first())?,
                cmd: SlotCommand::Trade(intent),
            })
        }
        ["sell", rest @ ..] => Ok(Command::Slot {
            slot: parse_slot(rest.first())?,
            cmd: SlotCommand::Trade(TradeIntent::SellAll),
        }),
        ["switch", symbol, rest @ ..] => Ok(Command::Slot {
            slot: parse_slot(rest.first())?,
            cmd: SlotCommand::Switch(symbol.to_string()),
        }),
        ["reset", rest @ ..] => Ok(Command::Slot {
            slot: parse_slot(rest.first())?,
            cmd: SlotCommand::Reset,
        }),
        ["resize", width, height, rest @ ..] => {
            let width: u32 = width
                .parse()
                .map_err(|_| format!("bad width `{width}`"))?;
            let height: u32 = height
                .parse()
                .map_err(|_| format!("bad height `{height}`"))?;
            Ok(Command::Slot {
                slot: parse_slot(rest.first())?,
                cmd: SlotCommand::Resize(width, height),
            })
        }
        [other, ..] => Err(format!("unknown command `{other}`")),
    }
}

/// The application: config plus the slot tasks it spawns.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run until ctrl-c or a `quit` command.
    pub async fn run(self) -> AppResult<()> {
        let catalog = TradeClient::new(&self.config.base_url).map_err(ControllerError::from)?;
        let symbols = catalog.fetch_symbols().await;

        let cancel = CancellationToken::new();
        let mut slots: Vec<mpsc::Sender<SlotCommand>> = Vec::new();
        let mut tasks = Vec::new();

        for (idx, slot_cfg) in self.config.charts.iter().enumerate() {
            // Explicit symbol wins; otherwise the slot follows its catalog
            // position, falling back to the placeholder past the end.
            let symbol = slot_cfg.symbol.clone().unwrap_or_else(|| {
                symbols
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| PLACEHOLDER_SYMBOL.to_string())
            });
            let label = format!("chart-{idx}");
            info!(slot = idx, symbol = %symbol, "Starting chart slot");

            let (session, events) = Session::new(
                TraceChart::new(label.as_str()),
                self.config.overlay.overlay_mode(),
                LogNotices::new(label.as_str()),
                &self.config.base_url,
                self.config.session_options(),
            )?;

            let (cmd_tx, cmd_rx) = mpsc::channel(16);
            slots.push(cmd_tx);
            tasks.push(tokio::spawn(run_slot(
                session,
                events,
                cmd_rx,
                cancel.clone(),
                symbol,
                slot_cfg.width,
                slot_cfg.height,
            )));
        }

        self.command_loop(&slots).await;

        cancel.cancel();
        for task in tasks {
            let _ = task.await;
        }
        info!("All chart slots stopped");
        Ok(())
    }

    /// Read commands from stdin until ctrl-c, `quit`, or end of input.
    async fn command_loop(&self, slots: &[mpsc::Sender<SlotCommand>]) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    return;
                }
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line) {
                            Ok(Command::Quit) => return,
                            Ok(Command::Slot { slot, cmd }) => match slots.get(slot) {
                                Some(tx) => {
                                    let _ = tx.send(cmd).await;
                                }
                                None => warn!(slot, "No such chart slot"),
                            },
                            Err(e) => warn!(error = %e, "Unrecognized command"),
                        }
                    }
                    Ok(None) => {
                        info!("Input closed, continuing until ctrl-c");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input, continuing until ctrl-c");
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

/// Drive one chart slot: select its symbol, then interleave feed events and
/// user commands until shutdown.
async fn run_slot(
    mut session: Session<TraceChart, LogNotices>,
    mut events: mpsc::Receiver<FeedEvent>,
    mut commands: mpsc::Receiver<SlotCommand>,
    cancel: CancellationToken,
    symbol: String,
    width: u32,
    height: u32,
) {
    session.resize(width, height);
    session.select_symbol(&symbol);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(event) = events.recv() => session.handle_event(event),
            cmd = commands.recv() => match cmd {
                Some(SlotCommand::Trade(intent)) => session.submit(intent).await,
                Some(SlotCommand::Switch(symbol)) => session.select_symbol(&symbol),
                Some(SlotCommand::Reset) => session.controller_mut().reset_overlays(),
                Some(SlotCommand::Resize(width, height)) => session.resize(width, height),
                None => break,
            }
        }
    }

    session.dispose();
}
