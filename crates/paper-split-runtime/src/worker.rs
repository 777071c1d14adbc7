use crate::{SessionCommand, SessionUpdate};
use paper_split::{
    ImageCodec, ImageDimensions, SplitOptions, SplitSession, split_image, split_image_concurrent,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Drives one split session from UI commands
pub struct SessionWorker<C: ImageCodec> {
    session: SplitSession,
    codec: C,
    source: Arc<C::Source>,
    max_in_flight_crops: usize,
}

impl<C: ImageCodec> SessionWorker<C> {
    pub fn new(session: SplitSession, codec: C, source: Arc<C::Source>) -> Self {
        Self {
            session,
            codec,
            source,
            max_in_flight_crops: 1,
        }
    }

    /// Worker for a fresh session configured from `options`
    pub fn from_options(
        actual: ImageDimensions,
        options: &SplitOptions,
        codec: C,
        source: Arc<C::Source>,
    ) -> Self {
        let session = SplitSession::from_options(actual, options);
        Self::new(session, codec, source).with_max_in_flight_crops(options.max_in_flight_crops)
    }

    pub fn with_max_in_flight_crops(mut self, max_in_flight_crops: usize) -> Self {
        self.max_in_flight_crops = max_in_flight_crops.max(1);
        self
    }

    /// Process commands until the UI side hangs up, then hand the session back
    pub async fn run(
        mut self,
        mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
        update_tx: mpsc::UnboundedSender<SessionUpdate<C::Output>>,
    ) -> SplitSession {
        while let Some(cmd) = command_rx.recv().await {
            self.process_command(cmd, &mut command_rx, &update_tx).await;
        }
        log::debug!("Command channel closed, ending split session");
        self.session
    }

    async fn process_command(
        &mut self,
        cmd: SessionCommand,
        command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
        update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>,
    ) {
        match cmd {
            SessionCommand::Layout { width, height } => {
                self.session.handle_layout(width, height);
                self.send_metrics(update_tx);
                self.send_positions(update_tx);
            }
            SessionCommand::TopInset { top_inset } => {
                let result = self.session.set_top_inset(top_inset);
                self.after_edit(result, update_tx);
            }
            SessionCommand::Scroll { mut offset } => {
                // Coalesce queued scroll events, keeping only the most recent
                let mut pending = None;
                while let Ok(next_cmd) = command_rx.try_recv() {
                    if let SessionCommand::Scroll { offset: newer } = next_cmd {
                        offset = newer;
                    } else {
                        pending = Some(next_cmd);
                        break;
                    }
                }

                self.session.handle_scroll(offset);

                // The scroll has to land before whatever came after it
                if let Some(next_cmd) = pending {
                    Box::pin(self.process_command(next_cmd, command_rx, update_tx)).await;
                }
            }
            SessionCommand::Zoom { zoom_in } => {
                let scroll = self.session.set_zoom(zoom_in);
                self.after_zoom(scroll, update_tx);
            }
            SessionCommand::ToggleZoom => {
                let scroll = self.session.toggle_zoom();
                self.after_zoom(scroll, update_tx);
            }
            SessionCommand::Pinch { scale } => {
                let scroll = self.session.handle_pinch(scale);
                self.after_zoom(scroll, update_tx);
            }
            SessionCommand::AddSplit => {
                let result = self.session.add_split().map(|_| ());
                self.after_edit(result, update_tx);
            }
            SessionCommand::UpdateSplit { index, pointer_y } => {
                let result = self.session.update_split(index, pointer_y).map(|_| ());
                self.after_edit(result, update_tx);
            }
            SessionCommand::DragEnd => {
                self.session.handle_drag_end();
                self.send_positions(update_tx);
            }
            SessionCommand::RemoveSplit { index } => {
                let result = self.session.remove_split(index).map(|_| ());
                self.after_edit(result, update_tx);
            }
            SessionCommand::RemoveAllSplits => {
                self.session.remove_all_splits();
                self.send_positions(update_tx);
            }
            SessionCommand::AutoSplit => {
                self.session.auto_split();
                self.send_positions(update_tx);
            }
            SessionCommand::Confirm => {
                self.handle_confirm(update_tx).await;
            }
        }
    }

    async fn handle_confirm(&self, update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>) {
        // Later edits must not reach an in-flight split
        let positions = self.session.snapshot();
        let actual = self.session.actual();

        let result = if self.max_in_flight_crops > 1 {
            split_image_concurrent(
                &self.codec,
                &*self.source,
                actual,
                &positions,
                self.max_in_flight_crops,
            )
            .await
        } else {
            split_image(&self.codec, &*self.source, actual, &positions).await
        };

        match result {
            Ok(outputs) => {
                log::info!("Split into {} segments", outputs.len());
                let _ = update_tx.send(SessionUpdate::Segmented { outputs });
            }
            Err(e) => {
                log::warn!("{e}");
                let _ = update_tx.send(SessionUpdate::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    fn after_zoom(
        &self,
        scroll: Option<paper_split::ScrollCommand>,
        update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>,
    ) {
        if let Some(scroll) = scroll {
            let _ = update_tx.send(SessionUpdate::ScrollTo(scroll));
            self.send_metrics(update_tx);
            self.send_positions(update_tx);
        }
    }

    fn after_edit(
        &self,
        result: paper_split::Result<()>,
        update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>,
    ) {
        match result {
            Ok(()) => self.send_positions(update_tx),
            Err(e) => {
                let _ = update_tx.send(SessionUpdate::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    fn send_metrics(&self, update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>) {
        let _ = update_tx.send(SessionUpdate::Metrics(self.session.metrics()));
    }

    fn send_positions(&self, update_tx: &mpsc::UnboundedSender<SessionUpdate<C::Output>>) {
        let _ = update_tx.send(SessionUpdate::Positions {
            positions: self.session.positions().to_vec(),
            display: self.session.display_positions(),
        });
    }
}
